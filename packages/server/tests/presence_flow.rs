//! Integration tests driving the assembled presence stack in-process.
//!
//! The real in-memory components are wired together exactly as the server
//! binary does, with per-client channels standing in for WebSocket
//! connections, so every broadcast can be observed deterministically.

use std::sync::Arc;

use tokio::sync::mpsc;

use joblink_server::domain::{
    ClientId, ClientIdFactory, ConnectionRegistry, EntityId, FreelancerStats, ProjectStats,
    RoomKey, ViewerCounter,
};
use joblink_server::infrastructure::{
    broadcaster::RoomBroadcaster, counter::InMemoryViewerCounter,
    message_pusher::WebSocketMessagePusher, registry::InMemoryConnectionRegistry,
    stats::InMemoryStatsRepository,
};
use joblink_server::infrastructure::dto::websocket::{RealtimeUpdate, UpdatePayload, UpdateType};
use joblink_server::usecase::{
    ConnectViewerUseCase, DisconnectViewerUseCase, DomainEventKind, JoinRoomUseCase,
    LeaveRoomUseCase, NotifyDomainEventUseCase,
};
use joblink_shared::time::FixedClock;

/// The fully wired presence stack, as the server binary assembles it
struct PresenceStack {
    registry: Arc<InMemoryConnectionRegistry>,
    counter: Arc<InMemoryViewerCounter>,
    stats_repository: Arc<InMemoryStatsRepository>,
    connect: ConnectViewerUseCase,
    join: JoinRoomUseCase,
    leave: LeaveRoomUseCase,
    disconnect: DisconnectViewerUseCase,
    notify: NotifyDomainEventUseCase,
}

fn build_stack() -> PresenceStack {
    let registry = Arc::new(InMemoryConnectionRegistry::new());
    let counter = Arc::new(InMemoryViewerCounter::new());
    let pusher = Arc::new(WebSocketMessagePusher::new());
    let stats_repository = Arc::new(InMemoryStatsRepository::new());
    let broadcaster = Arc::new(RoomBroadcaster::new(registry.clone(), pusher.clone()));

    PresenceStack {
        registry: registry.clone(),
        counter: counter.clone(),
        stats_repository: stats_repository.clone(),
        connect: ConnectViewerUseCase::new(
            registry.clone(),
            pusher.clone(),
            broadcaster.clone(),
            Arc::new(FixedClock::new(1700000000000)),
        ),
        join: JoinRoomUseCase::new(
            registry.clone(),
            counter.clone(),
            broadcaster.clone(),
            stats_repository.clone(),
        ),
        leave: LeaveRoomUseCase::new(registry.clone(), counter.clone(), broadcaster.clone()),
        disconnect: DisconnectViewerUseCase::new(
            registry.clone(),
            counter.clone(),
            broadcaster.clone(),
            pusher,
        ),
        notify: NotifyDomainEventUseCase::new(broadcaster, stats_repository),
    }
}

/// A simulated client connection with its inbound message stream
struct TestClient {
    id: ClientId,
    rx: mpsc::UnboundedReceiver<String>,
}

impl TestClient {
    /// Read the next update addressed to this client
    fn next_update(&mut self) -> RealtimeUpdate {
        let raw = self
            .rx
            .try_recv()
            .expect("expected an update to be queued for this client");
        serde_json::from_str(&raw).expect("update should be valid JSON")
    }

    /// Discard everything queued so far
    fn drain(&mut self) {
        while self.rx.try_recv().is_ok() {}
    }

    fn has_pending(&mut self) -> bool {
        self.rx.try_recv().is_ok()
    }
}

async fn connect(stack: &PresenceStack) -> TestClient {
    let id = ClientIdFactory::generate();
    let (tx, rx) = mpsc::unbounded_channel();
    stack.connect.execute(id.clone(), tx).await;
    TestClient { id, rx }
}

fn project_room(id: &str) -> RoomKey {
    RoomKey::project(EntityId::new(id.to_string()).unwrap())
}

fn freelancer_room(id: &str) -> RoomKey {
    RoomKey::freelancer(EntityId::new(id.to_string()).unwrap())
}

fn current_viewers(update: &RealtimeUpdate) -> u32 {
    match &update.data {
        Some(UpdatePayload::Stats(stats)) => stats
            .current_viewers
            .expect("update should carry current_viewers"),
        other => panic!("expected stats payload, got {:?}", other),
    }
}

#[tokio::test]
async fn two_clients_join_switch_and_disconnect() {
    // C1 connects and joins project_42; C2 follows; C1 switches to
    // project_99; C2 disconnects. Counters and broadcasts must track
    // membership exactly at every step.
    let stack = build_stack();
    stack
        .stats_repository
        .upsert_project(
            EntityId::new("42".to_string()).unwrap(),
            ProjectStats {
                view_count: 120,
                applications_count: 5,
                bookmark_count: 8,
            },
        )
        .await;

    let mut c1 = connect(&stack).await;
    let first = c1.next_update();
    assert_eq!(first.r#type, UpdateType::Stats);

    // C1 joins project_42
    stack.join.execute(&c1.id, project_room("42")).await;
    assert_eq!(stack.counter.get(&project_room("42")).await, 1);

    let join_update = c1.next_update();
    assert_eq!(join_update.r#type, UpdateType::ViewerJoin);
    assert_eq!(current_viewers(&join_update), 1);

    let snapshot = c1.next_update();
    assert_eq!(snapshot.r#type, UpdateType::Stats);
    assert_eq!(snapshot.project_id, Some("42".to_string()));
    assert_eq!(current_viewers(&snapshot), 1);

    // C2 connects and joins the same room
    let mut c2 = connect(&stack).await;
    c2.drain();
    stack.join.execute(&c2.id, project_room("42")).await;
    assert_eq!(stack.counter.get(&project_room("42")).await, 2);

    // Both members see the viewer_join broadcast with count 2
    let c1_seen = c1.next_update();
    assert_eq!(c1_seen.r#type, UpdateType::ViewerJoin);
    assert_eq!(current_viewers(&c1_seen), 2);
    let c2_seen = c2.next_update();
    assert_eq!(c2_seen.r#type, UpdateType::ViewerJoin);
    assert_eq!(current_viewers(&c2_seen), 2);
    c2.drain();

    // C1 switches to project_99: one decrement for 42, one increment for 99
    stack.join.execute(&c1.id, project_room("99")).await;
    assert_eq!(stack.counter.get(&project_room("42")).await, 1);
    assert_eq!(stack.counter.get(&project_room("99")).await, 1);
    assert_eq!(
        stack.registry.current_room(&c1.id).await,
        Some(project_room("99"))
    );

    let c2_leave = c2.next_update();
    assert_eq!(c2_leave.r#type, UpdateType::ViewerLeave);
    assert_eq!(c2_leave.project_id, Some("42".to_string()));
    assert_eq!(current_viewers(&c2_leave), 1);

    // C2 disconnects: project_42 drops to zero
    stack.disconnect.execute(&c2.id).await;
    assert_eq!(stack.counter.get(&project_room("42")).await, 0);
    assert_eq!(stack.registry.current_room(&c2.id).await, None);
    assert_eq!(stack.registry.count().await, 1);
}

#[tokio::test]
async fn interleaved_operations_conserve_counters() {
    // Joins, leaves, disconnects and stale duplicates across one room key:
    // the final counter must equal matched joins minus matched releases and
    // never go negative along the way.
    let stack = build_stack();
    let room = project_room("42");

    let mut clients = Vec::new();
    for _ in 0..5 {
        clients.push(connect(&stack).await);
    }

    // All five join
    for client in &clients {
        stack.join.execute(&client.id, room.clone()).await;
    }
    assert_eq!(stack.counter.get(&room).await, 5);

    // Two leave explicitly, one of them sends a duplicate leave
    stack.leave.execute(&clients[0].id, room.clone()).await;
    stack.leave.execute(&clients[0].id, room.clone()).await;
    stack.leave.execute(&clients[1].id, room.clone()).await;
    assert_eq!(stack.counter.get(&room).await, 3);

    // One disconnects, twice
    stack.disconnect.execute(&clients[2].id).await;
    stack.disconnect.execute(&clients[2].id).await;
    assert_eq!(stack.counter.get(&room).await, 2);

    // A client that already left disconnects: no further decrement
    stack.disconnect.execute(&clients[0].id).await;
    assert_eq!(stack.counter.get(&room).await, 2);

    // The remaining two disconnect
    stack.disconnect.execute(&clients[3].id).await;
    stack.disconnect.execute(&clients[4].id).await;
    assert_eq!(stack.counter.get(&room).await, 0);
    assert_eq!(stack.registry.count().await, 1);
}

#[tokio::test]
async fn broadcast_counts_follow_counter_mutations() {
    // The counts observed in successive viewer_join/viewer_leave broadcasts
    // must match the counter value produced by each mutation.
    let stack = build_stack();
    let room = project_room("42");

    let mut observer = connect(&stack).await;
    observer.drain();
    stack.join.execute(&observer.id, room.clone()).await;
    observer.drain();

    let mut visitor = connect(&stack).await;
    visitor.drain();

    stack.join.execute(&visitor.id, room.clone()).await;
    let seen_join = observer.next_update();
    assert_eq!(seen_join.r#type, UpdateType::ViewerJoin);
    assert_eq!(current_viewers(&seen_join), 2);

    stack.leave.execute(&visitor.id, room.clone()).await;
    let seen_leave = observer.next_update();
    assert_eq!(seen_leave.r#type, UpdateType::ViewerLeave);
    assert_eq!(current_viewers(&seen_leave), 1);

    assert!(!observer.has_pending());
}

#[tokio::test]
async fn domain_events_reach_room_members() {
    // Write-path events (application, bookmark, inquiry) are broadcast with
    // counts read fresh from the stats repository.
    let stack = build_stack();
    let room = project_room("42");
    let project_id = EntityId::new("42".to_string()).unwrap();

    let mut viewer = connect(&stack).await;
    viewer.drain();
    stack.join.execute(&viewer.id, room.clone()).await;
    viewer.drain();

    // An application is recorded on the write path, then broadcast
    stack.stats_repository.record_application(&project_id).await;
    stack
        .notify
        .execute(DomainEventKind::Application, room.clone())
        .await;

    let update = viewer.next_update();
    assert_eq!(update.r#type, UpdateType::Application);
    match update.data {
        Some(UpdatePayload::Stats(stats)) => {
            assert_eq!(stats.applications_count, Some(1));
        }
        other => panic!("expected stats payload, got {:?}", other),
    }

    // A bookmark toggle follows
    stack.stats_repository.set_bookmarked(&project_id, true).await;
    stack
        .notify
        .execute(DomainEventKind::Bookmark, room.clone())
        .await;

    let update = viewer.next_update();
    assert_eq!(update.r#type, UpdateType::Bookmark);
    match update.data {
        Some(UpdatePayload::Stats(stats)) => {
            assert_eq!(stats.bookmark_count, Some(1));
        }
        other => panic!("expected stats payload, got {:?}", other),
    }

    // An inquiry carries no payload
    stack
        .notify
        .execute(DomainEventKind::Inquiry, room.clone())
        .await;
    let update = viewer.next_update();
    assert_eq!(update.r#type, UpdateType::Inquiry);
    assert_eq!(update.data, None);
}

#[tokio::test]
async fn freelancer_snapshot_uses_project_count() {
    // Freelancer join snapshots carry the project count in the
    // applications slot, with bookmark/inquiry counts fixed at zero.
    let stack = build_stack();
    stack
        .stats_repository
        .upsert_freelancer(
            EntityId::new("7".to_string()).unwrap(),
            FreelancerStats {
                view_count: 30,
                project_count: 4,
            },
        )
        .await;

    let mut viewer = connect(&stack).await;
    viewer.drain();
    stack.join.execute(&viewer.id, freelancer_room("7")).await;

    let join_update = viewer.next_update();
    assert_eq!(join_update.r#type, UpdateType::ViewerJoin);
    assert_eq!(join_update.freelancer_id, Some("7".to_string()));

    let snapshot = viewer.next_update();
    assert_eq!(snapshot.r#type, UpdateType::Stats);
    match snapshot.data {
        Some(UpdatePayload::Stats(stats)) => {
            assert_eq!(stats.view_count, Some(30));
            assert_eq!(stats.applications_count, Some(4));
            assert_eq!(stats.bookmark_count, Some(0));
            assert_eq!(stats.inquiry_count, Some(0));
            assert_eq!(stats.current_viewers, Some(1));
        }
        other => panic!("expected stats payload, got {:?}", other),
    }
}

#[tokio::test]
async fn joining_missing_entity_still_counts_viewers() {
    // No existence validation on join: the room works and counts viewers
    // even when no stats row backs the entity; only the snapshot is skipped.
    let stack = build_stack();
    let room = project_room("does-not-exist");

    let mut viewer = connect(&stack).await;
    viewer.drain();
    let result = stack.join.execute(&viewer.id, room.clone()).await;

    assert_eq!(result, Some(1));
    assert_eq!(stack.counter.get(&room).await, 1);

    let join_update = viewer.next_update();
    assert_eq!(join_update.r#type, UpdateType::ViewerJoin);
    // No stats snapshot follows
    assert!(!viewer.has_pending());
}
