//! UseCase: ルーム参加処理
//!
//! 接続を新しいルームへ所属させ、閲覧者数を更新して関係者へ通知します。
//! 在室中のルームがある場合は先にそこから退出させます（switch）。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - 参加・switch・再 join・切断レースの各パターンでのカウンタと通知
//!
//! ### なぜこのテストが必要か
//! - 閲覧者数の不変条件（所属接続数と常に一致）の要となる遷移のため
//! - 統計取得の失敗が参加処理自体を妨げないことを保証するため
//!
//! ### どのような状況を想定しているか
//! - 正常系: 未所属からの join、別ルームからの switch
//! - エッジケース: 同じルームへの再 join、切断済み接続からの join
//! - 異常系: 統計取得の失敗（NotFound）

use std::sync::Arc;

use crate::domain::{
    ClientId, ConnectionRegistry, EntityKind, RegistryError, RoomKey, StatsProvider, ViewerCounter,
};
use crate::infrastructure::broadcaster::RoomBroadcaster;
use crate::infrastructure::dto::websocket::{RealtimeStats, RealtimeUpdate};

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    /// ConnectionRegistry（接続とルーム所属の管理）
    registry: Arc<dyn ConnectionRegistry>,
    /// ViewerCounter（閲覧者数の管理）
    viewer_counter: Arc<dyn ViewerCounter>,
    /// RoomBroadcaster（通知の配送）
    broadcaster: Arc<RoomBroadcaster>,
    /// StatsProvider（累計統計の読み取り、外部コラボレータ）
    stats_provider: Arc<dyn StatsProvider>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        viewer_counter: Arc<dyn ViewerCounter>,
        broadcaster: Arc<RoomBroadcaster>,
        stats_provider: Arc<dyn StatsProvider>,
    ) -> Self {
        Self {
            registry,
            viewer_counter,
            broadcaster,
            stats_provider,
        }
    }

    /// ルーム参加を実行
    ///
    /// # Arguments
    ///
    /// * `client_id` - 参加する接続の ID
    /// * `room` - 参加先のルームキー
    ///
    /// # Returns
    ///
    /// * `Some(count)` - 参加後の閲覧者数
    /// * `None` - 切断済み接続からの join（no-op）
    pub async fn execute(&self, client_id: &ClientId, room: RoomKey) -> Option<u32> {
        // 1. 所属ルームを差し替え、直前のルームを得る
        let previous = match self.registry.set_room(client_id, Some(room.clone())).await {
            Ok(previous) => previous,
            Err(RegistryError::UnknownConnection(_)) => {
                // 切断済み接続からの join は無視する
                tracing::debug!("Join from unknown connection '{}', ignoring", client_id);
                return None;
            }
        };

        // 2. 同じルームへの再 join: カウンタは変えず、現在値で通知のみ行う
        if previous.as_ref() == Some(&room) {
            tracing::debug!("Client '{}' re-joined room '{}'", client_id, room);
            let current = self.viewer_counter.get(&room).await;
            self.broadcaster
                .broadcast(&room, &RealtimeUpdate::viewer_join(&room, current))
                .await;
            self.send_stats_snapshot(client_id, &room, current).await;
            return Some(current);
        }

        // 3. 直前のルームから退出させる（switch）
        if let Some(previous) = previous {
            let remaining = self.viewer_counter.decrement(&previous).await;
            self.broadcaster
                .broadcast(&previous, &RealtimeUpdate::viewer_leave(&previous, remaining))
                .await;
            tracing::info!(
                "Client '{}' switched out of room '{}' ({} viewers left)",
                client_id,
                previous,
                remaining
            );
        }

        // 4. 新しいルームの閲覧者数を増やして通知
        let current = self.viewer_counter.increment(&room).await;
        self.broadcaster
            .broadcast(&room, &RealtimeUpdate::viewer_join(&room, current))
            .await;
        tracing::info!(
            "Client '{}' joined room '{}' ({} viewers)",
            client_id,
            room,
            current
        );

        // 5. 参加した本人へ統計スナップショットを送る
        self.send_stats_snapshot(client_id, &room, current).await;

        Some(current)
    }

    /// 累計統計と現在の閲覧者数を合成したスナップショットを本人へ送る
    ///
    /// 統計の取得失敗はログに残し、スナップショット送信のみ諦める。
    /// 参加そのもの（レジストリ・カウンタ・通知）には影響しない。
    async fn send_stats_snapshot(&self, client_id: &ClientId, room: &RoomKey, current_viewers: u32) {
        let stats: RealtimeStats = match room.kind() {
            EntityKind::Project => match self.stats_provider.get_project_stats(room.id()).await {
                Ok(stats) => stats.into(),
                Err(e) => {
                    tracing::warn!("Failed to fetch stats for room '{}': {}", room, e);
                    return;
                }
            },
            EntityKind::Freelancer => {
                match self.stats_provider.get_freelancer_stats(room.id()).await {
                    Ok(stats) => stats.into(),
                    Err(e) => {
                        tracing::warn!("Failed to fetch stats for room '{}': {}", room, e);
                        return;
                    }
                }
            }
        };

        let stats = stats.with_current_viewers(current_viewers);
        self.broadcaster
            .send_to(client_id, &RealtimeUpdate::stats_snapshot(room, stats))
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EntityId, MessagePusher, MockStatsProvider, ProjectStats, StatsError};
    use crate::infrastructure::{
        counter::InMemoryViewerCounter, message_pusher::WebSocketMessagePusher,
        registry::InMemoryConnectionRegistry,
    };
    use crate::infrastructure::dto::websocket::{UpdatePayload, UpdateType};
    use tokio::sync::mpsc;

    fn client(id: &str) -> ClientId {
        ClientId::new(id.to_string()).unwrap()
    }

    fn project_room(id: &str) -> RoomKey {
        RoomKey::project(EntityId::new(id.to_string()).unwrap())
    }

    struct TestStack {
        registry: Arc<InMemoryConnectionRegistry>,
        counter: Arc<InMemoryViewerCounter>,
        pusher: Arc<WebSocketMessagePusher>,
        usecase: JoinRoomUseCase,
    }

    fn create_test_stack(stats_provider: MockStatsProvider) -> TestStack {
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let counter = Arc::new(InMemoryViewerCounter::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let broadcaster = Arc::new(RoomBroadcaster::new(registry.clone(), pusher.clone()));
        let usecase = JoinRoomUseCase::new(
            registry.clone(),
            counter.clone(),
            broadcaster,
            Arc::new(stats_provider),
        );
        TestStack {
            registry,
            counter,
            pusher,
            usecase,
        }
    }

    fn stats_provider_with_project(stats: ProjectStats) -> MockStatsProvider {
        let mut provider = MockStatsProvider::new();
        provider
            .expect_get_project_stats()
            .returning(move |_| Ok(stats));
        provider
    }

    async fn connect(stack: &TestStack, id: &str) -> (ClientId, mpsc::UnboundedReceiver<String>) {
        let client_id = client(id);
        let (tx, rx) = mpsc::unbounded_channel();
        stack.registry.register(client_id.clone()).await;
        stack.pusher.register_client(client_id.clone(), tx).await;
        (client_id, rx)
    }

    fn parse(raw: &str) -> RealtimeUpdate {
        serde_json::from_str(raw).unwrap()
    }

    #[tokio::test]
    async fn test_join_increments_counter_and_notifies() {
        // テスト項目: join で閲覧者数が増え、本人に viewer_join とスナップショットが届く
        // given (前提条件):
        let stack = create_test_stack(stats_provider_with_project(ProjectStats {
            view_count: 120,
            applications_count: 5,
            bookmark_count: 8,
        }));
        let (alice, mut rx) = connect(&stack, "alice").await;

        // when (操作):
        let result = stack.usecase.execute(&alice, project_room("42")).await;

        // then (期待する結果):
        assert_eq!(result, Some(1));
        assert_eq!(stack.counter.get(&project_room("42")).await, 1);
        assert_eq!(
            stack.registry.current_room(&alice).await,
            Some(project_room("42"))
        );

        // viewer_join ブロードキャスト（alice も参加済みなので本人にも届く）
        let join_update = parse(&rx.recv().await.unwrap());
        assert_eq!(join_update.r#type, UpdateType::ViewerJoin);

        // 続けて統計スナップショットが届く
        let snapshot = parse(&rx.recv().await.unwrap());
        assert_eq!(snapshot.r#type, UpdateType::Stats);
        assert_eq!(snapshot.project_id, Some("42".to_string()));
        match snapshot.data {
            Some(UpdatePayload::Stats(stats)) => {
                assert_eq!(stats.view_count, Some(120));
                assert_eq!(stats.current_viewers, Some(1));
                assert_eq!(stats.applications_count, Some(5));
                assert_eq!(stats.bookmark_count, Some(8));
            }
            other => panic!("Expected stats payload, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_switch_decrements_old_room_before_incrementing_new() {
        // テスト項目: 別ルームへの join が旧ルームの退出 → 新ルームの参加の順で処理される
        // given (前提条件):
        let stack = create_test_stack(stats_provider_with_project(ProjectStats::default()));
        let (alice, _alice_rx) = connect(&stack, "alice").await;
        let (bob, mut bob_rx) = connect(&stack, "bob").await;
        stack.usecase.execute(&alice, project_room("42")).await;
        stack.usecase.execute(&bob, project_room("42")).await;
        // bob が受けた分を読み捨てる
        while bob_rx.try_recv().is_ok() {}

        // when (操作): alice が project_99 に switch する
        let result = stack.usecase.execute(&alice, project_room("99")).await;

        // then (期待する結果): 旧ルーム 1、新ルーム 1
        assert_eq!(result, Some(1));
        assert_eq!(stack.counter.get(&project_room("42")).await, 1);
        assert_eq!(stack.counter.get(&project_room("99")).await, 1);
        assert_eq!(
            stack.registry.current_room(&alice).await,
            Some(project_room("99"))
        );

        // bob には旧ルームの viewer_leave が届く
        let leave_update = parse(&bob_rx.recv().await.unwrap());
        assert_eq!(leave_update.r#type, UpdateType::ViewerLeave);
        assert_eq!(leave_update.project_id, Some("42".to_string()));
        match leave_update.data {
            Some(UpdatePayload::Stats(stats)) => {
                assert_eq!(stats.current_viewers, Some(1));
            }
            other => panic!("Expected stats payload, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_rejoin_same_room_does_not_change_counter() {
        // テスト項目: 同じルームへの再 join でカウンタが増えない
        // given (前提条件):
        let stack = create_test_stack(stats_provider_with_project(ProjectStats::default()));
        let (alice, mut rx) = connect(&stack, "alice").await;
        stack.usecase.execute(&alice, project_room("42")).await;
        while rx.try_recv().is_ok() {}

        // when (操作):
        let result = stack.usecase.execute(&alice, project_room("42")).await;

        // then (期待する結果): カウンタは 1 のまま、通知とスナップショットは再送される
        assert_eq!(result, Some(1));
        assert_eq!(stack.counter.get(&project_room("42")).await, 1);
        let join_update = parse(&rx.recv().await.unwrap());
        assert_eq!(join_update.r#type, UpdateType::ViewerJoin);
        let snapshot = parse(&rx.recv().await.unwrap());
        assert_eq!(snapshot.r#type, UpdateType::Stats);
    }

    #[tokio::test]
    async fn test_join_from_unknown_connection_is_noop() {
        // テスト項目: 切断済み接続からの join がカウンタに影響しない
        // given (前提条件):
        let mut provider = MockStatsProvider::new();
        provider.expect_get_project_stats().never();
        let stack = create_test_stack(provider);
        let ghost = client("ghost");

        // when (操作): 登録されていない接続で join する
        let result = stack.usecase.execute(&ghost, project_room("42")).await;

        // then (期待する結果):
        assert_eq!(result, None);
        assert_eq!(stack.counter.get(&project_room("42")).await, 0);
    }

    #[tokio::test]
    async fn test_stats_failure_does_not_block_join_bookkeeping() {
        // テスト項目: 統計取得の失敗時もレジストリ・カウンタ・通知は完了する
        // given (前提条件):
        let mut provider = MockStatsProvider::new();
        provider
            .expect_get_project_stats()
            .returning(|id| Err(StatsError::ProjectNotFound(id.as_str().to_string())));
        let stack = create_test_stack(provider);
        let (alice, mut rx) = connect(&stack, "alice").await;

        // when (操作): 統計行が存在しない案件のルームに join する
        let result = stack.usecase.execute(&alice, project_room("999")).await;

        // then (期待する結果): 参加自体は成立している
        assert_eq!(result, Some(1));
        assert_eq!(stack.counter.get(&project_room("999")).await, 1);
        assert_eq!(
            stack.registry.current_room(&alice).await,
            Some(project_room("999"))
        );

        // viewer_join は届くが、スナップショットは届かない
        let join_update = parse(&rx.recv().await.unwrap());
        assert_eq!(join_update.r#type, UpdateType::ViewerJoin);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_join_broadcasts_to_existing_members() {
        // テスト項目: 2 人目の join が先着メンバーにも通知される
        // given (前提条件):
        let stack = create_test_stack(stats_provider_with_project(ProjectStats::default()));
        let (alice, mut alice_rx) = connect(&stack, "alice").await;
        let (bob, mut bob_rx) = connect(&stack, "bob").await;
        stack.usecase.execute(&alice, project_room("42")).await;
        while alice_rx.try_recv().is_ok() {}

        // when (操作): bob が同じルームに join する
        stack.usecase.execute(&bob, project_room("42")).await;

        // then (期待する結果): alice にも currentViewers=2 の viewer_join が届く
        let update = parse(&alice_rx.recv().await.unwrap());
        assert_eq!(update.r#type, UpdateType::ViewerJoin);
        match update.data {
            Some(UpdatePayload::Stats(stats)) => {
                assert_eq!(stats.current_viewers, Some(2));
            }
            other => panic!("Expected stats payload, got {:?}", other),
        }
        // bob にも届いている
        let bob_update = parse(&bob_rx.recv().await.unwrap());
        assert_eq!(bob_update.r#type, UpdateType::ViewerJoin);
    }
}
