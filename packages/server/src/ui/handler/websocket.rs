//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ClientId, ClientIdFactory, EntityId, EntityKind, RoomKey},
    infrastructure::dto::websocket::ClientIntent,
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    // Transport assigns the connection id at upgrade time
    let client_id = ClientIdFactory::generate();

    ws.on_upgrade(move |socket| handle_socket(socket, state, client_id))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// This function handles the outbound message flow: realtime updates addressed
/// to this client (via rx channel) are sent to its WebSocket connection.
///
/// # Arguments
///
/// * `rx` - Channel receiver for updates addressed to this client
/// * `sender` - WebSocket sink to send messages to this client
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            // Send the message to this client
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, client_id: ClientId) {
    let (sender, mut receiver) = socket.split();

    // Create a channel for this client to receive updates
    let (tx, rx) = mpsc::unbounded_channel();

    // Register the connection; the initial snapshot is pushed through the
    // channel before any other message, so it arrives first.
    let connected_at = state
        .connect_viewer_usecase
        .execute(client_id.clone(), tx)
        .await;
    tracing::debug!(
        "Client '{}' connected at {}",
        client_id,
        connected_at.value()
    );

    // Spawn a task to push updates from the channel to this client
    let mut send_task = pusher_loop(rx, sender);

    let client_id_clone = client_id.clone();
    let state_clone = state.clone();

    // Spawn a task to receive intents from this client.
    // One task owns all of this connection's intents, so a connection's
    // events are processed strictly in arrival order.
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    handle_intent(&state_clone, &client_id_clone, &text).await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", client_id_clone);
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Release room membership and drop the connection
    match state.disconnect_viewer_usecase.execute(&client_id).await {
        Some(room) => {
            tracing::info!(
                "Client '{}' disconnected, released room '{}'",
                client_id,
                room
            );
        }
        None => {
            tracing::info!("Client '{}' disconnected", client_id);
        }
    }
}

/// 受信したインテントを対応するユースケースへディスパッチする
async fn handle_intent(state: &Arc<AppState>, client_id: &ClientId, text: &str) {
    let intent = match serde_json::from_str::<ClientIntent>(text) {
        Ok(intent) => intent,
        Err(e) => {
            tracing::warn!("Failed to parse client intent '{}': {}", text, e);
            return;
        }
    };

    match intent {
        ClientIntent::JoinProject { project_id } => {
            if let Some(room) = parse_room(EntityKind::Project, project_id) {
                state.join_room_usecase.execute(client_id, room).await;
            }
        }
        ClientIntent::LeaveProject { project_id } => {
            if let Some(room) = parse_room(EntityKind::Project, project_id) {
                state.leave_room_usecase.execute(client_id, room).await;
            }
        }
        ClientIntent::JoinFreelancer { freelancer_id } => {
            if let Some(room) = parse_room(EntityKind::Freelancer, freelancer_id) {
                state.join_room_usecase.execute(client_id, room).await;
            }
        }
        ClientIntent::LeaveFreelancer { freelancer_id } => {
            if let Some(room) = parse_room(EntityKind::Freelancer, freelancer_id) {
                state.leave_room_usecase.execute(client_id, room).await;
            }
        }
    }
}

/// インテントの ID 文字列を RoomKey に変換する（不正な ID は警告して無視）
fn parse_room(kind: EntityKind, raw_id: String) -> Option<RoomKey> {
    match EntityId::new(raw_id) {
        Ok(id) => Some(RoomKey::new(kind, id)),
        Err(e) => {
            tracing::warn!("Invalid {} id in client intent: {}", kind, e);
            None
        }
    }
}
