//! ルーム単位のブロードキャスト
//!
//! ## 責務
//!
//! - ConnectionRegistry が追跡するルームメンバーの解決
//! - RealtimeUpdate の JSON シリアライズ
//! - MessagePusher 経由での配送（fire-and-forget）
//!
//! 呼び出し順序はそのまま各クライアントのチャンネルへの投入順になるため、
//! 同一クライアントに対するメッセージ順序は呼び出し順と一致します。

use std::sync::Arc;

use crate::domain::{ClientId, ConnectionRegistry, MessagePusher, RoomKey};
use crate::infrastructure::dto::websocket::RealtimeUpdate;

/// ルームブロードキャスタ
pub struct RoomBroadcaster {
    /// ConnectionRegistry（ルームメンバーの解決に使用）
    registry: Arc<dyn ConnectionRegistry>,
    /// MessagePusher（メッセージ配送の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl RoomBroadcaster {
    /// 新しい RoomBroadcaster を作成
    pub fn new(registry: Arc<dyn ConnectionRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// ルームの全メンバーに update を配送する
    ///
    /// メンバーは呼び出し時点のレジストリ状態で解決する。
    /// 個々の配送失敗は許容し、呼び出し元へはエラーを返さない。
    pub async fn broadcast(&self, room: &RoomKey, update: &RealtimeUpdate) {
        let json = match serde_json::to_string(update) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to serialize realtime update: {}", e);
                return;
            }
        };

        let targets = self.registry.members(room).await;
        if targets.is_empty() {
            tracing::debug!("No members in room '{}', skipping broadcast", room);
            return;
        }

        self.message_pusher.broadcast(targets, &json).await;
    }

    /// 特定の接続にのみ update を送る（スナップショット送信用）
    pub async fn send_to(&self, client_id: &ClientId, update: &RealtimeUpdate) {
        let json = match serde_json::to_string(update) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to serialize realtime update: {}", e);
                return;
            }
        };

        if let Err(e) = self.message_pusher.push_to(client_id, &json).await {
            tracing::warn!("Failed to push update to client '{}': {}", client_id, e);
        }
    }
}
