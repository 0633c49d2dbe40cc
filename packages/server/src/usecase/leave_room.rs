//! UseCase: ルーム退出処理
//!
//! 明示的な leave インテントを処理します。接続が現にそのルームに
//! 所属している場合のみ退出させ、重複・手遅れの leave は no-op とします。

use std::sync::Arc;

use crate::domain::{ClientId, ConnectionRegistry, RoomKey, ViewerCounter};
use crate::infrastructure::broadcaster::RoomBroadcaster;
use crate::infrastructure::dto::websocket::RealtimeUpdate;

/// ルーム退出のユースケース
pub struct LeaveRoomUseCase {
    /// ConnectionRegistry（接続とルーム所属の管理）
    registry: Arc<dyn ConnectionRegistry>,
    /// ViewerCounter（閲覧者数の管理）
    viewer_counter: Arc<dyn ViewerCounter>,
    /// RoomBroadcaster（通知の配送）
    broadcaster: Arc<RoomBroadcaster>,
}

impl LeaveRoomUseCase {
    /// 新しい LeaveRoomUseCase を作成
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        viewer_counter: Arc<dyn ViewerCounter>,
        broadcaster: Arc<RoomBroadcaster>,
    ) -> Self {
        Self {
            registry,
            viewer_counter,
            broadcaster,
        }
    }

    /// ルーム退出を実行
    ///
    /// # Arguments
    ///
    /// * `client_id` - 退出する接続の ID
    /// * `room` - 退出対象のルームキー
    ///
    /// # Returns
    ///
    /// * `Some(count)` - 退出後の閲覧者数
    /// * `None` - 所属していないルームへの leave（no-op）
    pub async fn execute(&self, client_id: &ClientId, room: RoomKey) -> Option<u32> {
        // 現在の所属ルームと一致する場合のみ解除する（重複 leave は no-op）
        if !self.registry.clear_room_if_current(client_id, &room).await {
            tracing::debug!(
                "Stale leave for room '{}' from client '{}', ignoring",
                room,
                client_id
            );
            return None;
        }

        let remaining = self.viewer_counter.decrement(&room).await;
        self.broadcaster
            .broadcast(&room, &RealtimeUpdate::viewer_leave(&room, remaining))
            .await;
        tracing::info!(
            "Client '{}' left room '{}' ({} viewers left)",
            client_id,
            room,
            remaining
        );

        Some(remaining)
    }
}
