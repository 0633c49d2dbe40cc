//! UseCase: 閲覧者切断処理
//!
//! トランスポートの切断時に呼ばれ、接続の後始末を行います。
//! ルームに所属したままの切断でも閲覧者数をちょうど 1 回だけ戻します。

use std::sync::Arc;

use crate::domain::{ClientId, ConnectionRegistry, MessagePusher, RoomKey, ViewerCounter};
use crate::infrastructure::broadcaster::RoomBroadcaster;
use crate::infrastructure::dto::websocket::RealtimeUpdate;

/// 閲覧者切断のユースケース
pub struct DisconnectViewerUseCase {
    /// ConnectionRegistry（接続とルーム所属の管理）
    registry: Arc<dyn ConnectionRegistry>,
    /// ViewerCounter（閲覧者数の管理）
    viewer_counter: Arc<dyn ViewerCounter>,
    /// RoomBroadcaster（通知の配送）
    broadcaster: Arc<RoomBroadcaster>,
    /// MessagePusher（送信チャンネルの破棄）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectViewerUseCase {
    /// 新しい DisconnectViewerUseCase を作成
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        viewer_counter: Arc<dyn ViewerCounter>,
        broadcaster: Arc<RoomBroadcaster>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            registry,
            viewer_counter,
            broadcaster,
            message_pusher,
        }
    }

    /// 閲覧者切断を実行
    ///
    /// 二重切断でも安全（2 回目は no-op、decrement は発生しない）。
    ///
    /// # Arguments
    ///
    /// * `client_id` - 切断した接続の ID
    ///
    /// # Returns
    ///
    /// 解放したルームのキー（どのルームにも所属していなければ None）
    pub async fn execute(&self, client_id: &ClientId) -> Option<RoomKey> {
        // 1. 送信チャンネルを破棄
        self.message_pusher.unregister_client(client_id).await;

        // 2. レジストリから削除し、最後の所属ルームを得る
        let last_room = self.registry.unregister(client_id).await;

        // 3. 所属していたルームの閲覧者数を戻し、残りのメンバーに通知
        if let Some(room) = &last_room {
            let remaining = self.viewer_counter.decrement(room).await;
            self.broadcaster
                .broadcast(room, &RealtimeUpdate::viewer_leave(room, remaining))
                .await;
            tracing::info!(
                "Client '{}' disconnected from room '{}' ({} viewers left)",
                client_id,
                room,
                remaining
            );
        } else {
            tracing::info!("Client '{}' disconnected", client_id);
        }

        last_room
    }
}
