//! UseCase: 閲覧者接続処理
//!
//! トランスポートが接続を受け付けた時点で呼ばれ、接続をレジストリと
//! MessagePusher に登録し、本人に初期スナップショットを送ります。

use std::sync::Arc;

use joblink_shared::time::Clock;

use crate::domain::{ClientId, ConnectionRegistry, MessagePusher, PusherChannel, Timestamp};
use crate::infrastructure::broadcaster::RoomBroadcaster;
use crate::infrastructure::dto::websocket::RealtimeUpdate;

/// 閲覧者接続のユースケース
pub struct ConnectViewerUseCase {
    /// ConnectionRegistry（接続とルーム所属の管理）
    registry: Arc<dyn ConnectionRegistry>,
    /// MessagePusher（送信チャンネルの管理）
    message_pusher: Arc<dyn MessagePusher>,
    /// RoomBroadcaster（スナップショット送信）
    broadcaster: Arc<RoomBroadcaster>,
    /// Clock（接続時刻の採番）
    clock: Arc<dyn Clock>,
}

impl ConnectViewerUseCase {
    /// 新しい ConnectViewerUseCase を作成
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
        broadcaster: Arc<RoomBroadcaster>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            message_pusher,
            broadcaster,
            clock,
        }
    }

    /// 閲覧者接続を実行
    ///
    /// # Arguments
    ///
    /// * `client_id` - トランスポートが採番した接続 ID
    /// * `sender` - この接続へのメッセージ送信用チャンネル
    ///
    /// # Returns
    ///
    /// 接続時刻
    pub async fn execute(&self, client_id: ClientId, sender: PusherChannel) -> Timestamp {
        let connected_at = Timestamp::new(self.clock.now_millis());

        // 1. 送信チャンネルを登録（以降の push が届くよう最初に行う）
        self.message_pusher
            .register_client(client_id.clone(), sender)
            .await;

        // 2. レジストリに接続を登録（ルーム未所属）
        self.registry.register(client_id.clone()).await;

        // 3. 本人に初期スナップショットを送信
        let update = RealtimeUpdate::initial_snapshot(connected_at.value());
        self.broadcaster.send_to(&client_id, &update).await;

        tracing::info!("Client '{}' connected and registered", client_id);

        connected_at
    }
}
