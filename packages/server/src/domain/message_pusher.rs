//! MessagePusher trait 定義
//!
//! クライアントへのメッセージ送信の抽象化。WebSocket などの
//! 具体的なトランスポートは Infrastructure 層が実装します。

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use super::ClientId;

/// クライアントへの送信チャンネル
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// メッセージ送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("client not found: {0}")]
    ClientNotFound(String),
    #[error("failed to push message: {0}")]
    PushFailed(String),
}

/// メッセージ送信の抽象化
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// クライアントの送信チャンネルを登録する
    async fn register_client(&self, client_id: ClientId, sender: PusherChannel);

    /// クライアントの送信チャンネルを破棄する
    async fn unregister_client(&self, client_id: &ClientId);

    /// 特定のクライアントに送信する
    async fn push_to(&self, client_id: &ClientId, content: &str) -> Result<(), MessagePushError>;

    /// 複数のクライアントに送信する
    ///
    /// 個々の配送失敗は許容し、呼び出し元へはエラーを返さない。
    async fn broadcast(&self, targets: Vec<ClientId>, content: &str);
}
