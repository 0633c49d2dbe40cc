//! ConnectionRegistry trait 定義
//!
//! 接続と、その接続が所属するルームを管理するレジストリのインターフェース。
//! 1 つの接続は高々 1 つのルームにのみ所属します。
//!
//! レジストリは自身のマップ以外に副作用を持ちません。カウンタ更新や
//! ブロードキャストの起動は UseCase 層が編成します。

use async_trait::async_trait;
use thiserror::Error;

use super::{ClientId, RoomKey};

/// レジストリ操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// 未登録の接続を参照した（切断済み接続へのレースなど）
    #[error("unknown connection: {0}")]
    UnknownConnection(String),
}

/// 接続レジストリ
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// 接続をルーム未所属で登録する
    ///
    /// 登録済みの接続に対しては何もしない（冪等）。
    async fn register(&self, client_id: ClientId);

    /// 所属ルームをアトミックに差し替え、直前のルームを返す
    async fn set_room(
        &self,
        client_id: &ClientId,
        room: Option<RoomKey>,
    ) -> Result<Option<RoomKey>, RegistryError>;

    /// 現在の所属ルームが `expected` と一致する場合のみ解除する
    ///
    /// 解除できたら true。重複 leave を冪等にするための compare-and-clear。
    async fn clear_room_if_current(&self, client_id: &ClientId, expected: &RoomKey) -> bool;

    /// 接続を削除し、最後に所属していたルームを返す
    ///
    /// 未登録・削除済みの接続に対しても安全（None を返す）。
    async fn unregister(&self, client_id: &ClientId) -> Option<RoomKey>;

    /// 現在の所属ルームを取得
    async fn current_room(&self, client_id: &ClientId) -> Option<RoomKey>;

    /// ルームに所属する全接続を取得
    async fn members(&self, room: &RoomKey) -> Vec<ClientId>;

    /// 1 つ以上の接続が所属しているルームの一覧を取得
    async fn rooms(&self) -> Vec<RoomKey>;

    /// 登録済み接続数を取得
    async fn count(&self) -> usize;
}
