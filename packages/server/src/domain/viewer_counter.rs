//! ViewerCounter trait 定義
//!
//! ルームごとの同時閲覧者数カウンタのインターフェース。
//! 同一キーに対する increment / decrement / get は互いに線形化可能で、
//! 並行アクセスによる更新の喪失は許されません。

use async_trait::async_trait;

use super::RoomKey;

/// 閲覧者数カウンタ
#[async_trait]
pub trait ViewerCounter: Send + Sync {
    /// カウンタを 1 増やし、新しい値を返す
    ///
    /// キーが存在しない場合は 0 から生成する。
    async fn increment(&self, room: &RoomKey) -> u32;

    /// カウンタを 1 減らし、新しい値を返す
    ///
    /// 0 未満にはならない。キーが存在しない場合は 0 を返す
    /// （切断レースとして無害扱い）。
    async fn decrement(&self, room: &RoomKey) -> u32;

    /// 現在値を取得（キーが存在しなければ 0）
    async fn get(&self, room: &RoomKey) -> u32;
}
