//! InMemory ViewerCounter 実装
//!
//! ルームキーごとの同時閲覧者数を HashMap で保持します。
//! 読み取り・更新が単一の Mutex 配下で行われるため、同一キーへの
//! 並行する増減で更新が失われることはありません。
//!
//! カウンタは最初の join 時に遅延生成され、0 になっても削除は不要です。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{RoomKey, ViewerCounter};

/// インメモリ閲覧者数カウンタ実装
#[derive(Default)]
pub struct InMemoryViewerCounter {
    /// Key: ルームキー
    /// Value: 現在の閲覧者数
    counters: Mutex<HashMap<RoomKey, u32>>,
}

impl InMemoryViewerCounter {
    /// 新しい InMemoryViewerCounter を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ViewerCounter for InMemoryViewerCounter {
    async fn increment(&self, room: &RoomKey) -> u32 {
        let mut counters = self.counters.lock().await;
        let counter = counters.entry(room.clone()).or_insert(0);
        *counter += 1;
        *counter
    }

    async fn decrement(&self, room: &RoomKey) -> u32 {
        let mut counters = self.counters.lock().await;
        let counter = counters.entry(room.clone()).or_insert(0);
        if *counter == 0 {
            tracing::warn!("Viewer counter underflow for room '{}', flooring at 0", room);
            return 0;
        }
        *counter -= 1;
        *counter
    }

    async fn get(&self, room: &RoomKey) -> u32 {
        let counters = self.counters.lock().await;
        counters.get(room).copied().unwrap_or(0)
    }
}
