//! InMemory ConnectionRegistry 実装
//!
//! HashMap をインメモリストアとして使用し、`tokio::sync::Mutex` で
//! 排他します。全ての操作が単一の Mutex 配下で完結するため、
//! 個々の操作は互いに線形化されます。
//!
//! レジストリの寿命はサーバプロセスと同じです（起動時に構築、
//! 明示的な破棄は不要）。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ClientId, ConnectionRegistry, RegistryError, RoomKey};

/// インメモリ接続レジストリ実装
#[derive(Default)]
pub struct InMemoryConnectionRegistry {
    /// Key: 接続 ID
    /// Value: 所属ルーム（未所属なら None）
    connections: Mutex<HashMap<ClientId, Option<RoomKey>>>,
}

impl InMemoryConnectionRegistry {
    /// 新しい InMemoryConnectionRegistry を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn register(&self, client_id: ClientId) {
        let mut connections = self.connections.lock().await;
        if connections.contains_key(&client_id) {
            tracing::debug!("Client '{}' already registered, ignoring", client_id);
            return;
        }
        connections.insert(client_id, None);
    }

    async fn set_room(
        &self,
        client_id: &ClientId,
        room: Option<RoomKey>,
    ) -> Result<Option<RoomKey>, RegistryError> {
        let mut connections = self.connections.lock().await;
        match connections.get_mut(client_id) {
            Some(current) => Ok(std::mem::replace(current, room)),
            None => Err(RegistryError::UnknownConnection(
                client_id.as_str().to_string(),
            )),
        }
    }

    async fn clear_room_if_current(&self, client_id: &ClientId, expected: &RoomKey) -> bool {
        let mut connections = self.connections.lock().await;
        match connections.get_mut(client_id) {
            Some(current) if current.as_ref() == Some(expected) => {
                *current = None;
                true
            }
            _ => false,
        }
    }

    async fn unregister(&self, client_id: &ClientId) -> Option<RoomKey> {
        let mut connections = self.connections.lock().await;
        connections.remove(client_id).flatten()
    }

    async fn current_room(&self, client_id: &ClientId) -> Option<RoomKey> {
        let connections = self.connections.lock().await;
        connections.get(client_id).cloned().flatten()
    }

    async fn members(&self, room: &RoomKey) -> Vec<ClientId> {
        let connections = self.connections.lock().await;
        connections
            .iter()
            .filter(|(_, current)| current.as_ref() == Some(room))
            .map(|(client_id, _)| client_id.clone())
            .collect()
    }

    async fn rooms(&self) -> Vec<RoomKey> {
        let connections = self.connections.lock().await;
        let mut rooms: Vec<RoomKey> = Vec::new();
        for room in connections.values().flatten() {
            if !rooms.contains(room) {
                rooms.push(room.clone());
            }
        }
        rooms
    }

    async fn count(&self) -> usize {
        let connections = self.connections.lock().await;
        connections.len()
    }
}
