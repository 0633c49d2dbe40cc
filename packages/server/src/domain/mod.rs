//! ドメイン層
//!
//! 接続・ルーム・閲覧者数に関する値オブジェクトと、
//! 各コンポーネントの seam となる trait を定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

pub mod message_pusher;
pub mod registry;
pub mod stats;
pub mod value_object;
pub mod viewer_counter;

pub use message_pusher::{MessagePushError, MessagePusher, PusherChannel};
pub use registry::{ConnectionRegistry, RegistryError};
pub use stats::{FreelancerStats, ProjectStats, StatsError, StatsProvider};
pub use value_object::{
    ClientId, ClientIdFactory, EntityId, EntityKind, RoomKey, Timestamp, ValueObjectError,
};
pub use viewer_counter::ViewerCounter;

#[cfg(test)]
pub use stats::MockStatsProvider;
