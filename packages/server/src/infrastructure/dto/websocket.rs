//! WebSocket message DTOs.

use serde::{Deserialize, Serialize};

/// realtime_update メッセージの種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateType {
    Stats,
    ViewerJoin,
    ViewerLeave,
    Application,
    Bookmark,
    Inquiry,
}

/// 接続直後に送る初期スナップショットのペイロード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionPayload {
    pub connected: bool,
    pub timestamp: i64,
}

/// 統計ペイロード
///
/// メッセージ種別ごとに載せるフィールドが異なるため全て Option で持ち、
/// 未使用のフィールドはシリアライズしません。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealtimeStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_viewers: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applications_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bookmark_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inquiry_count: Option<u32>,
}

impl RealtimeStats {
    /// 現在の閲覧者数を合成する
    pub fn with_current_viewers(mut self, current_viewers: u32) -> Self {
        self.current_viewers = Some(current_viewers);
        self
    }
}

/// realtime_update の data ペイロード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UpdatePayload {
    Connection(ConnectionPayload),
    Stats(RealtimeStats),
}

/// クライアントへ配送する wire メッセージ
///
/// `project_id` / `freelancer_id` はどちらか一方のみ設定されます
/// （接続直後の初期スナップショットでは両方 None）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealtimeUpdate {
    pub r#type: UpdateType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freelancer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<UpdatePayload>,
}

/// クライアントから届く join / leave インテント
///
/// `type` フィールドをディスパッチキーとする明示的なタグ付き表現。
/// 未知のインテントはデシリアライズの段階で弾かれます。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientIntent {
    JoinProject { project_id: String },
    LeaveProject { project_id: String },
    JoinFreelancer { freelancer_id: String },
    LeaveFreelancer { freelancer_id: String },
}
