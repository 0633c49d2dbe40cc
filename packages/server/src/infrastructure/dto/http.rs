//! HTTP API request/response DTOs.

use serde::{Deserialize, Serialize};

/// /debug/rooms のルーム概要
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub room: String,
    pub kind: String,
    pub id: String,
    pub current_viewers: u32,
}

/// ブックマークトグルのリクエストボディ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkToggleRequest {
    pub bookmarked: bool,
}
