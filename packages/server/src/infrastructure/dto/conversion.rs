//! Conversion logic between domain types and wire DTOs.

use crate::domain::{EntityKind, FreelancerStats, ProjectStats, RoomKey};
use crate::infrastructure::dto::websocket as dto;

// ========================================
// Domain → DTO
// ========================================

impl From<ProjectStats> for dto::RealtimeStats {
    fn from(stats: ProjectStats) -> Self {
        Self {
            view_count: Some(stats.view_count),
            applications_count: Some(stats.applications_count),
            bookmark_count: Some(stats.bookmark_count),
            ..Default::default()
        }
    }
}

impl From<FreelancerStats> for dto::RealtimeStats {
    fn from(stats: FreelancerStats) -> Self {
        // フリーランサーの応募数スロットには案件数が入る。
        // ブックマーク数・問い合わせ数は別テーブルの集計が必要なため 0 固定。
        Self {
            view_count: Some(stats.view_count),
            applications_count: Some(stats.project_count),
            bookmark_count: Some(0),
            inquiry_count: Some(0),
            ..Default::default()
        }
    }
}

/// RoomKey をターゲットフィールドの組に分解する
fn target(room: &RoomKey) -> (Option<String>, Option<String>) {
    let id = room.id().as_str().to_string();
    match room.kind() {
        EntityKind::Project => (Some(id), None),
        EntityKind::Freelancer => (None, Some(id)),
    }
}

impl dto::RealtimeUpdate {
    /// 接続直後の初期スナップショット
    pub fn initial_snapshot(timestamp: i64) -> Self {
        Self {
            r#type: dto::UpdateType::Stats,
            project_id: None,
            freelancer_id: None,
            data: Some(dto::UpdatePayload::Connection(dto::ConnectionPayload {
                connected: true,
                timestamp,
            })),
        }
    }

    /// join 時に本人へ送る統計スナップショット
    pub fn stats_snapshot(room: &RoomKey, stats: dto::RealtimeStats) -> Self {
        let (project_id, freelancer_id) = target(room);
        Self {
            r#type: dto::UpdateType::Stats,
            project_id,
            freelancer_id,
            data: Some(dto::UpdatePayload::Stats(stats)),
        }
    }

    /// 閲覧者の参加通知
    pub fn viewer_join(room: &RoomKey, current_viewers: u32) -> Self {
        let (project_id, freelancer_id) = target(room);
        Self {
            r#type: dto::UpdateType::ViewerJoin,
            project_id,
            freelancer_id,
            data: Some(dto::UpdatePayload::Stats(
                dto::RealtimeStats::default().with_current_viewers(current_viewers),
            )),
        }
    }

    /// 閲覧者の退出通知
    pub fn viewer_leave(room: &RoomKey, current_viewers: u32) -> Self {
        let (project_id, freelancer_id) = target(room);
        Self {
            r#type: dto::UpdateType::ViewerLeave,
            project_id,
            freelancer_id,
            data: Some(dto::UpdatePayload::Stats(
                dto::RealtimeStats::default().with_current_viewers(current_viewers),
            )),
        }
    }

    /// 応募イベント通知
    pub fn application(room: &RoomKey, applications_count: u32) -> Self {
        let (project_id, freelancer_id) = target(room);
        Self {
            r#type: dto::UpdateType::Application,
            project_id,
            freelancer_id,
            data: Some(dto::UpdatePayload::Stats(dto::RealtimeStats {
                applications_count: Some(applications_count),
                ..Default::default()
            })),
        }
    }

    /// ブックマークイベント通知
    pub fn bookmark(room: &RoomKey, bookmark_count: u32) -> Self {
        let (project_id, freelancer_id) = target(room);
        Self {
            r#type: dto::UpdateType::Bookmark,
            project_id,
            freelancer_id,
            data: Some(dto::UpdatePayload::Stats(dto::RealtimeStats {
                bookmark_count: Some(bookmark_count),
                ..Default::default()
            })),
        }
    }

    /// 問い合わせイベント通知（ペイロードなし）
    pub fn inquiry(room: &RoomKey) -> Self {
        let (project_id, freelancer_id) = target(room);
        Self {
            r#type: dto::UpdateType::Inquiry,
            project_id,
            freelancer_id,
            data: None,
        }
    }
}
