//! Message formatting for terminal display.

use joblink_server::infrastructure::dto::websocket::{
    RealtimeStats, RealtimeUpdate, UpdatePayload, UpdateType,
};
use joblink_shared::time::timestamp_to_rfc3339;

/// Formats incoming realtime updates for terminal display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format a realtime update as a single display line
    pub fn format_update(update: &RealtimeUpdate) -> String {
        let target = Self::format_target(update);

        match (update.r#type, &update.data) {
            (UpdateType::Stats, Some(UpdatePayload::Connection(payload))) => {
                format!(
                    "*** Connected to server at {} ***\n",
                    timestamp_to_rfc3339(payload.timestamp)
                )
            }
            (UpdateType::Stats, Some(UpdatePayload::Stats(stats))) => {
                format!("[stats] {}{}\n", target, Self::format_stats(stats))
            }
            (UpdateType::ViewerJoin, Some(UpdatePayload::Stats(stats))) => {
                format!(
                    "[viewer_join] {}now {} viewer(s)\n",
                    target,
                    stats.current_viewers.unwrap_or(0)
                )
            }
            (UpdateType::ViewerLeave, Some(UpdatePayload::Stats(stats))) => {
                format!(
                    "[viewer_leave] {}now {} viewer(s)\n",
                    target,
                    stats.current_viewers.unwrap_or(0)
                )
            }
            (UpdateType::Application, Some(UpdatePayload::Stats(stats))) => {
                format!(
                    "[application] {}{} application(s)\n",
                    target,
                    stats.applications_count.unwrap_or(0)
                )
            }
            (UpdateType::Bookmark, Some(UpdatePayload::Stats(stats))) => {
                format!(
                    "[bookmark] {}{} bookmark(s)\n",
                    target,
                    stats.bookmark_count.unwrap_or(0)
                )
            }
            (UpdateType::Inquiry, _) => {
                format!("[inquiry] {}new inquiry\n", target)
            }
            _ => Self::format_raw(&format!("{:?}", update)),
        }
    }

    /// Format a message that could not be parsed as a RealtimeUpdate
    pub fn format_raw(text: &str) -> String {
        format!("[raw] {}\n", text)
    }

    fn format_target(update: &RealtimeUpdate) -> String {
        if let Some(project_id) = &update.project_id {
            format!("project {} | ", project_id)
        } else if let Some(freelancer_id) = &update.freelancer_id {
            format!("freelancer {} | ", freelancer_id)
        } else {
            String::new()
        }
    }

    fn format_stats(stats: &RealtimeStats) -> String {
        let mut parts = Vec::new();
        if let Some(views) = stats.view_count {
            parts.push(format!("views: {}", views));
        }
        if let Some(viewers) = stats.current_viewers {
            parts.push(format!("viewers: {}", viewers));
        }
        if let Some(applications) = stats.applications_count {
            parts.push(format!("applications: {}", applications));
        }
        if let Some(bookmarks) = stats.bookmark_count {
            parts.push(format!("bookmarks: {}", bookmarks));
        }
        if let Some(inquiries) = stats.inquiry_count {
            parts.push(format!("inquiries: {}", inquiries));
        }
        parts.join(" | ")
    }
}
