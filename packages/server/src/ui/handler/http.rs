//! HTTP API endpoint handlers.
//!
//! 書き込み経路（応募・ブックマーク・問い合わせ）の受け口と、
//! 統計の読み取り・シード投入、デバッグ用のルーム一覧を提供します。

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::{
        ConnectionRegistry, EntityId, FreelancerStats, ProjectStats, RoomKey, StatsError,
        StatsProvider, ViewerCounter,
    },
    infrastructure::dto::http::{BookmarkToggleRequest, RoomSummaryDto},
    ui::state::AppState,
    usecase::DomainEventKind,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Debug endpoint listing active rooms with their live viewer counts
pub async fn debug_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.registry.rooms().await;

    let mut summaries = Vec::with_capacity(rooms.len());
    for room in rooms {
        let current_viewers = state.viewer_counter.get(&room).await;
        summaries.push(RoomSummaryDto {
            room: room.to_string(),
            kind: room.kind().as_str().to_string(),
            id: room.id().as_str().to_string(),
            current_viewers,
        });
    }

    Json(summaries)
}

/// Get project stats by ID
pub async fn get_project_stats(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<String>,
) -> Result<Json<ProjectStats>, StatusCode> {
    let id = parse_entity_id(project_id)?;
    match state.stats_repository.get_project_stats(&id).await {
        Ok(stats) => Ok(Json(stats)),
        Err(StatsError::ProjectNotFound(_)) => Err(StatusCode::NOT_FOUND),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// Upsert project stats (seed/admin endpoint)
pub async fn upsert_project_stats(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<String>,
    Json(stats): Json<ProjectStats>,
) -> Result<StatusCode, StatusCode> {
    let id = parse_entity_id(project_id)?;
    state.stats_repository.upsert_project(id, stats).await;
    Ok(StatusCode::NO_CONTENT)
}

/// Get freelancer stats by ID
pub async fn get_freelancer_stats(
    State(state): State<Arc<AppState>>,
    Path(freelancer_id): Path<String>,
) -> Result<Json<FreelancerStats>, StatusCode> {
    let id = parse_entity_id(freelancer_id)?;
    match state.stats_repository.get_freelancer_stats(&id).await {
        Ok(stats) => Ok(Json(stats)),
        Err(StatsError::FreelancerNotFound(_)) => Err(StatusCode::NOT_FOUND),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// Upsert freelancer stats (seed/admin endpoint)
pub async fn upsert_freelancer_stats(
    State(state): State<Arc<AppState>>,
    Path(freelancer_id): Path<String>,
    Json(stats): Json<FreelancerStats>,
) -> Result<StatusCode, StatusCode> {
    let id = parse_entity_id(freelancer_id)?;
    state.stats_repository.upsert_freelancer(id, stats).await;
    Ok(StatusCode::NO_CONTENT)
}

/// Record a project application and notify the room
pub async fn record_application(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<String>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let id = parse_entity_id(project_id)?;
    let applications_count = state.stats_repository.record_application(&id).await;

    state
        .notify_domain_event_usecase
        .execute(DomainEventKind::Application, RoomKey::project(id))
        .await;

    Ok(Json(
        serde_json::json!({"applications_count": applications_count}),
    ))
}

/// Record a bookmark toggle and notify the room
pub async fn toggle_bookmark(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<String>,
    Json(request): Json<BookmarkToggleRequest>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let id = parse_entity_id(project_id)?;
    let bookmark_count = state
        .stats_repository
        .set_bookmarked(&id, request.bookmarked)
        .await;

    state
        .notify_domain_event_usecase
        .execute(DomainEventKind::Bookmark, RoomKey::project(id))
        .await;

    Ok(Json(serde_json::json!({"bookmark_count": bookmark_count})))
}

/// Record a project inquiry and notify the room
pub async fn record_project_inquiry(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<String>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let id = parse_entity_id(project_id)?;

    state
        .notify_domain_event_usecase
        .execute(DomainEventKind::Inquiry, RoomKey::project(id))
        .await;

    Ok(Json(serde_json::json!({"status": "ok"})))
}

/// Record a freelancer inquiry and notify the room
pub async fn record_freelancer_inquiry(
    State(state): State<Arc<AppState>>,
    Path(freelancer_id): Path<String>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let id = parse_entity_id(freelancer_id)?;

    state
        .notify_domain_event_usecase
        .execute(DomainEventKind::Inquiry, RoomKey::freelancer(id))
        .await;

    Ok(Json(serde_json::json!({"status": "ok"})))
}

fn parse_entity_id(raw: String) -> Result<EntityId, StatusCode> {
    EntityId::new(raw).map_err(|e| {
        tracing::warn!("Invalid entity id in request path: {}", e);
        StatusCode::BAD_REQUEST
    })
}
