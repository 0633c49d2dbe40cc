//! Server execution logic.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::domain::{ConnectionRegistry, ViewerCounter};
use crate::infrastructure::stats::InMemoryStatsRepository;
use crate::usecase::{
    ConnectViewerUseCase, DisconnectViewerUseCase, JoinRoomUseCase, LeaveRoomUseCase,
    NotifyDomainEventUseCase,
};

use super::{
    handler::http::{
        debug_rooms, get_freelancer_stats, get_project_stats, health_check, record_application,
        record_freelancer_inquiry, record_project_inquiry, toggle_bookmark,
        upsert_freelancer_stats, upsert_project_stats,
    },
    handler::websocket::websocket_handler,
    signal::shutdown_signal,
    state::AppState,
};

/// Realtime presence server
///
/// This struct encapsulates the server configuration and provides methods to run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     connect_viewer_usecase,
///     join_room_usecase,
///     leave_room_usecase,
///     disconnect_viewer_usecase,
///     notify_domain_event_usecase,
///     registry,
///     viewer_counter,
///     stats_repository,
/// );
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    /// ConnectViewerUseCase（閲覧者接続のユースケース）
    connect_viewer_usecase: Arc<ConnectViewerUseCase>,
    /// JoinRoomUseCase（ルーム参加のユースケース）
    join_room_usecase: Arc<JoinRoomUseCase>,
    /// LeaveRoomUseCase（ルーム退出のユースケース）
    leave_room_usecase: Arc<LeaveRoomUseCase>,
    /// DisconnectViewerUseCase（閲覧者切断のユースケース）
    disconnect_viewer_usecase: Arc<DisconnectViewerUseCase>,
    /// NotifyDomainEventUseCase（ドメインイベント通知のユースケース）
    notify_domain_event_usecase: Arc<NotifyDomainEventUseCase>,
    /// ConnectionRegistry（デバッグ用の読み取りアクセス）
    registry: Arc<dyn ConnectionRegistry>,
    /// ViewerCounter（デバッグ用の読み取りアクセス）
    viewer_counter: Arc<dyn ViewerCounter>,
    /// 統計リポジトリ（書き込み経路の受け口）
    stats_repository: Arc<InMemoryStatsRepository>,
}

impl Server {
    /// Create a new Server instance
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        connect_viewer_usecase: Arc<ConnectViewerUseCase>,
        join_room_usecase: Arc<JoinRoomUseCase>,
        leave_room_usecase: Arc<LeaveRoomUseCase>,
        disconnect_viewer_usecase: Arc<DisconnectViewerUseCase>,
        notify_domain_event_usecase: Arc<NotifyDomainEventUseCase>,
        registry: Arc<dyn ConnectionRegistry>,
        viewer_counter: Arc<dyn ViewerCounter>,
        stats_repository: Arc<InMemoryStatsRepository>,
    ) -> Self {
        Self {
            connect_viewer_usecase,
            join_room_usecase,
            leave_room_usecase,
            disconnect_viewer_usecase,
            notify_domain_event_usecase,
            registry,
            viewer_counter,
            stats_repository,
        }
    }

    /// Run the realtime presence server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app_state = Arc::new(AppState {
            connect_viewer_usecase: self.connect_viewer_usecase,
            join_room_usecase: self.join_room_usecase,
            leave_room_usecase: self.leave_room_usecase,
            disconnect_viewer_usecase: self.disconnect_viewer_usecase,
            notify_domain_event_usecase: self.notify_domain_event_usecase,
            registry: self.registry,
            viewer_counter: self.viewer_counter,
            stats_repository: self.stats_repository,
        });

        // Define handlers
        let app = Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/debug/rooms", get(debug_rooms))
            .route(
                "/api/projects/{project_id}/stats",
                get(get_project_stats).put(upsert_project_stats),
            )
            .route(
                "/api/freelancers/{freelancer_id}/stats",
                get(get_freelancer_stats).put(upsert_freelancer_stats),
            )
            .route(
                "/api/projects/{project_id}/applications",
                post(record_application),
            )
            .route("/api/projects/{project_id}/bookmark", post(toggle_bookmark))
            .route(
                "/api/projects/{project_id}/inquiries",
                post(record_project_inquiry),
            )
            .route(
                "/api/freelancers/{freelancer_id}/inquiries",
                post(record_freelancer_inquiry),
            )
            .layer(TraceLayer::new_for_http())
            .with_state(app_state);

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        // Start the server
        tracing::info!(
            "Realtime presence server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
