//! Server state shared across handlers.

use std::sync::Arc;

use crate::domain::{ConnectionRegistry, ViewerCounter};
use crate::infrastructure::stats::InMemoryStatsRepository;
use crate::usecase::{
    ConnectViewerUseCase, DisconnectViewerUseCase, JoinRoomUseCase, LeaveRoomUseCase,
    NotifyDomainEventUseCase,
};

/// Shared application state
pub struct AppState {
    /// ConnectViewerUseCase（閲覧者接続のユースケース）
    pub connect_viewer_usecase: Arc<ConnectViewerUseCase>,
    /// JoinRoomUseCase（ルーム参加のユースケース）
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    /// LeaveRoomUseCase（ルーム退出のユースケース）
    pub leave_room_usecase: Arc<LeaveRoomUseCase>,
    /// DisconnectViewerUseCase（閲覧者切断のユースケース）
    pub disconnect_viewer_usecase: Arc<DisconnectViewerUseCase>,
    /// NotifyDomainEventUseCase（ドメインイベント通知のユースケース）
    pub notify_domain_event_usecase: Arc<NotifyDomainEventUseCase>,
    /// ConnectionRegistry（デバッグ用の読み取りアクセス）
    pub registry: Arc<dyn ConnectionRegistry>,
    /// ViewerCounter（デバッグ用の読み取りアクセス）
    pub viewer_counter: Arc<dyn ViewerCounter>,
    /// 統計リポジトリ（書き込み経路の受け口）
    pub stats_repository: Arc<InMemoryStatsRepository>,
}
