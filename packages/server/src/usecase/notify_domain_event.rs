//! UseCase: ドメインイベント通知
//!
//! 書き込み経路（応募・ブックマーク・問い合わせ）で発生したイベントを
//! 対象ルームの閲覧者へブロードキャストします。接続ライフサイクルとは
//! 独立した pure notify-on-write で、カウンタ状態は一切持ちません。

use std::sync::Arc;

use crate::domain::{EntityKind, RoomKey, StatsProvider};
use crate::infrastructure::broadcaster::RoomBroadcaster;
use crate::infrastructure::dto::websocket::RealtimeUpdate;

/// 書き込み経路で発生するドメインイベントの種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainEventKind {
    /// 案件への応募
    Application,
    /// ブックマークのトグル
    Bookmark,
    /// 問い合わせ
    Inquiry,
}

/// ドメインイベント通知のユースケース
pub struct NotifyDomainEventUseCase {
    /// RoomBroadcaster（通知の配送）
    broadcaster: Arc<RoomBroadcaster>,
    /// StatsProvider（最新の累計値の読み取り）
    stats_provider: Arc<dyn StatsProvider>,
}

impl NotifyDomainEventUseCase {
    /// 新しい NotifyDomainEventUseCase を作成
    pub fn new(broadcaster: Arc<RoomBroadcaster>, stats_provider: Arc<dyn StatsProvider>) -> Self {
        Self {
            broadcaster,
            stats_provider,
        }
    }

    /// ドメインイベント通知を実行
    ///
    /// 応募・ブックマークは案件ルーム限定で、最新の累計値を取得して載せる。
    /// 取得に失敗した場合は通知を諦める（閲覧者数の経路には影響しない）。
    pub async fn execute(&self, event: DomainEventKind, room: RoomKey) {
        let update = match event {
            DomainEventKind::Application => {
                if room.kind() != EntityKind::Project {
                    tracing::warn!("Application event for non-project room '{}', ignoring", room);
                    return;
                }
                match self.stats_provider.get_project_stats(room.id()).await {
                    Ok(stats) => RealtimeUpdate::application(&room, stats.applications_count),
                    Err(e) => {
                        tracing::warn!("Failed to fetch stats for room '{}': {}", room, e);
                        return;
                    }
                }
            }
            DomainEventKind::Bookmark => {
                if room.kind() != EntityKind::Project {
                    tracing::warn!("Bookmark event for non-project room '{}', ignoring", room);
                    return;
                }
                match self.stats_provider.get_project_stats(room.id()).await {
                    Ok(stats) => RealtimeUpdate::bookmark(&room, stats.bookmark_count),
                    Err(e) => {
                        tracing::warn!("Failed to fetch stats for room '{}': {}", room, e);
                        return;
                    }
                }
            }
            DomainEventKind::Inquiry => RealtimeUpdate::inquiry(&room),
        };

        self.broadcaster.broadcast(&room, &update).await;
        tracing::info!("Broadcasted {:?} event to room '{}'", event, room);
    }
}
