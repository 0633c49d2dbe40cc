//! InMemory 統計リポジトリ実装
//!
//! ドメイン層の StatsProvider trait を実装する読み取りアクセサに加え、
//! 書き込み経路（応募・ブックマーク・シード投入）の受け口を提供します。
//!
//! ## 技術的負債
//!
//! 本来この統計はデータ層（RDB）が所有する値です。インメモリ実装は
//! 単体での動作・テストを目的とした妥協で、DBMS を実装する際は
//! この構造体を同じ trait の別実装に置き換えます。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{EntityId, FreelancerStats, ProjectStats, StatsError, StatsProvider};

/// インメモリ統計リポジトリ実装
#[derive(Default)]
pub struct InMemoryStatsRepository {
    projects: Mutex<HashMap<EntityId, ProjectStats>>,
    freelancers: Mutex<HashMap<EntityId, FreelancerStats>>,
}

impl InMemoryStatsRepository {
    /// 新しい InMemoryStatsRepository を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 案件の統計を登録・上書きする
    pub async fn upsert_project(&self, id: EntityId, stats: ProjectStats) {
        let mut projects = self.projects.lock().await;
        projects.insert(id, stats);
    }

    /// フリーランサーの統計を登録・上書きする
    pub async fn upsert_freelancer(&self, id: EntityId, stats: FreelancerStats) {
        let mut freelancers = self.freelancers.lock().await;
        freelancers.insert(id, stats);
    }

    /// 応募を 1 件記録し、新しい応募数を返す
    ///
    /// 統計行が無ければ生成する（join と同じく存在検証は行わない）。
    pub async fn record_application(&self, id: &EntityId) -> u32 {
        let mut projects = self.projects.lock().await;
        let stats = projects.entry(id.clone()).or_default();
        stats.applications_count += 1;
        stats.applications_count
    }

    /// ブックマークのトグルを記録し、新しいブックマーク数を返す
    pub async fn set_bookmarked(&self, id: &EntityId, bookmarked: bool) -> u32 {
        let mut projects = self.projects.lock().await;
        let stats = projects.entry(id.clone()).or_default();
        if bookmarked {
            stats.bookmark_count += 1;
        } else {
            stats.bookmark_count = stats.bookmark_count.saturating_sub(1);
        }
        stats.bookmark_count
    }
}

#[async_trait]
impl StatsProvider for InMemoryStatsRepository {
    async fn get_project_stats(&self, id: &EntityId) -> Result<ProjectStats, StatsError> {
        let projects = self.projects.lock().await;
        projects
            .get(id)
            .copied()
            .ok_or_else(|| StatsError::ProjectNotFound(id.as_str().to_string()))
    }

    async fn get_freelancer_stats(&self, id: &EntityId) -> Result<FreelancerStats, StatsError> {
        let freelancers = self.freelancers.lock().await;
        freelancers
            .get(id)
            .copied()
            .ok_or_else(|| StatsError::FreelancerNotFound(id.as_str().to_string()))
    }
}
