//! 統計情報の読み取りインターフェース（外部コラボレータ）
//!
//! 案件・フリーランサーの累計統計（閲覧数・応募数・ブックマーク数）は
//! データ層が所有します。コアはこの trait を通じて読み取るだけで、
//! 値を書き換えることはありません。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::EntityId;

/// 案件の累計統計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectStats {
    pub view_count: u32,
    pub applications_count: u32,
    pub bookmark_count: u32,
}

/// フリーランサーの累計統計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreelancerStats {
    pub view_count: u32,
    pub project_count: u32,
}

/// 統計取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsError {
    #[error("project not found: {0}")]
    ProjectNotFound(String),
    #[error("freelancer not found: {0}")]
    FreelancerNotFound(String),
}

/// 統計情報の読み取り専用アクセサ
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsProvider: Send + Sync {
    /// 案件の累計統計を取得する
    async fn get_project_stats(&self, id: &EntityId) -> Result<ProjectStats, StatsError>;

    /// フリーランサーの累計統計を取得する
    async fn get_freelancer_stats(&self, id: &EntityId) -> Result<FreelancerStats, StatsError>;
}
