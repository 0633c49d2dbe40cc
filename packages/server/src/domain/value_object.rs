//! 値オブジェクト定義
//!
//! 接続・ルーム・対象エンティティを表す不変の値オブジェクト。
//! 生成時にバリデーションを行い、不正な値の存在を型レベルで防ぎます。

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// EntityId の最大長（バイト）
const MAX_ENTITY_ID_LENGTH: usize = 64;

/// 値オブジェクトのバリデーションエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("client_id must not be empty")]
    EmptyClientId,
    #[error("entity_id must not be empty")]
    EmptyEntityId,
    #[error("entity_id too long: {0} bytes")]
    EntityIdTooLong(usize),
}

/// クライアント接続の識別子
///
/// トランスポートが接続確立時に採番する不透明なハンドル。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientId(String);

impl ClientId {
    /// 新しい ClientId を作成（空文字列は不可）
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::EmptyClientId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ClientId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ClientId のファクトリ
///
/// UUID v4 で接続 ID を生成します。
pub struct ClientIdFactory;

impl ClientIdFactory {
    pub fn generate() -> ClientId {
        ClientId(Uuid::new_v4().to_string())
    }
}

/// 案件・フリーランサーの識別子
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(String);

impl EntityId {
    /// 新しい EntityId を作成（空文字列・長すぎる値は不可）
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::EmptyEntityId);
        }
        if value.len() > MAX_ENTITY_ID_LENGTH {
            return Err(ValueObjectError::EntityIdTooLong(value.len()));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for EntityId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ルームが指すエンティティの種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Project,
    Freelancer,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Project => "project",
            EntityKind::Freelancer => "freelancer",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// ブロードキャストグループ（ルーム）の複合キー
///
/// 種別 + エンティティ ID の直和表現。旧来の `"project_42"` のような
/// 文字列キーからの種別推測を型で置き換えたもの。構造的等価で比較します。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomKey {
    kind: EntityKind,
    id: EntityId,
}

impl RoomKey {
    pub fn new(kind: EntityKind, id: EntityId) -> Self {
        Self { kind, id }
    }

    /// 案件ルームのキーを作成
    pub fn project(id: EntityId) -> Self {
        Self::new(EntityKind::Project, id)
    }

    /// フリーランサールームのキーを作成
    pub fn freelancer(id: EntityId) -> Self {
        Self::new(EntityKind::Freelancer, id)
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }
}

impl fmt::Display for RoomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.kind, self.id)
    }
}

/// Unix タイムスタンプ（ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
