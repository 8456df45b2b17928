// src/domain/organization_model.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 組織
///
/// 親組織は高々1つで、全体として森を構成する。
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Organization {
    /// ルート組織を作成
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            parent_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// 子組織を作成
    pub fn with_parent(name: impl Into<String>, parent_id: Uuid) -> Self {
        Self {
            parent_id: Some(parent_id),
            ..Self::new(name)
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// 組織作成リクエスト
#[derive(Clone, Debug, Deserialize)]
pub struct CreateOrganization {
    pub name: String,
    pub parent_id: Option<Uuid>,
}
