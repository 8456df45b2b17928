// src/domain/user_model.rs
use crate::domain::role_model::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// ユーザー
///
/// 認証情報は保持しない。資格情報の検証は外部の認証基盤の責務。
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub organization_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        email: impl Into<String>,
        name: impl Into<String>,
        role: Role,
        organization_id: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            name: name.into(),
            role,
            organization_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// ユーザー登録リクエスト
#[derive(Clone, Debug, Deserialize)]
pub struct RegisterUser {
    pub email: String,
    pub name: String,
    pub organization_id: Option<Uuid>,
}
