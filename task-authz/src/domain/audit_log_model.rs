// src/domain/audit_log_model.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 監査ログ（追記のみ）
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuditLog {
    pub id: Uuid,
    pub action: AuditAction,
    pub resource_type: String,
    pub resource_id: Uuid,
    pub user_id: Uuid,
    pub user_email: String,
    pub organization_id: Uuid,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

// 監査アクションの定義
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    RoleChanged,
    AccessDenied,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "create",
            AuditAction::Update => "update",
            AuditAction::Delete => "delete",
            AuditAction::RoleChanged => "role_changed",
            AuditAction::AccessDenied => "access_denied",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// 監査ログエントリービルダー
pub struct AuditLogBuilder {
    action: AuditAction,
    resource_type: String,
    resource_id: Uuid,
    user_id: Uuid,
    user_email: String,
    organization_id: Uuid,
    details: Option<String>,
}

impl AuditLogBuilder {
    pub fn new(action: AuditAction, resource_type: impl Into<String>, resource_id: Uuid) -> Self {
        Self {
            action,
            resource_type: resource_type.into(),
            resource_id,
            user_id: Uuid::nil(),
            user_email: String::new(),
            organization_id: Uuid::nil(),
            details: None,
        }
    }

    pub fn actor(mut self, user_id: Uuid, user_email: impl Into<String>) -> Self {
        self.user_id = user_id;
        self.user_email = user_email.into();
        self
    }

    pub fn organization_id(mut self, id: Uuid) -> Self {
        self.organization_id = id;
        self
    }

    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn build(self) -> AuditLog {
        AuditLog {
            id: Uuid::new_v4(),
            action: self.action,
            resource_type: self.resource_type,
            resource_id: self.resource_id,
            user_id: self.user_id,
            user_email: self.user_email,
            organization_id: self.organization_id,
            details: self.details,
            created_at: Utc::now(),
        }
    }
}
