// src/domain/permission.rs

use crate::domain::role_model::Role;
use serde::{Deserialize, Serialize};

/// 権限
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    CreateTask,
    ReadTask,
    UpdateTask,
    DeleteTask,
    ViewAuditLog,
    ManageUsers,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::CreateTask => "create_task",
            Permission::ReadTask => "read_task",
            Permission::UpdateTask => "update_task",
            Permission::DeleteTask => "delete_task",
            Permission::ViewAuditLog => "view_audit_log",
            Permission::ManageUsers => "manage_users",
        }
    }

    /// 文字列から権限を解析（`create_task` / `create-task` の両方を受け付ける）
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "create_task" => Some(Permission::CreateTask),
            "read_task" => Some(Permission::ReadTask),
            "update_task" => Some(Permission::UpdateTask),
            "delete_task" => Some(Permission::DeleteTask),
            "view_audit_log" => Some(Permission::ViewAuditLog),
            "manage_users" => Some(Permission::ManageUsers),
            _ => None,
        }
    }

    pub fn all() -> [Permission; 6] {
        [
            Permission::CreateTask,
            Permission::ReadTask,
            Permission::UpdateTask,
            Permission::DeleteTask,
            Permission::ViewAuditLog,
            Permission::ManageUsers,
        ]
    }

    /// 所有者チェックの対象となる変更系の権限か
    pub fn is_mutation(&self) -> bool {
        matches!(self, Permission::UpdateTask | Permission::DeleteTask)
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ロールごとの権限表（起動時に固定、実行中に変更しない）
const OWNER_PERMISSIONS: &[Permission] = &[
    Permission::CreateTask,
    Permission::ReadTask,
    Permission::UpdateTask,
    Permission::DeleteTask,
    Permission::ViewAuditLog,
    Permission::ManageUsers,
];

const ADMIN_PERMISSIONS: &[Permission] = &[
    Permission::CreateTask,
    Permission::ReadTask,
    Permission::UpdateTask,
    Permission::DeleteTask,
    Permission::ViewAuditLog,
];

// Viewer は読み取り専用
const VIEWER_PERMISSIONS: &[Permission] = &[Permission::ReadTask];

/// ロールに付与された権限の一覧
pub fn permissions_for(role: Role) -> &'static [Permission] {
    match role {
        Role::Owner => OWNER_PERMISSIONS,
        Role::Admin => ADMIN_PERMISSIONS,
        Role::Viewer => VIEWER_PERMISSIONS,
    }
}

/// ロールが権限を持つかチェック
pub fn has_permission(role: Role, permission: Permission) -> bool {
    permissions_for(role).contains(&permission)
}

/// 拒否理由
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    /// ロールが権限を持たない
    RoleLacksPermission,
    /// Viewer が読み取り以外を要求した
    ViewerReadOnly,
    /// 組織をまたいだアクセス
    CrossOrganization,
    /// 他人のリソースの変更
    OwnershipRequired,
}

impl DenialReason {
    /// 拒否の分類コード
    pub fn code(&self) -> &'static str {
        match self {
            DenialReason::RoleLacksPermission | DenialReason::ViewerReadOnly => {
                "permission_denied"
            }
            DenialReason::CrossOrganization => "cross_organization_denied",
            DenialReason::OwnershipRequired => "ownership_required",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            DenialReason::RoleLacksPermission => "role lacks permission",
            DenialReason::ViewerReadOnly => "viewers can only read",
            DenialReason::CrossOrganization => "cross-organization access denied",
            DenialReason::OwnershipRequired => "can only modify own resources",
        }
    }
}

impl std::fmt::Display for DenialReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// 権限チェック結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccessDecision {
    pub allowed: bool,
    pub reason: Option<DenialReason>,
}

impl AccessDecision {
    /// 許可結果を作成
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    /// 拒否結果を作成
    pub fn deny(reason: DenialReason) -> Self {
        Self {
            allowed: false,
            reason: Some(reason),
        }
    }

    pub fn is_allowed(&self) -> bool {
        self.allowed
    }

    pub fn is_denied(&self) -> bool {
        !self.allowed
    }

    pub fn denial_message(&self) -> Option<&'static str> {
        self.reason.map(|r| r.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_matches_has_permission() {
        for role in Role::all() {
            for permission in Permission::all() {
                assert_eq!(
                    has_permission(role, permission),
                    permissions_for(role).contains(&permission),
                    "{} / {}",
                    role,
                    permission
                );
            }
        }
    }

    #[test]
    fn test_registry_fixture() {
        assert_eq!(permissions_for(Role::Owner).len(), 6);

        assert_eq!(permissions_for(Role::Admin).len(), 5);
        assert!(!has_permission(Role::Admin, Permission::ManageUsers));

        assert_eq!(permissions_for(Role::Viewer), &[Permission::ReadTask]);
    }

    #[test]
    fn test_owner_is_superset_of_admin() {
        for permission in permissions_for(Role::Admin) {
            assert!(has_permission(Role::Owner, *permission));
        }
        for role in Role::all() {
            assert!(!permissions_for(role).is_empty());
        }
    }

    #[test]
    fn test_permission_parsing() {
        assert_eq!(
            Permission::from_str("delete-task"),
            Some(Permission::DeleteTask)
        );
        assert_eq!(
            Permission::from_str("VIEW_AUDIT_LOG"),
            Some(Permission::ViewAuditLog)
        );
        assert_eq!(Permission::from_str("launch_rockets"), None);
        assert_eq!(Permission::ManageUsers.to_string(), "manage_users");
    }

    #[test]
    fn test_denial_reason_codes() {
        assert_eq!(DenialReason::ViewerReadOnly.code(), "permission_denied");
        assert_eq!(
            DenialReason::CrossOrganization.code(),
            "cross_organization_denied"
        );
        assert_eq!(
            AccessDecision::deny(DenialReason::OwnershipRequired).denial_message(),
            Some("can only modify own resources")
        );
        assert_eq!(AccessDecision::allow().denial_message(), None);
    }
}
