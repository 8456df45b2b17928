// src/domain/role_model.rs
use crate::domain::permission::{permissions_for, Permission};
use serde::{Deserialize, Serialize};

/// ロール名を表すenum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Owner,
    Admin,
    Viewer,
}

impl Role {
    /// ロール名を文字列として取得
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Admin => "admin",
            Role::Viewer => "viewer",
        }
    }

    /// 文字列からロール名を解析
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "owner" => Some(Role::Owner),
            "admin" => Some(Role::Admin),
            "viewer" => Some(Role::Viewer),
            _ => None,
        }
    }

    /// すべてのロールを取得
    pub fn all() -> [Role; 3] {
        [Role::Owner, Role::Admin, Role::Viewer]
    }

    /// 権限レベルを数値で取得（高いほど強い権限）
    pub fn permission_level(&self) -> u8 {
        match self {
            Role::Owner => 3,
            Role::Admin => 2,
            Role::Viewer => 1,
        }
    }

    /// 指定されたロール以上の権限を持つかチェック
    pub fn is_higher_or_equal(&self, other: Role) -> bool {
        self.permission_level() >= other.permission_level()
    }

    pub fn is_owner(&self) -> bool {
        matches!(self, Role::Owner)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn is_viewer(&self) -> bool {
        matches!(self, Role::Viewer)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str(s).ok_or_else(|| format!("Invalid role name: {}", s))
    }
}

/// ロールの優劣比較（反射的）
pub fn is_role_higher_or_equal(role_a: Role, role_b: Role) -> bool {
    role_a.is_higher_or_equal(role_b)
}

/// 組織に対するアクセスの広さ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessTier {
    /// 自組織のリソースを所有者に関係なく操作できる
    OrganizationWide,
    /// 自組織のタスクの閲覧のみ
    ReadOnly,
    /// 自分が所有するリソースのみ変更できる
    OwnResources,
}

/// 判定エンジンが参照するロールの性質
pub trait RoleProfile {
    fn permissions(&self) -> &[Permission];
    fn access_tier(&self) -> AccessTier;

    fn grants(&self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }

    fn label(&self) -> &str;
}

impl RoleProfile for Role {
    fn permissions(&self) -> &[Permission] {
        permissions_for(*self)
    }

    fn access_tier(&self) -> AccessTier {
        match self {
            Role::Owner | Role::Admin => AccessTier::OrganizationWide,
            Role::Viewer => AccessTier::ReadOnly,
        }
    }

    fn label(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_name_conversion() {
        assert_eq!(Role::Owner.as_str(), "owner");
        assert_eq!(Role::Admin.as_str(), "admin");
        assert_eq!(Role::Viewer.as_str(), "viewer");

        assert_eq!(Role::from_str("owner"), Some(Role::Owner));
        assert_eq!(Role::from_str("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::from_str(" viewer "), Some(Role::Viewer));
        assert_eq!(Role::from_str("member"), None);

        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serde_uses_snake_case() {
        assert_eq!(serde_json::to_string(&Role::Owner).unwrap(), "\"owner\"");
        let parsed: Role = serde_json::from_str("\"viewer\"").unwrap();
        assert_eq!(parsed, Role::Viewer);
    }

    #[test]
    fn test_role_hierarchy() {
        assert!(is_role_higher_or_equal(Role::Owner, Role::Admin));
        assert!(is_role_higher_or_equal(Role::Owner, Role::Viewer));
        assert!(is_role_higher_or_equal(Role::Admin, Role::Viewer));
        assert!(!is_role_higher_or_equal(Role::Viewer, Role::Admin));
        assert!(!is_role_higher_or_equal(Role::Admin, Role::Owner));

        for role in Role::all() {
            assert!(is_role_higher_or_equal(role, role));
        }
    }

    #[test]
    fn test_access_tiers() {
        assert_eq!(Role::Owner.access_tier(), AccessTier::OrganizationWide);
        assert_eq!(Role::Admin.access_tier(), AccessTier::OrganizationWide);
        assert_eq!(Role::Viewer.access_tier(), AccessTier::ReadOnly);
    }
}
