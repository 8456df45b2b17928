// src/service/role_assignment_policy.rs
//
// 初回登録時のロール割り当て方針。判定エンジンとは独立した設定として注入する。

use crate::config::RolePolicyConfig;
use crate::domain::role_model::Role;

pub trait RoleAssignmentPolicy: Send + Sync {
    fn initial_role(&self, email: &str) -> Role;
}

/// 設定されたメールアドレスに Owner/Admin を割り当て、それ以外は Viewer
#[derive(Clone, Debug, Default)]
pub struct EmailRoleAssignmentPolicy {
    owner_emails: Vec<String>,
    admin_emails: Vec<String>,
}

impl EmailRoleAssignmentPolicy {
    pub fn new(owner_emails: Vec<String>, admin_emails: Vec<String>) -> Self {
        Self {
            owner_emails: owner_emails.iter().map(|e| e.to_lowercase()).collect(),
            admin_emails: admin_emails.iter().map(|e| e.to_lowercase()).collect(),
        }
    }

    pub fn from_config(config: &RolePolicyConfig) -> Self {
        Self::new(config.owner_emails.clone(), config.admin_emails.clone())
    }
}

impl RoleAssignmentPolicy for EmailRoleAssignmentPolicy {
    fn initial_role(&self, email: &str) -> Role {
        let email = email.trim().to_lowercase();
        if self.owner_emails.contains(&email) {
            Role::Owner
        } else if self.admin_emails.contains(&email) {
            Role::Admin
        } else {
            Role::Viewer
        }
    }
}

/// 常に同じロールを割り当てる
#[derive(Clone, Copy, Debug)]
pub struct FixedRoleAssignmentPolicy(pub Role);

impl Default for FixedRoleAssignmentPolicy {
    fn default() -> Self {
        Self(Role::Viewer)
    }
}

impl RoleAssignmentPolicy for FixedRoleAssignmentPolicy {
    fn initial_role(&self, _email: &str) -> Role {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_policy() {
        let policy = EmailRoleAssignmentPolicy::new(
            vec!["Owner@Test.com".to_string()],
            vec!["admin@test.com".to_string()],
        );

        assert_eq!(policy.initial_role("owner@test.com"), Role::Owner);
        assert_eq!(policy.initial_role(" ADMIN@test.com "), Role::Admin);
        assert_eq!(policy.initial_role("someone@test.com"), Role::Viewer);
    }

    #[test]
    fn test_fixed_policy() {
        assert_eq!(FixedRoleAssignmentPolicy::default().initial_role("x"), Role::Viewer);
        assert_eq!(FixedRoleAssignmentPolicy(Role::Admin).initial_role("x"), Role::Admin);
    }
}
