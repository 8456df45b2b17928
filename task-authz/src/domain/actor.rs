// src/domain/actor.rs
use crate::domain::role_model::Role;
use crate::domain::user_model::User;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 認証済みトークンから取り出したクレーム
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthClaims {
    pub sub: Uuid,
    pub email: String,
    pub role: Role,
    pub organization_id: Uuid,
}

/// 操作を行う主体（リクエストごとに再構築され、永続化しない）
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
    pub organization_id: Uuid,
}

impl Actor {
    pub fn new(user_id: Uuid, email: impl Into<String>, role: Role, organization_id: Uuid) -> Self {
        Self {
            user_id,
            email: email.into(),
            role,
            organization_id,
        }
    }

    /// リソースの所有者かチェック
    pub fn owns(&self, resource_user_id: Uuid) -> bool {
        self.user_id == resource_user_id
    }
}

impl From<AuthClaims> for Actor {
    fn from(claims: AuthClaims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
            organization_id: claims.organization_id,
        }
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
            role: user.role,
            organization_id: user.organization_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_from_claims() {
        let claims: AuthClaims = serde_json::from_value(serde_json::json!({
            "sub": "2f1c7a0e-3b51-4a5f-9f0e-6d2c8b9a1e11",
            "email": "admin@test.com",
            "role": "admin",
            "organization_id": "7d4e2b10-1a2b-4c3d-8e9f-0a1b2c3d4e5f"
        }))
        .unwrap();

        let actor = Actor::from(claims.clone());
        assert_eq!(actor.user_id, claims.sub);
        assert_eq!(actor.role, Role::Admin);
        assert!(actor.owns(claims.sub));
        assert!(!actor.owns(Uuid::new_v4()));
    }
}
