// src/service/user_service.rs

use crate::domain::actor::Actor;
use crate::domain::audit_log_model::AuditAction;
use crate::domain::permission::{AccessDecision, Permission};
use crate::domain::role_model::{Role, RoleProfile};
use crate::domain::user_model::{RegisterUser, User};
use crate::error::{AppError, AppResult};
use crate::log_with_context;
use crate::repository::user_repository::UserRepository;
use crate::service::audit_log_service::{AuditLogService, LogActionParams};
use crate::service::organization_hierarchy_service::OrganizationHierarchyService;
use crate::service::organization_service::OrganizationService;
use crate::service::permission_service::PermissionService;
use crate::service::role_assignment_policy::RoleAssignmentPolicy;
use crate::utils::error_helper::{conflict_error, hierarchy_cycle_error, not_found_error};
use std::sync::Arc;
use uuid::Uuid;

pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
    organization_service: Arc<OrganizationService>,
    hierarchy_service: Arc<OrganizationHierarchyService>,
    audit_log_service: Arc<AuditLogService>,
    role_policy: Arc<dyn RoleAssignmentPolicy>,
}

impl UserService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        organization_service: Arc<OrganizationService>,
        hierarchy_service: Arc<OrganizationHierarchyService>,
        audit_log_service: Arc<AuditLogService>,
        role_policy: Arc<dyn RoleAssignmentPolicy>,
    ) -> Self {
        Self {
            user_repo,
            organization_service,
            hierarchy_service,
            audit_log_service,
            role_policy,
        }
    }

    /// ユーザー登録
    ///
    /// 組織の指定がなければ既定の組織に所属させる。
    /// 初期ロールは注入された割り当て方針で決まる。
    pub async fn register(&self, payload: RegisterUser) -> AppResult<User> {
        let email = payload.email.trim().to_string();
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::BadRequest(
                "email: must be a valid email address".to_string(),
            ));
        }
        if payload.name.trim().is_empty() {
            return Err(AppError::BadRequest("name: must not be empty".to_string()));
        }

        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(conflict_error(
                "Email already exists",
                "user_service::register",
            ));
        }

        let organization_id = match payload.organization_id {
            Some(organization_id) => {
                self.organization_service
                    .find_by_id(organization_id)
                    .await?
                    .ok_or_else(|| {
                        not_found_error(
                            "Organization",
                            organization_id,
                            "user_service::register",
                        )
                    })?
                    .id
            }
            None => self.organization_service.find_or_create_default().await?.id,
        };

        let role = self.role_policy.initial_role(&email);
        let user = self
            .user_repo
            .create(User::new(email, payload.name.trim(), role, organization_id))
            .await?;

        log_with_context!(
            tracing::Level::INFO,
            "User registered",
            "user_id" => user.id,
            "role" => user.role.as_str(),
            "organization_id" => user.organization_id
        );

        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        self.user_repo.find_by_id(id).await
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.user_repo.find_by_email(email.trim()).await
    }

    /// 認証済みユーザーIDから操作主体を再構築
    pub async fn resolve_actor(&self, user_id: Uuid) -> AppResult<Actor> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .map(|user| Actor::from(&user))
            .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))
    }

    /// スコープ内のユーザー一覧（ユーザー管理権限が必要）
    pub async fn list_users(&self, actor: &Actor) -> AppResult<Vec<User>> {
        Self::ensure_can_manage_users(actor, "user_service::list_users")?;

        let organization_ids = self
            .hierarchy_service
            .accessible_organization_ids(actor)
            .await?;
        self.user_repo
            .find_by_organization_ids(&organization_ids)
            .await
    }

    /// ロールの変更
    pub async fn update_role(&self, actor: &Actor, user_id: Uuid, role: Role) -> AppResult<User> {
        // 対象の存在より先に権限を確認する
        Self::ensure_can_manage_users(actor, "user_service::update_role")?;

        let target = self.user_repo.find_by_id(user_id).await?.ok_or_else(|| {
            not_found_error("User", user_id, "user_service::update_role")
        })?;

        let hierarchy = self.hierarchy_service.hierarchy().await?;
        let decision = PermissionService::authorize(
            actor,
            target.organization_id,
            None,
            Permission::ManageUsers,
            &hierarchy,
        )
        .map_err(|e| hierarchy_cycle_error(e, target.organization_id))?;
        PermissionService::ensure_allowed(decision, actor, "user_service::update_role")?;

        let previous_role = target.role;
        let updated = self
            .user_repo
            .update_role(user_id, role)
            .await?
            .ok_or_else(|| {
                not_found_error("User", user_id, "user_service::update_role")
            })?;

        self.audit_log_service
            .log_action(
                LogActionParams::for_actor(actor, AuditAction::RoleChanged, "user", user_id)
                    .details(format!("Changed role from {} to {}", previous_role, role)),
            )
            .await?;

        log_with_context!(
            tracing::Level::INFO,
            "User role updated",
            "user_id" => user_id,
            "previous_role" => previous_role.as_str(),
            "new_role" => role.as_str(),
            "updated_by" => actor.user_id
        );

        Ok(updated)
    }

    fn ensure_can_manage_users(actor: &Actor, context: &str) -> AppResult<()> {
        let decision = if actor.role.grants(Permission::ManageUsers) {
            AccessDecision::allow()
        } else {
            PermissionService::deny_missing_permission(&actor.role, Permission::ManageUsers)
        };
        PermissionService::ensure_allowed(decision, actor, context)
    }
}
