// src/service/audit_log_service.rs
use crate::domain::actor::Actor;
use crate::domain::audit_log_model::{AuditAction, AuditLog, AuditLogBuilder};
use crate::domain::permission::{AccessDecision, DenialReason, Permission};
use crate::domain::role_model::RoleProfile;
use crate::error::AppResult;
use crate::log_with_context;
use crate::repository::audit_log_repository::AuditLogRepository;
use crate::service::organization_hierarchy_service::OrganizationHierarchyService;
use crate::service::permission_service::PermissionService;
use crate::utils::error_helper::internal_server_error;
use std::sync::Arc;
use uuid::Uuid;

// 監査ログ記録のためのパラメータ構造体
pub struct LogActionParams {
    pub user_id: Uuid,
    pub user_email: String,
    pub organization_id: Uuid,
    pub action: AuditAction,
    pub resource_type: String,
    pub resource_id: Uuid,
    pub details: Option<String>,
}

impl LogActionParams {
    /// 操作主体の情報を埋めたパラメータを作成
    pub fn for_actor(
        actor: &Actor,
        action: AuditAction,
        resource_type: &str,
        resource_id: Uuid,
    ) -> Self {
        Self {
            user_id: actor.user_id,
            user_email: actor.email.clone(),
            organization_id: actor.organization_id,
            action,
            resource_type: resource_type.to_string(),
            resource_id,
            details: None,
        }
    }

    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

pub struct AuditLogService {
    audit_log_repo: Arc<dyn AuditLogRepository>,
    hierarchy_service: Arc<OrganizationHierarchyService>,
    default_limit: usize,
}

impl AuditLogService {
    pub fn new(
        audit_log_repo: Arc<dyn AuditLogRepository>,
        hierarchy_service: Arc<OrganizationHierarchyService>,
        default_limit: usize,
    ) -> Self {
        Self {
            audit_log_repo,
            hierarchy_service,
            default_limit,
        }
    }

    // 監査ログを記録
    pub async fn log_action(&self, params: LogActionParams) -> AppResult<AuditLog> {
        log_with_context!(
            tracing::Level::DEBUG,
            "Recording audit log",
            "user_id" => params.user_id,
            "action" => params.action.as_str(),
            "resource_type" => &params.resource_type,
            "resource_id" => params.resource_id
        );

        let mut builder =
            AuditLogBuilder::new(params.action, &params.resource_type, params.resource_id)
                .actor(params.user_id, params.user_email)
                .organization_id(params.organization_id);
        if let Some(details) = params.details {
            builder = builder.details(details);
        }

        let audit_log = self
            .audit_log_repo
            .create(builder.build())
            .await
            .map_err(|e| {
                internal_server_error(
                    e,
                    "audit_log_service::log_action",
                    "Failed to create audit log",
                )
            })?;

        log_with_context!(
            tracing::Level::INFO,
            "[AUDIT] action recorded",
            "action" => audit_log.action.as_str(),
            "resource_type" => &audit_log.resource_type,
            "resource_id" => audit_log.resource_id,
            "user_email" => &audit_log.user_email,
            "details" => audit_log.details.as_deref().unwrap_or("")
        );

        Ok(audit_log)
    }

    // 拒否された操作を記録
    pub async fn log_denied(
        &self,
        actor: &Actor,
        resource_type: &str,
        resource_id: Uuid,
        permission: Permission,
        decision: AccessDecision,
    ) -> AppResult<AuditLog> {
        let reason = decision
            .reason
            .map_or("unknown", |r: DenialReason| r.code());
        self.log_action(
            LogActionParams::for_actor(actor, AuditAction::AccessDenied, resource_type, resource_id)
                .details(format!("Denied {}: {}", permission, reason)),
        )
        .await
    }

    /// 操作主体が閲覧できる監査ログを新しい順に取得
    ///
    /// Owner は自組織と子孫組織、Admin は自組織のみ。
    pub async fn list_for_actor(&self, actor: &Actor, limit: Option<usize>) -> AppResult<Vec<AuditLog>> {
        if !actor.role.grants(Permission::ViewAuditLog) {
            PermissionService::ensure_allowed(
                PermissionService::deny_missing_permission(&actor.role, Permission::ViewAuditLog),
                actor,
                "audit_log_service::list_for_actor",
            )?;
        }

        let organization_ids = self
            .hierarchy_service
            .accessible_organization_ids(actor)
            .await?;
        let limit = limit.unwrap_or(self.default_limit);

        let logs = self
            .audit_log_repo
            .find_by_organization_ids(&organization_ids, limit)
            .await?;

        log_with_context!(
            tracing::Level::DEBUG,
            "Audit logs retrieved",
            "user_id" => actor.user_id,
            "organization_count" => organization_ids.len(),
            "returned" => logs.len()
        );

        Ok(logs)
    }
}
