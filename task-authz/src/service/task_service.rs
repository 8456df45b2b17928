// src/service/task_service.rs

use crate::domain::actor::Actor;
use crate::domain::audit_log_model::AuditAction;
use crate::domain::permission::{AccessDecision, Permission};
use crate::domain::task_model::{CreateTask, Task, UpdateTask};
use crate::error::{AppError, AppResult};
use crate::log_with_context;
use crate::repository::task_repository::TaskRepository;
use crate::service::audit_log_service::{AuditLogService, LogActionParams};
use crate::service::organization_hierarchy_service::OrganizationHierarchyService;
use crate::service::permission_service::PermissionService;
use crate::utils::error_helper::{hierarchy_cycle_error, not_found_error};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

const RESOURCE_TYPE: &str = "task";

pub struct TaskService {
    repo: Arc<dyn TaskRepository>,
    hierarchy_service: Arc<OrganizationHierarchyService>,
    audit_log_service: Arc<AuditLogService>,
}

impl TaskService {
    pub fn new(
        repo: Arc<dyn TaskRepository>,
        hierarchy_service: Arc<OrganizationHierarchyService>,
        audit_log_service: Arc<AuditLogService>,
    ) -> Self {
        Self {
            repo,
            hierarchy_service,
            audit_log_service,
        }
    }

    // タスク作成（作成者の組織に属する）
    pub async fn create_task(&self, actor: &Actor, payload: CreateTask) -> AppResult<Task> {
        let decision = PermissionService::decide(
            &actor.role,
            actor.organization_id,
            actor.organization_id,
            Permission::CreateTask,
            false,
        );
        PermissionService::ensure_allowed(decision, actor, "task_service::create_task")?;

        let title = payload.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::BadRequest("title: must not be empty".to_string()));
        }

        let order = match self.repo.max_order_for_user(actor.user_id).await? {
            Some(max_order) => max_order.checked_add(1).ok_or_else(|| {
                AppError::BadRequest(
                    "order: no position left after the current last task".to_string(),
                )
            })?,
            None => 1,
        };
        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            title,
            description: payload.description,
            status: payload.status.unwrap_or_default(),
            category: payload.category.unwrap_or_default(),
            order,
            user_id: actor.user_id,
            organization_id: actor.organization_id,
            created_at: now,
            updated_at: now,
        };

        let created = self.repo.create(task).await?;

        self.audit_log_service
            .log_action(
                LogActionParams::for_actor(actor, AuditAction::Create, RESOURCE_TYPE, created.id)
                    .details(format!("Created task: {}", created.title)),
            )
            .await?;

        log_with_context!(
            tracing::Level::INFO,
            "Task created",
            "task_id" => created.id,
            "user_id" => actor.user_id,
            "organization_id" => actor.organization_id
        );

        Ok(created)
    }

    /// 参照可能な組織のタスクを表示順で取得
    pub async fn list_tasks(&self, actor: &Actor) -> AppResult<Vec<Task>> {
        let decision = PermissionService::decide(
            &actor.role,
            actor.organization_id,
            actor.organization_id,
            Permission::ReadTask,
            false,
        );
        PermissionService::ensure_allowed(decision, actor, "task_service::list_tasks")?;

        let organization_ids = self
            .hierarchy_service
            .accessible_organization_ids(actor)
            .await?;
        let tasks = self.repo.find_by_organization_ids(&organization_ids).await?;

        log_with_context!(
            tracing::Level::DEBUG,
            "Tasks listed",
            "user_id" => actor.user_id,
            "organization_count" => organization_ids.len(),
            "task_count" => tasks.len()
        );

        Ok(tasks)
    }

    pub async fn get_task(&self, actor: &Actor, id: Uuid) -> AppResult<Task> {
        let task = self.find_task(id, "task_service::get_task").await?;
        self.authorize_task(actor, &task, Permission::ReadTask, "task_service::get_task")
            .await?;
        Ok(task)
    }

    pub async fn update_task(&self, actor: &Actor, id: Uuid, payload: UpdateTask) -> AppResult<Task> {
        let mut task = self.find_task(id, "task_service::update_task").await?;
        self.authorize_task(
            actor,
            &task,
            Permission::UpdateTask,
            "task_service::update_task",
        )
        .await?;

        if payload.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(AppError::BadRequest("title: must not be empty".to_string()));
        }

        task.apply(payload);
        let updated = self.repo.update(task).await?;

        self.audit_log_service
            .log_action(
                LogActionParams::for_actor(actor, AuditAction::Update, RESOURCE_TYPE, updated.id)
                    .details(format!("Updated task: {}", updated.title)),
            )
            .await?;

        Ok(updated)
    }

    pub async fn delete_task(&self, actor: &Actor, id: Uuid) -> AppResult<()> {
        let task = self.find_task(id, "task_service::delete_task").await?;
        self.authorize_task(
            actor,
            &task,
            Permission::DeleteTask,
            "task_service::delete_task",
        )
        .await?;

        if !self.repo.delete(task.id).await? {
            return Err(not_found_error(
                "Task",
                task.id,
                "task_service::delete_task",
            ));
        }

        self.audit_log_service
            .log_action(
                LogActionParams::for_actor(actor, AuditAction::Delete, RESOURCE_TYPE, task.id)
                    .details(format!("Deleted task: {}", task.title)),
            )
            .await?;

        log_with_context!(
            tracing::Level::INFO,
            "Task deleted",
            "task_id" => task.id,
            "user_id" => actor.user_id
        );

        Ok(())
    }

    /// 表示順の変更（更新権限が必要）
    pub async fn reorder_task(&self, actor: &Actor, id: Uuid, new_order: i32) -> AppResult<Task> {
        let mut task = self.find_task(id, "task_service::reorder_task").await?;
        self.authorize_task(
            actor,
            &task,
            Permission::UpdateTask,
            "task_service::reorder_task",
        )
        .await?;

        task.order = new_order;
        task.updated_at = Utc::now();
        self.repo.update(task).await
    }

    async fn find_task(&self, id: Uuid, context: &str) -> AppResult<Task> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Task", id, context))
    }

    /// スコープ確認と判定を行い、拒否なら監査ログを残して Forbidden を返す
    async fn authorize_task(
        &self,
        actor: &Actor,
        task: &Task,
        permission: Permission,
        context: &str,
    ) -> AppResult<()> {
        let hierarchy = self.hierarchy_service.hierarchy().await?;
        let decision: AccessDecision = PermissionService::authorize(
            actor,
            task.organization_id,
            Some(task.user_id),
            permission,
            &hierarchy,
        )
        .map_err(|e| hierarchy_cycle_error(e, task.organization_id))?;

        if decision.is_denied() {
            // 監査ログの失敗で拒否の結果が変わらないようにする
            if let Err(e) = self
                .audit_log_service
                .log_denied(actor, RESOURCE_TYPE, task.id, permission, decision)
                .await
            {
                log_with_context!(
                    tracing::Level::WARN,
                    "Failed to record denied access",
                    "task_id" => task.id,
                    "error" => e.to_string()
                );
            }
        }

        PermissionService::ensure_allowed(decision, actor, context)
    }
}
