// src/service/organization_service.rs
use crate::domain::organization_model::{CreateOrganization, Organization};
use crate::error::{AppError, AppResult};
use crate::log_with_context;
use crate::repository::organization_repository::OrganizationRepository;
use crate::service::organization_hierarchy_service::{
    OrganizationHierarchy, OrganizationHierarchyService,
};
use crate::utils::error_helper::{hierarchy_cycle_error, not_found_error};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

pub struct OrganizationService {
    organization_repo: Arc<dyn OrganizationRepository>,
    hierarchy_service: Arc<OrganizationHierarchyService>,
    default_organization_name: String,
    // 親子関係の変更は循環確認から書き込みまでを直列に行う
    reparent_lock: Mutex<()>,
}

impl OrganizationService {
    pub fn new(
        organization_repo: Arc<dyn OrganizationRepository>,
        hierarchy_service: Arc<OrganizationHierarchyService>,
        default_organization_name: impl Into<String>,
    ) -> Self {
        Self {
            organization_repo,
            hierarchy_service,
            default_organization_name: default_organization_name.into(),
            reparent_lock: Mutex::new(()),
        }
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Organization>> {
        self.organization_repo.find_by_id(id).await
    }

    // 組織の作成
    pub async fn create_organization(&self, payload: CreateOrganization) -> AppResult<Organization> {
        let name = payload.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::BadRequest(
                "Organization name must not be empty".to_string(),
            ));
        }

        let organization = match payload.parent_id {
            Some(parent_id) => {
                self.organization_repo
                    .find_by_id(parent_id)
                    .await?
                    .ok_or_else(|| {
                        not_found_error(
                            "Parent organization",
                            parent_id,
                            "organization_service::create_organization",
                        )
                    })?;
                Organization::with_parent(name, parent_id)
            }
            None => Organization::new(name),
        };

        let created = self
            .organization_repo
            .create_organization(organization)
            .await?;
        self.hierarchy_service.invalidate().await;

        log_with_context!(
            tracing::Level::INFO,
            "Organization created",
            "organization_id" => created.id,
            "parent_id" => created.parent_id,
            "name" => &created.name
        );

        Ok(created)
    }

    /// 既定の組織を取得（なければ作成）
    pub async fn find_or_create_default(&self) -> AppResult<Organization> {
        if let Some(existing) = self
            .organization_repo
            .find_by_name(&self.default_organization_name)
            .await?
        {
            return Ok(existing);
        }

        self.create_organization(CreateOrganization {
            name: self.default_organization_name.clone(),
            parent_id: None,
        })
        .await
    }

    /// 親組織の付け替え（None でルートにする）
    ///
    /// このサービスを通る変更同士では循環は作られない。リポジトリへ直接書き込まれた
    /// 循環は、参照時に `HierarchyCycleError` として検出される。
    pub async fn set_parent(
        &self,
        organization_id: Uuid,
        new_parent_id: Option<Uuid>,
    ) -> AppResult<Organization> {
        let _guard = self.reparent_lock.lock().await;

        let mut organization = self
            .organization_repo
            .find_by_id(organization_id)
            .await?
            .ok_or_else(|| {
                not_found_error(
                    "Organization",
                    organization_id,
                    "organization_service::set_parent",
                )
            })?;

        if let Some(parent_id) = new_parent_id {
            if parent_id == organization_id {
                return Err(AppError::BadRequest(
                    "Organization cannot be its own parent".to_string(),
                ));
            }
            if self.organization_repo.find_by_id(parent_id).await?.is_none() {
                return Err(not_found_error(
                    "Parent organization",
                    parent_id,
                    "organization_service::set_parent",
                ));
            }

            // キャッシュではなく現在の保存内容で循環を確認する
            let organizations = self.organization_repo.find_all_organizations().await?;
            let hierarchy = OrganizationHierarchy::build(&organizations);
            let creates_cycle = hierarchy
                .would_create_cycle(organization_id, parent_id)
                .map_err(|e| hierarchy_cycle_error(e, organization_id))?;
            if creates_cycle {
                log_with_context!(
                    tracing::Level::WARN,
                    "Rejected organization re-parenting that would create a cycle",
                    "organization_id" => organization_id,
                    "new_parent_id" => parent_id
                );
                return Err(AppError::BadRequest(
                    "Circular dependency detected".to_string(),
                ));
            }
        }

        organization.parent_id = new_parent_id;
        organization.updated_at = Utc::now();
        let updated = self
            .organization_repo
            .update_organization(organization)
            .await?;
        self.hierarchy_service.invalidate().await;

        log_with_context!(
            tracing::Level::INFO,
            "Organization parent updated",
            "organization_id" => organization_id,
            "parent_id" => new_parent_id
        );

        Ok(updated)
    }

    /// 現在の組織階層
    pub async fn hierarchy(&self) -> AppResult<Arc<OrganizationHierarchy>> {
        self.hierarchy_service.hierarchy().await
    }
}
