// src/repository/organization_repository.rs

use crate::domain::organization_model::Organization;
use crate::error::AppResult;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// 組織の永続化インターフェース
#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    async fn create_organization(&self, organization: Organization) -> AppResult<Organization>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Organization>>;

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Organization>>;

    /// 階層構築用に全組織を取得
    async fn find_all_organizations(&self) -> AppResult<Vec<Organization>>;

    async fn update_organization(&self, organization: Organization) -> AppResult<Organization>;
}

/// インメモリ実装
#[derive(Default)]
pub struct InMemoryOrganizationRepository {
    organizations: RwLock<HashMap<Uuid, Organization>>,
}

impl InMemoryOrganizationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 既存の組織一覧から作成
    pub fn with_organizations(organizations: impl IntoIterator<Item = Organization>) -> Self {
        Self {
            organizations: RwLock::new(organizations.into_iter().map(|o| (o.id, o)).collect()),
        }
    }
}

#[async_trait]
impl OrganizationRepository for InMemoryOrganizationRepository {
    async fn create_organization(&self, organization: Organization) -> AppResult<Organization> {
        let mut organizations = self.organizations.write().await;
        organizations.insert(organization.id, organization.clone());
        Ok(organization)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Organization>> {
        Ok(self.organizations.read().await.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Organization>> {
        Ok(self
            .organizations
            .read()
            .await
            .values()
            .find(|o| o.name == name)
            .cloned())
    }

    async fn find_all_organizations(&self) -> AppResult<Vec<Organization>> {
        let mut organizations: Vec<Organization> =
            self.organizations.read().await.values().cloned().collect();
        organizations.sort_by_key(|o| o.created_at);
        Ok(organizations)
    }

    async fn update_organization(&self, organization: Organization) -> AppResult<Organization> {
        let mut organizations = self.organizations.write().await;
        organizations.insert(organization.id, organization.clone());
        Ok(organization)
    }
}
