// src/repository/audit_log_repository.rs

use crate::domain::audit_log_model::AuditLog;
use crate::error::AppResult;
use async_trait::async_trait;
use std::collections::HashSet;
use tokio::sync::RwLock;
use uuid::Uuid;

/// 監査ログの永続化インターフェース（追記のみ）
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    async fn create(&self, audit_log: AuditLog) -> AppResult<AuditLog>;

    /// 指定組織群の監査ログを新しい順に取得
    async fn find_by_organization_ids(
        &self,
        organization_ids: &HashSet<Uuid>,
        limit: usize,
    ) -> AppResult<Vec<AuditLog>>;
}

/// インメモリ実装
#[derive(Default)]
pub struct InMemoryAuditLogRepository {
    logs: RwLock<Vec<AuditLog>>,
}

impl InMemoryAuditLogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 記録済みの全件（テスト用の確認に使う）
    pub async fn all(&self) -> Vec<AuditLog> {
        self.logs.read().await.clone()
    }
}

#[async_trait]
impl AuditLogRepository for InMemoryAuditLogRepository {
    async fn create(&self, audit_log: AuditLog) -> AppResult<AuditLog> {
        self.logs.write().await.push(audit_log.clone());
        Ok(audit_log)
    }

    async fn find_by_organization_ids(
        &self,
        organization_ids: &HashSet<Uuid>,
        limit: usize,
    ) -> AppResult<Vec<AuditLog>> {
        // 追記順に並んでいるので末尾から読めば新しい順になる
        Ok(self
            .logs
            .read()
            .await
            .iter()
            .rev()
            .filter(|log| organization_ids.contains(&log.organization_id))
            .take(limit)
            .cloned()
            .collect())
    }
}
