// src/repository/task_repository.rs

use crate::domain::task_model::Task;
use crate::error::AppResult;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use uuid::Uuid;

/// タスクの永続化インターフェース
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn create(&self, task: Task) -> AppResult<Task>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Task>>;

    /// 指定組織群のタスクを表示順で取得
    async fn find_by_organization_ids(&self, organization_ids: &HashSet<Uuid>)
        -> AppResult<Vec<Task>>;

    /// ユーザーのタスクの最大表示順
    async fn max_order_for_user(&self, user_id: Uuid) -> AppResult<Option<i32>>;

    async fn update(&self, task: Task) -> AppResult<Task>;

    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// インメモリ実装
#[derive(Default)]
pub struct InMemoryTaskRepository {
    tasks: RwLock<HashMap<Uuid, Task>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn create(&self, task: Task) -> AppResult<Task> {
        self.tasks.write().await.insert(task.id, task.clone());
        Ok(task)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Task>> {
        Ok(self.tasks.read().await.get(&id).cloned())
    }

    async fn find_by_organization_ids(
        &self,
        organization_ids: &HashSet<Uuid>,
    ) -> AppResult<Vec<Task>> {
        let mut tasks: Vec<Task> = self
            .tasks
            .read()
            .await
            .values()
            .filter(|t| organization_ids.contains(&t.organization_id))
            .cloned()
            .collect();
        tasks.sort_by(|a, b| a.order.cmp(&b.order).then(a.created_at.cmp(&b.created_at)));
        Ok(tasks)
    }

    async fn max_order_for_user(&self, user_id: Uuid) -> AppResult<Option<i32>> {
        Ok(self
            .tasks
            .read()
            .await
            .values()
            .filter(|t| t.user_id == user_id)
            .map(|t| t.order)
            .max())
    }

    async fn update(&self, task: Task) -> AppResult<Task> {
        self.tasks.write().await.insert(task.id, task.clone());
        Ok(task)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.tasks.write().await.remove(&id).is_some())
    }
}
