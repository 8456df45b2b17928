// src/domain/task_model.rs
use crate::domain::task_status::{TaskCategory, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// タスク
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub category: TaskCategory,
    pub order: i32,
    pub user_id: Uuid,
    pub organization_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// 部分更新を適用
    pub fn apply(&mut self, payload: UpdateTask) {
        if let Some(title) = payload.title {
            self.title = title;
        }
        if let Some(description) = payload.description {
            self.description = Some(description);
        }
        if let Some(status) = payload.status {
            self.status = status;
        }
        if let Some(category) = payload.category {
            self.category = category;
        }
        if let Some(order) = payload.order {
            self.order = order;
        }
        self.updated_at = Utc::now();
    }
}

/// タスク作成リクエスト
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub category: Option<TaskCategory>,
}

/// タスク更新リクエスト
#[derive(Clone, Debug, Default, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub category: Option<TaskCategory>,
    pub order: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task(user_id: Uuid) -> Task {
        let now = Utc::now();
        Task {
            id: Uuid::new_v4(),
            title: "Write report".to_string(),
            description: None,
            status: TaskStatus::Todo,
            category: TaskCategory::Other,
            order: 1,
            user_id,
            organization_id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_apply_partial_update() {
        let user_id = Uuid::new_v4();
        let mut task = sample_task(user_id);

        task.apply(UpdateTask {
            status: Some(TaskStatus::Done),
            order: Some(7),
            ..Default::default()
        });

        assert_eq!(task.title, "Write report");
        assert_eq!(task.status, TaskStatus::Done);
        assert_eq!(task.order, 7);
        assert_eq!(task.user_id, user_id);
    }
}
