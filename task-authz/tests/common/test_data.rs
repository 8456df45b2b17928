// tests/common/test_data.rs

use super::TestApp;
use task_authz::domain::actor::Actor;
use task_authz::domain::organization_model::{CreateOrganization, Organization};
use task_authz::domain::role_model::Role;
use task_authz::domain::task_model::CreateTask;
use task_authz::domain::user_model::{RegisterUser, User};
use task_authz::repository::user_repository::UserRepository;
use uuid::Uuid;

// === タスク関連のテストデータ ===

/// テスト用のタスク作成データを生成
pub fn create_test_task() -> CreateTask {
    CreateTask {
        title: format!("Test Task {}", &Uuid::new_v4().to_string()[..8]),
        description: Some("Test Description".to_string()),
        ..Default::default()
    }
}

/// タイトルを指定してタスク作成データを生成
pub fn create_task_with_title(title: &str) -> CreateTask {
    CreateTask {
        title: title.to_string(),
        ..Default::default()
    }
}

// === 組織・ユーザー関連のテストデータ ===

/// 親子関係をもつ組織 A → B → C を作成
pub async fn create_org_chain(app: &TestApp) -> (Organization, Organization, Organization) {
    let a = create_org(app, "Org A", None).await;
    let b = create_org(app, "Org B", Some(a.id)).await;
    let c = create_org(app, "Org C", Some(b.id)).await;
    (a, b, c)
}

pub async fn create_org(app: &TestApp, name: &str, parent_id: Option<Uuid>) -> Organization {
    app.organization_service
        .create_organization(CreateOrganization {
            name: name.to_string(),
            parent_id,
        })
        .await
        .unwrap()
}

/// 指定ロールのユーザーを組織に直接作成し、操作主体として返す
pub async fn create_actor(app: &TestApp, role: Role, organization_id: Uuid) -> Actor {
    let email = format!(
        "{}{}@example.com",
        role.as_str(),
        &Uuid::new_v4().to_string()[..8]
    );
    let user = app
        .user_repo
        .create(User::new(email, "Test User", role, organization_id))
        .await
        .unwrap();
    Actor::from(&user)
}

/// 登録リクエストを生成
pub fn create_register_data(email: &str, organization_id: Option<Uuid>) -> RegisterUser {
    RegisterUser {
        email: email.to_string(),
        name: "Registered User".to_string(),
        organization_id,
    }
}
