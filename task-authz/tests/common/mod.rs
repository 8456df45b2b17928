// tests/common/mod.rs
#![allow(dead_code)]

pub mod test_data;

use std::sync::{Arc, Once};
use task_authz::config::AppConfig;
use task_authz::repository::audit_log_repository::InMemoryAuditLogRepository;
use task_authz::repository::organization_repository::InMemoryOrganizationRepository;
use task_authz::repository::task_repository::InMemoryTaskRepository;
use task_authz::repository::user_repository::InMemoryUserRepository;
use task_authz::service::audit_log_service::AuditLogService;
use task_authz::service::organization_hierarchy_service::OrganizationHierarchyService;
use task_authz::service::organization_service::OrganizationService;
use task_authz::service::role_assignment_policy::EmailRoleAssignmentPolicy;
use task_authz::service::task_service::TaskService;
use task_authz::service::user_service::UserService;

// テスト環境の初期化を一度だけ実行
static INIT: Once = Once::new();

/// テスト環境を初期化
pub fn init_test_env() {
    INIT.call_once(|| {
        if std::path::Path::new(".env.test").exists() {
            dotenvy::from_filename(".env.test").ok();
        }

        // テスト用のログ設定
        let _ = tracing_subscriber::fmt()
            .with_env_filter("task_authz=debug")
            .with_test_writer()
            .try_init();
    });
}

/// インメモリリポジトリで組み立てたサービス一式
pub struct TestApp {
    pub config: AppConfig,
    pub organization_repo: Arc<InMemoryOrganizationRepository>,
    pub task_repo: Arc<InMemoryTaskRepository>,
    pub user_repo: Arc<InMemoryUserRepository>,
    pub audit_log_repo: Arc<InMemoryAuditLogRepository>,
    pub hierarchy_service: Arc<OrganizationHierarchyService>,
    pub organization_service: Arc<OrganizationService>,
    pub audit_log_service: Arc<AuditLogService>,
    pub task_service: TaskService,
    pub user_service: UserService,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(AppConfig::for_testing())
    }

    pub fn with_config(config: AppConfig) -> Self {
        init_test_env();

        let organization_repo = Arc::new(InMemoryOrganizationRepository::new());
        let task_repo = Arc::new(InMemoryTaskRepository::new());
        let user_repo = Arc::new(InMemoryUserRepository::new());
        let audit_log_repo = Arc::new(InMemoryAuditLogRepository::new());

        let hierarchy_service = Arc::new(if config.hierarchy_cache_enabled {
            OrganizationHierarchyService::with_cache(organization_repo.clone())
        } else {
            OrganizationHierarchyService::new(organization_repo.clone())
        });
        let organization_service = Arc::new(OrganizationService::new(
            organization_repo.clone(),
            hierarchy_service.clone(),
            config.default_organization_name.clone(),
        ));
        let audit_log_service = Arc::new(AuditLogService::new(
            audit_log_repo.clone(),
            hierarchy_service.clone(),
            config.audit_log_default_limit,
        ));
        let task_service = TaskService::new(
            task_repo.clone(),
            hierarchy_service.clone(),
            audit_log_service.clone(),
        );
        let user_service = UserService::new(
            user_repo.clone(),
            organization_service.clone(),
            hierarchy_service.clone(),
            audit_log_service.clone(),
            Arc::new(EmailRoleAssignmentPolicy::from_config(&config.role_policy)),
        );

        Self {
            config,
            organization_repo,
            task_repo,
            user_repo,
            audit_log_repo,
            hierarchy_service,
            organization_service,
            audit_log_service,
            task_service,
            user_service,
        }
    }
}
