// tests/logging_test.rs

mod common;

use task_authz::log_with_context;
use uuid::Uuid;

#[test]
fn test_log_with_context_macro() {
    common::init_test_env();

    let organization_id = Uuid::new_v4();

    // マクロが各レベルで展開できることを確認
    log_with_context!(tracing::Level::INFO, "Test info message");
    log_with_context!(
        tracing::Level::DEBUG,
        "Test debug message",
        "organization_id" => organization_id
    );
    log_with_context!(
        tracing::Level::WARN,
        "Test warn message",
        "reason_code" => "permission_denied",
        "context" => "logging_test"
    );
    log_with_context!(
        tracing::Level::ERROR,
        "Test error message",
        "cycle_organization_id" => organization_id,
    );
}

#[test]
fn test_init_tracing_is_idempotent() {
    common::init_test_env();

    // 既に登録済みでも失敗しない
    task_authz::logging::init_tracing("task_authz=info");
    task_authz::logging::init_tracing("task_authz=debug");
}
