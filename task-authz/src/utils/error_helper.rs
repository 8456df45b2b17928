// src/utils/error_helper.rs

//! エラー生成の共通化
//!
//! 生成と同時に `tracing` へ記録し、呼び出し側では `?` で返すだけにする。

use crate::domain::permission::DenialReason;
use crate::error::AppError;
use crate::service::organization_hierarchy_service::HierarchyCycleError;
use tracing::{error, warn};
use uuid::Uuid;

/// 内部エラーを記録し、利用者向けの文言だけを残す
pub fn internal_server_error<E: std::fmt::Display>(
    error: E,
    context: &str,
    user_message: &str,
) -> AppError {
    error!(error = %error, context = %context, "Internal server error occurred");
    AppError::InternalServerError(user_message.to_string())
}

/// 拒否理由から Forbidden を生成
pub fn forbidden_error(reason: DenialReason, context: &str, user_id: Uuid) -> AppError {
    warn!(
        context = %context,
        user_id = %user_id,
        reason_code = reason.code(),
        "Forbidden access attempt"
    );
    AppError::Forbidden(reason.message().to_string())
}

pub fn not_found_error(resource: &str, id: Uuid, context: &str) -> AppError {
    warn!(context = %context, resource = %resource, id = %id, "Resource not found");
    AppError::NotFound(format!("{} with identifier {} not found", resource, id))
}

pub fn conflict_error(message: &str, context: &str) -> AppError {
    warn!(context = %context, message = %message, "Resource conflict occurred");
    AppError::Conflict(message.to_string())
}

/// 組織階層の循環をデータ不整合として記録
pub fn hierarchy_cycle_error(cycle: HierarchyCycleError, queried_organization_id: Uuid) -> AppError {
    error!(
        queried_organization_id = %queried_organization_id,
        cycle_organization_id = %cycle.organization_id,
        "Organization hierarchy cycle detected"
    );
    AppError::DataIntegrity(cycle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forbidden_error_uses_reason_message() {
        let err = forbidden_error(DenialReason::OwnershipRequired, "test", Uuid::new_v4());
        assert!(matches!(err, AppError::Forbidden(msg) if msg == "can only modify own resources"));
    }

    #[test]
    fn test_not_found_error_names_resource() {
        let id = Uuid::new_v4();
        let err = not_found_error("Task", id, "test");
        assert!(matches!(err, AppError::NotFound(msg) if msg == format!("Task with identifier {} not found", id)));
    }

    #[test]
    fn test_hierarchy_cycle_error_keeps_offending_id() {
        let offending = Uuid::new_v4();
        let err = hierarchy_cycle_error(
            HierarchyCycleError {
                organization_id: offending,
            },
            Uuid::new_v4(),
        );
        assert!(matches!(err, AppError::DataIntegrity(c) if c.organization_id == offending));
    }

    #[test]
    fn test_internal_and_conflict_errors() {
        assert!(matches!(
            internal_server_error("disk full", "test", "Failed to create audit log"),
            AppError::InternalServerError(msg) if msg == "Failed to create audit log"
        ));
        assert!(matches!(conflict_error("Email already exists", "test"), AppError::Conflict(_)));
    }
}
