// src/service/mod.rs
pub mod audit_log_service;
pub mod organization_hierarchy_service;
pub mod organization_service;
pub mod permission_service;
pub mod role_assignment_policy;
pub mod task_service;
pub mod user_service;
