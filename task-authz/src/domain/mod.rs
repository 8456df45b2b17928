// src/domain/mod.rs
pub mod actor;
pub mod audit_log_model;
pub mod organization_model;
pub mod permission;
pub mod role_model;
pub mod task_model;
pub mod task_status;
pub mod user_model;
