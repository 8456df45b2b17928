// src/lib.rs
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod repository;
pub mod service;
pub mod utils;

// Re-export commonly used types
pub use domain::permission::{AccessDecision, DenialReason, Permission};
pub use domain::role_model::Role;
pub use error::{AppError, AppResult};
