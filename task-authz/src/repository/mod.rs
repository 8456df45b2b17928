// src/repository/mod.rs
//
// 永続化層との境界。各トレイトの実装はストレージ側が提供する。
// インメモリ実装はテストと組み込み用途向け。
pub mod audit_log_repository;
pub mod organization_repository;
pub mod task_repository;
pub mod user_repository;
