//! Persistence implementations

pub mod call_task_repository;
pub mod database;

pub use call_task_repository::PgCallTaskRepository;
pub use database::{create_pool, run_migrations, DatabaseConfig};
