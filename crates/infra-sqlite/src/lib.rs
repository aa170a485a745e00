// Completion Infrastructure - SQLite Adapter
// Implements: CourseRepository, CompletionInfo, CriteriaRepository,
// CriteriaCompletionRepository

mod completion_repository;
mod connection;
mod course_repository;
mod criteria_repository;
mod error;
mod migration;

pub use completion_repository::SqliteCompletionRepository;
pub use connection::create_pool;
pub use course_repository::SqliteCourseRepository;
pub use criteria_repository::SqliteCriteriaRepository;
pub use migration::run_migrations;

use completion_core::application::CompletionPorts;
use completion_core::port::{StringProvider, TimeProvider};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Wire every persistence port to one SQLite pool
pub fn sqlite_ports(
    pool: SqlitePool,
    strings: Arc<dyn StringProvider>,
    time_provider: Arc<dyn TimeProvider>,
) -> CompletionPorts {
    let completions = Arc::new(SqliteCompletionRepository::new(pool.clone()));

    CompletionPorts {
        criteria: Arc::new(SqliteCriteriaRepository::new(pool.clone())),
        completions: completions.clone(),
        courses: Arc::new(SqliteCourseRepository::new(pool)),
        completion_info: completions,
        strings,
        time_provider,
    }
}
