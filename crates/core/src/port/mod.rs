// Port Layer - Interfaces for external dependencies

pub mod completion_info;
pub mod course_repository;
pub mod criteria_completion_repository;
pub mod criteria_repository;
pub mod string_provider;
pub mod time_provider;

// Re-exports
pub use completion_info::CompletionInfo;
pub use course_repository::CourseRepository;
pub use criteria_completion_repository::CriteriaCompletionRepository;
pub use criteria_repository::CriteriaRepository;
pub use string_provider::{EnglishStrings, StringProvider};
pub use time_provider::TimeProvider;
