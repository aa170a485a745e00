// Domain Layer - Pure business logic and entities

pub mod completion;
pub mod course;
pub mod criteria;
pub mod error;

// Re-exports
pub use completion::{
    ActivityCompletion, CompletionState, CriteriaCompletion, PendingCompletion, Timestamp, UserId,
};
pub use course::{Activity, CompletionTracking, Course, CourseModule, ModuleType};
pub use criteria::{
    ActivityCriterion, CompletionCriterion, CriteriaFilter, CriteriaId, CriteriaType,
};
pub use error::DomainError;
