// Activity Completion Port (Interface)

use crate::domain::{ActivityCompletion, CourseModule, UserId};
use crate::error::Result;
use async_trait::async_trait;

/// Per-user activity completion lookups
#[async_trait]
pub trait CompletionInfo: Send + Sync {
    /// Completion data for `user_id` on `course_module`.
    ///
    /// Users without a stored row get `ActivityCompletion::untracked`.
    async fn get_data(
        &self,
        course_module: &CourseModule,
        user_id: UserId,
    ) -> Result<ActivityCompletion>;
}
