// Course Repository Port (Interface)

use crate::domain::{Activity, Course, CourseModule, ModuleType};
use crate::error::Result;
use async_trait::async_trait;

/// Read access to courses, their modules and activity instances
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Find course by ID
    async fn find_course(&self, id: i64) -> Result<Option<Course>>;

    /// Find course module by ID
    async fn find_course_module(&self, id: i64) -> Result<Option<CourseModule>>;

    /// List all registered module types
    async fn list_module_types(&self) -> Result<Vec<ModuleType>>;

    /// Find an activity instance of the given module type
    async fn find_activity(&self, module: &str, instance: i64) -> Result<Option<Activity>>;
}
