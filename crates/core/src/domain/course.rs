// Course & Activity Domain Model

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub full_name: String,
    pub enable_completion: bool,
}

/// Registered activity module type (quiz, assign, forum, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleType {
    pub id: i64,
    pub name: String,
}

/// How a course module tracks completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompletionTracking {
    None,
    Manual,
    Automatic,
}

impl CompletionTracking {
    pub fn as_i32(self) -> i32 {
        match self {
            CompletionTracking::None => 0,
            CompletionTracking::Manual => 1,
            CompletionTracking::Automatic => 2,
        }
    }

    pub fn from_i32(value: i32) -> Self {
        match value {
            1 => CompletionTracking::Manual,
            2 => CompletionTracking::Automatic,
            _ => CompletionTracking::None,
        }
    }
}

/// An activity instance placed in a course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseModule {
    pub id: i64,
    pub course: i64,
    /// Module type id (see `ModuleType`)
    pub module: i64,
    /// Activity instance id within its module type
    pub instance: i64,
    pub completion: CompletionTracking,
    pub completion_view: bool,
    pub completion_grade_item_number: Option<i64>,
}

/// Activity instance record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub module: String,
    pub id: i64,
    pub name: String,
}
