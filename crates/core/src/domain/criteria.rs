// Completion Criteria Domain Model

use super::completion::Timestamp;
use super::error::{DomainError, Result};
use serde::{Deserialize, Serialize};

/// Criterion ID
pub type CriteriaId = i64;

/// Kind of rule a criterion applies
///
/// Only `Activity` is evaluated in this engine; the other kinds exist so
/// criteria rows written by the host decode cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CriteriaType {
    SelfCompletion,
    Date,
    Unenrol,
    Activity,
    Duration,
    Grade,
    Role,
    Course,
}

impl CriteriaType {
    pub fn as_i32(self) -> i32 {
        match self {
            CriteriaType::SelfCompletion => 1,
            CriteriaType::Date => 2,
            CriteriaType::Unenrol => 3,
            CriteriaType::Activity => 4,
            CriteriaType::Duration => 5,
            CriteriaType::Grade => 6,
            CriteriaType::Role => 7,
            CriteriaType::Course => 8,
        }
    }

    pub fn from_i32(value: i32) -> Result<Self> {
        match value {
            1 => Ok(CriteriaType::SelfCompletion),
            2 => Ok(CriteriaType::Date),
            3 => Ok(CriteriaType::Unenrol),
            4 => Ok(CriteriaType::Activity),
            5 => Ok(CriteriaType::Duration),
            6 => Ok(CriteriaType::Grade),
            7 => Ok(CriteriaType::Role),
            8 => Ok(CriteriaType::Course),
            other => Err(DomainError::UnknownCriteriaType(other)),
        }
    }
}

impl std::fmt::Display for CriteriaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CriteriaType::SelfCompletion => write!(f, "SELF"),
            CriteriaType::Date => write!(f, "DATE"),
            CriteriaType::Unenrol => write!(f, "UNENROL"),
            CriteriaType::Activity => write!(f, "ACTIVITY"),
            CriteriaType::Duration => write!(f, "DURATION"),
            CriteriaType::Grade => write!(f, "GRADE"),
            CriteriaType::Role => write!(f, "ROLE"),
            CriteriaType::Course => write!(f, "COURSE"),
        }
    }
}

/// A configured completion rule for a course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionCriterion {
    /// None until persisted
    pub id: Option<CriteriaId>,
    pub course: i64,
    pub criteria_type: CriteriaType,
    /// Module type name of the tracked activity (e.g. "quiz")
    pub module: Option<String>,
    /// Course module id of the tracked activity
    pub module_instance: Option<i64>,
    pub time_end: Option<Timestamp>,
}

impl CompletionCriterion {
    /// New, unsaved activity criterion
    pub fn activity(course: i64, module: impl Into<String>, module_instance: i64) -> Self {
        Self {
            id: None,
            course,
            criteria_type: CriteriaType::Activity,
            module: Some(module.into()),
            module_instance: Some(module_instance),
            time_end: None,
        }
    }
}

/// An activity criterion with its tracked activity resolved
///
/// Construction checks the criterion is of type `Activity` and names both a
/// module type and a course module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityCriterion {
    pub id: CriteriaId,
    pub course: i64,
    pub module: String,
    pub module_instance: i64,
    pub time_end: Option<Timestamp>,
}

impl TryFrom<CompletionCriterion> for ActivityCriterion {
    type Error = DomainError;

    fn try_from(criterion: CompletionCriterion) -> Result<Self> {
        let id = criterion.id.ok_or_else(|| {
            DomainError::ValidationError("activity criterion has not been saved".to_string())
        })?;

        if criterion.criteria_type != CriteriaType::Activity {
            return Err(DomainError::CriteriaTypeMismatch {
                id,
                expected: CriteriaType::Activity.to_string(),
                actual: criterion.criteria_type.to_string(),
            });
        }

        let module = criterion
            .module
            .filter(|m| !m.is_empty())
            .ok_or_else(|| {
                DomainError::ValidationError(format!("criterion {} has no module type", id))
            })?;
        let module_instance = criterion.module_instance.ok_or_else(|| {
            DomainError::ValidationError(format!("criterion {} has no module instance", id))
        })?;

        Ok(Self {
            id,
            course: criterion.course,
            module,
            module_instance,
            time_end: criterion.time_end,
        })
    }
}

/// Lookup parameters for stored criteria. `None` fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CriteriaFilter {
    pub id: Option<CriteriaId>,
    pub course: Option<i64>,
    pub criteria_type: Option<CriteriaType>,
    pub module_instance: Option<i64>,
}
