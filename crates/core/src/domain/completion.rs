// Completion Domain Model

use serde::{Deserialize, Serialize};

/// User ID
pub type UserId = i64;

/// Epoch seconds
pub type Timestamp = i64;

/// Activity progress value as stored for a course module and user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompletionState {
    Incomplete,
    Complete,
    CompletePass,
    CompleteFail,
}

impl CompletionState {
    /// Stored integer value
    pub fn as_i32(self) -> i32 {
        match self {
            CompletionState::Incomplete => 0,
            CompletionState::Complete => 1,
            CompletionState::CompletePass => 2,
            CompletionState::CompleteFail => 3,
        }
    }

    /// Decode a stored integer. Unknown values read as incomplete.
    pub fn from_i32(value: i32) -> Self {
        match value {
            1 => CompletionState::Complete,
            2 => CompletionState::CompletePass,
            3 => CompletionState::CompleteFail,
            _ => CompletionState::Incomplete,
        }
    }

    /// Whether this state satisfies an activity criterion
    pub fn is_complete(self) -> bool {
        matches!(
            self,
            CompletionState::Complete | CompletionState::CompletePass
        )
    }
}

impl std::fmt::Display for CompletionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompletionState::Incomplete => write!(f, "INCOMPLETE"),
            CompletionState::Complete => write!(f, "COMPLETE"),
            CompletionState::CompletePass => write!(f, "COMPLETE_PASS"),
            CompletionState::CompleteFail => write!(f, "COMPLETE_FAIL"),
        }
    }
}

/// Per-user completion data for one course module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityCompletion {
    pub course_module_id: i64,
    pub user_id: UserId,
    pub state: CompletionState,
    pub time_modified: Timestamp,
}

impl ActivityCompletion {
    /// Completion data for a user with no stored row
    pub fn untracked(course_module_id: i64, user_id: UserId) -> Self {
        Self {
            course_module_id,
            user_id,
            state: CompletionState::Incomplete,
            time_modified: 0,
        }
    }
}

/// A user's completion record for one criterion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriteriaCompletion {
    /// None until persisted
    pub id: Option<i64>,
    pub user_id: UserId,
    pub course: i64,
    pub criteria_id: i64,
    pub time_completed: Option<Timestamp>,
}

impl CriteriaCompletion {
    /// Pending (not yet completed) record
    pub fn new(user_id: UserId, course: i64, criteria_id: i64) -> Self {
        Self {
            id: None,
            user_id,
            course,
            criteria_id,
            time_completed: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.time_completed.is_some()
    }

    /// Mark complete at `time_completed`.
    ///
    /// Returns false (and leaves the record untouched) when it is already
    /// complete, so the original completion time is preserved.
    pub fn mark_complete(&mut self, time_completed: Timestamp) -> bool {
        if self.is_complete() {
            return false;
        }
        self.time_completed = Some(time_completed);
        true
    }
}

/// A (criterion, user) pair found by the cron sweep
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCompletion {
    pub course: i64,
    pub criteria_id: i64,
    pub user_id: UserId,
    /// When the activity reached its completion state
    pub time_completed: Timestamp,
}

impl PendingCompletion {
    pub fn into_completion(self) -> (CriteriaCompletion, Timestamp) {
        (
            CriteriaCompletion::new(self.user_id, self.course, self.criteria_id),
            self.time_completed,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_complete_and_pass_satisfy() {
        assert!(CompletionState::Complete.is_complete());
        assert!(CompletionState::CompletePass.is_complete());
        assert!(!CompletionState::Incomplete.is_complete());
        assert!(!CompletionState::CompleteFail.is_complete());
    }

    #[test]
    fn test_state_decoding() {
        for state in [
            CompletionState::Incomplete,
            CompletionState::Complete,
            CompletionState::CompletePass,
            CompletionState::CompleteFail,
        ] {
            assert_eq!(CompletionState::from_i32(state.as_i32()), state);
        }
        assert_eq!(CompletionState::from_i32(-1), CompletionState::Incomplete);
        assert_eq!(CompletionState::from_i32(17), CompletionState::Incomplete);
    }

    #[test]
    fn test_mark_complete_only_once() {
        let mut completion = CriteriaCompletion::new(5, 2, 9);
        assert!(!completion.is_complete());

        assert!(completion.mark_complete(1000));
        assert_eq!(completion.time_completed, Some(1000));

        assert!(!completion.mark_complete(2000));
        assert_eq!(completion.time_completed, Some(1000));
    }
}
