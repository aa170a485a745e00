// Criteria Completion Repository Port (Interface)

use crate::domain::{CriteriaCompletion, CriteriaId, PendingCompletion, UserId};
use crate::error::Result;
use async_trait::async_trait;

/// Persistence for per-user criterion completion records
#[async_trait]
pub trait CriteriaCompletionRepository: Send + Sync {
    /// Find the record for a (user, criterion) pair
    async fn find(&self, user_id: UserId, criteria_id: CriteriaId)
        -> Result<Option<CriteriaCompletion>>;

    /// Insert or update the record for its (user, criterion) pair.
    ///
    /// An existing completion time is never overwritten. Returns false
    /// when nothing was written for that reason.
    async fn save(&self, completion: &CriteriaCompletion) -> Result<bool>;

    /// Activity criteria pairs whose tracked activity is complete (or
    /// complete-pass) for an enrolled user of a completion-enabled course,
    /// and which have no completed record yet.
    async fn find_pending_activity_completions(&self) -> Result<Vec<PendingCompletion>>;
}
