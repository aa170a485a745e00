// Criteria Repository Port (Interface)

use crate::domain::{CompletionCriterion, CriteriaFilter, CriteriaId};
use crate::error::Result;
use async_trait::async_trait;

/// Persistence for configured completion criteria
#[async_trait]
pub trait CriteriaRepository: Send + Sync {
    /// Insert a new criterion, returning its ID
    async fn insert(&self, criterion: &CompletionCriterion) -> Result<CriteriaId>;

    /// Find criteria matching the filter, ordered by ID
    async fn fetch(&self, filter: &CriteriaFilter) -> Result<Vec<CompletionCriterion>>;
}
