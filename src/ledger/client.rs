use async_trait::async_trait;

use crate::models::{ActivityEntry, ProgressPatch, Result, UserProgress};

/// Backing store for per-user progression and the XP activity log.
///
/// Writes are last-writer-wins. Callers serialize per-user updates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerAccessor: Send + Sync {
    /// Fetch the record for `user_id`, `None` if the user has never been seen.
    async fn get(&self, user_id: &str) -> Result<Option<UserProgress>>;

    /// Insert a new record and return it as stored.
    async fn create(&self, progress: UserProgress) -> Result<UserProgress>;

    /// Apply a partial update. Fails with `UserNotFound` for unknown users.
    async fn update(&self, user_id: &str, patch: ProgressPatch) -> Result<UserProgress>;

    /// Append to the audit trail. Never read back by the evaluator.
    async fn append_activity(&self, entry: ActivityEntry) -> Result<()>;
}
