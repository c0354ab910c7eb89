use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

use crate::{
    ledger::LedgerAccessor,
    models::{ActivityEntry, GamificationError, ProgressPatch, Result, UserProgress},
};

/// Process-local ledger for tests, demos and single-user embedding.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    users: Arc<RwLock<HashMap<String, UserProgress>>>,
    activities: Arc<RwLock<Vec<ActivityEntry>>>,
}

fn poisoned<T>(_: T) -> GamificationError {
    GamificationError::PersistenceError("ledger lock poisoned".to_string())
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activity log entries for one user, oldest first.
    pub fn activities_for(&self, user_id: &str) -> Vec<ActivityEntry> {
        self.activities
            .read()
            .map(|log| log.iter().filter(|e| e.user_id == user_id).cloned().collect())
            .unwrap_or_default()
    }

    pub fn user_count(&self) -> usize {
        self.users.read().map(|u| u.len()).unwrap_or(0)
    }
}

#[async_trait]
impl LedgerAccessor for InMemoryLedger {
    async fn get(&self, user_id: &str) -> Result<Option<UserProgress>> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.get(user_id).cloned())
    }

    async fn create(&self, progress: UserProgress) -> Result<UserProgress> {
        let mut users = self.users.write().map_err(poisoned)?;
        debug!("Creating progress record for {}", progress.user_id);
        users.insert(progress.user_id.clone(), progress.clone());
        Ok(progress)
    }

    async fn update(&self, user_id: &str, patch: ProgressPatch) -> Result<UserProgress> {
        let mut users = self.users.write().map_err(poisoned)?;
        let progress = users
            .get_mut(user_id)
            .ok_or_else(|| GamificationError::UserNotFound(user_id.to_string()))?;
        patch.apply(progress);
        Ok(progress.clone())
    }

    async fn append_activity(&self, entry: ActivityEntry) -> Result<()> {
        self.activities.write().map_err(poisoned)?.push(entry);
        Ok(())
    }
}
