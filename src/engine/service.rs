use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    catalog::{Badge, Catalog},
    config::GamificationSettings,
    ledger::LedgerAccessor,
    models::{
        ActivityEntry, Counter, Counters, EvaluationResult, GamificationError, ProgressPatch,
        Result, UserProgress, UserStats,
    },
};

/// Action tag recorded for explicit awards without a catalogued action.
pub const CUSTOM_ACTION: &str = "custom";

/// XP, level and badge evaluator over an injected catalog and ledger.
pub struct GamificationService {
    catalog: Arc<Catalog>,
    ledger: Arc<dyn LedgerAccessor>,
    settings: GamificationSettings,
    user_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

struct ResolvedAward {
    action: String,
    amount: u32,
    message: String,
}

impl GamificationService {
    pub fn new(
        catalog: Arc<Catalog>,
        ledger: Arc<dyn LedgerAccessor>,
        settings: GamificationSettings,
    ) -> Self {
        Self {
            catalog,
            ledger,
            settings,
            user_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Award XP for `action_id`, or for an explicit amount that overrides
    /// the catalogued one.
    ///
    /// Nothing is written when the award cannot be resolved. After that the
    /// XP/level write, the activity append and the badge write happen in
    /// sequence; a failure part way leaves earlier writes in place, and the
    /// next award re-derives badges from the stored total.
    pub async fn award_xp(
        &self,
        user_id: &str,
        action_id: Option<&str>,
        explicit_amount: Option<u32>,
    ) -> Result<EvaluationResult> {
        let award = self.resolve_award(action_id, explicit_amount)?;

        let user_lock = self.lock_for(user_id).await;
        let result = {
            let _guard = user_lock.lock().await;
            self.apply_award(user_id, award).await
        };
        self.release_lock(user_id, user_lock).await;
        result
    }

    async fn apply_award(&self, user_id: &str, award: ResolvedAward) -> Result<EvaluationResult> {
        let progress = self.load_or_create(user_id).await?;

        let previous_xp = progress.total_xp;
        let previous_level = self.catalog.derive_level(previous_xp);
        let total_xp = previous_xp.saturating_add(u64::from(award.amount));
        let new_level = self.catalog.derive_level(total_xp);

        self.ledger
            .update(user_id, ProgressPatch::xp_and_level(total_xp, new_level))
            .await?;

        self.ledger
            .append_activity(ActivityEntry::new(
                user_id,
                &award.action,
                award.amount,
                &award.message,
            ))
            .await?;

        let newly_earned_badges = self.newly_unlocked(&progress, total_xp);
        if !newly_earned_badges.is_empty() {
            let mut earned = progress.earned_badges.clone();
            earned.extend(newly_earned_badges.iter().map(|b| b.id.clone()));
            self.ledger
                .update(user_id, ProgressPatch::badges(earned))
                .await?;
        }

        let leveled_up = new_level > previous_level;
        if leveled_up {
            info!("User {} reached level {}", user_id, new_level);
        }
        for badge in &newly_earned_badges {
            info!("User {} earned badge {}", user_id, badge.id);
        }
        info!("Awarded {} XP for {} to {}", award.amount, award.action, user_id);

        Ok(EvaluationResult {
            user_id: user_id.to_string(),
            action: award.action,
            amount: award.amount,
            message: award.message,
            previous_xp,
            total_xp,
            previous_level,
            new_level,
            new_tier: self.catalog.tier_for(total_xp).clone(),
            leveled_up,
            newly_earned_badges,
        })
    }

    /// Current progression for display. Users without a record report the
    /// zero state; nothing is created.
    pub async fn user_stats(&self, user_id: &str) -> Result<UserStats> {
        let progress = self
            .ledger
            .get(user_id)
            .await?
            .unwrap_or_else(|| UserProgress::new(user_id));

        let total_xp = progress.total_xp;
        let tier = self.catalog.tier_for(total_xp);

        let (xp_to_next_level, progress_to_next_level) = match self.catalog.next_tier(tier.level) {
            Some(next) => {
                let span = (next.xp_threshold - tier.xp_threshold) as f64;
                let into_tier = (total_xp - tier.xp_threshold) as f64;
                (next.xp_threshold - total_xp, into_tier / span * 100.0)
            }
            None => (0, 100.0),
        };

        let earned_badges = self
            .catalog
            .badges()
            .iter()
            .filter(|b| progress.has_badge(&b.id))
            .cloned()
            .collect();

        Ok(UserStats {
            user_id: progress.user_id,
            total_xp,
            level: tier.level,
            level_title: tier.title.clone(),
            level_color: tier.color.clone(),
            earned_badges,
            xp_to_next_level,
            progress_to_next_level,
        })
    }

    /// Bump one informational counter. Does not affect XP, level or badges.
    pub async fn record_counter(&self, user_id: &str, counter: Counter) -> Result<Counters> {
        let user_lock = self.lock_for(user_id).await;
        let result = {
            let _guard = user_lock.lock().await;
            self.bump_counter(user_id, counter).await
        };
        self.release_lock(user_id, user_lock).await;
        result
    }

    async fn bump_counter(&self, user_id: &str, counter: Counter) -> Result<Counters> {
        let progress = self.load_or_create(user_id).await?;
        let mut counters = progress.counters;
        counters.increment(counter);

        let updated = self
            .ledger
            .update(user_id, ProgressPatch::counters(counters))
            .await?;

        debug!(
            "User {} {} = {}",
            user_id,
            counter.as_str(),
            updated.counters.get(counter)
        );
        Ok(updated.counters)
    }

    fn resolve_award(
        &self,
        action_id: Option<&str>,
        explicit_amount: Option<u32>,
    ) -> Result<ResolvedAward> {
        let definition = action_id.and_then(|id| self.catalog.find_action(id));

        if let Some(amount) = explicit_amount {
            if amount == 0 || amount > self.settings.max_explicit_amount {
                return Err(GamificationError::InvalidAmount(amount));
            }
            return Ok(match definition {
                Some(def) => ResolvedAward {
                    action: def.id.as_str().to_string(),
                    amount,
                    message: def.message.clone(),
                },
                None => ResolvedAward {
                    action: CUSTOM_ACTION.to_string(),
                    amount,
                    message: self.settings.custom_message(amount),
                },
            });
        }

        match definition {
            Some(def) => Ok(ResolvedAward {
                action: def.id.as_str().to_string(),
                amount: def.xp,
                message: def.message.clone(),
            }),
            None => {
                let key = action_id.unwrap_or_default();
                warn!("Unknown XP action: {:?}", key);
                Err(GamificationError::UnknownAction(key.to_string()))
            }
        }
    }

    async fn load_or_create(&self, user_id: &str) -> Result<UserProgress> {
        match self.ledger.get(user_id).await? {
            Some(progress) => Ok(progress),
            None => {
                info!("Creating progress record for new user {}", user_id);
                self.ledger.create(UserProgress::new(user_id)).await
            }
        }
    }

    fn newly_unlocked(&self, progress: &UserProgress, total_xp: u64) -> Vec<Badge> {
        self.catalog
            .badges()
            .iter()
            .filter(|b| !progress.has_badge(&b.id) && b.is_unlocked_at(total_xp))
            .cloned()
            .collect()
    }

    async fn lock_for(&self, user_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.user_locks.lock().await;
        locks
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drop the caller's handle and forget the user's lock once nobody else
    /// holds or waits on it. Clones are only taken under the map lock.
    async fn release_lock(&self, user_id: &str, user_lock: Arc<Mutex<()>>) {
        let mut locks = self.user_locks.lock().await;
        drop(user_lock);
        if locks
            .get(user_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(user_id);
        }
    }
}
