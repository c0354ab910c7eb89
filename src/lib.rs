pub mod models;
pub mod config;
pub mod catalog;
pub mod ledger;
pub mod engine;
pub mod notify;

pub use models::{
    EvaluationResult, UserProgress, UserStats, Counter, Counters, GamificationError, Result,
};
pub use catalog::{ActionId, Badge, Catalog, LevelTier};
pub use crate::config::{Settings, GamificationSettings};
pub use engine::GamificationService;
pub use ledger::{LedgerAccessor, InMemoryLedger, SqliteLedger};
pub use notify::{Notification, Notifier};
