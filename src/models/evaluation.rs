use serde::{Deserialize, Serialize};

use crate::catalog::{Badge, LevelTier};

/// Outcome of a single XP award.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvaluationResult {
    pub user_id: String,
    /// Action id, or `custom` for explicit amounts without a known action.
    pub action: String,
    pub amount: u32,
    pub message: String,
    pub previous_xp: u64,
    pub total_xp: u64,
    pub previous_level: u32,
    pub new_level: u32,
    pub new_tier: LevelTier,
    pub leveled_up: bool,
    pub newly_earned_badges: Vec<Badge>,
}

/// Display-ready snapshot of a user's progression.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserStats {
    pub user_id: String,
    pub total_xp: u64,
    pub level: u32,
    pub level_title: String,
    pub level_color: String,
    pub earned_badges: Vec<Badge>,
    pub xp_to_next_level: u64,
    pub progress_to_next_level: f64,
}
