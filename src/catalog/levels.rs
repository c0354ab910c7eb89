use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LevelTier {
    pub level: u32,
    pub xp_threshold: u64,
    pub title: String,
    pub color: String,
}

impl LevelTier {
    pub fn new(level: u32, xp_threshold: u64, title: &str, color: &str) -> Self {
        Self {
            level,
            xp_threshold,
            title: title.to_string(),
            color: color.to_string(),
        }
    }
}

pub fn standard_levels() -> Vec<LevelTier> {
    vec![
        LevelTier::new(1, 0, "Beginner", "#6b7280"),
        LevelTier::new(2, 100, "Active Student", "#10b981"),
        LevelTier::new(3, 250, "Outstanding Learner", "#3b82f6"),
        LevelTier::new(4, 500, "Advanced Researcher", "#8b5cf6"),
        LevelTier::new(5, 1000, "Academic Expert", "#f59e0b"),
        LevelTier::new(6, 2000, "Distinguished Scholar", "#ef4444"),
        LevelTier::new(7, 4000, "Legend of Knowledge", "#ec4899"),
    ]
}

/// Highest tier whose threshold is at or below `total_xp`, scanning from the top.
/// Falls back to level 1 when no tier matches.
pub fn derive_level(tiers: &[LevelTier], total_xp: u64) -> u32 {
    tiers
        .iter()
        .rev()
        .find(|tier| total_xp >= tier.xp_threshold)
        .map(|tier| tier.level)
        .unwrap_or(1)
}
