use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub xp_threshold: u64,
}

impl Badge {
    pub fn new(id: &str, name: &str, description: &str, icon: &str, xp_threshold: u64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            xp_threshold,
        }
    }

    pub fn is_unlocked_at(&self, total_xp: u64) -> bool {
        total_xp >= self.xp_threshold
    }
}

// Declaration order is not threshold order; the catalog sorts on construction.
pub fn standard_badges() -> Vec<Badge> {
    vec![
        Badge::new("first_subject", "The Beginning", "Add your first subject", "fa-star", 10),
        Badge::new("study_master", "Study Master", "Complete 50 study sessions", "fa-graduation-cap", 1000),
        Badge::new("quiz_champion", "Quiz Champion", "Get 10 perfect scores", "fa-trophy", 500),
        Badge::new("ai_explorer", "AI Explorer", "Use the AI assistant 100 times", "fa-robot", 200),
        Badge::new("planning_pro", "Planning Pro", "Create 20 study plans", "fa-calendar", 200),
        Badge::new("consistency_king", "Consistency King", "Stay active for a month", "fa-crown", 500),
    ]
}
