pub mod actions;
pub mod badges;
pub mod levels;

pub use actions::{ActionDefinition, ActionId};
pub use badges::Badge;
pub use levels::{derive_level, LevelTier};

use std::collections::{HashMap, HashSet};

use crate::models::{GamificationError, Result};

/// Immutable action, badge and level tables.
#[derive(Debug, Clone)]
pub struct Catalog {
    actions: HashMap<ActionId, ActionDefinition>,
    badges: Vec<Badge>,
    levels: Vec<LevelTier>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids, zero-XP actions and
    /// level tiers that are not strictly ascending from threshold 0.
    ///
    /// Badges are kept sorted by threshold so unlock order reads naturally.
    pub fn new(
        actions: Vec<ActionDefinition>,
        badges: Vec<Badge>,
        levels: Vec<LevelTier>,
    ) -> Result<Self> {
        Self::validate_actions(&actions)?;
        Self::validate_badges(&badges)?;
        Self::validate_levels(&levels)?;
        Ok(Self::from_parts(actions, badges, levels))
    }

    pub fn standard() -> Self {
        Self::from_parts(
            actions::standard_actions(),
            badges::standard_badges(),
            levels::standard_levels(),
        )
    }

    fn from_parts(
        actions: Vec<ActionDefinition>,
        mut badges: Vec<Badge>,
        levels: Vec<LevelTier>,
    ) -> Self {
        badges.sort_by_key(|b| b.xp_threshold);
        Self {
            actions: actions.into_iter().map(|a| (a.id, a)).collect(),
            badges,
            levels,
        }
    }

    fn validate_actions(actions: &[ActionDefinition]) -> Result<()> {
        let mut seen = HashSet::new();
        for action in actions {
            if action.xp == 0 {
                return Err(GamificationError::InvalidCatalog(format!(
                    "Action {} must award a positive amount of XP",
                    action.id.as_str()
                )));
            }
            if !seen.insert(action.id) {
                return Err(GamificationError::InvalidCatalog(format!(
                    "Duplicate action id: {}",
                    action.id.as_str()
                )));
            }
        }
        Ok(())
    }

    fn validate_badges(badges: &[Badge]) -> Result<()> {
        let mut seen = HashSet::new();
        for badge in badges {
            if !seen.insert(badge.id.as_str()) {
                return Err(GamificationError::InvalidCatalog(format!(
                    "Duplicate badge id: {}",
                    badge.id
                )));
            }
        }
        Ok(())
    }

    fn validate_levels(levels: &[LevelTier]) -> Result<()> {
        let first = levels.first().ok_or_else(|| {
            GamificationError::InvalidCatalog("At least one level tier is required".to_string())
        })?;

        if first.xp_threshold != 0 {
            return Err(GamificationError::InvalidCatalog(format!(
                "Lowest level tier must start at 0 XP, got {}",
                first.xp_threshold
            )));
        }

        if levels.iter().any(|tier| tier.level == 0) {
            return Err(GamificationError::InvalidCatalog(
                "Levels start at 1".to_string(),
            ));
        }

        for pair in levels.windows(2) {
            if pair[1].level <= pair[0].level || pair[1].xp_threshold <= pair[0].xp_threshold {
                return Err(GamificationError::InvalidCatalog(format!(
                    "Level tiers must be strictly ascending (level {} after level {})",
                    pair[1].level, pair[0].level
                )));
            }
        }

        Ok(())
    }

    pub fn action(&self, id: ActionId) -> Option<&ActionDefinition> {
        self.actions.get(&id)
    }

    /// Look up an action by its string key. Unknown keys yield `None`.
    pub fn find_action(&self, key: &str) -> Option<&ActionDefinition> {
        ActionId::from_str(key).and_then(|id| self.actions.get(&id))
    }

    /// Actions in declaration order of `ActionId`.
    pub fn actions(&self) -> Vec<&ActionDefinition> {
        ActionId::ALL
            .iter()
            .filter_map(|id| self.actions.get(id))
            .collect()
    }

    pub fn badges(&self) -> &[Badge] {
        &self.badges
    }

    pub fn badge(&self, id: &str) -> Option<&Badge> {
        self.badges.iter().find(|b| b.id == id)
    }

    pub fn levels(&self) -> &[LevelTier] {
        &self.levels
    }

    pub fn derive_level(&self, total_xp: u64) -> u32 {
        derive_level(&self.levels, total_xp)
    }

    pub fn level_info(&self, level: u32) -> Option<&LevelTier> {
        self.levels.iter().find(|tier| tier.level == level)
    }

    /// Tier for `total_xp`; always present for a validated catalog.
    pub fn tier_for(&self, total_xp: u64) -> &LevelTier {
        let level = self.derive_level(total_xp);
        self.level_info(level).unwrap_or(&self.levels[0])
    }

    pub fn next_tier(&self, level: u32) -> Option<&LevelTier> {
        self.levels.iter().find(|tier| tier.level > level)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_passes_validation() {
        let catalog = Catalog::new(
            actions::standard_actions(),
            badges::standard_badges(),
            levels::standard_levels(),
        );
        assert!(catalog.is_ok());

        let catalog = Catalog::standard();
        assert_eq!(catalog.actions().len(), 17);
        assert_eq!(catalog.badges().len(), 6);
        assert_eq!(catalog.levels().len(), 7);
    }

    #[test]
    fn test_badges_sorted_by_threshold() {
        let catalog = Catalog::standard();
        let thresholds: Vec<u64> = catalog.badges().iter().map(|b| b.xp_threshold).collect();
        assert_eq!(thresholds, vec![10, 200, 200, 500, 500, 1000]);
        assert_eq!(catalog.badges()[0].id, "first_subject");
    }

    #[test]
    fn test_standard_matches_validated_construction() {
        let validated = Catalog::new(
            actions::standard_actions(),
            badges::standard_badges(),
            levels::standard_levels(),
        )
        .unwrap();
        let standard = Catalog::standard();

        assert_eq!(validated.badges(), standard.badges());
        assert_eq!(validated.levels(), standard.levels());
        assert_eq!(validated.actions(), standard.actions());
    }

    #[test]
    fn test_find_action() {
        let catalog = Catalog::standard();
        let action = catalog.find_action("complete_pomodoro").unwrap();
        assert_eq!(action.xp, 25);
        assert!(catalog.find_action("bogus").is_none());
    }

    #[test]
    fn test_duplicate_action_rejected() {
        let mut actions = actions::standard_actions();
        actions.push(ActionDefinition::new(ActionId::AskAi, 3, "again"));
        let err = Catalog::new(actions, badges::standard_badges(), levels::standard_levels())
            .unwrap_err();
        assert!(matches!(err, GamificationError::InvalidCatalog(_)));
    }

    #[test]
    fn test_zero_xp_action_rejected() {
        let actions = vec![ActionDefinition::new(ActionId::DailyLogin, 0, "nothing")];
        assert!(Catalog::new(actions, vec![], levels::standard_levels()).is_err());
    }

    #[test]
    fn test_duplicate_badge_rejected() {
        let mut badges = badges::standard_badges();
        badges.push(Badge::new("ai_explorer", "Again", "dup", "fa-robot", 5));
        assert!(Catalog::new(actions::standard_actions(), badges, levels::standard_levels()).is_err());
    }

    #[test]
    fn test_level_validation() {
        let not_from_zero = vec![LevelTier::new(1, 10, "a", "#fff")];
        assert!(Catalog::new(vec![], vec![], not_from_zero).is_err());

        let not_ascending = vec![
            LevelTier::new(1, 0, "a", "#fff"),
            LevelTier::new(2, 100, "b", "#fff"),
            LevelTier::new(3, 100, "c", "#fff"),
        ];
        assert!(Catalog::new(vec![], vec![], not_ascending).is_err());

        assert!(Catalog::new(vec![], vec![], vec![]).is_err());
    }

    #[test]
    fn test_tier_navigation() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.tier_for(260).title, "Outstanding Learner");
        assert_eq!(catalog.next_tier(3).map(|t| t.xp_threshold), Some(500));
        assert!(catalog.next_tier(7).is_none());
        assert!(catalog.level_info(8).is_none());
    }
}
