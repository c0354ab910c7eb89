use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

/// Persisted per-user XP record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProgress {
    pub user_id: String,
    pub total_xp: u64,
    pub level: u32,
    pub earned_badges: BTreeSet<String>,
    pub counters: Counters,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Informational activity counters. Level and badge derivation never read these.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Counters {
    pub subjects_created: u32,
    pub lectures_completed: u32,
    pub study_sessions: u32,
    pub quiz_attempts: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Counter {
    SubjectsCreated,
    LecturesCompleted,
    StudySessions,
    QuizAttempts,
}

impl Counter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Counter::SubjectsCreated => "subjects_created",
            Counter::LecturesCompleted => "lectures_completed",
            Counter::StudySessions => "study_sessions",
            Counter::QuizAttempts => "quiz_attempts",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "subjects_created" | "subjects" => Some(Counter::SubjectsCreated),
            "lectures_completed" | "lectures" => Some(Counter::LecturesCompleted),
            "study_sessions" | "sessions" => Some(Counter::StudySessions),
            "quiz_attempts" | "quizzes" => Some(Counter::QuizAttempts),
            _ => None,
        }
    }
}

impl Counters {
    pub fn get(&self, counter: Counter) -> u32 {
        match counter {
            Counter::SubjectsCreated => self.subjects_created,
            Counter::LecturesCompleted => self.lectures_completed,
            Counter::StudySessions => self.study_sessions,
            Counter::QuizAttempts => self.quiz_attempts,
        }
    }

    pub fn increment(&mut self, counter: Counter) {
        let slot = match counter {
            Counter::SubjectsCreated => &mut self.subjects_created,
            Counter::LecturesCompleted => &mut self.lectures_completed,
            Counter::StudySessions => &mut self.study_sessions,
            Counter::QuizAttempts => &mut self.quiz_attempts,
        };
        *slot = slot.saturating_add(1);
    }
}

impl UserProgress {
    /// Zero state for a user seen for the first time.
    pub fn new(user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.into(),
            total_xp: 0,
            level: 1,
            earned_badges: BTreeSet::new(),
            counters: Counters::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_badge(&self, badge_id: &str) -> bool {
        self.earned_badges.contains(badge_id)
    }
}

/// Partial update of a `UserProgress`. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressPatch {
    pub total_xp: Option<u64>,
    pub level: Option<u32>,
    pub earned_badges: Option<BTreeSet<String>>,
    pub counters: Option<Counters>,
}

impl ProgressPatch {
    pub fn xp_and_level(total_xp: u64, level: u32) -> Self {
        Self {
            total_xp: Some(total_xp),
            level: Some(level),
            ..Default::default()
        }
    }

    pub fn badges(earned_badges: BTreeSet<String>) -> Self {
        Self {
            earned_badges: Some(earned_badges),
            ..Default::default()
        }
    }

    pub fn counters(counters: Counters) -> Self {
        Self {
            counters: Some(counters),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_xp.is_none()
            && self.level.is_none()
            && self.earned_badges.is_none()
            && self.counters.is_none()
    }

    /// Apply the present fields onto `progress` and bump `updated_at`.
    pub fn apply(&self, progress: &mut UserProgress) {
        if let Some(xp) = self.total_xp {
            progress.total_xp = xp;
        }
        if let Some(level) = self.level {
            progress.level = level;
        }
        if let Some(badges) = &self.earned_badges {
            progress.earned_badges = badges.clone();
        }
        if let Some(counters) = self.counters {
            progress.counters = counters;
        }
        progress.updated_at = Utc::now();
    }
}

/// Append-only audit record of one XP award.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityEntry {
    pub user_id: String,
    pub action: String,
    pub amount: u32,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl ActivityEntry {
    pub fn new(user_id: &str, action: &str, amount: u32, message: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            action: action.to_string(),
            amount,
            message: message.to_string(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_zero_state() {
        let progress = UserProgress::new("u1");
        assert_eq!(progress.total_xp, 0);
        assert_eq!(progress.level, 1);
        assert!(progress.earned_badges.is_empty());
        assert_eq!(progress.counters, Counters::default());
    }

    #[test]
    fn test_patch_only_touches_present_fields() {
        let mut progress = UserProgress::new("u1");
        progress.earned_badges.insert("first_subject".to_string());

        ProgressPatch::xp_and_level(120, 2).apply(&mut progress);

        assert_eq!(progress.total_xp, 120);
        assert_eq!(progress.level, 2);
        assert!(progress.has_badge("first_subject"));
    }

    #[test]
    fn test_counter_parsing() {
        assert_eq!(Counter::from_str("study_sessions"), Some(Counter::StudySessions));
        assert_eq!(Counter::from_str("quiz-attempts"), Some(Counter::QuizAttempts));
        assert_eq!(Counter::from_str("subjects"), Some(Counter::SubjectsCreated));
        assert_eq!(Counter::from_str("streaks"), None);
    }

    #[test]
    fn test_counter_increment() {
        let mut counters = Counters::default();
        counters.increment(Counter::LecturesCompleted);
        counters.increment(Counter::LecturesCompleted);
        assert_eq!(counters.get(Counter::LecturesCompleted), 2);
        assert_eq!(counters.get(Counter::QuizAttempts), 0);
    }
}
