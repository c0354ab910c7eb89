pub mod sink;

pub use sink::{ChannelSink, LogSink, NotificationSink};

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::catalog::{Badge, LevelTier};
use crate::models::EvaluationResult;

/// User-facing event derived from an `EvaluationResult`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Notification {
    XpGained { amount: u32, message: String },
    LevelUp { tier: LevelTier },
    BadgeEarned { badge: Badge },
}

impl Notification {
    pub fn message(&self) -> String {
        match self {
            Notification::XpGained { amount, message } => format!("+{} XP - {}", amount, message),
            Notification::LevelUp { tier } => format!(
                "Congratulations! You reached level {} - {}",
                tier.level, tier.title
            ),
            Notification::BadgeEarned { badge } => format!("New badge earned: {}", badge.name),
        }
    }

    pub fn icon(&self) -> &str {
        match self {
            Notification::XpGained { .. } => "fa-plus-circle",
            Notification::LevelUp { .. } => "fa-arrow-up",
            Notification::BadgeEarned { badge } => badge.icon.as_str(),
        }
    }
}

/// Fans evaluation outcomes out to subscribed sinks.
#[derive(Default)]
pub struct Notifier {
    sinks: Vec<Arc<dyn NotificationSink>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, sink: Arc<dyn NotificationSink>) {
        self.sinks.push(sink);
    }

    /// Events for one result: XP gained, then level up, then one per badge.
    pub fn events(result: &EvaluationResult) -> Vec<Notification> {
        let mut events = Vec::with_capacity(2 + result.newly_earned_badges.len());

        events.push(Notification::XpGained {
            amount: result.amount,
            message: result.message.clone(),
        });

        if result.leveled_up {
            events.push(Notification::LevelUp {
                tier: result.new_tier.clone(),
            });
        }

        events.extend(
            result
                .newly_earned_badges
                .iter()
                .cloned()
                .map(|badge| Notification::BadgeEarned { badge }),
        );

        events
    }

    /// Deliver every event to every sink and return the events.
    pub fn publish(&self, result: &EvaluationResult) -> Vec<Notification> {
        let events = Self::events(result);
        for event in &events {
            for sink in &self.sinks {
                sink.notify(event);
            }
        }
        events
    }
}
