pub mod service;

pub use service::{GamificationService, CUSTOM_ACTION};
