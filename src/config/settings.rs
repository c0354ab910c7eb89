use serde::{Deserialize, Serialize};
use config::{Config, ConfigError, File};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub gamification: GamificationSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub version: String,
    pub log_level: String,
    pub environment: Environment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GamificationSettings {
    /// Message for explicit awards with no catalogued action; `{amount}` is substituted.
    pub custom_award_message: String,
    pub max_explicit_amount: u32,
}

impl Default for GamificationSettings {
    fn default() -> Self {
        Self {
            custom_award_message: "You earned {amount} XP!".to_string(),
            max_explicit_amount: 10_000,
        }
    }
}

impl GamificationSettings {
    pub fn custom_message(&self, amount: u32) -> String {
        self.custom_award_message.replace("{amount}", &amount.to_string())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app: AppSettings {
                name: "Study XP".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                log_level: "info".to_string(),
                environment: Environment::Development,
            },
            database: DatabaseSettings {
                url: "sqlite://study_xp.db".to_string(),
                max_connections: 5,
                min_connections: 1,
                connect_timeout_seconds: 30,
            },
            gamification: GamificationSettings::default(),
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("STUDY_XP").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::from(path.as_ref()))
            .build()?;

        s.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.database.url.trim().is_empty() {
            return Err("Database url must not be empty".to_string());
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(format!(
                "min_connections ({}) exceeds max_connections ({})",
                self.database.min_connections, self.database.max_connections
            ));
        }

        if self.gamification.max_explicit_amount == 0 {
            return Err("max_explicit_amount must be positive".to_string());
        }

        if !self.gamification.custom_award_message.contains("{amount}") {
            return Err("custom_award_message must contain an {amount} placeholder".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_settings() {
        let mut settings = Settings::default();
        settings.database.min_connections = 10;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.gamification.custom_award_message = "Well done!".to_string();
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.gamification.max_explicit_amount = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_custom_message_substitution() {
        let settings = GamificationSettings::default();
        assert_eq!(settings.custom_message(42), "You earned 42 XP!");
    }

    #[test]
    fn test_from_file_overrides_defaults() {
        let dir = std::env::temp_dir().join(format!("study_xp_cfg_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.toml");
        std::fs::write(
            &path,
            "[gamification]\nmax_explicit_amount = 250\n\n[database]\nurl = \"sqlite::memory:\"\n",
        )
        .unwrap();

        let settings = Settings::from_file(&path).unwrap();
        assert_eq!(settings.gamification.max_explicit_amount, 250);
        assert_eq!(settings.database.url, "sqlite::memory:");
        assert_eq!(settings.app.log_level, "info");

        std::fs::remove_dir_all(&dir).ok();
    }
}
