use thiserror::Error;

#[derive(Error, Debug)]
pub enum GamificationError {
    #[error("Unknown XP action: {0}")]
    UnknownAction(String),

    #[error("Invalid XP amount: {0}")]
    InvalidAmount(u32),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Persistence error: {0}")]
    PersistenceError(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl GamificationError {
    /// True when the backing store failed or rejected a read/write.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            GamificationError::PersistenceError(_)
                | GamificationError::DatabaseError(_)
                | GamificationError::SerializationError(_)
                | GamificationError::UserNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, GamificationError>;
