use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow},
    Row,
};
use std::collections::BTreeSet;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::{
    config::DatabaseSettings,
    ledger::LedgerAccessor,
    models::{ActivityEntry, Counters, GamificationError, ProgressPatch, Result, UserProgress},
};

const CREATE_USERS: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        xp INTEGER NOT NULL DEFAULT 0,
        level INTEGER NOT NULL DEFAULT 1,
        badges TEXT NOT NULL DEFAULT '[]',
        total_subjects INTEGER NOT NULL DEFAULT 0,
        completed_lectures INTEGER NOT NULL DEFAULT 0,
        study_sessions INTEGER NOT NULL DEFAULT 0,
        quiz_attempts INTEGER NOT NULL DEFAULT 0,
        created_at DATETIME NOT NULL,
        updated_at DATETIME NOT NULL
    )
"#;

const CREATE_ACTIVITIES: &str = r#"
    CREATE TABLE IF NOT EXISTS activities (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id TEXT NOT NULL,
        action TEXT NOT NULL,
        amount INTEGER NOT NULL,
        message TEXT NOT NULL,
        created_at DATETIME NOT NULL
    )
"#;

/// SQLite-backed ledger with `users` and append-only `activities` tables.
#[derive(Debug, Clone)]
pub struct SqliteLedger {
    pool: SqlitePool,
}

impl SqliteLedger {
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&settings.url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(settings.max_connections)
            .min_connections(settings.min_connections)
            .acquire_timeout(Duration::from_secs(settings.connect_timeout_seconds))
            .connect_with(options)
            .await?;

        info!("Connected to ledger database at {}", settings.url);
        Self::from_pool(pool).await
    }

    /// Private in-memory database. One connection, since every
    /// `sqlite::memory:` connection opens a separate database.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> Result<Self> {
        sqlx::query(CREATE_USERS).execute(&pool).await?;
        sqlx::query(CREATE_ACTIVITIES).execute(&pool).await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_activities_user ON activities (user_id)")
            .execute(&pool)
            .await?;
        Ok(Self { pool })
    }

    /// Most recent activity entries for a user, newest first.
    pub async fn recent_activity(&self, user_id: &str, limit: u32) -> Result<Vec<ActivityEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT user_id, action, amount, message, created_at
            FROM activities
            WHERE user_id = ?
            ORDER BY id DESC
            LIMIT ?
            "#,
        )
        .bind(user_id)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_activity).collect()
    }
}

fn row_to_progress(row: &SqliteRow) -> Result<UserProgress> {
    let badges: String = row.try_get("badges")?;
    let earned_badges: BTreeSet<String> = serde_json::from_str(&badges)?;

    Ok(UserProgress {
        user_id: row.try_get("id")?,
        total_xp: to_u64(row.try_get("xp")?),
        level: to_u32(row.try_get("level")?),
        earned_badges,
        counters: Counters {
            subjects_created: to_u32(row.try_get("total_subjects")?),
            lectures_completed: to_u32(row.try_get("completed_lectures")?),
            study_sessions: to_u32(row.try_get("study_sessions")?),
            quiz_attempts: to_u32(row.try_get("quiz_attempts")?),
        },
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}

fn row_to_activity(row: &SqliteRow) -> Result<ActivityEntry> {
    Ok(ActivityEntry {
        user_id: row.try_get("user_id")?,
        action: row.try_get("action")?,
        amount: to_u32(row.try_get("amount")?),
        message: row.try_get("message")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

// SQLite integers are signed 64-bit; negative values never get written.
fn to_u64(value: i64) -> u64 {
    value.max(0) as u64
}

fn to_u32(value: i64) -> u32 {
    value.clamp(0, i64::from(u32::MAX)) as u32
}

fn to_i64(value: u64) -> Result<i64> {
    i64::try_from(value).map_err(|_| {
        GamificationError::PersistenceError(format!("XP total {} exceeds the storable range", value))
    })
}

#[async_trait]
impl LedgerAccessor for SqliteLedger {
    async fn get(&self, user_id: &str) -> Result<Option<UserProgress>> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_progress).transpose()
    }

    async fn create(&self, progress: UserProgress) -> Result<UserProgress> {
        let badges = serde_json::to_string(&progress.earned_badges)?;
        let total_xp = to_i64(progress.total_xp)?;

        sqlx::query(
            r#"
            INSERT INTO users (id, xp, level, badges, total_subjects, completed_lectures,
                               study_sessions, quiz_attempts, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&progress.user_id)
        .bind(total_xp)
        .bind(i64::from(progress.level))
        .bind(badges)
        .bind(i64::from(progress.counters.subjects_created))
        .bind(i64::from(progress.counters.lectures_completed))
        .bind(i64::from(progress.counters.study_sessions))
        .bind(i64::from(progress.counters.quiz_attempts))
        .bind(progress.created_at)
        .bind(progress.updated_at)
        .execute(&self.pool)
        .await?;

        debug!("Created ledger row for {}", progress.user_id);
        Ok(progress)
    }

    async fn update(&self, user_id: &str, patch: ProgressPatch) -> Result<UserProgress> {
        let badges = patch
            .earned_badges
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let counters = patch.counters;
        let total_xp = patch.total_xp.map(to_i64).transpose()?;

        let result = sqlx::query(
            r#"
            UPDATE users SET
                xp = COALESCE(?, xp),
                level = COALESCE(?, level),
                badges = COALESCE(?, badges),
                total_subjects = COALESCE(?, total_subjects),
                completed_lectures = COALESCE(?, completed_lectures),
                study_sessions = COALESCE(?, study_sessions),
                quiz_attempts = COALESCE(?, quiz_attempts),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(total_xp)
        .bind(patch.level.map(i64::from))
        .bind(badges)
        .bind(counters.map(|c| i64::from(c.subjects_created)))
        .bind(counters.map(|c| i64::from(c.lectures_completed)))
        .bind(counters.map(|c| i64::from(c.study_sessions)))
        .bind(counters.map(|c| i64::from(c.quiz_attempts)))
        .bind(Utc::now())
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(GamificationError::UserNotFound(user_id.to_string()));
        }

        self.get(user_id)
            .await?
            .ok_or_else(|| GamificationError::UserNotFound(user_id.to_string()))
    }

    async fn append_activity(&self, entry: ActivityEntry) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO activities (user_id, action, amount, message, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.user_id)
        .bind(&entry.action)
        .bind(i64::from(entry.amount))
        .bind(&entry.message)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
