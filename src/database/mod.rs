mod keys;
mod preferences;
mod sublevel;

use std::{ops::DerefMut, str::FromStr};

use eyre::{Context as _, Result};
use sqlx::{
    pool::PoolConnection,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Error as SqlxError, Sqlite, SqlitePool,
};

pub use self::{
    keys::{Key, Sublevels},
    sublevel::Sublevel,
};

/// Embedded key-value store partitioned into sublevels.
#[derive(Clone)]
pub struct Database {
    sqlite: SqlitePool,
}

impl Database {
    pub async fn new(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("failed to parse database url `{url}`"))?
            .create_if_missing(true);

        let sqlite = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .context("failed to connect to database")?;

        Self::with_pool(sqlite).await
    }

    /// Private database that lives as long as its single connection.
    #[cfg(test)]
    pub async fn in_memory() -> Result<Self> {
        let sqlite = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .context("failed to open in-memory database")?;

        Self::with_pool(sqlite).await
    }

    pub fn sublevel<T>(&self, name: &'static str) -> Sublevel<T> {
        Sublevel::new(self.clone(), name)
    }

    async fn with_pool(sqlite: SqlitePool) -> Result<Self> {
        let db = Self { sqlite };
        db.migrate().await?;

        Ok(db)
    }

    async fn migrate(&self) -> Result<()> {
        let mut conn = self
            .acquire()
            .await
            .context("failed to acquire connection to migrate database")?;

        let query = sqlx::query(
            r#"
CREATE TABLE IF NOT EXISTS kv (
  sublevel TEXT NOT NULL,
  entry_key TEXT NOT NULL,
  entry_value TEXT NOT NULL,
  PRIMARY KEY (sublevel, entry_key)
)"#,
        );

        query
            .execute(conn.deref_mut())
            .await
            .context("failed to create kv table")?;

        let query = sqlx::query(
            r#"
CREATE TABLE IF NOT EXISTS user_preferences (
  id INTEGER PRIMARY KEY,
  show_hidden_achievements_description BOOLEAN NOT NULL DEFAULT FALSE
)"#,
        );

        query
            .execute(conn.deref_mut())
            .await
            .context("failed to create user_preferences table")?;

        Ok(())
    }

    async fn acquire(&self) -> Result<PoolConnection<Sqlite>, SqlxError> {
        self.sqlite.acquire().await
    }
}
