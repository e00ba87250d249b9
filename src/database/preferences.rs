use std::ops::DerefMut;

use eyre::{Context as _, Result};

use crate::model::UserPreferences;

use super::Database;

/// Preferences are a single row.
const PREFERENCES_ID: i64 = 1;

impl Database {
    pub async fn fetch_user_preferences(&self) -> Result<Option<UserPreferences>> {
        let mut conn = self
            .acquire()
            .await
            .context("failed to acquire connection to fetch user preferences")?;

        let query = sqlx::query_scalar::<_, bool>(
            r#"
SELECT
  show_hidden_achievements_description
FROM
  user_preferences
WHERE
  id = ?"#,
        )
        .bind(PREFERENCES_ID);

        let row = query
            .fetch_optional(conn.deref_mut())
            .await
            .context("failed to fetch user preferences")?;

        Ok(row.map(|show_hidden_achievements_description| UserPreferences {
            show_hidden_achievements_description,
        }))
    }

    pub async fn store_user_preferences(&self, preferences: &UserPreferences) -> Result<()> {
        let mut conn = self
            .acquire()
            .await
            .context("failed to acquire connection to upsert user preferences")?;

        let UserPreferences {
            show_hidden_achievements_description,
        } = preferences;

        let query = sqlx::query(
            r#"
INSERT INTO user_preferences (
  id, show_hidden_achievements_description
)
VALUES
  (?, ?) ON CONFLICT (id) DO
UPDATE
SET
  show_hidden_achievements_description = excluded.show_hidden_achievements_description"#,
        )
        .bind(PREFERENCES_ID)
        .bind(*show_hidden_achievements_description);

        query
            .execute(conn.deref_mut())
            .await
            .context("failed to execute user_preferences query")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn absent_preferences() {
        let db = Database::in_memory().await.unwrap();
        assert_eq!(db.fetch_user_preferences().await.unwrap(), None);
    }

    #[tokio::test]
    async fn store_then_update() {
        let db = Database::in_memory().await.unwrap();

        let enabled = UserPreferences {
            show_hidden_achievements_description: true,
        };

        db.store_user_preferences(&enabled).await.unwrap();
        assert_eq!(db.fetch_user_preferences().await.unwrap(), Some(enabled));

        db.store_user_preferences(&UserPreferences::default())
            .await
            .unwrap();

        let fetched = db.fetch_user_preferences().await.unwrap();
        assert_eq!(fetched, Some(UserPreferences::default()));
    }
}
