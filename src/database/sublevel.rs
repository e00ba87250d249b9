use std::{marker::PhantomData, ops::DerefMut};

use eyre::{Context as _, Result};
use futures_util::TryStreamExt;
use serde::{de::DeserializeOwned, Serialize};

use super::{Database, Key};

/// Typed view on the entries of a single sublevel.
///
/// Values are stored as JSON so the store itself stays schema-less.
pub struct Sublevel<T> {
    db: Database,
    name: &'static str,
    _value: PhantomData<fn() -> T>,
}

impl<T> Sublevel<T> {
    pub(super) fn new(db: Database, name: &'static str) -> Self {
        Self {
            db,
            name,
            _value: PhantomData,
        }
    }

    /// All keys of the sublevel in ascending order.
    pub async fn keys(&self) -> Result<Vec<Key>> {
        let mut conn = self
            .db
            .acquire()
            .await
            .with_context(|| format!("failed to acquire connection to list `{}` keys", self.name))?;

        let query = sqlx::query_scalar::<_, String>(
            r#"
SELECT
  entry_key
FROM
  kv
WHERE
  sublevel = ?
ORDER BY
  entry_key"#,
        )
        .bind(self.name);

        query
            .fetch(conn.deref_mut())
            .map_ok(Key::from_stored)
            .try_collect()
            .await
            .with_context(|| format!("failed to fetch all `{}` keys", self.name))
    }
}

impl<T: DeserializeOwned> Sublevel<T> {
    /// Returns `None` if there is no entry for the key.
    pub async fn get(&self, key: &Key) -> Result<Option<T>> {
        let mut conn = self
            .db
            .acquire()
            .await
            .with_context(|| format!("failed to acquire connection to get `{}` entry", self.name))?;

        let query = sqlx::query_scalar::<_, String>(
            r#"
SELECT
  entry_value
FROM
  kv
WHERE
  sublevel = ?
  AND entry_key = ?"#,
        )
        .bind(self.name)
        .bind(key.as_str());

        let value = query
            .fetch_optional(conn.deref_mut())
            .await
            .with_context(|| format!("failed to fetch `{}` entry `{key}`", self.name))?;

        let Some(value) = value else {
            trace!("No `{}` entry for key `{key}`", self.name);

            return Ok(None);
        };

        serde_json::from_str(&value)
            .map(Some)
            .with_context(|| format!("failed to deserialize `{}` entry `{key}`: {value}", self.name))
    }
}

impl<T: Serialize> Sublevel<T> {
    /// Replaces the entry for the key.
    pub async fn put(&self, key: &Key, value: &T) -> Result<()> {
        let value = serde_json::to_string(value)
            .with_context(|| format!("failed to serialize `{}` entry `{key}`", self.name))?;

        let mut conn = self
            .db
            .acquire()
            .await
            .with_context(|| format!("failed to acquire connection to put `{}` entry", self.name))?;

        let query = sqlx::query(
            r#"
INSERT INTO kv (sublevel, entry_key, entry_value)
VALUES
  (?, ?, ?) ON CONFLICT (sublevel, entry_key) DO
UPDATE
SET
  entry_value = excluded.entry_value"#,
        )
        .bind(self.name)
        .bind(key.as_str())
        .bind(value);

        query
            .execute(conn.deref_mut())
            .await
            .with_context(|| format!("failed to put `{}` entry `{key}`", self.name))?;

        debug!("Stored `{}` entry `{key}`", self.name);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        database::Sublevels,
        model::{CachedGameAchievements, GameShop, UnlockRecord},
    };

    use super::*;

    fn record(name: &str, unlock_time: i64) -> UnlockRecord {
        UnlockRecord {
            name: name.into(),
            unlock_time,
        }
    }

    #[tokio::test]
    async fn missing_key_is_none() {
        let db = Database::in_memory().await.unwrap();
        let sublevel = db.sublevel::<CachedGameAchievements>(Sublevels::GAME_ACHIEVEMENTS);

        let key = Key::game(GameShop::Steam, "404");
        assert_eq!(sublevel.get(&key).await.unwrap(), None);
    }

    #[tokio::test]
    async fn put_replaces_previous_value() {
        let db = Database::in_memory().await.unwrap();
        let sublevel = db.sublevel::<CachedGameAchievements>(Sublevels::GAME_ACHIEVEMENTS);
        let key = Key::game(GameShop::Steam, "620");

        let first = CachedGameAchievements {
            unlocked_achievements: vec![record("A", 1), record("B", 2)],
        };

        sublevel.put(&key, &first).await.unwrap();

        let second = CachedGameAchievements {
            unlocked_achievements: vec![record("C", 3)],
        };

        sublevel.put(&key, &second).await.unwrap();

        assert_eq!(sublevel.get(&key).await.unwrap(), Some(second));
    }

    #[tokio::test]
    async fn sublevels_are_separate_namespaces() {
        let db = Database::in_memory().await.unwrap();
        let unlocks = db.sublevel::<CachedGameAchievements>(Sublevels::GAME_ACHIEVEMENTS);
        let other = db.sublevel::<CachedGameAchievements>(Sublevels::GAME_SHOP_CACHE);
        let key = Key::game(GameShop::Epic, "fortnite");

        unlocks
            .put(&key, &CachedGameAchievements::default())
            .await
            .unwrap();

        assert!(unlocks.get(&key).await.unwrap().is_some());
        assert!(other.get(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn keys_are_sorted() {
        let db = Database::in_memory().await.unwrap();
        let sublevel = db.sublevel::<CachedGameAchievements>(Sublevels::GAME_ACHIEVEMENTS);
        let value = CachedGameAchievements::default();

        for (shop, id) in [
            (GameShop::Steam, "20"),
            (GameShop::Epic, "b"),
            (GameShop::Steam, "10"),
        ] {
            sublevel.put(&Key::game(shop, id), &value).await.unwrap();
        }

        let keys: Vec<_> = sublevel.keys().await.unwrap();
        let keys: Vec<_> = keys.iter().map(Key::as_str).collect();

        assert_eq!(keys, ["epic:b", "steam:10", "steam:20"]);
    }

    #[tokio::test]
    async fn undecodable_value_is_an_error() {
        let db = Database::in_memory().await.unwrap();
        let raw = db.sublevel::<serde_json::Value>(Sublevels::GAME_ACHIEVEMENTS);
        let key = Key::game(GameShop::Steam, "1");

        raw.put(&key, &serde_json::json!({ "unlockedAchievements": 42 }))
            .await
            .unwrap();

        let typed = db.sublevel::<CachedGameAchievements>(Sublevels::GAME_ACHIEVEMENTS);
        assert!(typed.get(&key).await.is_err());
    }
}
