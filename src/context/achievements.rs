use eyre::Result;

use crate::{
    database::{Key, Sublevels},
    model::{CachedGameAchievements, GameShop, UnlockRecord, UserAchievement, UserPreferences},
    reconcile::reconcile,
};

use super::{catalog::CatalogSource, Context};

impl<C: CatalogSource> Context<C> {
    /// Catalog of a game merged with the user's cached unlocks.
    ///
    /// Only a failing catalog request is an error; unreadable local
    /// state is treated as empty.
    pub async fn get_unlocked_achievements(
        &self,
        object_id: &str,
        shop: GameShop,
        use_cached_data: bool,
    ) -> Result<Vec<UserAchievement>> {
        let key = Key::game(shop, object_id);

        let (unlocks, preferences, catalog) = tokio::join!(
            self.cached_unlocks(&key),
            self.user_preferences_or_default(),
            self.catalog.fetch(object_id, shop, use_cached_data),
        );

        let catalog = catalog?;

        let achievements = reconcile(
            &catalog,
            &unlocks,
            preferences.show_hidden_achievements_description,
        );

        debug!(
            "Reconciled {} achievement(s) for `{key}` with {} cached unlock(s)",
            achievements.len(),
            unlocks.len(),
        );

        Ok(achievements)
    }
}

impl<C> Context<C> {
    /// Replaces the cached unlocks of a game.
    pub async fn store_unlocks(
        &self,
        object_id: &str,
        shop: GameShop,
        unlocked_achievements: Vec<UnlockRecord>,
    ) -> Result<()> {
        let key = Key::game(shop, object_id);
        let count = unlocked_achievements.len();

        let cached = CachedGameAchievements {
            unlocked_achievements,
        };

        self.db
            .sublevel(Sublevels::GAME_ACHIEVEMENTS)
            .put(&key, &cached)
            .await?;

        info!("Stored {count} unlock(s) for `{key}`");

        Ok(())
    }

    /// Keys of all games with cached unlocks.
    pub async fn cached_games(&self) -> Result<Vec<Key>> {
        self.db
            .sublevel::<CachedGameAchievements>(Sublevels::GAME_ACHIEVEMENTS)
            .keys()
            .await
    }

    pub async fn user_preferences(&self) -> Result<UserPreferences> {
        self.db
            .fetch_user_preferences()
            .await
            .map(Option::unwrap_or_default)
    }

    pub async fn update_user_preferences(&self, preferences: UserPreferences) -> Result<()> {
        self.db.store_user_preferences(&preferences).await?;
        info!("Updated user preferences: {preferences:?}");

        Ok(())
    }

    async fn cached_unlocks(&self, key: &Key) -> Vec<UnlockRecord> {
        let sublevel = self
            .db
            .sublevel::<CachedGameAchievements>(Sublevels::GAME_ACHIEVEMENTS);

        match sublevel.get(key).await {
            Ok(Some(cached)) => cached.unlocked_achievements,
            Ok(None) => Vec::new(),
            Err(err) => {
                let wrap = format!("Failed to read cached unlocks of `{key}`; assuming none");
                warn!("{:?}", err.wrap_err(wrap));

                Vec::new()
            }
        }
    }

    async fn user_preferences_or_default(&self) -> UserPreferences {
        match self.user_preferences().await {
            Ok(preferences) => preferences,
            Err(err) => {
                warn!("{:?}", err.wrap_err("Failed to read user preferences"));

                UserPreferences::default()
            }
        }
    }
}
