use std::future::Future;

use eyre::{Context as _, Result};

use crate::{
    client::Client,
    database::{Database, Key, Sublevel, Sublevels},
    model::{AchievementDefinition, GameShop},
};

/// Source of a game's achievement catalog.
pub trait CatalogSource {
    /// With `use_cached_data`, a previously retrieved catalog may be
    /// returned instead of requesting it again.
    fn fetch(
        &self,
        object_id: &str,
        shop: GameShop,
        use_cached_data: bool,
    ) -> impl Future<Output = Result<Vec<AchievementDefinition>>> + Send;
}

/// Catalog requested from the API and cached per language.
pub struct Catalog {
    client: Client,
    cache: Sublevel<Vec<AchievementDefinition>>,
    language: Box<str>,
}

impl Catalog {
    pub fn new(client: Client, db: &Database, language: &str) -> Self {
        Self {
            client,
            cache: db.sublevel(Sublevels::GAME_SHOP_CACHE),
            language: language.into(),
        }
    }

    async fn cached(&self, key: &Key) -> Option<Vec<AchievementDefinition>> {
        match self.cache.get(key).await {
            Ok(Some(catalog)) => {
                debug!("Using cached catalog `{key}`");

                Some(catalog)
            }
            Ok(None) => {
                debug!("No cached catalog `{key}`");

                None
            }
            Err(err) => {
                warn!("{:?}", err.wrap_err("Failed to read cached catalog"));

                None
            }
        }
    }
}

impl CatalogSource for Catalog {
    async fn fetch(
        &self,
        object_id: &str,
        shop: GameShop,
        use_cached_data: bool,
    ) -> Result<Vec<AchievementDefinition>> {
        let key = Key::game_shop_cache_item(shop, object_id, &self.language);

        if use_cached_data {
            if let Some(catalog) = self.cached(&key).await {
                return Ok(catalog);
            }
        }

        let catalog = self
            .client
            .get_game_achievements(object_id, shop, &self.language)
            .await
            .with_context(|| format!("failed to request achievement catalog `{key}`"))?;

        info!("Received {} achievement definitions for `{key}`", catalog.len());

        if let Err(err) = self.cache.put(&key, &catalog).await {
            warn!("{:?}", err.wrap_err("Failed to cache catalog"));
        }

        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Nothing listens on the discard port so live requests fail fast.
    const UNREACHABLE_API: &str = "http://127.0.0.1:9";

    fn definition(name: &str) -> AchievementDefinition {
        AchievementDefinition {
            name: name.into(),
            display_name: Some(format!("The {name}").into()),
            description: "desc".into(),
            hidden_description: None,
            icon: "https://cdn/icon.jpg".into(),
            icongray: "https://cdn/".into(),
            hidden: false,
        }
    }

    #[tokio::test]
    async fn cached_catalog_is_used_when_allowed() {
        let db = Database::in_memory().await.unwrap();
        let client = Client::new(UNREACHABLE_API).unwrap();
        let catalog = Catalog::new(client, &db, "en");

        let cached = vec![definition("A"), definition("B")];
        let key = Key::game_shop_cache_item(GameShop::Steam, "70", "en");
        catalog.cache.put(&key, &cached).await.unwrap();

        let fetched = catalog.fetch("70", GameShop::Steam, true).await.unwrap();

        assert_eq!(fetched, cached);
    }

    #[tokio::test]
    async fn cache_is_bypassed_without_permission() {
        let db = Database::in_memory().await.unwrap();
        let client = Client::new(UNREACHABLE_API).unwrap();
        let catalog = Catalog::new(client, &db, "en");

        let key = Key::game_shop_cache_item(GameShop::Steam, "70", "en");
        catalog.cache.put(&key, &vec![definition("A")]).await.unwrap();

        assert!(catalog.fetch("70", GameShop::Steam, false).await.is_err());
    }

    #[tokio::test]
    async fn cache_is_per_language() {
        let db = Database::in_memory().await.unwrap();
        let client = Client::new(UNREACHABLE_API).unwrap();
        let catalog = Catalog::new(client, &db, "de");

        let key = Key::game_shop_cache_item(GameShop::Steam, "70", "en");
        catalog.cache.put(&key, &vec![definition("A")]).await.unwrap();

        assert!(catalog.fetch("70", GameShop::Steam, true).await.is_err());
    }
}
