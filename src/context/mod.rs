use eyre::{Context as _, Result};

use crate::{client::Client, config::Config, database::Database};

use self::catalog::Catalog;

mod achievements;
mod catalog;
mod serve;

pub struct Context<C = Catalog> {
    db: Database,
    catalog: C,
}

impl Context {
    pub async fn new() -> Result<Self> {
        let config = Config::get();

        let db = Database::new(&config.database_url)
            .await
            .context("failed to create database")?;

        let client = Client::new(&config.api_url.to_string())
            .context("failed to create catalog client")?;

        let catalog = Catalog::new(client, &db, &config.language);

        Ok(Self { db, catalog })
    }
}

#[cfg(test)]
impl<C> Context<C> {
    pub fn with_catalog(db: Database, catalog: C) -> Self {
        Self { db, catalog }
    }
}
