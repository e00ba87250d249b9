use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::model::GameShop;

#[derive(Parser)]
#[clap(author, about = DESCRIPTION)]
pub struct Args {
    #[clap(short, long, action, global = true)]
    /// Set this if no logs should be displayed
    pub quiet: bool,
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the achievements of a game merged with the cached unlocks
    Achievements {
        /// Shop the game belongs to (steam, epic, custom)
        shop: GameShop,
        /// Id of the game within its shop
        object_id: String,
        #[clap(long, action)]
        /// Reuse a previously requested catalog if available
        cached: bool,
    },
    /// Replace the cached unlocks of a game with a JSON list of
    /// `{ "name": ..., "unlockTime": ... }` records
    ImportUnlocks {
        shop: GameShop,
        object_id: String,
        #[clap(value_name = "FILE")]
        path: PathBuf,
    },
    /// Print or update the user preferences
    Preferences {
        #[clap(long, value_name = "BOOL")]
        /// Whether descriptions of locked hidden achievements are shown
        show_hidden: Option<bool>,
    },
    /// List all games with cached unlocks
    Cached,
    /// Answer line-delimited JSON requests from stdin
    Serve,
}

static DESCRIPTION: &str = r#"
Merge achievement catalogs with locally cached unlocks.

Requests in serve mode:
  - {"event":"getUnlockedAchievements","objectId":"...","shop":"steam"}
  - {"event":"getUserPreferences"}
  - {"event":"updateUserPreferences","showHiddenAchievementsDescription":true}

Environment:
  - API_URL: base url of the catalog API (required)
  - DATABASE_URL: sqlite database (default: sqlite://achievements.db)
  - LANGUAGE: language of requested catalogs (default: en)"#;
