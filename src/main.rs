#![deny(clippy::all, nonstandard_style, rust_2018_idioms)]

#[macro_use]
extern crate eyre;

#[macro_use]
extern crate tracing;

use std::process::ExitCode;

use clap::Parser;
use eyre::{Context as _, Result};
use serde::Serialize;
use tokio::{fs, runtime::Builder as RuntimeBuilder, signal};

use self::{
    context::Context,
    model::{UnlockRecord, UserPreferences},
    util::{Args, Command},
};

mod client;
mod config;
mod context;
mod database;
mod logging;
mod model;
mod reconcile;
mod util;

fn main() -> ExitCode {
    let args = Args::parse();

    let dotenv = dotenvy::dotenv();
    let _log_worker_guard = logging::init(args.quiet);

    if let Err(err) = dotenv {
        debug!("Did not load .env file: {err}");
    }

    let runtime = RuntimeBuilder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build runtime");

    match runtime.block_on(async_main(args)) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:?}", err.wrap_err("Critical error in main"));

            ExitCode::FAILURE
        }
    }
}

async fn async_main(args: Args) -> Result<()> {
    config::init().context("failed to initialize config")?;

    let ctx = Context::new().await.context("failed to create context")?;

    match args.command {
        Command::Achievements {
            shop,
            object_id,
            cached,
        } => {
            let achievements = ctx
                .get_unlocked_achievements(&object_id, shop, cached)
                .await?;

            print_json(&achievements)
        }
        Command::ImportUnlocks {
            shop,
            object_id,
            path,
        } => {
            let bytes = fs::read(&path)
                .await
                .with_context(|| format!("failed to read `{}`", path.display()))?;

            let unlocks: Vec<UnlockRecord> = serde_json::from_slice(&bytes)
                .with_context(|| format!("failed to deserialize unlocks of `{}`", path.display()))?;

            ctx.store_unlocks(&object_id, shop, unlocks).await
        }
        Command::Preferences { show_hidden } => {
            if let Some(show_hidden_achievements_description) = show_hidden {
                let preferences = UserPreferences {
                    show_hidden_achievements_description,
                };

                ctx.update_user_preferences(preferences).await?;
            }

            print_json(&ctx.user_preferences().await?)
        }
        Command::Cached => {
            for key in ctx.cached_games().await? {
                println!("{key}");
            }

            Ok(())
        }
        Command::Serve => tokio::select! {
            res = ctx.serve() => res,
            res = signal::ctrl_c() => {
                res.context("failed to await ctrl+c")?;
                info!("Received Ctrl+C");

                Ok(())
            }
        },
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{json}");

    Ok(())
}
