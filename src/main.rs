//! Snippetbox: a small web application for pasting and sharing text snippets
//! that expire after a fixed time.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod clock;
mod commands;
mod config;
mod error;
mod forms;
mod models;
mod password;
mod store;
mod templates;
mod validation;
mod web;

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "snippetbox", version, about = "Paste and share text snippets")]
struct Cli {
    /// Path to the TOML config file (optional).
    #[arg(long, global = true, env = "SNIPPETBOX_CONFIG", default_value = "snippetbox.toml")]
    config: PathBuf,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the web server (the default).
    Serve,
    /// Provision or tear down the application database.
    Migrate {
        #[command(subcommand)]
        direction: Direction,
    },
    /// Delete expired snippets and sessions.
    PurgeExpired,
}

#[derive(Subcommand, Debug)]
enum Direction {
    Up,
    Down,
}

/// What the long-running commands share: configuration and a connection pool.
pub struct App {
    pub config: Config,
    pub pool: PgPool,
}

impl App {
    async fn connect(config: Config) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .connect(config.database_url()?)
            .await
            .context("failed to connect to database")?;
        Ok(App { config, pool })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // try to load .env, ignoring any errors
    _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load(&cli.config)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => commands::serve::run(App::connect(config).await?).await,
        Command::Migrate { direction } => match direction {
            Direction::Up => commands::migrate::up(&config.migration).await,
            Direction::Down => commands::migrate::down(&config.migration).await,
        },
        Command::PurgeExpired => commands::purge_expired::run(App::connect(config).await?).await,
    }
}
