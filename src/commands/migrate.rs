use std::str::FromStr;
use std::sync::LazyLock;

use anyhow::{bail, Context};
use regex::Regex;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, Connection};
use tower_sessions_sqlx_store::PostgresStore;
use tracing::info;

use crate::config::Migration;

/// Schema of the application tables.
pub const SETUP_SQL: &str = include_str!("../../migrations/setup.sql");

static IDENTIFIER_RX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z_][a-z0-9_]{0,62}$").expect("identifier regex should compile")
});

/// Create the application database, its tables and the role the web server
/// connects as.
pub async fn up(settings: &Migration) -> anyhow::Result<()> {
    let db_name = identifier(&settings.db_name)?;
    let db_user = identifier(&settings.db_user)?;
    let Some(password) = settings.db_password.as_deref() else {
        bail!("migration.db_password must be set to create the application role");
    };

    let admin = admin_options(settings)?;
    let mut conn = admin
        .connect()
        .await
        .context("failed to connect as database administrator")?;

    info!("creating database {db_name}");
    sqlx::raw_sql(&format!("CREATE DATABASE {db_name}"))
        .execute(&mut conn)
        .await
        .with_context(|| format!("failed to create database {db_name}"))?;

    info!("creating role {db_user}");
    sqlx::raw_sql(&format!(
        "CREATE ROLE {db_user} WITH LOGIN PASSWORD {}",
        quote_literal(password)
    ))
    .execute(&mut conn)
    .await
    .with_context(|| format!("failed to create role {db_user}"))?;
    conn.close().await.ok();

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect_with(admin.database(db_name))
        .await
        .with_context(|| format!("failed to connect to {db_name}"))?;

    sqlx::raw_sql(SETUP_SQL)
        .execute(&pool)
        .await
        .context("failed to create tables")?;
    PostgresStore::new(pool.clone())
        .migrate()
        .await
        .context("failed to create session table")?;

    sqlx::raw_sql(&grants(db_user))
        .execute(&pool)
        .await
        .with_context(|| format!("failed to grant privileges to {db_user}"))?;
    pool.close().await;

    info!("database {db_name} is ready");
    Ok(())
}

/// Drop the application database and role, if present.
pub async fn down(settings: &Migration) -> anyhow::Result<()> {
    let db_name = identifier(&settings.db_name)?;
    let db_user = identifier(&settings.db_user)?;

    let mut conn = admin_options(settings)?
        .connect()
        .await
        .context("failed to connect as database administrator")?;

    info!("dropping database {db_name}");
    sqlx::raw_sql(&format!("DROP DATABASE IF EXISTS {db_name}"))
        .execute(&mut conn)
        .await
        .with_context(|| format!("failed to drop database {db_name}"))?;

    info!("dropping role {db_user}");
    sqlx::raw_sql(&format!("DROP ROLE IF EXISTS {db_user}"))
        .execute(&mut conn)
        .await
        .with_context(|| format!("failed to drop role {db_user}"))?;

    conn.close().await.ok();
    Ok(())
}

fn admin_options(settings: &Migration) -> anyhow::Result<PgConnectOptions> {
    PgConnectOptions::from_str(&settings.admin_url).context("invalid migration.admin_url")
}

fn grants(db_user: &str) -> String {
    format!(
        "GRANT SELECT, INSERT, UPDATE, DELETE ON snippets, users TO {db_user};
         GRANT USAGE, SELECT ON SEQUENCE snippets_id_seq, users_id_seq TO {db_user};
         GRANT USAGE ON SCHEMA tower_sessions TO {db_user};
         GRANT SELECT, INSERT, UPDATE, DELETE ON ALL TABLES IN SCHEMA tower_sessions TO {db_user};"
    )
}

/// Names are spliced into DDL, which cannot take bind parameters.
fn identifier(name: &str) -> anyhow::Result<&str> {
    if IDENTIFIER_RX.is_match(name) {
        Ok(name)
    } else {
        bail!("{name:?} is not a plain SQL identifier (lowercase letters, digits and underscores)")
    }
}

fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
