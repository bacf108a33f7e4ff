use anyhow::Context;
use tower_sessions::ExpiredDeletion;
use tower_sessions_sqlx_store::PostgresStore;
use tracing::info;

use crate::store::{PgSnippetStore, SnippetStore};
use crate::App;

/// Delete expired snippets and sessions. Meant to be run periodically.
pub async fn run(app: App) -> anyhow::Result<()> {
    let removed = PgSnippetStore::new(app.pool.clone())
        .purge_expired()
        .await
        .context("failed to delete expired snippets")?;
    info!("deleted {removed} expired snippets");

    PostgresStore::new(app.pool)
        .delete_expired()
        .await
        .context("failed to delete expired sessions")?;
    info!("deleted expired sessions");

    Ok(())
}
