use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::Request;
use axum::ServiceExt;
use tokio::net::TcpListener;
use tokio::signal;
use tower_sessions_sqlx_store::PostgresStore;
use tracing::{info, warn};

use crate::clock::{Clock, SystemClock};
use crate::store::{PgSnippetStore, PgUserStore};
use crate::web::{self, AppState};
use crate::App;

pub async fn run(app: App) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], app.config.port));

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let state = AppState {
        snippets: Arc::new(PgSnippetStore::with_clock(app.pool.clone(), clock.clone())),
        users: Arc::new(PgUserStore::with_clock(app.pool.clone(), clock.clone())),
        clock,
        config: Arc::new(app.config),
    };
    let service = web::app(state, PostgresStore::new(app.pool))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("listening on {addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("failed to listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutting down");
}
