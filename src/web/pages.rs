use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use maud::Markup;

use super::PageContext;
use crate::error::{status_text, AppResult};
use crate::store::SnippetStore;
use crate::templates;

pub async fn home(
    State(snippets): State<Arc<dyn SnippetStore>>,
    ctx: PageContext,
) -> AppResult<Markup> {
    let latest = snippets.latest().await?;
    Ok(templates::home(&ctx.data().await?, &latest))
}

pub async fn about(ctx: PageContext) -> AppResult<Markup> {
    Ok(templates::about(&ctx.data().await?))
}

/// Liveness check; touches nothing but the router.
pub async fn ping() -> &'static str {
    "OK"
}

pub async fn not_found() -> Response {
    status_text(StatusCode::NOT_FOUND)
}
