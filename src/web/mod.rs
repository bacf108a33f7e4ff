//! HTTP surface: routing, middleware and handlers.
//!
//! ## Routes
//!
//! Public:
//! - `GET /` - Latest snippets
//! - `GET /about`
//! - `GET /snippet/view/{id}`
//! - `GET|POST /user/signup`
//! - `GET|POST /user/login`
//! - `GET /static/*` - Assets
//! - `GET /ping` - Health check
//!
//! Login required:
//! - `GET|POST /snippet/create`
//! - `GET /account/view`
//! - `POST /user/logout`

mod context;
mod middleware;
mod pages;
mod session;
mod snippets;
mod users;


use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, FromRef};
use axum::http::Request;
use axum::routing::{get, post};
use axum::{middleware as axum_middleware, Router};
use tower::Layer;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tower_sessions::SessionStore;
use tracing::Level;

pub use context::{Auth, PageContext};

use crate::clock::Clock;
use crate::config::Config;
use crate::store::{SnippetStore, UserStore};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub config: Arc<Config>,
    pub snippets: Arc<dyn SnippetStore>,
    pub users: Arc<dyn UserStore>,
    pub clock: Arc<dyn Clock>,
}

/// Build the application service: the router wrapped in trailing-slash
/// normalisation, which has to run before routing.
pub fn app<S>(state: AppState, session_store: S) -> anyhow::Result<NormalizePath<Router>>
where
    S: SessionStore + Clone,
{
    let router = router(state, session_store)?;
    Ok(NormalizePathLayer::trim_trailing_slash().layer(router))
}

fn router<S>(state: AppState, session_store: S) -> anyhow::Result<Router>
where
    S: SessionStore + Clone,
{
    let sessions = session::layer(session_store, &state.config.session)?;

    let protected = Router::new()
        .route(
            "/snippet/create",
            get(snippets::create).post(snippets::create_post),
        )
        .route("/account/view", get(users::account_view))
        .route("/user/logout", post(users::logout_post))
        .route_layer(axum_middleware::from_fn(middleware::require_authentication));

    let dynamic = Router::new()
        .route("/", get(pages::home))
        .route("/about", get(pages::about))
        .route("/snippet/view/{id}", get(snippets::view))
        .route("/user/signup", get(users::signup).post(users::signup_post))
        .route("/user/login", get(users::login).post(users::login_post))
        .merge(protected)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::authenticate,
        ))
        .layer(sessions);

    let router = Router::new()
        .route("/ping", get(pages::ping))
        .nest_service("/static", ServeDir::new(&state.config.static_dir))
        .merge(dynamic)
        .fallback(pages::not_found)
        .layer(axum_middleware::map_response(middleware::secure_headers))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(
            state.config.limits.max_body_size,
        ))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                tracing::span!(
                    Level::INFO,
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
        .layer(CatchPanicLayer::custom(middleware::handle_panic))
        .with_state(state);

    Ok(router)
}
