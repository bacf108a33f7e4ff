use std::any::Any;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use tower_sessions::Session;
use tracing::error;

use super::session::{AUTHENTICATED_USER_ID, REDIRECT_PATH_AFTER_LOGIN};
use super::Auth;
use crate::error::AppResult;
use crate::store::UserStore;

const CONTENT_SECURITY_POLICY: &str =
    "default-src 'self'; style-src 'self' fonts.googleapis.com; font-src fonts.gstatic.com";

/// Resolve the session's user, if any, into an [`Auth`] request extension.
/// A user id that no longer matches an account is ignored.
pub async fn authenticate(
    State(users): State<Arc<dyn UserStore>>,
    session: Session,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let user_id = match session.get::<i32>(AUTHENTICATED_USER_ID).await? {
        Some(id) if users.exists(id).await? => Some(id),
        _ => None,
    };

    request.extensions_mut().insert(Auth { user_id });
    Ok(next.run(request).await)
}

pub async fn require_authentication(
    auth: Auth,
    session: Session,
    request: Request,
    next: Next,
) -> AppResult<Response> {
    if !auth.is_authenticated() {
        // only something a browser can come back to with a GET
        if matches!(*request.method(), Method::GET | Method::HEAD) {
            session
                .insert(REDIRECT_PATH_AFTER_LOGIN, request.uri().path())
                .await?;
        }
        return Ok(Redirect::to("/user/login").into_response());
    }

    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    Ok(response)
}

pub async fn secure_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(CONTENT_SECURITY_POLICY),
    );
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("origin-when-cross-origin"),
    );
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("deny"));
    headers.insert(header::X_XSS_PROTECTION, HeaderValue::from_static("0"));
    response
}

pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    error!("handler panicked: {details}");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONNECTION, "close")],
        "Internal Server Error",
    )
        .into_response()
}
