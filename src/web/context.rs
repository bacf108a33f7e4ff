use std::convert::Infallible;

use anyhow::anyhow;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::{DateTime, Datelike, Utc};
use tower_sessions::Session;

use super::session::FLASH;
use super::AppState;
use crate::error::AppResult;
use crate::templates::TemplateData;

/// Login state of the current request, set by the `authenticate` middleware.
/// Requests that never passed through it count as anonymous.
#[derive(Debug, Clone, Copy, Default)]
pub struct Auth {
    pub user_id: Option<i32>,
}

impl Auth {
    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }
}

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Auth>().copied().unwrap_or_default())
    }
}

/// Everything a page handler needs besides its own state: the session, the
/// login state and the request time.
pub struct PageContext {
    session: Session,
    auth: Auth,
    now: DateTime<Utc>,
}

impl PageContext {
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn user_id(&self) -> Option<i32> {
        self.auth.user_id
    }

    /// Queue a message for the next rendered page.
    pub async fn flash(&self, message: &str) -> AppResult<()> {
        self.session.insert(FLASH, message).await?;
        Ok(())
    }

    /// Collect the shared template data, consuming any pending flash message.
    pub async fn data(&self) -> AppResult<TemplateData> {
        let flash = self.session.remove::<String>(FLASH).await?;
        Ok(TemplateData {
            current_year: self.now.year(),
            flash,
            is_authenticated: self.auth.is_authenticated(),
        })
    }
}

impl FromRequestParts<AppState> for PageContext {
    type Rejection = crate::error::AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(status, message)| anyhow!("no session on request: {message} ({status})"))?;
        let auth = parts.extensions.get::<Auth>().copied().unwrap_or_default();

        Ok(PageContext {
            session,
            auth,
            now: state.clock.now(),
        })
    }
}
