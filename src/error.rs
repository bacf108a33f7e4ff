use axum::extract::rejection::FormRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::store::StoreError;

pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AppError {
    #[error("not found")]
    NotFound,
    #[error("malformed form data")]
    BadRequest {
        #[from]
        source: FormRejection,
    },
    #[error("store error")]
    Store { source: StoreError },
    #[error("session error")]
    Session {
        #[from]
        source: tower_sessions::session::Error,
    },
    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for AppError {
    fn from(source: StoreError) -> Self {
        match source {
            StoreError::NotFound => AppError::NotFound,
            _ => AppError::Store { source },
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            // a streamed body that outgrew the limit is not a malformed form
            AppError::BadRequest { source } if source.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Store { .. } | AppError::Session { .. } | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        if status_code.is_server_error() {
            // log the whole chain; the client only ever sees the status text
            let chain = anyhow::Error::from(self);
            tracing::error!("request failed: {chain:#}");
        } else {
            tracing::debug!(error = %self, status = %status_code, "client error");
        }

        status_text(status_code)
    }
}

/// A plain-text response carrying only the canonical reason phrase.
pub fn status_text(status_code: StatusCode) -> Response {
    let reason = status_code.canonical_reason().unwrap_or("Unknown");
    (status_code, reason).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn store_not_found_becomes_404() {
        let err = AppError::from(StoreError::NotFound);
        assert!(matches!(err, AppError::NotFound));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn internal_errors_do_not_leak() {
        let err = AppError::from(anyhow::anyhow!("password for db is hunter2"));
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_of(response).await, "Internal Server Error");
    }

    #[tokio::test]
    async fn store_failures_are_500() {
        let err = AppError::from(StoreError::PasswordHash("bad salt".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn client_error_statuses() {
        for status in [StatusCode::BAD_REQUEST, StatusCode::UNPROCESSABLE_ENTITY] {
            let response = status_text(status);
            assert_eq!(response.status(), status);
            assert_eq!(
                body_of(response).await,
                status.canonical_reason().unwrap()
            );
        }
    }
}
