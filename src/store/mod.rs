use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Snippet, User};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::{PgSnippetStore, PgUserStore};

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Maximum number of snippets returned by [`SnippetStore::latest`].
pub const LATEST_LIMIT: i64 = 10;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StoreError {
    #[error("no matching record found")]
    NotFound,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("duplicate email")]
    DuplicateEmail,
    #[error("database error")]
    Database { source: sqlx::Error },
    #[error("password hashing failed: {0}")]
    PasswordHash(String),
    #[error("blocking task failed")]
    Task {
        #[from]
        source: tokio::task::JoinError,
    },
}

impl From<sqlx::Error> for StoreError {
    fn from(source: sqlx::Error) -> Self {
        match source {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            _ => StoreError::Database { source },
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnippetStore: Send + Sync {
    /// Insert a snippet expiring `expiration_days` from now and return its id.
    async fn insert(&self, title: &str, content: &str, expiration_days: i32) -> StoreResult<i32>;

    /// Get an unexpired snippet by id.
    async fn get(&self, id: i32) -> StoreResult<Snippet>;

    /// Get the most recent unexpired snippets, newest first.
    async fn latest(&self) -> StoreResult<Vec<Snippet>>;

    /// Delete expired snippets, returning how many were removed.
    async fn purge_expired(&self) -> StoreResult<u64>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create a user, hashing the password.
    async fn insert(&self, name: &str, email: &str, password: &str) -> StoreResult<()>;

    /// Check an email and password pair and return the matching user id.
    async fn authenticate(&self, email: &str, password: &str) -> StoreResult<i32>;

    async fn exists(&self, id: i32) -> StoreResult<bool>;

    async fn get(&self, id: i32) -> StoreResult<User>;
}
