use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use sqlx::PgPool;

use super::{SnippetStore, StoreError, StoreResult, UserStore, LATEST_LIMIT};
use crate::clock::{Clock, SystemClock};
use crate::models::{Snippet, User};
use crate::password;

/// Name of the unique constraint on `users.email` in `migrations/setup.sql`.
const EMAIL_CONSTRAINT: &str = "users_uc_email";

#[derive(Clone)]
pub struct PgSnippetStore {
    pool: PgPool,
    clock: Arc<dyn Clock>,
}

impl PgSnippetStore {
    pub fn new(pool: PgPool) -> Self {
        Self::with_clock(pool, Arc::new(SystemClock))
    }

    pub fn with_clock(pool: PgPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

#[async_trait]
impl SnippetStore for PgSnippetStore {
    async fn insert(&self, title: &str, content: &str, expiration_days: i32) -> StoreResult<i32> {
        let created = self.clock.now();
        let expires = created + Duration::days(i64::from(expiration_days));

        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO snippets (title, content, created, expires) VALUES ($1, $2, $3, $4) \
             RETURNING id",
        )
        .bind(title)
        .bind(content)
        .bind(created)
        .bind(expires)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn get(&self, id: i32) -> StoreResult<Snippet> {
        let snippet = sqlx::query_as::<_, Snippet>(
            "SELECT id, title, content, created, expires FROM snippets \
             WHERE expires > $1 AND id = $2",
        )
        .bind(self.clock.now())
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(snippet)
    }

    async fn latest(&self) -> StoreResult<Vec<Snippet>> {
        let snippets = sqlx::query_as::<_, Snippet>(
            "SELECT id, title, content, created, expires FROM snippets \
             WHERE expires > $1 ORDER BY id DESC LIMIT $2",
        )
        .bind(self.clock.now())
        .bind(LATEST_LIMIT)
        .fetch_all(&self.pool)
        .await?;
        Ok(snippets)
    }

    async fn purge_expired(&self) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM snippets WHERE expires <= $1")
            .bind(self.clock.now())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
    clock: Arc<dyn Clock>,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self::with_clock(pool, Arc::new(SystemClock))
    }

    pub fn with_clock(pool: PgPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, name: &str, email: &str, password: &str) -> StoreResult<()> {
        let hashed_password = password::hash_blocking(password).await?;

        let result = sqlx::query(
            "INSERT INTO users (name, email, hashed_password, created) VALUES ($1, $2, $3, $4)",
        )
        .bind(name)
        .bind(email)
        .bind(hashed_password)
        .bind(self.clock.now())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e))
                if e.is_unique_violation() && e.constraint() == Some(EMAIL_CONSTRAINT) =>
            {
                Err(StoreError::DuplicateEmail)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn authenticate(&self, email: &str, password: &str) -> StoreResult<i32> {
        let row = sqlx::query_as::<_, (i32, String)>(
            "SELECT id, hashed_password FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        // unknown email and wrong password are indistinguishable to the caller
        let Some((id, hashed_password)) = row else {
            return Err(StoreError::InvalidCredentials);
        };

        if password::verify_blocking(password, hashed_password).await? {
            Ok(id)
        } else {
            Err(StoreError::InvalidCredentials)
        }
    }

    async fn exists(&self, id: i32) -> StoreResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT true FROM users WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn get(&self, id: i32) -> StoreResult<User> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, hashed_password, created FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }
}
