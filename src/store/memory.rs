//! In-memory stores for exercising the web layer without a database.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use tokio::sync::Mutex;

use super::{SnippetStore, StoreError, StoreResult, UserStore, LATEST_LIMIT};
use crate::clock::Clock;
use crate::models::{Snippet, User};

pub struct MemorySnippetStore {
    snippets: Mutex<Vec<Snippet>>,
    last_id: AtomicI32,
    clock: Arc<dyn Clock>,
}

impl MemorySnippetStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            snippets: Mutex::new(Vec::new()),
            last_id: AtomicI32::new(0),
            clock,
        }
    }
}

#[async_trait]
impl SnippetStore for MemorySnippetStore {
    async fn insert(&self, title: &str, content: &str, expiration_days: i32) -> StoreResult<i32> {
        let mut snippets = self.snippets.lock().await;
        let created = self.clock.now();
        let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
        snippets.push(Snippet {
            id,
            title: title.to_owned(),
            content: content.to_owned(),
            created,
            expires: created + Duration::days(i64::from(expiration_days)),
        });
        Ok(id)
    }

    async fn get(&self, id: i32) -> StoreResult<Snippet> {
        let now = self.clock.now();
        self.snippets
            .lock()
            .await
            .iter()
            .find(|s| s.id == id && s.is_live_at(now))
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn latest(&self) -> StoreResult<Vec<Snippet>> {
        let now = self.clock.now();
        Ok(self
            .snippets
            .lock()
            .await
            .iter()
            .rev()
            .filter(|s| s.is_live_at(now))
            .take(LATEST_LIMIT as usize)
            .cloned()
            .collect())
    }

    async fn purge_expired(&self) -> StoreResult<u64> {
        let now = self.clock.now();
        let mut snippets = self.snippets.lock().await;
        let before = snippets.len();
        snippets.retain(|s| s.is_live_at(now));
        Ok((before - snippets.len()) as u64)
    }
}

/// Keeps passwords in plain text; fine for tests, where hashing would only
/// slow things down.
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
    last_id: AtomicI32,
    clock: Arc<dyn Clock>,
}

impl MemoryUserStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            users: Mutex::new(Vec::new()),
            last_id: AtomicI32::new(0),
            clock,
        }
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, name: &str, email: &str, password: &str) -> StoreResult<()> {
        let mut users = self.users.lock().await;
        if users.iter().any(|u| u.email == email) {
            return Err(StoreError::DuplicateEmail);
        }
        let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
        users.push(User {
            id,
            name: name.to_owned(),
            email: email.to_owned(),
            hashed_password: password.to_owned(),
            created: self.clock.now(),
        });
        Ok(())
    }

    async fn authenticate(&self, email: &str, password: &str) -> StoreResult<i32> {
        self.users
            .lock()
            .await
            .iter()
            .find(|u| u.email == email && u.hashed_password == password)
            .map(|u| u.id)
            .ok_or(StoreError::InvalidCredentials)
    }

    async fn exists(&self, id: i32) -> StoreResult<bool> {
        Ok(self.users.lock().await.iter().any(|u| u.id == id))
    }

    async fn get(&self, id: i32) -> StoreResult<User> {
        self.users
            .lock()
            .await
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::clock::FixedClock;

    #[tokio::test]
    async fn latest_is_capped_newest_first_and_skips_expired() {
        let now = Utc.with_ymd_and_hms(2022, 12, 1, 10, 0, 0).unwrap();
        let store = MemorySnippetStore::new(Arc::new(FixedClock(now)));
        for i in 0..12 {
            store.insert(&format!("title {i}"), "content", 1).await.unwrap();
        }
        // an already-expired entry
        store.insert("gone", "content", 0).await.unwrap();

        let ids: Vec<i32> = store.latest().await.unwrap().iter().map(|s| s.id).collect();
        assert_eq!(ids, (3..=12).rev().collect::<Vec<_>>());
        assert!(matches!(store.get(13).await, Err(StoreError::NotFound)));
        assert_eq!(store.purge_expired().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_a_purge() {
        let now = Utc.with_ymd_and_hms(2022, 12, 1, 10, 0, 0).unwrap();
        let store = MemorySnippetStore::new(Arc::new(FixedClock(now)));
        store.insert("expired", "content", 0).await.unwrap();
        store.insert("live", "content", 7).await.unwrap();
        assert_eq!(store.purge_expired().await.unwrap(), 1);

        let id = store.insert("newer", "content", 7).await.unwrap();
        assert_eq!(id, 3);
        assert_eq!(store.get(2).await.unwrap().title, "live");
        assert_eq!(store.get(3).await.unwrap().title, "newer");
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_whatever_the_name() {
        let store = MemoryUserStore::new(Arc::new(FixedClock(Utc::now())));
        store.insert("alice", "alice@example.com", "pa$$word").await.unwrap();

        let err = store
            .insert("bob", "alice@example.com", "different")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
        assert_eq!(
            store.authenticate("alice@example.com", "pa$$word").await.unwrap(),
            1
        );
        assert!(matches!(
            store.authenticate("alice@example.com", "different").await,
            Err(StoreError::InvalidCredentials)
        ));
    }
}
