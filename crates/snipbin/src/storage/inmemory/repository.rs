//! In-memory repository implementation.

use std::collections::BTreeMap;
use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc,
};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use snipbin_core::snippet::{NewSnippet, Snippet};
use snipbin_core::storage::{Result, SnippetRepository};

/// In-memory snippet storage.
///
/// Data is not persisted and will be lost when the repository is dropped.
/// A `BTreeMap` keyed by id keeps insertion order, so "latest" is just the
/// tail read in reverse.
#[derive(Debug, Clone)]
pub struct InMemoryRepository {
    next_id: Arc<AtomicI64>,
    snippets: Arc<RwLock<BTreeMap<i64, Snippet>>>,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            next_id: Arc::new(AtomicI64::new(0)),
            snippets: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }
}

#[async_trait]
impl SnippetRepository for InMemoryRepository {
    async fn insert(&self, snippet: &NewSnippet) -> Result<i64> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let created = Utc::now();
        let stored = Snippet {
            id,
            title: snippet.title.clone(),
            content: snippet.content.clone(),
            created,
            expires: snippet.expiry_from(created),
        };

        self.snippets.write().await.insert(id, stored);
        Ok(id)
    }

    async fn get(&self, id: i64) -> Result<Option<Snippet>> {
        let snippets = self.snippets.read().await;
        Ok(snippets
            .get(&id)
            .filter(|s| !s.is_expired(Utc::now()))
            .cloned())
    }

    async fn latest(&self, limit: usize) -> Result<Vec<Snippet>> {
        let snippets = self.snippets.read().await;
        let now = Utc::now();
        Ok(snippets
            .values()
            .rev()
            .filter(|s| !s.is_expired(now))
            .take(limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_snippet(title: &str, expires_days: i64) -> NewSnippet {
        NewSnippet {
            title: title.to_string(),
            content: "...".to_string(),
            expires_days,
        }
    }

    #[tokio::test]
    async fn ids_are_assigned_sequentially() {
        let repo = InMemoryRepository::new();
        assert_eq!(repo.insert(&new_snippet("one", 7)).await.unwrap(), 1);
        assert_eq!(repo.insert(&new_snippet("two", 7)).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn expired_snippets_are_invisible() {
        let repo = InMemoryRepository::new();
        let id = repo.insert(&new_snippet("ephemeral", 0)).await.unwrap();

        assert_eq!(repo.get(id).await.unwrap(), None);
        assert!(repo.latest(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn latest_returns_newest_first_and_honors_the_limit() {
        let repo = InMemoryRepository::new();
        for i in 1..=4 {
            repo.insert(&new_snippet(&format!("snippet {i}"), 7))
                .await
                .unwrap();
        }

        let latest = repo.latest(3).await.unwrap();
        let titles: Vec<_> = latest.iter().map(|s| s.title.as_str()).collect();

        assert_eq!(titles, ["snippet 4", "snippet 3", "snippet 2"]);
    }
}
