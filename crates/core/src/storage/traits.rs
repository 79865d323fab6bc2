use async_trait::async_trait;

use crate::snippet::{NewSnippet, Snippet};

use super::Result;

/// Repository for snippet operations.
///
/// Expired snippets are treated as absent: `get` and `latest` never return
/// a snippet whose expiry is in the past.
#[async_trait]
pub trait SnippetRepository: Send + Sync {
    /// Inserts a new snippet and returns its assigned id.
    async fn insert(&self, snippet: &NewSnippet) -> Result<i64>;

    /// Gets a snippet by its id.
    async fn get(&self, id: i64) -> Result<Option<Snippet>>;

    /// Gets the most recently created snippets, newest first.
    async fn latest(&self, limit: usize) -> Result<Vec<Snippet>>;
}
