//! Application state and its startup-time dependencies.
//!
//! Every dependency the request path needs — the snippet repository, the
//! session store, the template cache — is constructed once at startup and
//! carried in [`AppState`]; there are no ambient globals. The state is
//! cloned per handler, which only clones the `Arc` handles.

use std::sync::Arc;

use snipbin_core::{session::SessionStore, storage::SnippetRepository};
use snipbin_render::TemplateCache;

use crate::{config::Config, session::MemorySessionStore};

// ============================================================================
// Compile-time feature validation
// ============================================================================

// Storage features: exactly one must be enabled, they are mutually exclusive
#[cfg(all(feature = "sqlite", feature = "inmemory"))]
compile_error!("Cannot enable both 'sqlite' and 'inmemory' storage features");

#[cfg(not(any(feature = "sqlite", feature = "inmemory")))]
compile_error!("Must enable exactly one storage feature: 'sqlite' or 'inmemory'");

/// Shared application state.
///
/// This is cloned for each request handler and contains the shared,
/// read-only-after-startup resources.
#[derive(Clone)]
pub struct AppState {
    /// Snippet repository.
    pub snippets: Arc<dyn SnippetRepository>,
    /// Session store consulted by the hydration middleware.
    pub sessions: Arc<dyn SessionStore>,
    /// Composed template sets, immutable after startup.
    pub templates: Arc<TemplateCache>,
    /// Application configuration.
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates a new AppState from already-constructed parts.
    fn build(
        snippets: Arc<dyn SnippetRepository>,
        sessions: Arc<dyn SessionStore>,
        templates: TemplateCache,
        config: &Config,
    ) -> Self {
        Self {
            snippets,
            sessions,
            templates: Arc::new(templates),
            config: Arc::new(config.clone()),
        }
    }
}

// ============================================================================
// Factory functions for the storage backends
// ============================================================================

#[cfg(feature = "sqlite")]
mod sqlite_backend {
    use super::*;
    use crate::storage::SqliteRepository;

    impl AppState {
        /// Creates AppState with SQLite snippet storage.
        pub async fn new(config: &Config, templates: TemplateCache) -> Result<Self, anyhow::Error> {
            let repo = Arc::new(SqliteRepository::new(&config.sqlite_path).await?);
            let sessions = Arc::new(MemorySessionStore::new(config.session_lifetime()));

            Ok(Self::build(repo, sessions, templates, config))
        }
    }
}

#[cfg(feature = "inmemory")]
mod inmemory_backend {
    use super::*;
    use crate::storage::InMemoryRepository;

    impl AppState {
        /// Creates AppState with in-memory snippet storage.
        /// Useful for running without any external dependencies.
        pub async fn new(config: &Config, templates: TemplateCache) -> Result<Self, anyhow::Error> {
            let repo = Arc::new(InMemoryRepository::new());
            let sessions = Arc::new(MemorySessionStore::new(config.session_lifetime()));

            Ok(Self::build(repo, sessions, templates, config))
        }
    }
}

// ============================================================================
// Test support - provides Default implementation for unit tests
// ============================================================================
