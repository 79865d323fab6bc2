//! Storage backend implementations.
//!
//! Concrete implementations of the repository trait defined in
//! `snipbin_core::storage`, selected at compile time via feature flags:
//!
//! - `sqlite` (default): SQLite backend using `rusqlite` and `tokio-rusqlite`
//! - `inmemory`: process-local backend with no external dependencies
//!
//! The features are mutually exclusive; `state.rs` enforces this with
//! compile-time checks.

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "inmemory")]
pub mod inmemory;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepository;

#[cfg(feature = "inmemory")]
pub use inmemory::InMemoryRepository;
