//! SQLite storage backend.
//!
//! Implements the repository trait from `snipbin_core::storage` using
//! `rusqlite` for synchronous operations and `tokio-rusqlite` for async
//! wrapping.

mod repository;
mod schema;

pub use repository::SqliteRepository;
