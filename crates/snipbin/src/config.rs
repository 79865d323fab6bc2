use std::{env, path::PathBuf};

use chrono::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the template fragment tree (default: "ui/html")
    pub template_root: PathBuf,
    /// Root of the static asset tree (default: "ui/static")
    pub static_root: PathBuf,
    /// Path to SQLite database file (default: "snipbin.db")
    /// Note: Only used when the `sqlite` feature is enabled.
    #[allow(dead_code)]
    pub sqlite_path: String,
    /// Session lifetime in hours (default: 12)
    pub session_lifetime_hours: i64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `TEMPLATE_ROOT` - Template fragment tree root (default: "ui/html")
    /// - `STATIC_ROOT` - Static asset tree root (default: "ui/static")
    /// - `SQLITE_PATH` - SQLite database path (default: "snipbin.db")
    /// - `SESSION_LIFETIME_HOURS` - Session lifetime in hours (default: 12)
    pub fn from_env() -> Self {
        Self {
            template_root: env::var("TEMPLATE_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("ui/html")),
            static_root: env::var("STATIC_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("ui/static")),
            sqlite_path: env::var("SQLITE_PATH").unwrap_or_else(|_| "snipbin.db".to_string()),
            session_lifetime_hours: env::var("SESSION_LIFETIME_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(12),
        }
    }

    /// Get the session lifetime as a Duration.
    pub fn session_lifetime(&self) -> Duration {
        Duration::hours(self.session_lifetime_hours)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
