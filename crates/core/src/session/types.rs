use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session key under which the one-shot flash message is stored.
pub const FLASH_KEY: &str = "flash";

/// Opaque session identifier presented by the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: String) -> Self {
        Self(id)
    }

    /// Generate a fresh random session identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-session key/value state.
///
/// The store owns persistence and expiry; this is just the data that rides
/// along with one session token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    values: HashMap<String, String>,
}

impl SessionData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Removes and returns a value, leaving the key unset.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    /// One-shot read of the flash message: returns it and clears it.
    pub fn pop_flash(&mut self) -> Option<String> {
        self.remove(FLASH_KEY)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_session_ids_are_unique() {
        assert_ne!(SessionId::generate(), SessionId::generate());
    }

    #[test]
    fn generated_session_id_is_hex_only() {
        let id = SessionId::generate();
        assert_eq!(id.as_str().len(), 32);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn pop_flash_clears_the_message() {
        let mut data = SessionData::new();
        data.insert(FLASH_KEY, "Snippet successfully created!");
        assert_eq!(
            data.pop_flash().as_deref(),
            Some("Snippet successfully created!")
        );
        assert_eq!(data.pop_flash(), None);
    }

    #[test]
    fn pop_flash_on_empty_session_returns_none() {
        let mut data = SessionData::new();
        assert_eq!(data.pop_flash(), None);
    }
}
