use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A shared text snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created: DateTime<Utc>,
    pub expires: DateTime<Utc>,
}

impl Snippet {
    /// Whether the snippet is expired at the given instant.
    ///
    /// Expired snippets are invisible to lookups; the storage backends
    /// filter on the same comparison.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires <= now
    }
}

/// Payload for creating a snippet.
///
/// The storage backend assigns the id and both timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSnippet {
    pub title: String,
    pub content: String,
    /// Days until the snippet expires.
    pub expires_days: i64,
}

impl NewSnippet {
    /// Expiry instant for a snippet created at `created`.
    pub fn expiry_from(&self, created: DateTime<Utc>) -> DateTime<Utc> {
        created + Duration::days(self.expires_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(created: DateTime<Utc>, expires: DateTime<Utc>) -> Snippet {
        Snippet {
            id: 1,
            title: "O snail".to_string(),
            content: "Climb Mount Fuji".to_string(),
            created,
            expires,
        }
    }

    #[test]
    fn snippet_with_future_expiry_is_not_expired() {
        let now = Utc::now();
        let snippet = sample(now, now + Duration::days(7));
        assert!(!snippet.is_expired(now));
    }

    #[test]
    fn snippet_expiring_exactly_now_is_expired() {
        let now = Utc::now();
        let snippet = sample(now - Duration::days(7), now);
        assert!(snippet.is_expired(now));
    }

    #[test]
    fn expiry_from_adds_whole_days() {
        let new = NewSnippet {
            title: "t".to_string(),
            content: "c".to_string(),
            expires_days: 365,
        };
        let created = Utc::now();
        assert_eq!(new.expiry_from(created), created + Duration::days(365));
    }
}
