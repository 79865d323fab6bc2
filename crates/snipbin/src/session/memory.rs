use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use snipbin_core::session::{Result, SessionData, SessionId, SessionStore};

struct StoredSession {
    data: SessionData,
    expires_at: DateTime<Utc>,
}

/// In-memory session store.
///
/// Every save refreshes the entry's expiry, so the lifetime is measured
/// from the last write. Data is lost on process shutdown, which is
/// acceptable for sessions.
pub struct MemorySessionStore {
    lifetime: Duration,
    entries: RwLock<HashMap<String, StoredSession>>,
}

impl MemorySessionStore {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            lifetime,
            entries: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, id: &SessionId) -> Result<Option<SessionData>> {
        let expired = {
            let entries = self.entries.read().expect("Lock poisoned");
            match entries.get(id.as_str()) {
                Some(stored) if stored.expires_at > Utc::now() => {
                    return Ok(Some(stored.data.clone()))
                }
                Some(_) => true,
                None => false,
            }
        };

        if expired {
            let mut entries = self.entries.write().expect("Lock poisoned");
            entries.remove(id.as_str());
        }

        Ok(None)
    }

    async fn save(&self, id: &SessionId, data: &SessionData) -> Result<()> {
        let mut entries = self.entries.write().expect("Lock poisoned");
        entries.insert(
            id.as_str().to_string(),
            StoredSession {
                data: data.clone(),
                expires_at: Utc::now() + self.lifetime,
            },
        );
        Ok(())
    }

    async fn delete(&self, id: &SessionId) -> Result<()> {
        let mut entries = self.entries.write().expect("Lock poisoned");
        entries.remove(id.as_str());
        Ok(())
    }
}
