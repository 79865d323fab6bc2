use async_trait::async_trait;

use super::{Result, SessionData, SessionId};

/// Session storage abstraction.
///
/// The hydration middleware performs one `load` before the handler and at
/// most one `save` after it. Concurrent requests carrying the same token are
/// last-write-wins; the store provides no stronger guarantee.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Retrieve session state by token, if present and not expired.
    async fn load(&self, id: &SessionId) -> Result<Option<SessionData>>;

    /// Persist session state under the token.
    async fn save(&self, id: &SessionId, data: &SessionData) -> Result<()>;

    /// Drop a session entirely.
    async fn delete(&self, id: &SessionId) -> Result<()>;
}
