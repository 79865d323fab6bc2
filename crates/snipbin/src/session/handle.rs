use std::sync::{Arc, Mutex};

use snipbin_core::session::{SessionData, FLASH_KEY};

/// Request-scoped handle to one session's state.
///
/// Inserted into the request extensions by the hydration middleware and
/// shared between it and the handler; after the handler returns, the
/// middleware persists the state iff some access mutated it. Cloning the
/// handle shares the same underlying state.
#[derive(Clone)]
pub struct Session {
    inner: Arc<Mutex<SessionState>>,
}

struct SessionState {
    data: SessionData,
    dirty: bool,
}

impl Session {
    pub fn new(data: SessionData) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionState { data, dirty: false })),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let state = self.inner.lock().expect("Lock poisoned");
        state.data.get(key).map(str::to_string)
    }

    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        let mut state = self.inner.lock().expect("Lock poisoned");
        state.data.insert(key, value);
        state.dirty = true;
    }

    /// Sets the one-shot flash message shown on the next rendered page.
    pub fn set_flash(&self, message: impl Into<String>) {
        self.insert(FLASH_KEY, message);
    }

    /// One-shot read of the flash message: returns it and clears it.
    pub fn pop_flash(&self) -> Option<String> {
        let mut state = self.inner.lock().expect("Lock poisoned");
        let flash = state.data.pop_flash();
        if flash.is_some() {
            state.dirty = true;
        }
        flash
    }

    /// Whether any access mutated the session since hydration.
    pub fn is_dirty(&self) -> bool {
        self.inner.lock().expect("Lock poisoned").dirty
    }

    /// A copy of the current state for persisting.
    pub fn snapshot(&self) -> SessionData {
        self.inner.lock().expect("Lock poisoned").data.clone()
    }
}
