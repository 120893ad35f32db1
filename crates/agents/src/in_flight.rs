use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;

/// Conversations that currently have a turn awaiting its reply.
#[derive(Debug, Clone, Default)]
pub struct InFlightTurns {
    inner: Arc<Mutex<HashSet<String>>>,
}

/// Releases the conversation when dropped, including on early returns.
#[derive(Debug)]
pub struct TurnGuard {
    inner: Arc<Mutex<HashSet<String>>>,
    session_id: String,
}

impl InFlightTurns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_begin(&self, session_id: &str) -> Option<TurnGuard> {
        let mut guard = self.inner.lock();
        if !guard.insert(session_id.to_string()) {
            return None;
        }

        Some(TurnGuard {
            inner: Arc::clone(&self.inner),
            session_id: session_id.to_string(),
        })
    }

    pub fn is_pending(&self, session_id: &str) -> bool {
        self.inner.lock().contains(session_id)
    }
}

impl Drop for TurnGuard {
    fn drop(&mut self) {
        self.inner.lock().remove(&self.session_id);
    }
}
