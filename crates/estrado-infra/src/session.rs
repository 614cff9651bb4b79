//! In-memory session store.
//!
//! Sessions are keyed by an opaque random id carried in a cookie. Each one
//! holds the upstream token, the logged-in user, and the flash data meant
//! for the next request. An entry only exists once something was written to
//! it, and entries idle longer than the configured lifetime are swept.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::task::JoinHandle;

use estrado_types::flash::FlashBag;
use estrado_types::session::{RequestContext, SessionUser};

#[derive(Debug, Clone, Default)]
pub struct SessionData {
    pub token: Option<String>,
    pub user: Option<SessionUser>,
    pub flashed: FlashBag,
}

impl SessionData {
    /// Build the request context for upstream calls.
    pub fn context(&self) -> RequestContext {
        match &self.token {
            Some(token) => RequestContext::authenticated(token.clone(), self.user.clone()),
            None => RequestContext {
                token: None,
                user: self.user.clone(),
            },
        }
    }
}

#[derive(Debug)]
struct Entry {
    data: SessionData,
    last_seen: Instant,
}

impl Default for Entry {
    fn default() -> Self {
        Self {
            data: SessionData::default(),
            last_seen: Instant::now(),
        }
    }
}

/// Shared session store. Cloning is cheap (`Arc` inside).
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<DashMap<String, Entry>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh session id. Nothing is stored until the session gets data.
    pub fn start(&self) -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }

    pub fn exists(&self, id: &str) -> bool {
        self.sessions.contains_key(id)
    }

    /// Token and user, without touching the flash.
    pub fn credentials(&self, id: &str) -> (Option<String>, Option<SessionUser>) {
        self.sessions
            .get_mut(id)
            .map(|mut e| {
                e.last_seen = Instant::now();
                (e.data.token.clone(), e.data.user.clone())
            })
            .unwrap_or_default()
    }

    /// Read the session and consume its flash data.
    pub fn load(&self, id: &str) -> SessionData {
        match self.sessions.get_mut(id) {
            Some(mut entry) => {
                entry.last_seen = Instant::now();
                let flashed = std::mem::take(&mut entry.data.flashed);
                SessionData {
                    token: entry.data.token.clone(),
                    user: entry.data.user.clone(),
                    flashed,
                }
            }
            None => SessionData::default(),
        }
    }

    /// Leave flash data for the next request.
    pub fn flash(&self, id: &str, bag: FlashBag) {
        if bag.is_empty() && !self.exists(id) {
            return;
        }
        let mut entry = self.sessions.entry(id.to_string()).or_default();
        entry.last_seen = Instant::now();
        entry.data.flashed = bag;
    }

    /// Store the credentials from a successful login.
    pub fn authenticate(&self, id: &str, token: String, user: Option<SessionUser>) {
        let mut entry = self.sessions.entry(id.to_string()).or_default();
        entry.last_seen = Instant::now();
        entry.data.token = Some(token);
        entry.data.user = user;
    }

    /// Drop credentials, keeping the session itself so a flash can follow.
    pub fn forget_credentials(&self, id: &str) {
        if let Some(mut entry) = self.sessions.get_mut(id) {
            entry.data.token = None;
            entry.data.user = None;
        }
    }

    /// Move the session's data to a fresh id and return it. The old id stops
    /// resolving.
    pub fn regenerate(&self, old_id: &str) -> String {
        let new_id = self.start();
        if let Some((_, mut entry)) = self.sessions.remove(old_id) {
            entry.last_seen = Instant::now();
            self.sessions.insert(new_id.clone(), entry);
        }
        new_id
    }

    /// Drop sessions not seen for `idle`. Returns how many were removed.
    pub fn sweep(&self, idle: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, entry| entry.last_seen.elapsed() < idle);
        before.saturating_sub(self.sessions.len())
    }

    /// Sweep idle sessions every `every` until the runtime shuts down.
    pub fn spawn_sweeper(&self, idle: Duration, every: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                let removed = store.sweep(idle);
                if removed > 0 {
                    tracing::debug!(removed, remaining = store.len(), "Swept idle sessions");
                }
            }
        })
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
