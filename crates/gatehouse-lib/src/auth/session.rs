// ============================
// crates/gatehouse-lib/src/auth/session.rs
// ============================
//! Session store: opaque token persisted against a cookie-delivered
//! session id.
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use metrics::{counter, gauge};
use tokio::sync::RwLock;

use crate::error::AppError;
use crate::metrics::{SESSION_ACTIVE, SESSION_CREATED, SESSION_DESTROYED, SESSION_EXPIRED};

/// Default session TTL (7 days)
pub const SESSION_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 7);

/// Sweep interval for the expiry task
const SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Trait for session store backends. The token is opaque here; only the
/// identity codec knows what is inside it.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn save(&self, session_id: &str, token: &str) -> Result<(), AppError>;

    async fn load(&self, session_id: &str) -> Result<Option<String>, AppError>;

    /// Destroying an absent session is not an error.
    async fn destroy(&self, session_id: &str) -> Result<(), AppError>;
}

struct SessionEntry {
    token: String,
    expires_at: Instant,
}

/// In-memory implementation of the [`SessionStore`] trait.
#[derive(Clone)]
pub struct MemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionEntry>>>,
    ttl: Duration,
}

impl MemorySessionStore {
    /// Create a new session store and spawn the expiry-sweep task. Must be
    /// called from within a Tokio runtime.
    pub fn new(ttl: Duration) -> Self {
        let store = Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        };
        let sessions = Arc::clone(&store.sessions);
        tokio::spawn(async move {
            sweep_task(sessions).await;
        });
        store
    }
}

/// Periodically drop expired sessions
async fn sweep_task(sessions: Arc<RwLock<HashMap<String, SessionEntry>>>) {
    loop {
        tokio::time::sleep(SWEEP_INTERVAL).await;

        let mut map = sessions.write().await;
        let before = map.len();
        let now = Instant::now();
        map.retain(|_, entry| now < entry.expires_at);

        let removed = before - map.len();
        if removed > 0 {
            counter!(SESSION_EXPIRED).increment(removed as u64);
            gauge!(SESSION_ACTIVE).set(map.len() as f64);
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn save(&self, session_id: &str, token: &str) -> Result<(), AppError> {
        let mut map = self.sessions.write().await;
        map.insert(
            session_id.to_string(),
            SessionEntry {
                token: token.to_string(),
                expires_at: Instant::now() + self.ttl,
            },
        );
        counter!(SESSION_CREATED).increment(1);
        gauge!(SESSION_ACTIVE).set(map.len() as f64);
        Ok(())
    }

    async fn load(&self, session_id: &str) -> Result<Option<String>, AppError> {
        let now = Instant::now();
        let expired = {
            let map = self.sessions.read().await;
            match map.get(session_id) {
                Some(entry) if now < entry.expires_at => return Ok(Some(entry.token.clone())),
                Some(_) => true,
                None => false,
            }
        };
        // Lazy prune so an expired session disappears before the sweeper runs.
        if expired {
            self.sessions.write().await.remove(session_id);
            counter!(SESSION_EXPIRED).increment(1);
        }
        Ok(None)
    }

    async fn destroy(&self, session_id: &str) -> Result<(), AppError> {
        let mut map = self.sessions.write().await;
        if map.remove(session_id).is_some() {
            counter!(SESSION_DESTROYED).increment(1);
            gauge!(SESSION_ACTIVE).set(map.len() as f64);
        }
        Ok(())
    }
}
