// ============================
// crates/gatehouse-lib/src/auth/authenticator.rs
// ============================
//! Per-request orchestration: session short-circuit, strategy dispatch, and
//! session persistence on success.
use std::sync::Arc;

use metrics::counter;
use tracing::{debug, info};

use super::codec::IdentityCodec;
use super::session::SessionStore;
use super::strategy::{AuthOutcome, Credentials, StrategyRegistry};
use crate::error::AppError;
use crate::metrics::{AUTH_REJECTED, AUTH_SUCCESS};
use crate::user::User;

/// Runs named strategies and maintains the session identity for a request.
///
/// All collaborators are explicit handles; the authenticator holds no state
/// of its own and is cheap to clone.
#[derive(Clone)]
pub struct RequestAuthenticator {
    registry: Arc<StrategyRegistry>,
    codec: Arc<IdentityCodec>,
    sessions: Arc<dyn SessionStore>,
}

impl RequestAuthenticator {
    pub fn new(
        registry: StrategyRegistry,
        codec: IdentityCodec,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            registry: Arc::new(registry),
            codec: Arc::new(codec),
            sessions,
        }
    }

    /// Resolve the current user from an existing session, short-circuiting
    /// past the strategies entirely. An absent, expired, or stale session
    /// yields `None` ("not authenticated"), never an error.
    pub async fn current_user(&self, session_id: &str) -> Result<Option<User>, AppError> {
        let Some(token) = self.sessions.load(session_id).await? else {
            return Ok(None);
        };
        self.codec.deserialize(&token).await
    }

    /// Run the named strategy. On success the serialized identity is saved
    /// against `session_id` before the user is returned; on rejection or
    /// error the session store is not touched.
    pub async fn authenticate(
        &self,
        session_id: &str,
        strategy_name: &str,
        credentials: Credentials,
    ) -> Result<AuthOutcome, AppError> {
        let strategy = self
            .registry
            .resolve(strategy_name)
            .ok_or_else(|| AppError::UnknownStrategy(strategy_name.to_string()))?;

        let outcome = strategy.verify(credentials).await?;
        match &outcome {
            AuthOutcome::Authenticated(user) => {
                self.establish(session_id, user).await?;
                counter!(AUTH_SUCCESS).increment(1);
                info!(strategy = strategy_name, user_id = user.id, "authenticated");
            },
            AuthOutcome::Rejected(reason) => {
                counter!(AUTH_REJECTED).increment(1);
                debug!(strategy = strategy_name, %reason, "authentication rejected");
            },
        }
        Ok(outcome)
    }

    /// Attach an already-authenticated user to a session. Used directly
    /// after registration, where no strategy needs to run.
    pub async fn establish(&self, session_id: &str, user: &User) -> Result<(), AppError> {
        let token = IdentityCodec::serialize(user);
        self.sessions.save(session_id, &token).await
    }

    /// Destroy the session. Idempotent.
    pub async fn logout(&self, session_id: &str) -> Result<(), AppError> {
        self.sessions.destroy(session_id).await
    }
}
