// ============================
// crates/gatehouse-lib/src/auth/strategy.rs
// ============================
//! The strategy contract and the name → strategy dispatch table.
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::AppError;
use crate::user::User;

/// Strategy-specific credentials.
#[derive(Clone)]
pub enum Credentials {
    /// Local email/password pair.
    Password { email: String, password: String },
    /// Inbound provider callback for the federated strategy.
    FederatedCallback(CallbackPayload),
}

// Keep the plaintext password out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Password { email, .. } => f
                .debug_struct("Password")
                .field("email", email)
                .field("password", &"<redacted>")
                .finish(),
            Credentials::FederatedCallback(payload) => f
                .debug_tuple("FederatedCallback")
                .field(payload)
                .finish(),
        }
    }
}

/// Query parameters the identity provider sends to the callback URL.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackPayload {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Why a strategy rejected the attempt. User-correctable, never logged as an
/// error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    UnknownAccount,
    BadCredential,
    InvalidProviderResponse,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            RejectReason::UnknownAccount => "no such account",
            RejectReason::BadCredential => "bad credential",
            RejectReason::InvalidProviderResponse => "invalid provider response",
        };
        f.write_str(msg)
    }
}

/// Result of a strategy run. Infrastructure failures travel on the error
/// channel instead; no partial state is representable.
#[derive(Debug, Clone)]
pub enum AuthOutcome {
    Authenticated(User),
    Rejected(RejectReason),
}

/// A pluggable verification procedure mapping credentials to an outcome.
#[async_trait]
pub trait Strategy: Send + Sync {
    /// Registry key for this strategy.
    fn name(&self) -> &str;

    async fn verify(&self, credentials: Credentials) -> Result<AuthOutcome, AppError>;
}

/// Fixed map from strategy name to verifier. Pure dispatch, no auth logic.
#[derive(Clone, Default)]
pub struct StrategyRegistry {
    strategies: HashMap<String, Arc<dyn Strategy>>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a strategy under its self-reported name. A later
    /// registration with the same name replaces the earlier one.
    pub fn register(&mut self, strategy: Arc<dyn Strategy>) {
        self.strategies.insert(strategy.name().to_string(), strategy);
    }

    pub fn resolve(&self, name: &str) -> Option<Arc<dyn Strategy>> {
        self.strategies.get(name).cloned()
    }
}
