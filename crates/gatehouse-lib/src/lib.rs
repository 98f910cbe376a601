// ============================
// crates/gatehouse-lib/src/lib.rs
// ============================
//! Authentication and identity-resolution core for the Gatehouse server.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod router;
pub mod store;
pub mod user;
pub mod validation;

use std::sync::Arc;

use crate::auth::{
    FederatedStrategy, HttpProviderClient, IdentityCodec, PasswordStrategy, ProviderClient,
    RequestAuthenticator, SessionStore, StrategyRegistry,
};
use crate::config::Settings;
use crate::error::AppError;
use crate::store::CredentialStore;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Request authenticator
    pub authenticator: RequestAuthenticator,
    /// Credential store backend
    pub users: Arc<dyn CredentialStore>,
    /// Session store backend
    pub sessions: Arc<dyn SessionStore>,
    /// Settings
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Create application state with the HTTP provider client built from
    /// the configured provider endpoints.
    pub fn new(
        users: Arc<dyn CredentialStore>,
        sessions: Arc<dyn SessionStore>,
        settings: Settings,
    ) -> Result<Self, AppError> {
        let provider = Arc::new(HttpProviderClient::new(settings.provider.clone())?);
        Ok(Self::with_provider(users, sessions, settings, provider))
    }

    /// Create application state with an explicit provider client. Tests use
    /// this to substitute a canned provider.
    pub fn with_provider(
        users: Arc<dyn CredentialStore>,
        sessions: Arc<dyn SessionStore>,
        settings: Settings,
        provider: Arc<dyn ProviderClient>,
    ) -> Self {
        let mut registry = StrategyRegistry::new();
        registry.register(Arc::new(PasswordStrategy::new(Arc::clone(&users))));
        registry.register(Arc::new(FederatedStrategy::new(
            settings.provider.name.clone(),
            provider,
            Arc::clone(&users),
        )));

        let authenticator = RequestAuthenticator::new(
            registry,
            IdentityCodec::new(Arc::clone(&users)),
            Arc::clone(&sessions),
        );

        Self {
            authenticator,
            users,
            sessions,
            settings: Arc::new(settings),
        }
    }
}
