// ============================
// crates/gatehouse-lib/src/auth/local.rs
// ============================
//! Local email/password strategy.
use std::sync::Arc;

use async_trait::async_trait;

use super::password::verify_password;
use super::strategy::{AuthOutcome, Credentials, RejectReason, Strategy};
use crate::error::AppError;
use crate::store::CredentialStore;

/// Registry name of the local strategy.
pub const LOCAL_STRATEGY: &str = "local";

/// Verifies email/password pairs against the credential store.
pub struct PasswordStrategy {
    users: Arc<dyn CredentialStore>,
}

impl PasswordStrategy {
    pub fn new(users: Arc<dyn CredentialStore>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl Strategy for PasswordStrategy {
    fn name(&self) -> &str {
        LOCAL_STRATEGY
    }

    async fn verify(&self, credentials: Credentials) -> Result<AuthOutcome, AppError> {
        let Credentials::Password { email, password } = credentials else {
            return Err(AppError::InvalidInput(
                "local strategy expects email/password credentials".to_string(),
            ));
        };

        // Store failures propagate as errors, never as rejections.
        let Some(user) = self.users.find_by_email(&email).await? else {
            return Ok(AuthOutcome::Rejected(RejectReason::UnknownAccount));
        };

        // Federated-only accounts have no password and cannot log in locally.
        let matches = user
            .password_hash
            .as_deref()
            .map(|hash| verify_password(hash, &password))
            .unwrap_or(false);
        if !matches {
            return Ok(AuthOutcome::Rejected(RejectReason::BadCredential));
        }

        Ok(AuthOutcome::Authenticated(user))
    }
}
