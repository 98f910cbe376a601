// ============================
// crates/gatehouse-lib/src/auth/federated.rs
// ============================
//! Federated identity strategy: authorization-code exchange with an external
//! provider, plus account resolution/provisioning by subject id.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use metrics::counter;
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, info};

use super::strategy::{AuthOutcome, CallbackPayload, Credentials, RejectReason, Strategy};
use crate::error::AppError;
use crate::metrics::USER_PROVISIONED;
use crate::store::CredentialStore;
use crate::user::NewUser;

/// Identity provider endpoints and client credentials.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Registry name the federated strategy is mounted under
    pub name: String,
    pub client_id: String,
    pub client_secret: String,
    /// Authorization endpoint the user is redirected to
    pub auth_url: String,
    /// Token endpoint for the code exchange
    pub token_url: String,
    /// Profile-claims endpoint
    pub userinfo_url: String,
    /// Our callback URL, registered with the provider
    pub redirect_url: String,
    pub scope: String,
    /// Upper bound on each provider call
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: "google".to_string(),
            client_id: String::new(),
            client_secret: String::new(),
            auth_url: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            token_url: "https://oauth2.googleapis.com/token".to_string(),
            userinfo_url: "https://www.googleapis.com/oauth2/v3/userinfo".to_string(),
            redirect_url: "http://localhost:4000/auth/federated/callback".to_string(),
            scope: "profile".to_string(),
            timeout_secs: 10,
        }
    }
}

impl ProviderConfig {
    /// Build the authorization redirect. Pure function of the configured
    /// client id, callback URL, and scope.
    pub fn authorize_url(&self) -> Result<Url, AppError> {
        Url::parse_with_params(
            &self.auth_url,
            [
                ("response_type", "code"),
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_url.as_str()),
                ("scope", self.scope.as_str()),
            ],
        )
        .map_err(|e| AppError::Internal(format!("bad provider authorization endpoint: {e}")))
    }
}

/// Profile claims returned by the provider. Only the subject id is required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderProfile {
    #[serde(default, rename = "sub")]
    pub subject: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Seam to the identity provider: exchanges an authorization code for the
/// provider's profile claims. Tests substitute a canned implementation.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    async fn exchange_code(&self, code: &str) -> Result<ProviderProfile, AppError>;
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// HTTP implementation of [`ProviderClient`] with a bounded request timeout.
pub struct HttpProviderClient {
    http: reqwest::Client,
    config: ProviderConfig,
}

impl HttpProviderClient {
    pub fn new(config: ProviderConfig) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("failed to build provider client: {e}")))?;
        Ok(Self { http, config })
    }
}

fn provider_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::ProviderTimeout
    } else {
        AppError::Provider(err.to_string())
    }
}

#[async_trait]
impl ProviderClient for HttpProviderClient {
    async fn exchange_code(&self, code: &str) -> Result<ProviderProfile, AppError> {
        let token: TokenResponse = self
            .http
            .post(&self.config.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("redirect_uri", self.config.redirect_url.as_str()),
            ])
            .send()
            .await
            .map_err(provider_error)?
            .error_for_status()
            .map_err(provider_error)?
            .json()
            .await
            .map_err(provider_error)?;

        let profile = self
            .http
            .get(&self.config.userinfo_url)
            .bearer_auth(&token.access_token)
            .send()
            .await
            .map_err(provider_error)?
            .error_for_status()
            .map_err(provider_error)?
            .json()
            .await
            .map_err(provider_error)?;

        Ok(profile)
    }
}

/// Resolves or provisions a local account from the provider's subject id.
///
/// Matching is by subject id ONLY; an existing local account with the same
/// email is never linked implicitly.
pub struct FederatedStrategy {
    name: String,
    provider: Arc<dyn ProviderClient>,
    users: Arc<dyn CredentialStore>,
}

impl FederatedStrategy {
    pub fn new(
        name: String,
        provider: Arc<dyn ProviderClient>,
        users: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            name,
            provider,
            users,
        }
    }

    /// Complete the authorization-code flow from the callback payload.
    async fn complete(&self, payload: CallbackPayload) -> Result<AuthOutcome, AppError> {
        if let Some(err) = payload.error.as_deref() {
            debug!(provider = %self.name, error = err, "callback carried a provider error");
            return Ok(AuthOutcome::Rejected(RejectReason::InvalidProviderResponse));
        }
        let Some(code) = payload.code.as_deref().filter(|c| !c.is_empty()) else {
            return Ok(AuthOutcome::Rejected(RejectReason::InvalidProviderResponse));
        };

        let profile = self.provider.exchange_code(code).await?;
        let Some(subject) = profile.subject.as_deref().filter(|s| !s.is_empty()) else {
            return Ok(AuthOutcome::Rejected(RejectReason::InvalidProviderResponse));
        };

        if let Some(user) = self.users.find_by_subject(subject).await? {
            return Ok(AuthOutcome::Authenticated(user));
        }

        // First login for this subject id. Concurrent callbacks race here;
        // the store's uniqueness constraint picks the winner and the loser
        // fetches the existing row.
        let user = self
            .users
            .insert_or_fetch_by_subject(NewUser::federated(subject))
            .await?;
        counter!(USER_PROVISIONED).increment(1);
        info!(provider = %self.name, user_id = user.id, "provisioned account on first federated login");
        Ok(AuthOutcome::Authenticated(user))
    }
}

#[async_trait]
impl Strategy for FederatedStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    async fn verify(&self, credentials: Credentials) -> Result<AuthOutcome, AppError> {
        let Credentials::FederatedCallback(payload) = credentials else {
            return Err(AppError::InvalidInput(
                "federated strategy expects a provider callback payload".to_string(),
            ));
        };
        self.complete(payload).await
    }
}
