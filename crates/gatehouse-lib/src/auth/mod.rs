// ============================
// crates/gatehouse-lib/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod authenticator;
pub mod codec;
pub mod federated;
pub mod local;
pub mod password;
pub mod session;
mod strategy;
pub mod token;

pub use authenticator::RequestAuthenticator;
pub use codec::IdentityCodec;
pub use federated::{
    FederatedStrategy, HttpProviderClient, ProviderClient, ProviderConfig, ProviderProfile,
};
pub use local::{PasswordStrategy, LOCAL_STRATEGY};
pub use password::{
    hash_password, hash_password_secure, validate_password_strength, verify_password,
    PasswordRequirements, MIN_PASSWORD_LENGTH,
};
pub use session::{MemorySessionStore, SessionStore, SESSION_TTL};
pub use strategy::{AuthOutcome, CallbackPayload, Credentials, RejectReason, Strategy, StrategyRegistry};
pub use token::new_session_id;
