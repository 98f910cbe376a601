// ================
// crates/common/src/lib.rs
// ================
//! Request and response payloads shared between the Gatehouse server and its
//! clients.

use serde::{Deserialize, Serialize};

/// Create a local account with an email/password pair.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// Authenticate against an existing local account.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// The authenticated user, as exposed to clients.
///
/// Federated-only accounts have no email, hence the `Option`. Credential
/// material never appears here.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub id: i64,
    pub email: Option<String>,
}

/// Error payload returned on every failed request.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Machine-readable error code plus a human-readable message.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}
