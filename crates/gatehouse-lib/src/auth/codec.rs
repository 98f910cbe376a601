// ============================
// crates/gatehouse-lib/src/auth/codec.rs
// ============================
//! Session identity codec: user → token and back.
//!
//! The token is exactly the user identifier. Serializing the whole record
//! into the session would go stale and would park credential material in
//! session storage; re-fetching on every request avoids both.
use std::sync::Arc;

use tracing::debug;

use crate::error::AppError;
use crate::store::CredentialStore;
use crate::user::{User, UserId};

pub struct IdentityCodec {
    users: Arc<dyn CredentialStore>,
}

impl IdentityCodec {
    pub fn new(users: Arc<dyn CredentialStore>) -> Self {
        Self { users }
    }

    /// Project the user down to its identifier.
    pub fn serialize(user: &User) -> String {
        user.id.to_string()
    }

    /// Look the identifier up again. A malformed token or a token whose user
    /// no longer exists is an invalid session (`None`), not an error; only a
    /// store failure is an error.
    pub async fn deserialize(&self, token: &str) -> Result<Option<User>, AppError> {
        let Ok(id) = token.parse::<UserId>() else {
            debug!("session token is not a user id, treating session as invalid");
            return Ok(None);
        };
        Ok(self.users.find_by_id(id).await?)
    }
}
