// ============================
// crates/gatehouse-lib/src/user.rs
// ============================
//! User records as held by the credential store.
use std::fmt;

use gatehouse_common::SessionUser;

/// Store-assigned user identifier.
pub type UserId = i64;

/// A user record.
///
/// At least one of {email + password hash, federated subject} is always set;
/// both at once means the account is linked to a federated identity. The
/// password hash is a scrypt PHC string and is only ever compared through
/// [`crate::auth::verify_password`].
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub federated_subject: Option<String>,
}

// Keep credential material out of logs.
impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field(
                "password_hash",
                &self.password_hash.as_ref().map(|_| "<redacted>"),
            )
            .field("federated_subject", &self.federated_subject)
            .finish()
    }
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        SessionUser {
            id: user.id,
            email: user.email.clone(),
        }
    }
}

/// Insert-shaped user record; the store assigns the identifier.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub federated_subject: Option<String>,
}

impl NewUser {
    /// A locally registered account.
    pub fn local(email: &str, password_hash: String) -> Self {
        Self {
            email: Some(email.to_string()),
            password_hash: Some(password_hash),
            federated_subject: None,
        }
    }

    /// An account provisioned on first federated login. Only the subject id
    /// is recorded; the provider's other claims are not written.
    pub fn federated(subject: &str) -> Self {
        Self {
            email: None,
            password_hash: None,
            federated_subject: Some(subject.to_string()),
        }
    }
}
