// ============================
// crates/gatehouse-lib/src/store.rs
// ============================
//! Credential store abstraction with an in-memory implementation.
//!
//! Uniqueness of email and federated subject id is enforced HERE, not by the
//! callers: the concurrent first-federated-login race is resolved purely by
//! the store rejecting the second insert.
use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::user::{NewUser, User, UserId};

/// Errors surfaced by a credential store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("unique constraint violated on {0}")]
    Conflict(&'static str),
}

/// Trait for credential store backends
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;

    async fn find_by_subject(&self, subject: &str) -> Result<Option<User>, StoreError>;

    /// Insert a new record, failing with [`StoreError::Conflict`] when email
    /// or subject id is already taken.
    async fn insert(&self, user: NewUser) -> Result<User, StoreError>;

    /// Insert, treating a conflict as "fetch the row that won".
    ///
    /// Two concurrent first logins for one subject id both call this; one
    /// insert succeeds, the other observes the conflict and reads the
    /// existing record back. Neither caller sees an error.
    async fn insert_or_fetch_by_subject(&self, user: NewUser) -> Result<User, StoreError> {
        let subject = user.federated_subject.clone();
        match self.insert(user).await {
            Ok(created) => Ok(created),
            Err(StoreError::Conflict(_)) => {
                let subject = subject.ok_or_else(|| {
                    StoreError::Unavailable("conflict on insert without a subject id".to_string())
                })?;
                self.find_by_subject(&subject).await?.ok_or_else(|| {
                    StoreError::Unavailable("conflicting record disappeared".to_string())
                })
            },
            Err(e) => Err(e),
        }
    }
}

#[derive(Default)]
struct Inner {
    next_id: UserId,
    users: HashMap<UserId, User>,
    by_email: HashMap<String, UserId>,
    by_subject: HashMap<String, UserId>,
}

/// In-memory implementation of the [`CredentialStore`] trait.
///
/// A single write lock makes check-and-insert atomic, which is what gives the
/// uniqueness guarantees above.
pub struct MemoryCredentialStore {
    inner: RwLock<Inner>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_id: 1,
                ..Inner::default()
            }),
        }
    }

    /// Number of stored users.
    pub async fn user_count(&self) -> usize {
        self.inner.read().await.users.len()
    }
}

impl Default for MemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .by_email
            .get(email)
            .and_then(|id| inner.users.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn find_by_subject(&self, subject: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .by_subject
            .get(subject)
            .and_then(|id| inner.users.get(id))
            .cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;

        if let Some(email) = &user.email {
            if inner.by_email.contains_key(email) {
                return Err(StoreError::Conflict("email"));
            }
        }
        if let Some(subject) = &user.federated_subject {
            if inner.by_subject.contains_key(subject) {
                return Err(StoreError::Conflict("federated_subject"));
            }
        }

        let id = inner.next_id;
        inner.next_id += 1;

        let record = User {
            id,
            email: user.email,
            password_hash: user.password_hash,
            federated_subject: user.federated_subject,
        };
        if let Some(email) = &record.email {
            inner.by_email.insert(email.clone(), id);
        }
        if let Some(subject) = &record.federated_subject {
            inner.by_subject.insert(subject.clone(), id);
        }
        inner.users.insert(id, record.clone());

        Ok(record)
    }
}
