//! End-to-end tests of the authentication core: strategies, codec, and the
//! request authenticator, with the provider exchange stubbed out.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use gatehouse_lib::auth::{
    hash_password, AuthOutcome, CallbackPayload, Credentials, FederatedStrategy, IdentityCodec,
    MemorySessionStore, PasswordStrategy, ProviderClient, ProviderProfile, RejectReason,
    RequestAuthenticator, Strategy, StrategyRegistry, LOCAL_STRATEGY, SESSION_TTL,
};
use gatehouse_lib::error::AppError;
use gatehouse_lib::store::{CredentialStore, MemoryCredentialStore, StoreError};
use gatehouse_lib::user::{NewUser, User, UserId};

/// Provider stub returning a fixed profile.
struct StaticProvider {
    profile: ProviderProfile,
}

impl StaticProvider {
    fn with_subject(subject: &str) -> Self {
        Self {
            profile: ProviderProfile {
                subject: Some(subject.to_string()),
                ..ProviderProfile::default()
            },
        }
    }

    fn without_subject() -> Self {
        Self {
            profile: ProviderProfile::default(),
        }
    }
}

#[async_trait]
impl ProviderClient for StaticProvider {
    async fn exchange_code(&self, _code: &str) -> Result<ProviderProfile, AppError> {
        // Widen the race window for the concurrent-completion test.
        tokio::time::sleep(Duration::from_millis(1)).await;
        Ok(self.profile.clone())
    }
}

/// Credential store that is always down.
struct UnreachableStore;

#[async_trait]
impl CredentialStore for UnreachableStore {
    async fn find_by_email(&self, _email: &str) -> Result<Option<User>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn find_by_id(&self, _id: UserId) -> Result<Option<User>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn find_by_subject(&self, _subject: &str) -> Result<Option<User>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn insert(&self, _user: NewUser) -> Result<User, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

async fn seeded_store(email: &str, password: &str) -> (Arc<MemoryCredentialStore>, User) {
    let store = Arc::new(MemoryCredentialStore::new());
    let hash = hash_password(password).unwrap();
    let user = store.insert(NewUser::local(email, hash)).await.unwrap();
    (store, user)
}

fn authenticator_over(
    users: Arc<MemoryCredentialStore>,
    provider: Arc<dyn ProviderClient>,
) -> RequestAuthenticator {
    let mut registry = StrategyRegistry::new();
    registry.register(Arc::new(PasswordStrategy::new(
        users.clone() as Arc<dyn CredentialStore>
    )));
    registry.register(Arc::new(FederatedStrategy::new(
        "google".to_string(),
        provider,
        users.clone() as Arc<dyn CredentialStore>,
    )));
    RequestAuthenticator::new(
        registry,
        IdentityCodec::new(users as Arc<dyn CredentialStore>),
        Arc::new(MemorySessionStore::new(SESSION_TTL)),
    )
}

fn callback_with_code(code: &str) -> Credentials {
    Credentials::FederatedCallback(CallbackPayload {
        code: Some(code.to_string()),
        ..CallbackPayload::default()
    })
}

#[tokio::test]
async fn local_strategy_accepts_matching_credentials() {
    let (store, registered) = seeded_store("a@x.com", "secret").await;
    let strategy = PasswordStrategy::new(store as Arc<dyn CredentialStore>);

    let outcome = strategy
        .verify(Credentials::Password {
            email: "a@x.com".to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap();

    match outcome {
        AuthOutcome::Authenticated(user) => assert_eq!(user.id, registered.id),
        other => panic!("expected Authenticated, got {other:?}"),
    }
}

#[tokio::test]
async fn local_strategy_rejects_wrong_password() {
    let (store, _) = seeded_store("a@x.com", "secret").await;
    let strategy = PasswordStrategy::new(store as Arc<dyn CredentialStore>);

    let outcome = strategy
        .verify(Credentials::Password {
            email: "a@x.com".to_string(),
            password: "wrong".to_string(),
        })
        .await
        .unwrap();

    assert!(matches!(
        outcome,
        AuthOutcome::Rejected(RejectReason::BadCredential)
    ));
}

#[tokio::test]
async fn local_strategy_rejects_unknown_email() {
    let store = Arc::new(MemoryCredentialStore::new());
    let strategy = PasswordStrategy::new(store as Arc<dyn CredentialStore>);

    let outcome = strategy
        .verify(Credentials::Password {
            email: "nobody@x.com".to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap();

    assert!(matches!(
        outcome,
        AuthOutcome::Rejected(RejectReason::UnknownAccount)
    ));
}

#[tokio::test]
async fn local_strategy_surfaces_store_failure_as_error() {
    let strategy = PasswordStrategy::new(Arc::new(UnreachableStore));

    let result = strategy
        .verify(Credentials::Password {
            email: "a@x.com".to_string(),
            password: "secret".to_string(),
        })
        .await;

    // A dead store is an infrastructure failure, never a rejection.
    assert!(matches!(result, Err(AppError::Store(_))));
}

#[tokio::test]
async fn federated_only_account_cannot_login_locally() {
    let store = Arc::new(MemoryCredentialStore::new());
    store.insert(NewUser::federated("g-7")).await.unwrap();
    let strategy = PasswordStrategy::new(store as Arc<dyn CredentialStore>);

    let outcome = strategy
        .verify(Credentials::Password {
            email: "g-7".to_string(),
            password: "anything".to_string(),
        })
        .await
        .unwrap();

    assert!(matches!(outcome, AuthOutcome::Rejected(_)));
}

#[tokio::test]
async fn codec_treats_unknown_or_malformed_token_as_invalid() {
    let store = Arc::new(MemoryCredentialStore::new());
    let codec = IdentityCodec::new(store as Arc<dyn CredentialStore>);

    // No user 99999 was ever created.
    assert!(codec.deserialize("99999").await.unwrap().is_none());
    // Garbage tokens degrade the same way.
    assert!(codec.deserialize("not-a-user-id").await.unwrap().is_none());
}

#[tokio::test]
async fn federated_completion_provisions_then_reuses() {
    let store = Arc::new(MemoryCredentialStore::new());
    let strategy = FederatedStrategy::new(
        "google".to_string(),
        Arc::new(StaticProvider::with_subject("g-123")),
        store.clone() as Arc<dyn CredentialStore>,
    );

    let first = strategy.verify(callback_with_code("code-1")).await.unwrap();
    let AuthOutcome::Authenticated(first_user) = first else {
        panic!("expected Authenticated");
    };
    assert_eq!(first_user.federated_subject.as_deref(), Some("g-123"));
    assert_eq!(first_user.email, None);
    assert_eq!(first_user.password_hash, None);

    let second = strategy.verify(callback_with_code("code-2")).await.unwrap();
    let AuthOutcome::Authenticated(second_user) = second else {
        panic!("expected Authenticated");
    };
    assert_eq!(first_user.id, second_user.id);
    assert_eq!(store.user_count().await, 1);
}

#[tokio::test]
async fn federated_completion_rejects_profile_without_subject() {
    let store = Arc::new(MemoryCredentialStore::new());
    let strategy = FederatedStrategy::new(
        "google".to_string(),
        Arc::new(StaticProvider::without_subject()),
        store.clone() as Arc<dyn CredentialStore>,
    );

    let outcome = strategy.verify(callback_with_code("code-1")).await.unwrap();
    assert!(matches!(
        outcome,
        AuthOutcome::Rejected(RejectReason::InvalidProviderResponse)
    ));
    assert_eq!(store.user_count().await, 0);
}

#[tokio::test]
async fn federated_callback_without_code_is_rejected() {
    let store = Arc::new(MemoryCredentialStore::new());
    let strategy = FederatedStrategy::new(
        "google".to_string(),
        Arc::new(StaticProvider::with_subject("g-123")),
        store as Arc<dyn CredentialStore>,
    );

    let outcome = strategy
        .verify(Credentials::FederatedCallback(CallbackPayload::default()))
        .await
        .unwrap();
    assert!(matches!(
        outcome,
        AuthOutcome::Rejected(RejectReason::InvalidProviderResponse)
    ));

    let outcome = strategy
        .verify(Credentials::FederatedCallback(CallbackPayload {
            error: Some("access_denied".to_string()),
            ..CallbackPayload::default()
        }))
        .await
        .unwrap();
    assert!(matches!(
        outcome,
        AuthOutcome::Rejected(RejectReason::InvalidProviderResponse)
    ));
}

#[tokio::test]
async fn concurrent_federated_completions_create_one_user() {
    let store = Arc::new(MemoryCredentialStore::new());
    let strategy = Arc::new(FederatedStrategy::new(
        "google".to_string(),
        Arc::new(StaticProvider::with_subject("g-race")),
        store.clone() as Arc<dyn CredentialStore>,
    ));

    let mut handles = Vec::new();
    for i in 0..8 {
        let strategy = Arc::clone(&strategy);
        handles.push(tokio::spawn(async move {
            strategy
                .verify(callback_with_code(&format!("code-{i}")))
                .await
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        match handle.await.unwrap().unwrap() {
            AuthOutcome::Authenticated(user) => ids.push(user.id),
            other => panic!("expected Authenticated, got {other:?}"),
        }
    }

    // Exactly one record, and every completion resolved to it.
    assert_eq!(store.user_count().await, 1);
    assert!(ids.windows(2).all(|pair| pair[0] == pair[1]));
}

#[tokio::test]
async fn authenticate_persists_session_and_current_user_resolves() {
    let (store, registered) = seeded_store("a@x.com", "secret").await;
    let authenticator =
        authenticator_over(store, Arc::new(StaticProvider::with_subject("g-1")));

    let outcome = authenticator
        .authenticate(
            "sid-1",
            LOCAL_STRATEGY,
            Credentials::Password {
                email: "a@x.com".to_string(),
                password: "secret".to_string(),
            },
        )
        .await
        .unwrap();
    assert!(matches!(outcome, AuthOutcome::Authenticated(_)));

    let resolved = authenticator.current_user("sid-1").await.unwrap().unwrap();
    assert_eq!(resolved.id, registered.id);

    // Unknown session ids resolve to "not authenticated".
    assert!(authenticator.current_user("sid-2").await.unwrap().is_none());
}

#[tokio::test]
async fn rejected_login_leaves_existing_session_untouched() {
    let (store, registered) = seeded_store("a@x.com", "secret").await;
    let authenticator =
        authenticator_over(store, Arc::new(StaticProvider::with_subject("g-1")));

    authenticator.establish("sid-1", &registered).await.unwrap();

    let outcome = authenticator
        .authenticate(
            "sid-1",
            LOCAL_STRATEGY,
            Credentials::Password {
                email: "a@x.com".to_string(),
                password: "wrong".to_string(),
            },
        )
        .await
        .unwrap();
    assert!(matches!(outcome, AuthOutcome::Rejected(_)));

    // The previously established identity survives the failed attempt.
    let resolved = authenticator.current_user("sid-1").await.unwrap().unwrap();
    assert_eq!(resolved.id, registered.id);
}

#[tokio::test]
async fn logout_clears_session_and_is_idempotent() {
    let (store, registered) = seeded_store("a@x.com", "secret").await;
    let authenticator =
        authenticator_over(store, Arc::new(StaticProvider::with_subject("g-1")));

    authenticator.establish("sid-1", &registered).await.unwrap();
    assert!(authenticator.current_user("sid-1").await.unwrap().is_some());

    authenticator.logout("sid-1").await.unwrap();
    assert!(authenticator.current_user("sid-1").await.unwrap().is_none());

    // Logging out an absent session is not an error.
    authenticator.logout("sid-1").await.unwrap();
    authenticator.logout("never-existed").await.unwrap();
}

#[tokio::test]
async fn unknown_strategy_is_an_error() {
    let (store, _) = seeded_store("a@x.com", "secret").await;
    let authenticator =
        authenticator_over(store, Arc::new(StaticProvider::with_subject("g-1")));

    let result = authenticator
        .authenticate(
            "sid-1",
            "github",
            Credentials::Password {
                email: "a@x.com".to_string(),
                password: "secret".to_string(),
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::UnknownStrategy(_))));

    // And nothing was written to the session.
    assert!(authenticator.current_user("sid-1").await.unwrap().is_none());
}
