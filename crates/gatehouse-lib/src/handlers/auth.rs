// ============================
// crates/gatehouse-lib/src/handlers/auth.rs
// ============================
//! Authentication endpoints: registration, login, the federated flow,
//! session introspection, and logout.
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use gatehouse_common::{LoginRequest, RegisterRequest, SessionUser};

use crate::auth::{
    hash_password_secure, new_session_id, validate_password_strength, AuthOutcome,
    CallbackPayload, Credentials, RejectReason, LOCAL_STRATEGY,
};
use crate::error::AppError;
use crate::store::{CredentialStore, StoreError};
use crate::user::NewUser;
use crate::validation;
use crate::AppState;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "gatehouse_sid";

fn session_cookie(session_id: &str) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, session_id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

fn removal_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, "")).path("/").build()
}

/// 401 with the rejection reason; rejections are not `AppError`s.
fn rejection(reason: RejectReason) -> Response {
    let body = serde_json::json!({
        "error": {
            "code": "AUTH_002",
            "message": reason.to_string(),
        }
    });
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

/// Drop the session referenced by the incoming cookie, if any. Called only
/// after a successful authentication, so a failed login never touches the
/// caller's existing session.
async fn end_existing_session(state: &AppState, jar: &CookieJar) -> Result<(), AppError> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.authenticator.logout(cookie.value()).await?;
    }
    Ok(())
}

/// `POST /register`: eager local account creation, logged in on success.
pub async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<RegisterRequest>,
) -> Result<Response, AppError> {
    validation::validate_email(&req.email)?;
    if !validate_password_strength(&req.password, &state.settings.password_requirements) {
        return Err(AppError::WeakPassword);
    }

    let mut password = req.password;
    let hash = hash_password_secure(&mut password)?;

    let user = match state.users.insert(NewUser::local(&req.email, hash)).await {
        Ok(user) => user,
        Err(StoreError::Conflict(_)) => return Err(AppError::AccountExists),
        Err(e) => return Err(e.into()),
    };

    let session_id = new_session_id();
    state.authenticator.establish(&session_id, &user).await?;
    end_existing_session(&state, &jar).await?;

    Ok((
        StatusCode::CREATED,
        jar.add(session_cookie(&session_id)),
        Json(SessionUser::from(&user)),
    )
        .into_response())
}

/// `POST /login`: run the local strategy.
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<Response, AppError> {
    let session_id = new_session_id();
    let credentials = Credentials::Password {
        email: req.email,
        password: req.password,
    };

    match state
        .authenticator
        .authenticate(&session_id, LOCAL_STRATEGY, credentials)
        .await?
    {
        AuthOutcome::Authenticated(user) => {
            end_existing_session(&state, &jar).await?;
            Ok((
                jar.add(session_cookie(&session_id)),
                Json(SessionUser::from(&user)),
            )
                .into_response())
        },
        AuthOutcome::Rejected(reason) => Ok(rejection(reason)),
    }
}

/// `GET /auth/federated`: redirect to the provider's authorization endpoint.
pub async fn federated_start(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let url = state.settings.provider.authorize_url()?;
    Ok(Redirect::to(url.as_str()).into_response())
}

/// `GET /auth/federated/callback`: complete the authorization-code flow.
pub async fn federated_callback(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(payload): Query<CallbackPayload>,
) -> Result<Response, AppError> {
    let session_id = new_session_id();
    let strategy = state.settings.provider.name.clone();

    match state
        .authenticator
        .authenticate(&session_id, &strategy, Credentials::FederatedCallback(payload))
        .await?
    {
        AuthOutcome::Authenticated(_) => {
            end_existing_session(&state, &jar).await?;
            Ok((jar.add(session_cookie(&session_id)), Redirect::to("/")).into_response())
        },
        AuthOutcome::Rejected(_) => Ok(Redirect::to("/login").into_response()),
    }
}

/// `GET /me`: resolve the current user from the session cookie.
pub async fn me(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return Err(AppError::Unauthenticated);
    };
    let Some(user) = state.authenticator.current_user(cookie.value()).await? else {
        return Err(AppError::Unauthenticated);
    };
    Ok(Json(SessionUser::from(&user)).into_response())
}

/// `POST /logout`: destroy the current session. Idempotent.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.authenticator.logout(cookie.value()).await?;
    }
    let jar = jar.remove(removal_cookie());
    Ok((StatusCode::NO_CONTENT, jar).into_response())
}
