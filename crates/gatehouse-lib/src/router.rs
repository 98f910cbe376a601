// ============================
// crates/gatehouse-lib/src/router.rs
// ============================
//! Route wiring.
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers::auth;
use crate::AppState;

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/auth/federated", get(auth::federated_start))
        .route("/auth/federated/callback", get(auth::federated_callback))
        .route("/me", get(auth::me))
        .route("/logout", post(auth::logout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
