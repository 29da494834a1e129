use axum::{
    Router,
    routing::{get, post},
};

use crate::AppState;
use crate::handlers;

/// router
///
/// Surfaces reachable without a session: the health probe and the auth
/// endpoints themselves. The gate still sees these requests; the policy
/// table marks their paths public.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/auth/sign-in", get(handlers::sign_in))
        .route("/auth/session", post(handlers::establish_session))
        .route("/auth/logout", post(handlers::logout))
}
