use axum::{Router, routing::get};

use crate::AppState;
use crate::handlers;

/// router
///
/// The member areas. Their paths sit at `Session` level in the policy
/// table, so by the time a handler runs the gate has already checked the
/// token and put the session snapshot into the request extensions.
///
/// Wildcard rows exist so sub-pages resolve to a handler instead of the
/// fallback; the gate protects them either way.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profile", get(handlers::profile))
        .route("/profile/{*section}", get(handlers::profile_section))
        .route("/quiz", get(handlers::quiz_home))
        .route("/quiz/{*section}", get(handlers::quiz_section))
        .route("/resources", get(handlers::resources_home))
        .route("/resources/{*section}", get(handlers::resources_section))
}
