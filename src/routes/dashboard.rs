use axum::{Router, routing::get};

use crate::AppState;
use crate::handlers;

/// router
///
/// The role-gated dashboards. The shared entry accepts either dashboard
/// role; the admin and event-lead subtrees demand their own role exactly.
/// All of that lives in the policy table, so these routes only render
/// shells from the identity the guard attached.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(handlers::dashboard_overview))
        .route("/dashboard/admin", get(handlers::admin_dashboard))
        .route("/dashboard/admin/{*section}", get(handlers::admin_dashboard))
        .route("/dashboard/event-lead", get(handlers::event_lead_dashboard))
        .route(
            "/dashboard/event-lead/{*section}",
            get(handlers::event_lead_dashboard),
        )
}
