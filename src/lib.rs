use axum::{Router, extract::FromRef, http::HeaderName, middleware};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core gate services and components.
pub mod auth;
pub mod config;
pub mod gate;
pub mod guard;
pub mod models;
pub mod policy;
pub mod session;
pub mod verify;

// Request handling.
pub mod handlers;
pub mod routes;

use routes::{dashboard, protected, public};

// --- Public Re-exports ---

// Makes core state types easily accessible to the application entry point
// (main.rs) and to integration tests.
pub use config::AppConfig;
pub use policy::{PolicyState, RoutePolicy};
pub use session::{CookieSessionStore, MemorySessionStore, SessionStore};
pub use verify::{HttpVerifier, MockVerifier, VerifierState};

/// ApiDoc
///
/// Auto-generates the OpenAPI documentation (Swagger JSON) for the gate.
/// It aggregates all paths and schemas decorated with the `#[utoipa::path]`
/// and `#[derive(utoipa::ToSchema)]` macros. The resulting JSON is served
/// at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health_check, handlers::sign_in, handlers::establish_session,
        handlers::logout, handlers::profile, handlers::profile_section,
        handlers::quiz_home, handlers::quiz_section, handlers::resources_home,
        handlers::resources_section, handlers::dashboard_overview,
        handlers::admin_dashboard, handlers::event_lead_dashboard
    ),
    components(
        schemas(
            models::Role, models::EstablishSessionRequest, models::SignInNotice,
            models::SessionProfile, models::DashboardShell, models::ContentShell,
        )
    ),
    tags(
        (name = "vyuha-gate", description = "Vyuha session and role gate")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single, thread-safe, immutable container holding everything the gate
/// needs per request: the token verifier, the loaded configuration, and the
/// route policy table. Shared across all incoming requests.
#[derive(Clone)]
pub struct AppState {
    /// Verifier: asks the platform API whether a token is still valid.
    pub verifier: VerifierState,
    /// Configuration: the loaded, immutable environment configuration.
    pub config: AppConfig,
    /// Policy: the path-to-access table consulted once per request.
    pub policy: PolicyState,
}

// --- Axum FromRef Extractor Implementations ---

// These let handlers and middleware pull individual components out of the
// shared AppState instead of taking the whole thing.

impl FromRef<AppState> for VerifierState {
    fn from_ref(app_state: &AppState) -> VerifierState {
        app_state.verifier.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

impl FromRef<AppState> for PolicyState {
    fn from_ref(app_state: &AppState) -> PolicyState {
        app_state.policy.clone()
    }
}

/// create_router
///
/// Assembles the gate's entire routing structure, applies the policy gate
/// and the observability layers, and registers the application state.
///
/// Enforcement is one layer wrapped around everything routed (public,
/// member, dashboard, and documentation surfaces alike), with the policy
/// table deciding per path what the gate demands. There is no second place
/// where protection happens.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for request correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        // Documentation: serve the auto-generated Swagger UI.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // The platform surfaces.
        .merge(public::router())
        .merge(protected::router())
        .merge(dashboard::router())
        // The single enforcement point, wrapped around every route above.
        .layer(middleware::from_fn_with_state(
            state.clone(),
            gate::policy_gate,
        ))
        // Apply the shared state to all routes.
        .with_state(state);

    // 3. Observability and Correlation Layers (applied outermost/first)
    base_router
        .layer(
            ServiceBuilder::new()
                // 3a. Request ID generation: a unique UUID per incoming request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // 3b. Request tracing: wraps the request/response lifecycle in
                // a span carrying the generated request ID.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // 3c. Request ID propagation back to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS layer, outermost.
        .layer(cors)
}

/// trace_span_logger
///
/// Builds the per-request tracing span for `TraceLayer`, pulling in the
/// `x-request-id` header so every log line for one request shares an ID.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
