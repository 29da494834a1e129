use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vyuha_gate::{
    AppState, PolicyState, RoutePolicy, VerifierState,
    config::{AppConfig, Env},
    create_router,
    verify::HttpVerifier,
};

/// main
///
/// The asynchronous entry point: loads configuration, sets up logging,
/// builds the verifier and policy table, and starts the HTTP server.
#[tokio::main]
async fn main() {
    // 1. Configuration & Environment Loading (Fail-Fast)
    // Loads .env file settings before configuration can be read.
    dotenv::dotenv().ok();
    // AppConfig::load() fails fast on missing Production secrets.
    let config = AppConfig::load();

    // 2. Logging Filter Setup
    // Prioritizes the RUST_LOG environment variable, falling back to
    // sensible defaults for local development.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "vyuha_gate=debug,tower_http=info,axum=trace".into());

    // 3. Initialize Logging based on Environment
    match config.env {
        Env::Local => {
            // LOCAL: pretty output for human readability.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            // PROD: JSON output for centralized log aggregators.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Gate starting in {:?} mode", config.env);
    tracing::info!("Verifying sessions against {}", config.verify_url());

    // 4. Token Verifier Initialization
    // The HTTP verifier calls the platform API's verify endpoint with the
    // timeout and retry budget from configuration.
    let verifier = Arc::new(HttpVerifier::from_config(&config)) as VerifierState;

    // 5. Route Policy
    // The production table: which path prefixes demand a session, which
    // demand a role, everything else public.
    let policy: PolicyState = Arc::new(RoutePolicy::vyuha());

    // 6. Unified State Assembly
    let app_state = AppState {
        verifier,
        config,
        policy,
    };

    // 7. Router and Server Startup
    let app = create_router(app_state);

    let listener = TcpListener::bind("0.0.0.0:3000").await.unwrap();

    tracing::info!("HTTP server bound successfully.");
    tracing::info!("Listening on 0.0.0.0:3000");
    tracing::info!("API Documentation (Swagger UI) available at: http://localhost:3000/swagger-ui");

    axum::serve(listener, app).await.unwrap();
}
