use std::env;

/// AppConfig
///
/// Holds the gate's entire configuration state. The struct is immutable once
/// loaded and is shared across every request via the application state, so a
/// single read of the environment at startup governs the whole process.
#[derive(Clone)]
pub struct AppConfig {
    // Runtime environment marker. Controls log format and secret fallbacks.
    pub env: Env,
    // Base URL of the platform API. The gate only consumes it; every remote
    // call (currently just token verification) is rooted here.
    pub api_base: String,
    // Secret used to validate the signature and expiry of incoming session
    // tokens before any role decision is made.
    pub jwt_secret: String,
    // Per-request timeout for the verification call, in seconds.
    pub verify_timeout_secs: u64,
    // Number of extra attempts after a transport failure of the verification
    // call. Non-200 responses are definitive and are never retried.
    pub verify_retries: u32,
}

/// Env
///
/// Defines the runtime context, used to switch between development defaults
/// (pretty logs, fallback secret) and hardened production behavior (JSON
/// logs, mandatory secrets).
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// default
    ///
    /// Provides a safe, non-panicking AppConfig instance primarily used for
    /// test setup. Tests can instantiate state without touching the process
    /// environment.
    fn default() -> Self {
        Self {
            env: Env::Local,
            api_base: "http://localhost:8000".to_string(),
            jwt_secret: "vyuha-local-dev-secret-do-not-deploy".to_string(),
            verify_timeout_secs: 5,
            verify_retries: 1,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// The canonical function for initializing the gate configuration at
    /// startup. Reads all parameters from environment variables and
    /// implements the **fail-fast** principle.
    ///
    /// # Panics
    /// Panics if a critical environment variable required for the current
    /// runtime environment (especially Production) is not set. Starting with
    /// an incomplete configuration would silently weaken the gate.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        // JWT Secret Resolution
        // The production secret is mandatory and must be explicitly set.
        let jwt_secret = match env {
            Env::Production => env::var("VYUHA_JWT_SECRET")
                .expect("FATAL: VYUHA_JWT_SECRET must be set in production."),
            // In local, we provide a fallback, though the developer should
            // ideally use the real secret of their local API instance.
            _ => env::var("VYUHA_JWT_SECRET")
                .unwrap_or_else(|_| "vyuha-local-dev-secret-do-not-deploy".to_string()),
        };

        // API Base Resolution
        // The single externally-configured base URL for all remote calls.
        let api_base = match env {
            Env::Production => {
                env::var("API_BASE_URL").expect("FATAL: API_BASE_URL required in prod")
            }
            _ => env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:8000".to_string()),
        };

        // Verification tuning knobs. Optional in every environment; a bad
        // value falls back to the default rather than aborting startup.
        let verify_timeout_secs = env::var("VERIFY_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);
        let verify_retries = env::var("VERIFY_RETRIES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1);

        Self {
            env,
            api_base,
            jwt_secret,
            verify_timeout_secs,
            verify_retries,
        }
    }

    /// verify_url
    ///
    /// Fully qualified URL of the token verification endpoint. Kept here so
    /// the endpoint path is fixed in exactly one place.
    pub fn verify_url(&self) -> String {
        format!("{}/api/auth/verify", self.api_base.trim_end_matches('/'))
    }
}
