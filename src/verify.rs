use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::config::AppConfig;

/// VerifyError
///
/// Transport-level verification failures: the platform API could not be
/// asked. A reachable API that answers non-200 is not an error; that is a
/// definitive rejection, reported as `Ok(false)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// No response within the configured deadline.
    Timeout,
    /// Connection-level failure (DNS, refused, reset).
    Transport(String),
}

impl std::fmt::Display for VerifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerifyError::Timeout => f.write_str("verification request timed out"),
            VerifyError::Transport(detail) => {
                write!(f, "verification request failed: {detail}")
            }
        }
    }
}

impl std::error::Error for VerifyError {}

/// TokenVerifier
///
/// Asks the platform API whether a session token is still valid. The guard
/// depends on this trait so tests can script verification outcomes without a
/// network.
///
/// Returns `Ok(true)` only when the API answered 200 exactly. Any other
/// status is `Ok(false)`. `Err` means the API never answered.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<bool, VerifyError>;
}

pub type VerifierState = std::sync::Arc<dyn TokenVerifier>;

// --- HTTP Verifier ---

/// HttpVerifier
///
/// Production implementation: GET {API_BASE}/api/auth/verify with the token
/// as a Bearer header. Each attempt runs under an explicit timeout, and
/// transport failures are retried a bounded number of times. Definitive
/// answers (any HTTP status) are never retried.
pub struct HttpVerifier {
    client: reqwest::Client,
    verify_url: String,
    timeout: Duration,
    retries: u32,
}

impl HttpVerifier {
    pub fn from_config(config: &AppConfig) -> Self {
        HttpVerifier {
            client: reqwest::Client::new(),
            verify_url: config.verify_url(),
            timeout: Duration::from_secs(config.verify_timeout_secs),
            retries: config.verify_retries,
        }
    }

    async fn attempt(&self, token: &str) -> Result<bool, VerifyError> {
        let request = self
            .client
            .get(&self.verify_url)
            .header("Authorization", format!("Bearer {token}"))
            .send();

        let response = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| VerifyError::Timeout)?
            .map_err(|e| VerifyError::Transport(e.to_string()))?;

        Ok(response.status().as_u16() == 200)
    }
}

#[async_trait]
impl TokenVerifier for HttpVerifier {
    async fn verify(&self, token: &str) -> Result<bool, VerifyError> {
        let mut attempt: u32 = 0;
        loop {
            match self.attempt(token).await {
                Ok(valid) => return Ok(valid),
                Err(err) if attempt < self.retries => {
                    attempt += 1;
                    tracing::warn!(
                        "Token verification attempt {} failed ({}), retrying",
                        attempt,
                        err
                    );
                }
                Err(err) => {
                    tracing::error!("Token verification failed after retries: {}", err);
                    return Err(err);
                }
            }
        }
    }
}

// --- Mock Verifier ---

/// Scripted outcome for a single `MockVerifier` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockOutcome {
    /// API answers 200.
    Verified,
    /// API answers non-200.
    Rejected,
    /// API never answers.
    Offline,
}

/// MockVerifier
///
/// Test double. Serves queued outcomes first, then the default outcome
/// forever, and counts every call so tests can assert how often (and
/// whether) verification ran.
pub struct MockVerifier {
    default: MockOutcome,
    script: Mutex<VecDeque<MockOutcome>>,
    calls: AtomicUsize,
}

impl MockVerifier {
    pub fn new(default: MockOutcome) -> Self {
        MockVerifier {
            default,
            script: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn verified() -> Self {
        Self::new(MockOutcome::Verified)
    }

    pub fn rejecting() -> Self {
        Self::new(MockOutcome::Rejected)
    }

    pub fn offline() -> Self {
        Self::new(MockOutcome::Offline)
    }

    /// queue
    ///
    /// Enqueues an outcome served before the default kicks in.
    pub fn queue(&self, outcome: MockOutcome) {
        self.script.lock().unwrap().push_back(outcome);
    }

    /// How many times `verify` has been called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenVerifier for MockVerifier {
    async fn verify(&self, _token: &str) -> Result<bool, VerifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(self.default);

        match outcome {
            MockOutcome::Verified => Ok(true),
            MockOutcome::Rejected => Ok(false),
            MockOutcome::Offline => {
                Err(VerifyError::Transport("mock verifier offline".to_string()))
            }
        }
    }
}
