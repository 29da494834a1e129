use jsonwebtoken::{EncodingKey, Header, encode};
use std::time::SystemTime;
use vyuha_gate::{
    MemorySessionStore, MockVerifier,
    auth::Claims,
    guard::{GuardDenial, GuardOutcome, check_session, run_guard},
    models::Role,
    verify::MockOutcome,
};

// --- Helper Functions ---

const TEST_JWT_SECRET: &str = "test-secret-value-1234567890";
const TEST_USER_ID: &str = "user-1";

fn create_token(role: Option<&str>, exp_offset: i64) -> String {
    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;

    let claims = Claims {
        sub: TEST_USER_ID.to_string(),
        role: role.map(|r| r.to_string()),
        iat: now as usize,
        exp: (now + exp_offset) as usize, // Negative offset mints an already-expired token
    };

    let key = EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes());
    encode(&Header::default(), &claims, &key).unwrap()
}

fn store_with(token: &str, cookie_role: &str) -> MemorySessionStore {
    let store = MemorySessionStore::new();
    store.seed(token, cookie_role, TEST_USER_ID);
    store
}

// --- Guard Sequence Tests ---

#[tokio::test]
async fn test_guard_authorizes_admin_with_verified_token() {
    let token = create_token(Some("admin"), 3600);
    let store = store_with(&token, "admin");
    let verifier = MockVerifier::verified();

    let outcome = run_guard(&store, &[Role::Admin], &verifier, TEST_JWT_SECRET).await;

    match outcome {
        GuardOutcome::Authorized(identity) => {
            assert_eq!(identity.user_id, TEST_USER_ID);
            assert_eq!(identity.role, Role::Admin);
        }
        GuardOutcome::Denied(denial) => panic!("expected authorization, got {:?}", denial),
    }
    assert_eq!(verifier.calls(), 1);
}

#[tokio::test]
async fn test_guard_denies_empty_store_without_calling_verifier() {
    let store = MemorySessionStore::new();
    let verifier = MockVerifier::verified();

    let outcome = run_guard(&store, &[Role::Admin], &verifier, TEST_JWT_SECRET).await;

    assert_eq!(
        outcome,
        GuardOutcome::Denied(GuardDenial::NotAuthenticated)
    );
    assert_eq!(verifier.calls(), 0, "missing session must not reach the network");
}

#[tokio::test]
async fn test_guard_denies_role_cookie_without_token() {
    // A role cookie alone proves nothing; the presence check runs first.
    let store = MemorySessionStore::new();
    store.seed("", "admin", TEST_USER_ID);
    let verifier = MockVerifier::verified();

    let outcome = run_guard(&store, &[Role::Admin], &verifier, TEST_JWT_SECRET).await;

    assert_eq!(
        outcome,
        GuardOutcome::Denied(GuardDenial::NotAuthenticated)
    );
    assert_eq!(verifier.calls(), 0);
}

#[tokio::test]
async fn test_guard_rejects_expired_token_locally() {
    let token = create_token(Some("admin"), -3600);
    let store = store_with(&token, "admin");
    let verifier = MockVerifier::verified();

    let outcome = run_guard(&store, &[Role::Admin], &verifier, TEST_JWT_SECRET).await;

    assert_eq!(outcome, GuardOutcome::Denied(GuardDenial::InvalidSession));
    assert_eq!(verifier.calls(), 0, "expired token is locally definitive");
}

#[tokio::test]
async fn test_guard_rejects_garbage_token_locally() {
    let store = store_with("not-a-jwt-at-all", "admin");
    let verifier = MockVerifier::verified();

    let outcome = run_guard(&store, &[Role::Admin], &verifier, TEST_JWT_SECRET).await;

    assert_eq!(outcome, GuardOutcome::Denied(GuardDenial::InvalidSession));
    assert_eq!(verifier.calls(), 0);
}

#[tokio::test]
async fn test_guard_rejects_token_signed_with_wrong_secret() {
    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize;
    let claims = Claims {
        sub: TEST_USER_ID.to_string(),
        role: Some("admin".to_string()),
        iat: now,
        exp: now + 3600,
    };
    let forged = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"some-other-secret"),
    )
    .unwrap();

    let store = store_with(&forged, "admin");
    let verifier = MockVerifier::verified();

    let outcome = run_guard(&store, &[Role::Admin], &verifier, TEST_JWT_SECRET).await;

    assert_eq!(outcome, GuardOutcome::Denied(GuardDenial::InvalidSession));
    assert_eq!(verifier.calls(), 0);
}

#[tokio::test]
async fn test_guard_denies_wrong_role_before_verification() {
    let token = create_token(Some("student"), 3600);
    let store = store_with(&token, "student");
    let verifier = MockVerifier::verified();

    let outcome = run_guard(&store, &[Role::Admin], &verifier, TEST_JWT_SECRET).await;

    assert_eq!(outcome, GuardOutcome::Denied(GuardDenial::WrongRole));
    assert_eq!(verifier.calls(), 0, "role mismatch must short-circuit before the network");
}

#[tokio::test]
async fn test_guard_reads_role_from_claims_not_cookie() {
    // The cookie claims admin, the signed token says student. The token wins.
    let token = create_token(Some("student"), 3600);
    let store = store_with(&token, "admin");
    let verifier = MockVerifier::verified();

    let outcome = run_guard(&store, &[Role::Admin], &verifier, TEST_JWT_SECRET).await;

    assert_eq!(outcome, GuardOutcome::Denied(GuardDenial::WrongRole));
    assert_eq!(verifier.calls(), 0);
}

#[tokio::test]
async fn test_guard_unknown_role_claim_fails_closed() {
    let token = create_token(Some("superuser"), 3600);
    let store = store_with(&token, "superuser");
    let verifier = MockVerifier::verified();

    let outcome = run_guard(&store, &[Role::Admin], &verifier, TEST_JWT_SECRET).await;

    assert_eq!(outcome, GuardOutcome::Denied(GuardDenial::WrongRole));
}

#[tokio::test]
async fn test_guard_missing_role_claim_denied() {
    let token = create_token(None, 3600);
    let store = store_with(&token, "admin");
    let verifier = MockVerifier::verified();

    let outcome = run_guard(&store, &[Role::Admin], &verifier, TEST_JWT_SECRET).await;

    assert_eq!(outcome, GuardOutcome::Denied(GuardDenial::WrongRole));
}

#[tokio::test]
async fn test_guard_any_role_accepts_each_dashboard_role() {
    let required = [Role::Admin, Role::EventLead];

    for role in ["admin", "event_lead"] {
        let token = create_token(Some(role), 3600);
        let store = store_with(&token, role);
        let verifier = MockVerifier::verified();

        let outcome = run_guard(&store, &required, &verifier, TEST_JWT_SECRET).await;

        assert!(
            matches!(outcome, GuardOutcome::Authorized(_)),
            "{} should reach the shared dashboard",
            role
        );
    }
}

#[tokio::test]
async fn test_guard_empty_requirement_denies() {
    let token = create_token(Some("admin"), 3600);
    let store = store_with(&token, "admin");
    let verifier = MockVerifier::verified();

    let outcome = run_guard(&store, &[], &verifier, TEST_JWT_SECRET).await;

    assert_eq!(outcome, GuardOutcome::Denied(GuardDenial::WrongRole));
}

#[tokio::test]
async fn test_guard_rejected_verification_condemns_token() {
    let token = create_token(Some("admin"), 3600);
    let store = store_with(&token, "admin");
    let verifier = MockVerifier::rejecting();

    let outcome = run_guard(&store, &[Role::Admin], &verifier, TEST_JWT_SECRET).await;

    assert_eq!(outcome, GuardOutcome::Denied(GuardDenial::InvalidSession));
    assert_eq!(verifier.calls(), 1);
}

#[tokio::test]
async fn test_guard_unreachable_verifier_denies_without_condemning() {
    let token = create_token(Some("admin"), 3600);
    let store = store_with(&token, "admin");
    let verifier = MockVerifier::offline();

    let outcome = run_guard(&store, &[Role::Admin], &verifier, TEST_JWT_SECRET).await;

    assert_eq!(outcome, GuardOutcome::Denied(GuardDenial::VerifyUnavailable));
}

#[tokio::test]
async fn test_guard_verifies_exactly_once_per_request() {
    let token = create_token(Some("event_lead"), 3600);
    let store = store_with(&token, "event_lead");
    let verifier = MockVerifier::verified();

    let outcome = run_guard(&store, &[Role::EventLead], &verifier, TEST_JWT_SECRET).await;

    assert!(matches!(outcome, GuardOutcome::Authorized(_)));
    assert_eq!(verifier.calls(), 1);
}

#[tokio::test]
async fn test_guard_scripted_outcome_applies_to_first_call() {
    let token = create_token(Some("admin"), 3600);
    let store = store_with(&token, "admin");
    let verifier = MockVerifier::verified();
    verifier.queue(MockOutcome::Rejected);

    let first = run_guard(&store, &[Role::Admin], &verifier, TEST_JWT_SECRET).await;
    let second = run_guard(&store, &[Role::Admin], &verifier, TEST_JWT_SECRET).await;

    assert_eq!(first, GuardOutcome::Denied(GuardDenial::InvalidSession));
    assert!(matches!(second, GuardOutcome::Authorized(_)));
    assert_eq!(verifier.calls(), 2);
}

// --- Session Check Tests ---

#[tokio::test]
async fn test_check_session_accepts_live_token_with_any_role() {
    let token = create_token(Some("student"), 3600);
    let store = store_with(&token, "student");

    let session = check_session(&store, TEST_JWT_SECRET).expect("live session should pass");
    assert!(session.is_authenticated());
    assert_eq!(session.role, Some(Role::Student));
}

#[tokio::test]
async fn test_check_session_accepts_token_without_role_claim() {
    // Member areas only need a live session, not a role.
    let token = create_token(None, 3600);
    let store = store_with(&token, "");

    let session = check_session(&store, TEST_JWT_SECRET).expect("roleless session should pass");
    assert_eq!(session.role, None);
}

#[tokio::test]
async fn test_check_session_rejects_empty_store() {
    let store = MemorySessionStore::new();
    let denial = check_session(&store, TEST_JWT_SECRET).unwrap_err();
    assert_eq!(denial, GuardDenial::NotAuthenticated);
}

#[tokio::test]
async fn test_check_session_rejects_expired_token() {
    let token = create_token(Some("student"), -60);
    let store = store_with(&token, "student");

    let denial = check_session(&store, TEST_JWT_SECRET).unwrap_err();
    assert_eq!(denial, GuardDenial::InvalidSession);
}

// --- Denial Rendering Tests ---

#[test]
fn test_denial_markers_match_their_meanings() {
    assert_eq!(GuardDenial::NotAuthenticated.marker(), None);
    assert_eq!(GuardDenial::InvalidSession.marker(), Some("token_invalid"));
    assert_eq!(GuardDenial::WrongRole.marker(), Some("unauthorized"));
    assert_eq!(GuardDenial::VerifyUnavailable.marker(), Some("auth_failed"));
}

#[test]
fn test_denial_redirect_paths() {
    assert_eq!(GuardDenial::NotAuthenticated.redirect_path(), "/auth/sign-in");
    assert_eq!(
        GuardDenial::WrongRole.redirect_path(),
        "/auth/sign-in?error=unauthorized"
    );
    assert_eq!(
        GuardDenial::InvalidSession.redirect_path(),
        "/auth/sign-in?error=token_invalid"
    );
    assert_eq!(
        GuardDenial::VerifyUnavailable.redirect_path(),
        "/auth/sign-in?error=auth_failed"
    );
}

#[test]
fn test_only_token_condemning_denials_clear_the_session() {
    assert!(!GuardDenial::NotAuthenticated.clears_session());
    assert!(!GuardDenial::WrongRole.clears_session());
    assert!(GuardDenial::InvalidSession.clears_session());
    assert!(GuardDenial::VerifyUnavailable.clears_session());
}
