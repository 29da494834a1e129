use crate::models::Role;
use crate::session::{Session, SessionStore};
use crate::verify::TokenVerifier;

/// Where every denied request is sent.
pub const SIGN_IN_PATH: &str = "/auth/sign-in";

/// SessionIdentity
///
/// The identity a request carries once the guard has authorized it: the
/// subject and role taken from the verified token's claims. Handlers behind
/// a role requirement receive this via request extensions and never re-check
/// anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    pub user_id: String,
    pub role: Role,
}

/// GuardDenial
///
/// Every way the guard can turn a request away, in the order the checks
/// run. Each denial knows its sign-in marker and whether the session
/// cookies should be dropped on the way out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDenial {
    /// No token in the store at all.
    NotAuthenticated,
    /// A token is present but cannot be trusted: it failed local decode
    /// (bad signature, expired) or the platform API rejected it.
    InvalidSession,
    /// The session is fine but its role does not meet the requirement.
    WrongRole,
    /// The platform API could not be reached to verify the token.
    VerifyUnavailable,
}

impl GuardDenial {
    /// marker
    ///
    /// The `error` query marker attached to the sign-in redirect. A plain
    /// missing session carries none; landing on sign-in logged out is not
    /// an error.
    pub fn marker(&self) -> Option<&'static str> {
        match self {
            GuardDenial::NotAuthenticated => None,
            GuardDenial::InvalidSession => Some("token_invalid"),
            GuardDenial::WrongRole => Some("unauthorized"),
            GuardDenial::VerifyUnavailable => Some("auth_failed"),
        }
    }

    /// clears_session
    ///
    /// Whether the stored session should be dropped alongside the redirect.
    /// Only denials that condemn the token itself clear it; a wrong role
    /// keeps the session so the user can go somewhere they are allowed.
    pub fn clears_session(&self) -> bool {
        matches!(
            self,
            GuardDenial::InvalidSession | GuardDenial::VerifyUnavailable
        )
    }

    /// redirect_path
    ///
    /// The sign-in location for this denial, marker included.
    pub fn redirect_path(&self) -> String {
        match self.marker() {
            Some(marker) => format!("{SIGN_IN_PATH}?error={marker}"),
            None => SIGN_IN_PATH.to_string(),
        }
    }
}

/// GuardOutcome
///
/// The single, final decision for a guarded request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Authorized(SessionIdentity),
    Denied(GuardDenial),
}

/// check_session
///
/// The session-level check: a non-empty token that decodes cleanly (valid
/// signature, not expired). No role is required and the platform API is not
/// consulted; this is the cheap gate in front of member areas.
///
/// Returns the resolved snapshot so the request can carry it onward.
pub fn check_session(store: &dyn SessionStore, jwt_secret: &str) -> Result<Session, GuardDenial> {
    let session = Session::resolve(store, jwt_secret);

    if !session.is_authenticated() {
        return Err(GuardDenial::NotAuthenticated);
    }
    if session.claims.is_none() {
        return Err(GuardDenial::InvalidSession);
    }

    Ok(session)
}

/// run_guard
///
/// The full authorization sequence for role-gated areas. Checks run
/// strictly in order and stop at the first failure:
///
/// 1. A token is present (`NotAuthenticated` otherwise; not an error,
///    just not signed in).
/// 2. The token decodes locally. Expiry and signature failures are
///    definitive here; the platform API is never asked about a token we
///    can already reject (`InvalidSession`).
/// 3. The role from the token's claims meets the requirement
///    (`WrongRole`). This also runs before any network call, so a
///    mis-roled session is denied without waking the API.
/// 4. The platform API confirms the token. 200 authorizes; any other
///    status condemns the token (`InvalidSession`); a transport failure
///    after retries denies without condemning anything local
///    (`VerifyUnavailable`).
///
/// An empty requirement denies: no role satisfies it.
pub async fn run_guard(
    store: &dyn SessionStore,
    required: &[Role],
    verifier: &dyn TokenVerifier,
    jwt_secret: &str,
) -> GuardOutcome {
    let session = match check_session(store, jwt_secret) {
        Ok(session) => session,
        Err(denial) => return GuardOutcome::Denied(denial),
    };

    if !session.has_any_role(required) {
        return GuardOutcome::Denied(GuardDenial::WrongRole);
    }

    let (claims, role, token) = match (&session.claims, session.role, &session.token) {
        (Some(claims), Some(role), Some(token)) => (claims, role, token),
        // check_session and has_any_role make this unreachable; fail closed.
        _ => return GuardOutcome::Denied(GuardDenial::InvalidSession),
    };

    match verifier.verify(token).await {
        Ok(true) => GuardOutcome::Authorized(SessionIdentity {
            user_id: claims.sub.clone(),
            role,
        }),
        Ok(false) => GuardOutcome::Denied(GuardDenial::InvalidSession),
        Err(_) => GuardOutcome::Denied(GuardDenial::VerifyUnavailable),
    }
}
