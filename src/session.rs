use std::sync::Mutex;

use axum::http::HeaderMap;
use chrono::{DateTime, Utc};

use crate::auth::{Claims, decode_claims};
use crate::models::Role;

/// Names of the three cookies that make up a Vyuha session. They are always
/// written and cleared together; a session with only some of them present is
/// treated as broken by the reads below.
pub const AUTH_TOKEN_COOKIE: &str = "authToken";
pub const ROLE_COOKIE: &str = "role";
pub const USER_ID_COOKIE: &str = "userId";

/// SessionError
///
/// Failures surfaced by session accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// An authenticated operation was attempted with no token in the store.
    NoToken,
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::NoToken => f.write_str("no session token available"),
        }
    }
}

impl std::error::Error for SessionError {}

/// SessionStore
///
/// Read/write access to the session triple. Every consumer goes through this
/// trait rather than touching cookies directly, so tests can swap in the
/// in-memory store and the cookie mechanics stay in one file.
///
/// There are deliberately no per-cookie setters: the triple only changes as
/// a unit, via `set_session` and `clear`, which keeps the three values from
/// drifting apart.
pub trait SessionStore: Send + Sync {
    /// The raw bearer token, if present and non-empty.
    fn token(&self) -> Option<String>;

    /// The raw role string as stored. Display data only; authorization
    /// reads the role from verified token claims instead.
    fn role(&self) -> Option<String>;

    /// The stored user identifier, if present and non-empty.
    fn user_id(&self) -> Option<String>;

    /// set_session
    ///
    /// Replaces the whole session in one step. The role has already been
    /// validated against the closed set by the time it gets here.
    fn set_session(&self, token: &str, role: Role, user_id: &str);

    /// clear
    ///
    /// Drops all three values together.
    fn clear(&self);
}

#[derive(Debug, Default, Clone)]
struct SessionData {
    token: Option<String>,
    role: Option<String>,
    user_id: Option<String>,
}

impl SessionData {
    fn read(&self, which: &str) -> Option<String> {
        let value = match which {
            AUTH_TOKEN_COOKIE => &self.token,
            ROLE_COOKIE => &self.role,
            USER_ID_COOKIE => &self.user_id,
            _ => return None,
        };
        value.as_ref().filter(|v| !v.is_empty()).cloned()
    }

    fn write(&mut self, which: &str, value: String) {
        match which {
            AUTH_TOKEN_COOKIE => self.token = Some(value),
            ROLE_COOKIE => self.role = Some(value),
            USER_ID_COOKIE => self.user_id = Some(value),
            _ => {}
        }
    }
}

// --- Cookie-Backed Store ---

/// CookieSessionStore
///
/// The production store: reads come from the request's `Cookie` header,
/// writes are buffered as `Set-Cookie` values for whoever builds the
/// response to drain with `take_cookie_writes`.
pub struct CookieSessionStore {
    data: Mutex<SessionData>,
    writes: Mutex<Vec<String>>,
}

impl CookieSessionStore {
    /// from_request_headers
    ///
    /// Parses the session triple out of the `Cookie` header, tolerating
    /// arbitrary other cookies around it. A header that is not valid UTF-8
    /// reads as an empty session.
    pub fn from_request_headers(headers: &HeaderMap) -> Self {
        let mut data = SessionData::default();

        if let Some(cookie_header) = headers
            .get(axum::http::header::COOKIE)
            .and_then(|v| v.to_str().ok())
        {
            for cookie in cookie_header.split(';') {
                let cookie = cookie.trim();
                let mut parts = cookie.splitn(2, '=');
                if let (Some(name), Some(value)) = (parts.next(), parts.next()) {
                    data.write(name, value.to_string());
                }
            }
        }

        CookieSessionStore {
            data: Mutex::new(data),
            writes: Mutex::new(Vec::new()),
        }
    }

    /// take_cookie_writes
    ///
    /// Drains the buffered `Set-Cookie` values accumulated by `set_session`
    /// / `clear` on this store. Each entry is a complete header value.
    pub fn take_cookie_writes(&self) -> Vec<String> {
        std::mem::take(&mut *self.writes.lock().unwrap())
    }

    /// session_cookies
    ///
    /// The three `Set-Cookie` values that establish a session. The token
    /// cookie is HttpOnly; role and user id are readable by the client for
    /// display. All are scoped to the whole site and Lax, matching how the
    /// platform's login flow writes them.
    pub fn session_cookies(token: &str, role: Role, user_id: &str) -> Vec<String> {
        vec![
            format!("{AUTH_TOKEN_COOKIE}={token}; Path=/; SameSite=Lax; HttpOnly"),
            format!("{ROLE_COOKIE}={}; Path=/; SameSite=Lax", role.as_str()),
            format!("{USER_ID_COOKIE}={user_id}; Path=/; SameSite=Lax"),
        ]
    }

    /// clearing_cookies
    ///
    /// The three `Set-Cookie` values that remove a session (Max-Age=0).
    pub fn clearing_cookies() -> Vec<String> {
        vec![
            format!("{AUTH_TOKEN_COOKIE}=; Path=/; Max-Age=0"),
            format!("{ROLE_COOKIE}=; Path=/; Max-Age=0"),
            format!("{USER_ID_COOKIE}=; Path=/; Max-Age=0"),
        ]
    }
}

impl SessionStore for CookieSessionStore {
    fn token(&self) -> Option<String> {
        self.data.lock().unwrap().read(AUTH_TOKEN_COOKIE)
    }

    fn role(&self) -> Option<String> {
        self.data.lock().unwrap().read(ROLE_COOKIE)
    }

    fn user_id(&self) -> Option<String> {
        self.data.lock().unwrap().read(USER_ID_COOKIE)
    }

    fn set_session(&self, token: &str, role: Role, user_id: &str) {
        {
            let mut data = self.data.lock().unwrap();
            data.token = Some(token.to_string());
            data.role = Some(role.as_str().to_string());
            data.user_id = Some(user_id.to_string());
        }
        self.writes
            .lock()
            .unwrap()
            .extend(Self::session_cookies(token, role, user_id));
    }

    fn clear(&self) {
        *self.data.lock().unwrap() = SessionData::default();
        self.writes
            .lock()
            .unwrap()
            .extend(Self::clearing_cookies());
    }
}

// --- In-Memory Store ---

/// MemorySessionStore
///
/// Test double holding the triple directly. `seed` takes raw strings so
/// tests can plant values the validated writer would never produce, such as
/// an unknown role.
#[derive(Default)]
pub struct MemorySessionStore {
    data: Mutex<SessionData>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// seed
    ///
    /// Plants an arbitrary triple, bypassing role validation.
    pub fn seed(&self, token: &str, role: &str, user_id: &str) {
        let mut data = self.data.lock().unwrap();
        data.token = Some(token.to_string());
        data.role = Some(role.to_string());
        data.user_id = Some(user_id.to_string());
    }
}

impl SessionStore for MemorySessionStore {
    fn token(&self) -> Option<String> {
        self.data.lock().unwrap().read(AUTH_TOKEN_COOKIE)
    }

    fn role(&self) -> Option<String> {
        self.data.lock().unwrap().read(ROLE_COOKIE)
    }

    fn user_id(&self) -> Option<String> {
        self.data.lock().unwrap().read(USER_ID_COOKIE)
    }

    fn set_session(&self, token: &str, role: Role, user_id: &str) {
        let mut data = self.data.lock().unwrap();
        data.token = Some(token.to_string());
        data.role = Some(role.as_str().to_string());
        data.user_id = Some(user_id.to_string());
    }

    fn clear(&self) {
        *self.data.lock().unwrap() = SessionData::default();
    }
}

// --- Session Snapshot ---

/// Session
///
/// A point-in-time view of the stored session, with the token already
/// decoded. The effective role comes from the token's own claims, not from
/// the `role` cookie: the cookie can lag or lie, the signed claim cannot.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: Option<String>,
    pub claims: Option<Claims>,
    /// Role from verified claims, resolved against the closed set.
    pub role: Option<Role>,
    /// Stored user id, for display only.
    pub user_id: Option<String>,
}

impl Session {
    /// resolve
    ///
    /// Reads the store once and decodes whatever token it holds. A token
    /// that fails to decode (bad signature, expired) leaves `claims` and
    /// `role` empty but keeps `token`; presence and validity are separate
    /// questions for the guard.
    pub fn resolve(store: &dyn SessionStore, jwt_secret: &str) -> Session {
        let token = store.token();
        let claims = token
            .as_deref()
            .and_then(|t| decode_claims(t, jwt_secret).ok());
        let role = claims.as_ref().and_then(|c| c.role());

        Session {
            token,
            claims,
            role,
            user_id: store.user_id(),
        }
    }

    /// is_authenticated
    ///
    /// Presence check only: a non-empty token is in the store. Says nothing
    /// about validity; that is the guard's second and third step.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// has_role
    ///
    /// Exact match against the effective role. No hierarchy.
    pub fn has_role(&self, role: Role) -> bool {
        self.role == Some(role)
    }

    /// has_any_role
    ///
    /// True if the effective role is any of the given set. Empty set never
    /// matches.
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        self.role.is_some_and(|held| roles.contains(&held))
    }

    /// auth_header
    ///
    /// Builds the `Authorization` value for calls to the platform API.
    pub fn auth_header(&self) -> Result<String, SessionError> {
        match &self.token {
            Some(token) => Ok(format!("Bearer {token}")),
            None => Err(SessionError::NoToken),
        }
    }

    /// Expiry of the current token, when one decoded.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.claims.as_ref().and_then(|c| c.expires_at())
    }
}
