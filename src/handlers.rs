use axum::{
    Extension, Json,
    extract::{Path, Query},
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::guard::{SIGN_IN_PATH, SessionIdentity};
use crate::models::{
    ContentShell, DashboardShell, EstablishSessionRequest, Role, SessionProfile, SignInNotice,
};
use crate::session::{CookieSessionStore, Session};

// --- Health ---

/// health_check
///
/// Liveness probe. Public by policy.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up")
    )
)]
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}

// --- Auth Surface ---

#[derive(Debug, Deserialize)]
pub struct SignInQuery {
    pub error: Option<String>,
}

/// sign_in
///
/// The sign-in landing. Echoes the gate's redirect marker, if any, with a
/// message the screen can display as-is. Unknown markers are echoed but get
/// the plain prompt.
#[utoipa::path(
    get,
    path = "/auth/sign-in",
    params(
        ("error" = Option<String>, Query, description = "Denial marker attached by the gate")
    ),
    responses(
        (status = 200, description = "Sign-in notice", body = SignInNotice)
    )
)]
pub async fn sign_in(Query(query): Query<SignInQuery>) -> Json<SignInNotice> {
    let message = match query.error.as_deref() {
        None => "Sign in to continue.",
        Some("unauthorized") => "You do not have access to that area.",
        Some("token_invalid") => "Your session is no longer valid. Please sign in again.",
        Some("auth_failed") => "We could not verify your session. Please sign in again.",
        Some(_) => "Sign in to continue.",
    };

    Json(SignInNotice {
        error: query.error,
        message: message.to_string(),
    })
}

/// establish_session
///
/// Writes the session triple after a successful credential exchange with
/// the platform API. The role string is validated against the closed set
/// here, at the write boundary; an unknown role never reaches a cookie.
#[utoipa::path(
    post,
    path = "/auth/session",
    request_body = EstablishSessionRequest,
    responses(
        (status = 201, description = "Session cookies set"),
        (status = 422, description = "Unknown role or malformed values")
    )
)]
pub async fn establish_session(
    Json(payload): Json<EstablishSessionRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let Some(role) = Role::parse(&payload.role) else {
        tracing::warn!("Rejected session with unknown role: {}", payload.role);
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    };

    let mut headers = HeaderMap::new();
    for cookie in CookieSessionStore::session_cookies(&payload.token, role, &payload.user_id) {
        let value = cookie
            .parse()
            .map_err(|_| StatusCode::UNPROCESSABLE_ENTITY)?;
        headers.append(SET_COOKIE, value);
    }

    tracing::info!("Session established for user {}", payload.user_id);
    Ok((StatusCode::CREATED, headers))
}

/// logout
///
/// Clears the session triple and sends the client back to sign-in, with no
/// marker (leaving is not an error). 303 so the browser follows with a GET.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 303, description = "Session cleared, redirected to sign-in")
    )
)]
pub async fn logout() -> Response {
    let mut response = Redirect::to(SIGN_IN_PATH).into_response();
    for cookie in CookieSessionStore::clearing_cookies() {
        if let Ok(value) = cookie.parse() {
            response.headers_mut().append(SET_COOKIE, value);
        }
    }
    response
}

// --- Member Areas (session required) ---

/// profile
///
/// The signed-in user's own view: display data from the session and the
/// decoded token. The gate already let this request through, so the
/// snapshot in extensions is guaranteed present and locally valid.
#[utoipa::path(
    get,
    path = "/profile",
    responses(
        (status = 200, description = "Current session profile", body = SessionProfile),
        (status = 307, description = "No live session, redirected to sign-in")
    )
)]
pub async fn profile(Extension(session): Extension<Session>) -> Json<SessionProfile> {
    Json(SessionProfile {
        user_id: session.user_id.clone(),
        role: session.role,
        expires_at: session.expires_at(),
    })
}

/// profile_section
///
/// Sub-pages under /profile.
#[utoipa::path(
    get,
    path = "/profile/{section}",
    params(
        ("section" = String, Path, description = "Profile sub-page")
    ),
    responses(
        (status = 200, description = "Profile section shell", body = ContentShell),
        (status = 307, description = "No live session, redirected to sign-in")
    )
)]
pub async fn profile_section(Path(section): Path<String>) -> Json<ContentShell> {
    Json(ContentShell {
        area: "profile".to_string(),
        section: Some(section),
    })
}

/// quiz_home
#[utoipa::path(
    get,
    path = "/quiz",
    responses(
        (status = 200, description = "Quiz area shell", body = ContentShell),
        (status = 307, description = "No live session, redirected to sign-in")
    )
)]
pub async fn quiz_home() -> Json<ContentShell> {
    Json(ContentShell {
        area: "quiz".to_string(),
        section: None,
    })
}

/// quiz_section
#[utoipa::path(
    get,
    path = "/quiz/{section}",
    params(
        ("section" = String, Path, description = "Quiz sub-page")
    ),
    responses(
        (status = 200, description = "Quiz section shell", body = ContentShell),
        (status = 307, description = "No live session, redirected to sign-in")
    )
)]
pub async fn quiz_section(Path(section): Path<String>) -> Json<ContentShell> {
    Json(ContentShell {
        area: "quiz".to_string(),
        section: Some(section),
    })
}

/// resources_home
#[utoipa::path(
    get,
    path = "/resources",
    responses(
        (status = 200, description = "Resources area shell", body = ContentShell),
        (status = 307, description = "No live session, redirected to sign-in")
    )
)]
pub async fn resources_home() -> Json<ContentShell> {
    Json(ContentShell {
        area: "resources".to_string(),
        section: None,
    })
}

/// resources_section
#[utoipa::path(
    get,
    path = "/resources/{section}",
    params(
        ("section" = String, Path, description = "Resources sub-page")
    ),
    responses(
        (status = 200, description = "Resources section shell", body = ContentShell),
        (status = 307, description = "No live session, redirected to sign-in")
    )
)]
pub async fn resources_section(Path(section): Path<String>) -> Json<ContentShell> {
    Json(ContentShell {
        area: "resources".to_string(),
        section: Some(section),
    })
}

// --- Dashboards (role required) ---

/// dashboard_overview
///
/// Shared dashboard entry, reachable with either dashboard role. Rendering
/// the shell is the single authorized action for the request; the identity
/// comes from the guard, never re-derived here.
#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Dashboard overview shell", body = DashboardShell),
        (status = 307, description = "Denied, redirected to sign-in with a marker")
    )
)]
pub async fn dashboard_overview(
    Extension(identity): Extension<SessionIdentity>,
) -> Json<DashboardShell> {
    Json(DashboardShell {
        area: "overview".to_string(),
        user_id: identity.user_id,
        role: identity.role,
    })
}

/// admin_dashboard
///
/// Admin-only area. Serves the root and every sub-page.
#[utoipa::path(
    get,
    path = "/dashboard/admin",
    responses(
        (status = 200, description = "Admin dashboard shell", body = DashboardShell),
        (status = 307, description = "Denied, redirected to sign-in with a marker")
    )
)]
pub async fn admin_dashboard(
    Extension(identity): Extension<SessionIdentity>,
) -> Json<DashboardShell> {
    Json(DashboardShell {
        area: "admin".to_string(),
        user_id: identity.user_id,
        role: identity.role,
    })
}

/// event_lead_dashboard
///
/// Event-lead-only area. Serves the root and every sub-page.
#[utoipa::path(
    get,
    path = "/dashboard/event-lead",
    responses(
        (status = 200, description = "Event lead dashboard shell", body = DashboardShell),
        (status = 307, description = "Denied, redirected to sign-in with a marker")
    )
)]
pub async fn event_lead_dashboard(
    Extension(identity): Extension<SessionIdentity>,
) -> Json<DashboardShell> {
    Json(DashboardShell {
        area: "event-lead".to_string(),
        user_id: identity.user_id,
        role: identity.role,
    })
}
