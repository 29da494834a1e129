use axum::{
    extract::{Request, State},
    http::{HeaderValue, header::SET_COOKIE},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::AppState;
use crate::guard::{self, GuardOutcome, SIGN_IN_PATH};
use crate::policy::Access;
use crate::session::CookieSessionStore;

/// policy_gate
///
/// The one enforcement point. Every request passes through here; the policy
/// table decides which treatment its path gets:
///
/// - Public paths pass straight through.
/// - Session paths need a present, locally-valid token. Failures bounce to
///   sign-in with no marker and leave the cookies alone.
/// - Role paths run the full guard sequence. Denials redirect with the
///   denial's marker, and denials that condemn the token also clear the
///   session cookies on the way out.
///
/// All redirects are 307s so the browser re-issues the request as-is after
/// signing in.
pub async fn policy_gate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    match state.policy.access_for(&path) {
        Access::Public => next.run(request).await,

        Access::Session => {
            let store = CookieSessionStore::from_request_headers(request.headers());
            match guard::check_session(&store, &state.config.jwt_secret) {
                Ok(session) => {
                    request.extensions_mut().insert(session);
                    next.run(request).await
                }
                Err(denial) => {
                    tracing::info!("No live session for {} ({:?}), redirecting", path, denial);
                    Redirect::temporary(SIGN_IN_PATH).into_response()
                }
            }
        }

        access @ (Access::Role(_) | Access::AnyRole(_)) => {
            let required = access.required_roles().unwrap_or(&[]);
            let store = CookieSessionStore::from_request_headers(request.headers());

            let outcome = guard::run_guard(
                &store,
                required,
                state.verifier.as_ref(),
                &state.config.jwt_secret,
            )
            .await;

            match outcome {
                GuardOutcome::Authorized(identity) => {
                    request.extensions_mut().insert(identity);
                    next.run(request).await
                }
                GuardOutcome::Denied(denial) => {
                    tracing::warn!("Guard denied {} ({:?})", path, denial);
                    let mut response =
                        Redirect::temporary(&denial.redirect_path()).into_response();

                    if denial.clears_session() {
                        for cookie in CookieSessionStore::clearing_cookies() {
                            if let Ok(value) = HeaderValue::from_str(&cookie) {
                                response.headers_mut().append(SET_COOKIE, value);
                            }
                        }
                    }

                    response
                }
            }
        }
    }
}
