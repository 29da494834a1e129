use std::sync::Arc;

use crate::models::Role;

/// Access
///
/// What a route subtree demands before a request may reach it. This is the
/// unification of the platform's two former gates: cheap session checks in
/// front of member areas, and the full role-verified sequence in front of
/// dashboards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// Anyone, signed in or not.
    Public,
    /// A present, locally-valid session. No role, no remote verification.
    Session,
    /// A verified session holding exactly this role.
    Role(Role),
    /// A verified session holding any of these roles.
    AnyRole(Vec<Role>),
}

impl Access {
    /// required_roles
    ///
    /// The roles this level demands, when it demands any.
    pub fn required_roles(&self) -> Option<&[Role]> {
        match self {
            Access::Role(role) => Some(std::slice::from_ref(role)),
            Access::AnyRole(roles) => Some(roles),
            Access::Public | Access::Session => None,
        }
    }
}

/// RoutePolicy
///
/// The single table mapping path prefixes to access levels. One lookup per
/// request decides which enforcement the gate applies, so a route can never
/// be protected in one place and forgotten in another.
///
/// Matching is by whole path segments: `/profile` covers `/profile` and
/// `/profile/settings` but not `/profiles`. When several rows match, the
/// longest prefix wins, which lets `/dashboard/admin` tighten what
/// `/dashboard` already demands. Paths matching no row are public.
#[derive(Debug, Clone, Default)]
pub struct RoutePolicy {
    rules: Vec<(String, Access)>,
}

pub type PolicyState = Arc<RoutePolicy>;

static DEFAULT_ACCESS: Access = Access::Public;

impl RoutePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// route
    ///
    /// Adds a row. Order does not matter; specificity does.
    pub fn route(mut self, prefix: &str, access: Access) -> Self {
        self.rules.push((prefix.to_string(), access));
        self
    }

    /// access_for
    ///
    /// Resolves the access level for a request path (no query string).
    pub fn access_for(&self, path: &str) -> &Access {
        self.rules
            .iter()
            .filter(|(prefix, _)| Self::prefix_matches(prefix, path))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, access)| access)
            .unwrap_or(&DEFAULT_ACCESS)
    }

    fn prefix_matches(prefix: &str, path: &str) -> bool {
        path == prefix
            || path
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('/'))
    }

    /// vyuha
    ///
    /// The platform's production table.
    ///
    /// Member areas (profile, quiz, resources) ask only for a live session.
    /// Dashboards are role-gated: the shared entry accepts either dashboard
    /// role, the per-area subtrees demand their own. Everything else the
    /// platform serves is public browsing surface.
    pub fn vyuha() -> Self {
        RoutePolicy::new()
            // Public browsing surfaces.
            .route("/", Access::Public)
            .route("/auth", Access::Public)
            .route("/events", Access::Public)
            .route("/courses", Access::Public)
            .route("/jobs", Access::Public)
            .route("/mentors", Access::Public)
            .route("/projects", Access::Public)
            .route("/forum", Access::Public)
            .route("/membership", Access::Public)
            .route("/health", Access::Public)
            .route("/swagger-ui", Access::Public)
            .route("/api-docs", Access::Public)
            // Member areas: session required.
            .route("/profile", Access::Session)
            .route("/quiz", Access::Session)
            .route("/resources", Access::Session)
            // Dashboards: role required, verified remotely.
            .route(
                "/dashboard",
                Access::AnyRole(vec![Role::Admin, Role::EventLead]),
            )
            .route("/dashboard/admin", Access::Role(Role::Admin))
            .route("/dashboard/event-lead", Access::Role(Role::EventLead))
    }
}
