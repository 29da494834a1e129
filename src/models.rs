use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

// --- Core Session Schemas ---

/// Role
///
/// The closed set of roles a Vyuha session can carry. The platform stores
/// the role as a flat string (in the `role` cookie and in the token's role
/// claim); this enum is the single place those strings are given meaning.
/// Anything outside this set is rejected at the boundary instead of being
/// compared verbatim.
///
/// Comparisons are exact: there is no hierarchy, an admin does not imply
/// event_lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Role {
    Admin,
    Student,
    VccMember,
    EventLead,
    Faculty,
    CollegeAdmin,
    NonMember,
    // Membership tiers sold by the platform. Distinct roles, not flags on
    // an existing role, because the backend issues them as such.
    MemberAnnual,
    MemberLifetime,
    MemberHonorary,
}

impl Role {
    /// parse
    ///
    /// Validates a stored role string against the closed set. Returns `None`
    /// for unknown values; callers treat that as "no role" (fail closed)
    /// rather than comparing against an unrecognized string.
    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "admin" => Some(Role::Admin),
            "student" => Some(Role::Student),
            "vcc_member" => Some(Role::VccMember),
            "event_lead" => Some(Role::EventLead),
            "faculty" => Some(Role::Faculty),
            "college_admin" => Some(Role::CollegeAdmin),
            "non_member" => Some(Role::NonMember),
            "member_annual" => Some(Role::MemberAnnual),
            "member_lifetime" => Some(Role::MemberLifetime),
            "member_honorary" => Some(Role::MemberHonorary),
            _ => None,
        }
    }

    /// The canonical wire form, identical to what login writes into the
    /// `role` cookie and the token claim.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Student => "student",
            Role::VccMember => "vcc_member",
            Role::EventLead => "event_lead",
            Role::Faculty => "faculty",
            Role::CollegeAdmin => "college_admin",
            Role::NonMember => "non_member",
            Role::MemberAnnual => "member_annual",
            Role::MemberLifetime => "member_lifetime",
            Role::MemberHonorary => "member_honorary",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Request Payloads (Input Schemas) ---

/// EstablishSessionRequest
///
/// Input payload for POST /auth/session, the cookie-setting half of login.
/// The credential exchange itself happens against the platform API; the
/// client then hands the resulting triple to the gate, which validates the
/// role string and writes all three cookies together.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct EstablishSessionRequest {
    /// Opaque bearer token issued by the platform API.
    pub token: String,
    /// Flat role string. Must be one of the closed `Role` set.
    pub role: String,
    /// Opaque user identifier, used for display/association only.
    pub user_id: String,
}

// --- Response Schemas (Output) ---

/// SignInNotice
///
/// Output of GET /auth/sign-in. Echoes the optional `error` query marker the
/// gate attaches to its redirects, together with a display message the
/// sign-in screen can show as-is.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct SignInNotice {
    /// The raw marker, if any: "unauthorized", "token_invalid", "auth_failed".
    pub error: Option<String>,
    pub message: String,
}

/// SessionProfile
///
/// Output of GET /profile. Everything here is display data read from the
/// session cookies and the token's own claims; the authorization decision
/// was already made by the gate before this is rendered.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct SessionProfile {
    pub user_id: Option<String>,
    pub role: Option<Role>,
    /// Expiry of the current token, when it can be decoded.
    #[ts(type = "string | null")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// DashboardShell
///
/// Output of the role-gated dashboard endpoints. Rendering this shell is the
/// terminal "authorized" action of the guard: produced exactly once per
/// authorized request, from the identity the guard resolved.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct DashboardShell {
    /// Which dashboard area was rendered ("admin", "event-lead", "overview").
    pub area: String,
    pub user_id: String,
    pub role: Role,
}

/// ContentShell
///
/// Output of the session-level member areas (quiz, resources). The gate has
/// already checked token presence and expiry; the shell only names what was
/// reached.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ContentShell {
    pub area: String,
    /// Sub-path within the area, when one was requested.
    pub section: Option<String>,
}
