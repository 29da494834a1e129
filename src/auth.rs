use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, TokenData, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::models::Role;

/// Claims
///
/// The token payload the platform API signs at login. The gate only ever
/// decodes these; it never mints them outside of tests.
///
/// `role` is the authoritative source for role checks once the token has
/// been verified; the sibling `role` cookie is display data. Older tokens
/// were issued without the claim, so it stays optional; a token without it
/// simply satisfies no role requirement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,          // user id
    pub role: Option<String>, // flat role string, validated via Role::parse
    pub exp: usize,           // expiry (seconds since epoch)
    pub iat: usize,           // issued at (seconds since epoch)
}

impl Claims {
    /// role
    ///
    /// The claim resolved against the closed role set. Unknown strings come
    /// back as `None`, same as a missing claim.
    pub fn role(&self) -> Option<Role> {
        self.role.as_deref().and_then(Role::parse)
    }

    /// expires_at
    ///
    /// Expiry as a timestamp, for display surfaces. `None` if the claim
    /// does not fit in a chrono timestamp.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp(self.exp as i64, 0)
    }
}

/// decode_claims
///
/// Decodes and validates a session token against the shared secret.
///
/// Expiry is checked with zero leeway: a token whose `exp` has passed is
/// rejected immediately, not grace-perioded. An expired or otherwise
/// undecodable token is locally definitive. Callers treat the error as
/// "invalid session" without consulting the remote verifier.
pub fn decode_claims(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.validate_exp = true;
    validation.leeway = 0;

    let token_data: TokenData<Claims> = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;

    Ok(token_data.claims)
}
