//! Access token claims and client-side auth session
//!
//! Tokens are issued and verified by the server. The client only reads the
//! display claims out of the payload, so signatures and expiry are not
//! checked here.

use crate::error::{GoalTrackError, Result};
use chrono::{DateTime, Utc};
use goaltrack_types::UserRole;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const CLAIM_NAME_IDENTIFIER: &str =
    "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/nameidentifier";
pub const CLAIM_NAME: &str = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/name";
pub const CLAIM_EMAIL: &str = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/emailaddress";
pub const CLAIM_ROLE: &str = "http://schemas.microsoft.com/ws/2008/06/identity/claims/role";

/// Display claims carried by an access token
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(
        rename = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/nameidentifier",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub user_id: Option<String>,
    #[serde(
        rename = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/name",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub username: Option<String>,
    #[serde(
        rename = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/emailaddress",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub email: Option<String>,
    #[serde(
        rename = "http://schemas.microsoft.com/ws/2008/06/identity/claims/role",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

/// Read the claims of `token` without verifying its signature or expiry.
pub fn decode_claims(token: &str) -> Result<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|e| GoalTrackError::InvalidToken(e.to_string()))
}

/// `Authorization` header value for an optional token
pub fn bearer_header(token: Option<&str>) -> String {
    match token {
        Some(t) if !t.is_empty() => format!("Bearer {}", t),
        _ => String::new(),
    }
}

/// Who is logged in, as far as the client can tell from its stored token
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthSession {
    pub access_token: Option<String>,
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl AuthSession {
    /// Build a session from a stored token. An undecodable token keeps the
    /// token but leaves every claim empty.
    pub fn from_token(token: Option<String>) -> Self {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return Self::default();
        };

        match decode_claims(&token) {
            Ok(claims) => Self {
                user_id: claims.user_id,
                username: claims.username,
                email: claims.email,
                role: claims.role,
                expires_at: claims
                    .exp
                    .and_then(|exp| DateTime::<Utc>::from_timestamp(exp, 0)),
                access_token: Some(token),
            },
            Err(e) => {
                debug!("Ignoring undecodable access token: {}", e);
                Self {
                    access_token: Some(token),
                    ..Self::default()
                }
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    pub fn user_role(&self) -> Option<UserRole> {
        self.role.as_deref().and_then(|r| r.parse().ok())
    }

    pub fn is_admin(&self) -> bool {
        matches!(
            self.user_role(),
            Some(UserRole::Admin) | Some(UserRole::SuperAdmin)
        )
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(false, |exp| exp <= now)
    }

    pub fn logout(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
    use serde_json::json;

    fn token(payload: serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(json!({"alg": "HS256", "typ": "JWT"}).to_string());
        let payload = URL_SAFE_NO_PAD.encode(payload.to_string());
        format!("{}.{}.not-a-real-signature", header, payload)
    }

    #[test]
    fn test_decode_claim_uris() {
        let t = token(json!({
            CLAIM_NAME_IDENTIFIER: "42",
            CLAIM_NAME: "demo-admin",
            CLAIM_EMAIL: "admin@demo.com",
            CLAIM_ROLE: "Admin",
            "exp": 1_000,
        }));
        let claims = decode_claims(&t).unwrap();

        assert_eq!(claims.user_id.as_deref(), Some("42"));
        assert_eq!(claims.username.as_deref(), Some("demo-admin"));
        assert_eq!(claims.email.as_deref(), Some("admin@demo.com"));
        assert_eq!(claims.role.as_deref(), Some("Admin"));
        assert_eq!(claims.exp, Some(1_000));
    }

    #[test]
    fn test_session_from_token() {
        let t = token(json!({ CLAIM_NAME: "superadmin", CLAIM_ROLE: "SuperAdmin", "exp": 10 }));
        let session = AuthSession::from_token(Some(t.clone()));

        assert!(session.is_authenticated());
        assert!(session.is_admin());
        assert_eq!(session.user_role(), Some(UserRole::SuperAdmin));
        assert_eq!(
            bearer_header(session.access_token.as_deref()),
            format!("Bearer {}", t)
        );
        assert!(session.is_expired(Utc::now()));
    }

    #[test]
    fn test_garbage_token_resets_claims() {
        let session = AuthSession::from_token(Some("garbage".to_string()));
        assert!(session.is_authenticated());
        assert!(session.username.is_none());
        assert!(session.role.is_none());
        assert!(!session.is_admin());
    }

    #[test]
    fn test_logout_clears_everything() {
        let t = token(json!({ CLAIM_NAME: "demo-user", CLAIM_ROLE: "User" }));
        let mut session = AuthSession::from_token(Some(t));
        session.logout();
        assert_eq!(session, AuthSession::default());
        assert_eq!(bearer_header(session.access_token.as_deref()), "");
    }

    #[test]
    fn test_no_token() {
        assert!(!AuthSession::from_token(None).is_authenticated());
        assert!(!AuthSession::from_token(Some(String::new())).is_authenticated());
    }
}
