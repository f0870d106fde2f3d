//! Unsigned demo access tokens
//!
//! Demo tokens have the same layout and claims as server-issued ones so the
//! client-side claim reader works unchanged, but carry a placeholder
//! signature.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use goaltrack_core::{Claims, Result, UserRole};
use serde_json::json;

pub const DEMO_SIGNATURE: &str = "demo-signature";

/// Demo sessions last a day
pub fn token_lifetime() -> Duration {
    Duration::hours(24)
}

/// Role a username implies when it is not a stored user
pub fn infer_role(username: &str) -> UserRole {
    let lower = username.to_lowercase();
    if lower.contains("superadmin") {
        UserRole::SuperAdmin
    } else if lower.contains("admin") {
        UserRole::Admin
    } else {
        UserRole::User
    }
}

pub fn mint_token(
    user_id: i64,
    username: &str,
    role: UserRole,
    now: DateTime<Utc>,
) -> Result<String> {
    let header = json!({ "alg": "HS256", "typ": "JWT" });
    let claims = Claims {
        user_id: Some(user_id.to_string()),
        username: Some(username.to_string()),
        email: None,
        role: Some(role.to_string()),
        exp: Some((now + token_lifetime()).timestamp()),
        iat: Some(now.timestamp()),
    };

    Ok(format!(
        "{}.{}.{}",
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header)?),
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?),
        DEMO_SIGNATURE
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use goaltrack_core::decode_claims;

    #[test]
    fn test_infer_role() {
        assert_eq!(infer_role("my-SuperAdmin"), UserRole::SuperAdmin);
        assert_eq!(infer_role("site-admin"), UserRole::Admin);
        assert_eq!(infer_role("guest"), UserRole::User);
    }

    #[test]
    fn test_token_round_trips_through_claim_reader() {
        let now = Utc::now();
        let token = mint_token(42, "demo-admin", UserRole::Admin, now).unwrap();

        assert!(token.ends_with(".demo-signature"));
        assert_eq!(token.split('.').count(), 3);

        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.user_id.as_deref(), Some("42"));
        assert_eq!(claims.username.as_deref(), Some("demo-admin"));
        assert_eq!(claims.role.as_deref(), Some("Admin"));
        assert_eq!(claims.exp, Some(now.timestamp() + 86_400));
    }
}
