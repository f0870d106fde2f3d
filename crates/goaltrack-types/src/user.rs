//! User types

use serde::{Deserialize, Serialize};

/// Role ladder: `User -> Admin -> SuperAdmin`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    User,
    Admin,
    SuperAdmin,
}

impl UserRole {
    /// One step up the ladder; `SuperAdmin` stays put.
    pub fn promoted(self) -> Self {
        match self {
            UserRole::User => UserRole::Admin,
            UserRole::Admin | UserRole::SuperAdmin => UserRole::SuperAdmin,
        }
    }

    /// One step down the ladder; `User` stays put.
    pub fn demoted(self) -> Self {
        match self {
            UserRole::SuperAdmin => UserRole::Admin,
            UserRole::Admin | UserRole::User => UserRole::User,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "User",
            UserRole::Admin => "Admin",
            UserRole::SuperAdmin => "SuperAdmin",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "user" => Ok(UserRole::User),
            "admin" => Ok(UserRole::Admin),
            "superadmin" | "super-admin" | "super_admin" => Ok(UserRole::SuperAdmin),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// User account as returned by the API (never carries a password)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub user_role: UserRole,
}

/// Registration form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSignupFields {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub firstname: String,
    pub lastname: String,
}

/// Partial user update; empty values leave the stored field untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdateFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_role: Option<UserRole>,
}

/// Admin user-list filters, applied username, email, role in that order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_role: Option<UserRole>,
}

impl UserFilter {
    pub fn matches(&self, user: &User) -> bool {
        let contains = |haystack: &str, needle: &Option<String>| match needle {
            Some(n) if !n.is_empty() => haystack.to_lowercase().contains(&n.to_lowercase()),
            _ => true,
        };

        contains(&user.username, &self.username)
            && contains(&user.email, &self.email)
            && self.user_role.map_or(true, |role| user.user_role == role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(username: &str, email: &str, role: UserRole) -> User {
        User {
            id: 1,
            username: username.to_string(),
            email: email.to_string(),
            firstname: "F".to_string(),
            lastname: "L".to_string(),
            user_role: role,
        }
    }

    #[test]
    fn test_role_ladder() {
        assert_eq!(UserRole::User.promoted(), UserRole::Admin);
        assert_eq!(UserRole::Admin.promoted(), UserRole::SuperAdmin);
        assert_eq!(UserRole::SuperAdmin.promoted(), UserRole::SuperAdmin);
        assert_eq!(UserRole::SuperAdmin.demoted(), UserRole::Admin);
        assert_eq!(UserRole::Admin.demoted(), UserRole::User);
        assert_eq!(UserRole::User.demoted(), UserRole::User);
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("superadmin".parse::<UserRole>(), Ok(UserRole::SuperAdmin));
        assert_eq!("Admin".parse::<UserRole>(), Ok(UserRole::Admin));
        assert!("root".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_user_json_shape() {
        let json = serde_json::to_value(user("demo", "d@x.com", UserRole::SuperAdmin)).unwrap();
        assert_eq!(json["userRole"], "SuperAdmin");
        assert_eq!(json["username"], "demo");
        assert!(json.get("password").is_none());
    }

    #[test]
    fn test_filter_matches() {
        let u = user("John-Doe", "john@demo.com", UserRole::User);

        assert!(UserFilter::default().matches(&u));
        assert!(UserFilter {
            username: Some("john".to_string()),
            ..Default::default()
        }
        .matches(&u));
        assert!(UserFilter {
            email: Some("DEMO.COM".to_string()),
            ..Default::default()
        }
        .matches(&u));
        assert!(!UserFilter {
            user_role: Some(UserRole::Admin),
            ..Default::default()
        }
        .matches(&u));
    }
}
