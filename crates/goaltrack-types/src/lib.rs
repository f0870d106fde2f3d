//! Goal Tracker Types - Pure resource shapes
//!
//! This crate contains only plain data types mirroring the JSON resources of
//! the goal-tracking REST API, so the demo store and the HTTP client produce
//! byte-identical shapes.

pub mod auth;
pub mod category;
pub mod goal;
pub mod page;
pub mod user;

pub use auth::*;
pub use category::*;
pub use goal::*;
pub use page::*;
pub use user::*;

/// Form inputs send empty strings for cleared optional fields.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some(String::new())), None);
        assert_eq!(non_empty(Some("   ".to_string())), None);
        assert_eq!(non_empty(Some("x".to_string())), Some("x".to_string()));
    }
}
