//! Goal Tracker Core Library
//!
//! Error taxonomy, client-side validation, JWT claim extraction and the API
//! port traits implemented by both the in-memory demo backend and the REST
//! client.

// Re-export pure types from goaltrack-types
pub use goaltrack_types::*;

pub mod auth;
pub mod error;
pub mod ports;
pub mod validation;

pub use auth::{bearer_header, decode_claims, AuthSession, Claims};
pub use error::{GoalTrackError, Result};
pub use ports::{AuthApi, Backend, CategoriesApi, GoalsApi, PasswordRecoveryApi, UsersApi};
pub use validation::{FieldError, Validate, ValidationErrors};
