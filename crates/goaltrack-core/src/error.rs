//! Error types for Goal Tracker

use crate::validation::ValidationErrors;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GoalTrackError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GoalTrackError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("{0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{message}")]
    RateLimited {
        message: String,
        retry_after_secs: Option<u64>,
    },

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Request error: {0}")]
    Request(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl GoalTrackError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        GoalTrackError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// HTTP status the REST backend uses for the same failure
    pub fn status_code(&self) -> u16 {
        match self {
            GoalTrackError::NotFound { .. } => 404,
            GoalTrackError::Conflict(_) => 409,
            GoalTrackError::Validation(_) => 400,
            GoalTrackError::Unauthorized(_) | GoalTrackError::InvalidToken(_) => 401,
            GoalTrackError::RateLimited { .. } => 429,
            GoalTrackError::Api { status, .. } => *status,
            GoalTrackError::Request(_)
            | GoalTrackError::Serialization(_)
            | GoalTrackError::Config(_) => 500,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, GoalTrackError::NotFound { .. })
    }
}

impl From<serde_json::Error> for GoalTrackError {
    fn from(e: serde_json::Error) -> Self {
        GoalTrackError::Serialization(e.to_string())
    }
}

impl From<ValidationErrors> for GoalTrackError {
    fn from(e: ValidationErrors) -> Self {
        GoalTrackError::Validation(e)
    }
}
