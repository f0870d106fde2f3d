//! Mapping non-success responses onto the error taxonomy

use goaltrack_core::GoalTrackError;
use serde_json::Value;

pub const TOO_MANY_REQUESTS: &str = "Too many requests. Please try again later.";
pub const SERVER_TROUBLE: &str = "Something went wrong. Please try again later.";

/// Status, `Retry-After` and body of a failed response
#[derive(Debug, Clone, Default)]
pub struct Failure {
    pub status: u16,
    pub retry_after: Option<String>,
    pub body: String,
}

impl Failure {
    fn json(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }

    /// First string among `keys` in the JSON body
    fn message_from(&self, keys: &[&str]) -> Option<String> {
        let json = self.json()?;
        keys.iter()
            .find_map(|k| json.get(*k).and_then(Value::as_str))
            .filter(|m| !m.is_empty())
            .map(str::to_string)
    }

    /// `message`, then `detail`, then `title`
    pub fn message(&self) -> Option<String> {
        self.message_from(&["message", "detail", "title"])
    }

    pub fn retry_after_secs(&self) -> Option<u64> {
        let value = self.retry_after.as_deref()?.trim();
        let digits: String = value.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse().ok()
    }
}

/// What a resource endpoint's 404 means
#[derive(Debug, Clone, Copy)]
pub struct Lookup<'a> {
    pub entity: &'static str,
    pub id: &'a str,
}

/// Error for a resource endpoint: `default` is used when the body carries no
/// message; a 404 on an id lookup becomes `NotFound`.
pub fn resource_error(failure: &Failure, default: &str, lookup: Option<Lookup<'_>>) -> GoalTrackError {
    let message = || failure.message().unwrap_or_else(|| default.to_string());

    match (failure.status, lookup) {
        (404, Some(lookup)) => GoalTrackError::not_found(lookup.entity, lookup.id),
        (401, _) => GoalTrackError::Unauthorized(message()),
        (409, _) => GoalTrackError::Conflict(message()),
        (429, _) => GoalTrackError::RateLimited {
            message: TOO_MANY_REQUESTS.to_string(),
            retry_after_secs: failure.retry_after_secs(),
        },
        (status, _) => GoalTrackError::Api {
            status,
            message: message(),
        },
    }
}

/// Password recovery endpoints speak to anonymous users, so their messages
/// are fixed per status and only `message`/`detail` are read from the body.
#[derive(Debug, Clone, Copy)]
pub struct RecoveryPolicy {
    pub default: &'static str,
    /// Statuses answered with `rejected` when the body has no message
    pub rejected_statuses: &'static [u16],
    pub rejected: &'static str,
    /// Used instead of `rejected` when the body of a rejected status is
    /// not JSON at all
    pub unparseable: &'static str,
}

pub const SEND_RECOVERY_EMAIL: RecoveryPolicy = RecoveryPolicy {
    default: "Failed to send recovery email",
    rejected_statuses: &[400],
    rejected: "Failed to send recovery email",
    unparseable: "Invalid request. Please check your email address.",
};

pub const VALIDATE_RESET_TOKEN: RecoveryPolicy = RecoveryPolicy {
    default: "Failed to validate reset token",
    rejected_statuses: &[400, 404],
    rejected: "This reset link is invalid or has expired.",
    unparseable: "This reset link is invalid or has expired.",
};

pub const RESET_PASSWORD: RecoveryPolicy = RecoveryPolicy {
    default: "Failed to reset password",
    rejected_statuses: &[400],
    rejected: "Invalid or expired reset token.",
    unparseable: "Invalid or expired reset token.",
};

pub fn recovery_error(failure: &Failure, policy: &RecoveryPolicy) -> GoalTrackError {
    let body_message = || failure.message_from(&["message", "detail"]);

    let message = match failure.status {
        429 => {
            return GoalTrackError::RateLimited {
                message: TOO_MANY_REQUESTS.to_string(),
                retry_after_secs: failure.retry_after_secs(),
            }
        }
        500 => SERVER_TROUBLE.to_string(),
        status if policy.rejected_statuses.contains(&status) => match failure.json() {
            Some(_) => body_message().unwrap_or_else(|| policy.rejected.to_string()),
            None => policy.unparseable.to_string(),
        },
        _ => body_message().unwrap_or_else(|| policy.default.to_string()),
    };

    GoalTrackError::Api {
        status: failure.status,
        message,
    }
}
