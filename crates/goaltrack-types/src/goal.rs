//! Goal types

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GoalStatus {
    #[default]
    InProgress,
    Completed,
    Cancelled,
}

impl std::fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GoalStatus::InProgress => write!(f, "InProgress"),
            GoalStatus::Completed => write!(f, "Completed"),
            GoalStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

impl std::str::FromStr for GoalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "inprogress" => Ok(GoalStatus::InProgress),
            "completed" => Ok(GoalStatus::Completed),
            "cancelled" | "canceled" => Ok(GoalStatus::Cancelled),
            other => Err(format!("Unknown goal status: {}", other)),
        }
    }
}

/// A tracked goal.
///
/// `category_name` is a point-in-time copy of the referenced category's
/// name, written whenever the goal or its category is mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: GoalStatus,
    pub due_date: Option<String>,
    #[serde(deserialize_with = "lenient_utc")]
    pub created_date: DateTime<Utc>,
    pub goal_category_id: Option<i64>,
    pub category_name: Option<String>,
}

/// RFC 3339, or a timestamp without an offset which is taken as UTC
fn lenient_utc<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|_| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
}

/// New goal form; status always starts as `InProgress`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalCreateFields {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub goal_category_id: Option<i64>,
}

/// Goal edit form; every mutable field is overwritten
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalUpdateFields {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: GoalStatus,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub goal_category_id: Option<i64>,
}

impl From<&Goal> for GoalUpdateFields {
    fn from(goal: &Goal) -> Self {
        Self {
            title: goal.title.clone(),
            description: goal.description.clone(),
            status: goal.status,
            due_date: goal.due_date.clone(),
            goal_category_id: goal.goal_category_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_json_shape() {
        let goal = Goal {
            id: 7,
            title: "Run".to_string(),
            description: None,
            status: GoalStatus::InProgress,
            due_date: None,
            created_date: Utc::now(),
            goal_category_id: Some(1),
            category_name: Some("Health".to_string()),
        };
        let json = serde_json::to_value(&goal).unwrap();

        assert_eq!(json["status"], "InProgress");
        assert_eq!(json["goalCategoryId"], 1);
        assert_eq!(json["categoryName"], "Health");
        assert!(json["description"].is_null());
        assert!(json["dueDate"].is_null());
        assert!(json["createdDate"].is_string());
    }

    #[test]
    fn test_created_date_without_offset_is_utc() {
        let json = r#"{"id":1,"title":"Run","description":null,"status":"Completed",
            "dueDate":null,"createdDate":"2025-01-01T10:00:00","goalCategoryId":null,
            "categoryName":null}"#;
        let goal: Goal = serde_json::from_str(json).unwrap();
        assert_eq!(goal.created_date.to_rfc3339(), "2025-01-01T10:00:00+00:00");

        let json = json.replace("2025-01-01T10:00:00", "2025-01-01T12:00:00.250+02:00");
        let goal: Goal = serde_json::from_str(&json).unwrap();
        assert_eq!(
            goal.created_date.to_rfc3339(),
            "2025-01-01T10:00:00.250+00:00"
        );

        let json = json.replace("2025-01-01T12:00:00.250+02:00", "yesterday");
        assert!(serde_json::from_str::<Goal>(&json).is_err());
    }

    #[test]
    fn test_create_fields_accept_missing_optionals() {
        let fields: GoalCreateFields = serde_json::from_str(r#"{"title":"Read"}"#).unwrap();
        assert_eq!(fields.title, "Read");
        assert!(fields.goal_category_id.is_none());
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("in-progress".parse::<GoalStatus>(), Ok(GoalStatus::InProgress));
        assert_eq!("Canceled".parse::<GoalStatus>(), Ok(GoalStatus::Cancelled));
        assert!("done".parse::<GoalStatus>().is_err());
    }
}
