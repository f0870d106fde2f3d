//! Category types

use serde::{Deserialize, Serialize};

/// Goal category; `goal_count` mirrors how many goals reference it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub goal_count: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryCreateFields {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryUpdateFields {
    pub name: String,
}
