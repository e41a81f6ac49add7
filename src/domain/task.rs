use super::enums::Category;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn is_false(value: &bool) -> bool {
    !*value
}

/// Generate a fresh opaque identifier
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// A task scheduled on a specific day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTask {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Category,
    /// Weak reference to a goal; may dangle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_id: Option<String>,
    /// Logical day the task belongs to
    pub date: NaiveDate,
    #[serde(default)]
    pub completed: bool,
    /// Set iff `completed`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Dense per-date rank, lower is earlier. `None` sorts last.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_frog: bool,
    /// When set, this row is a ghost superseded by a copy on that date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moved_to_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timebox_minutes: Option<u32>,
}

impl DailyTask {
    pub fn new(text: String, date: NaiveDate) -> Self {
        Self {
            id: new_id(),
            text,
            description: String::new(),
            category: Category::Work,
            goal_id: None,
            date,
            completed: false,
            completed_at: None,
            order: None,
            is_frog: false,
            moved_to_date: None,
            timebox_minutes: None,
        }
    }

    /// Whether this row has been carried forward to another day
    pub fn is_moved(&self) -> bool {
        self.moved_to_date.is_some()
    }

    /// Sort key for `order`: undefined sorts after every defined rank
    pub fn order_key(&self) -> i64 {
        self.order.map(i64::from).unwrap_or(i64::MAX)
    }
}

/// An unscheduled backlog item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_id: Option<String>,
    /// Day the item was scheduled on before being deferred
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_scheduled_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Todo {
    pub fn new(text: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id: new_id(),
            text,
            description: String::new(),
            goal_id: None,
            last_scheduled_date: None,
            created_at,
        }
    }
}
