use mealmind_domain::{Reminder, ReminderSource, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDTO {
    pub id: ID,
    pub message: String,
    /// "HH:MM", 24 hour form in the canonical zone
    pub time_of_day: String,
    /// 0 = Monday .. 6 = Sunday
    pub selected_weekdays: Vec<u8>,
    pub is_active: bool,
    pub source: ReminderSource,
    pub updated: i64,
    pub created: i64,
}

impl ReminderDTO {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            id: reminder.id.clone(),
            message: reminder.message,
            time_of_day: reminder.time_of_day.to_string(),
            selected_weekdays: reminder
                .selected_weekdays
                .iter()
                .map(|d| d.index())
                .collect(),
            is_active: reminder.is_active,
            source: reminder.source,
            updated: reminder.updated,
            created: reminder.created,
        }
    }
}

/// Client-provided reminder definition. The server derives the stable id
/// itself, ids are never taken from the client.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReminderInput {
    pub message: String,
    /// "HH:MM", 24 hour form
    pub time_of_day: String,
    /// 0 = Monday .. 6 = Sunday; omitted means Monday through Friday
    pub selected_weekdays: Option<Vec<u8>>,
}
