use crate::activity::RawActivity;
use crate::shared::entity::{Entity, ID};
use crate::time_of_day::TimeOfDay;
use crate::weekday::Weekday;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderSource {
    DietPdf,
    Custom,
}

/// A recurring weekly reminder: one distinct time-of-day plus message for
/// one user.
///
/// The id is a stable hash of `(user, time, message)`, so re-extracting
/// the same diet produces the same ids and repo upserts cannot create
/// duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: ID,
    pub user_id: ID,
    pub message: String,
    pub time_of_day: TimeOfDay,
    pub selected_weekdays: BTreeSet<Weekday>,
    pub is_active: bool,
    pub source: ReminderSource,
    pub created: i64,
    pub updated: i64,
}

impl Reminder {
    pub fn new(
        user_id: ID,
        time_of_day: TimeOfDay,
        message: String,
        selected_weekdays: BTreeSet<Weekday>,
        source: ReminderSource,
        now: i64,
    ) -> Self {
        let id = Self::stable_id(&user_id, &time_of_day, &message);
        Self {
            id,
            user_id,
            message,
            time_of_day,
            selected_weekdays,
            is_active: true,
            source,
            created: now,
            updated: now,
        }
    }

    /// Builds the reminder for one deduplicated activity. An explicit day
    /// header on the source paragraph selects that single day; without one
    /// the reminder fires on weekdays only, never all seven days.
    pub fn from_activity(user_id: ID, activity: &RawActivity, now: i64) -> Option<Self> {
        let time_of_day = TimeOfDay::new(activity.hour, activity.minute)?;
        let selected_weekdays = match activity.day_hint {
            Some(day) => {
                let mut days = BTreeSet::new();
                days.insert(day);
                days
            }
            None => Weekday::work_week(),
        };
        Some(Self::new(
            user_id,
            time_of_day,
            activity.text.clone(),
            selected_weekdays,
            ReminderSource::DietPdf,
            now,
        ))
    }

    fn stable_id(user_id: &ID, time_of_day: &TimeOfDay, message: &str) -> ID {
        ID::stable(&format!("{}|{}|{}", user_id, time_of_day, message))
    }

    /// A reminder may only stay active with at least one selected weekday.
    pub fn is_valid(&self) -> bool {
        !self.is_active || !self.selected_weekdays.is_empty()
    }
}

impl Entity for Reminder {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn activity(hour: u8, minute: u8, text: &str, day_hint: Option<Weekday>) -> RawActivity {
        RawActivity {
            hour,
            minute,
            text: text.into(),
            source_line: String::new(),
            day_hint,
        }
    }

    #[test]
    fn builds_reminder_with_stable_id() {
        let user_id = ID::new();
        let a = activity(8, 0, "take vitamins", None);
        let first = Reminder::from_activity(user_id.clone(), &a, 100).unwrap();
        let second = Reminder::from_activity(user_id, &a, 200).unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.time_of_day.to_string(), "08:00");
        assert_eq!(first.message, "take vitamins");
        assert!(first.is_active);
        assert_eq!(first.source, ReminderSource::DietPdf);
    }

    #[test]
    fn different_time_or_message_changes_the_id() {
        let user_id = ID::new();
        let base = Reminder::from_activity(user_id.clone(), &activity(8, 0, "take vitamins", None), 0)
            .unwrap();
        let other_time =
            Reminder::from_activity(user_id.clone(), &activity(20, 0, "take vitamins", None), 0)
                .unwrap();
        let other_message =
            Reminder::from_activity(user_id, &activity(8, 0, "drink water", None), 0).unwrap();
        assert_ne!(base.id, other_time.id);
        assert_ne!(base.id, other_message.id);
    }

    #[test]
    fn different_users_never_share_reminder_ids() {
        let a = activity(8, 0, "take vitamins", None);
        let first = Reminder::from_activity(ID::new(), &a, 0).unwrap();
        let second = Reminder::from_activity(ID::new(), &a, 0).unwrap();
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn day_hint_selects_that_single_day() {
        let a = activity(6, 0, "drink water", Some(Weekday::Mon));
        let reminder = Reminder::from_activity(ID::new(), &a, 0).unwrap();
        assert_eq!(reminder.selected_weekdays.len(), 1);
        assert!(reminder.selected_weekdays.contains(&Weekday::Mon));
    }

    #[test]
    fn no_day_hint_defaults_to_weekdays_only() {
        let a = activity(6, 0, "drink water", None);
        let reminder = Reminder::from_activity(ID::new(), &a, 0).unwrap();
        assert_eq!(reminder.selected_weekdays, Weekday::work_week());
    }

    #[test]
    fn active_reminder_without_weekdays_is_invalid() {
        let mut reminder =
            Reminder::from_activity(ID::new(), &activity(6, 0, "drink water", None), 0).unwrap();
        reminder.selected_weekdays.clear();
        assert!(!reminder.is_valid());
        reminder.is_active = false;
        assert!(reminder.is_valid());
    }
}
