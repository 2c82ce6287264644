mod activity;
mod dedup;
mod extractor;
mod occurrence;
mod recurrence;
mod reminder;
mod shared;
mod time_of_day;
mod user;
mod weekday;

pub use activity::RawActivity;
pub use dedup::deduplicate_activities;
pub use extractor::{ActivityExtractor, ActivityScan};
pub use occurrence::{OccurrenceStatus, ScheduledOccurrence, WEEK_MILLIS};
pub use recurrence::next_trigger_millis;
pub use reminder::{Reminder, ReminderSource};
pub use shared::entity::{Entity, ID};
pub use time_of_day::TimeOfDay;
pub use user::User;
pub use weekday::Weekday;
