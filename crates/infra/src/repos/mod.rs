mod occurrence;
mod reminder;
mod shared;
mod user;

pub use occurrence::{IOccurrenceRepo, InMemoryOccurrenceRepo};
pub use reminder::{IReminderRepo, InMemoryReminderRepo};
pub use shared::repo::DeleteResult;
pub use user::{IUserRepo, InMemoryUserRepo};

use std::sync::Arc;

/// The repositories only model what the external document store gives us:
/// per-document atomic writes and filtered queries, no multi-document
/// transactions. A store-backed implementation plugs in behind the same
/// traits.
#[derive(Clone)]
pub struct Repos {
    pub reminders: Arc<dyn IReminderRepo>,
    pub occurrences: Arc<dyn IOccurrenceRepo>,
    pub users: Arc<dyn IUserRepo>,
}

impl Repos {
    pub fn create_inmemory() -> Self {
        Self {
            reminders: Arc::new(InMemoryReminderRepo::new()),
            occurrences: Arc::new(InMemoryOccurrenceRepo::new()),
            users: Arc::new(InMemoryUserRepo::new()),
        }
    }
}
