mod inmemory;

pub use inmemory::InMemoryReminderRepo;
use mealmind_domain::{Reminder, ID};

#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    /// Insert-or-replace by the reminder's stable id: re-extracting the
    /// same diet must never create duplicates.
    async fn bulk_upsert(&self, reminders: &[Reminder]) -> anyhow::Result<()>;
    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()>;
    async fn find(&self, reminder_id: &ID) -> Option<Reminder>;
    async fn find_by_user(&self, user_id: &ID) -> Vec<Reminder>;
}
