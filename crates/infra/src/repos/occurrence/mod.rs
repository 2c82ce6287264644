mod inmemory;

pub use inmemory::InMemoryOccurrenceRepo;
use mealmind_domain::{ScheduledOccurrence, ID};

use crate::repos::shared::repo::DeleteResult;

#[async_trait::async_trait]
pub trait IOccurrenceRepo: Send + Sync {
    async fn insert(&self, occurrence: &ScheduledOccurrence) -> anyhow::Result<()>;
    async fn save(&self, occurrence: &ScheduledOccurrence) -> anyhow::Result<()>;
    async fn find(&self, occurrence_id: &ID) -> Option<ScheduledOccurrence>;
    /// All of a user's occurrences still in `Scheduled` state
    async fn find_scheduled_by_user(&self, user_id: &ID) -> Vec<ScheduledOccurrence>;
    /// All `Scheduled` occurrences due at `now` within the grace window
    async fn find_due(&self, now: i64, grace_millis: i64) -> Vec<ScheduledOccurrence>;
    /// Purges terminal (sent/failed/cancelled) rows older than `before`
    async fn delete_terminal_before(&self, before: i64) -> anyhow::Result<DeleteResult>;
    /// Bumps and returns the user's scheduling generation. Occurrences
    /// created under an older generation are stale and must be skipped by
    /// the sweeper.
    async fn bump_generation(&self, user_id: &ID) -> anyhow::Result<i64>;
    async fn generation(&self, user_id: &ID) -> i64;
}
