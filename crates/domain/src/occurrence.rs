use crate::shared::entity::{Entity, ID};
use crate::weekday::Weekday;
use serde::{Deserialize, Serialize};

pub const WEEK_MILLIS: i64 = 7 * 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccurrenceStatus {
    Scheduled,
    Sent,
    Failed,
    Cancelled,
}

impl OccurrenceStatus {
    /// Terminal rows are never dispatched again and are eventually purged
    /// by the retention job.
    pub fn is_terminal(self) -> bool {
        !matches!(self, OccurrenceStatus::Scheduled)
    }
}

/// One concrete future firing of a `Reminder` on one weekday.
///
/// At most one occurrence per `(reminder, weekday)` may be `Scheduled` at
/// a time. Every scheduling pass for a user bumps a generation counter;
/// rows created under an older generation are ignored by the sweeper, so
/// a crash between cancelling old rows and creating new ones cannot cause
/// duplicate firings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledOccurrence {
    pub id: ID,
    pub user_id: ID,
    pub reminder_id: ID,
    pub weekday: Weekday,
    /// UTC millis of the planned firing
    pub scheduled_for: i64,
    pub status: OccurrenceStatus,
    pub generation: i64,
    pub created_at: i64,
    pub sent_at: Option<i64>,
    pub failed_at: Option<i64>,
    pub cancelled_at: Option<i64>,
}

impl ScheduledOccurrence {
    pub fn new(
        user_id: ID,
        reminder_id: ID,
        weekday: Weekday,
        scheduled_for: i64,
        generation: i64,
        now: i64,
    ) -> Self {
        Self {
            id: ID::new(),
            user_id,
            reminder_id,
            weekday,
            scheduled_for,
            status: OccurrenceStatus::Scheduled,
            generation,
            created_at: now,
            sent_at: None,
            failed_at: None,
            cancelled_at: None,
        }
    }

    /// The follow-up occurrence created after a successful send: same
    /// reminder and weekday, exactly one week later.
    pub fn next_week(&self, now: i64) -> Self {
        Self::new(
            self.user_id.clone(),
            self.reminder_id.clone(),
            self.weekday,
            self.scheduled_for + WEEK_MILLIS,
            self.generation,
            now,
        )
    }

    pub fn mark_sent(&mut self, now: i64) {
        self.status = OccurrenceStatus::Sent;
        self.sent_at = Some(now);
    }

    pub fn mark_failed(&mut self, now: i64) {
        self.status = OccurrenceStatus::Failed;
        self.failed_at = Some(now);
    }

    pub fn mark_cancelled(&mut self, now: i64) {
        self.status = OccurrenceStatus::Cancelled;
        self.cancelled_at = Some(now);
    }

    /// Due means the planned firing has arrived but has not slipped past
    /// the grace window. Beyond the window the slot is treated as missed
    /// and left for the following week, there is no catch-up delivery.
    pub fn is_due(&self, now: i64, grace_millis: i64) -> bool {
        self.status == OccurrenceStatus::Scheduled
            && now >= self.scheduled_for
            && now - self.scheduled_for <= grace_millis
    }
}

impl Entity for ScheduledOccurrence {
    fn id(&self) -> &ID {
        &self.id
    }
}
