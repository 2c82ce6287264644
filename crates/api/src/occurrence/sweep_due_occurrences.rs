use crate::shared::usecase::UseCase;
use mealmind_domain::{OccurrenceStatus, Reminder, ScheduledOccurrence};
use mealmind_infra::{MealmindContext, PushNotification};
use std::collections::HashMap;
use tracing::{error, info, warn};

/// One delivery pass: finds every occurrence inside its grace window,
/// dispatches it and queues the same slot for next week.
///
/// Occurrences past the grace window are left alone, the slot is treated
/// as missed and picks up again the following week. Dispatch problems are
/// recorded on the row and in the stats, they never abort the pass.
#[derive(Debug)]
pub struct SweepDueOccurrencesUseCase;

#[derive(Debug, Default, PartialEq)]
pub struct SweepStats {
    pub sent: usize,
    pub failed: usize,
    pub skipped: usize,
}

#[derive(Debug)]
pub enum UseCaseError {}

#[async_trait::async_trait(?Send)]
impl UseCase for SweepDueOccurrencesUseCase {
    type Response = SweepStats;

    type Errors = UseCaseError;

    /// This will run every sweep interval
    async fn execute(&mut self, ctx: &MealmindContext) -> Result<Self::Response, Self::Errors> {
        let now = ctx.sys.get_timestamp_millis();
        let due = ctx
            .repos
            .occurrences
            .find_due(now, ctx.config.delivery_grace_millis())
            .await;

        let mut stats = SweepStats::default();
        for occurrence in due {
            // The status may have changed since the query, a cancellation
            // can land while the sweep is running.
            let current = match ctx.repos.occurrences.find(&occurrence.id).await {
                Some(o) if o.status == OccurrenceStatus::Scheduled => o,
                _ => {
                    stats.skipped += 1;
                    continue;
                }
            };

            // Rows from a superseded scheduling pass must not fire.
            let generation = ctx.repos.occurrences.generation(&current.user_id).await;
            if current.generation != generation {
                stats.skipped += 1;
                continue;
            }

            dispatch(current, ctx, &mut stats).await;
        }

        if stats != SweepStats::default() {
            info!(
                "Delivery sweep done: {} sent, {} failed, {} skipped",
                stats.sent, stats.failed, stats.skipped
            );
        }

        Ok(stats)
    }
}

async fn dispatch(
    mut occurrence: ScheduledOccurrence,
    ctx: &MealmindContext,
    stats: &mut SweepStats,
) {
    let now = ctx.sys.get_timestamp_millis();

    let reminder = match ctx.repos.reminders.find(&occurrence.reminder_id).await {
        Some(r) if r.is_active => r,
        _ => {
            stats.skipped += 1;
            return;
        }
    };

    let device_token = ctx
        .repos
        .users
        .find(&occurrence.user_id)
        .await
        .and_then(|u| u.device_token);
    let device_token = match device_token {
        Some(token) => token,
        None => {
            warn!(
                "No device token for user {}, marking occurrence {} as failed",
                occurrence.user_id, occurrence.id
            );
            mark_failed(occurrence, ctx, now, stats).await;
            return;
        }
    };

    match ctx
        .push_gateway
        .send(&device_token, &build_notification(&reminder))
        .await
    {
        Ok(_) => {
            occurrence.mark_sent(now);
            if let Err(e) = ctx.repos.occurrences.save(&occurrence).await {
                error!(
                    "Unable to persist sent status for occurrence {}: {:?}",
                    occurrence.id, e
                );
                stats.failed += 1;
                return;
            }
            let next = occurrence.next_week(now);
            if let Err(e) = ctx.repos.occurrences.insert(&next).await {
                error!(
                    "Unable to persist next week's occurrence for reminder {}: {:?}",
                    occurrence.reminder_id, e
                );
            }
            stats.sent += 1;
        }
        Err(e) => {
            error!(
                "Push dispatch failed for occurrence {}: {:?}",
                occurrence.id, e
            );
            mark_failed(occurrence, ctx, now, stats).await;
        }
    }
}

async fn mark_failed(
    mut occurrence: ScheduledOccurrence,
    ctx: &MealmindContext,
    now: i64,
    stats: &mut SweepStats,
) {
    occurrence.mark_failed(now);
    if let Err(e) = ctx.repos.occurrences.save(&occurrence).await {
        error!(
            "Unable to persist failed status for occurrence {}: {:?}",
            occurrence.id, e
        );
    }
    stats.failed += 1;
}

fn build_notification(reminder: &Reminder) -> PushNotification {
    let mut data = HashMap::new();
    data.insert("reminderId".to_string(), reminder.id.to_string());
    data.insert("timeOfDay".to_string(), reminder.time_of_day.to_string());
    PushNotification {
        title: "Diet reminder".into(),
        body: reminder.message.clone(),
        data,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use mealmind_domain::{
        ReminderSource, TimeOfDay, User, Weekday, ID, WEEK_MILLIS,
    };
    use mealmind_infra::{setup_context, ISys, StubPushGateway};
    use std::sync::Arc;

    struct StaticTimeSys(i64);
    impl ISys for StaticTimeSys {
        fn get_timestamp_millis(&self) -> i64 {
            self.0
        }
    }

    // Monday 2021-03-22 08:00:00 UTC
    const NOW: i64 = 1_616_400_000_000;

    struct TestContext {
        ctx: MealmindContext,
        gateway: Arc<StubPushGateway>,
        user: User,
        reminder: Reminder,
    }

    async fn setup() -> TestContext {
        let mut ctx = setup_context().await;
        ctx.sys = Arc::new(StaticTimeSys(NOW));
        let gateway = Arc::new(StubPushGateway::new());
        ctx.push_gateway = gateway.clone();

        let user = User::with_device_token("ExponentPushToken[test]");
        ctx.repos.users.insert(&user).await.unwrap();

        let reminder = Reminder::new(
            user.id.clone(),
            TimeOfDay::new(8, 0).unwrap(),
            "take vitamins".into(),
            Weekday::work_week(),
            ReminderSource::DietPdf,
            NOW,
        );
        ctx.repos
            .reminders
            .bulk_upsert(std::slice::from_ref(&reminder))
            .await
            .unwrap();

        TestContext {
            ctx,
            gateway,
            user,
            reminder,
        }
    }

    async fn insert_occurrence(test: &TestContext, scheduled_for: i64) -> ScheduledOccurrence {
        let generation = test
            .ctx
            .repos
            .occurrences
            .bump_generation(&test.user.id)
            .await
            .unwrap();
        let occurrence = ScheduledOccurrence::new(
            test.user.id.clone(),
            test.reminder.id.clone(),
            Weekday::Mon,
            scheduled_for,
            generation,
            NOW,
        );
        test.ctx.repos.occurrences.insert(&occurrence).await.unwrap();
        occurrence
    }

    async fn sweep(ctx: &MealmindContext) -> SweepStats {
        SweepDueOccurrencesUseCase.execute(ctx).await.unwrap()
    }

    #[actix_web::main]
    #[test]
    async fn sends_due_occurrence_and_queues_next_week() {
        let test = setup().await;
        let occurrence = insert_occurrence(&test, NOW).await;

        let stats = sweep(&test.ctx).await;
        assert_eq!(stats.sent, 1);
        assert_eq!(stats.failed, 0);
        assert_eq!(test.gateway.sent_count(), 1);
        {
            let sent = test.gateway.sent.lock().unwrap();
            assert_eq!(sent[0].0, "ExponentPushToken[test]");
            assert_eq!(sent[0].1.body, "take vitamins");
        }

        let updated = test.ctx.repos.occurrences.find(&occurrence.id).await.unwrap();
        assert_eq!(updated.status, OccurrenceStatus::Sent);
        assert_eq!(updated.sent_at, Some(NOW));

        let pending = test
            .ctx
            .repos
            .occurrences
            .find_scheduled_by_user(&test.user.id)
            .await;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].scheduled_for, NOW + WEEK_MILLIS);
        assert_eq!(pending[0].weekday, occurrence.weekday);
    }

    #[actix_web::main]
    #[test]
    async fn sent_occurrence_is_not_dispatched_twice() {
        let test = setup().await;
        insert_occurrence(&test, NOW).await;

        assert_eq!(sweep(&test.ctx).await.sent, 1);
        assert_eq!(sweep(&test.ctx).await.sent, 0);
        assert_eq!(test.gateway.sent_count(), 1);
    }

    #[actix_web::main]
    #[test]
    async fn occurrence_past_the_grace_window_is_left_alone() {
        let mut test = setup().await;
        test.ctx.config.delivery_grace_secs = 60;
        // 90 seconds late with a 60 second window
        let occurrence = insert_occurrence(&test, NOW - 90 * 1000).await;

        let stats = sweep(&test.ctx).await;
        assert_eq!(stats, SweepStats::default());
        assert_eq!(test.gateway.sent_count(), 0);
        let untouched = test.ctx.repos.occurrences.find(&occurrence.id).await.unwrap();
        assert_eq!(untouched.status, OccurrenceStatus::Scheduled);
    }

    #[actix_web::main]
    #[test]
    async fn stale_generation_is_skipped() {
        let test = setup().await;
        let occurrence = insert_occurrence(&test, NOW).await;
        // A newer scheduling pass supersedes the row above
        test.ctx
            .repos
            .occurrences
            .bump_generation(&test.user.id)
            .await
            .unwrap();

        let stats = sweep(&test.ctx).await;
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.sent, 0);
        assert_eq!(test.gateway.sent_count(), 0);
        let untouched = test.ctx.repos.occurrences.find(&occurrence.id).await.unwrap();
        assert_eq!(untouched.status, OccurrenceStatus::Scheduled);
    }

    #[actix_web::main]
    #[test]
    async fn rejected_dispatch_marks_failed_without_follow_up() {
        let test = setup().await;
        let occurrence = insert_occurrence(&test, NOW).await;
        test.gateway.set_rejecting(true);

        let stats = sweep(&test.ctx).await;
        assert_eq!(stats.failed, 1);
        let failed = test.ctx.repos.occurrences.find(&occurrence.id).await.unwrap();
        assert_eq!(failed.status, OccurrenceStatus::Failed);
        assert_eq!(failed.failed_at, Some(NOW));
        assert!(test
            .ctx
            .repos
            .occurrences
            .find_scheduled_by_user(&test.user.id)
            .await
            .is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn deactivated_reminder_is_skipped() {
        let test = setup().await;
        insert_occurrence(&test, NOW).await;
        let mut reminder = test.reminder.clone();
        reminder.is_active = false;
        test.ctx.repos.reminders.save(&reminder).await.unwrap();

        let stats = sweep(&test.ctx).await;
        assert_eq!(stats.skipped, 1);
        assert_eq!(test.gateway.sent_count(), 0);
    }

    #[actix_web::main]
    #[test]
    async fn missing_device_token_marks_failed() {
        let test = setup().await;
        let occurrence = insert_occurrence(&test, NOW).await;
        let mut user = test.user.clone();
        user.device_token = None;
        test.ctx.repos.users.save(&user).await.unwrap();

        let stats = sweep(&test.ctx).await;
        assert_eq!(stats.failed, 1);
        let failed = test.ctx.repos.occurrences.find(&occurrence.id).await.unwrap();
        assert_eq!(failed.status, OccurrenceStatus::Failed);
    }
}
