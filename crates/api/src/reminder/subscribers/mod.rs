use super::update_reminder::UpdateReminderUseCase;
use crate::occurrence::ScheduleRemindersUseCase;
use crate::shared::usecase::{execute, Subscriber};
use mealmind_domain::Reminder;
use mealmind_infra::MealmindContext;

/// Re-plans the user's pending week after a reminder edit. Without this
/// the already written occurrences would keep firing with the stale time
/// or message.
pub struct ScheduleUserRemindersOnChange;

#[async_trait::async_trait(?Send)]
impl Subscriber<UpdateReminderUseCase> for ScheduleUserRemindersOnChange {
    async fn notify(&self, reminder: &Reminder, ctx: &MealmindContext) {
        let usecase = ScheduleRemindersUseCase {
            user_id: reminder.user_id.clone(),
            reminders: None,
        };

        // Sideeffect, ignore result
        let _ = execute(usecase, ctx).await;
    }
}
