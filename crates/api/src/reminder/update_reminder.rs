use super::subscribers::ScheduleUserRemindersOnChange;
use crate::error::MealmindError;
use crate::shared::usecase::{execute, Subscriber, UseCase};
use actix_web::{web, HttpResponse};
use mealmind_api_structs::update_reminder::*;
use mealmind_domain::{Reminder, TimeOfDay, Weekday, ID};
use mealmind_infra::MealmindContext;
use std::collections::BTreeSet;

fn handle_error(e: UseCaseError) -> MealmindError {
    match e {
        UseCaseError::NotFound(reminder_id) => MealmindError::NotFound(format!(
            "The reminder with id: {}, was not found.",
            reminder_id
        )),
        UseCaseError::InvalidWeekdays => MealmindError::BadClientData(
            "An active reminder needs at least one selected weekday".into(),
        ),
        UseCaseError::DuplicateReminder => MealmindError::BadClientData(
            "Another reminder with the same time and message already exists".into(),
        ),
        UseCaseError::StorageError => MealmindError::InternalError,
    }
}

pub async fn update_reminder_controller(
    path: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<MealmindContext>,
) -> Result<HttpResponse, MealmindError> {
    let body = body.into_inner();

    let time_of_day = match body.time_of_day {
        Some(raw) => Some(
            raw.parse::<TimeOfDay>()
                .map_err(|e| MealmindError::BadClientData(e.to_string()))?,
        ),
        None => None,
    };
    let selected_weekdays = match body.selected_weekdays {
        Some(indices) => {
            let mut days = BTreeSet::new();
            for index in indices {
                let day = Weekday::from_index(index).ok_or_else(|| {
                    MealmindError::BadClientData(format!(
                        "Invalid weekday index: {}, expected 0 (Monday) to 6 (Sunday)",
                        index
                    ))
                })?;
                days.insert(day);
            }
            Some(days)
        }
        None => None,
    };

    let usecase = UpdateReminderUseCase {
        user_id: path.user_id.clone(),
        reminder_id: path.reminder_id.clone(),
        message: body.message,
        time_of_day,
        selected_weekdays,
        is_active: body.is_active,
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Ok().json(APIResponse::new(reminder)))
        .map_err(handle_error)
}

/// Applies a partial edit to one reminder. The subscriber then re-plans
/// the user's pending week so no occurrence keeps firing with the old
/// time or message.
#[derive(Debug)]
pub struct UpdateReminderUseCase {
    pub user_id: ID,
    pub reminder_id: ID,
    pub message: Option<String>,
    pub time_of_day: Option<TimeOfDay>,
    pub selected_weekdays: Option<BTreeSet<Weekday>>,
    pub is_active: Option<bool>,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
    InvalidWeekdays,
    DuplicateReminder,
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateReminderUseCase {
    type Response = Reminder;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &MealmindContext) -> Result<Self::Response, Self::Errors> {
        let mut reminder = match ctx.repos.reminders.find(&self.reminder_id).await {
            Some(r) if r.user_id == self.user_id => r,
            _ => return Err(UseCaseError::NotFound(self.reminder_id.clone())),
        };

        if let Some(message) = self.message.take() {
            reminder.message = message;
        }
        if let Some(time_of_day) = self.time_of_day {
            reminder.time_of_day = time_of_day;
        }
        if let Some(selected_weekdays) = self.selected_weekdays.take() {
            reminder.selected_weekdays = selected_weekdays;
        }
        if let Some(is_active) = self.is_active {
            reminder.is_active = is_active;
        }
        if !reminder.is_valid() {
            return Err(UseCaseError::InvalidWeekdays);
        }

        // An edit keeps the reminder's original id, so two reminders
        // could otherwise end up sharing one time and message pair
        let collides = ctx
            .repos
            .reminders
            .find_by_user(&self.user_id)
            .await
            .iter()
            .any(|other| {
                other.id != reminder.id
                    && other.time_of_day == reminder.time_of_day
                    && other.message == reminder.message
            });
        if collides {
            return Err(UseCaseError::DuplicateReminder);
        }

        reminder.updated = ctx.sys.get_timestamp_millis();
        ctx.repos
            .reminders
            .save(&reminder)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(reminder)
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(ScheduleUserRemindersOnChange)]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use mealmind_domain::ReminderSource;
    use mealmind_infra::setup_context;

    async fn setup() -> (MealmindContext, Reminder) {
        let ctx = setup_context().await;
        let reminder = Reminder::new(
            ID::new(),
            TimeOfDay::new(8, 0).unwrap(),
            "take vitamins".into(),
            Weekday::work_week(),
            ReminderSource::DietPdf,
            1_000,
        );
        ctx.repos
            .reminders
            .bulk_upsert(std::slice::from_ref(&reminder))
            .await
            .unwrap();
        (ctx, reminder)
    }

    fn patch(reminder: &Reminder) -> UpdateReminderUseCase {
        UpdateReminderUseCase {
            user_id: reminder.user_id.clone(),
            reminder_id: reminder.id.clone(),
            message: None,
            time_of_day: None,
            selected_weekdays: None,
            is_active: None,
        }
    }

    #[actix_web::main]
    #[test]
    async fn applies_partial_updates_and_stamps_updated() {
        let (ctx, reminder) = setup().await;
        let mut usecase = patch(&reminder);
        usecase.message = Some("take omega capsules".into());
        usecase.time_of_day = Some(TimeOfDay::new(21, 30).unwrap());

        let updated = usecase.execute(&ctx).await.unwrap();
        assert_eq!(updated.message, "take omega capsules");
        assert_eq!(updated.time_of_day.to_string(), "21:30");
        assert_eq!(updated.id, reminder.id);
        assert!(updated.updated > reminder.updated);

        let stored = ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert_eq!(stored, updated);
    }

    #[actix_web::main]
    #[test]
    async fn rejects_an_active_reminder_with_no_weekdays() {
        let (ctx, reminder) = setup().await;
        let mut usecase = patch(&reminder);
        usecase.selected_weekdays = Some(BTreeSet::new());

        assert!(matches!(
            usecase.execute(&ctx).await,
            Err(UseCaseError::InvalidWeekdays)
        ));

        // Deactivating at the same time makes the empty set acceptable
        let mut usecase = patch(&reminder);
        usecase.selected_weekdays = Some(BTreeSet::new());
        usecase.is_active = Some(false);
        assert!(usecase.execute(&ctx).await.is_ok());
    }

    #[actix_web::main]
    #[test]
    async fn rejects_an_edit_that_collides_with_another_reminder() {
        let (ctx, reminder) = setup().await;
        let other = Reminder::new(
            reminder.user_id.clone(),
            TimeOfDay::new(21, 0).unwrap(),
            "evening walk".into(),
            Weekday::work_week(),
            ReminderSource::DietPdf,
            1_000,
        );
        ctx.repos
            .reminders
            .bulk_upsert(std::slice::from_ref(&other))
            .await
            .unwrap();

        let mut usecase = patch(&reminder);
        usecase.message = Some("evening walk".into());
        usecase.time_of_day = Some(TimeOfDay::new(21, 0).unwrap());
        assert!(matches!(
            usecase.execute(&ctx).await,
            Err(UseCaseError::DuplicateReminder)
        ));

        // The edited reminder is untouched after the rejection
        let stored = ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert_eq!(stored.message, reminder.message);
    }

    #[actix_web::main]
    #[test]
    async fn rejects_updates_against_someone_elses_reminder() {
        let (ctx, reminder) = setup().await;
        let mut usecase = patch(&reminder);
        usecase.user_id = ID::new();

        assert!(matches!(
            usecase.execute(&ctx).await,
            Err(UseCaseError::NotFound(_))
        ));
    }

    #[actix_web::main]
    #[test]
    async fn update_through_executor_replans_the_pending_week() {
        let (ctx, reminder) = setup().await;
        let user_id = reminder.user_id.clone();

        let mut usecase = patch(&reminder);
        usecase.time_of_day = Some(TimeOfDay::new(9, 0).unwrap());
        execute(usecase, &ctx).await.unwrap();

        // The subscriber scheduled one occurrence per work week day
        let pending = ctx.repos.occurrences.find_scheduled_by_user(&user_id).await;
        assert_eq!(pending.len(), 5);
        for occurrence in &pending {
            assert_eq!(occurrence.reminder_id, reminder.id);
        }

        // Deactivating clears the pending week again
        let mut usecase = patch(&reminder);
        usecase.is_active = Some(false);
        execute(usecase, &ctx).await.unwrap();
        assert!(ctx
            .repos
            .occurrences
            .find_scheduled_by_user(&user_id)
            .await
            .is_empty());
    }
}
