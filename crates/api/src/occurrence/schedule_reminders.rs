use super::cancel_reminders::CancelRemindersUseCase;
use crate::error::MealmindError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use mealmind_api_structs::dtos::ReminderInput;
use mealmind_api_structs::schedule_reminders::*;
use mealmind_domain::{
    next_trigger_millis, Reminder, ReminderSource, ScheduledOccurrence, TimeOfDay, Weekday, ID,
};
use mealmind_infra::MealmindContext;
use std::collections::{BTreeSet, HashSet};
use tracing::error;

fn handle_error(e: UseCaseError) -> MealmindError {
    match e {
        UseCaseError::StorageError => MealmindError::InternalError,
    }
}

fn reminder_from_input(
    user_id: &ID,
    input: ReminderInput,
    now: i64,
) -> Result<Reminder, MealmindError> {
    let time_of_day = input
        .time_of_day
        .parse::<TimeOfDay>()
        .map_err(|e| MealmindError::BadClientData(e.to_string()))?;

    let selected_weekdays = match input.selected_weekdays {
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
            days
        }
        None => Weekday::work_week(),
    };
    if selected_weekdays.is_empty() {
        return Err(MealmindError::BadClientData(
            "A reminder needs at least one selected weekday".into(),
        ));
    }

    Ok(Reminder::new(
        user_id.clone(),
        time_of_day,
        input.message,
        selected_weekdays,
        ReminderSource::Custom,
        now,
    ))
}

pub async fn schedule_reminders_controller(
    path: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<MealmindContext>,
) -> Result<HttpResponse, MealmindError> {
    let now = ctx.sys.get_timestamp_millis();
    let reminders = match body.into_inner().reminders {
        Some(inputs) => Some(
            inputs
                .into_iter()
                .map(|input| reminder_from_input(&path.user_id, input, now))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        None => None,
    };

    let usecase = ScheduleRemindersUseCase {
        user_id: path.user_id.clone(),
        reminders,
    };

    execute(usecase, &ctx)
        .await
        .map(|count| HttpResponse::Ok().json(APIResponse::new(count)))
        .map_err(handle_error)
}

/// One full scheduling pass for a user: cancel whatever is pending, bump
/// the scheduling generation, persist the reminders and write one pending
/// occurrence per active reminder and selected weekday.
#[derive(Debug)]
pub struct ScheduleRemindersUseCase {
    pub user_id: ID,
    /// Reminders to persist before scheduling. `None` re-schedules the
    /// user's stored reminders as they are.
    pub reminders: Option<Vec<Reminder>>,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for ScheduleRemindersUseCase {
    type Response = usize;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &MealmindContext) -> Result<Self::Response, Self::Errors> {
        // Pending occurrences from earlier passes must be gone before any
        // new row is written, otherwise a reminder could fire twice.
        let cancel = CancelRemindersUseCase {
            user_id: self.user_id.clone(),
        };
        execute(cancel, ctx)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        // Rows written from here on carry the new generation. Should this
        // pass race another one, the sweeper only honors the latest.
        let generation = ctx
            .repos
            .occurrences
            .bump_generation(&self.user_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        let reminders = match self.reminders.take() {
            Some(reminders) => {
                ctx.repos
                    .reminders
                    .bulk_upsert(&reminders)
                    .await
                    .map_err(|_| UseCaseError::StorageError)?;
                reminders
            }
            None => ctx.repos.reminders.find_by_user(&self.user_id).await,
        };

        let now = ctx.sys.get_timestamp_millis();
        let tz = ctx.config.canonical_timezone;

        // Duplicate inputs collapse to one stored reminder through the
        // upsert, so they must collapse to one expansion as well.
        let mut seen = HashSet::new();
        let reminders = reminders
            .into_iter()
            .filter(|r| seen.insert(r.id.clone()))
            .collect::<Vec<_>>();

        let mut created = 0;
        for reminder in reminders.iter().filter(|r| r.is_active && r.is_valid()) {
            for weekday in &reminder.selected_weekdays {
                let scheduled_for =
                    next_trigger_millis(now, *weekday, &reminder.time_of_day, &tz);
                let occurrence = ScheduledOccurrence::new(
                    self.user_id.clone(),
                    reminder.id.clone(),
                    *weekday,
                    scheduled_for,
                    generation,
                    now,
                );
                match ctx.repos.occurrences.insert(&occurrence).await {
                    Ok(_) => created += 1,
                    Err(e) => error!(
                        "Unable to persist occurrence for reminder {}: {:?}",
                        reminder.id, e
                    ),
                }
            }
        }

        Ok(created)
    }
}
