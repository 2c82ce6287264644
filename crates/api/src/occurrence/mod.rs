mod cancel_reminders;
pub mod purge_old_occurrences;
mod schedule_reminders;
pub mod sweep_due_occurrences;

use actix_web::web;
use cancel_reminders::cancel_reminders_controller;
use schedule_reminders::schedule_reminders_controller;

pub use schedule_reminders::ScheduleRemindersUseCase;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/users/{user_id}/reminders/schedule",
        web::post().to(schedule_reminders_controller),
    );
    cfg.route(
        "/users/{user_id}/reminders",
        web::delete().to(cancel_reminders_controller),
    );
}
