mod extract_reminders;
mod subscribers;
pub mod update_reminder;

use actix_web::web;
use extract_reminders::extract_reminders_controller;
use update_reminder::update_reminder_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/users/{user_id}/reminders/extract",
        web::post().to(extract_reminders_controller),
    );
    cfg.route(
        "/users/{user_id}/reminders/{reminder_id}",
        web::put().to(update_reminder_controller),
    );
}
