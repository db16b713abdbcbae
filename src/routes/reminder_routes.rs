use actix_web::web;
use crate::handlers::reminder_handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reminders")
            .route("", web::get().to(reminder_handlers::list_reminders))
            .route("", web::post().to(reminder_handlers::create_reminder)),
    );
}
