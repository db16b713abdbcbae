use actix_web::web;
use crate::handlers::call_log_handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/call_logs")
            .route("", web::get().to(call_log_handlers::list_call_logs))
            .route("", web::post().to(call_log_handlers::create_call_log)),
    );
}
