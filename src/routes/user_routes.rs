use actix_web::web;
use crate::handlers::user_handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("", web::get().to(user_handlers::list_users))
            .route("/{id}", web::patch().to(user_handlers::update_user)),
    );
}
