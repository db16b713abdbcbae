use actix_web::web;
use crate::handlers::reservation_handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reservations")
            .route("", web::get().to(reservation_handlers::list_reservations))
            .route("/{id}", web::patch().to(reservation_handlers::update_reservation)),
    );
}
