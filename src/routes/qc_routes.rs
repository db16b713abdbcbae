use actix_web::web;
use crate::handlers::qc_handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/qc_requests")
            .route("", web::get().to(qc_handlers::list_qc_requests))
            .route("/{id}", web::patch().to(qc_handlers::update_qc_request)),
    );
}
