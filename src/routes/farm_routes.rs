use actix_web::web;
use crate::handlers::farm_handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/farms")
            .route("", web::get().to(farm_handlers::list_farms))
            .route("", web::post().to(farm_handlers::create_farm))
            .route("/{id}", web::patch().to(farm_handlers::update_farm)),
    );
}
