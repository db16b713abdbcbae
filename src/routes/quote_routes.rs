use actix_web::web;
use crate::handlers::quote_handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/quotes")
            .route("", web::get().to(quote_handlers::list_quotes))
            .route("", web::post().to(quote_handlers::create_quote)),
    );
}
