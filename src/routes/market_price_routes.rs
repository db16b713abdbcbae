use actix_web::web;
use crate::handlers::market_price_handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/market_prices")
            .route("", web::get().to(market_price_handlers::list_market_prices))
            .route("/today", web::get().to(market_price_handlers::get_today_market_prices))
            .route("", web::post().to(market_price_handlers::submit_market_prices)),
    );
}
