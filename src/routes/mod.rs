mod farm_routes;
mod user_routes;
mod reservation_routes;
mod call_log_routes;
mod reminder_routes;
mod quote_routes;
mod market_price_routes;
mod qc_routes;

pub use farm_routes::configure as configure_farm_routes;
pub use user_routes::configure as configure_user_routes;
pub use reservation_routes::configure as configure_reservation_routes;
pub use call_log_routes::configure as configure_call_log_routes;
pub use reminder_routes::configure as configure_reminder_routes;
pub use quote_routes::configure as configure_quote_routes;
pub use market_price_routes::configure as configure_market_price_routes;
pub use qc_routes::configure as configure_qc_routes;

pub fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    configure_farm_routes(cfg);
    configure_user_routes(cfg);
    configure_reservation_routes(cfg);
    configure_call_log_routes(cfg);
    configure_reminder_routes(cfg);
    configure_quote_routes(cfg);
    configure_market_price_routes(cfg);
    configure_qc_routes(cfg);
}
