use actix_web::{web, App, HttpResponse, HttpServer};
use actix_cors::Cors;
use dotenv::dotenv;
use log::info;

mod config;
mod handlers;
mod models;
mod routes;
mod services;
mod utils;

use config::Config;
use services::MongoDBService;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let config = Config::load()?;
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(config.log_level.clone()));

    let mongodb = MongoDBService::init(&config)
        .await
        .expect("Failed to initialize MongoDB");
    let mongodb_data = web::Data::new(mongodb);

    info!("Starting server at http://{}:{}", config.host, config.port);

    let bind_addr = format!("{}:{}", config.host, config.port);
    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .expose_headers(vec!["content-type", "content-length", "accept"])
            .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(mongodb_data.clone())
            .configure(routes::configure)
            .route("/health", web::get().to(|| async {
                info!("Health check");
                HttpResponse::Ok().body("OK")
            }))
    })
    .bind(bind_addr)?
    .run()
    .await?;

    info!("Server shutting down");
    Ok(())
}
