use actix_web::{web, HttpResponse};
use chrono::Utc;
use log::info;
use serde::Deserialize;
use serde_json::json;

use crate::handlers::{required_range, ListResponse};
use crate::models::market_price::price_date_key;
use crate::models::{ApiError, SessionContext, SubmitMarketPricesRequest};
use crate::services::{MongoDBService, RangeQuery};

#[derive(Debug, Deserialize)]
pub struct MarketPriceListQuery {
    pub timeframe: Option<String>,
}

pub async fn list_market_prices(
    mongodb: web::Data<MongoDBService>,
    query: web::Query<MarketPriceListQuery>,
) -> Result<HttpResponse, ApiError> {
    info!("Fetching market price entries");

    let range = required_range(&query.timeframe)?;
    let entries = mongodb
        .find_market_prices(RangeQuery::new().time_range("created_at", range.as_ref()))
        .await?;

    info!("Found {} market price entries", entries.len());
    Ok(HttpResponse::Ok().json(ListResponse::new(entries)))
}

/// Today's entry, so the form can load existing values instead of defaults.
/// `null` means no entry has been submitted yet today.
pub async fn get_today_market_prices(
    mongodb: web::Data<MongoDBService>,
) -> Result<HttpResponse, ApiError> {
    let key = price_date_key(Utc::now());
    info!("Fetching market prices for {}", key);

    let entry = mongodb.get_market_prices_for_day(&key).await?;
    Ok(HttpResponse::Ok().json(json!({
        "price_date": key,
        "entry": entry,
    })))
}

/// Daily-singleton submit: upserts against the date-derived key, so a second
/// submit the same day updates the first document instead of creating one.
pub async fn submit_market_prices(
    mongodb: web::Data<MongoDBService>,
    session: SessionContext,
    payload: web::Json<SubmitMarketPricesRequest>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();
    payload.validate()?;

    let key = price_date_key(Utc::now());
    info!("User {} submitting market prices for {}", session.user_id, key);

    let entry = mongodb
        .upsert_market_prices(&key, payload, &session.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(entry))
}
