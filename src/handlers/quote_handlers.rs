use actix_web::{web, HttpResponse};
use log::info;
use serde::{Deserialize, Serialize};

use crate::handlers::{required_range, ListResponse};
use crate::models::{ApiError, BuyerCropQuote, CreateQuoteRequest, SessionContext};
use crate::services::{join_related, Joined, MongoDBService, RangeQuery};
use crate::utils::display::{fmt_bool, fmt_date, fmt_price, MISSING};

#[derive(Debug, Deserialize)]
pub struct QuoteListQuery {
    pub timeframe: Option<String>,
    pub crop: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QuoteRow {
    pub id: String,
    pub quoted_on: String,
    pub crop_name: String,
    pub variety: String,
    pub price_per_quintal: String,
    pub buyer_name: String,
    pub buyer_phone: String,
    pub buyer_verified: String,
}

impl QuoteRow {
    fn from_joined(joined: &Joined<BuyerCropQuote>) -> Self {
        let record = &joined.record;
        Self {
            id: record.id.map(|oid| oid.to_hex()).unwrap_or_default(),
            quoted_on: fmt_date(&record.quoted_at),
            crop_name: record.crop_name.clone(),
            variety: record.variety.clone(),
            price_per_quintal: fmt_price(record.price_per_quintal),
            buyer_name: joined
                .buyer
                .as_ref()
                .map(|buyer| buyer.name.clone())
                .unwrap_or_else(|| MISSING.to_string()),
            buyer_phone: joined
                .buyer
                .as_ref()
                .map(|buyer| buyer.phone.clone())
                .unwrap_or_else(|| MISSING.to_string()),
            buyer_verified: joined
                .buyer
                .as_ref()
                .map(|buyer| fmt_bool(buyer.is_verified))
                .unwrap_or_else(|| MISSING.to_string()),
        }
    }
}

pub async fn list_quotes(
    mongodb: web::Data<MongoDBService>,
    query: web::Query<QuoteListQuery>,
) -> Result<HttpResponse, ApiError> {
    info!("Fetching buyer quotes grid");

    let range = required_range(&query.timeframe)?;
    let quotes = mongodb
        .find_quotes(
            RangeQuery::new()
                .time_range("quoted_at", range.as_ref())
                .eq_opt("crop_name", query.crop.clone()),
        )
        .await?;

    let joined = join_related(mongodb.get_ref(), quotes).await?;
    let rows: Vec<QuoteRow> = joined.iter().map(QuoteRow::from_joined).collect();
    info!("Found {} quotes", rows.len());
    Ok(HttpResponse::Ok().json(ListResponse::new(rows)))
}

pub async fn create_quote(
    mongodb: web::Data<MongoDBService>,
    session: SessionContext,
    payload: web::Json<CreateQuoteRequest>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();
    payload.validate()?;

    info!("User {} submitting a buyer quote", session.user_id);
    let quote = mongodb.create_quote(payload.into_quote()).await?;
    Ok(HttpResponse::Created().json(quote))
}
