use actix_web::{web, HttpResponse};
use chrono::Utc;
use log::info;
use serde::{Deserialize, Serialize};

use crate::handlers::{parse_object_id, ListResponse};
use crate::models::{ApiError, CreateCropRequest, Crop, SessionContext, UpdateCropRequest};
use crate::services::{MongoDBService, RangeQuery};
use crate::utils::display::{fmt_bool, fmt_date, fmt_list, fmt_opt, fmt_opt_date};
use crate::utils::timeframe::Timeframe;

#[derive(Debug, Deserialize)]
pub struct FarmListQuery {
    pub timeframe: Option<String>,
    pub district: Option<String>,
    pub crop: Option<String>,
}

/// Flat grid row for the farms view.
#[derive(Debug, Serialize)]
pub struct FarmRow {
    pub id: String,
    pub farm_id: String,
    pub farmer_name: String,
    pub farmer_phone: String,
    pub village: String,
    pub district: String,
    pub crops_available: String,
    pub grows_onion: String,
    pub grows_potato: String,
    pub grows_tomato: String,
    pub grows_banana: String,
    pub acreage: f64,
    pub expected_yield_quintals: f64,
    pub harvest_cycle_days: i32,
    pub last_harvest_on: String,
    pub onboarded_on: String,
}

impl FarmRow {
    fn from_crop(crop: &Crop) -> Self {
        Self {
            id: crop.id.map(|oid| oid.to_hex()).unwrap_or_default(),
            farm_id: crop.farm_id.clone(),
            farmer_name: crop.farmer_name.clone(),
            farmer_phone: crop.farmer_phone.clone(),
            village: fmt_opt(&crop.village),
            district: fmt_opt(&crop.district),
            crops_available: fmt_list(&crop.crops_available),
            grows_onion: fmt_bool(crop.grows_onion),
            grows_potato: fmt_bool(crop.grows_potato),
            grows_tomato: fmt_bool(crop.grows_tomato),
            grows_banana: fmt_bool(crop.grows_banana),
            acreage: crop.acreage,
            expected_yield_quintals: crop.expected_yield_quintals,
            harvest_cycle_days: crop.harvest_cycle_days,
            last_harvest_on: fmt_opt_date(&crop.last_harvest_at),
            onboarded_on: fmt_date(&crop.created_at),
        }
    }
}

/// Farms are master data: the grid lists the whole collection unless a
/// timeframe narrows it down by onboarding date.
pub async fn list_farms(
    mongodb: web::Data<MongoDBService>,
    query: web::Query<FarmListQuery>,
) -> Result<HttpResponse, ApiError> {
    info!("Fetching farms grid");

    let range = match &query.timeframe {
        Some(token) => token.parse::<Timeframe>()?.resolve(Utc::now()),
        None => None,
    };

    let crops = mongodb
        .find_crops(
            RangeQuery::new()
                .time_range("created_at", range.as_ref())
                .eq_opt("district", query.district.clone())
                .eq_opt("crops_available", query.crop.clone()),
        )
        .await?;

    let rows: Vec<FarmRow> = crops.iter().map(FarmRow::from_crop).collect();
    info!("Found {} farms", rows.len());
    Ok(HttpResponse::Ok().json(ListResponse::new(rows)))
}

pub async fn create_farm(
    mongodb: web::Data<MongoDBService>,
    session: SessionContext,
    payload: web::Json<CreateCropRequest>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();
    payload.validate()?;

    info!("User {} onboarding farm {}", session.user_id, payload.farm_id);
    let crop = mongodb.create_crop(payload.into_crop()).await?;
    Ok(HttpResponse::Created().json(crop))
}

pub async fn update_farm(
    mongodb: web::Data<MongoDBService>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateCropRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_object_id(&path)?;
    let payload = payload.into_inner();
    payload.validate()?;

    info!("User {} updating farm {}", session.user_id, id);
    let crop = mongodb.update_crop(&id, payload).await?;
    Ok(HttpResponse::Ok().json(crop))
}
