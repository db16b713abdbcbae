use actix_web::{web, HttpResponse};
use log::info;
use serde::{Deserialize, Serialize};

use crate::handlers::{parse_object_id, required_range, ListResponse};
use crate::models::{ApiError, Reservation, ReservationStatus, SessionContext, UpdateReservationRequest};
use crate::services::{join_related, Joined, MongoDBService, RangeQuery};
use crate::utils::display::{fmt_bool, fmt_date, MISSING};

#[derive(Debug, Deserialize)]
pub struct ReservationListQuery {
    pub timeframe: Option<String>,
    pub status: Option<ReservationStatus>,
}

/// Flat grid row: reservation scalars plus the farmer/buyer columns pulled
/// from the joined documents, `N/A` where a relation dangles.
#[derive(Debug, Serialize)]
pub struct ReservationRow {
    pub id: String,
    pub reserved_on: String,
    pub crop_name: String,
    pub quantity_quintals: f64,
    pub status: String,
    pub farm_id: String,
    pub farmer_name: String,
    pub farmer_phone: String,
    pub buyer_name: String,
    pub buyer_phone: String,
    pub buyer_verified: String,
}

impl ReservationRow {
    fn from_joined(joined: &Joined<Reservation>) -> Self {
        let record = &joined.record;
        Self {
            id: record.id.map(|oid| oid.to_hex()).unwrap_or_default(),
            reserved_on: fmt_date(&record.reserved_at),
            crop_name: record.crop_name.clone(),
            quantity_quintals: record.quantity_quintals,
            status: record.status.to_string(),
            farm_id: joined
                .crop
                .as_ref()
                .map(|crop| crop.farm_id.clone())
                .unwrap_or_else(|| MISSING.to_string()),
            farmer_name: joined
                .crop
                .as_ref()
                .map(|crop| crop.farmer_name.clone())
                .unwrap_or_else(|| MISSING.to_string()),
            farmer_phone: joined
                .crop
                .as_ref()
                .map(|crop| crop.farmer_phone.clone())
                .unwrap_or_else(|| MISSING.to_string()),
            buyer_name: joined
                .user
                .as_ref()
                .map(|user| user.name.clone())
                .unwrap_or_else(|| MISSING.to_string()),
            buyer_phone: joined
                .user
                .as_ref()
                .map(|user| user.phone.clone())
                .unwrap_or_else(|| MISSING.to_string()),
            buyer_verified: joined
                .user
                .as_ref()
                .map(|user| fmt_bool(user.is_verified))
                .unwrap_or_else(|| MISSING.to_string()),
        }
    }
}

pub async fn list_reservations(
    mongodb: web::Data<MongoDBService>,
    query: web::Query<ReservationListQuery>,
) -> Result<HttpResponse, ApiError> {
    info!("Fetching reservations grid");

    let range = required_range(&query.timeframe)?;
    let reservations = mongodb
        .find_reservations(
            RangeQuery::new()
                .time_range("reserved_at", range.as_ref())
                .eq_opt("status", query.status.map(|s| s.to_string())),
        )
        .await?;

    let joined = join_related(mongodb.get_ref(), reservations).await?;
    let rows: Vec<ReservationRow> = joined.iter().map(ReservationRow::from_joined).collect();
    info!("Found {} reservations", rows.len());
    Ok(HttpResponse::Ok().json(ListResponse::new(rows)))
}

pub async fn update_reservation(
    mongodb: web::Data<MongoDBService>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateReservationRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_object_id(&path)?;

    info!(
        "User {} setting reservation {} to {}",
        session.user_id, id, payload.status
    );
    let reservation = mongodb.update_reservation_status(&id, payload.status).await?;
    Ok(HttpResponse::Ok().json(reservation))
}
