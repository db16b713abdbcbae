use actix_web::{web, HttpResponse};
use log::info;
use serde::{Deserialize, Serialize};

use crate::handlers::{parse_object_id, required_range, ListResponse};
use crate::models::{ApiError, QcRequest, QcStatus, SessionContext, UpdateQcRequest};
use crate::services::{join_related, Joined, MongoDBService, RangeQuery};
use crate::utils::display::{fmt_date, fmt_opt, MISSING};

#[derive(Debug, Deserialize)]
pub struct QcListQuery {
    pub timeframe: Option<String>,
    pub status: Option<QcStatus>,
}

#[derive(Debug, Serialize)]
pub struct QcRow {
    pub id: String,
    pub requested_on: String,
    pub status: String,
    pub notes: String,
    pub farm_id: String,
    pub farmer_name: String,
    pub district: String,
}

impl QcRow {
    fn from_joined(joined: &Joined<QcRequest>) -> Self {
        let record = &joined.record;
        Self {
            id: record.id.map(|oid| oid.to_hex()).unwrap_or_default(),
            requested_on: fmt_date(&record.requested_at),
            status: record.status.to_string(),
            notes: fmt_opt(&record.notes),
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
            district: joined
                .crop
                .as_ref()
                .and_then(|crop| crop.district.clone())
                .unwrap_or_else(|| MISSING.to_string()),
        }
    }
}

pub async fn list_qc_requests(
    mongodb: web::Data<MongoDBService>,
    query: web::Query<QcListQuery>,
) -> Result<HttpResponse, ApiError> {
    info!("Fetching QC requests grid");

    let range = required_range(&query.timeframe)?;
    let requests = mongodb
        .find_qc_requests(
            RangeQuery::new()
                .time_range("requested_at", range.as_ref())
                .eq_opt("status", query.status.map(|s| s.to_string())),
        )
        .await?;

    let joined = join_related(mongodb.get_ref(), requests).await?;
    let rows: Vec<QcRow> = joined.iter().map(QcRow::from_joined).collect();
    info!("Found {} QC requests", rows.len());
    Ok(HttpResponse::Ok().json(ListResponse::new(rows)))
}

pub async fn update_qc_request(
    mongodb: web::Data<MongoDBService>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateQcRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_object_id(&path)?;
    let payload = payload.into_inner();

    info!(
        "User {} setting QC request {} to {}",
        session.user_id, id, payload.status
    );
    let request = mongodb.update_qc_status(&id, payload.status, payload.notes).await?;
    Ok(HttpResponse::Ok().json(request))
}
