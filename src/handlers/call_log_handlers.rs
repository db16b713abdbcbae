use actix_web::{web, HttpResponse};
use log::info;
use serde::{Deserialize, Serialize};

use crate::handlers::{required_range, ListResponse};
use crate::models::{ApiError, CallAttempt, CallStatus, CreateCallAttemptRequest, SessionContext};
use crate::services::{join_related, Joined, MongoDBService, RangeQuery};
use crate::utils::display::{fmt_date, fmt_opt, MISSING};

#[derive(Debug, Deserialize)]
pub struct CallLogListQuery {
    pub timeframe: Option<String>,
    pub status: Option<CallStatus>,
}

#[derive(Debug, Serialize)]
pub struct CallLogRow {
    pub id: String,
    pub called_on: String,
    pub status: String,
    pub notes: String,
    pub farm_id: String,
    pub farmer_name: String,
    pub farmer_phone: String,
    pub user_name: String,
}

impl CallLogRow {
    fn from_joined(joined: &Joined<CallAttempt>) -> Self {
        let record = &joined.record;
        Self {
            id: record.id.map(|oid| oid.to_hex()).unwrap_or_default(),
            called_on: fmt_date(&record.called_at),
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
            farmer_phone: joined
                .crop
                .as_ref()
                .map(|crop| crop.farmer_phone.clone())
                .unwrap_or_else(|| MISSING.to_string()),
            user_name: joined
                .user
                .as_ref()
                .map(|user| user.name.clone())
                .unwrap_or_else(|| MISSING.to_string()),
        }
    }
}

pub async fn list_call_logs(
    mongodb: web::Data<MongoDBService>,
    query: web::Query<CallLogListQuery>,
) -> Result<HttpResponse, ApiError> {
    info!("Fetching call logs grid");

    let range = required_range(&query.timeframe)?;
    let attempts = mongodb
        .find_call_attempts(
            RangeQuery::new()
                .time_range("called_at", range.as_ref())
                .eq_opt("status", query.status.map(|s| s.to_string())),
        )
        .await?;

    let joined = join_related(mongodb.get_ref(), attempts).await?;
    let rows: Vec<CallLogRow> = joined.iter().map(CallLogRow::from_joined).collect();
    info!("Found {} call attempts", rows.len());
    Ok(HttpResponse::Ok().json(ListResponse::new(rows)))
}

pub async fn create_call_log(
    mongodb: web::Data<MongoDBService>,
    session: SessionContext,
    payload: web::Json<CreateCallAttemptRequest>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();
    payload.validate()?;

    info!("User {} logging a call attempt", session.user_id);
    let attempt = mongodb.create_call_attempt(payload.into_attempt()).await?;
    Ok(HttpResponse::Created().json(attempt))
}
