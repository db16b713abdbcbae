use actix_web::{web, HttpResponse};
use log::info;
use serde::{Deserialize, Serialize};

use crate::handlers::{required_range, ListResponse};
use crate::models::{ApiError, CreateReminderRequest, Reminder, SessionContext};
use crate::services::{join_related, Joined, MongoDBService, RangeQuery};
use crate::utils::display::{fmt_date, MISSING};

#[derive(Debug, Deserialize)]
pub struct ReminderListQuery {
    pub timeframe: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReminderRow {
    pub id: String,
    pub remind_on: String,
    pub note: String,
    pub status: String,
    pub farm_id: String,
    pub farmer_name: String,
    pub user_name: String,
}

impl ReminderRow {
    fn from_joined(joined: &Joined<Reminder>) -> Self {
        let record = &joined.record;
        Self {
            id: record.id.map(|oid| oid.to_hex()).unwrap_or_default(),
            remind_on: fmt_date(&record.remind_at),
            note: record.note.clone(),
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
            user_name: joined
                .user
                .as_ref()
                .map(|user| user.name.clone())
                .unwrap_or_else(|| MISSING.to_string()),
        }
    }
}

pub async fn list_reminders(
    mongodb: web::Data<MongoDBService>,
    query: web::Query<ReminderListQuery>,
) -> Result<HttpResponse, ApiError> {
    info!("Fetching reminders grid");

    let range = required_range(&query.timeframe)?;
    let reminders = mongodb
        .find_reminders(RangeQuery::new().time_range("remind_at", range.as_ref()))
        .await?;

    let joined = join_related(mongodb.get_ref(), reminders).await?;
    let rows: Vec<ReminderRow> = joined.iter().map(ReminderRow::from_joined).collect();
    info!("Found {} reminders", rows.len());
    Ok(HttpResponse::Ok().json(ListResponse::new(rows)))
}

pub async fn create_reminder(
    mongodb: web::Data<MongoDBService>,
    session: SessionContext,
    payload: web::Json<CreateReminderRequest>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();
    payload.validate()?;

    info!("User {} creating a reminder", session.user_id);
    let reminder = mongodb.create_reminder(payload.into_reminder()).await?;
    Ok(HttpResponse::Created().json(reminder))
}
