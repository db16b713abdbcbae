use serde::{Deserialize, Serialize};
use mongodb::bson::{self, oid::ObjectId};
use chrono::{DateTime, Utc};

use crate::models::ApiError;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum ReminderStatus {
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "done")]
    Done,
}

impl std::fmt::Display for ReminderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReminderStatus::Pending => write!(f, "pending"),
            ReminderStatus::Done => write!(f, "done"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Reminder {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub crop_id: Option<String>,
    pub user_id: Option<String>,
    pub note: String,
    pub status: ReminderStatus,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub remind_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateReminderRequest {
    pub crop_id: Option<String>,
    pub user_id: Option<String>,
    pub note: String,
    pub remind_at: DateTime<Utc>,
}

impl CreateReminderRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.note.trim().is_empty() {
            return Err(ApiError::ValidationError("Reminder note cannot be empty".to_string()));
        }
        Ok(())
    }

    pub fn into_reminder(self) -> Reminder {
        Reminder {
            id: None,
            crop_id: self.crop_id,
            user_id: self.user_id,
            note: self.note,
            status: ReminderStatus::Pending,
            remind_at: self.remind_at,
            created_at: Utc::now(),
        }
    }
}
