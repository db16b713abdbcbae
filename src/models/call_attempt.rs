use serde::{Deserialize, Serialize};
use mongodb::bson::{self, oid::ObjectId};
use chrono::{DateTime, Utc};

use crate::models::ApiError;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum CallStatus {
    #[serde(rename = "connected")]
    Connected,
    #[serde(rename = "no_answer")]
    NoAnswer,
    #[serde(rename = "busy")]
    Busy,
    #[serde(rename = "wrong_number")]
    WrongNumber,
}

impl std::fmt::Display for CallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallStatus::Connected => write!(f, "connected"),
            CallStatus::NoAnswer => write!(f, "no_answer"),
            CallStatus::Busy => write!(f, "busy"),
            CallStatus::WrongNumber => write!(f, "wrong_number"),
        }
    }
}

/// Outbound call record from the ops team to a farmer.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CallAttempt {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub crop_id: Option<String>,
    pub user_id: Option<String>,
    pub status: CallStatus,
    pub notes: Option<String>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub called_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCallAttemptRequest {
    pub crop_id: Option<String>,
    pub user_id: Option<String>,
    pub status: CallStatus,
    pub notes: Option<String>,
}

impl CreateCallAttemptRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.crop_id.is_none() && self.user_id.is_none() {
            return Err(ApiError::ValidationError(
                "Call attempt must reference a crop or a user".to_string(),
            ));
        }
        Ok(())
    }

    pub fn into_attempt(self) -> CallAttempt {
        CallAttempt {
            id: None,
            crop_id: self.crop_id,
            user_id: self.user_id,
            status: self.status,
            notes: self.notes,
            called_at: Utc::now(),
        }
    }
}
