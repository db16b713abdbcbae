use serde::{Deserialize, Serialize};
use mongodb::bson::{self, oid::ObjectId};
use chrono::{DateTime, Utc};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum QcStatus {
    #[serde(rename = "requested")]
    Requested,
    #[serde(rename = "scheduled")]
    Scheduled,
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "rejected")]
    Rejected,
}

impl std::fmt::Display for QcStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QcStatus::Requested => write!(f, "requested"),
            QcStatus::Scheduled => write!(f, "scheduled"),
            QcStatus::Completed => write!(f, "completed"),
            QcStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Quality-control inspection request for a farm's produce.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct QcRequest {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub crop_id: Option<String>,
    pub status: QcStatus,
    pub notes: Option<String>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub requested_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateQcRequest {
    pub status: QcStatus,
    pub notes: Option<String>,
}
