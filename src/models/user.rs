use serde::{Deserialize, Serialize};
use mongodb::bson::{self, oid::ObjectId};
use chrono::{DateTime, Utc};

/// Account class carried on every user document.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    #[serde(rename = "BUYER")]
    Buyer,
    #[serde(rename = "FARMER")]
    Farmer,
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Identity::Buyer => write!(f, "BUYER"),
            Identity::Farmer => write!(f, "FARMER"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub identity: Identity,
    #[serde(default)] // old records predate verification
    pub is_verified: bool,
    #[serde(default)]
    pub preferred_crops: Vec<String>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub is_verified: Option<bool>,
    pub preferred_crops: Option<Vec<String>>,
}
