use serde::{Deserialize, Serialize};
use mongodb::bson::{self, oid::ObjectId};
use chrono::{DateTime, Utc};

use crate::models::ApiError;

/// Price a buyer is willing to pay for a crop/variety, per quintal.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BuyerCropQuote {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub buyer_id: Option<String>,
    pub crop_name: String,
    pub variety: String,
    pub price_per_quintal: f64,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub quoted_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateQuoteRequest {
    pub buyer_id: Option<String>,
    pub crop_name: String,
    pub variety: String,
    pub price_per_quintal: f64,
}

impl CreateQuoteRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.crop_name.trim().is_empty() {
            return Err(ApiError::ValidationError("Crop name cannot be empty".to_string()));
        }
        if self.variety.trim().is_empty() {
            return Err(ApiError::ValidationError("Variety cannot be empty".to_string()));
        }
        if self.price_per_quintal <= 0.0 {
            return Err(ApiError::ValidationError("Quoted price must be positive".to_string()));
        }
        Ok(())
    }

    pub fn into_quote(self) -> BuyerCropQuote {
        BuyerCropQuote {
            id: None,
            buyer_id: self.buyer_id,
            crop_name: self.crop_name,
            variety: self.variety,
            price_per_quintal: self.price_per_quintal,
            quoted_at: Utc::now(),
        }
    }
}
