use serde::{Deserialize, Serialize};
use mongodb::bson::{self, oid::ObjectId};
use chrono::{DateTime, Utc};

use crate::models::ApiError;
use crate::utils::timeframe::ist;

/// Per-grade price points for one crop category on one day.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CropPrice {
    pub grade: String,
    pub min_price: f64,
    pub max_price: f64,
    pub modal_price: f64,
}

/// Daily market-price aggregate. Exactly one document per calendar day:
/// `price_date` is derived from the date and sits under a unique index, and
/// submits are upserts keyed on it, so concurrent submitters cannot create
/// a second entry for the same day.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MarketPriceEntry {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub price_date: String,
    #[serde(default)]
    pub onion: Vec<CropPrice>,
    #[serde(default)]
    pub potato: Vec<CropPrice>,
    #[serde(default)]
    pub tomato: Vec<CropPrice>,
    #[serde(default)]
    pub banana: Vec<CropPrice>,
    pub submitted_by: Option<String>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// Deterministic daily-singleton key: the calendar date in IST.
pub fn price_date_key(now: DateTime<Utc>) -> String {
    now.with_timezone(&ist()).format("%Y-%m-%d").to_string()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitMarketPricesRequest {
    #[serde(default)]
    pub onion: Vec<CropPrice>,
    #[serde(default)]
    pub potato: Vec<CropPrice>,
    #[serde(default)]
    pub tomato: Vec<CropPrice>,
    #[serde(default)]
    pub banana: Vec<CropPrice>,
}

impl SubmitMarketPricesRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let all = [&self.onion, &self.potato, &self.tomato, &self.banana];
        if all.iter().all(|prices| prices.is_empty()) {
            return Err(ApiError::ValidationError(
                "At least one crop category must carry prices".to_string(),
            ));
        }
        for price in all.into_iter().flatten() {
            if price.grade.trim().is_empty() {
                return Err(ApiError::ValidationError("Price grade cannot be empty".to_string()));
            }
            if price.min_price < 0.0 || price.max_price < 0.0 || price.modal_price < 0.0 {
                return Err(ApiError::ValidationError("Prices cannot be negative".to_string()));
            }
            if price.min_price > price.max_price {
                return Err(ApiError::ValidationError(
                    "Minimum price cannot exceed maximum price".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn price(grade: &str, min: f64, max: f64, modal: f64) -> CropPrice {
        CropPrice {
            grade: grade.to_string(),
            min_price: min,
            max_price: max,
            modal_price: modal,
        }
    }

    #[test]
    fn same_day_submits_share_one_key() {
        let morning = Utc.with_ymd_and_hms(2024, 6, 3, 4, 0, 0).unwrap();
        let evening = Utc.with_ymd_and_hms(2024, 6, 3, 16, 30, 0).unwrap();
        assert_eq!(price_date_key(morning), price_date_key(evening));
        assert_eq!(price_date_key(morning), "2024-06-03");
    }

    #[test]
    fn key_follows_ist_day_boundary() {
        // 20:00 UTC is already 01:30 the next day in IST
        let late_utc = Utc.with_ymd_and_hms(2024, 6, 3, 20, 0, 0).unwrap();
        assert_eq!(price_date_key(late_utc), "2024-06-04");
    }

    #[test]
    fn all_empty_categories_rejected() {
        let req = SubmitMarketPricesRequest {
            onion: vec![],
            potato: vec![],
            tomato: vec![],
            banana: vec![],
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn negative_price_rejected() {
        let req = SubmitMarketPricesRequest {
            onion: vec![price("A", -1.0, 100.0, 50.0)],
            potato: vec![],
            tomato: vec![],
            banana: vec![],
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn inverted_min_max_rejected() {
        let req = SubmitMarketPricesRequest {
            onion: vec![price("A", 200.0, 100.0, 150.0)],
            potato: vec![],
            tomato: vec![],
            banana: vec![],
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn single_category_accepted() {
        let req = SubmitMarketPricesRequest {
            onion: vec![price("A", 900.0, 1400.0, 1200.0)],
            potato: vec![],
            tomato: vec![],
            banana: vec![],
        };
        assert!(req.validate().is_ok());
    }
}
