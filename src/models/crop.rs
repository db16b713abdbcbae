use serde::{Deserialize, Serialize};
use mongodb::bson::{self, oid::ObjectId};
use chrono::{DateTime, Utc};

use crate::models::ApiError;
use crate::models::option_datetime_as_bson;

/// One document per farm: farmer identity, crop flags and harvest-cycle
/// numbers. Created through onboarding, mutated through the update form,
/// never hard-deleted.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Crop {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub farm_id: String,
    pub farmer_name: String,
    pub farmer_phone: String,
    pub village: Option<String>,
    pub district: Option<String>,
    #[serde(default)]
    pub grows_onion: bool,
    #[serde(default)]
    pub grows_potato: bool,
    #[serde(default)]
    pub grows_tomato: bool,
    #[serde(default)]
    pub grows_banana: bool,
    pub acreage: f64,
    pub expected_yield_quintals: f64,
    pub harvest_cycle_days: i32,
    #[serde(skip_serializing_if = "Option::is_none", with = "option_datetime_as_bson", default)]
    pub last_harvest_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub crops_available: Vec<String>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none", with = "option_datetime_as_bson", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCropRequest {
    pub farm_id: String,
    pub farmer_name: String,
    pub farmer_phone: String,
    pub village: Option<String>,
    pub district: Option<String>,
    #[serde(default)]
    pub grows_onion: bool,
    #[serde(default)]
    pub grows_potato: bool,
    #[serde(default)]
    pub grows_tomato: bool,
    #[serde(default)]
    pub grows_banana: bool,
    pub acreage: f64,
    pub expected_yield_quintals: f64,
    pub harvest_cycle_days: i32,
    #[serde(default)]
    pub crops_available: Vec<String>,
}

impl CreateCropRequest {
    /// Form-boundary validation; nothing reaches the store without passing.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.farm_id.trim().is_empty() {
            return Err(ApiError::ValidationError("Farm id cannot be empty".to_string()));
        }
        if self.farmer_name.trim().is_empty() {
            return Err(ApiError::ValidationError("Farmer name cannot be empty".to_string()));
        }
        if self.farmer_phone.trim().is_empty() {
            return Err(ApiError::ValidationError("Farmer phone cannot be empty".to_string()));
        }
        if self.acreage <= 0.0 {
            return Err(ApiError::ValidationError("Acreage must be positive".to_string()));
        }
        if self.expected_yield_quintals < 0.0 {
            return Err(ApiError::ValidationError("Expected yield cannot be negative".to_string()));
        }
        if self.harvest_cycle_days <= 0 {
            return Err(ApiError::ValidationError("Harvest cycle must be positive".to_string()));
        }
        Ok(())
    }

    pub fn into_crop(self) -> Crop {
        Crop {
            id: None,
            farm_id: self.farm_id,
            farmer_name: self.farmer_name,
            farmer_phone: self.farmer_phone,
            village: self.village,
            district: self.district,
            grows_onion: self.grows_onion,
            grows_potato: self.grows_potato,
            grows_tomato: self.grows_tomato,
            grows_banana: self.grows_banana,
            acreage: self.acreage,
            expected_yield_quintals: self.expected_yield_quintals,
            harvest_cycle_days: self.harvest_cycle_days,
            last_harvest_at: None,
            crops_available: self.crops_available,
            created_at: Utc::now(),
            updated_at: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateCropRequest {
    pub farmer_name: Option<String>,
    pub farmer_phone: Option<String>,
    pub village: Option<String>,
    pub district: Option<String>,
    pub grows_onion: Option<bool>,
    pub grows_potato: Option<bool>,
    pub grows_tomato: Option<bool>,
    pub grows_banana: Option<bool>,
    pub acreage: Option<f64>,
    pub expected_yield_quintals: Option<f64>,
    pub harvest_cycle_days: Option<i32>,
    pub last_harvest_at: Option<DateTime<Utc>>,
    pub crops_available: Option<Vec<String>>,
}

impl UpdateCropRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(name) = &self.farmer_name {
            if name.trim().is_empty() {
                return Err(ApiError::ValidationError("Farmer name cannot be empty".to_string()));
            }
        }
        if let Some(acreage) = self.acreage {
            if acreage <= 0.0 {
                return Err(ApiError::ValidationError("Acreage must be positive".to_string()));
            }
        }
        if let Some(cycle) = self.harvest_cycle_days {
            if cycle <= 0 {
                return Err(ApiError::ValidationError("Harvest cycle must be positive".to_string()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreateCropRequest {
        CreateCropRequest {
            farm_id: "FARM-042".to_string(),
            farmer_name: "Ramesh Patil".to_string(),
            farmer_phone: "9876543210".to_string(),
            village: Some("Lasalgaon".to_string()),
            district: Some("Nashik".to_string()),
            grows_onion: true,
            grows_potato: false,
            grows_tomato: false,
            grows_banana: false,
            acreage: 2.5,
            expected_yield_quintals: 80.0,
            harvest_cycle_days: 120,
            crops_available: vec!["onion".to_string()],
        }
    }

    #[test]
    fn valid_request_passes() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn empty_farm_id_rejected() {
        let mut req = valid_request();
        req.farm_id = "  ".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn non_positive_acreage_rejected() {
        let mut req = valid_request();
        req.acreage = 0.0;
        assert!(req.validate().is_err());
    }

    #[test]
    fn into_crop_carries_fields_and_stamps_created_at() {
        let crop = valid_request().into_crop();
        assert_eq!(crop.farm_id, "FARM-042");
        assert!(crop.id.is_none());
        assert!(crop.updated_at.is_none());
        assert!(crop.grows_onion);
    }
}
