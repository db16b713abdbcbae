pub mod farm_handlers;
pub mod user_handlers;
pub mod reservation_handlers;
pub mod call_log_handlers;
pub mod reminder_handlers;
pub mod quote_handlers;
pub mod market_price_handlers;
pub mod qc_handlers;

use mongodb::bson::oid::ObjectId;
use serde::Serialize;

use crate::models::ApiError;
use crate::utils::timeframe::{DateRange, Timeframe};

/// Grid payload. `count` lets the UI tell "0 matched" apart from a failure,
/// which renders as an error response instead.
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub count: usize,
    pub rows: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn new(rows: Vec<T>) -> Self {
        Self {
            count: rows.len(),
            rows,
        }
    }
}

pub fn parse_object_id(id: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(id)
        .map_err(|_| ApiError::ValidationError(format!("Invalid document id: {}", id)))
}

/// Timestamped grids must name a timeframe; listing everything takes the
/// explicit `all` token rather than falling through to an unfiltered scan.
pub fn required_range(timeframe: &Option<String>) -> Result<Option<DateRange>, ApiError> {
    let token = timeframe.as_deref().ok_or_else(|| {
        ApiError::ValidationError(
            "timeframe is required (today, tomorrow, thisWeek, lastWeek or all)".to_string(),
        )
    })?;
    Ok(token.parse::<Timeframe>()?.resolve(chrono::Utc::now()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_timeframe_is_rejected() {
        assert!(required_range(&None).is_err());
    }

    #[test]
    fn explicit_all_is_the_only_unfiltered_path() {
        let range = required_range(&Some("all".to_string())).unwrap();
        assert!(range.is_none());
        let range = required_range(&Some("today".to_string())).unwrap();
        assert!(range.is_some());
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(required_range(&Some("fortnight".to_string())).is_err());
    }

    #[test]
    fn bad_object_id_is_a_validation_error() {
        assert!(matches!(
            parse_object_id("not-an-oid"),
            Err(ApiError::ValidationError(_))
        ));
    }
}
