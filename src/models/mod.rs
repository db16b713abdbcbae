mod error;
pub mod crop;
pub mod user;
pub mod reservation;
pub mod call_attempt;
pub mod reminder;
pub mod quote;
pub mod market_price;
pub mod qc_request;
mod session;

pub use error::{ApiError, ErrorResponse};
pub use crop::{Crop, CreateCropRequest, UpdateCropRequest};
pub use user::{User, Identity, UpdateUserRequest};
pub use reservation::{Reservation, ReservationStatus, UpdateReservationRequest};
pub use call_attempt::{CallAttempt, CallStatus, CreateCallAttemptRequest};
pub use reminder::{Reminder, ReminderStatus, CreateReminderRequest};
pub use quote::{BuyerCropQuote, CreateQuoteRequest};
pub use market_price::{MarketPriceEntry, CropPrice, SubmitMarketPricesRequest};
pub use qc_request::{QcRequest, QcStatus, UpdateQcRequest};
pub use session::SessionContext;

/// BSON-native serialization for optional timestamps, so range filters
/// compare against real BSON dates instead of RFC3339 strings.
pub mod option_datetime_as_bson {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use chrono::{DateTime, Utc};
    use mongodb::bson;

    pub fn serialize<S>(
        date: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(dt) => bson::DateTime::from_chrono(*dt).serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let opt: Option<bson::DateTime> = Option::deserialize(deserializer)?;
        Ok(opt.map(|dt| dt.to_chrono()))
    }
}
