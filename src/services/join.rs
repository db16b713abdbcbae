use futures::future;
use serde::Serialize;

use crate::models::{ApiError, BuyerCropQuote, CallAttempt, Crop, QcRequest, Reminder, Reservation, User};

/// Foreign keys a grid record may carry. A key that is absent, malformed or
/// pointing at a deleted document joins as `None`; only genuine store
/// failures are errors.
pub trait JoinKeys {
    fn crop_id(&self) -> Option<&str> {
        None
    }
    fn user_id(&self) -> Option<&str> {
        None
    }
    fn buyer_id(&self) -> Option<&str> {
        None
    }
}

/// Point lookups backing the join. Implemented by the Mongo service and by
/// an in-memory fixture in tests.
pub trait RelatedSource {
    async fn crop_by_id(&self, id: &str) -> Result<Option<Crop>, ApiError>;
    async fn user_by_id(&self, id: &str) -> Result<Option<User>, ApiError>;
}

/// A base record with its relations attached. Relations serialize as
/// explicit `null` when missing, never as an absent key.
#[derive(Debug, Serialize)]
pub struct Joined<T> {
    #[serde(flatten)]
    pub record: T,
    pub crop: Option<Crop>,
    pub user: Option<User>,
    pub buyer: Option<User>,
}

/// Attach related documents to every record. Lookups for different records
/// run concurrently; output order and length always match the input. Any
/// store error fails the whole batch so a partially-joined grid is never
/// rendered.
pub async fn join_related<S, T>(source: &S, records: Vec<T>) -> Result<Vec<Joined<T>>, ApiError>
where
    S: RelatedSource,
    T: JoinKeys,
{
    let relations = future::try_join_all(records.iter().map(|record| async move {
        future::try_join3(
            lookup_crop(source, record.crop_id()),
            lookup_user(source, record.user_id()),
            lookup_user(source, record.buyer_id()),
        )
        .await
    }))
    .await?;

    Ok(records
        .into_iter()
        .zip(relations)
        .map(|(record, (crop, user, buyer))| Joined {
            record,
            crop,
            user,
            buyer,
        })
        .collect())
}

async fn lookup_crop<S: RelatedSource>(source: &S, id: Option<&str>) -> Result<Option<Crop>, ApiError> {
    match id {
        Some(id) => source.crop_by_id(id).await,
        None => Ok(None),
    }
}

async fn lookup_user<S: RelatedSource>(source: &S, id: Option<&str>) -> Result<Option<User>, ApiError> {
    match id {
        Some(id) => source.user_by_id(id).await,
        None => Ok(None),
    }
}

impl JoinKeys for Reservation {
    fn crop_id(&self) -> Option<&str> {
        self.crop_id.as_deref()
    }
    fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }
}

impl JoinKeys for CallAttempt {
    fn crop_id(&self) -> Option<&str> {
        self.crop_id.as_deref()
    }
    fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }
}

impl JoinKeys for Reminder {
    fn crop_id(&self) -> Option<&str> {
        self.crop_id.as_deref()
    }
    fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }
}

impl JoinKeys for BuyerCropQuote {
    fn buyer_id(&self) -> Option<&str> {
        self.buyer_id.as_deref()
    }
}

impl JoinKeys for QcRequest {
    fn crop_id(&self) -> Option<&str> {
        self.crop_id.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Identity, ReservationStatus};
    use chrono::Utc;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemorySource {
        crops: HashMap<String, Crop>,
        users: HashMap<String, User>,
        broken: bool,
    }

    impl RelatedSource for MemorySource {
        async fn crop_by_id(&self, id: &str) -> Result<Option<Crop>, ApiError> {
            if self.broken {
                return Err(ApiError::InternalError("store unavailable".to_string()));
            }
            Ok(self.crops.get(id).cloned())
        }

        async fn user_by_id(&self, id: &str) -> Result<Option<User>, ApiError> {
            if self.broken {
                return Err(ApiError::InternalError("store unavailable".to_string()));
            }
            Ok(self.users.get(id).cloned())
        }
    }

    fn crop(farm_id: &str) -> Crop {
        Crop {
            id: None,
            farm_id: farm_id.to_string(),
            farmer_name: "Ramesh Patil".to_string(),
            farmer_phone: "9876543210".to_string(),
            village: None,
            district: Some("Nashik".to_string()),
            grows_onion: true,
            grows_potato: false,
            grows_tomato: false,
            grows_banana: false,
            acreage: 2.0,
            expected_yield_quintals: 60.0,
            harvest_cycle_days: 120,
            last_harvest_at: None,
            crops_available: vec!["onion".to_string()],
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn user(name: &str) -> User {
        User {
            id: None,
            name: name.to_string(),
            phone: "9000000000".to_string(),
            email: None,
            identity: Identity::Buyer,
            is_verified: true,
            preferred_crops: vec![],
            created_at: Utc::now(),
        }
    }

    fn reservation(crop_id: Option<&str>, user_id: Option<&str>) -> Reservation {
        Reservation {
            id: None,
            crop_id: crop_id.map(str::to_string),
            user_id: user_id.map(str::to_string),
            crop_name: "onion".to_string(),
            quantity_quintals: 10.0,
            status: ReservationStatus::Pending,
            reserved_at: Utc::now(),
        }
    }

    fn populated_source() -> MemorySource {
        let mut source = MemorySource::default();
        source.crops.insert("c1".to_string(), crop("FARM-1"));
        source.crops.insert("c2".to_string(), crop("FARM-2"));
        source.users.insert("u1".to_string(), user("Anita"));
        source.users.insert("u2".to_string(), user("Vikram"));
        source
    }

    #[tokio::test]
    async fn absent_keys_join_as_none() {
        let source = populated_source();
        let joined = join_related(&source, vec![reservation(None, None)])
            .await
            .unwrap();
        assert_eq!(joined.len(), 1);
        assert!(joined[0].crop.is_none());
        assert!(joined[0].user.is_none());
        assert!(joined[0].buyer.is_none());
    }

    #[tokio::test]
    async fn dangling_keys_join_as_none_not_error() {
        let source = populated_source();
        let joined = join_related(&source, vec![reservation(Some("deleted"), Some("u1"))])
            .await
            .unwrap();
        assert!(joined[0].crop.is_none());
        assert_eq!(joined[0].user.as_ref().unwrap().name, "Anita");
    }

    #[tokio::test]
    async fn output_matches_input_length_and_order() {
        let source = populated_source();
        let records = vec![
            reservation(Some("c2"), Some("u2")),
            reservation(Some("c1"), Some("u1")),
            reservation(None, Some("u2")),
            reservation(Some("c1"), None),
        ];
        let joined = join_related(&source, records).await.unwrap();
        assert_eq!(joined.len(), 4);
        assert_eq!(joined[0].record.crop_id.as_deref(), Some("c2"));
        assert_eq!(joined[1].record.crop_id.as_deref(), Some("c1"));
        assert!(joined[2].record.crop_id.is_none());
        assert_eq!(joined[3].record.crop_id.as_deref(), Some("c1"));
        assert_eq!(joined[1].user.as_ref().unwrap().name, "Anita");
        assert_eq!(joined[2].user.as_ref().unwrap().name, "Vikram");
    }

    #[tokio::test]
    async fn three_reservations_one_deleted_crop() {
        let source = populated_source();
        let records = vec![
            reservation(Some("c1"), Some("u1")),
            reservation(Some("c2"), Some("u2")),
            reservation(Some("gone"), Some("u1")),
        ];
        let joined = join_related(&source, records).await.unwrap();
        assert_eq!(joined.len(), 3);
        assert!(joined[0].crop.is_some());
        assert!(joined[1].crop.is_some());
        assert!(joined[2].crop.is_none());
        assert!(joined[2].user.is_some());
    }

    #[tokio::test]
    async fn store_failure_fails_the_whole_batch() {
        let mut source = populated_source();
        source.broken = true;
        let result = join_related(&source, vec![reservation(Some("c1"), None)]).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn missing_relations_serialize_as_explicit_null() {
        let source = populated_source();
        let joined = join_related(&source, vec![reservation(None, None)])
            .await
            .unwrap();
        let value = serde_json::to_value(&joined[0]).unwrap();
        let object = value.as_object().unwrap();
        assert!(object.contains_key("crop"));
        assert!(object.contains_key("user"));
        assert!(object.contains_key("buyer"));
        assert!(object["crop"].is_null());
        assert!(object["user"].is_null());
        assert!(object["buyer"].is_null());
    }
}
