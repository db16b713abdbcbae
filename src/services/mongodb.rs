use mongodb::{Client, Collection};
use mongodb::bson::{self, doc, oid::ObjectId};
use mongodb::options::{ClientOptions, FindOneAndUpdateOptions, IndexOptions, ReturnDocument, ServerApi, ServerApiVersion};
use mongodb::IndexModel;
use chrono::Utc;

use crate::config::Config;
use crate::models::{
    ApiError, BuyerCropQuote, CallAttempt, Crop, MarketPriceEntry, QcRequest, QcStatus,
    Reminder, Reservation, ReservationStatus, SubmitMarketPricesRequest, UpdateCropRequest,
    UpdateUserRequest, User,
};
use crate::services::join::RelatedSource;
use crate::services::query::RangeQuery;

#[derive(Clone)]
pub struct MongoDBService {
    crops: Collection<Crop>,
    users: Collection<User>,
    reservations: Collection<Reservation>,
    call_attempts: Collection<CallAttempt>,
    reminders: Collection<Reminder>,
    quotes: Collection<BuyerCropQuote>,
    market_prices: Collection<MarketPriceEntry>,
    qc_requests: Collection<QcRequest>,
}

impl MongoDBService {
    pub async fn init(config: &Config) -> Result<Self, mongodb::error::Error> {
        let mut client_options = ClientOptions::parse(&config.mongodb_uri).await?;

        let server_api = ServerApi::builder()
            .version(ServerApiVersion::V1)
            .strict(true)
            .deprecation_errors(true)
            .build();
        client_options.server_api = Some(server_api);
        client_options.connect_timeout = Some(std::time::Duration::from_secs(10));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;

        // Test connection
        client
            .database("admin")
            .run_command(doc! {"ping": 1}, None)
            .await?;

        log::info!("Successfully connected to MongoDB");

        let db = client.database(&config.database);
        let crops = db.collection("crops");
        let users = db.collection("users");
        let reservations = db.collection("reservations");
        let call_attempts = db.collection("call_attempts");
        let reminders = db.collection("reminders");
        let quotes = db.collection("buyer-crop-quotes");
        let market_prices = db.collection::<MarketPriceEntry>("market-prices");
        let qc_requests = db.collection("qc_requests");

        // One farm record per farm id
        let options = IndexOptions::builder().unique(true).build();
        let farm_model = IndexModel::builder()
            .keys(doc! { "farm_id": 1 })
            .options(options)
            .build();
        crops.create_index(farm_model, None).await?;

        // The daily-singleton invariant lives here: at most one market price
        // entry per calendar date, enforced by the store.
        let price_date_options = IndexOptions::builder().unique(true).build();
        let price_date_model = IndexModel::builder()
            .keys(doc! { "price_date": 1 })
            .options(price_date_options)
            .build();
        market_prices.create_index(price_date_model, None).await?;

        let identity_model = IndexModel::builder()
            .keys(doc! { "identity": 1 })
            .build();
        users.create_index(identity_model, None).await?;

        // Range-filter fields used by the grid views
        reservations
            .create_index(IndexModel::builder().keys(doc! { "reserved_at": 1 }).build(), None)
            .await?;
        call_attempts
            .create_index(IndexModel::builder().keys(doc! { "called_at": 1 }).build(), None)
            .await?;
        reminders
            .create_index(IndexModel::builder().keys(doc! { "remind_at": 1 }).build(), None)
            .await?;
        quotes
            .create_index(IndexModel::builder().keys(doc! { "quoted_at": 1 }).build(), None)
            .await?;
        qc_requests
            .create_index(IndexModel::builder().keys(doc! { "requested_at": 1 }).build(), None)
            .await?;

        Ok(Self {
            crops,
            users,
            reservations,
            call_attempts,
            reminders,
            quotes,
            market_prices,
            qc_requests,
        })
    }

    // Crop (farm) operations

    pub async fn create_crop(&self, crop: Crop) -> Result<Crop, ApiError> {
        if let Some(_) = self
            .crops
            .find_one(doc! { "farm_id": &crop.farm_id }, None)
            .await
            .map_err(ApiError::DatabaseError)?
        {
            return Err(ApiError::DuplicateEntry(format!(
                "Farm {} is already onboarded",
                crop.farm_id
            )));
        }

        self.crops
            .insert_one(crop.clone(), None)
            .await
            .map_err(ApiError::DatabaseError)?;

        Ok(crop)
    }

    pub async fn find_crops(&self, query: RangeQuery) -> Result<Vec<Crop>, ApiError> {
        query.fetch(&self.crops).await
    }

    pub async fn update_crop(&self, id: &ObjectId, update: UpdateCropRequest) -> Result<Crop, ApiError> {
        let mut update_doc = doc! {};

        if let Some(farmer_name) = update.farmer_name {
            update_doc.insert("farmer_name", farmer_name);
        }
        if let Some(farmer_phone) = update.farmer_phone {
            update_doc.insert("farmer_phone", farmer_phone);
        }
        if let Some(village) = update.village {
            update_doc.insert("village", village);
        }
        if let Some(district) = update.district {
            update_doc.insert("district", district);
        }
        if let Some(grows_onion) = update.grows_onion {
            update_doc.insert("grows_onion", grows_onion);
        }
        if let Some(grows_potato) = update.grows_potato {
            update_doc.insert("grows_potato", grows_potato);
        }
        if let Some(grows_tomato) = update.grows_tomato {
            update_doc.insert("grows_tomato", grows_tomato);
        }
        if let Some(grows_banana) = update.grows_banana {
            update_doc.insert("grows_banana", grows_banana);
        }
        if let Some(acreage) = update.acreage {
            update_doc.insert("acreage", acreage);
        }
        if let Some(expected_yield_quintals) = update.expected_yield_quintals {
            update_doc.insert("expected_yield_quintals", expected_yield_quintals);
        }
        if let Some(harvest_cycle_days) = update.harvest_cycle_days {
            update_doc.insert("harvest_cycle_days", harvest_cycle_days);
        }
        if let Some(last_harvest_at) = update.last_harvest_at {
            update_doc.insert("last_harvest_at", bson::DateTime::from_chrono(last_harvest_at));
        }
        if let Some(crops_available) = update.crops_available {
            update_doc.insert("crops_available", crops_available);
        }

        if update_doc.is_empty() {
            return Err(ApiError::ValidationError("No fields to update".to_string()));
        }
        update_doc.insert("updated_at", bson::DateTime::from_chrono(Utc::now()));

        self.crops
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$set": update_doc },
                Some(
                    FindOneAndUpdateOptions::builder()
                        .return_document(ReturnDocument::After)
                        .build(),
                ),
            )
            .await
            .map_err(ApiError::DatabaseError)?
            .ok_or_else(|| ApiError::NotFound(format!("Crop {} not found", id)))
    }

    // User operations

    pub async fn find_users(&self, query: RangeQuery) -> Result<Vec<User>, ApiError> {
        query.fetch(&self.users).await
    }

    pub async fn update_user(&self, id: &ObjectId, update: UpdateUserRequest) -> Result<User, ApiError> {
        let mut update_doc = doc! {};

        if let Some(name) = update.name {
            if name.trim().is_empty() {
                return Err(ApiError::ValidationError("Name cannot be empty".to_string()));
            }
            update_doc.insert("name", name);
        }
        if let Some(phone) = update.phone {
            update_doc.insert("phone", phone);
        }
        if let Some(email) = update.email {
            update_doc.insert("email", email);
        }
        if let Some(is_verified) = update.is_verified {
            update_doc.insert("is_verified", is_verified);
        }
        if let Some(preferred_crops) = update.preferred_crops {
            update_doc.insert("preferred_crops", preferred_crops);
        }

        if update_doc.is_empty() {
            return Err(ApiError::ValidationError("No fields to update".to_string()));
        }

        self.users
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$set": update_doc },
                Some(
                    FindOneAndUpdateOptions::builder()
                        .return_document(ReturnDocument::After)
                        .build(),
                ),
            )
            .await
            .map_err(ApiError::DatabaseError)?
            .ok_or_else(|| ApiError::NotFound(format!("User {} not found", id)))
    }

    // Reservation operations

    pub async fn find_reservations(&self, query: RangeQuery) -> Result<Vec<Reservation>, ApiError> {
        query.fetch(&self.reservations).await
    }

    pub async fn update_reservation_status(
        &self,
        id: &ObjectId,
        status: ReservationStatus,
    ) -> Result<Reservation, ApiError> {
        self.reservations
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$set": { "status": status.to_string() } },
                Some(
                    FindOneAndUpdateOptions::builder()
                        .return_document(ReturnDocument::After)
                        .build(),
                ),
            )
            .await
            .map_err(ApiError::DatabaseError)?
            .ok_or_else(|| ApiError::NotFound(format!("Reservation {} not found", id)))
    }

    // Call attempt operations

    pub async fn create_call_attempt(&self, attempt: CallAttempt) -> Result<CallAttempt, ApiError> {
        self.call_attempts
            .insert_one(attempt.clone(), None)
            .await
            .map_err(ApiError::DatabaseError)?;
        Ok(attempt)
    }

    pub async fn find_call_attempts(&self, query: RangeQuery) -> Result<Vec<CallAttempt>, ApiError> {
        query.fetch(&self.call_attempts).await
    }

    // Reminder operations

    pub async fn create_reminder(&self, reminder: Reminder) -> Result<Reminder, ApiError> {
        self.reminders
            .insert_one(reminder.clone(), None)
            .await
            .map_err(ApiError::DatabaseError)?;
        Ok(reminder)
    }

    pub async fn find_reminders(&self, query: RangeQuery) -> Result<Vec<Reminder>, ApiError> {
        query.fetch(&self.reminders).await
    }

    // Buyer quote operations

    pub async fn create_quote(&self, quote: BuyerCropQuote) -> Result<BuyerCropQuote, ApiError> {
        self.quotes
            .insert_one(quote.clone(), None)
            .await
            .map_err(ApiError::DatabaseError)?;
        Ok(quote)
    }

    pub async fn find_quotes(&self, query: RangeQuery) -> Result<Vec<BuyerCropQuote>, ApiError> {
        query.fetch(&self.quotes).await
    }

    // QC request operations

    pub async fn find_qc_requests(&self, query: RangeQuery) -> Result<Vec<QcRequest>, ApiError> {
        query.fetch(&self.qc_requests).await
    }

    pub async fn update_qc_status(
        &self,
        id: &ObjectId,
        status: QcStatus,
        notes: Option<String>,
    ) -> Result<QcRequest, ApiError> {
        let mut update_doc = doc! { "status": status.to_string() };
        if let Some(notes) = notes {
            update_doc.insert("notes", notes);
        }

        self.qc_requests
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$set": update_doc },
                Some(
                    FindOneAndUpdateOptions::builder()
                        .return_document(ReturnDocument::After)
                        .build(),
                ),
            )
            .await
            .map_err(ApiError::DatabaseError)?
            .ok_or_else(|| ApiError::NotFound(format!("QC request {} not found", id)))
    }

    // Market price operations

    pub async fn find_market_prices(&self, query: RangeQuery) -> Result<Vec<MarketPriceEntry>, ApiError> {
        query.fetch(&self.market_prices).await
    }

    pub async fn get_market_prices_for_day(&self, price_date: &str) -> Result<Option<MarketPriceEntry>, ApiError> {
        self.market_prices
            .find_one(doc! { "price_date": price_date }, None)
            .await
            .map_err(ApiError::DatabaseError)
    }

    /// Upsert keyed on the deterministic date key. The first submit of a day
    /// creates the document, every later submit updates it in place; the
    /// unique index makes a duplicate impossible even under concurrent
    /// submitters.
    pub async fn upsert_market_prices(
        &self,
        price_date: &str,
        prices: SubmitMarketPricesRequest,
        submitted_by: &str,
    ) -> Result<MarketPriceEntry, ApiError> {
        let now = bson::DateTime::from_chrono(Utc::now());
        let update = doc! {
            "$set": {
                "onion": bson::to_bson(&prices.onion)
                    .map_err(|e| ApiError::InternalError(format!("Failed to serialize prices: {}", e)))?,
                "potato": bson::to_bson(&prices.potato)
                    .map_err(|e| ApiError::InternalError(format!("Failed to serialize prices: {}", e)))?,
                "tomato": bson::to_bson(&prices.tomato)
                    .map_err(|e| ApiError::InternalError(format!("Failed to serialize prices: {}", e)))?,
                "banana": bson::to_bson(&prices.banana)
                    .map_err(|e| ApiError::InternalError(format!("Failed to serialize prices: {}", e)))?,
                "submitted_by": submitted_by,
                "updated_at": now,
            },
            "$setOnInsert": {
                "price_date": price_date,
                "created_at": now,
            }
        };

        self.market_prices
            .find_one_and_update(
                doc! { "price_date": price_date },
                update,
                Some(
                    FindOneAndUpdateOptions::builder()
                        .upsert(true)
                        .return_document(ReturnDocument::After)
                        .build(),
                ),
            )
            .await
            .map_err(ApiError::DatabaseError)?
            .ok_or_else(|| {
                ApiError::InternalError("Upsert returned no market price document".to_string())
            })
    }
}

impl RelatedSource for MongoDBService {
    async fn crop_by_id(&self, id: &str) -> Result<Option<Crop>, ApiError> {
        // A malformed foreign key joins like a dangling one
        let oid = match ObjectId::parse_str(id) {
            Ok(oid) => oid,
            Err(_) => return Ok(None),
        };
        self.crops
            .find_one(doc! { "_id": oid }, None)
            .await
            .map_err(ApiError::DatabaseError)
    }

    async fn user_by_id(&self, id: &str) -> Result<Option<User>, ApiError> {
        let oid = match ObjectId::parse_str(id) {
            Ok(oid) => oid,
            Err(_) => return Ok(None),
        };
        self.users
            .find_one(doc! { "_id": oid }, None)
            .await
            .map_err(ApiError::DatabaseError)
    }
}
