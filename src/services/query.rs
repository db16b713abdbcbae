use futures_util::TryStreamExt;
use mongodb::bson::{self, doc, Bson, Document};
use mongodb::Collection;
use serde::de::DeserializeOwned;

use crate::models::ApiError;
use crate::utils::timeframe::DateRange;

/// Builds the filter for one grid view: an optional inclusive timestamp
/// range plus equality predicates, against a single collection. A `None`
/// range adds no temporal clause; whether that is allowed is decided by the
/// timeframe parser upstream, never silently here.
#[derive(Debug, Default)]
pub struct RangeQuery {
    filter: Document,
}

impl RangeQuery {
    pub fn new() -> Self {
        Self {
            filter: Document::new(),
        }
    }

    pub fn time_range(mut self, field: &str, range: Option<&DateRange>) -> Self {
        if let Some(range) = range {
            self.filter.insert(
                field,
                doc! {
                    "$gte": bson::DateTime::from_chrono(range.start),
                    "$lte": bson::DateTime::from_chrono(range.end),
                },
            );
        }
        self
    }

    pub fn eq(mut self, field: &str, value: impl Into<Bson>) -> Self {
        self.filter.insert(field, value.into());
        self
    }

    pub fn eq_opt(mut self, field: &str, value: Option<impl Into<Bson>>) -> Self {
        if let Some(value) = value {
            self.filter.insert(field, value.into());
        }
        self
    }

    pub fn into_filter(self) -> Document {
        self.filter
    }

    /// Execute the read, preserving the store's result order. Store
    /// unavailability propagates as a database error, never an empty list.
    pub async fn fetch<T>(self, collection: &Collection<T>) -> Result<Vec<T>, ApiError>
    where
        T: DeserializeOwned + Unpin + Send + Sync,
    {
        collection
            .find(self.filter, None)
            .await
            .map_err(ApiError::DatabaseError)?
            .try_collect()
            .await
            .map_err(ApiError::DatabaseError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::timeframe::Timeframe;
    use chrono::{TimeZone, Utc};

    fn noon() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 3, 6, 30, 0).unwrap()
    }

    #[test]
    fn empty_query_builds_empty_filter() {
        assert_eq!(RangeQuery::new().into_filter(), Document::new());
    }

    #[test]
    fn range_becomes_gte_lte_on_the_named_field() {
        let range = Timeframe::Today.resolve(noon()).unwrap();
        let filter = RangeQuery::new()
            .time_range("reserved_at", Some(&range))
            .into_filter();

        let clause = filter.get_document("reserved_at").unwrap();
        assert_eq!(
            clause.get_datetime("$gte").unwrap().to_chrono(),
            range.start
        );
        assert_eq!(clause.get_datetime("$lte").unwrap().to_chrono(), range.end);
    }

    #[test]
    fn absent_range_adds_no_temporal_clause() {
        let filter = RangeQuery::new()
            .time_range("reserved_at", None)
            .eq("status", "pending")
            .into_filter();
        assert!(!filter.contains_key("reserved_at"));
        assert_eq!(filter.get_str("status").unwrap(), "pending");
    }

    #[test]
    fn eq_opt_skips_none() {
        let filter = RangeQuery::new()
            .eq_opt("district", None::<String>)
            .eq_opt("status", Some("confirmed"))
            .into_filter();
        assert!(!filter.contains_key("district"));
        assert_eq!(filter.get_str("status").unwrap(), "confirmed");
    }

    #[test]
    fn predicates_compose_with_the_range() {
        let range = Timeframe::LastWeek.resolve(noon()).unwrap();
        let filter = RangeQuery::new()
            .time_range("called_at", Some(&range))
            .eq("status", "no_answer")
            .into_filter();
        assert!(filter.contains_key("called_at"));
        assert_eq!(filter.get_str("status").unwrap(), "no_answer");
    }
}
