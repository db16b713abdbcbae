use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use std::str::FromStr;

use crate::models::ApiError;

const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// Canonical timezone for every calendar-day boundary in the system.
/// All range queries and display dates use IST, nothing else.
pub fn ist() -> FixedOffset {
    FixedOffset::east_opt(IST_OFFSET_SECS).unwrap()
}

/// Inclusive instant range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Symbolic timeframe token from the grid filters. An unrecognized token is
/// a validation error; the only way to get an unfiltered scan is the
/// explicit `all` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeframe {
    Today,
    Tomorrow,
    ThisWeek,
    LastWeek,
    All,
}

impl FromStr for Timeframe {
    type Err = ApiError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "today" => Ok(Timeframe::Today),
            "tomorrow" => Ok(Timeframe::Tomorrow),
            "thisWeek" => Ok(Timeframe::ThisWeek),
            "lastWeek" => Ok(Timeframe::LastWeek),
            "all" => Ok(Timeframe::All),
            other => Err(ApiError::ValidationError(format!(
                "Unknown timeframe '{}' (expected today, tomorrow, thisWeek, lastWeek or all)",
                other
            ))),
        }
    }
}

impl Timeframe {
    /// Resolve against `now`; `None` means "no temporal filter".
    pub fn resolve(self, now: DateTime<Utc>) -> Option<DateRange> {
        let today = now.with_timezone(&ist()).date_naive();
        match self {
            Timeframe::Today => Some(day_range(today, today)),
            Timeframe::Tomorrow => {
                let tomorrow = today + Duration::days(1);
                Some(day_range(tomorrow, tomorrow))
            }
            Timeframe::ThisWeek => Some(day_range(today, today + Duration::days(6))),
            Timeframe::LastWeek => {
                Some(day_range(today - Duration::days(7), today - Duration::days(1)))
            }
            Timeframe::All => None,
        }
    }
}

/// [00:00:00.000 of `first`, 23:59:59.999 of `last`] in IST, as UTC instants.
fn day_range(first: NaiveDate, last: NaiveDate) -> DateRange {
    let day_end = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap();
    let start = ist()
        .from_local_datetime(&first.and_time(NaiveTime::MIN))
        .unwrap();
    let end = ist().from_local_datetime(&last.and_time(day_end)).unwrap();
    DateRange {
        start: start.with_timezone(&Utc),
        end: end.with_timezone(&Utc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    // 2024-06-03 12:00 IST
    fn noon_ist() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 3, 6, 30, 0).unwrap()
    }

    fn as_ist(dt: DateTime<Utc>) -> DateTime<FixedOffset> {
        dt.with_timezone(&ist())
    }

    #[test]
    fn parses_known_tokens() {
        assert_eq!("today".parse::<Timeframe>().unwrap(), Timeframe::Today);
        assert_eq!("tomorrow".parse::<Timeframe>().unwrap(), Timeframe::Tomorrow);
        assert_eq!("thisWeek".parse::<Timeframe>().unwrap(), Timeframe::ThisWeek);
        assert_eq!("lastWeek".parse::<Timeframe>().unwrap(), Timeframe::LastWeek);
        assert_eq!("all".parse::<Timeframe>().unwrap(), Timeframe::All);
    }

    #[test]
    fn unknown_token_is_rejected() {
        let err = "yesterday".parse::<Timeframe>();
        assert!(matches!(err, Err(ApiError::ValidationError(_))));
    }

    #[test]
    fn today_starts_at_midnight_and_covers_the_day() {
        let range = Timeframe::Today.resolve(noon_ist()).unwrap();
        let start = as_ist(range.start);
        let end = as_ist(range.end);
        assert_eq!(start.date_naive(), NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
        assert_eq!((start.hour(), start.minute(), start.second()), (0, 0, 0));
        assert_eq!(start.timestamp_subsec_millis(), 0);
        assert_eq!(end.date_naive(), start.date_naive());
        assert_eq!((end.hour(), end.minute(), end.second()), (23, 59, 59));
    }

    #[test]
    fn tomorrow_is_the_next_calendar_day() {
        let range = Timeframe::Tomorrow.resolve(noon_ist()).unwrap();
        let start = as_ist(range.start);
        assert_eq!(start.date_naive(), NaiveDate::from_ymd_opt(2024, 6, 4).unwrap());
        assert_eq!(as_ist(range.end).date_naive(), start.date_naive());
    }

    #[test]
    fn this_week_spans_today_through_today_plus_six() {
        let range = Timeframe::ThisWeek.resolve(noon_ist()).unwrap();
        assert_eq!(as_ist(range.start).date_naive(), NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
        assert_eq!(as_ist(range.end).date_naive(), NaiveDate::from_ymd_opt(2024, 6, 9).unwrap());
    }

    #[test]
    fn last_week_is_seven_days_ending_before_today() {
        let today = Timeframe::Today.resolve(noon_ist()).unwrap();
        let range = Timeframe::LastWeek.resolve(noon_ist()).unwrap();
        assert_eq!(as_ist(range.start).date_naive(), NaiveDate::from_ymd_opt(2024, 5, 27).unwrap());
        assert_eq!(as_ist(range.end).date_naive(), NaiveDate::from_ymd_opt(2024, 6, 2).unwrap());
        // ends the day before today's start
        assert!(range.end < today.start);
        // 7 days wide from start-of-day to start-of-day
        assert_eq!(today.start - range.start, Duration::days(7));
    }

    #[test]
    fn day_boundary_follows_ist_not_utc() {
        // 2024-06-03 23:00 UTC is already 2024-06-04 04:30 IST
        let late = Utc.with_ymd_and_hms(2024, 6, 3, 23, 0, 0).unwrap();
        let range = Timeframe::Today.resolve(late).unwrap();
        assert_eq!(as_ist(range.start).date_naive(), NaiveDate::from_ymd_opt(2024, 6, 4).unwrap());
    }

    #[test]
    fn all_resolves_to_no_filter() {
        assert!(Timeframe::All.resolve(noon_ist()).is_none());
    }
}
