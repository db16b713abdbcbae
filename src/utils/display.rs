use chrono::{DateTime, Utc};

use crate::utils::timeframe::ist;

pub const MISSING: &str = "N/A";

/// Grid display formatting. Everything here is pure and deterministic:
/// the same joined record always flattens to byte-identical rows.

pub fn fmt_date(dt: &DateTime<Utc>) -> String {
    dt.with_timezone(&ist()).format("%Y-%m-%d").to_string()
}

pub fn fmt_opt_date(dt: &Option<DateTime<Utc>>) -> String {
    match dt {
        Some(dt) => fmt_date(dt),
        None => MISSING.to_string(),
    }
}

pub fn fmt_bool(value: bool) -> String {
    if value { "Yes".to_string() } else { "No".to_string() }
}

pub fn fmt_opt(value: &Option<String>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.clone(),
        _ => MISSING.to_string(),
    }
}

pub fn fmt_list(values: &[String]) -> String {
    if values.is_empty() {
        MISSING.to_string()
    } else {
        values.join(", ")
    }
}

pub fn fmt_price(value: f64) -> String {
    format!("{:.2}", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn dates_render_in_ist() {
        // 21:00 UTC on the 3rd is 02:30 IST on the 4th
        let dt = Utc.with_ymd_and_hms(2024, 6, 3, 21, 0, 0).unwrap();
        assert_eq!(fmt_date(&dt), "2024-06-04");
    }

    #[test]
    fn missing_values_render_as_na() {
        assert_eq!(fmt_opt_date(&None), "N/A");
        assert_eq!(fmt_opt(&None), "N/A");
        assert_eq!(fmt_opt(&Some("   ".to_string())), "N/A");
        assert_eq!(fmt_list(&[]), "N/A");
    }

    #[test]
    fn booleans_render_yes_no() {
        assert_eq!(fmt_bool(true), "Yes");
        assert_eq!(fmt_bool(false), "No");
    }

    #[test]
    fn lists_join_with_commas() {
        let values = vec!["onion".to_string(), "potato".to_string()];
        assert_eq!(fmt_list(&values), "onion, potato");
    }

    #[test]
    fn formatting_is_idempotent() {
        let dt = Utc.with_ymd_and_hms(2024, 6, 3, 12, 0, 0).unwrap();
        assert_eq!(fmt_date(&dt), fmt_date(&dt));
        let value = Some("Nashik".to_string());
        assert_eq!(fmt_opt(&value), fmt_opt(&value));
        assert_eq!(fmt_price(1250.5), "1250.50");
    }
}
