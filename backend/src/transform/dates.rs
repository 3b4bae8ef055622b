//! Planned ship date conversion: `yyyymmdd` in, `mm/dd/yyyy` out.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::ShipDate;

/// Exactly eight ASCII digits.
static YYYYMMDD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{8}$").expect("valid date shape regex"));

/// Parse a `yyyymmdd` value. Returns `None` unless the text is exactly eight
/// digits forming a real calendar date.
pub fn parse_ship_date(raw: &str) -> Option<ShipDate> {
    let raw = raw.trim();
    if !YYYYMMDD.is_match(raw) {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y%m%d").ok().map(ShipDate)
}

/// Convert `yyyymmdd` text straight to `mm/dd/yyyy`.
pub fn reformat_ship_date(raw: &str) -> Option<String> {
    parse_ship_date(raw).map(|d| d.to_string())
}
