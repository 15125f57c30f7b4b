//! Cell formatting helpers.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Placeholder for a missing value.
pub const EMPTY_CELL: &str = "-";

const DISPLAY_DATE_FORMAT: &str = "%-d/%-m/%Y";

/// `count` as a share of `total`, one decimal. A zero total yields `0.0%`.
pub fn percentage(count: u64, total: u64) -> String {
    if total == 0 {
        return "0.0%".to_string();
    }
    format!("{:.1}%", count as f64 / total as f64 * 100.0)
}

/// Reformats an ISO date or date-time as `d/m/yyyy`.
///
/// Anything unparseable is returned as sent.
pub fn display_date(raw: &str) -> String {
    let raw = raw.trim();
    parse_date(raw)
        .map(|date| date.format(DISPLAY_DATE_FORMAT).to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Some(datetime.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|datetime| datetime.date())
}

pub fn optional_date(raw: Option<&str>) -> String {
    raw.map(display_date)
        .unwrap_or_else(|| EMPTY_CELL.to_string())
}

pub fn optional_number(value: Option<u32>) -> String {
    value
        .map(|n| n.to_string())
        .unwrap_or_else(|| EMPTY_CELL.to_string())
}

/// `8` -> `8 semestres`.
pub fn semesters(value: Option<u32>) -> String {
    value
        .map(|n| format!("{n} semestres"))
        .unwrap_or_else(|| EMPTY_CELL.to_string())
}

/// `1500.0` -> `$1500`; fractional fees keep their decimals.
pub fn fee(value: Option<f64>) -> String {
    value
        .map(|amount| format!("${amount}"))
        .unwrap_or_else(|| EMPTY_CELL.to_string())
}
