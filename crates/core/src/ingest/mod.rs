//! Price file ingestion: turns uploaded bytes (Excel export or CSV) into
//! a sorted [`PriceSeries`](crate::models::price::PriceSeries).
//!
//! Both formats share the same column contract as the market exports the
//! dashboard accepts: a "Date Time" column and a "EUR per kWh" column,
//! matched case-insensitively.

pub mod csv_file;
pub mod workbook;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::errors::CoreError;

/// Header of the timestamp column.
pub const DATETIME_COLUMN: &str = "Date Time";

/// Header of the price column.
pub const PRICE_COLUMN: &str = "EUR per kWh";

/// Timestamp formats seen in real exports, day-first variants included.
/// Tried in order; first match wins.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%d-%m-%Y %H:%M",
];

/// Locate the timestamp and price columns in a header row.
/// Returns `(datetime_idx, price_idx)`.
pub(crate) fn find_columns(headers: &[String]) -> Result<(usize, usize), CoreError> {
    let position = |wanted: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(wanted))
    };
    let datetime_idx = position(DATETIME_COLUMN)
        .ok_or_else(|| CoreError::MissingColumn(DATETIME_COLUMN.to_string()))?;
    let price_idx = position(PRICE_COLUMN)
        .ok_or_else(|| CoreError::MissingColumn(PRICE_COLUMN.to_string()))?;
    Ok((datetime_idx, price_idx))
}

/// Parse a timestamp in any of the accepted formats. A date without a time
/// component is taken as midnight.
pub(crate) fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, CoreError> {
    let trimmed = raw.trim();
    for format in TIMESTAMP_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(dt);
        }
    }
    for format in ["%Y-%m-%d", "%d/%m/%Y", "%d.%m.%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(date.and_time(NaiveTime::MIN));
        }
    }
    Err(CoreError::InvalidFileFormat(format!(
        "unparseable timestamp '{trimmed}'"
    )))
}

/// Reject NaN/infinite prices at the boundary so the analysis never sees a
/// non-finite value.
pub(crate) fn validate_price(price: f64, context: &str) -> Result<f64, CoreError> {
    if price.is_finite() {
        Ok(price)
    } else {
        Err(CoreError::InvalidFileFormat(format!(
            "non-finite price at {context}"
        )))
    }
}
