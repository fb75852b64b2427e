use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};
use chrono::{Duration, NaiveDate};
use tracing::{debug, warn};

use crate::errors::CoreError;
use crate::models::price::{PricePoint, PriceSeries};

use super::{find_columns, parse_timestamp, validate_price};

/// Parse an uploaded `.xlsx` price export into a sorted series.
///
/// Reads the first worksheet. The first non-empty row must be the header
/// row carrying the "Date Time" and "EUR per kWh" columns; rows that are
/// entirely empty are skipped, anything else malformed fails the upload.
pub fn parse_xlsx(bytes: &[u8]) -> Result<PriceSeries, CoreError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| CoreError::InvalidFileFormat("workbook has no sheets".to_string()))?;
    let range = workbook.worksheet_range(&sheet_name)?;

    let mut rows = range.rows();
    let header_row = rows
        .by_ref()
        .find(|row| !row.iter().all(|cell| matches!(cell, Data::Empty)))
        .ok_or(CoreError::EmptySeries)?;
    let headers: Vec<String> = header_row.iter().map(cell_to_string).collect();
    let (datetime_idx, price_idx) = find_columns(&headers)?;

    debug!(sheet = %sheet_name, "parsing price workbook");

    let mut points = Vec::new();
    for (row_no, row) in rows.enumerate() {
        if row.iter().all(|cell| matches!(cell, Data::Empty)) {
            continue;
        }
        let context = format!("row {}", row_no + 2);

        let timestamp = match row.get(datetime_idx) {
            Some(Data::DateTime(dt)) => excel_serial_to_datetime(dt.as_f64())
                .ok_or_else(|| {
                    CoreError::InvalidFileFormat(format!("invalid Excel date at {context}"))
                })?,
            Some(Data::String(s)) => parse_timestamp(s)?,
            other => {
                warn!(row = row_no + 2, cell = ?other, "skipping row without timestamp");
                continue;
            }
        };

        let price = match row.get(price_idx) {
            Some(Data::Float(p)) => *p,
            Some(Data::Int(p)) => *p as f64,
            Some(Data::String(s)) => s.trim().parse::<f64>().map_err(|_| {
                CoreError::InvalidFileFormat(format!("unparseable price '{s}' at {context}"))
            })?,
            _ => {
                return Err(CoreError::InvalidFileFormat(format!(
                    "missing price at {context}"
                )))
            }
        };

        points.push(PricePoint {
            timestamp,
            price: validate_price(price, &context)?,
        });
    }

    if points.is_empty() {
        return Err(CoreError::EmptySeries);
    }
    debug!(rows = points.len(), "workbook parsed");
    Ok(PriceSeries::from_points(points))
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Excel serial date → timestamp. Serial day 0 is 1899-12-30; the
/// fractional part is the time of day.
fn excel_serial_to_datetime(serial: f64) -> Option<chrono::NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let days = serial.trunc() as i64;
    let secs = (serial.fract() * 86_400.0).round() as i64;
    base.checked_add_signed(Duration::days(days))?
        .checked_add_signed(Duration::seconds(secs))
}
