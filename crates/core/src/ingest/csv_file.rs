use tracing::debug;

use crate::errors::CoreError;
use crate::models::price::{PricePoint, PriceSeries};

use super::{find_columns, parse_timestamp, validate_price};

/// Parse an uploaded `.csv` price export into a sorted series.
///
/// Same column contract as the workbook path: a header row with
/// "Date Time" and "EUR per kWh", one observation per record.
pub fn parse_csv(bytes: &[u8]) -> Result<PriceSeries, CoreError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let (datetime_idx, price_idx) = find_columns(&headers)?;

    let mut points = Vec::new();
    for (row_no, record) in reader.records().enumerate() {
        let record = record?;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        let context = format!("record {}", row_no + 2);

        let raw_timestamp = record.get(datetime_idx).ok_or_else(|| {
            CoreError::InvalidFileFormat(format!("missing timestamp at {context}"))
        })?;
        let raw_price = record.get(price_idx).ok_or_else(|| {
            CoreError::InvalidFileFormat(format!("missing price at {context}"))
        })?;

        let timestamp = parse_timestamp(raw_timestamp)?;
        let price = raw_price.parse::<f64>().map_err(|_| {
            CoreError::InvalidFileFormat(format!("unparseable price '{raw_price}' at {context}"))
        })?;

        points.push(PricePoint {
            timestamp,
            price: validate_price(price, &context)?,
        });
    }

    if points.is_empty() {
        return Err(CoreError::EmptySeries);
    }
    debug!(rows = points.len(), "csv parsed");
    Ok(PriceSeries::from_points(points))
}
