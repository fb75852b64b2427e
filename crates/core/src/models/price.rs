use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A single hourly (or sub-hourly) energy price observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Timestamp of the observation (market local time, no timezone).
    pub timestamp: NaiveDateTime,

    /// Spot price in EUR per kWh.
    pub price: f64,
}

/// An uploaded energy-price time series, sorted chronologically.
///
/// Built by the ingest module from a price file and held by the
/// `ProfitAnalyzer` facade until the next upload replaces it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series from unordered points. Sorts by timestamp so that
    /// downstream day grouping can rely on chronological order.
    pub fn from_points(mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.timestamp);
        Self { points }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First and last observation dates, if the series is non-empty.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.points.first()?.timestamp.date();
        let last = self.points.last()?.timestamp.date();
        Some((first, last))
    }

    /// Iterate over calendar days and their price points, in chronological
    /// order. Each yielded slice is non-empty and shares a single date.
    pub fn days(&self) -> DayChunks<'_> {
        DayChunks {
            remaining: &self.points,
        }
    }
}

/// Iterator over per-day slices of a sorted `PriceSeries`.
#[derive(Debug)]
pub struct DayChunks<'a> {
    remaining: &'a [PricePoint],
}

impl<'a> Iterator for DayChunks<'a> {
    type Item = (NaiveDate, &'a [PricePoint]);

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.remaining.first()?;
        let date = first.timestamp.date();
        let split = self
            .remaining
            .iter()
            .position(|p| p.timestamp.date() != date)
            .unwrap_or(self.remaining.len());
        let (day, rest) = self.remaining.split_at(split);
        self.remaining = rest;
        Some((date, day))
    }
}
