use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// One buy-low / sell-high window found inside a single day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeWindow {
    /// Time the battery starts charging (cheapest point of the window).
    #[serde(with = "hour_minute")]
    pub buy_time: NaiveTime,

    /// Price at the buy point, EUR per kWh.
    pub buy_price: f64,

    /// Time the battery discharges back to the grid.
    #[serde(with = "hour_minute")]
    pub sell_time: NaiveTime,

    /// Price at the sell point, EUR per kWh.
    pub sell_price: f64,

    /// Profit of this window for the configured capacity, EUR.
    pub profit: f64,
}

/// Arbitrage profit for one calendar day.
///
/// Order within `AnalysisResult::daily` is chronological and significant:
/// it defines the cumulative-sum order of the daily chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: NaiveDate,

    /// Total profit for the day across all trade windows, EUR.
    pub profit: f64,

    /// Number of trade windows executed (0, 1 or 2).
    pub transactions: usize,

    #[serde(default)]
    pub opportunities: Vec<TradeWindow>,
}

/// Aggregated profit statistics for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPoint {
    /// Month label in "YYYY-MM" form, chronological across the sequence.
    pub month: String,

    pub total_profit: f64,
    pub avg_profit: f64,
    pub max_profit: f64,
    pub min_profit: f64,

    /// Number of days with price data in this month.
    pub trading_days: usize,
}

/// Yearly totals and return-on-investment figures.
///
/// `roi_years` and `breakeven_date` are `None` when the yearly profit is
/// not positive: there is no payback horizon for a loss-making battery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlySummary {
    pub total_profit: f64,

    /// Years until the battery pays for itself (price / yearly profit).
    pub roi_years: Option<f64>,

    /// Yearly profit as a percentage of the battery price.
    pub annual_return_percentage: f64,

    /// Yearly profit divided by 12.
    pub monthly_average: f64,

    /// Projected calendar date at which cumulative profit reaches the
    /// battery price.
    pub breakeven_date: Option<NaiveDate>,

    /// The battery price from the active configuration, passed through.
    pub total_investment: f64,
}

/// The complete analysis payload: one atomic result per (upload, config)
/// pair. A new result always replaces the previous one in full — there is
/// no incremental merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub daily: Vec<DailyPoint>,
    pub monthly: Vec<MonthlyPoint>,
    pub yearly: YearlySummary,
}

impl AnalysisResult {
    /// Parse a result from its JSON wire form.
    ///
    /// A payload missing `daily`, `monthly` or `yearly` (or carrying
    /// ill-typed fields) is a malformed upstream response, not a local
    /// serialization bug, so the error surfaces as `MalformedResult`.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        serde_json::from_str(json).map_err(|e| CoreError::MalformedResult(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string(self)
            .map_err(|e| CoreError::Serialization(format!("failed to serialize analysis result: {e}")))
    }
}

/// Serde adapter for "HH:MM" trade-window times (the wire format the
/// dashboard displays verbatim).
mod hour_minute {
    use chrono::NaiveTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}
