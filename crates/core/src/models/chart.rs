use serde::{Deserialize, Serialize};

/// An equal-length `(labels, values)` pair, ready for a chart widget.
///
/// The core computes all the numbers — the frontend only renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPair {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl SeriesPair {
    pub fn new(labels: Vec<String>, values: Vec<f64>) -> Self {
        debug_assert_eq!(labels.len(), values.len());
        Self { labels, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// The four formatted strings shown in the ROI summary panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiStats {
    /// e.g. "8.5 Years", or "N/A" for a loss-making year.
    pub roi_period: String,

    /// e.g. "11.76%".
    pub annual_return: String,

    /// Break-even date verbatim ("2033-04-17"), or "N/A".
    pub breakeven: String,

    /// Currency-formatted battery price, e.g. "€40,000".
    pub total_investment: String,
}

/// Every derived series the dashboard renders, recomputed in full from an
/// `AnalysisResult` on each update. Holds no identity of its own — a new
/// result invalidates and replaces the whole value.
///
/// The nine chart slots map onto six pairs: the daily line and bar charts
/// share `daily_profit`, the monthly line and bar share `monthly_profit`,
/// and the yearly line and cumulative-area charts share `yearly_projection`
/// (the projection is already a running total by construction).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSeries {
    /// Per-day profit (daily line + bar charts).
    pub daily_profit: SeriesPair,

    /// Running total of per-day profit (daily area chart).
    pub daily_cumulative: SeriesPair,

    /// Per-month total profit (monthly line + bar charts).
    pub monthly_profit: SeriesPair,

    /// Running total of per-month profit (monthly area chart).
    pub monthly_cumulative: SeriesPair,

    /// 12-point projection of the yearly total (yearly line + area charts).
    pub yearly_projection: SeriesPair,

    /// 12 flat copies of the monthly average (yearly bar chart).
    pub monthly_average: SeriesPair,

    pub roi: RoiStats,
}
