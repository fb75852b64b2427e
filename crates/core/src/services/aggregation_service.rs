use crate::errors::CoreError;
use crate::models::analysis::AnalysisResult;
use crate::models::chart::{DashboardSeries, RoiStats, SeriesPair};
use crate::models::config::BatteryConfig;

/// Canonical short month names, calendar order. Chart labels never depend
/// on the wall clock: the yearly axis is always Jan → Dec.
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Currency symbol used for the investment label.
pub const CURRENCY_SYMBOL: &str = "€";

/// Derives every chart series and ROI label from an `AnalysisResult`.
///
/// Pure transformations — no I/O, no shared state. Each call takes an
/// immutable result plus a config snapshot and returns a fresh value, so
/// re-deriving after a superseded request is always safe.
pub struct AggregationService;

impl AggregationService {
    pub fn new() -> Self {
        Self
    }

    /// Inclusive prefix sums: `out[i] = sum(values[0..=i])`.
    ///
    /// Profits may be negative, so the output is not necessarily
    /// monotonic — the invariant is exact partial-sum equality. Empty
    /// input yields empty output. Native f64 addition, no compensation.
    pub fn compute_cumulative(&self, values: &[f64]) -> Vec<f64> {
        let mut out = Vec::with_capacity(values.len());
        let mut running = 0.0;
        for v in values {
            running += v;
            out.push(running);
        }
        out
    }

    /// `total_profit / 12`, unclamped — a net-loss year is a legitimate
    /// negative average. Fails on NaN/infinity so callers can tell a
    /// malformed upstream payload from a real zero or negative value.
    pub fn compute_monthly_average(&self, total_profit: f64) -> Result<f64, CoreError> {
        if !total_profit.is_finite() {
            return Err(CoreError::InvalidInput(format!(
                "yearly total profit must be finite, got {total_profit}"
            )));
        }
        Ok(total_profit / 12.0)
    }

    /// 12-point linear projection: `projection[i] = average * (i + 1)`.
    ///
    /// Sign-preserving monotonic, and the December point reconciles with
    /// the reported yearly total (up to floating-point rounding).
    pub fn compute_yearly_projection(&self, total_profit: f64) -> Result<[f64; 12], CoreError> {
        let average = self.compute_monthly_average(total_profit)?;
        let mut projection = [0.0; 12];
        for (i, slot) in projection.iter_mut().enumerate() {
            *slot = average * (i + 1) as f64;
        }
        Ok(projection)
    }

    /// The 12 canonical month labels, Jan first, as owned chart labels.
    pub fn month_labels(&self) -> Vec<String> {
        MONTH_LABELS.iter().map(|m| (*m).to_string()).collect()
    }

    /// Grouped-thousands integer formatting with a currency symbol prefix,
    /// e.g. `format_currency(40000.0)` → `"€40,000"`. Locale-stable: the
    /// separator is always a comma.
    pub fn format_currency(&self, amount: f64) -> String {
        let negative = amount < 0.0;
        let whole = amount.abs().round() as u64;
        let digits = whole.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }
        if negative {
            format!("-{CURRENCY_SYMBOL}{grouped}")
        } else {
            format!("{CURRENCY_SYMBOL}{grouped}")
        }
    }

    /// Top-level orchestration: turn one analysis result plus the active
    /// battery config into every series the dashboard renders.
    ///
    /// Empty daily/monthly sequences produce empty derived series (a file
    /// with no rows is not an error at this layer). Any non-finite numeric
    /// field in the result fails the whole call with `MalformedResult`;
    /// there is no partial output.
    pub fn derive_dashboard_series(
        &self,
        result: &AnalysisResult,
        config: &BatteryConfig,
    ) -> Result<DashboardSeries, CoreError> {
        config.validate()?;
        validate_result(result)?;

        let daily_labels: Vec<String> =
            result.daily.iter().map(|d| d.date.to_string()).collect();
        let daily_values: Vec<f64> = result.daily.iter().map(|d| d.profit).collect();
        let daily_cumulative = self.compute_cumulative(&daily_values);

        let monthly_labels: Vec<String> =
            result.monthly.iter().map(|m| m.month.clone()).collect();
        let monthly_values: Vec<f64> =
            result.monthly.iter().map(|m| m.total_profit).collect();
        // The monthly area chart gets a true running total, matching the
        // daily treatment. (The original dashboard fed flat monthly values
        // into its "cumulative" slot; that was a defect, not a contract.)
        let monthly_cumulative = self.compute_cumulative(&monthly_values);

        let total = result.yearly.total_profit;
        let average = self.compute_monthly_average(total)?;
        let projection = self.compute_yearly_projection(total)?;
        let month_labels = self.month_labels();

        let roi = RoiStats {
            roi_period: match result.yearly.roi_years {
                Some(years) => format!("{years} Years"),
                None => "N/A".to_string(),
            },
            annual_return: format!("{}%", result.yearly.annual_return_percentage),
            breakeven: match result.yearly.breakeven_date {
                Some(date) => date.to_string(),
                None => "N/A".to_string(),
            },
            total_investment: self.format_currency(config.price),
        };

        Ok(DashboardSeries {
            daily_profit: SeriesPair::new(daily_labels.clone(), daily_values),
            daily_cumulative: SeriesPair::new(daily_labels, daily_cumulative),
            monthly_profit: SeriesPair::new(monthly_labels.clone(), monthly_values),
            monthly_cumulative: SeriesPair::new(monthly_labels, monthly_cumulative),
            yearly_projection: SeriesPair::new(month_labels.clone(), projection.to_vec()),
            monthly_average: SeriesPair::new(month_labels, vec![average; 12]),
            roi,
        })
    }
}

impl Default for AggregationService {
    fn default() -> Self {
        Self::new()
    }
}

/// Reject any non-finite numeric field anywhere in the payload. A NaN or
/// infinity here means the upstream analysis went wrong; deriving charts
/// from it would silently poison every cumulative sum.
fn validate_result(result: &AnalysisResult) -> Result<(), CoreError> {
    for point in &result.daily {
        ensure_finite(point.profit, "daily.profit", Some(&point.date.to_string()))?;
    }
    for point in &result.monthly {
        ensure_finite(point.total_profit, "monthly.total_profit", Some(&point.month))?;
        ensure_finite(point.avg_profit, "monthly.avg_profit", Some(&point.month))?;
        ensure_finite(point.max_profit, "monthly.max_profit", Some(&point.month))?;
        ensure_finite(point.min_profit, "monthly.min_profit", Some(&point.month))?;
    }
    let yearly = &result.yearly;
    ensure_finite(yearly.total_profit, "yearly.total_profit", None)?;
    ensure_finite(yearly.annual_return_percentage, "yearly.annual_return_percentage", None)?;
    ensure_finite(yearly.monthly_average, "yearly.monthly_average", None)?;
    ensure_finite(yearly.total_investment, "yearly.total_investment", None)?;
    if let Some(years) = yearly.roi_years {
        ensure_finite(years, "yearly.roi_years", None)?;
    }
    Ok(())
}

fn ensure_finite(value: f64, field: &str, context: Option<&str>) -> Result<(), CoreError> {
    if value.is_finite() {
        return Ok(());
    }
    let message = match context {
        Some(ctx) => format!("non-finite value {value} in field {field} ({ctx})"),
        None => format!("non-finite value {value} in field {field}"),
    };
    Err(CoreError::MalformedResult(message))
}
