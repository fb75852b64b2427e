use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use tracing::debug;

use crate::errors::CoreError;
use crate::models::analysis::{
    AnalysisResult, DailyPoint, MonthlyPoint, TradeWindow, YearlySummary,
};
use crate::models::config::BatteryConfig;
use crate::models::price::{PricePoint, PriceSeries};

/// Break-even horizons beyond this many days are reported as `None` — at
/// that point the figure is noise, not a projection.
const MAX_BREAKEVEN_DAYS: u64 = 36_500;

/// Computes arbitrage profits from an energy-price series: per-day trade
/// windows, monthly aggregates and the yearly ROI summary.
///
/// Pure business logic — no I/O, no shared state. The battery is modeled
/// as a daily buy-low/sell-high arbitrage with at most two round trips per
/// calendar day, each moving the full configured capacity.
pub struct AnalysisService;

impl AnalysisService {
    pub fn new() -> Self {
        Self
    }

    /// Run the full analysis for one (series, config) pair.
    ///
    /// `as_of` anchors the break-even date projection; callers pass today.
    /// An empty series yields empty daily/monthly sequences and a zero
    /// yearly summary rather than an error.
    pub fn analyze(
        &self,
        series: &PriceSeries,
        config: &BatteryConfig,
        as_of: NaiveDate,
    ) -> Result<AnalysisResult, CoreError> {
        config.validate()?;

        let daily = self.daily_profits(series, config.capacity);
        let monthly = self.monthly_profits(&daily);
        let yearly = self.yearly_summary(&monthly, config, as_of);

        debug!(
            days = daily.len(),
            months = monthly.len(),
            total_profit = yearly.total_profit,
            "analysis complete"
        );

        Ok(AnalysisResult {
            daily,
            monthly,
            yearly,
        })
    }

    /// Per-day profits: up to two trade windows per calendar day, profit
    /// scaled by the battery capacity. Output is chronological.
    pub fn daily_profits(&self, series: &PriceSeries, capacity: f64) -> Vec<DailyPoint> {
        series
            .days()
            .map(|(date, points)| {
                let opportunities = find_trade_windows(points, capacity);
                let profit = round2(opportunities.iter().map(|w| w.profit).sum());
                DailyPoint {
                    date,
                    profit,
                    transactions: opportunities.len(),
                    opportunities,
                }
            })
            .collect()
    }

    /// Group daily profits by "YYYY-MM" and compute per-month statistics.
    pub fn monthly_profits(&self, daily: &[DailyPoint]) -> Vec<MonthlyPoint> {
        let mut by_month: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for point in daily {
            by_month
                .entry(point.date.format("%Y-%m").to_string())
                .or_default()
                .push(point.profit);
        }

        by_month
            .into_iter()
            .map(|(month, profits)| {
                let total: f64 = profits.iter().sum();
                let max = profits.iter().copied().fold(f64::MIN, f64::max);
                let min = profits.iter().copied().fold(f64::MAX, f64::min);
                MonthlyPoint {
                    month,
                    total_profit: round2(total),
                    avg_profit: round2(total / profits.len() as f64),
                    max_profit: max,
                    min_profit: min,
                    trading_days: profits.len(),
                }
            })
            .collect()
    }

    /// Yearly totals and ROI. For a non-positive yearly profit there is no
    /// payback horizon, so `roi_years` and `breakeven_date` are `None`.
    pub fn yearly_summary(
        &self,
        monthly: &[MonthlyPoint],
        config: &BatteryConfig,
        as_of: NaiveDate,
    ) -> YearlySummary {
        let total: f64 = monthly.iter().map(|m| m.total_profit).sum();
        let total = round2(total);

        let (roi_years, breakeven_date) = if total > 0.0 {
            let years = round2(config.price / total);
            let days_to_breakeven = (config.price / (total / 365.0)).round();
            let breakeven = if days_to_breakeven <= MAX_BREAKEVEN_DAYS as f64 {
                as_of.checked_add_days(Days::new(days_to_breakeven as u64))
            } else {
                None
            };
            (Some(years), breakeven)
        } else {
            (None, None)
        };

        YearlySummary {
            total_profit: total,
            roi_years,
            annual_return_percentage: round2(total / config.price * 100.0),
            monthly_average: round2(total / 12.0),
            breakeven_date,
            total_investment: config.price,
        }
    }
}

impl Default for AnalysisService {
    fn default() -> Self {
        Self::new()
    }
}

/// Find up to two profitable buy-low/sell-high windows within one day.
///
/// First window: the day's cheapest point, then the most expensive point
/// strictly after it. If that spread is positive, a second window is
/// searched the same way in the remainder of the day after the first sell.
/// Ties resolve to the earliest occurrence.
fn find_trade_windows(points: &[PricePoint], capacity: f64) -> Vec<TradeWindow> {
    let mut windows = Vec::new();

    let Some(buy_idx) = index_of_min(points) else {
        return windows;
    };
    let after_buy = &points[buy_idx + 1..];
    let Some(sell_offset) = index_of_max(after_buy) else {
        return windows;
    };
    let buy = &points[buy_idx];
    let sell = &after_buy[sell_offset];
    let spread = sell.price - buy.price;
    if spread <= 0.0 {
        return windows;
    }
    windows.push(make_window(buy, sell, spread, capacity));

    // Second round trip, strictly after the first sell.
    let after_sell = &after_buy[sell_offset + 1..];
    if let Some(buy2_idx) = index_of_min(after_sell) {
        let after_buy2 = &after_sell[buy2_idx + 1..];
        if let Some(sell2_offset) = index_of_max(after_buy2) {
            let buy2 = &after_sell[buy2_idx];
            let sell2 = &after_buy2[sell2_offset];
            let spread2 = sell2.price - buy2.price;
            if spread2 > 0.0 {
                windows.push(make_window(buy2, sell2, spread2, capacity));
            }
        }
    }

    windows
}

fn make_window(buy: &PricePoint, sell: &PricePoint, spread: f64, capacity: f64) -> TradeWindow {
    TradeWindow {
        buy_time: buy.timestamp.time(),
        buy_price: round4(buy.price),
        sell_time: sell.timestamp.time(),
        sell_price: round4(sell.price),
        profit: round2(spread * capacity),
    }
}

fn index_of_min(points: &[PricePoint]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, p) in points.iter().enumerate() {
        match best {
            Some(b) if points[b].price <= p.price => {}
            _ => best = Some(i),
        }
    }
    best
}

fn index_of_max(points: &[PricePoint]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, p) in points.iter().enumerate() {
        match best {
            Some(b) if points[b].price >= p.price => {}
            _ => best = Some(i),
        }
    }
    best
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
