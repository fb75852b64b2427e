// ═══════════════════════════════════════════════════════════════════
// Aggregation Engine Tests — cumulative sums, yearly projection,
// month labels, currency formatting, dashboard derivation
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;

use battery_roi_core::errors::CoreError;
use battery_roi_core::models::analysis::{AnalysisResult, DailyPoint, MonthlyPoint, YearlySummary};
use battery_roi_core::models::config::BatteryConfig;
use battery_roi_core::services::aggregation_service::{AggregationService, MONTH_LABELS};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn daily(y: i32, m: u32, day: u32, profit: f64) -> DailyPoint {
    DailyPoint {
        date: d(y, m, day),
        profit,
        transactions: 0,
        opportunities: Vec::new(),
    }
}

fn monthly(month: &str, total: f64) -> MonthlyPoint {
    MonthlyPoint {
        month: month.to_string(),
        total_profit: total,
        avg_profit: total / 30.0,
        max_profit: total,
        min_profit: 0.0,
        trading_days: 30,
    }
}

fn yearly(total: f64) -> YearlySummary {
    YearlySummary {
        total_profit: total,
        roi_years: if total > 0.0 { Some(40_000.0 / total) } else { None },
        annual_return_percentage: total / 40_000.0 * 100.0,
        monthly_average: total / 12.0,
        breakeven_date: if total > 0.0 { Some(d(2033, 4, 17)) } else { None },
        total_investment: 40_000.0,
    }
}

fn sample_result() -> AnalysisResult {
    AnalysisResult {
        daily: vec![
            daily(2025, 1, 1, 10.0),
            daily(2025, 1, 2, -3.0),
            daily(2025, 2, 1, 5.0),
        ],
        monthly: vec![monthly("2025-01", 7.0), monthly("2025-02", 5.0)],
        yearly: yearly(1200.0),
    }
}

// ═══════════════════════════════════════════════════════════════════
//  compute_cumulative (P1)
// ═══════════════════════════════════════════════════════════════════

mod cumulative {
    use super::*;

    #[test]
    fn partial_sums_exact() {
        let svc = AggregationService::new();
        let input = vec![1.5, -2.0, 4.0, 0.0, 7.25];
        let out = svc.compute_cumulative(&input);
        assert_eq!(out.len(), input.len());
        for (i, value) in out.iter().enumerate() {
            let expected: f64 = input[..=i].iter().sum();
            assert_eq!(*value, expected, "mismatch at index {i}");
        }
    }

    #[test]
    fn empty_input_empty_output() {
        let svc = AggregationService::new();
        assert!(svc.compute_cumulative(&[]).is_empty());
    }

    #[test]
    fn single_element() {
        let svc = AggregationService::new();
        assert_eq!(svc.compute_cumulative(&[42.0]), vec![42.0]);
    }

    #[test]
    fn negative_profits_allowed_no_monotonicity() {
        // Scenario A: [10, -3, 5] → [10, 7, 12]
        let svc = AggregationService::new();
        assert_eq!(svc.compute_cumulative(&[10.0, -3.0, 5.0]), vec![10.0, 7.0, 12.0]);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  monthly average & yearly projection (P2, P3)
// ═══════════════════════════════════════════════════════════════════

mod projection {
    use super::*;

    #[test]
    fn monthly_average_simple() {
        let svc = AggregationService::new();
        assert_eq!(svc.compute_monthly_average(1200.0).unwrap(), 100.0);
    }

    #[test]
    fn monthly_average_zero_and_negative_unclamped() {
        let svc = AggregationService::new();
        assert_eq!(svc.compute_monthly_average(0.0).unwrap(), 0.0);
        assert_eq!(svc.compute_monthly_average(-600.0).unwrap(), -50.0);
    }

    #[test]
    fn monthly_average_rejects_non_finite() {
        let svc = AggregationService::new();
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                svc.compute_monthly_average(bad),
                Err(CoreError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn projection_scenario_b() {
        // total = 1200 → [100, 200, ..., 1200]
        let svc = AggregationService::new();
        let projection = svc.compute_yearly_projection(1200.0).unwrap();
        for (i, value) in projection.iter().enumerate() {
            assert_eq!(*value, 100.0 * (i + 1) as f64);
        }
    }

    #[test]
    fn projection_scenario_c_negative() {
        let svc = AggregationService::new();
        let projection = svc.compute_yearly_projection(-600.0).unwrap();
        assert_eq!(projection[0], -50.0);
        assert_eq!(projection[11], -600.0);
    }

    #[test]
    fn projection_endpoint_reconciles() {
        // P2: projection[11] == total within 1e-9 relative tolerance
        let svc = AggregationService::new();
        for total in [1200.0, 0.37, -981.25, 1e6 + 0.125, 3.0] {
            let projection = svc.compute_yearly_projection(total).unwrap();
            let relative = ((projection[11] - total) / total).abs();
            assert!(relative < 1e-9, "endpoint off for total={total}: {relative}");
        }
    }

    #[test]
    fn projection_sign_preserving_monotonic() {
        // P3: non-decreasing for t >= 0, non-increasing for t < 0
        let svc = AggregationService::new();
        for total in [1200.0, 0.0, 0.001] {
            let p = svc.compute_yearly_projection(total).unwrap();
            assert!(p.windows(2).all(|w| w[0] <= w[1]), "not non-decreasing for {total}");
        }
        for total in [-600.0, -0.001] {
            let p = svc.compute_yearly_projection(total).unwrap();
            assert!(p.windows(2).all(|w| w[0] >= w[1]), "not non-increasing for {total}");
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
//  month labels (P4)
// ═══════════════════════════════════════════════════════════════════

mod labels {
    use super::*;

    #[test]
    fn twelve_labels_jan_through_dec() {
        let svc = AggregationService::new();
        let labels = svc.month_labels();
        assert_eq!(labels.len(), 12);
        assert_eq!(labels.first().unwrap(), "Jan");
        assert_eq!(labels.last().unwrap(), "Dec");
    }

    #[test]
    fn table_is_calendar_ordered() {
        assert_eq!(
            MONTH_LABELS,
            ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"]
        );
    }

    #[test]
    fn stable_across_calls() {
        let svc = AggregationService::new();
        assert_eq!(svc.month_labels(), svc.month_labels());
    }
}

// ═══════════════════════════════════════════════════════════════════
//  currency formatting
// ═══════════════════════════════════════════════════════════════════

mod currency {
    use super::*;

    #[test]
    fn groups_thousands_with_symbol_prefix() {
        let svc = AggregationService::new();
        assert_eq!(svc.format_currency(40_000.0), "€40,000");
        assert_eq!(svc.format_currency(1_234_567.0), "€1,234,567");
    }

    #[test]
    fn small_amounts_ungrouped() {
        let svc = AggregationService::new();
        assert_eq!(svc.format_currency(0.0), "€0");
        assert_eq!(svc.format_currency(999.0), "€999");
        assert_eq!(svc.format_currency(1000.0), "€1,000");
    }

    #[test]
    fn rounds_to_whole_units() {
        let svc = AggregationService::new();
        assert_eq!(svc.format_currency(40_000.49), "€40,000");
        assert_eq!(svc.format_currency(40_000.5), "€40,001");
    }

    #[test]
    fn negative_amount_keeps_sign_before_symbol() {
        let svc = AggregationService::new();
        assert_eq!(svc.format_currency(-1500.0), "-€1,500");
    }
}

// ═══════════════════════════════════════════════════════════════════
//  derive_dashboard_series
// ═══════════════════════════════════════════════════════════════════

mod derive {
    use super::*;

    #[test]
    fn daily_series_labels_values_and_cumulative() {
        let svc = AggregationService::new();
        let out = svc
            .derive_dashboard_series(&sample_result(), &BatteryConfig::default())
            .unwrap();

        assert_eq!(
            out.daily_profit.labels,
            vec!["2025-01-01", "2025-01-02", "2025-02-01"]
        );
        assert_eq!(out.daily_profit.values, vec![10.0, -3.0, 5.0]);
        // Scenario A applied end-to-end
        assert_eq!(out.daily_cumulative.values, vec![10.0, 7.0, 12.0]);
        assert_eq!(out.daily_cumulative.labels, out.daily_profit.labels);
    }

    #[test]
    fn monthly_cumulative_is_a_true_running_total() {
        // The original dashboard fed flat monthly values into its
        // "cumulative" slot; this library computes the real prefix sum.
        let svc = AggregationService::new();
        let out = svc
            .derive_dashboard_series(&sample_result(), &BatteryConfig::default())
            .unwrap();

        assert_eq!(out.monthly_profit.labels, vec!["2025-01", "2025-02"]);
        assert_eq!(out.monthly_profit.values, vec![7.0, 5.0]);
        assert_eq!(out.monthly_cumulative.values, vec![7.0, 12.0]);
    }

    #[test]
    fn yearly_projection_and_flat_average() {
        let svc = AggregationService::new();
        let out = svc
            .derive_dashboard_series(&sample_result(), &BatteryConfig::default())
            .unwrap();

        assert_eq!(out.yearly_projection.labels.len(), 12);
        assert_eq!(out.yearly_projection.labels[0], "Jan");
        assert_eq!(out.yearly_projection.values[0], 100.0);
        assert_eq!(out.yearly_projection.values[11], 1200.0);
        assert_eq!(out.monthly_average.values, vec![100.0; 12]);
        assert_eq!(out.monthly_average.labels, out.yearly_projection.labels);
    }

    #[test]
    fn roi_labels_formatted() {
        let svc = AggregationService::new();
        let mut result = sample_result();
        result.yearly.roi_years = Some(8.5);
        result.yearly.annual_return_percentage = 11.76;
        let out = svc
            .derive_dashboard_series(&result, &BatteryConfig::default())
            .unwrap();

        assert_eq!(out.roi.roi_period, "8.5 Years");
        assert_eq!(out.roi.annual_return, "11.76%");
        assert_eq!(out.roi.breakeven, "2033-04-17");
        assert_eq!(out.roi.total_investment, "€40,000");
    }

    #[test]
    fn loss_year_roi_labels_not_applicable() {
        let svc = AggregationService::new();
        let mut result = sample_result();
        result.yearly = yearly(-600.0);
        let out = svc
            .derive_dashboard_series(&result, &BatteryConfig::default())
            .unwrap();

        assert_eq!(out.roi.roi_period, "N/A");
        assert_eq!(out.roi.breakeven, "N/A");
        assert_eq!(out.yearly_projection.values[11], -600.0);
    }

    #[test]
    fn empty_daily_and_monthly_is_not_an_error() {
        // Scenario D
        let svc = AggregationService::new();
        let result = AnalysisResult {
            daily: Vec::new(),
            monthly: Vec::new(),
            yearly: yearly(0.0),
        };
        let out = svc
            .derive_dashboard_series(&result, &BatteryConfig::default())
            .unwrap();

        assert!(out.daily_profit.is_empty());
        assert!(out.daily_cumulative.is_empty());
        assert!(out.monthly_cumulative.is_empty());
        // Yearly branches still produce their 12 points
        assert_eq!(out.yearly_projection.len(), 12);
    }

    #[test]
    fn missing_yearly_in_payload_is_malformed() {
        // Scenario E: the wire payload lacks `yearly`
        let json = r#"{"daily": [], "monthly": []}"#;
        let err = AnalysisResult::from_json(json).unwrap_err();
        assert!(matches!(err, CoreError::MalformedResult(_)));
    }

    #[test]
    fn non_finite_daily_profit_is_malformed() {
        let svc = AggregationService::new();
        let mut result = sample_result();
        result.daily[1].profit = f64::NAN;
        let err = svc
            .derive_dashboard_series(&result, &BatteryConfig::default())
            .unwrap_err();
        assert!(matches!(err, CoreError::MalformedResult(_)));
    }

    #[test]
    fn non_finite_yearly_total_is_malformed() {
        let svc = AggregationService::new();
        let mut result = sample_result();
        result.yearly.total_profit = f64::INFINITY;
        let err = svc
            .derive_dashboard_series(&result, &BatteryConfig::default())
            .unwrap_err();
        assert!(matches!(err, CoreError::MalformedResult(_)));
    }

    #[test]
    fn invalid_config_rejected_before_derivation() {
        let svc = AggregationService::new();
        let err = svc
            .derive_dashboard_series(&sample_result(), &BatteryConfig::new(100.0, 0.0))
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[test]
    fn idempotent_derivation() {
        // P5: same inputs, identical output, no hidden state
        let svc = AggregationService::new();
        let result = sample_result();
        let config = BatteryConfig::default();
        let first = svc.derive_dashboard_series(&result, &config).unwrap();
        let second = svc.derive_dashboard_series(&result, &config).unwrap();
        assert_eq!(first, second);
    }
}
