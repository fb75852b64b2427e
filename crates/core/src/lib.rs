pub mod errors;
pub mod ingest;
pub mod models;
pub mod services;

use chrono::NaiveDate;
use tracing::info;

use errors::CoreError;
use models::{
    analysis::AnalysisResult,
    chart::DashboardSeries,
    config::BatteryConfig,
    price::PriceSeries,
};
use services::{aggregation_service::AggregationService, analysis_service::AnalysisService};

/// Main entry point for the battery-roi-core library.
///
/// Holds the uploaded price series (the only piece of state, replaced in
/// full on every upload) and the services that operate on it. The frontend
/// performs all transport and rendering; this type only transforms bytes
/// into values.
#[must_use]
pub struct ProfitAnalyzer {
    prices: Option<PriceSeries>,
    analysis_service: AnalysisService,
    aggregation_service: AggregationService,
}

impl std::fmt::Debug for ProfitAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfitAnalyzer")
            .field("loaded", &self.prices.is_some())
            .field("points", &self.prices.as_ref().map_or(0, PriceSeries::len))
            .finish()
    }
}

impl Default for ProfitAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfitAnalyzer {
    /// Create an analyzer with no data loaded.
    pub fn new() -> Self {
        Self {
            prices: None,
            analysis_service: AnalysisService::new(),
            aggregation_service: AggregationService::new(),
        }
    }

    // ── Upload ──────────────────────────────────────────────────────

    /// Load an uploaded `.xlsx` price export. Replaces any prior series.
    pub fn load_xlsx_bytes(&mut self, bytes: &[u8]) -> Result<(), CoreError> {
        let series = ingest::workbook::parse_xlsx(bytes)?;
        info!(points = series.len(), "price workbook loaded");
        self.prices = Some(series);
        Ok(())
    }

    /// Load an uploaded `.csv` price export. Replaces any prior series.
    pub fn load_csv_bytes(&mut self, bytes: &[u8]) -> Result<(), CoreError> {
        let series = ingest::csv_file::parse_csv(bytes)?;
        info!(points = series.len(), "price csv loaded");
        self.prices = Some(series);
        Ok(())
    }

    /// Whether a price series has been loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.prices.is_some()
    }

    /// Number of loaded price observations.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.prices.as_ref().map_or(0, PriceSeries::len)
    }

    /// First and last observation dates of the loaded series.
    #[must_use]
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.prices.as_ref().and_then(PriceSeries::date_range)
    }

    /// Drop the loaded series.
    pub fn clear(&mut self) {
        self.prices = None;
    }

    // ── Analysis ────────────────────────────────────────────────────

    /// Run the full profit analysis for a battery configuration.
    /// Fails with `NoData` if no price file has been loaded yet.
    pub fn analyze(&self, config: &BatteryConfig) -> Result<AnalysisResult, CoreError> {
        self.analyze_as_of(config, chrono::Utc::now().date_naive())
    }

    /// Like [`analyze`](Self::analyze), with an explicit anchor date for
    /// the break-even projection. Deterministic, used by tests.
    pub fn analyze_as_of(
        &self,
        config: &BatteryConfig,
        as_of: NaiveDate,
    ) -> Result<AnalysisResult, CoreError> {
        let series = self.prices.as_ref().ok_or(CoreError::NoData)?;
        self.analysis_service.analyze(series, config, as_of)
    }

    // ── Dashboard derivation ────────────────────────────────────────

    /// Derive every chart series and ROI label from an analysis result.
    ///
    /// Pure and stateless: takes the result and config explicitly, so a
    /// superseded request can simply be re-derived with the winning result.
    pub fn derive_dashboard_series(
        &self,
        result: &AnalysisResult,
        config: &BatteryConfig,
    ) -> Result<DashboardSeries, CoreError> {
        self.aggregation_service.derive_dashboard_series(result, config)
    }

    /// Analyze and derive in one step: the whole upload → charts pipeline.
    pub fn dashboard(&self, config: &BatteryConfig) -> Result<DashboardSeries, CoreError> {
        let result = self.analyze(config)?;
        self.derive_dashboard_series(&result, config)
    }
}
