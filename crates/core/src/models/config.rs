use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Default battery capacity in kWh (matches the dashboard's preset selection).
pub const DEFAULT_CAPACITY_KWH: f64 = 100.0;

/// Default battery price in EUR.
pub const DEFAULT_PRICE_EUR: f64 = 40_000.0;

/// User-selected battery configuration.
///
/// Sent verbatim as the analysis request body by the frontend. Always
/// present — preset selection or custom input only ever replaces the
/// values, never removes them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatteryConfig {
    /// Usable battery capacity in kWh. Must be finite and > 0.
    pub capacity: f64,

    /// Purchase price of the battery in currency units. Must be finite and > 0.
    pub price: f64,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY_KWH,
            price: DEFAULT_PRICE_EUR,
        }
    }
}

impl BatteryConfig {
    pub fn new(capacity: f64, price: f64) -> Self {
        Self { capacity, price }
    }

    /// Check that both fields are finite and strictly positive.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.capacity.is_finite() || self.capacity <= 0.0 {
            return Err(CoreError::InvalidInput(format!(
                "battery capacity must be a finite positive number, got {}",
                self.capacity
            )));
        }
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(CoreError::InvalidInput(format!(
                "battery price must be a finite positive number, got {}",
                self.price
            )));
        }
        Ok(())
    }
}
