//! Fuel consumption and price settings

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Vehicle consumption and fuel price used for the trip cost estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuelSettings {
    consumption_l_per_100km: f64,
    price_per_litre: f64,
}

impl FuelSettings {
    /// Create validated fuel settings
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` if either value is negative,
    /// NaN or infinite.
    pub fn new(consumption_l_per_100km: f64, price_per_litre: f64) -> Result<Self, DomainError> {
        if !is_usable(consumption_l_per_100km) {
            return Err(DomainError::ValidationError(format!(
                "fuel consumption must be a non-negative number, got {consumption_l_per_100km}"
            )));
        }
        if !is_usable(price_per_litre) {
            return Err(DomainError::ValidationError(format!(
                "fuel price must be a non-negative number, got {price_per_litre}"
            )));
        }
        Ok(Self {
            consumption_l_per_100km,
            price_per_litre,
        })
    }

    /// Parse user-entered text fields
    ///
    /// Returns `None` when either field is not a usable number, which turns
    /// the cost estimate off instead of failing.
    #[must_use]
    pub fn parse(consumption: &str, price: &str) -> Option<Self> {
        let consumption = consumption.trim().parse().ok()?;
        let price = price.trim().parse().ok()?;
        Self::new(consumption, price).ok()
    }

    /// Litres per 100 km
    #[must_use]
    pub const fn consumption_l_per_100km(&self) -> f64 {
        self.consumption_l_per_100km
    }

    /// Price per litre
    #[must_use]
    pub const fn price_per_litre(&self) -> f64 {
        self.price_per_litre
    }

    /// Cost of driving `km` kilometres, rounded to cents
    #[must_use]
    pub fn cost_for_km(&self, km: f64) -> f64 {
        let litres = km * self.consumption_l_per_100km / 100.0;
        (litres * self.price_per_litre * 100.0).round() / 100.0
    }
}

impl Default for FuelSettings {
    fn default() -> Self {
        Self {
            consumption_l_per_100km: 8.5,
            price_per_litre: 2.5,
        }
    }
}

fn is_usable(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
