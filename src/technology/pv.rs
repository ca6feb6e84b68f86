//! Solar PV configuration.
use crate::finance::FinancialModel;
use crate::input::check_positive;
use crate::units::Power;
use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

/// The `technologies.pv` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PvConfig {
    /// Rated DC capacity
    pub system_capacity_kw: Power,
    /// Annual DC degradation (%/year).
    ///
    /// A single value applies to every year of operation; otherwise there is one value per year.
    #[serde(default)]
    pub dc_degradation: Vec<f64>,
    /// Financial model for the PV plant
    #[serde(default)]
    pub fin_model: FinancialModel,
}

impl PvConfig {
    /// The degradation rate (%) for the given year of operation (zero-based).
    ///
    /// Returns `None` if no rate is defined for that year.
    pub fn degradation_rate(&self, year: usize) -> Option<f64> {
        match self.dc_degradation.as_slice() {
            [] => None,
            [rate] => Some(*rate),
            rates => rates.get(year).copied(),
        }
    }

    /// The fraction of initial capacity remaining at the start of the given year of operation.
    ///
    /// Returns `None` if a rate is missing for an earlier year.
    pub fn capacity_retention(&self, year: usize) -> Option<f64> {
        if year == 0 {
            return Some(1.0);
        }

        (0..year)
            .map(|y| self.degradation_rate(y).map(|rate| 1.0 - rate / 100.0))
            .product()
    }

    /// Check that the PV configuration is valid
    pub fn validate(&self) -> Result<()> {
        check_positive("system_capacity_kw", self.system_capacity_kw.value())?;
        ensure!(
            self.dc_degradation
                .iter()
                .all(|rate| (0.0..100.0).contains(rate)),
            "dc_degradation values must be percentages between 0 and 100"
        );

        if let Some(period) = self.fin_model.analysis_period() {
            let len = self.dc_degradation.len();
            ensure!(
                len <= 1 || len == period as usize,
                "dc_degradation must have a single value or one value per year of the analysis \
                period ({period}), but has {len}"
            );
        }

        self.fin_model.validate()
    }
}
