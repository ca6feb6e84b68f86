//! The shared financial model fragment and general functions related to finance.
use crate::input::deserialise_percentage;
use crate::units::Dimensionless;
use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

/// The subset of financial parameters which this crate interprets.
///
/// Rates are percentages, as in the configuration file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FinancialParameters {
    /// Years of operation to analyse
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_period: Option<u32>,
    /// Annual inflation rate (%)
    #[serde(
        default,
        deserialize_with = "deserialise_optional_percentage",
        skip_serializing_if = "Option::is_none"
    )]
    pub inflation_rate: Option<f64>,
    /// Real discount rate (%)
    #[serde(
        default,
        deserialize_with = "deserialise_optional_percentage",
        skip_serializing_if = "Option::is_none"
    )]
    pub real_discount_rate: Option<f64>,
    /// Share of capital financed with debt (%)
    #[serde(
        default,
        deserialize_with = "deserialise_optional_percentage",
        skip_serializing_if = "Option::is_none"
    )]
    pub debt_percent: Option<f64>,
    /// Any other parameters, passed through to the engine untouched
    #[serde(flatten)]
    pub other: Mapping,
}

/// Read an optional percentage
fn deserialise_optional_percentage<'de, D>(deserialiser: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    deserialise_percentage(deserialiser).map(Some)
}

/// The longest analysis period accepted (years)
pub const MAX_ANALYSIS_PERIOD: u32 = 100;

/// A financial model fragment, usually shared between technologies with `!include`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FinancialModel {
    /// Parameters for the financial analysis
    #[serde(default)]
    pub financial_parameters: FinancialParameters,
    /// All other sections, passed through to the engine untouched
    #[serde(flatten)]
    pub other: Mapping,
}

impl FinancialModel {
    /// Years of operation to analyse, if given
    pub fn analysis_period(&self) -> Option<u32> {
        self.financial_parameters.analysis_period
    }

    /// The real discount rate as a fraction, if given
    pub fn discount_rate(&self) -> Option<Dimensionless> {
        self.financial_parameters
            .real_discount_rate
            .map(|rate| Dimensionless(rate / 100.0))
    }

    /// The fixed O&M cost (USD/kW) from `system_costs.om_capacity`, if given.
    ///
    /// This may be a single number or a list with one value per year, of which the first is used.
    pub fn om_capacity(&self) -> Option<f64> {
        match self.other.get("system_costs")?.get("om_capacity")? {
            Value::Sequence(values) => values.first()?.as_f64(),
            value => value.as_f64(),
        }
    }

    /// Check that the financial parameters are valid
    pub fn validate(&self) -> Result<()> {
        if let Some(period) = self.analysis_period() {
            ensure!(period > 0, "analysis_period cannot be zero");
            ensure!(
                period <= MAX_ANALYSIS_PERIOD,
                "analysis_period cannot be more than {MAX_ANALYSIS_PERIOD} years"
            );
        }

        Ok(())
    }
}

/// Calculates the capital recovery factor (CRF) for a given lifetime and discount rate.
///
/// The CRF is used to annualise capital costs over the lifetime of an asset.
pub fn capital_recovery_factor(lifetime: u32, discount_rate: Dimensionless) -> Dimensionless {
    if lifetime == 0 {
        return Dimensionless(0.0);
    }
    if discount_rate == Dimensionless(0.0) {
        return Dimensionless(1.0) / Dimensionless(lifetime as f64);
    }
    let exponent = i32::try_from(lifetime).unwrap_or(i32::MAX);
    let factor = (Dimensionless(1.0) + discount_rate).powi(exponent);
    if !factor.value().is_finite() {
        // The limit for a very long lifetime
        return discount_rate;
    }
    (discount_rate * factor) / (factor - Dimensionless(1.0))
}
