//! Wind farm configuration.
use crate::finance::FinancialModel;
use crate::input::check_positive;
use crate::units::Power;
use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};
use serde_string_enum::{DeserializeLabeledStringEnum, SerializeLabeledStringEnum};
use serde_yaml::Mapping;

/// Number of hours in a (non-leap) simulation year
pub const HOURS_PER_YEAR: u32 = 8760;

fn default_timestep() -> [u32; 2] {
    [0, HOURS_PER_YEAR]
}

/// The model used to simulate wind farm output
#[derive(
    Debug, Clone, Copy, PartialEq, Default, SerializeLabeledStringEnum, DeserializeLabeledStringEnum,
)]
pub enum WindModel {
    /// Wake modelling with FLORIS
    #[string = "floris"]
    Floris,
    /// The PySAM Windpower module
    #[default]
    #[string = "pysam"]
    Pysam,
}

/// The `technologies.wind` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindConfig {
    /// Number of turbines in the farm
    pub num_turbines: u32,
    /// Rated power of a single turbine
    pub turbine_rating_kw: Power,
    /// Which performance model to use
    #[serde(default)]
    pub model_name: WindModel,
    /// Hours of the year to simulate, as `[start, end]`
    #[serde(default = "default_timestep")]
    pub timestep: [u32; 2],
    /// Configuration passed to FLORIS
    #[serde(default)]
    pub floris_config: Option<Mapping>,
    /// Financial model for the wind farm
    #[serde(default)]
    pub fin_model: FinancialModel,
}

impl WindConfig {
    /// Rated power of the whole farm
    pub fn system_capacity(&self) -> Power {
        Power(self.turbine_rating_kw.value() * f64::from(self.num_turbines))
    }

    /// Number of hours which will be simulated
    pub fn simulated_hours(&self) -> u32 {
        self.timestep[1].saturating_sub(self.timestep[0])
    }

    /// Check that the wind configuration is valid
    pub fn validate(&self) -> Result<()> {
        ensure!(self.num_turbines > 0, "num_turbines cannot be zero");
        check_positive("turbine_rating_kw", self.turbine_rating_kw.value())?;

        let [start, end] = self.timestep;
        ensure!(
            start < end && end <= HOURS_PER_YEAR,
            "timestep must be [start, end] with start < end <= {HOURS_PER_YEAR}"
        );

        if self.model_name == WindModel::Floris {
            ensure!(
                self.floris_config.is_some(),
                "floris_config must be provided when model_name is floris"
            );
        }

        self.fin_model.validate()
    }
}
