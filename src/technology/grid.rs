//! Grid interconnection configuration.
use crate::finance::FinancialModel;
use crate::input::check_positive;
use crate::units::Power;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// The `technologies.grid` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Capacity of the interconnection
    pub interconnect_kw: Power,
    /// Financial model for the hybrid plant as a whole
    #[serde(default)]
    pub fin_model: FinancialModel,
}

impl GridConfig {
    /// Check that the grid configuration is valid
    pub fn validate(&self) -> Result<()> {
        check_positive("interconnect_kw", self.interconnect_kw.value())?;
        self.fin_model.validate()
    }
}
