//! Unit costs for each technology and the cost summary derived from them.
use crate::finance::capital_recovery_factor;
use crate::input::check_non_negative;
use crate::technology::{Technologies, TechnologyKind};
use crate::units::{Energy, Money, MoneyPerEnergy, MoneyPerPower, Power};
use anyhow::Result;
use float_cmp::approx_eq;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The `config.cost_info` section.
///
/// Every field is optional. A missing field means the engine's default is used.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CostInfo {
    /// Installed cost of wind (USD/MW)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_installed_cost_mw: Option<f64>,
    /// Installed cost of solar (USD/MW)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solar_installed_cost_mw: Option<f64>,
    /// Installed cost of battery power capacity (USD/MW)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_installed_cost_mw: Option<f64>,
    /// Installed cost of battery energy capacity (USD/MWh)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_installed_cost_mwh: Option<f64>,
    /// Annual operation and maintenance cost of wind (USD/kW)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_om_per_kw: Option<f64>,
    /// Annual operation and maintenance cost of solar (USD/kW)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pv_om_per_kw: Option<f64>,
    /// Annual operation and maintenance cost of the battery (USD/kW)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery_om_per_kw: Option<f64>,
}

impl CostInfo {
    /// The named fields which have been given
    fn fields(&self) -> impl Iterator<Item = (&'static str, f64)> {
        [
            ("wind_installed_cost_mw", self.wind_installed_cost_mw),
            ("solar_installed_cost_mw", self.solar_installed_cost_mw),
            ("storage_installed_cost_mw", self.storage_installed_cost_mw),
            ("storage_installed_cost_mwh", self.storage_installed_cost_mwh),
            ("wind_om_per_kw", self.wind_om_per_kw),
            ("pv_om_per_kw", self.pv_om_per_kw),
            ("battery_om_per_kw", self.battery_om_per_kw),
        ]
        .into_iter()
        .filter_map(|(name, value)| Some((name, value?)))
    }

    /// Check that all given costs are valid
    pub fn validate(&self) -> Result<()> {
        for (name, value) in self.fields() {
            check_non_negative(name, value)?;
        }

        Ok(())
    }

    /// Installed cost per unit of power for the given technology, if known
    pub fn installed_cost_per_power(&self, kind: TechnologyKind) -> Option<MoneyPerPower> {
        let cost = match kind {
            TechnologyKind::Wind => self.wind_installed_cost_mw,
            TechnologyKind::Pv => self.solar_installed_cost_mw,
            TechnologyKind::Battery => self.storage_installed_cost_mw,
            TechnologyKind::Wave | TechnologyKind::Grid => None,
        };
        cost.map(MoneyPerPower::from_per_mw)
    }

    /// Installed cost per unit of energy storage for the given technology, if known
    pub fn installed_cost_per_energy(&self, kind: TechnologyKind) -> Option<MoneyPerEnergy> {
        match kind {
            TechnologyKind::Battery => self
                .storage_installed_cost_mwh
                .map(MoneyPerEnergy::from_per_mwh),
            _ => None,
        }
    }

    /// Annual O&M cost per unit of power for the given technology, if known
    pub fn om_cost_per_power(&self, kind: TechnologyKind) -> Option<MoneyPerPower> {
        let cost = match kind {
            TechnologyKind::Wind => self.wind_om_per_kw,
            TechnologyKind::Pv => self.pv_om_per_kw,
            TechnologyKind::Battery => self.battery_om_per_kw,
            TechnologyKind::Wave | TechnologyKind::Grid => None,
        };
        cost.map(MoneyPerPower)
    }

    /// The name of the O&M cost field for the given technology, if it has one
    pub fn om_field_name(kind: TechnologyKind) -> Option<&'static str> {
        match kind {
            TechnologyKind::Wind => Some("wind_om_per_kw"),
            TechnologyKind::Pv => Some("pv_om_per_kw"),
            TechnologyKind::Battery => Some("battery_om_per_kw"),
            TechnologyKind::Wave | TechnologyKind::Grid => None,
        }
    }
}

/// An O&M cost given with different values in a technology's `fin_model` and in `cost_info`
#[derive(Debug, Clone, PartialEq)]
pub struct OmCostConflict {
    /// The technology with conflicting costs
    pub technology: TechnologyKind,
    /// `system_costs.om_capacity` from the technology's `fin_model` (USD/kW)
    pub fin_model_om: f64,
    /// The matching O&M field of `cost_info` (USD/kW)
    pub cost_info_om: f64,
}

impl fmt::Display for OmCostConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "The 'om_capacity' value in the {} 'fin_model' ({}) does not match {} in cost_info ({})",
            self.technology,
            self.fin_model_om,
            CostInfo::om_field_name(self.technology).unwrap_or("the O&M cost"),
            self.cost_info_om
        )
    }
}

/// Find technologies whose `fin_model` O&M cost disagrees with the one in `cost_info`
pub fn om_cost_conflicts(
    technologies: &Technologies,
    cost_info: &CostInfo,
) -> Vec<OmCostConflict> {
    technologies
        .kinds()
        .filter_map(|kind| {
            let fin_model_om = technologies.fin_model(kind)?.om_capacity()?;
            let cost_info_om = cost_info.om_cost_per_power(kind)?.value();
            (!approx_eq!(f64, fin_model_om, cost_info_om, epsilon = 1e-9)).then_some(
                OmCostConflict {
                    technology: kind,
                    fin_model_om,
                    cost_info_om,
                },
            )
        })
        .collect()
}

/// One row of the plant summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostSummaryRow {
    /// The technology which this row describes
    pub technology: String,
    /// Rated power (kW)
    pub rated_power_kw: Power,
    /// Energy capacity (kWh), for storage only
    pub energy_capacity_kwh: Option<Energy>,
    /// Total installed cost (USD), if costs are known
    pub installed_cost: Option<Money>,
    /// Annual operation and maintenance cost (USD/year), if costs are known
    pub annual_om_cost: Option<Money>,
    /// Installed cost spread evenly over the analysis period (USD/year)
    pub annualised_installed_cost: Option<Money>,
    /// Whether financial calculations are skipped for this technology
    pub skip_financial: bool,
}

/// Compute the installed cost of one technology
fn installed_cost(
    cost_info: &CostInfo,
    kind: TechnologyKind,
    power: Power,
    energy: Option<Energy>,
) -> Option<Money> {
    let power_cost = cost_info.installed_cost_per_power(kind).map(|c| c * power);
    let energy_cost = energy
        .zip(cost_info.installed_cost_per_energy(kind))
        .map(|(energy, c)| c * energy);

    match (power_cost, energy_cost) {
        (None, None) => None,
        (power_cost, energy_cost) => {
            Some(power_cost.unwrap_or_default() + energy_cost.unwrap_or_default())
        }
    }
}

/// Summarise the size and cost of every configured technology.
///
/// # Arguments
///
/// * `technologies` - The plant's technologies
/// * `cost_info` - Unit costs, if any were given
/// * `skip_financial` - Whether financial calculations are skipped for a technology
pub fn summarise_costs<F>(
    technologies: &Technologies,
    cost_info: Option<&CostInfo>,
    skip_financial: F,
) -> Vec<CostSummaryRow>
where
    F: Fn(TechnologyKind) -> bool,
{
    let default_cost_info = CostInfo::default();
    let cost_info = cost_info.unwrap_or(&default_cost_info);

    technologies
        .kinds()
        .filter_map(|kind| {
            let power = technologies.rated_power(kind)?;
            let energy = match kind {
                TechnologyKind::Battery => {
                    technologies.battery.as_ref().map(|b| b.system_capacity_kwh)
                }
                _ => None,
            };

            let installed = installed_cost(cost_info, kind, power, energy);
            let annual_om = cost_info.om_cost_per_power(kind).map(|c| c * power);
            let annualised = technologies.fin_model(kind).and_then(|fin_model| {
                let crf = capital_recovery_factor(
                    fin_model.analysis_period()?,
                    fin_model.discount_rate()?,
                );
                installed.map(|cost| cost * crf)
            });

            Some(CostSummaryRow {
                technology: kind.to_string(),
                rated_power_kw: power,
                energy_capacity_kwh: energy,
                installed_cost: installed,
                annual_om_cost: annual_om,
                annualised_installed_cost: annualised,
                skip_financial: skip_financial(kind),
            })
        })
        .collect()
}
