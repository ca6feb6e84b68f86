//! Battery storage configuration.
use crate::finance::FinancialModel;
use crate::input::{check_positive, deserialise_percentage};
use crate::units::{Energy, Hours, Power};
use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

/// The `technologies.battery` section.
///
/// State of charge (SOC) values are percentages of the energy capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatteryConfig {
    /// Energy capacity
    pub system_capacity_kwh: Energy,
    /// Power rating
    pub system_capacity_kw: Power,
    /// Lowest permitted SOC (%)
    #[serde(rename = "minimum_SOC", default, deserialize_with = "deserialise_percentage")]
    pub minimum_soc: f64,
    /// Highest permitted SOC (%)
    #[serde(
        rename = "maximum_SOC",
        default = "default_maximum_soc",
        deserialize_with = "deserialise_percentage"
    )]
    pub maximum_soc: f64,
    /// SOC at the start of the simulation (%)
    #[serde(
        rename = "initial_SOC",
        default = "default_initial_soc",
        deserialize_with = "deserialise_percentage"
    )]
    pub initial_soc: f64,
    /// Financial model for the battery
    #[serde(default)]
    pub fin_model: FinancialModel,
}

fn default_maximum_soc() -> f64 {
    100.0
}

fn default_initial_soc() -> f64 {
    50.0
}

impl BatteryConfig {
    /// How long the battery can discharge at its power rating from full
    pub fn duration(&self) -> Hours {
        self.system_capacity_kwh / self.system_capacity_kw
    }

    /// The energy which can be cycled between the SOC limits
    pub fn usable_energy(&self) -> Energy {
        Energy(self.system_capacity_kwh.value() * (self.maximum_soc - self.minimum_soc) / 100.0)
    }

    /// Check that the battery configuration is valid
    pub fn validate(&self) -> Result<()> {
        check_positive("system_capacity_kwh", self.system_capacity_kwh.value())?;
        check_positive("system_capacity_kw", self.system_capacity_kw.value())?;
        ensure!(
            self.minimum_soc < self.maximum_soc,
            "minimum_SOC must be less than maximum_SOC"
        );
        ensure!(
            (self.minimum_soc..=self.maximum_soc).contains(&self.initial_soc),
            "initial_SOC must be between minimum_SOC and maximum_SOC"
        );

        self.fin_model.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, battery};
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    #[rstest]
    fn test_duration(battery: BatteryConfig) {
        assert_eq!(battery.duration(), Hours(1.0));
        assert_approx_eq!(f64, battery.usable_energy().value(), 375_000.0 * 0.8);
    }

    #[rstest]
    fn test_validate_ok(battery: BatteryConfig) {
        assert!(battery.validate().is_ok());
    }

    #[rstest]
    #[case(20.0, 100.0, 90.0, true)]
    #[case(20.0, 100.0, 20.0, true)]
    #[case(20.0, 100.0, 100.0, true)]
    #[case(20.0, 100.0, 10.0, false)]
    #[case(50.0, 50.0, 50.0, false)]
    #[case(60.0, 40.0, 50.0, false)]
    fn test_validate_soc(
        mut battery: BatteryConfig,
        #[case] minimum_soc: f64,
        #[case] maximum_soc: f64,
        #[case] initial_soc: f64,
        #[case] expected_valid: bool,
    ) {
        battery.minimum_soc = minimum_soc;
        battery.maximum_soc = maximum_soc;
        battery.initial_soc = initial_soc;
        assert_eq!(battery.validate().is_ok(), expected_valid);
    }

    #[rstest]
    fn test_validate_initial_soc_message(mut battery: BatteryConfig) {
        battery.initial_soc = 10.0;
        assert_error!(
            battery.validate(),
            "initial_SOC must be between minimum_SOC and maximum_SOC"
        );
    }

    #[test]
    fn test_deserialise() {
        let yaml = "
system_capacity_kwh: 375000
system_capacity_kw: 375000
minimum_SOC: 20.0
maximum_SOC: 100.0
initial_SOC: 90.0
";
        let battery: BatteryConfig = serde_yaml::from_str(yaml).unwrap();
        assert_approx_eq!(f64, battery.minimum_soc, 20.0);
        assert_approx_eq!(f64, battery.initial_soc, 90.0);

        let yaml = "system_capacity_kwh: 1\nsystem_capacity_kw: 1\nmaximum_SOC: 120\n";
        assert!(serde_yaml::from_str::<BatteryConfig>(yaml).is_err());
    }
}
