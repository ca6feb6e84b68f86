//! Wave energy converter configuration.
use crate::finance::FinancialModel;
use crate::input::check_positive;
use crate::units::Power;
use anyhow::{Result, ensure};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// The `technologies.wave` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveConfig {
    /// Rated power of a single device
    pub device_rating_kw: Power,
    /// Number of devices in the array
    pub num_devices: u32,
    /// Device power (kW) by wave height (rows) and wave period (columns)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wave_power_matrix: Option<Vec<Vec<f64>>>,
    /// Financial model for the wave array
    #[serde(default)]
    pub fin_model: FinancialModel,
}

impl WaveConfig {
    /// Rated power of the whole array
    pub fn system_capacity(&self) -> Power {
        Power(self.device_rating_kw.value() * f64::from(self.num_devices))
    }

    /// Check that the wave configuration is valid
    pub fn validate(&self) -> Result<()> {
        ensure!(self.num_devices > 0, "num_devices cannot be zero");
        check_positive("device_rating_kw", self.device_rating_kw.value())?;

        if let Some(matrix) = &self.wave_power_matrix {
            ensure!(
                !matrix.is_empty() && matrix.iter().map(Vec::len).all_equal(),
                "wave_power_matrix must be a non-empty table with rows of equal length"
            );
            ensure!(
                matrix.iter().flatten().all(|x| x.is_finite()),
                "wave_power_matrix must only contain finite numbers"
            );
        }

        self.fin_model.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, wave};
    use rstest::rstest;

    #[rstest]
    fn test_system_capacity(wave: WaveConfig) {
        assert_eq!(wave.system_capacity(), Power(28_600.0));
    }

    #[rstest]
    fn test_validate_ok(wave: WaveConfig) {
        assert!(wave.validate().is_ok());
    }

    #[rstest]
    fn test_validate_no_devices(mut wave: WaveConfig) {
        wave.num_devices = 0;
        assert_error!(wave.validate(), "num_devices cannot be zero");
    }

    #[rstest]
    #[case(vec![vec![0.0, 1.0], vec![2.0, 3.0]], true)]
    #[case(vec![vec![0.0, 1.0], vec![2.0]], false)]
    #[case(vec![], false)]
    #[case(vec![vec![f64::NAN]], false)]
    fn test_validate_power_matrix(
        mut wave: WaveConfig,
        #[case] matrix: Vec<Vec<f64>>,
        #[case] expected_valid: bool,
    ) {
        wave.wave_power_matrix = Some(matrix);
        assert_eq!(wave.validate().is_ok(), expected_valid);
    }

    #[test]
    fn test_deserialise() {
        let yaml = "device_rating_kw: 286\nnum_devices: 100\n";
        let wave: WaveConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(wave.system_capacity(), Power(28_600.0));
        assert!(wave.wave_power_matrix.is_none());
    }
}
