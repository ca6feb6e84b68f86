//! Defines the `PlantConfig` struct, which represents the contents of a whole plant configuration.
use crate::cost::{CostSummaryRow, summarise_costs};
use crate::dispatch::SimulationConfig;
use crate::input::{from_yaml_value, input_err_msg, read_yaml_value};
use crate::site::Site;
use crate::technology::Technologies;
use anyhow::{Context, Result};
use itertools::Itertools;
use log::info;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::path::Path;

/// A complete hybrid plant configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlantConfig {
    /// The site and its resources
    pub site: Site,
    /// Generation, storage and grid technologies
    pub technologies: Technologies,
    /// Simulation, dispatch and cost options
    #[serde(default)]
    pub config: SimulationConfig,
}

impl PlantConfig {
    /// Read and validate a plant configuration file.
    ///
    /// `!include` directives are expanded relative to the file which contains them.
    ///
    /// # Arguments
    ///
    /// * `file_path` - Path to the plant configuration file
    ///
    /// # Returns
    ///
    /// The plant configuration or an error if the file could not be read or is invalid
    pub fn from_path<P: AsRef<Path>>(file_path: P) -> Result<PlantConfig> {
        let file_path = file_path.as_ref();
        let value = read_yaml_value(file_path)?;
        Self::from_resolved(file_path, &value)
    }

    /// Build and validate a plant configuration from a document whose includes are expanded.
    ///
    /// # Arguments
    ///
    /// * `file_path` - Path the document was read from, used to find resource files
    /// * `value` - The resolved document
    pub fn from_resolved(file_path: &Path, value: &Value) -> Result<PlantConfig> {
        let plant: PlantConfig = from_yaml_value(file_path, value)?;

        let config_dir = file_path.parent().unwrap_or(Path::new("."));
        plant
            .validate(config_dir)
            .with_context(|| input_err_msg(file_path))?;

        info!(
            "Loaded plant with technologies: {}",
            plant.technologies.kinds().join(", ")
        );

        Ok(plant)
    }

    /// Validate the configuration after reading it in.
    ///
    /// # Arguments
    ///
    /// * `config_dir` - Directory containing the configuration file
    pub fn validate(&self, config_dir: &Path) -> Result<()> {
        self.site.validate(config_dir).context("Invalid site")?;
        self.technologies
            .validate(&self.site)
            .context("Invalid technologies")?;
        self.config
            .validate(&self.technologies, &self.site)
            .context("Invalid config")?;

        Ok(())
    }

    /// Summarise the size and cost of each technology
    pub fn summary(&self) -> Vec<CostSummaryRow> {
        summarise_costs(
            &self.technologies,
            self.config.cost_info.as_ref(),
            |kind| self.config.skip_financial(kind),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, plant};
    use crate::technology::TechnologyKind;
    use crate::units::Power;
    use rstest::rstest;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::tempdir;

    const FIN_CONFIG: &str = "
financial_parameters:
  analysis_period: 30
  real_discount_rate: 6.4
";

    const PLANT_CONFIG: &str = "
site:
  data:
    lat: 27.18624
    lon: -96.9516
    elev: 0
    year: 2013
    site_boundaries:
      verts: [[0, 0], [1000, 0], [1000, 1000], [0, 1000]]
  hub_height: 168.0
technologies:
  wind:
    num_turbines: 10
    turbine_rating_kw: 18000.0
    fin_model: !include fin.yaml
  grid:
    interconnect_kw: 200000
    fin_model: !include fin.yaml
config:
  simulation_options:
    wind:
      skip_financial: true
  cost_info:
    wind_installed_cost_mw: 1434000.0
";

    fn write_plant(dir: &Path, plant_config: &str) -> std::path::PathBuf {
        let file_path = dir.join("plant.yaml");
        {
            let mut file = File::create(&file_path).unwrap();
            write!(file, "{plant_config}").unwrap();
        }
        fs::write(dir.join("fin.yaml"), FIN_CONFIG).unwrap();

        file_path
    }

    #[test]
    fn test_from_path() {
        let dir = tempdir().unwrap();
        let file_path = write_plant(dir.path(), PLANT_CONFIG);

        let plant = PlantConfig::from_path(&file_path).unwrap();
        assert_eq!(
            plant.technologies.kinds().collect::<Vec<_>>(),
            [TechnologyKind::Wind, TechnologyKind::Grid]
        );
        let wind = plant.technologies.wind.as_ref().unwrap();
        assert_eq!(wind.fin_model.analysis_period(), Some(30));
        assert!(plant.config.skip_financial(TechnologyKind::Wind));
        assert!(plant.config.dispatch_options.is_none());

        let summary = plant.summary();
        assert_eq!(summary.len(), 2);
        assert!(summary[0].skip_financial);
        assert!(summary[0].installed_cost.is_some());
    }

    #[test]
    fn test_from_path_wave() {
        let dir = tempdir().unwrap();
        let plant_config = PLANT_CONFIG
            .replace(
                "  hub_height: 168.0\n",
                "  hub_height: 168.0\n  wave: true\n",
            )
            .replace(
                "  grid:\n",
                "  wave:\n    device_rating_kw: 286\n    num_devices: 100\n    \
                 fin_model: !include fin.yaml\n  grid:\n",
            );
        let file_path = write_plant(dir.path(), &plant_config);

        let plant = PlantConfig::from_path(&file_path).unwrap();
        let summary = plant.summary();
        assert_eq!(
            summary
                .iter()
                .map(|row| row.technology.as_str())
                .collect::<Vec<_>>(),
            ["wind", "wave", "grid"]
        );
        assert_eq!(summary[1].rated_power_kw, Power(28_600.0));
        assert!(summary[1].installed_cost.is_none());
    }

    #[test]
    fn test_from_path_wave_without_site_flag() {
        let dir = tempdir().unwrap();
        let plant_config = PLANT_CONFIG.replace(
            "  grid:\n",
            "  wave:\n    device_rating_kw: 286\n    num_devices: 100\n  grid:\n",
        );
        let file_path = write_plant(dir.path(), &plant_config);
        assert!(PlantConfig::from_path(&file_path).is_err());
    }

    #[test]
    fn test_from_resolved() {
        let dir = tempdir().unwrap();
        let file_path = write_plant(dir.path(), PLANT_CONFIG);

        let value = read_yaml_value(&file_path).unwrap();
        let plant = PlantConfig::from_resolved(&file_path, &value).unwrap();
        assert_eq!(plant, PlantConfig::from_path(&file_path).unwrap());

        // The resolved document has no include tags left to expand
        let written = serde_yaml::to_string(&value).unwrap();
        assert!(!written.contains("!include"));
        assert!(written.contains("real_discount_rate"));
    }

    #[test]
    fn test_from_path_invalid() {
        let dir = tempdir().unwrap();
        let file_path = write_plant(
            dir.path(),
            &PLANT_CONFIG.replace("num_turbines: 10", "num_turbines: 0"),
        );

        let result = PlantConfig::from_path(&file_path);
        assert_error!(result, input_err_msg(&file_path));
    }

    #[test]
    fn test_from_path_unknown_section() {
        let dir = tempdir().unwrap();
        let file_path = write_plant(dir.path(), &format!("{PLANT_CONFIG}\nextra: 1\n"));
        assert!(PlantConfig::from_path(&file_path).is_err());
    }

    #[rstest]
    fn test_validate_ok(plant: PlantConfig) {
        let dir = tempdir().unwrap();
        assert!(plant.validate(dir.path()).is_ok());
    }

    #[rstest]
    fn test_validate_wraps_section_errors(mut plant: PlantConfig) {
        let dir = tempdir().unwrap();
        plant.site.data.lat = 100.0;
        assert_error!(plant.validate(dir.path()), "Invalid site");
    }

    #[rstest]
    fn test_serialise_round_trip(plant: PlantConfig) {
        let yaml = serde_yaml::to_string(&plant).unwrap();
        let parsed: PlantConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, plant);
    }
}
