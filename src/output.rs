//! The module responsible for writing output data to disk.
use crate::cost::CostSummaryRow;
use anyhow::{Context, Result, ensure};
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// The root folder in which plant-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "hybrid_plant_results";

/// The output file name for the plant summary
pub const SUMMARY_FILE_NAME: &str = "plant_summary.csv";

/// The output file name for the configuration with includes expanded
pub const RESOLVED_CONFIG_FILE_NAME: &str = "resolved_config.yaml";

/// Get the default output folder for the given configuration file.
///
/// This is named after the file's stem, e.g. `hybrid_plant_results/hopp_config`.
pub fn get_output_dir(config_path: &Path) -> Result<PathBuf> {
    let plant_name = config_path
        .file_stem()
        .context("Configuration path has no file name")?
        .to_str()
        .context("Invalid chars in configuration file name")?;

    Ok([OUTPUT_DIRECTORY_ROOT, plant_name].iter().collect())
}

/// Create a new output directory.
///
/// # Arguments
///
/// * `output_dir` - The folder to create
/// * `allow_overwrite` - Whether an existing, non-empty folder may be reused
///
/// # Returns
///
/// Whether an existing folder with files in it will be overwritten
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    if output_dir.is_dir() {
        let is_empty = fs::read_dir(output_dir)?.next().is_none();
        if is_empty {
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder {} already exists and is not empty. Use --overwrite to replace it.",
            output_dir.display()
        );
        return Ok(true);
    }

    fs::create_dir_all(output_dir)?;

    Ok(false)
}

/// Write the plant summary to a CSV file in `output_path`
pub fn write_summary(output_path: &Path, rows: &[CostSummaryRow]) -> Result<()> {
    let file_path = output_path.join(SUMMARY_FILE_NAME);
    let mut writer = csv::Writer::from_path(&file_path)
        .with_context(|| format!("Could not create {}", file_path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Write a YAML document to a file in `output_path`
pub fn write_resolved(output_path: &Path, value: &Value) -> Result<()> {
    let file_path = output_path.join(RESOLVED_CONFIG_FILE_NAME);
    let yaml = serde_yaml::to_string(value)?;
    fs::write(&file_path, yaml)
        .with_context(|| format!("Could not write {}", file_path.display()))?;

    Ok(())
}
