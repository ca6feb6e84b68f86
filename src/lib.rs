//! Loading and validation of hybrid power plant configuration files.
//!
//! A plant configuration describes a site (location, boundary and resources), the technologies
//! built there (wind, solar PV, battery storage and the grid interconnection), how the plant is
//! simulated and dispatched, and the unit costs of each technology. It is read from YAML, with
//! shared fragments pulled in using `!include`. See [`plant::PlantConfig`] for the entry point.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod cli;
pub mod cost;
pub mod dispatch;
pub mod finance;
pub mod input;
pub mod log;
pub mod output;
pub mod plant;
pub mod settings;
pub mod site;
pub mod technology;
pub mod units;

#[cfg(test)]
mod fixture;

/// Get the directory in which program-wide configuration is stored
pub fn get_config_dir() -> PathBuf {
    let Some(mut dir) = dirs::config_dir() else {
        // Fall back to the current directory if the user's config dir cannot be found
        return PathBuf::from(".");
    };

    dir.push("hybrid-plant");

    dir
}
