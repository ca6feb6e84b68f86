//! Code for the site section of a plant configuration.
use crate::input::check_positive;
use anyhow::{Context, Result, ensure};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_string_enum::{DeserializeLabeledStringEnum, SerializeLabeledStringEnum};
use std::path::{Path, PathBuf};

pub mod boundary;
pub use boundary::{BoundingBox, Polygon, Vertex, Winding};

/// The earliest resource year which can be requested
const MIN_RESOURCE_YEAR: u32 = 1900;

fn default_true() -> bool {
    true
}

/// Where wind resource data comes from
#[derive(
    Debug, Clone, Copy, PartialEq, Default, SerializeLabeledStringEnum, DeserializeLabeledStringEnum,
)]
pub enum WindResourceOrigin {
    /// The Wind Integration National Dataset toolkit
    #[default]
    #[string = "WTK"]
    Wtk,
    /// The TAP resource API
    #[string = "TAP"]
    Tap,
}

/// The polygon boundaries of a site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteBoundaries {
    /// The full-fidelity boundary
    pub verts: Polygon,
    /// A simplified boundary with fewer vertices
    #[serde(default)]
    pub verts_simple: Option<Polygon>,
}

/// Location and layout of a site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteData {
    /// Latitude (decimal degrees)
    pub lat: f64,
    /// Longitude (decimal degrees)
    pub lon: f64,
    /// Elevation (m)
    #[serde(default)]
    pub elev: f64,
    /// The year of resource data to use
    pub year: u32,
    /// Boundaries of the site
    pub site_boundaries: SiteBoundaries,
}

/// The `site` section of a plant configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    /// Location and layout
    pub data: SiteData,
    /// Path to a solar resource file. Empty means the resource is downloaded.
    #[serde(default)]
    pub solar_resource_file: String,
    /// Path to a wind resource file. Empty means the resource is downloaded.
    #[serde(default)]
    pub wind_resource_file: String,
    /// Path to a wave resource file. Empty means no wave resource.
    #[serde(default)]
    pub wave_resource_file: String,
    /// Path to a grid price file. Empty means the default price signal.
    #[serde(default)]
    pub grid_resource_file: String,
    /// Hub height used when fetching the wind resource (m)
    #[serde(default)]
    pub hub_height: Option<f64>,
    /// Whether the solar resource is loaded
    #[serde(default = "default_true")]
    pub solar: bool,
    /// Whether the wind resource is loaded
    #[serde(default = "default_true")]
    pub wind: bool,
    /// Whether the wave resource is loaded
    #[serde(default)]
    pub wave: bool,
    /// Where to obtain wind resource data
    #[serde(default)]
    pub wind_resource_origin: WindResourceOrigin,
    /// Hourly load (MW) to follow with load-following dispatch
    #[serde(default)]
    pub desired_schedule: Vec<f64>,
}

impl Site {
    /// The named resource files which have been given, in a fixed order
    pub fn resource_files(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("solar_resource_file", self.solar_resource_file.as_str()),
            ("wind_resource_file", self.wind_resource_file.as_str()),
            ("wave_resource_file", self.wave_resource_file.as_str()),
            ("grid_resource_file", self.grid_resource_file.as_str()),
        ]
        .into_iter()
        .filter(|(_, path)| !path.is_empty())
    }

    /// Resource files which cannot be found relative to `config_dir`
    pub fn missing_resource_files(&self, config_dir: &Path) -> Vec<PathBuf> {
        self.resource_files()
            .map(|(_, path)| config_dir.join(path))
            .filter(|path| !path.is_file())
            .collect()
    }

    /// Check that the site is valid.
    ///
    /// # Arguments
    ///
    /// * `config_dir` - Directory containing the configuration file, used to find resource files
    pub fn validate(&self, config_dir: &Path) -> Result<()> {
        let data = &self.data;
        ensure!(
            (-90.0..=90.0).contains(&data.lat),
            "lat must be between -90 and 90 degrees"
        );
        ensure!(
            (-180.0..=180.0).contains(&data.lon),
            "lon must be between -180 and 180 degrees"
        );
        ensure!(data.elev.is_finite(), "elev must be a finite number");
        ensure!(
            data.year >= MIN_RESOURCE_YEAR,
            "year must be {MIN_RESOURCE_YEAR} or later"
        );
        if let Some(hub_height) = self.hub_height {
            check_positive("hub_height", hub_height)?;
        }

        data.site_boundaries
            .verts
            .validate()
            .context("Invalid site boundary (verts)")?;
        if let Some(verts_simple) = &data.site_boundaries.verts_simple {
            verts_simple
                .validate()
                .context("Invalid site boundary (verts_simple)")?;
        }

        ensure!(
            self.desired_schedule.iter().all(|x| x.is_finite()),
            "desired_schedule must only contain finite numbers"
        );

        // The engine may find resource files elsewhere, so this is not fatal
        for path in self.missing_resource_files(config_dir) {
            warn!("Resource file not found: {}", path.display());
        }

        Ok(())
    }
}
