//! Code for the technologies which make up a hybrid plant.
use crate::finance::FinancialModel;
use crate::site::Site;
use crate::units::Power;
use anyhow::{Context, Result, ensure};
use itertools::Itertools;
use log::warn;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

pub mod battery;
pub mod grid;
pub mod pv;
pub mod wave;
pub mod wind;
pub use battery::BatteryConfig;
pub use grid::GridConfig;
pub use pv::PvConfig;
pub use wave::WaveConfig;
pub use wind::{WindConfig, WindModel};

/// The kinds of technology which a plant can contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum TechnologyKind {
    /// A wind farm
    Wind,
    /// A solar PV plant
    Pv,
    /// An array of wave energy converters
    Wave,
    /// Battery storage
    Battery,
    /// The grid interconnection
    Grid,
}

impl TechnologyKind {
    /// Whether this technology generates electricity
    pub fn is_generator(self) -> bool {
        matches!(self, Self::Wind | Self::Pv | Self::Wave)
    }
}

/// The `technologies` section of a plant configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Technologies {
    /// Wind farm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind: Option<WindConfig>,
    /// Solar PV
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pv: Option<PvConfig>,
    /// Wave energy converters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wave: Option<WaveConfig>,
    /// Battery storage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery: Option<BatteryConfig>,
    /// Grid interconnection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<GridConfig>,
}

impl Technologies {
    /// Whether the given technology is configured
    pub fn contains(&self, kind: TechnologyKind) -> bool {
        match kind {
            TechnologyKind::Wind => self.wind.is_some(),
            TechnologyKind::Pv => self.pv.is_some(),
            TechnologyKind::Wave => self.wave.is_some(),
            TechnologyKind::Battery => self.battery.is_some(),
            TechnologyKind::Grid => self.grid.is_some(),
        }
    }

    /// The configured technologies, in a fixed order
    pub fn kinds(&self) -> impl Iterator<Item = TechnologyKind> {
        TechnologyKind::iter().filter(|kind| self.contains(*kind))
    }

    /// The financial model of the given technology, if it is configured
    pub fn fin_model(&self, kind: TechnologyKind) -> Option<&FinancialModel> {
        match kind {
            TechnologyKind::Wind => self.wind.as_ref().map(|t| &t.fin_model),
            TechnologyKind::Pv => self.pv.as_ref().map(|t| &t.fin_model),
            TechnologyKind::Wave => self.wave.as_ref().map(|t| &t.fin_model),
            TechnologyKind::Battery => self.battery.as_ref().map(|t| &t.fin_model),
            TechnologyKind::Grid => self.grid.as_ref().map(|t| &t.fin_model),
        }
    }

    /// The rated power of the given technology, if it is configured.
    ///
    /// For the grid this is the interconnection capacity.
    pub fn rated_power(&self, kind: TechnologyKind) -> Option<Power> {
        match kind {
            TechnologyKind::Wind => self.wind.as_ref().map(WindConfig::system_capacity),
            TechnologyKind::Pv => self.pv.as_ref().map(|t| t.system_capacity_kw),
            TechnologyKind::Wave => self.wave.as_ref().map(WaveConfig::system_capacity),
            TechnologyKind::Battery => self.battery.as_ref().map(|t| t.system_capacity_kw),
            TechnologyKind::Grid => self.grid.as_ref().map(|t| t.interconnect_kw),
        }
    }

    /// Total rated power of all generating technologies
    pub fn generation_capacity(&self) -> Power {
        self.kinds()
            .filter(|kind| kind.is_generator())
            .filter_map(|kind| self.rated_power(kind))
            .sum()
    }

    /// Check that the technologies are valid and consistent with the site
    pub fn validate(&self, site: &Site) -> Result<()> {
        ensure!(
            self.kinds().next().is_some(),
            "At least one technology must be configured"
        );

        if let Some(wind) = &self.wind {
            ensure!(site.wind, "The wind technology requires site.wind to be true");
            wind.validate().context("Invalid wind configuration")?;
        }
        if let Some(pv) = &self.pv {
            ensure!(site.solar, "The pv technology requires site.solar to be true");
            pv.validate().context("Invalid pv configuration")?;
        }
        if let Some(wave) = &self.wave {
            ensure!(site.wave, "The wave technology requires site.wave to be true");
            wave.validate().context("Invalid wave configuration")?;
        }
        if let Some(battery) = &self.battery {
            battery.validate().context("Invalid battery configuration")?;
        }
        if let Some(grid) = &self.grid {
            grid.validate().context("Invalid grid configuration")?;

            let generation = self.generation_capacity();
            if grid.interconnect_kw < generation {
                warn!(
                    "interconnect_kw ({} kW) is lower than the rated generation capacity \
                    ({} kW); output will be curtailed",
                    grid.interconnect_kw.value(),
                    generation.value()
                );
            }
        }

        self.check_analysis_periods();
        for kind in self.missing_discount_rates() {
            warn!(
                "The {kind} fin_model has no real_discount_rate, but other technologies do; \
                its annualised cost cannot be calculated"
            );
        }

        Ok(())
    }

    /// Technologies without a discount rate, when at least one other technology has one.
    ///
    /// This is typically caused by a merged `fin_model` whose local `financial_parameters`
    /// replaced the included ones.
    pub fn missing_discount_rates(&self) -> Vec<TechnologyKind> {
        let (with_rate, without_rate): (Vec<_>, Vec<_>) = self.kinds().partition(|kind| {
            self.fin_model(*kind)
                .and_then(FinancialModel::discount_rate)
                .is_some()
        });

        if with_rate.is_empty() {
            Vec::new()
        } else {
            without_rate
        }
    }

    /// Warn if technologies are analysed over different numbers of years
    fn check_analysis_periods(&self) {
        let periods: Vec<_> = self
            .kinds()
            .filter_map(|kind| {
                let period = self.fin_model(kind)?.analysis_period()?;
                Some((kind, period))
            })
            .collect();

        if !periods.iter().map(|(_, period)| period).all_equal() {
            warn!(
                "Technologies have different analysis periods: {}",
                periods
                    .iter()
                    .map(|(kind, period)| format!("{kind}={period}"))
                    .join(", ")
            );
        }
    }
}
