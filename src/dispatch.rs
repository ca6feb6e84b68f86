//! Simulation and dispatch options for the `config` section of a plant configuration.
use crate::cost::{CostInfo, om_cost_conflicts};
use crate::input::deserialise_proportion_nonzero;
use crate::site::Site;
use crate::technology::{Technologies, TechnologyKind};
use crate::units::Dimensionless;
use anyhow::{Context, Result, ensure};
use indexmap::IndexMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_string_enum::{DeserializeLabeledStringEnum, SerializeLabeledStringEnum};
use std::str::FromStr;

macro_rules! define_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            $value
        }
    };
}

define_param_default!(default_n_look_ahead_periods, u32, 48);
define_param_default!(default_time_weighting_factor, Dimensionless, Dimensionless(0.995));
define_param_default!(default_true, bool, true);

/// Per-technology simulation options
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SimulationOptions {
    /// Skip the financial model for this technology
    #[serde(default)]
    pub skip_financial: bool,
}

/// The strategy used to schedule battery charge and discharge
#[derive(
    Debug, Clone, Copy, PartialEq, Default, SerializeLabeledStringEnum, DeserializeLabeledStringEnum,
)]
pub enum BatteryDispatch {
    /// Optimised dispatch with a simple battery model
    #[default]
    #[string = "simple"]
    Simple,
    /// Heuristic which allows one full cycle per day
    #[string = "one_cycle_heuristic"]
    OneCycleHeuristic,
    /// Heuristic following a fixed schedule
    #[string = "heuristic"]
    Heuristic,
    /// Heuristic which follows the site's desired schedule
    #[string = "load_following_heuristic"]
    LoadFollowingHeuristic,
    /// Optimised dispatch with a non-convex linear-voltage battery model
    #[string = "non_convex_LV"]
    NonConvexLinearVoltage,
    /// Optimised dispatch with a convex linear-voltage battery model
    #[string = "convex_LV"]
    ConvexLinearVoltage,
}

impl BatteryDispatch {
    /// Whether this is a rule-based strategy, which does not use a solver
    pub fn is_heuristic(self) -> bool {
        matches!(
            self,
            Self::OneCycleHeuristic | Self::Heuristic | Self::LoadFollowingHeuristic
        )
    }
}

/// The solver used for optimised dispatch
#[derive(
    Debug, Clone, Copy, PartialEq, Default, SerializeLabeledStringEnum, DeserializeLabeledStringEnum,
)]
pub enum Solver {
    /// COIN-OR CBC
    #[default]
    #[string = "cbc"]
    Cbc,
    /// GNU Linear Programming Kit
    #[string = "glpk"]
    Glpk,
    /// Gurobi
    #[string = "gurobi"]
    Gurobi,
    /// Gurobi through AMPL
    #[string = "gurobi_ampl"]
    GurobiAmpl,
    /// FICO Xpress
    #[string = "xpress"]
    Xpress,
    /// FICO Xpress, keeping the model in memory between solves
    #[string = "xpress_persistent"]
    XpressPersistent,
}

/// Options controlling how the battery is dispatched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchOptions {
    /// Dispatch strategy
    #[serde(default)]
    pub battery_dispatch: BatteryDispatch,
    /// Solver for optimised dispatch
    #[serde(default)]
    pub solver: Solver,
    /// Number of hours in the look-ahead window
    #[serde(default = "default_n_look_ahead_periods")]
    pub n_look_ahead_periods: u32,
    /// Number of hours to advance between optimisations.
    ///
    /// If not given, this is 24 hours or the look-ahead window, whichever is shorter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_roll_periods: Option<u32>,
    /// Discount applied to revenue later in the look-ahead window
    #[serde(default = "default_time_weighting_factor")]
    #[serde(deserialize_with = "deserialise_proportion_nonzero")]
    pub time_weighting_factor: Dimensionless,
    /// Whether the battery can charge from the grid
    #[serde(default = "default_true")]
    pub grid_charging: bool,
    /// Whether the battery can only charge from PV
    #[serde(default)]
    pub pv_charging_only: bool,
    /// Whether battery cycle count is tracked in the objective
    #[serde(default = "default_true")]
    pub include_lifecycle_count: bool,
    /// Name of the solver log file. Empty for no log.
    #[serde(default)]
    pub log_name: String,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            battery_dispatch: BatteryDispatch::default(),
            solver: Solver::default(),
            n_look_ahead_periods: default_n_look_ahead_periods(),
            n_roll_periods: None,
            time_weighting_factor: default_time_weighting_factor(),
            grid_charging: true,
            pv_charging_only: false,
            include_lifecycle_count: true,
            log_name: String::new(),
        }
    }
}

/// Default roll period, capped at the look-ahead window
const DEFAULT_N_ROLL_PERIODS: u32 = 24;

impl DispatchOptions {
    /// The number of hours to advance between optimisations
    pub fn n_roll_periods(&self) -> u32 {
        self.n_roll_periods
            .unwrap_or_else(|| DEFAULT_N_ROLL_PERIODS.min(self.n_look_ahead_periods))
    }

    /// Check that the dispatch options are valid for the given plant
    pub fn validate(&self, technologies: &Technologies, site: &Site) -> Result<()> {
        ensure!(
            self.n_look_ahead_periods > 0,
            "n_look_ahead_periods cannot be zero"
        );
        if let Some(n_roll_periods) = self.n_roll_periods {
            ensure!(
                n_roll_periods > 0 && n_roll_periods <= self.n_look_ahead_periods,
                "n_roll_periods must be greater than zero and no more than n_look_ahead_periods"
            );
        }
        ensure!(
            !(self.pv_charging_only && self.grid_charging),
            "pv_charging_only and grid_charging cannot both be true"
        );
        if self.pv_charging_only {
            ensure!(
                technologies.pv.is_some(),
                "pv_charging_only requires the pv technology"
            );
        }

        if technologies.battery.is_none() {
            warn!("Dispatch options are given but there is no battery to dispatch");
        }

        if self.battery_dispatch == BatteryDispatch::LoadFollowingHeuristic
            && site.desired_schedule.is_empty()
        {
            warn!(
                "load_following_heuristic dispatch is selected but site.desired_schedule is \
                empty; a schedule must be provided before simulating"
            );
        }

        if self.battery_dispatch.is_heuristic() {
            debug!(
                "Heuristic dispatch selected; solver {:?} will not be used",
                self.solver
            );
        }

        Ok(())
    }
}

/// The `config` section of a plant configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    /// Simulation options for each technology, by name
    #[serde(default)]
    pub simulation_options: IndexMap<String, SimulationOptions>,
    /// Battery dispatch options
    #[serde(default)]
    pub dispatch_options: Option<DispatchOptions>,
    /// Unit costs for each technology
    #[serde(default)]
    pub cost_info: Option<CostInfo>,
}

impl SimulationConfig {
    /// The dispatch options, or the defaults if none were given
    pub fn dispatch_options(&self) -> DispatchOptions {
        self.dispatch_options.clone().unwrap_or_default()
    }

    /// Whether financial calculations are skipped for the given technology
    pub fn skip_financial(&self, kind: TechnologyKind) -> bool {
        self.simulation_options
            .get(&kind.to_string())
            .is_some_and(|options| options.skip_financial)
    }

    /// Check that the simulation options refer to known technologies
    fn validate_simulation_options(&self, technologies: &Technologies) -> Result<()> {
        for name in self.simulation_options.keys() {
            let kind = TechnologyKind::from_str(name)
                .ok()
                .with_context(|| format!("Unknown technology in simulation_options: {name}"))?;
            if !technologies.contains(kind) {
                warn!("simulation_options given for {kind}, which is not configured");
            }
        }

        Ok(())
    }

    /// Check that the simulation and dispatch options are valid for the given plant
    pub fn validate(&self, technologies: &Technologies, site: &Site) -> Result<()> {
        self.validate_simulation_options(technologies)?;
        if let Some(dispatch_options) = &self.dispatch_options {
            dispatch_options
                .validate(technologies, site)
                .context("Invalid dispatch_options")?;
        }
        if let Some(cost_info) = &self.cost_info {
            cost_info.validate().context("Invalid cost_info")?;
            for conflict in om_cost_conflicts(technologies, cost_info) {
                warn!("{conflict}");
            }
        }

        Ok(())
    }
}
