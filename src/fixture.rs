//! Fixtures for tests
use crate::cost::CostInfo;
use crate::dispatch::{BatteryDispatch, DispatchOptions, SimulationConfig, SimulationOptions};
use crate::finance::{FinancialModel, FinancialParameters};
use crate::plant::PlantConfig;
use crate::site::{Polygon, Site, SiteBoundaries, SiteData, WindResourceOrigin};
use crate::technology::{
    BatteryConfig, GridConfig, PvConfig, Technologies, WaveConfig, WindConfig, WindModel,
};
use crate::units::{Energy, Power};
use indexmap::indexmap;
use rstest::fixture;
use serde_yaml::Mapping;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

#[fixture]
pub fn site() -> Site {
    Site {
        data: SiteData {
            lat: 27.18624,
            lon: -96.9516,
            elev: 0.0,
            year: 2013,
            site_boundaries: SiteBoundaries {
                verts: Polygon(vec![
                    [3.06, 288.87].into(),
                    [0.0, 1084.03].into(),
                    [1784.05, 1084.24].into(),
                    [1794.09, 999.64].into(),
                    [1494.34, 950.97].into(),
                    [712.64, 262.8].into(),
                    [1216.98, 272.36].into(),
                    [1217.76, 151.62].into(),
                    [708.14, 0.0].into(),
                ]),
                verts_simple: Some(Polygon(vec![
                    [3.06, 288.87].into(),
                    [0.0, 1084.03].into(),
                    [1784.05, 1084.24].into(),
                    [1794.09, 999.64].into(),
                    [708.14, 0.0].into(),
                ])),
            },
        },
        solar_resource_file: String::new(),
        wind_resource_file: String::new(),
        wave_resource_file: String::new(),
        grid_resource_file: String::new(),
        hub_height: Some(168.0),
        solar: true,
        wind: true,
        wave: false,
        wind_resource_origin: WindResourceOrigin::Wtk,
        desired_schedule: Vec::new(),
    }
}

#[fixture]
pub fn fin_model() -> FinancialModel {
    FinancialModel {
        financial_parameters: FinancialParameters {
            analysis_period: Some(30),
            inflation_rate: Some(2.5),
            real_discount_rate: Some(6.4),
            debt_percent: Some(68.5),
            other: Mapping::new(),
        },
        other: Mapping::new(),
    }
}

#[fixture]
pub fn wind(fin_model: FinancialModel) -> WindConfig {
    let mut floris_config = Mapping::new();
    floris_config.insert("name".into(), "floris_input_osw_18MW".into());

    WindConfig {
        num_turbines: 74,
        turbine_rating_kw: Power(18_000.0),
        model_name: WindModel::Floris,
        timestep: [0, 8760],
        floris_config: Some(floris_config),
        fin_model,
    }
}

#[fixture]
pub fn pv(fin_model: FinancialModel) -> PvConfig {
    PvConfig {
        system_capacity_kw: Power(100_000.0),
        dc_degradation: vec![0.5],
        fin_model,
    }
}

#[fixture]
pub fn wave(fin_model: FinancialModel) -> WaveConfig {
    WaveConfig {
        device_rating_kw: Power(286.0),
        num_devices: 100,
        wave_power_matrix: None,
        fin_model,
    }
}

#[fixture]
pub fn battery(fin_model: FinancialModel) -> BatteryConfig {
    BatteryConfig {
        system_capacity_kwh: Energy(375_000.0),
        system_capacity_kw: Power(375_000.0),
        minimum_soc: 20.0,
        maximum_soc: 100.0,
        initial_soc: 90.0,
        fin_model,
    }
}

#[fixture]
pub fn grid(fin_model: FinancialModel) -> GridConfig {
    GridConfig {
        interconnect_kw: Power(2_000_000.0),
        fin_model,
    }
}

#[fixture]
pub fn technologies(
    wind: WindConfig,
    pv: PvConfig,
    battery: BatteryConfig,
    grid: GridConfig,
) -> Technologies {
    Technologies {
        wind: Some(wind),
        pv: Some(pv),
        wave: None,
        battery: Some(battery),
        grid: Some(grid),
    }
}

#[fixture]
pub fn cost_info() -> CostInfo {
    CostInfo {
        wind_installed_cost_mw: Some(1_434_000.0),
        solar_installed_cost_mw: Some(1_089_000.0),
        storage_installed_cost_mw: Some(0.0),
        storage_installed_cost_mwh: Some(237_000.0),
        wind_om_per_kw: Some(29.567),
        pv_om_per_kw: Some(15.0),
        battery_om_per_kw: Some(2.0),
    }
}

#[fixture]
pub fn simulation_config(cost_info: CostInfo) -> SimulationConfig {
    SimulationConfig {
        simulation_options: indexmap! {
            "wind".to_string() => SimulationOptions { skip_financial: true },
        },
        dispatch_options: Some(DispatchOptions {
            battery_dispatch: BatteryDispatch::Heuristic,
            grid_charging: false,
            include_lifecycle_count: false,
            ..Default::default()
        }),
        cost_info: Some(cost_info),
    }
}

#[fixture]
pub fn plant(
    site: Site,
    technologies: Technologies,
    simulation_config: SimulationConfig,
) -> PlantConfig {
    PlantConfig {
        site,
        technologies,
        config: simulation_config,
    }
}
