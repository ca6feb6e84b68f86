//! Integration tests for loading the bundled example plants.
use float_cmp::assert_approx_eq;
use hybrid_plant::plant::PlantConfig;
use hybrid_plant::technology::TechnologyKind;
use hybrid_plant::units::Power;
use rstest::rstest;
use std::path::PathBuf;

fn config_path(name: &str) -> PathBuf {
    ["demos", name, "hopp_config.yaml"].iter().collect()
}

#[rstest]
#[case("offshore_gom", 4)]
#[case("onshore_wind_pv", 3)]
fn test_load_example(#[case] name: &str, #[case] num_technologies: usize) {
    let plant = PlantConfig::from_path(config_path(name)).unwrap();
    assert_eq!(plant.technologies.kinds().count(), num_technologies);
    assert_eq!(plant.summary().len(), num_technologies);
}

#[test]
fn test_offshore_gom_includes() {
    let plant = PlantConfig::from_path(config_path("offshore_gom")).unwrap();
    let technologies = &plant.technologies;

    let wind = technologies.wind.as_ref().unwrap();
    assert_eq!(wind.system_capacity(), Power(1_332_000.0));
    let floris = wind.floris_config.as_ref().unwrap();
    assert_eq!(
        floris.get("name").and_then(|v| v.as_str()),
        Some("floris_input_osw_18MW")
    );

    // The merged financial model keeps the shared parameters as well as its own keys
    let pv = technologies.pv.as_ref().unwrap();
    assert_eq!(pv.fin_model.analysis_period(), Some(30));
    assert!(pv.fin_model.other.contains_key("system_costs"));
    assert_eq!(pv.dc_degradation.len(), 30);

    for kind in technologies.kinds() {
        let discount_rate = technologies.fin_model(kind).unwrap().discount_rate().unwrap();
        assert_approx_eq!(f64, discount_rate.value(), 0.064);
    }

    assert!(!plant.config.skip_financial(TechnologyKind::Wind));
    assert!(
        plant
            .config
            .dispatch_options()
            .battery_dispatch
            .is_heuristic()
    );
}
