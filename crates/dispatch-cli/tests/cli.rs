//! End-to-end smoke test driving the `dispatch` binary against a scratch
//! scenario directory, mirroring `gat-cli/tests/cli.rs`'s
//! `Command::cargo_bin` + `assert_cmd` style.

use assert_cmd::Command;
use std::fs;
use std::path::Path;

fn write_series_csv(dir: &Path) {
    fs::write(
        dir.join("series.csv"),
        "t,gas_price,power_price,hydrogen_price,heat_demand,local_heat_demand,pv_profile,solar_thermal_profile\n\
         1,0.0,0.0,0.0,0.0,0.0,0.0,0.0\n\
         2,0.0,0.0,0.0,0.0,0.0,0.0,0.0\n",
    )
    .unwrap();
}

fn write_chp_csv(dir: &Path, name: &str) {
    fs::write(
        dir.join(format!("{name}.csv")),
        "index,power,gas,heat,co2,waste_heat\n\
         min,1,2,0.5,0.4,0.1\n\
         max,10,15,6,3,2\n",
    )
    .unwrap();
}

fn write_battery_csv(dir: &Path) {
    fs::write(
        dir.join("battery.csv"),
        "index,power_max,content_min,content_max,initial_content\n\
         value,2,0,10,0\n",
    )
    .unwrap();
}

fn write_simple_store_csv(dir: &Path, name: &str) {
    fs::write(
        dir.join(format!("{name}.csv")),
        "index,flow_max,content_min,content_max,initial_content,k_loss\n\
         value,3,0,20,0,0\n",
    )
    .unwrap();
}

fn write_stratified_store_csv(dir: &Path) {
    fs::write(
        dir.join("stratified_store.csv"),
        "index,heat_max,initial_volume_share_z1,initial_fill\n\
         value,2,0.5,0\n",
    )
    .unwrap();
}

fn write_config_json(dir: &Path) {
    let config = serde_json::json!({
        "parameters": {
            "CO2_PRICE": 0.0,
            "HEAT_PRICE": 0.0,
        },
        "timeseries": {
            "gas_price": {"file": "series.csv", "index": "t", "param": "gas_price"},
            "power_price": {"file": "series.csv", "index": "t", "param": "power_price"},
            "hydrogen_price": {"file": "series.csv", "index": "t", "param": "hydrogen_price"},
            "heat_demand": {"file": "series.csv", "index": "t", "param": "heat_demand"},
            "local_heat_demand": {"file": "series.csv", "index": "t", "param": "local_heat_demand"},
            "pv_profile": {"file": "series.csv", "index": "t", "param": "pv_profile"},
            "solar_thermal_profile": {"file": "series.csv", "index": "t", "param": "solar_thermal_profile"},
        },
    });
    fs::write(
        dir.join("smoke.json"),
        serde_json::to_string_pretty(&config).unwrap(),
    )
    .unwrap();
}

fn write_scenario(dir: &Path) {
    write_config_json(dir);
    write_series_csv(dir);
    write_chp_csv(dir, "chp_1");
    write_chp_csv(dir, "chp_2");
    write_battery_csv(dir);
    write_simple_store_csv(dir, "heat_store");
    write_simple_store_csv(dir, "hydrogen_store");
    write_simple_store_csv(dir, "geothermal_store");
    write_stratified_store_csv(dir);
}

#[test]
fn run_solves_a_single_config_and_writes_artifacts() {
    let config_dir = tempfile::tempdir().unwrap();
    write_scenario(config_dir.path());
    let output_root = tempfile::tempdir().unwrap();

    let mut cmd = Command::cargo_bin("dispatch").unwrap();
    cmd.args([
        "run",
        "--config-dir",
        config_dir.path().to_str().unwrap(),
        "--config",
        "smoke",
        "--output-root",
        output_root.path().to_str().unwrap(),
    ])
    .assert()
    .success();

    let scenario_dir = output_root.path().join("smoke");
    let entries: Vec<_> = fs::read_dir(&scenario_dir)
        .unwrap_or_else(|e| panic!("expected '{}' to exist: {e}", scenario_dir.display()))
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert!(entries.iter().any(|name| name.ends_with("_output.csv")), "{entries:?}");
    assert!(entries.iter().any(|name| name.ends_with("_costs.json")), "{entries:?}");
    assert!(entries.iter().any(|name| name.ends_with("_metadata.json")), "{entries:?}");
    assert!(entries.iter().any(|name| name.ends_with("_solver.log")), "{entries:?}");
}

#[test]
fn run_rejects_use_case_prefix_with_no_matches() {
    let config_dir = tempfile::tempdir().unwrap();
    write_scenario(config_dir.path());
    let output_root = tempfile::tempdir().unwrap();

    let mut cmd = Command::cargo_bin("dispatch").unwrap();
    cmd.args([
        "run",
        "--config-dir",
        config_dir.path().to_str().unwrap(),
        "--use-case",
        "winter",
        "--output-root",
        output_root.path().to_str().unwrap(),
    ])
    .assert()
    .failure();
}
