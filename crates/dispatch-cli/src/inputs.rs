//! Resolves a loaded [`ScenarioConfig`] plus its on-disk asset-parameter
//! CSVs into the [`dispatch_algo::ModelInputs`] the model assembler needs.
//!
//! Asset envelope/scalar values live in `<config_dir>/<asset>.csv` using
//! the `index,<col1>,<col2>,...` shape `dispatch-io::load_asset_params`
//! already reads; CHP honors admixture-specific file naming
//! (`<asset>_h2_<pct>.csv`), falling back to the base file with a warning
//! when the specific variant is absent. Every asset's columns are checked
//! against a fixed whitelist before the values are read, so a stray or
//! misspelled column fails fast with `DispatchError::UnknownOption`
//! instead of silently being ignored.

use std::path::{Path, PathBuf};

use dispatch_algo::model::{ModelInputs, ScalarPrices};
use dispatch_algo::assets::battery::BatteryParams;
use dispatch_algo::assets::chp::ChpParams;
use dispatch_algo::assets::pv::PvParams;
use dispatch_algo::assets::simple_store::SimpleStoreParams;
use dispatch_algo::assets::solar_thermal::SolarThermalParams;
use dispatch_algo::assets::stratified_store::StratifiedStoreParams;
use dispatch_core::{Carrier, DispatchError, DispatchResult, TimeIndex};
use dispatch_schemas::ScenarioConfig;

fn scalar(config: &ScenarioConfig, key: &str) -> DispatchResult<f64> {
    config
        .parameter(key)
        .ok_or_else(|| DispatchError::ConfigInvalid(format!("missing required scalar parameter '{key}'")))
}

fn scalar_or(config: &ScenarioConfig, key: &str, default: f64) -> f64 {
    config.parameter(key).unwrap_or(default)
}

fn series(config: &ScenarioConfig, config_dir: &Path, key: &str) -> DispatchResult<Vec<f64>> {
    let reference = config
        .timeseries
        .get(key)
        .ok_or_else(|| DispatchError::InputMissing(format!("no timeseries entry named '{key}'")))?;
    dispatch_io::load_timeseries(&config_dir.join(&reference.file), &reference.param)
}

fn asset_csv_path(config_dir: &Path, name: &str) -> PathBuf {
    config_dir.join(format!("{name}.csv"))
}

/// Rejects any column in `table` that isn't in `allowed`, before the value
/// it carries ever reaches model construction.
fn check_columns(table: &dispatch_schemas::AssetParamTable, asset: &str, allowed: &[&str]) -> DispatchResult<()> {
    for column in table.columns() {
        if !allowed.contains(&column) {
            return Err(DispatchError::UnknownOption {
                asset: asset.to_string(),
                key: column.to_string(),
            });
        }
    }
    Ok(())
}

/// Resolves the CHP admixture-specific parameter file, falling back to the
/// base file with a warning if the specific variant is missing.
fn chp_table_path(config_dir: &Path, name: &str, admixture_factor: f64) -> PathBuf {
    let base = asset_csv_path(config_dir, name);
    if admixture_factor <= 0.0 {
        return base;
    }
    let pct = (admixture_factor * 100.0).round() as i64;
    let variant = config_dir.join(format!("{name}_h2_{pct}.csv"));
    if variant.exists() {
        variant
    } else {
        tracing::warn!(
            asset = name,
            admixture_factor,
            "no admixture-specific parameter file for '{pct}%'; falling back to base parameters"
        );
        base
    }
}

fn load_chp(config_dir: &Path, name: &str, config: &ScenarioConfig, admixture_key: &str) -> DispatchResult<ChpParams> {
    let admixture_factor = scalar_or(config, admixture_key, 0.0);
    let path = chp_table_path(config_dir, name, admixture_factor);
    let table = dispatch_io::load_asset_params(&path)?;
    check_columns(
        &table,
        name,
        &["power", "gas", "heat", "co2", "waste_heat", "forced_operation_time"],
    )?;
    let envelope = |column: &str| -> DispatchResult<(f64, f64)> {
        let min = table
            .min(column)
            .ok_or_else(|| DispatchError::ConfigInvalid(format!("{}: missing min.{column}", path.display())))?;
        let max = table
            .max(column)
            .ok_or_else(|| DispatchError::ConfigInvalid(format!("{}: missing max.{column}", path.display())))?;
        Ok((min, max))
    };
    Ok(ChpParams {
        name: name.to_string(),
        power: envelope("power")?,
        gas: envelope("gas")?,
        heat: envelope("heat")?,
        co2: envelope("co2")?,
        waste_heat: envelope("waste_heat")?,
        hydrogen_admixture_factor: admixture_factor,
        forced_operation_time: table.value("forced_operation_time").map(|v| v as u32),
    })
}

fn load_battery(config_dir: &Path, config: &ScenarioConfig) -> DispatchResult<BatteryParams> {
    let path = asset_csv_path(config_dir, "battery");
    let table = dispatch_io::load_asset_params(&path)?;
    check_columns(
        &table,
        "battery",
        &["power_max", "content_min", "content_max", "initial_content"],
    )?;
    let get = |column: &str| -> DispatchResult<f64> {
        table
            .value(column)
            .ok_or_else(|| DispatchError::ConfigInvalid(format!("{}: missing value.{column}", path.display())))
    };
    Ok(BatteryParams {
        name: "battery".to_string(),
        power_max: get("power_max")?,
        content_min: get("content_min")?,
        content_max: get("content_max")?,
        initial_content: table.value("initial_content").unwrap_or(0.0),
        cyclic_behaviour: config
            .parameter("BATTERY_CYCLIC_BEHAVIOUR_HOURS")
            .map(|v| v as u32),
    })
}

fn load_simple_store(config_dir: &Path, name: &str, carrier: Carrier) -> DispatchResult<SimpleStoreParams> {
    let path = asset_csv_path(config_dir, name);
    let table = dispatch_io::load_asset_params(&path)?;
    check_columns(
        &table,
        name,
        &["flow_max", "content_min", "content_max", "initial_content", "k_loss"],
    )?;
    let get = |column: &str| -> DispatchResult<f64> {
        table
            .value(column)
            .ok_or_else(|| DispatchError::ConfigInvalid(format!("{}: missing value.{column}", path.display())))
    };
    Ok(SimpleStoreParams {
        name: name.to_string(),
        carrier,
        flow_max: get("flow_max")?,
        content_min: get("content_min")?,
        content_max: get("content_max")?,
        initial_content: table.value("initial_content").unwrap_or(0.0),
        k_loss: table.value("k_loss").unwrap_or(0.0),
    })
}

fn load_stratified_store(config_dir: &Path, config: &ScenarioConfig) -> DispatchResult<StratifiedStoreParams> {
    let path = asset_csv_path(config_dir, "stratified_store");
    let table = dispatch_io::load_asset_params(&path)?;
    check_columns(
        &table,
        "stratified_store",
        &["heat_max", "initial_volume_share_z1", "initial_fill"],
    )?;
    let heat_max = table
        .value("heat_max")
        .ok_or_else(|| DispatchError::ConfigInvalid(format!("{}: missing value.heat_max", path.display())))?;
    Ok(StratifiedStoreParams {
        name: "stratified_store".to_string(),
        heat_max,
        initial_volume_share_z1: table.value("initial_volume_share_z1").unwrap_or(0.5),
        initial_fill: table.value("initial_fill").unwrap_or(0.0),
        restrict_fw_discharge_in_winter: config
            .bool_parameter("RESTRICT_FW_DISCHARGE_IN_WINTER")
            .unwrap_or(false),
    })
}

pub fn resolve(config: &ScenarioConfig, config_dir: &Path) -> DispatchResult<ModelInputs> {
    let gas_price = series(config, config_dir, "gas_price")?;
    let power_price = series(config, config_dir, "power_price")?;
    let hydrogen_price = series(config, config_dir, "hydrogen_price")?;
    let heat_demand = series(config, config_dir, "heat_demand")?;
    let local_heat_demand = series(config, config_dir, "local_heat_demand")?;
    let pv_profile = series(config, config_dir, "pv_profile")?;
    let solar_thermal_profile = series(config, config_dir, "solar_thermal_profile")?;

    let n = gas_price.len();
    let all_series = [
        ("power_price", power_price.len()),
        ("hydrogen_price", hydrogen_price.len()),
        ("heat_demand", heat_demand.len()),
        ("local_heat_demand", local_heat_demand.len()),
        ("pv_profile", pv_profile.len()),
        ("solar_thermal_profile", solar_thermal_profile.len()),
    ];
    for (name, len) in all_series {
        if len != n {
            return Err(DispatchError::ConfigInvalid(format!(
                "timeseries '{name}' has {len} entries, expected {n} (matching 'gas_price')"
            )));
        }
    }

    let installed_st_power = scalar_or(config, "INSTALLED_ST_POWER", 1.0);
    let solar_thermal_heat = solar_thermal_profile
        .into_iter()
        .map(|cf| cf * installed_st_power)
        .collect();

    let scalars = ScalarPrices {
        co2_price: scalar(config, "CO2_PRICE")?,
        heat_price: scalar(config, "HEAT_PRICE")?,
        h2_price: scalar_or(config, "H2_PRICE", 0.0),
        use_const_h2_price: config.bool_parameter("USE_CONST_H2_PRICE").unwrap_or(true),
    };

    Ok(ModelInputs {
        time: TimeIndex::new(n),
        scalars,
        gas_price,
        power_price,
        hydrogen_price,
        heat_demand,
        local_heat_demand,
        chp_1: load_chp(config_dir, "chp_1", config, "HYDROGEN_ADMIXTURE_CHP_1")?,
        chp_2: load_chp(config_dir, "chp_2", config, "HYDROGEN_ADMIXTURE_CHP_2")?,
        pv: PvParams {
            name: "pv".to_string(),
            installed_power: scalar_or(config, "INSTALLED_PV_POWER", 1.0),
            inverter_efficiency: scalar_or(config, "PV_INVERTER_EFFICIENCY", 1.0),
            profile: pv_profile,
        },
        solar_thermal: SolarThermalParams {
            name: "solar_thermal".to_string(),
            profile: solar_thermal_heat,
        },
        battery: load_battery(config_dir, config)?,
        heat_store: load_simple_store(config_dir, "heat_store", Carrier::Heat)?,
        hydrogen_store: load_simple_store(config_dir, "hydrogen_store", Carrier::Hydrogen)?,
        geothermal_store: load_simple_store(config_dir, "geothermal_store", Carrier::WasteHeat)?,
        stratified_store: load_stratified_store(config_dir, config)?,
        electrical_supply_max: scalar_or(config, "ELECTRICAL_SUPPLY_MAX", 1.0e6),
        hydrogen_supply_max: scalar_or(config, "HYDROGEN_SUPPLY_MAX", 1.0e6),
        natural_gas_supply_max: scalar_or(config, "NATURAL_GAS_SUPPLY_MAX", 1.0e6),
        local_heat_max_district_feedin: scalar_or(config, "LOCAL_HEAT_MAX_DISTRICT_FEEDIN", 1.0e6),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn check_columns_accepts_whitelisted_names() {
        let mut min_row = HashMap::new();
        min_row.insert("power".to_string(), 1.0);
        let mut rows = HashMap::new();
        rows.insert("min".to_string(), min_row);
        let table = dispatch_schemas::AssetParamTable::new(rows);
        assert!(check_columns(&table, "chp_1", &["power", "gas"]).is_ok());
    }

    #[test]
    fn check_columns_rejects_unknown_name() {
        let mut min_row = HashMap::new();
        min_row.insert("ramp_rate".to_string(), 1.0);
        let mut rows = HashMap::new();
        rows.insert("min".to_string(), min_row);
        let table = dispatch_schemas::AssetParamTable::new(rows);
        let err = check_columns(&table, "chp_1", &["power", "gas"]).unwrap_err();
        assert!(matches!(
            err,
            DispatchError::UnknownOption { asset, key }
                if asset == "chp_1" && key == "ramp_rate"
        ));
    }
}
