//! Serializable schema types for dispatch configuration and results.
//!
//! These mirror the JSON config file and the three JSON/CSV output
//! artifacts of the dispatch run: a per-hour result table, a cost
//! decomposition, and run metadata.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single `timeseries` entry in the scenario config: which CSV file to
/// read, which column is the integer hour index, and which column becomes
/// the named model parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesRef {
    pub file: String,
    pub index: String,
    pub param: String,
}

/// Top-level scenario configuration, loaded from a single JSON file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Scalar parameters: CO2_PRICE, HEAT_PRICE, H2_PRICE,
    /// USE_CONST_H2_PRICE (0/1), INSTALLED_ST_POWER,
    /// HYDROGEN_ADMIXTURE_CHP_1, HYDROGEN_ADMIXTURE_CHP_2, and any other
    /// scalar the asset library reads by name.
    #[serde(default)]
    pub parameters: HashMap<String, f64>,

    /// Named time series, each naming the CSV file and columns that
    /// supply one exogenous parameter indexed by hour.
    #[serde(default)]
    pub timeseries: HashMap<String, TimeSeriesRef>,
}

impl ScenarioConfig {
    pub fn parameter(&self, key: &str) -> Option<f64> {
        self.parameters.get(key).copied()
    }

    pub fn bool_parameter(&self, key: &str) -> Option<bool> {
        self.parameter(key).map(|v| v != 0.0)
    }
}

/// The `index,<col1>,<col2>,...` asset-parameter CSV shape: rows keyed by
/// label ("min" / "max" / "value" / "initial", etc.), columns keyed by
/// quantity name (power, gas, heat, co2, waste_heat, ...).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetParamTable {
    rows: HashMap<String, HashMap<String, f64>>,
}

impl AssetParamTable {
    pub fn new(rows: HashMap<String, HashMap<String, f64>>) -> Self {
        Self { rows }
    }

    pub fn get(&self, row: &str, column: &str) -> Option<f64> {
        self.rows.get(row)?.get(column).copied()
    }

    pub fn min(&self, column: &str) -> Option<f64> {
        self.get("min", column)
    }

    pub fn max(&self, column: &str) -> Option<f64> {
        self.get("max", column)
    }

    pub fn value(&self, column: &str) -> Option<f64> {
        self.get("value", column)
    }

    /// Every distinct column name present across all rows, in no
    /// particular order.
    pub fn columns(&self) -> std::collections::HashSet<&str> {
        self.rows
            .values()
            .flat_map(|row| row.keys().map(String::as_str))
            .collect()
    }
}

/// One row of the per-hour dispatch result table (`<S>_<TS>_output.csv`).
/// Holds the hour index plus an open-ended map of field name to value so
/// every asset's scalar exogenous parameters, primal variables, and
/// derived expressions can be written without a schema change per asset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputRow {
    pub hour: usize,
    #[serde(flatten)]
    pub fields: HashMap<String, f64>,
}

/// The cost decomposition JSON (`<S>_<TS>_costs.json`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub gas_costs: f64,
    /// CO2 cost per CHP unit, keyed by asset name.
    pub co2_costs_per_chp: HashMap<String, f64>,
    pub power_costs: f64,
    pub hydrogen_costs: f64,
    pub heat_revenue: f64,
    pub objective: f64,
    pub net_total: f64,
    /// `|net_total - objective|`, absolute.
    pub discrepancy: f64,
    /// `discrepancy / |objective|`, or 0.0 when the objective is 0.
    pub relative_discrepancy: f64,
}

/// Run metadata JSON (`<S>_<TS>_metadata.json`): solver options and the
/// headline scenario parameters recorded alongside a solved run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub scenario: String,
    pub timestamp: String,
    pub solver: String,
    pub time_limit_s: Option<f64>,
    pub mip_gap: Option<f64>,
    pub status: String,
    pub hydrogen_admixture: HashMap<String, f64>,
    pub scalar_prices: HashMap<String, f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_config_bool_parameter_roundtrip() {
        let mut config = ScenarioConfig::default();
        config.parameters.insert("USE_CONST_H2_PRICE".into(), 1.0);
        assert_eq!(config.bool_parameter("USE_CONST_H2_PRICE"), Some(true));
        assert_eq!(config.bool_parameter("missing"), None);
    }

    #[test]
    fn asset_param_table_lookup() {
        let mut rows = HashMap::new();
        let mut min_row = HashMap::new();
        min_row.insert("power".to_string(), 1.0);
        rows.insert("min".to_string(), min_row);
        let table = AssetParamTable::new(rows);
        assert_eq!(table.min("power"), Some(1.0));
        assert_eq!(table.max("power"), None);
    }

    #[test]
    fn asset_param_table_columns_spans_all_rows() {
        let mut min_row = HashMap::new();
        min_row.insert("power".to_string(), 1.0);
        let mut max_row = HashMap::new();
        max_row.insert("power".to_string(), 10.0);
        max_row.insert("ramp_rate".to_string(), 2.0);
        let mut rows = HashMap::new();
        rows.insert("min".to_string(), min_row);
        rows.insert("max".to_string(), max_row);
        let table = AssetParamTable::new(rows);
        let columns = table.columns();
        assert_eq!(columns.len(), 2);
        assert!(columns.contains("power"));
        assert!(columns.contains("ramp_rate"));
    }

    #[test]
    fn output_row_serializes_flattened_fields() {
        let mut row = OutputRow {
            hour: 1,
            ..Default::default()
        };
        row.fields.insert("chp_1.power".into(), 10.0);
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["hour"], 1);
        assert_eq!(json["chp_1.power"], 10.0);
    }
}
