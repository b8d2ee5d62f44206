//! JSON/CSV configuration loading and output-artifact writing for the
//! dispatch pipeline.

pub mod asset_params;
pub mod config;
pub mod output;
pub mod timeseries;

pub use asset_params::load_asset_params;
pub use config::load_config;
pub use output::{scenario_dir, write_cost_json, write_metadata_json, write_output_csv, write_solver_log};
pub use timeseries::load_timeseries;
