//! Writes the four per-scenario output artifacts, under the deterministic
//! directory layout:
//!
//! ```text
//! <output_root>/<use_case>/<S>/
//!   <S>_<TS>_output.csv
//!   <S>_<TS>_costs.json
//!   <S>_<TS>_metadata.json
//!   <S>_<TS>_solver.log
//! ```
//!
//! Scenarios whose name has no underscore (the "dummy" case) omit the
//! use-case directory level.

use std::fs;
use std::path::{Path, PathBuf};

use dispatch_core::DispatchError;
use dispatch_schemas::{CostBreakdown, OutputRow, RunMetadata};

/// Resolves the directory a scenario's artifacts should be written to,
/// creating it if necessary.
pub fn scenario_dir(output_root: &Path, scenario: &str) -> Result<PathBuf, DispatchError> {
    let dir = match scenario.split_once('_') {
        Some((use_case, _rest)) => output_root.join(use_case).join(scenario),
        None => output_root.join(scenario),
    };
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn artifact_path(dir: &Path, scenario: &str, timestamp: &str, suffix: &str) -> PathBuf {
    dir.join(format!("{scenario}_{timestamp}_{suffix}"))
}

pub fn write_output_csv(
    dir: &Path,
    scenario: &str,
    timestamp: &str,
    rows: &[OutputRow],
) -> Result<PathBuf, DispatchError> {
    let path = artifact_path(dir, scenario, timestamp, "output.csv");
    let mut field_names: Vec<String> = rows
        .iter()
        .flat_map(|r| r.fields.keys().cloned())
        .collect();
    field_names.sort();
    field_names.dedup();

    let mut writer = csv::Writer::from_path(&path)?;
    let mut header = vec!["t".to_string()];
    header.extend(field_names.iter().cloned());
    writer.write_record(&header)?;
    for row in rows {
        let mut record = vec![row.hour.to_string()];
        for name in &field_names {
            let value = row.fields.get(name).copied().unwrap_or(0.0);
            record.push(value.to_string());
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(path)
}

pub fn write_cost_json(
    dir: &Path,
    scenario: &str,
    timestamp: &str,
    costs: &CostBreakdown,
) -> Result<PathBuf, DispatchError> {
    let path = artifact_path(dir, scenario, timestamp, "costs.json");
    let file = fs::File::create(&path)?;
    serde_json::to_writer_pretty(file, costs)?;
    Ok(path)
}

pub fn write_metadata_json(
    dir: &Path,
    scenario: &str,
    timestamp: &str,
    metadata: &RunMetadata,
) -> Result<PathBuf, DispatchError> {
    let path = artifact_path(dir, scenario, timestamp, "metadata.json");
    let file = fs::File::create(&path)?;
    serde_json::to_writer_pretty(file, metadata)?;
    Ok(path)
}

pub fn write_solver_log(
    dir: &Path,
    scenario: &str,
    timestamp: &str,
    log: &str,
) -> Result<PathBuf, DispatchError> {
    let path = artifact_path(dir, scenario, timestamp, "solver.log");
    fs::write(&path, log)?;
    Ok(path)
}

impl From<csv::Error> for DispatchError {
    fn from(err: csv::Error) -> Self {
        DispatchError::ConfigInvalid(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn dummy_scenario_omits_use_case_level() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = scenario_dir(dir.path(), "dummy").unwrap();
        assert_eq!(resolved, dir.path().join("dummy"));
    }

    #[test]
    fn underscored_scenario_nests_under_use_case() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = scenario_dir(dir.path(), "winter_2026").unwrap();
        assert_eq!(resolved, dir.path().join("winter").join("winter_2026"));
    }

    #[test]
    fn output_csv_round_trips_fields() {
        let dir = tempfile::tempdir().unwrap();
        let scenario_path = scenario_dir(dir.path(), "dummy").unwrap();
        let mut fields = HashMap::new();
        fields.insert("chp_1.power".to_string(), 10.0);
        let rows = vec![OutputRow { hour: 1, fields }];
        let path = write_output_csv(&scenario_path, "dummy", "20260726T000000Z", &rows).unwrap();
        let contents = fs::read_to_string(path).unwrap();
        assert!(contents.contains("chp_1.power"));
        assert!(contents.contains("10"));
    }
}
