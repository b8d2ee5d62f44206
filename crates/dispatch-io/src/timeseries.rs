//! Loads the `t,<name>` time-series CSV shape.

use std::path::Path;

use anyhow::Context;
use dispatch_core::DispatchError;

/// Reads a time series CSV with an integer index column `t` (1-based,
/// contiguous, ascending) and one value column, returning a dense vector
/// indexed by `t - 1`.
pub fn load_timeseries(path: &Path, value_column: &str) -> Result<Vec<f64>, DispatchError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| {
        DispatchError::InputMissing(format!("reading time series '{}': {e}", path.display()))
    })?;

    let headers = reader
        .headers()
        .with_context(|| format!("reading headers of '{}'", path.display()))
        .map_err(|e| DispatchError::ConfigInvalid(e.to_string()))?
        .clone();
    let index_pos = headers
        .iter()
        .position(|h| h == "t")
        .ok_or_else(|| DispatchError::ConfigInvalid(format!("'{}' has no 't' column", path.display())))?;
    let value_pos = headers
        .iter()
        .position(|h| h == value_column)
        .ok_or_else(|| {
            DispatchError::ConfigInvalid(format!(
                "'{}' has no '{}' column",
                path.display(),
                value_column
            ))
        })?;

    let mut values = Vec::new();
    let mut expected_t = 1usize;
    for record in reader.records() {
        let record = record
            .with_context(|| format!("reading a row of '{}'", path.display()))
            .map_err(|e| DispatchError::ConfigInvalid(e.to_string()))?;
        let t: usize = record[index_pos]
            .parse()
            .map_err(|_| DispatchError::ConfigInvalid(format!("non-integer 't' in '{}'", path.display())))?;
        if t != expected_t {
            return Err(DispatchError::ConfigInvalid(format!(
                "'{}' index column is not contiguous ascending from 1: expected {} got {}",
                path.display(),
                expected_t,
                t
            )));
        }
        let value: f64 = record[value_pos].parse().map_err(|_| {
            DispatchError::ConfigInvalid(format!(
                "non-numeric value in column '{}' of '{}'",
                value_column,
                path.display()
            ))
        })?;
        values.push(value);
        expected_t += 1;
    }
    Ok(values)
}
