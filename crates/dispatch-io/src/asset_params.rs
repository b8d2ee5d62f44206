//! Loads the `index,<col1>,<col2>,...` asset-parameter CSV shape used for
//! per-asset min/max and cost tables.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use dispatch_core::DispatchError;
use dispatch_schemas::AssetParamTable;

pub fn load_asset_params(path: &Path) -> Result<AssetParamTable, DispatchError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| {
        DispatchError::InputMissing(format!("reading asset params '{}': {e}", path.display()))
    })?;
    let headers = reader
        .headers()
        .with_context(|| format!("reading headers of '{}'", path.display()))
        .map_err(|e| DispatchError::ConfigInvalid(e.to_string()))?
        .clone();

    let mut rows: HashMap<String, HashMap<String, f64>> = HashMap::new();
    for record in reader.records() {
        let record = record
            .with_context(|| format!("reading a row of '{}'", path.display()))
            .map_err(|e| DispatchError::ConfigInvalid(e.to_string()))?;
        let label = record[0].to_string();
        let mut columns = HashMap::new();
        for (pos, header) in headers.iter().enumerate().skip(1) {
            let raw = &record[pos];
            if raw.trim().is_empty() {
                continue;
            }
            let value: f64 = raw.parse().map_err(|_| {
                DispatchError::ConfigInvalid(format!(
                    "non-numeric value in column '{}' row '{}' of '{}'",
                    header,
                    label,
                    path.display()
                ))
            })?;
            columns.insert(header.to_string(), value);
        }
        rows.insert(label, columns);
    }
    Ok(AssetParamTable::new(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn loads_min_max_value_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chp.csv");
        fs::write(
            &path,
            "index,power,gas,heat,co2,waste_heat\nmin,1,2,0.5,0.4,0.1\nmax,10,15,6,3,2\n",
        )
        .unwrap();
        let table = load_asset_params(&path).unwrap();
        assert_eq!(table.min("power"), Some(1.0));
        assert_eq!(table.max("gas"), Some(15.0));
        assert_eq!(table.min("waste_heat"), Some(0.1));
    }
}
