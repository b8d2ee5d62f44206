//! Loads the scenario configuration JSON: scalar parameters and references
//! to time-series CSV files.

use std::fs;
use std::path::Path;

use anyhow::Context;
use dispatch_core::DispatchError;
use dispatch_schemas::ScenarioConfig;

pub fn load_config(path: &Path) -> Result<ScenarioConfig, DispatchError> {
    let data = fs::read_to_string(path).map_err(|e| {
        DispatchError::InputMissing(format!("reading config '{}': {e}", path.display()))
    })?;
    serde_json::from_str(&data)
        .with_context(|| format!("parsing config json '{}'", path.display()))
        .map_err(|e| DispatchError::ConfigInvalid(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_well_formed_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenario.json");
        let mut file = fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{"parameters": {{"CO2_PRICE": 100.0}}, "timeseries": {{}}}}"#
        )
        .unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.parameter("CO2_PRICE"), Some(100.0));
    }

    #[test]
    fn missing_file_is_input_missing() {
        let err = load_config(Path::new("/nonexistent/path.json")).unwrap_err();
        assert!(matches!(err, DispatchError::InputMissing(_)));
    }

    #[test]
    fn malformed_json_is_config_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, DispatchError::ConfigInvalid(_)));
    }
}
