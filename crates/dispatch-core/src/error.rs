//! Unified error type for dispatch model construction, solving, and I/O.
//!
//! [`DispatchError`] names every failure kind the dispatch pipeline can
//! produce so that build-time, solve-time, and I/O failures all surface
//! through one enum instead of ad-hoc strings.

use thiserror::Error;

/// Unified error type for dispatch operations.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// Unknown option key, missing required scalar, or out-of-enum value.
    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    /// A referenced CSV/JSON input file does not exist.
    #[error("input missing: {0}")]
    InputMissing(String),

    /// An arc connected two ports of different carriers.
    #[error("carrier mismatch: {0}")]
    CarrierMismatch(String),

    /// An asset received an option key outside its whitelist.
    #[error("unknown option '{key}' for asset '{asset}'")]
    UnknownOption { asset: String, key: String },

    /// Hydrogen admixture factor outside {0, 0.3, 0.5, 1.0}.
    #[error("invalid hydrogen admixture factor {0} for asset '{1}'")]
    InvalidAdmixture(f64, String),

    /// The solver reported the model infeasible.
    #[error("scenario '{scenario}' is infeasible")]
    ModelInfeasible { scenario: String },

    /// The objective is unbounded; treated as a configuration bug.
    #[error("scenario '{scenario}' has an unbounded objective")]
    ModelUnbounded { scenario: String },

    /// The solver hit its time limit without proving optimality.
    #[error("scenario '{scenario}' timed out before reaching the MIP gap")]
    SolverTimeout { scenario: String },

    /// Post-solve cost reconciliation disagreed with the solver's objective
    /// beyond tolerance. Not fatal by itself; kept as a named variant for
    /// callers that want to escalate it (e.g. a strict mode).
    #[error("cost discrepancy of {relative:.6} for scenario '{scenario}' exceeds tolerance")]
    CostDiscrepancy { scenario: String, relative: f64 },

    /// I/O errors (file access, etc).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing/deserialization errors.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Convenience alias for Results using [`DispatchError`].
pub type DispatchResult<T> = Result<T, DispatchError>;

impl From<serde_json::Error> for DispatchError {
    fn from(err: serde_json::Error) -> Self {
        DispatchError::Parse(err.to_string())
    }
}

impl From<String> for DispatchError {
    fn from(s: String) -> Self {
        DispatchError::ConfigInvalid(s)
    }
}

impl From<&str> for DispatchError {
    fn from(s: &str) -> Self {
        DispatchError::ConfigInvalid(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DispatchError::ModelInfeasible {
            scenario: "winter_2026".into(),
        };
        assert!(err.to_string().contains("infeasible"));
        assert!(err.to_string().contains("winter_2026"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: DispatchError = io_err.into();
        assert!(matches!(err, DispatchError::Io(_)));
    }

    #[test]
    fn test_result_type_alias() {
        fn example() -> DispatchResult<i32> {
            Ok(42)
        }
        assert_eq!(example().unwrap(), 42);
    }

    #[test]
    fn test_question_mark_operator() {
        fn inner() -> DispatchResult<()> {
            Err(DispatchError::CarrierMismatch("heat vs power".into()))
        }
        fn outer() -> DispatchResult<()> {
            inner()?;
            Ok(())
        }
        assert!(outer().is_err());
    }

    #[test]
    fn test_unknown_option_fields() {
        let err = DispatchError::UnknownOption {
            asset: "chp_1".into(),
            key: "ramp_rate".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("chp_1"));
        assert!(msg.contains("ramp_rate"));
    }
}
