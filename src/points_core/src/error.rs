use thiserror::Error;

/// Problems with a model configuration, raised when it is loaded or bound
/// to an engine. Projection itself never fails.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config field `{field}` must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("multiplier floor {min} is above ceiling {max}")]
    InvertedCaps { min: f64, max: f64 },

    #[error("multiplier floor must be positive, got {0}")]
    NonPositiveFloor(f64),

    #[error("unknown profile `{0}` (expected one of: nba, wnba, ncaab)")]
    UnknownProfile(String),

    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Malformed player inputs, caught at the boundary before they reach the
/// engine.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("input field `{field}` must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("failed to read input file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid input JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(feature = "python")]
impl From<ConfigError> for pyo3::PyErr {
    fn from(err: ConfigError) -> Self {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}

#[cfg(feature = "python")]
impl From<InputError> for pyo3::PyErr {
    fn from(err: InputError) -> Self {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
