//! Points Core - Player points projection from sportsbook lines.
//!
//! Blends a player's points line with their season average, then scales
//! the blend by eight contextual multipliers (home/away, game and team
//! totals, defense vs position, recent form, minutes trend, pace,
//! back-to-back) whose product is clamped to configurable caps.
//!
//! Python bindings are available with the `python` feature.

#[cfg(feature = "python")]
use pyo3::prelude::*;

pub mod config;
pub mod error;
pub mod inputs;
pub mod multipliers;
pub mod projection;
pub mod report;

pub use config::{ModelConfig, MULT_MAX, MULT_MIN, PROFILES};
pub use error::{ConfigError, InputError};
pub use inputs::PlayerInputs;
pub use projection::{project, Projection, ProjectionEngine};
pub use report::{format_reports, Report};

/// Project one player.
///
/// Uses the NBA calibration when no config is given.
#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "project", signature = (inputs, config = None))]
fn py_project(inputs: &PlayerInputs, config: Option<ModelConfig>) -> PyResult<Projection> {
    let engine = ProjectionEngine::new(config.unwrap_or_default())?;
    Ok(engine.project(inputs))
}

/// Project a slate of players in parallel.
#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "project_batch", signature = (inputs, config = None))]
fn py_project_batch(
    py: Python<'_>,
    inputs: Vec<PlayerInputs>,
    config: Option<ModelConfig>,
) -> PyResult<Vec<Projection>> {
    let engine = ProjectionEngine::new(config.unwrap_or_default())?;
    Ok(py.allow_threads(|| engine.project_batch(&inputs)))
}

/// Labeled text report for a projection.
#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "format_report", signature = (projection, config = None))]
fn py_format_report(projection: &Projection, config: Option<ModelConfig>) -> String {
    let config = config.unwrap_or_default();
    Report::new(projection, &config).to_string()
}

/// Python module definition
#[cfg(feature = "python")]
#[pymodule]
fn points_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Classes
    m.add_class::<PlayerInputs>()?;
    m.add_class::<ModelConfig>()?;
    m.add_class::<Projection>()?;

    // Functions
    m.add_function(wrap_pyfunction!(py_project, m)?)?;
    m.add_function(wrap_pyfunction!(py_project_batch, m)?)?;
    m.add_function(wrap_pyfunction!(py_format_report, m)?)?;

    // Constants
    m.add("MULT_MIN", MULT_MIN)?;
    m.add("MULT_MAX", MULT_MAX)?;
    m.add("PROFILES", PROFILES.to_vec())?;

    Ok(())
}
