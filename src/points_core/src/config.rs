//! Tunable weights, league baselines and multiplier caps.
//!
//! A [`ModelConfig`] is an immutable value bound to a
//! [`ProjectionEngine`](crate::projection::ProjectionEngine) at construction.
//! The NBA calibration is the default; other leagues are available as named
//! profiles, and any field can be overridden from a JSON file.

#[cfg(feature = "python")]
use pyo3::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::ConfigError;

/// Weight on the sportsbook line in the base blend
pub const W_BASE_LINE: f64 = 0.60;

/// Weight on the season average in the base blend
pub const W_BASE_SEASON_AVG: f64 = 0.40;

/// +4% at home, -4% away
pub const W_HOME_AWAY: f64 = 0.04;

/// Light sensitivity to game O/U vs league baseline
pub const W_GAME_TOTAL: f64 = 0.06;

/// Moderate sensitivity to team O/U vs league baseline
pub const W_TEAM_TOTAL: f64 = 0.12;

/// Opponent points allowed to the position vs league baseline
pub const W_DEF_VS_POS: f64 = 0.14;

/// Last-N average vs season average
pub const W_RECENT_FORM: f64 = 0.08;

/// Expected minutes vs season minutes
pub const W_MINUTES_TREND: f64 = 0.10;

/// Matchup pace vs league average pace
pub const W_PACE: f64 = 0.06;

/// Flat reduction applied on the second night of a back-to-back
pub const W_B2B_PENALTY: f64 = 0.03;

/// NBA average combined points per game
pub const NBA_AVG_GAME_TOTAL: f64 = 229.0;

/// NBA average points per team per game
pub const NBA_AVG_TEAM_TOTAL: f64 = 114.5;

/// NBA average possessions per team per game
pub const NBA_AVG_PACE: f64 = 99.5;

/// NBA average points allowed to a single position
pub const NBA_BASE_PTS_ALLOWED_POS: f64 = 23.0;

/// Floor on the combined multiplier
pub const MULT_MIN: f64 = 0.70;

/// Ceiling on the combined multiplier
pub const MULT_MAX: f64 = 1.40;

/// Names accepted by [`ModelConfig::profile`].
pub const PROFILES: [&str; 3] = ["nba", "wnba", "ncaab"];

/// How far the base weights may drift from 1.0 before we warn about it.
const BASE_WEIGHT_TOLERANCE: f64 = 0.05;

/// Model calibration: base blend weights, multiplier weights, league
/// baselines and clamp bounds.
///
/// Missing fields in a JSON document take the NBA defaults, so a config file
/// only needs to list what it changes.
#[cfg_attr(feature = "python", pyclass(get_all, set_all))]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub w_base_line: f64,
    pub w_base_season_avg: f64,

    pub w_home_away: f64,
    pub w_game_total: f64,
    pub w_team_total: f64,
    pub w_def_vs_pos: f64,

    /// Set to 0.0 to disable recent form
    pub w_recent_form: f64,
    /// Set to 0.0 to disable minutes trend
    pub w_minutes_trend: f64,
    /// Set to 0.0 to disable pace
    pub w_pace: f64,
    /// Flat penalty, not a proportional weight
    pub w_b2b_penalty: f64,

    pub league_avg_game_total: f64,
    pub league_avg_team_total: f64,
    /// Possessions per team per game
    pub league_avg_pace: f64,
    /// Average points allowed to the player's position
    pub league_base_pts_allowed_pos: f64,

    pub mult_min: f64,
    pub mult_max: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            w_base_line: W_BASE_LINE,
            w_base_season_avg: W_BASE_SEASON_AVG,
            w_home_away: W_HOME_AWAY,
            w_game_total: W_GAME_TOTAL,
            w_team_total: W_TEAM_TOTAL,
            w_def_vs_pos: W_DEF_VS_POS,
            w_recent_form: W_RECENT_FORM,
            w_minutes_trend: W_MINUTES_TREND,
            w_pace: W_PACE,
            w_b2b_penalty: W_B2B_PENALTY,
            league_avg_game_total: NBA_AVG_GAME_TOTAL,
            league_avg_team_total: NBA_AVG_TEAM_TOTAL,
            league_avg_pace: NBA_AVG_PACE,
            league_base_pts_allowed_pos: NBA_BASE_PTS_ALLOWED_POS,
            mult_min: MULT_MIN,
            mult_max: MULT_MAX,
        }
    }
}

impl ModelConfig {
    /// NBA calibration (same as `Default`).
    pub fn nba() -> Self {
        Self::default()
    }

    /// WNBA baselines with the NBA weights and caps.
    pub fn wnba() -> Self {
        ModelConfig {
            league_avg_game_total: 162.0,
            league_avg_team_total: 81.0,
            league_avg_pace: 80.0,
            league_base_pts_allowed_pos: 16.0,
            ..Self::default()
        }
    }

    /// College baselines: 104.6 points per 100 possessions at 67.7
    /// possessions per game.
    pub fn ncaab() -> Self {
        ModelConfig {
            league_avg_game_total: 141.6,
            league_avg_team_total: 70.8,
            league_avg_pace: 67.7,
            league_base_pts_allowed_pos: 14.0,
            ..Self::default()
        }
    }

    /// Look up a named profile (case-insensitive).
    pub fn profile(name: &str) -> Result<Self, ConfigError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "nba" => Ok(Self::nba()),
            "wnba" => Ok(Self::wnba()),
            "ncaab" => Ok(Self::ncaab()),
            _ => Err(ConfigError::UnknownProfile(name.to_string())),
        }
    }

    /// Parse and validate a config from JSON. Absent fields keep their
    /// NBA defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: ModelConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        debug!(path = %path.display(), "loaded model config");
        Self::from_json_str(&contents)
    }

    /// Check the config is usable: every field finite and the caps ordered
    /// with a positive floor.
    ///
    /// Weight sums are not enforced; a base blend that strays from 1.0 only
    /// produces a warning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in self.fields() {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field, value });
            }
        }

        if self.mult_min <= 0.0 {
            return Err(ConfigError::NonPositiveFloor(self.mult_min));
        }
        if self.mult_min > self.mult_max {
            return Err(ConfigError::InvertedCaps {
                min: self.mult_min,
                max: self.mult_max,
            });
        }

        let base_sum = self.w_base_line + self.w_base_season_avg;
        if (base_sum - 1.0).abs() > BASE_WEIGHT_TOLERANCE {
            warn!(base_sum, "base blend weights do not sum to 1.0");
        }

        Ok(())
    }

    fn fields(&self) -> [(&'static str, f64); 16] {
        [
            ("w_base_line", self.w_base_line),
            ("w_base_season_avg", self.w_base_season_avg),
            ("w_home_away", self.w_home_away),
            ("w_game_total", self.w_game_total),
            ("w_team_total", self.w_team_total),
            ("w_def_vs_pos", self.w_def_vs_pos),
            ("w_recent_form", self.w_recent_form),
            ("w_minutes_trend", self.w_minutes_trend),
            ("w_pace", self.w_pace),
            ("w_b2b_penalty", self.w_b2b_penalty),
            ("league_avg_game_total", self.league_avg_game_total),
            ("league_avg_team_total", self.league_avg_team_total),
            ("league_avg_pace", self.league_avg_pace),
            ("league_base_pts_allowed_pos", self.league_base_pts_allowed_pos),
            ("mult_min", self.mult_min),
            ("mult_max", self.mult_max),
        ]
    }
}

#[cfg(feature = "python")]
#[pymethods]
impl ModelConfig {
    /// Create a config from a named profile ("nba", "wnba" or "ncaab").
    #[new]
    #[pyo3(signature = (profile = "nba"))]
    fn py_new(profile: &str) -> PyResult<Self> {
        Ok(Self::profile(profile)?)
    }

    /// Parse a JSON config; missing fields keep the NBA defaults.
    #[staticmethod]
    #[pyo3(name = "from_json")]
    fn py_from_json(json: &str) -> PyResult<Self> {
        Ok(Self::from_json_str(json)?)
    }

    #[pyo3(name = "to_json")]
    fn py_to_json(&self) -> PyResult<String> {
        serde_json::to_string(self)
            .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))
    }

    fn __repr__(&self) -> String {
        format!(
            "ModelConfig(line={}, season={}, caps=[{}, {}])",
            self.w_base_line, self.w_base_season_avg, self.mult_min, self.mult_max
        )
    }
}
