#[cfg(feature = "python")]
use pyo3::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::InputError;

/// Everything known about one player for one game.
///
/// The optional drivers may be left unset; each then resolves to the value
/// that makes its multiplier exactly neutral (recent average falls back to
/// the season average, expected minutes to season minutes, pace to the
/// league average).
#[cfg_attr(feature = "python", pyclass(get_all, set_all))]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerInputs {
    /// Display only
    #[serde(alias = "name")]
    pub player_name: String,

    /// Sportsbook points line
    #[serde(alias = "line")]
    pub player_line_pts: f64,

    #[serde(alias = "season_avg")]
    pub season_avg_pts: f64,

    pub is_home: bool,

    /// Game O/U total points
    #[serde(alias = "game_total")]
    pub game_total_ou: f64,

    /// Team O/U points
    #[serde(alias = "team_total")]
    pub team_total_ou: f64,

    /// Points per game the opponent allows to this player's position
    #[serde(alias = "def_vs_pos")]
    pub opp_pts_allowed_vs_pos: f64,

    /// Last-N games average
    #[serde(default, alias = "recent_avg")]
    pub recent_avg_pts: Option<f64>,

    #[serde(default, alias = "season_minutes")]
    pub season_avg_minutes: Option<f64>,

    #[serde(default)]
    pub expected_minutes: Option<f64>,

    /// Projected possessions per team
    #[serde(default, alias = "pace")]
    pub matchup_pace: Option<f64>,

    #[serde(default, alias = "b2b")]
    pub is_back_to_back: bool,
}

/// A JSON input document holds either one record or a list of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum InputDocument {
    One(PlayerInputs),
    Many(Vec<PlayerInputs>),
}

impl PlayerInputs {
    /// Inputs with the core drivers and game context set and every optional
    /// driver neutral.
    pub fn new(
        player_name: impl Into<String>,
        player_line_pts: f64,
        season_avg_pts: f64,
        is_home: bool,
        game_total_ou: f64,
        team_total_ou: f64,
        opp_pts_allowed_vs_pos: f64,
    ) -> Self {
        PlayerInputs {
            player_name: player_name.into(),
            player_line_pts,
            season_avg_pts,
            is_home,
            game_total_ou,
            team_total_ou,
            opp_pts_allowed_vs_pos,
            recent_avg_pts: None,
            season_avg_minutes: None,
            expected_minutes: None,
            matchup_pace: None,
            is_back_to_back: false,
        }
    }

    pub fn with_recent_avg(mut self, recent_avg_pts: f64) -> Self {
        self.recent_avg_pts = Some(recent_avg_pts);
        self
    }

    pub fn with_minutes(mut self, season_avg_minutes: f64, expected_minutes: f64) -> Self {
        self.season_avg_minutes = Some(season_avg_minutes);
        self.expected_minutes = Some(expected_minutes);
        self
    }

    pub fn with_pace(mut self, matchup_pace: f64) -> Self {
        self.matchup_pace = Some(matchup_pace);
        self
    }

    pub fn with_back_to_back(mut self, is_back_to_back: bool) -> Self {
        self.is_back_to_back = is_back_to_back;
        self
    }

    /// Recent average, or the season average when unset.
    pub fn resolved_recent_avg(&self) -> f64 {
        self.recent_avg_pts.unwrap_or(self.season_avg_pts)
    }

    /// Season minutes, or 0.0 when unset (the minutes factor then disables
    /// itself).
    pub fn resolved_season_minutes(&self) -> f64 {
        self.season_avg_minutes.unwrap_or(0.0)
    }

    /// Expected minutes, or season minutes when unset.
    pub fn resolved_expected_minutes(&self) -> f64 {
        self.expected_minutes
            .unwrap_or_else(|| self.resolved_season_minutes())
    }

    /// Matchup pace, or `league_avg_pace` when unset.
    pub fn resolved_pace(&self, league_avg_pace: f64) -> f64 {
        self.matchup_pace.unwrap_or(league_avg_pace)
    }

    /// Reject NaN and infinite values, naming the offending field.
    pub fn validate(&self) -> Result<(), InputError> {
        let fields = [
            ("player_line_pts", Some(self.player_line_pts)),
            ("season_avg_pts", Some(self.season_avg_pts)),
            ("game_total_ou", Some(self.game_total_ou)),
            ("team_total_ou", Some(self.team_total_ou)),
            ("opp_pts_allowed_vs_pos", Some(self.opp_pts_allowed_vs_pos)),
            ("recent_avg_pts", self.recent_avg_pts),
            ("season_avg_minutes", self.season_avg_minutes),
            ("expected_minutes", self.expected_minutes),
            ("matchup_pace", self.matchup_pace),
        ];

        for (field, value) in fields {
            if let Some(value) = value {
                if !value.is_finite() {
                    return Err(InputError::NonFinite { field, value });
                }
            }
        }
        Ok(())
    }

    /// Parse one record or an array of records, validating each.
    pub fn from_json_str(json: &str) -> Result<Vec<Self>, InputError> {
        let inputs = match serde_json::from_str(json)? {
            InputDocument::One(one) => vec![one],
            InputDocument::Many(many) => many,
        };
        for input in &inputs {
            input.validate()?;
        }
        Ok(inputs)
    }

    /// Read a JSON input file; see [`PlayerInputs::from_json_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Vec<Self>, InputError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| InputError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let inputs = Self::from_json_str(&contents)?;
        debug!(path = %path.display(), count = inputs.len(), "loaded player inputs");
        Ok(inputs)
    }
}

#[cfg(feature = "python")]
#[pymethods]
impl PlayerInputs {
    #[new]
    #[pyo3(signature = (
        player_name,
        player_line_pts,
        season_avg_pts,
        is_home,
        game_total_ou,
        team_total_ou,
        opp_pts_allowed_vs_pos,
        recent_avg_pts = None,
        season_avg_minutes = None,
        expected_minutes = None,
        matchup_pace = None,
        is_back_to_back = false
    ))]
    #[allow(clippy::too_many_arguments)]
    fn py_new(
        player_name: String,
        player_line_pts: f64,
        season_avg_pts: f64,
        is_home: bool,
        game_total_ou: f64,
        team_total_ou: f64,
        opp_pts_allowed_vs_pos: f64,
        recent_avg_pts: Option<f64>,
        season_avg_minutes: Option<f64>,
        expected_minutes: Option<f64>,
        matchup_pace: Option<f64>,
        is_back_to_back: bool,
    ) -> PyResult<Self> {
        let inputs = PlayerInputs {
            recent_avg_pts,
            season_avg_minutes,
            expected_minutes,
            matchup_pace,
            is_back_to_back,
            ..PlayerInputs::new(
                player_name,
                player_line_pts,
                season_avg_pts,
                is_home,
                game_total_ou,
                team_total_ou,
                opp_pts_allowed_vs_pos,
            )
        };
        inputs.validate()?;
        Ok(inputs)
    }

    fn __repr__(&self) -> String {
        format!(
            "PlayerInputs({:?}, line={}, season_avg={}, home={})",
            self.player_name, self.player_line_pts, self.season_avg_pts, self.is_home
        )
    }
}
