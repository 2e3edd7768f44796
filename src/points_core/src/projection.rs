#[cfg(feature = "python")]
use pyo3::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::ModelConfig;
use crate::error::ConfigError;
use crate::inputs::PlayerInputs;
use crate::multipliers::{
    back_to_back_multiplier, base_points, clamp, defense_vs_pos_multiplier,
    game_total_multiplier, home_away_multiplier, minutes_trend_multiplier, pace_multiplier,
    recent_form_multiplier, team_total_multiplier,
};

/// Result of projecting one player: the base blend, every individual
/// multiplier, and the capped projection.
#[cfg_attr(feature = "python", pyclass(get_all))]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub player_name: String,

    pub base_points: f64,

    pub mult_home_away: f64,
    pub mult_game_total: f64,
    pub mult_team_total: f64,
    pub mult_def_pos: f64,
    pub mult_recent: f64,
    pub mult_minutes: f64,
    pub mult_pace: f64,
    pub mult_b2b: f64,

    /// Product of the eight multipliers before clamping
    pub uncapped_multiplier: f64,
    /// `uncapped_multiplier` clamped to the configured caps
    pub final_multiplier: f64,
    /// `base_points * final_multiplier`
    pub projection: f64,
}

impl Projection {
    /// Whether the clamp changed the combined multiplier.
    pub fn is_capped(&self) -> bool {
        self.final_multiplier != self.uncapped_multiplier
    }
}

#[cfg(feature = "python")]
#[pymethods]
impl Projection {
    #[getter(capped)]
    fn py_is_capped(&self) -> bool {
        self.is_capped()
    }

    #[pyo3(name = "to_json")]
    fn py_to_json(&self) -> PyResult<String> {
        serde_json::to_string(self)
            .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))
    }

    fn __repr__(&self) -> String {
        format!(
            "Projection({:?}, base={:.2}, multiplier={:.4}, projection={:.2})",
            self.player_name, self.base_points, self.final_multiplier, self.projection
        )
    }
}

/// Project a player's points under `config`.
///
/// Pure and infallible: the same inputs and config always give the same
/// projection, and finite inputs always give finite outputs.
pub fn project(inputs: &PlayerInputs, config: &ModelConfig) -> Projection {
    let base_points = base_points(inputs, config);

    let mult_home_away = home_away_multiplier(inputs, config);
    let mult_game_total = game_total_multiplier(inputs, config);
    let mult_team_total = team_total_multiplier(inputs, config);
    let mult_def_pos = defense_vs_pos_multiplier(inputs, config);
    let mult_recent = recent_form_multiplier(inputs, config);
    let mult_minutes = minutes_trend_multiplier(inputs, config);
    let mult_pace = pace_multiplier(inputs, config);
    let mult_b2b = back_to_back_multiplier(inputs, config);

    let uncapped_multiplier = mult_home_away
        * mult_game_total
        * mult_team_total
        * mult_def_pos
        * mult_recent
        * mult_minutes
        * mult_pace
        * mult_b2b;

    let final_multiplier = clamp(uncapped_multiplier, config.mult_min, config.mult_max);
    if final_multiplier != uncapped_multiplier {
        trace!(
            player = %inputs.player_name,
            uncapped_multiplier,
            final_multiplier,
            "multiplier clamped"
        );
    }

    Projection {
        player_name: inputs.player_name.clone(),
        base_points,
        mult_home_away,
        mult_game_total,
        mult_team_total,
        mult_def_pos,
        mult_recent,
        mult_minutes,
        mult_pace,
        mult_b2b,
        uncapped_multiplier,
        final_multiplier,
        projection: base_points * final_multiplier,
    }
}

/// A projection model bound to one calibration.
///
/// Holds nothing but an immutable config, so one engine can be shared
/// freely across threads.
#[derive(Clone, Debug, Default)]
pub struct ProjectionEngine {
    config: ModelConfig,
}

impl ProjectionEngine {
    /// Bind a validated config.
    pub fn new(config: ModelConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        debug!(
            mult_min = config.mult_min,
            mult_max = config.mult_max,
            "projection engine ready"
        );
        Ok(ProjectionEngine { config })
    }

    /// Engine for a named profile; see [`ModelConfig::profile`].
    pub fn for_profile(name: &str) -> Result<Self, ConfigError> {
        Self::new(ModelConfig::profile(name)?)
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn project(&self, inputs: &PlayerInputs) -> Projection {
        project(inputs, &self.config)
    }

    /// Project a slate in parallel. Output order matches input order.
    pub fn project_batch(&self, inputs: &[PlayerInputs]) -> Vec<Projection> {
        debug!(count = inputs.len(), "projecting batch");
        inputs.par_iter().map(|i| self.project(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn scenario() -> PlayerInputs {
        PlayerInputs::new("Scenario Wing", 25.0, 23.0, true, 229.0, 114.5, 23.0)
            .with_recent_avg(23.0)
            .with_minutes(34.0, 34.0)
            .with_pace(99.5)
            .with_back_to_back(false)
    }

    #[test]
    fn test_home_scenario() {
        let out = project(&scenario(), &ModelConfig::default());

        assert!((out.base_points - 24.2).abs() < 1e-12);
        assert!((out.mult_home_away - 1.04).abs() < 1e-12);
        assert_eq!(out.mult_game_total, 1.0);
        assert_eq!(out.mult_team_total, 1.0);
        assert_eq!(out.mult_def_pos, 1.0);
        assert_eq!(out.mult_recent, 1.0);
        assert_eq!(out.mult_minutes, 1.0);
        assert_eq!(out.mult_pace, 1.0);
        assert_eq!(out.mult_b2b, 1.0);
        assert!((out.uncapped_multiplier - 1.04).abs() < 1e-12);
        assert_eq!(out.final_multiplier, out.uncapped_multiplier);
        assert!(!out.is_capped());
        assert!((out.projection - 25.168).abs() < 1e-9);
        assert_eq!(out.player_name, "Scenario Wing");
    }

    #[test]
    fn test_soft_defense_scenario() {
        let mut inputs = scenario();
        inputs.opp_pts_allowed_vs_pos = 30.0;
        let out = project(&inputs, &ModelConfig::default());

        assert!((out.mult_def_pos - 1.04261).abs() < 1e-5);
        assert!((out.uncapped_multiplier - 1.0843).abs() < 1e-4);
        assert_eq!(out.final_multiplier, out.uncapped_multiplier);
        assert!((out.projection - 26.24).abs() < 0.01);
    }

    #[test]
    fn test_saturates_at_ceiling() {
        let inputs = PlayerInputs::new("Ceiling", 30.0, 28.0, true, 300.0, 150.0, 60.0)
            .with_recent_avg(45.0)
            .with_minutes(25.0, 40.0)
            .with_pace(115.0);
        let out = project(&inputs, &ModelConfig::default());

        assert!(out.uncapped_multiplier > 1.40);
        assert_eq!(out.final_multiplier, 1.40);
        assert!(out.is_capped());
        assert_eq!(out.projection, out.base_points * 1.40);
    }

    #[test]
    fn test_saturates_at_floor() {
        let inputs = PlayerInputs::new("Floor", 12.0, 14.0, false, 120.0, 50.0, 5.0)
            .with_recent_avg(2.0)
            .with_minutes(34.0, 8.0)
            .with_pace(70.0)
            .with_back_to_back(true);
        let out = project(&inputs, &ModelConfig::default());

        assert!(out.uncapped_multiplier < 0.70);
        assert_eq!(out.final_multiplier, 0.70);
        assert_eq!(out.projection, out.base_points * 0.70);
    }

    #[test]
    fn test_zero_defense_baseline_is_neutral() {
        let config = ModelConfig {
            league_base_pts_allowed_pos: 0.0,
            ..ModelConfig::default()
        };
        let mut inputs = scenario();
        inputs.opp_pts_allowed_vs_pos = 30.0;
        let out = project(&inputs, &config);

        assert_eq!(out.mult_def_pos, 1.0);
        assert!(out.projection.is_finite());
    }

    #[test]
    fn test_unset_optionals_match_season_values() {
        let explicit = scenario();
        let mut implicit = PlayerInputs::new("Scenario Wing", 25.0, 23.0, true, 229.0, 114.5, 23.0);
        implicit.season_avg_minutes = Some(34.0);

        let config = ModelConfig::default();
        assert_eq!(project(&explicit, &config), project(&implicit, &config));
    }

    #[test]
    fn test_engine_rejects_bad_config() {
        let config = ModelConfig {
            mult_min: 1.5,
            mult_max: 1.0,
            ..ModelConfig::default()
        };
        assert!(ProjectionEngine::new(config).is_err());
        assert!(ProjectionEngine::for_profile("nope").is_err());
    }

    #[test]
    fn test_engine_uses_bound_config() {
        let engine = ProjectionEngine::for_profile("wnba").unwrap();
        let inputs = PlayerInputs::new("WNBA Guard", 18.5, 17.0, true, 162.0, 81.0, 16.0);
        let out = engine.project(&inputs);

        assert_eq!(engine.config(), &ModelConfig::wnba());
        assert_eq!(out.mult_game_total, 1.0);
        assert_eq!(out.mult_team_total, 1.0);
        assert_eq!(out.mult_def_pos, 1.0);
        assert!((out.final_multiplier - 1.04).abs() < 1e-12);
    }

    #[test]
    fn test_batch_matches_single_in_order() {
        let engine = ProjectionEngine::default();
        let slate: Vec<PlayerInputs> = (0..50)
            .map(|i| {
                let mut inputs = scenario();
                inputs.player_name = format!("Player{}", i);
                inputs.opp_pts_allowed_vs_pos = 18.0 + i as f64 * 0.25;
                inputs.is_home = i % 2 == 0;
                inputs
            })
            .collect();

        let batch = engine.project_batch(&slate);
        assert_eq!(batch.len(), slate.len());
        for (inputs, out) in slate.iter().zip(&batch) {
            assert_eq!(out, &engine.project(inputs));
        }
    }

    #[test]
    fn test_engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ProjectionEngine>();
    }

    fn arb_inputs() -> impl Strategy<Value = PlayerInputs> {
        (
            (0.0..60.0f64, 0.0..50.0f64, any::<bool>()),
            (100.0..320.0f64, 50.0..160.0f64, 5.0..45.0f64),
            (
                proptest::option::of(0.0..70.0f64),
                proptest::option::of(0.0..48.0f64),
                proptest::option::of(0.0..48.0f64),
                proptest::option::of(80.0..120.0f64),
                any::<bool>(),
            ),
        )
            .prop_map(
                |((line, season, home), (game, team, def), (recent, mins, exp, pace, b2b))| {
                    PlayerInputs {
                        recent_avg_pts: recent,
                        season_avg_minutes: mins,
                        expected_minutes: exp,
                        matchup_pace: pace,
                        is_back_to_back: b2b,
                        ..PlayerInputs::new("Prop", line, season, home, game, team, def)
                    }
                },
            )
    }

    proptest! {
        #[test]
        fn final_multiplier_within_caps(inputs in arb_inputs()) {
            let config = ModelConfig::default();
            let out = project(&inputs, &config);
            prop_assert!(out.final_multiplier >= config.mult_min);
            prop_assert!(out.final_multiplier <= config.mult_max);
        }

        #[test]
        fn projection_is_base_times_final(inputs in arb_inputs()) {
            let out = project(&inputs, &ModelConfig::default());
            prop_assert_eq!(out.projection, out.base_points * out.final_multiplier);
            prop_assert!(out.projection.is_finite());
        }

        #[test]
        fn clamp_is_noop_inside_caps(inputs in arb_inputs()) {
            let config = ModelConfig::default();
            let out = project(&inputs, &config);
            if out.uncapped_multiplier >= config.mult_min && out.uncapped_multiplier <= config.mult_max {
                prop_assert_eq!(out.final_multiplier, out.uncapped_multiplier);
            } else {
                prop_assert!(out.is_capped());
            }
        }

        #[test]
        fn season_equal_recent_is_neutral(season in 0.1..50.0f64, inputs in arb_inputs()) {
            let mut inputs = inputs;
            inputs.season_avg_pts = season;
            inputs.recent_avg_pts = Some(season);
            prop_assert_eq!(project(&inputs, &ModelConfig::default()).mult_recent, 1.0);
        }

        #[test]
        fn season_equal_minutes_is_neutral(minutes in 0.0..48.0f64, inputs in arb_inputs()) {
            let mut inputs = inputs;
            inputs.season_avg_minutes = Some(minutes);
            inputs.expected_minutes = Some(minutes);
            prop_assert_eq!(project(&inputs, &ModelConfig::default()).mult_minutes, 1.0);
        }

        #[test]
        fn no_back_to_back_is_neutral(penalty in 0.0..0.5f64, inputs in arb_inputs()) {
            let mut inputs = inputs;
            inputs.is_back_to_back = false;
            let config = ModelConfig { w_b2b_penalty: penalty, ..ModelConfig::default() };
            prop_assert_eq!(project(&inputs, &config).mult_b2b, 1.0);
        }

        #[test]
        fn zero_optional_weights_are_neutral(inputs in arb_inputs()) {
            let config = ModelConfig {
                w_recent_form: 0.0,
                w_minutes_trend: 0.0,
                w_pace: 0.0,
                w_b2b_penalty: 0.0,
                ..ModelConfig::default()
            };
            let out = project(&inputs, &config);
            prop_assert_eq!(out.mult_recent, 1.0);
            prop_assert_eq!(out.mult_minutes, 1.0);
            prop_assert_eq!(out.mult_pace, 1.0);
            prop_assert_eq!(out.mult_b2b, 1.0);
        }
    }
}
