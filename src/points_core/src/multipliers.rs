//! The base blend and the eight contextual multipliers.
//!
//! Every multiplier is centred on 1.0. Factors driven by a relative
//! deviation return exactly 1.0 when their denominator is non-positive or
//! their weight is zero, so none of them can produce NaN or infinity from
//! finite inputs.

use crate::config::ModelConfig;
use crate::inputs::PlayerInputs;

/// Clamp `x` into `[lo, hi]`.
#[inline]
pub fn clamp(x: f64, lo: f64, hi: f64) -> f64 {
    if x < lo {
        lo
    } else if x > hi {
        hi
    } else {
        x
    }
}

/// `(value - baseline) / baseline`, or 0.0 when the baseline is non-positive.
#[inline]
fn relative_deviation(value: f64, baseline: f64) -> f64 {
    if baseline > 0.0 {
        (value - baseline) / baseline
    } else {
        0.0
    }
}

/// Blend of the sportsbook line and the season average.
///
/// This is the quantity the combined multiplier scales; it is never clamped.
pub fn base_points(inputs: &PlayerInputs, config: &ModelConfig) -> f64 {
    config.w_base_line * inputs.player_line_pts + config.w_base_season_avg * inputs.season_avg_pts
}

/// Flat boost at home, flat penalty on the road.
pub fn home_away_multiplier(inputs: &PlayerInputs, config: &ModelConfig) -> f64 {
    let delta = if inputs.is_home {
        config.w_home_away
    } else {
        -config.w_home_away
    };
    1.0 + delta
}

/// Game O/U relative to the league average game total.
pub fn game_total_multiplier(inputs: &PlayerInputs, config: &ModelConfig) -> f64 {
    let rel = relative_deviation(inputs.game_total_ou, config.league_avg_game_total);
    1.0 + rel * config.w_game_total
}

/// Team O/U relative to the league average team total.
pub fn team_total_multiplier(inputs: &PlayerInputs, config: &ModelConfig) -> f64 {
    let rel = relative_deviation(inputs.team_total_ou, config.league_avg_team_total);
    1.0 + rel * config.w_team_total
}

/// Boost when the opponent allows more than the league baseline to this
/// position, penalty when it allows less.
pub fn defense_vs_pos_multiplier(inputs: &PlayerInputs, config: &ModelConfig) -> f64 {
    let rel = relative_deviation(
        inputs.opp_pts_allowed_vs_pos,
        config.league_base_pts_allowed_pos,
    );
    1.0 + rel * config.w_def_vs_pos
}

/// Recent scoring relative to the season average.
pub fn recent_form_multiplier(inputs: &PlayerInputs, config: &ModelConfig) -> f64 {
    if config.w_recent_form == 0.0 || inputs.season_avg_pts <= 0.0 {
        return 1.0;
    }
    let rel = (inputs.resolved_recent_avg() - inputs.season_avg_pts) / inputs.season_avg_pts;
    1.0 + rel * config.w_recent_form
}

/// Expected minutes tonight relative to season average minutes.
pub fn minutes_trend_multiplier(inputs: &PlayerInputs, config: &ModelConfig) -> f64 {
    let season_minutes = inputs.resolved_season_minutes();
    if config.w_minutes_trend == 0.0 || season_minutes <= 0.0 {
        return 1.0;
    }
    let rel = (inputs.resolved_expected_minutes() - season_minutes) / season_minutes;
    1.0 + rel * config.w_minutes_trend
}

/// Matchup pace relative to the league average pace.
pub fn pace_multiplier(inputs: &PlayerInputs, config: &ModelConfig) -> f64 {
    if config.w_pace == 0.0 || config.league_avg_pace <= 0.0 {
        return 1.0;
    }
    let pace = inputs.resolved_pace(config.league_avg_pace);
    let rel = (pace - config.league_avg_pace) / config.league_avg_pace;
    1.0 + rel * config.w_pace
}

/// Fixed penalty on the second night of a back-to-back.
pub fn back_to_back_multiplier(inputs: &PlayerInputs, config: &ModelConfig) -> f64 {
    if !inputs.is_back_to_back || config.w_b2b_penalty <= 0.0 {
        return 1.0;
    }
    1.0 - config.w_b2b_penalty
}
