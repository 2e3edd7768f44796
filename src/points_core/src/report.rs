use std::fmt;

use crate::config::ModelConfig;
use crate::projection::Projection;

/// Labeled text rendering of a projection, one field per line.
///
/// Points print with two decimals, multipliers with four. `config` supplies
/// the caps shown next to the final multiplier.
pub struct Report<'a> {
    pub projection: &'a Projection,
    pub config: &'a ModelConfig,
}

impl<'a> Report<'a> {
    pub fn new(projection: &'a Projection, config: &'a ModelConfig) -> Self {
        Report { projection, config }
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.projection;
        writeln!(f, "Projection for {}", p.player_name)?;
        writeln!(f, "Base points (blend): {:.2}", p.base_points)?;
        writeln!(f, "Multipliers:")?;
        writeln!(f, "  Home/Away         : {:.4}", p.mult_home_away)?;
        writeln!(f, "  Game Total (OU)   : {:.4}", p.mult_game_total)?;
        writeln!(f, "  Team Total (OU)   : {:.4}", p.mult_team_total)?;
        writeln!(f, "  Def vs Position   : {:.4}", p.mult_def_pos)?;
        writeln!(f, "  Recent Form       : {:.4}", p.mult_recent)?;
        writeln!(f, "  Minutes Trend     : {:.4}", p.mult_minutes)?;
        writeln!(f, "  Pace              : {:.4}", p.mult_pace)?;
        writeln!(f, "  Back-to-Back      : {:.4}", p.mult_b2b)?;
        writeln!(f, "Uncapped Multiplier : {:.4}", p.uncapped_multiplier)?;
        writeln!(
            f,
            "Final Multiplier    : {:.4}  (capped to [{:.2}, {:.2}])",
            p.final_multiplier, self.config.mult_min, self.config.mult_max
        )?;
        writeln!(f, "Projected Points    : {:.2}", p.projection)
    }
}

/// Render several projections separated by blank lines.
pub fn format_reports(projections: &[Projection], config: &ModelConfig) -> String {
    let mut out = String::new();
    for (i, projection) in projections.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&Report::new(projection, config).to_string());
    }
    out
}
