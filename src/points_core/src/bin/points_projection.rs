//! Points projection CLI
//!
//! Reads player inputs from flags, a JSON file, or interactive prompts,
//! projects them and prints either the labeled text report or JSON.
//!
//! ```text
//! points-projection --name "Some Guard" --line 25 --season-avg 23 --home \
//!     --game-total 229 --team-total 114.5 --def-vs-pos 23
//! points-projection --input slate.json --profile wnba --format json
//! points-projection --interactive
//! ```

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use points_core::{format_reports, ModelConfig, PlayerInputs, ProjectionEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Project a player's points from the sportsbook line, season average and
/// matchup context.
#[derive(Parser, Debug)]
#[command(name = "points-projection")]
#[command(version)]
#[command(about = "Project player points from betting lines and matchup context")]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// JSON model config; fields it omits keep the NBA defaults
    #[arg(long, conflicts_with = "profile")]
    config: Option<PathBuf>,

    /// Named calibration profile (nba, wnba, ncaab)
    #[arg(long, default_value = "nba")]
    profile: String,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// JSON file holding one input record or an array of them
    #[arg(long, conflicts_with = "interactive")]
    input: Option<PathBuf>,

    /// Prompt for each input on stdin
    #[arg(long)]
    interactive: bool,

    #[arg(long, required_unless_present_any = ["input", "interactive"])]
    name: Option<String>,

    /// Sportsbook points line
    #[arg(long, required_unless_present_any = ["input", "interactive"])]
    line: Option<f64>,

    #[arg(long, required_unless_present_any = ["input", "interactive"])]
    season_avg: Option<f64>,

    /// Playing at home (omit for away)
    #[arg(long)]
    home: bool,

    /// Game O/U total
    #[arg(long, required_unless_present_any = ["input", "interactive"])]
    game_total: Option<f64>,

    /// Team O/U total
    #[arg(long, required_unless_present_any = ["input", "interactive"])]
    team_total: Option<f64>,

    /// Opponent points allowed per game to this position
    #[arg(long, required_unless_present_any = ["input", "interactive"])]
    def_vs_pos: Option<f64>,

    /// Last-N games average (defaults to the season average)
    #[arg(long)]
    recent_avg: Option<f64>,

    #[arg(long)]
    season_minutes: Option<f64>,

    /// Expected minutes tonight (defaults to season minutes)
    #[arg(long)]
    expected_minutes: Option<f64>,

    /// Matchup pace in possessions per team (defaults to league average)
    #[arg(long)]
    pace: Option<f64>,

    /// Second night of a back-to-back
    #[arg(long)]
    b2b: bool,
}

impl Cli {
    fn flag_inputs(&self) -> Result<PlayerInputs> {
        fn required<T: Copy>(value: Option<T>, flag: &str) -> Result<T> {
            value.with_context(|| format!("missing --{}", flag))
        }

        let name = self.name.clone().context("missing --name")?;
        Ok(PlayerInputs {
            recent_avg_pts: self.recent_avg,
            season_avg_minutes: self.season_minutes,
            expected_minutes: self.expected_minutes,
            matchup_pace: self.pace,
            is_back_to_back: self.b2b,
            ..PlayerInputs::new(
                name,
                required(self.line, "line")?,
                required(self.season_avg, "season-avg")?,
                self.home,
                required(self.game_total, "game-total")?,
                required(self.team_total, "team-total")?,
                required(self.def_vs_pos, "def-vs-pos")?,
            )
        })
    }

    fn model_config(&self) -> Result<ModelConfig> {
        match &self.config {
            Some(path) => ModelConfig::from_file(path)
                .with_context(|| format!("loading config {}", path.display())),
            None => ModelConfig::profile(&self.profile).map_err(Into::into),
        }
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(io::stderr)
        .init();
}

/// Print `label`, then read one trimmed line. Errors on end of input.
fn ask<R: BufRead, W: Write>(reader: &mut R, writer: &mut W, label: &str) -> Result<String> {
    write!(writer, "{}", label)?;
    writer.flush()?;

    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        bail!("input ended before `{}` was answered", label.trim_end_matches(": "));
    }
    Ok(line.trim().to_string())
}

fn ask_f64<R: BufRead, W: Write>(reader: &mut R, writer: &mut W, label: &str) -> Result<f64> {
    let answer = ask(reader, writer, label)?;
    parse_number(&answer, label)
}

/// Blank answers leave the driver unset.
fn ask_optional_f64<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    label: &str,
) -> Result<Option<f64>> {
    let answer = ask(reader, writer, label)?;
    if answer.is_empty() {
        return Ok(None);
    }
    parse_number(&answer, label).map(Some)
}

fn ask_bool<R: BufRead, W: Write>(reader: &mut R, writer: &mut W, label: &str) -> Result<bool> {
    let answer = ask(reader, writer, label)?;
    match answer.to_ascii_lowercase().as_str() {
        "1" | "y" | "yes" | "true" => Ok(true),
        "0" | "n" | "no" | "false" | "" => Ok(false),
        other => bail!("expected 1/0 or yes/no for `{}`, got `{}`", label.trim_end_matches(": "), other),
    }
}

fn parse_number(answer: &str, label: &str) -> Result<f64> {
    let value: f64 = answer
        .parse()
        .with_context(|| format!("`{}` is not a number ({})", answer, label.trim_end_matches(": ")))?;
    if !value.is_finite() {
        bail!("`{}` must be finite", label.trim_end_matches(": "));
    }
    Ok(value)
}

/// Collect the eleven inputs one prompt at a time.
fn prompt_inputs<R: BufRead, W: Write>(reader: &mut R, writer: &mut W) -> Result<PlayerInputs> {
    let name = ask(reader, writer, "Player name: ")?;
    let line = ask_f64(reader, writer, "Sportsbook line (points): ")?;
    let season_avg = ask_f64(reader, writer, "Season avg points: ")?;
    let is_home = ask_bool(reader, writer, "Is home? (1=yes, 0=no): ")?;
    let game_total = ask_f64(reader, writer, "Game total O/U: ")?;
    let team_total = ask_f64(reader, writer, "Team total O/U: ")?;
    let def_vs_pos = ask_f64(
        reader,
        writer,
        "Opponent points allowed to this position (per game): ",
    )?;

    let recent_avg = ask_optional_f64(
        reader,
        writer,
        "Recent avg points (last N; blank to ignore): ",
    )?;
    let season_minutes = ask_optional_f64(reader, writer, "Season avg minutes (blank to ignore): ")?;
    let expected_minutes = ask_optional_f64(
        reader,
        writer,
        "Expected minutes this game (blank for season avg): ",
    )?;
    let pace = ask_optional_f64(
        reader,
        writer,
        "Matchup pace (possessions per team; blank for league avg): ",
    )?;
    let b2b = ask_bool(reader, writer, "Back-to-back? (1=yes, 0=no): ")?;

    Ok(PlayerInputs {
        recent_avg_pts: recent_avg,
        season_avg_minutes: season_minutes,
        expected_minutes,
        matchup_pace: pace,
        is_back_to_back: b2b,
        ..PlayerInputs::new(name, line, season_avg, is_home, game_total, team_total, def_vs_pos)
    })
}

fn run(cli: &Cli) -> Result<()> {
    let engine = ProjectionEngine::new(cli.model_config()?).context("invalid model config")?;

    let inputs = if cli.interactive {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        vec![prompt_inputs(&mut stdin.lock(), &mut stdout)?]
    } else if let Some(path) = &cli.input {
        PlayerInputs::from_file(path)
            .with_context(|| format!("loading inputs {}", path.display()))?
    } else {
        let inputs = cli.flag_inputs()?;
        inputs.validate()?;
        vec![inputs]
    };

    info!(count = inputs.len(), profile = %cli.profile, "projecting");
    let projections = engine.project_batch(&inputs);

    match cli.format {
        OutputFormat::Text => {
            println!();
            print!("{}", format_reports(&projections, engine.config()));
        }
        OutputFormat::Json => {
            let json = if projections.len() == 1 {
                serde_json::to_string_pretty(&projections[0])?
            } else {
                serde_json::to_string_pretty(&projections)?
            };
            println!("{}", json);
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "projection failed");
            eprintln!("error: {:#}", err);
            ExitCode::from(1)
        }
    }
}
