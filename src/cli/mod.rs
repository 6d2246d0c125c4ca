//! Command-line parsing for the Taylor-rule simulator.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the fetching/modeling code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::domain::{
    DEFAULT_END_PERIOD, DEFAULT_GDP_SERIES, DEFAULT_INFLATION_SERIES, DEFAULT_POLICY_RATE_SERIES,
    DEFAULT_POTENTIAL_GDP_SERIES, DEFAULT_ROLLING_WINDOW, DEFAULT_START_PERIOD, DEFAULT_YEARS, LengthPolicy,
    ZeroPotentialPolicy,
};

pub mod prompt;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "taylor", version, about = "ECB policy-rate simulator (Taylor rule on ECB Data Portal series)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch inputs, simulate the policy rate, print a summary and optionally plot/export.
    Simulate(SimulateArgs),
    /// Evaluate the rule once for values typed at a prompt (or given as flags).
    Calc(CalcArgs),
    /// Launch the interactive dashboard.
    ///
    /// This uses the same pipeline as `taylor simulate`, but renders the three
    /// chart panels in a terminal UI using Ratatui.
    Dashboard(DashboardArgs),
}

/// Data sources, rule parameters and derivation policies.
#[derive(Debug, Args, Clone)]
pub struct ModelArgs {
    /// Override the API base URL (else $ECB_API_BASE_URL, else the public portal).
    #[arg(long)]
    pub base_url: Option<String>,

    /// Inflation series (FLOW/KEY).
    #[arg(long, default_value = DEFAULT_INFLATION_SERIES)]
    pub inflation_series: String,

    /// GDP series (FLOW/KEY).
    #[arg(long, default_value = DEFAULT_GDP_SERIES)]
    pub gdp_series: String,

    /// Potential GDP series (FLOW/KEY). Must differ from --gdp-series.
    #[arg(long, default_value = DEFAULT_POTENTIAL_GDP_SERIES)]
    pub potential_gdp_series: String,

    /// Reference policy rate series (FLOW/KEY).
    #[arg(long, default_value = DEFAULT_POLICY_RATE_SERIES)]
    pub policy_rate_series: String,

    /// Allow GDP and potential GDP to use the same series (output gap becomes zero).
    #[arg(long)]
    pub allow_shared_gdp_series: bool,

    /// First period requested (YYYY-MM or YYYY).
    #[arg(long, default_value = DEFAULT_START_PERIOD)]
    pub start: String,

    /// Last period requested (YYYY-MM or YYYY).
    #[arg(long, default_value = DEFAULT_END_PERIOD)]
    pub end: String,

    /// Horizon in years; monthly series target years * 12 points.
    #[arg(long, default_value_t = DEFAULT_YEARS)]
    pub years: usize,

    /// Long-run neutral policy rate (%).
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub equilibrium_rate: f64,

    /// Inflation target (%).
    #[arg(long, default_value_t = 2.0, allow_negative_numbers = true)]
    pub target_inflation: f64,

    /// Weight on the inflation deviation.
    #[arg(long, default_value_t = 1.5, allow_negative_numbers = true)]
    pub inflation_weight: f64,

    /// Weight on the output gap.
    #[arg(long, default_value_t = 0.5, allow_negative_numbers = true)]
    pub output_gap_weight: f64,

    /// Inflation used when the fetch fails (%).
    #[arg(long, default_value_t = 2.5, allow_negative_numbers = true)]
    pub inflation_default: f64,

    /// Policy rate used when the fetch fails (%).
    #[arg(long, default_value_t = 2.0, allow_negative_numbers = true)]
    pub policy_rate_default: f64,

    /// GDP level used when the fetch fails.
    #[arg(long, default_value_t = 100.0, allow_negative_numbers = true)]
    pub gdp_default: f64,

    /// Potential GDP level used when the fetch fails.
    #[arg(long, default_value_t = 102.0, allow_negative_numbers = true)]
    pub potential_gdp_default: f64,

    /// Keep GDP series at their native frequency instead of upsampling to monthly.
    #[arg(long)]
    pub native_gdp: bool,

    /// Rolling-mean window applied to GDP series.
    #[arg(long, default_value_t = DEFAULT_ROLLING_WINDOW)]
    pub rolling_window: usize,

    /// How series of different lengths are aligned.
    #[arg(long, value_enum, default_value_t = LengthPolicy::Truncate)]
    pub length_policy: LengthPolicy,

    /// Output gap where potential GDP is zero.
    #[arg(long, value_enum, default_value_t = ZeroPotentialPolicy::Nan)]
    pub zero_potential: ZeroPotentialPolicy,

    /// Fetch inputs one after another instead of concurrently.
    #[arg(long)]
    pub sequential: bool,

    /// First month of the chart's date axis (YYYY-MM).
    #[arg(long, default_value = "2000-01", value_parser = parse_month)]
    pub epoch: NaiveDate,
}

/// Options for `taylor simulate`.
#[derive(Debug, Parser, Clone)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Render an ASCII plot in the terminal.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height per panel (rows).
    #[arg(long, default_value_t = 12)]
    pub height: usize,

    /// Write the three-panel chart to an SVG file.
    #[arg(long, value_name = "SVG")]
    pub chart: Option<PathBuf>,

    /// Export the aligned series to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export the aligned series and input provenance to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,
}

/// Options for `taylor calc`. Missing values are prompted for.
#[derive(Debug, Parser, Clone, Default)]
pub struct CalcArgs {
    /// Equilibrium rate (%).
    #[arg(long, allow_negative_numbers = true)]
    pub equilibrium_rate: Option<f64>,

    /// Current inflation rate (%).
    #[arg(long, allow_negative_numbers = true)]
    pub inflation: Option<f64>,

    /// Target inflation rate (%).
    #[arg(long, allow_negative_numbers = true)]
    pub target_inflation: Option<f64>,

    /// Output gap (%).
    #[arg(long, allow_negative_numbers = true)]
    pub output_gap: Option<f64>,
}

/// Options for `taylor dashboard`.
#[derive(Debug, Parser, Clone)]
pub struct DashboardArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Where `s` saves the SVG chart.
    #[arg(long, value_name = "SVG", default_value = "taylor_simulation.svg")]
    pub chart: PathBuf,
}

/// Parse `YYYY-MM` into the first day of that month.
pub fn parse_month(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(&format!("{}-01", raw.trim()), "%Y-%m-%d")
        .map_err(|e| format!("invalid month '{raw}' (expected YYYY-MM): {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_month_accepts_year_month() {
        assert_eq!(parse_month("2000-01").unwrap(), NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
        assert!(parse_month("2000").is_err());
        assert!(parse_month("2000-13").is_err());
    }

    #[test]
    fn simulate_defaults_match_documented_configuration() {
        let cli = Cli::parse_from(["taylor", "simulate"]);
        let Command::Simulate(args) = cli.command else {
            panic!("expected simulate");
        };
        assert_eq!(args.model.years, 24);
        assert_eq!(args.model.inflation_series, "ICP/M.U2.N.000000.4.ANR");
        assert_eq!(args.model.length_policy, LengthPolicy::Truncate);
        assert!(!args.plot);
    }

    #[test]
    fn rule_parameters_and_defaults_accept_negative_values() {
        let cli = Cli::parse_from([
            "taylor",
            "simulate",
            "--policy-rate-default",
            "-0.5",
            "--inflation-default",
            "-0.3",
            "--target-inflation",
            "-1",
            "--output-gap-weight",
            "-0.25",
        ]);
        let Command::Simulate(args) = cli.command else {
            panic!("expected simulate");
        };
        assert_eq!(args.model.policy_rate_default, -0.5);
        assert_eq!(args.model.inflation_default, -0.3);
        assert_eq!(args.model.target_inflation, -1.0);
        assert_eq!(args.model.output_gap_weight, -0.25);
    }

    #[test]
    fn calc_flags_are_optional() {
        let cli = Cli::parse_from(["taylor", "calc", "--inflation", "2.5"]);
        let Command::Calc(args) = cli.command else {
            panic!("expected calc");
        };
        assert_eq!(args.inflation, Some(2.5));
        assert_eq!(args.output_gap, None);
    }
}
