//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - builds the simulation configuration
//! - fetches inputs and runs the rule
//! - prints reports/plots
//! - writes optional charts and exports

use clap::Parser;
use env_logger::Env;

use crate::cli::{CalcArgs, Command, DashboardArgs, ModelArgs, SimulateArgs};
use crate::domain::{SeriesCatalog, SimulationConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `taylor` binary.
pub fn run() -> Result<(), AppError> {
    // `taylor` and `taylor --plot` behave like `taylor simulate ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    // The dashboard owns the terminal; log lines would tear the frame.
    let default_level = match cli.command {
        Command::Dashboard(_) => "off",
        _ => "warn",
    };
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).try_init();

    match cli.command {
        Command::Simulate(args) => handle_simulate(args),
        Command::Calc(args) => handle_calc(args),
        Command::Dashboard(args) => handle_dashboard(args),
    }
}

fn handle_simulate(args: SimulateArgs) -> Result<(), AppError> {
    let config = simulation_config_from_args(&args.model)?;
    let output = pipeline::simulate(&config)?;

    println!("{}", crate::report::format_run_summary(&output, &config));

    if args.plot {
        let plot = crate::plot::render_ascii_chart(&output, config.epoch, args.width, args.height);
        println!("{plot}");
    }

    if let Some(path) = &args.chart {
        crate::plot::write_chart_svg(path, &output, config.epoch, crate::plot::DEFAULT_CHART_SIZE)?;
        println!("Chart written to {}", path.display());
    }
    if let Some(path) = &args.export {
        crate::io::write_results_csv(path, &output, config.epoch)?;
    }
    if let Some(path) = &args.export_json {
        crate::io::write_results_json(path, &output, &config)?;
    }

    Ok(())
}

fn handle_calc(args: CalcArgs) -> Result<(), AppError> {
    crate::cli::prompt::run_calculator(&args)
}

fn handle_dashboard(args: DashboardArgs) -> Result<(), AppError> {
    let config = simulation_config_from_args(&args.model)?;
    crate::tui::run(config, args.chart)
}

pub fn simulation_config_from_args(args: &ModelArgs) -> Result<SimulationConfig, AppError> {
    let catalog = SeriesCatalog::with_window(
        &args.inflation_series,
        &args.gdp_series,
        &args.potential_gdp_series,
        &args.policy_rate_series,
        &args.start,
        &args.end,
    )?;

    Ok(SimulationConfig {
        catalog,
        base_url: args.base_url.clone(),

        equilibrium_rate: args.equilibrium_rate,
        target_inflation: args.target_inflation,
        inflation_weight: args.inflation_weight,
        output_gap_weight: args.output_gap_weight,

        years: args.years,
        inflation_default: args.inflation_default,
        policy_rate_default: args.policy_rate_default,
        gdp_default: args.gdp_default,
        potential_gdp_default: args.potential_gdp_default,

        upsample_gdp: !args.native_gdp,
        rolling_window: args.rolling_window,
        length_policy: args.length_policy,
        zero_potential: args.zero_potential,
        parallel: !args.sequential,
        allow_shared_gdp_series: args.allow_shared_gdp_series,

        epoch: args.epoch,
    })
}

/// Rewrite argv so `taylor` defaults to `taylor simulate`.
///
/// Rules:
/// - `taylor`                      -> `taylor simulate`
/// - `taylor --plot ...`           -> `taylor simulate --plot ...`
/// - `taylor --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("simulate".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "simulate" | "calc" | "dashboard");
    if is_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "simulate".to_string());
        return argv;
    }

    argv
}
