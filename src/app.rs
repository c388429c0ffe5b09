//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - reads the clock (the only place the current year comes from)
//! - runs the calculation pipeline
//! - prints reports/plots
//! - writes optional exports

use std::path::Path;

use chrono::{Datelike, Local};
use clap::Parser;

use crate::cli::{CalcArgs, Command, CountriesArgs, PlotArgs};
use crate::data::WorldBankClient;
use crate::domain::{CalculatorInput, clamp_start_year, sanitize_principal};
use crate::error::AppError;
use crate::plot::{ChartGeometry, ChartSeries};

pub mod pipeline;
pub mod request;

use pipeline::{Outcome, RunOutput};

/// Default look-back when no start year is given.
pub const DEFAULT_LOOKBACK_YEARS: i32 = 5;

/// Entry point for the `inflatio` binary.
pub fn run() -> Result<(), AppError> {
    // We want `inflatio` and `inflatio -c FR` to behave like `inflatio tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Calc(args) => handle_calc(args),
        Command::Countries(args) => handle_countries(args),
        Command::Plot(args) => handle_plot(args),
        Command::Tui(args) => crate::tui::run(args, current_year()),
    }
}

/// Calendar year from the local clock.
pub fn current_year() -> i32 {
    Local::now().year()
}

fn handle_calc(args: CalcArgs) -> Result<(), AppError> {
    let current_year = args.current_year.unwrap_or_else(current_year);
    let input = calc_input_from_args(&args, current_year)?;
    let client = WorldBankClient::from_env()?;

    let run = match Outcome::from_result(pipeline::run_calculation(&client, &input, current_year)) {
        Outcome::Ready(run) => run,
        Outcome::NoData => {
            return Err(AppError::new(
                3,
                format!(
                    "No data available for {} since {}.",
                    input.country_code, input.start_year
                ),
            ));
        }
        Outcome::Failed(message) => return Err(AppError::new(4, message)),
    };

    println!("{}", crate::report::format_run_summary(&run));
    if args.table {
        println!("{}", crate::report::format_year_table(&run));
    }
    if !args.no_plot {
        print_plots(&run, args.width, args.height);
    }

    if let Some(path) = &args.svg {
        write_svg(path, &run)?;
    }
    if let Some(path) = &args.export {
        crate::io::export::write_results_csv(path, &run)?;
    }
    if let Some(path) = &args.export_json {
        crate::io::result::write_result_json(path, &run, Local::now().date_naive())?;
    }

    Ok(())
}

fn handle_countries(args: CountriesArgs) -> Result<(), AppError> {
    let client = WorldBankClient::from_env()?;
    let countries = client.fetch_countries()?;
    let query = args.search.unwrap_or_default();

    let hits = crate::data::search_countries(&countries, &query);
    if hits.is_empty() {
        return Err(AppError::new(3, format!("No country matches '{query}'.")));
    }
    for c in hits {
        println!("{:<3} {:<4} {:<40} {}", c.code, c.code3, c.name, c.region);
    }
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let result = crate::io::result::read_result_json(&args.result)?;

    println!("{}", crate::report::format_run_summary(&result.run));
    print_plots(&result.run, args.width, args.height);

    if let Some(path) = &args.svg {
        write_svg(path, &result.run)?;
    }
    Ok(())
}

fn print_plots(run: &RunOutput, width: usize, height: usize) {
    let inflation = ChartSeries::inflation(&run.series);
    let value = ChartSeries::value(&run.trajectory);
    println!("{}", crate::plot::render_ascii_plot(&inflation, width, height));
    println!("{}", crate::plot::render_ascii_plot(&value, width, height));
}

fn write_svg(path: &Path, run: &RunOutput) -> Result<(), AppError> {
    let svg = crate::plot::render_svg_document(run, &ChartGeometry::default());
    std::fs::write(path, svg)
        .map_err(|e| AppError::new(2, format!("Failed to write SVG '{}': {e}", path.display())))
}

/// Build validated input from CLI flags (same sanitizers as the TUI form).
pub fn calc_input_from_args(args: &CalcArgs, current_year: i32) -> Result<CalculatorInput, AppError> {
    let principal = sanitize_principal(&args.amount)
        .ok_or_else(|| AppError::new(2, format!("Amount must be a positive whole number (got '{}').", args.amount)))?;

    let requested = args.since.unwrap_or(current_year - DEFAULT_LOOKBACK_YEARS);
    let start_year = clamp_start_year(requested, current_year);
    if start_year != requested {
        log::warn!("start year {requested} clamped to {start_year}");
    }

    Ok(CalculatorInput::new(&args.country, principal, start_year, current_year)?)
}

/// Rewrite argv so `inflatio` defaults to `inflatio tui`.
///
/// Rules:
/// - `inflatio`                      -> `inflatio tui`
/// - `inflatio -c FR ...`            -> `inflatio tui -c FR ...`
/// - `inflatio --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "calc" | "countries" | "plot" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
