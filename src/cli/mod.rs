//! Command-line parsing for the inflation calculator.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the numeric code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "inflatio", version, about = "Purchasing power over time (World Bank CPI inflation)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch inflation data, print the trajectory and statistics, optionally plot/export.
    Calc(CalcArgs),
    /// List or search the countries the World Bank reports on.
    Countries(CountriesArgs),
    /// Re-render a previously exported result JSON.
    Plot(PlotArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same calculation pipeline as `inflatio calc`, but renders
    /// results in a terminal UI using Ratatui.
    Tui(TuiArgs),
}

/// Options for a single calculation.
#[derive(Debug, Parser, Clone)]
pub struct CalcArgs {
    /// ISO alpha-2 or alpha-3 country code.
    #[arg(short = 'c', long, default_value = "US")]
    pub country: String,

    /// Amount of money held (digits only; separators like `1,000` are stripped).
    #[arg(short = 'a', long)]
    pub amount: String,

    /// Year the money has been held since (clamped to 1960..=last year).
    #[arg(short = 'y', long)]
    pub since: Option<i32>,

    /// Anchor year (defaults to the current calendar year).
    #[arg(long)]
    pub current_year: Option<i32>,

    /// Print the per-year table.
    #[arg(long)]
    pub table: bool,

    /// Disable the terminal plots.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 16)]
    pub height: usize,

    /// Write both charts as an SVG document.
    #[arg(long, value_name = "SVG")]
    pub svg: Option<PathBuf>,

    /// Export per-year results to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the full result (input + series + trajectory + stats) to JSON.
    #[arg(long = "export-json")]
    pub export_json: Option<PathBuf>,
}

/// Options for listing countries.
#[derive(Debug, Parser)]
pub struct CountriesArgs {
    /// Filter by code or part of the name (case-insensitive).
    #[arg(short = 's', long)]
    pub search: Option<String>,
}

/// Options for plotting a saved result.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Result JSON file produced by `inflatio calc --export-json`.
    #[arg(long, value_name = "JSON")]
    pub result: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 16)]
    pub height: usize,

    /// Also write both charts as an SVG document.
    #[arg(long, value_name = "SVG")]
    pub svg: Option<PathBuf>,
}

/// Initial form values for the TUI.
#[derive(Debug, Parser, Clone, Default)]
pub struct TuiArgs {
    /// ISO alpha-2 or alpha-3 country code.
    #[arg(short = 'c', long)]
    pub country: Option<String>,

    /// Amount of money held.
    #[arg(short = 'a', long)]
    pub amount: Option<String>,

    /// Year the money has been held since.
    #[arg(short = 'y', long)]
    pub since: Option<i32>,
}
