//! Formatted terminal output.
//!
//! Formatting lives in one place so the numeric code stays clean and output
//! changes stay localized.

use crate::app::pipeline::RunOutput;
use crate::domain::InflationStats;

/// Format the run header and statistics block.
pub fn format_run_summary(run: &RunOutput) -> String {
    let mut out = String::new();
    let input = &run.input;

    out.push_str("=== inflatio - purchasing power over time ===\n");
    let country = match &run.country_name {
        Some(name) => format!("{name} ({})", input.country_code),
        None => input.country_code.clone(),
    };
    out.push_str(&format!("Country: {country}\n"));
    out.push_str(&format!(
        "Amount: {} in {} | since {}\n",
        format_money(input.principal),
        run.current_year,
        input.start_year,
    ));

    if let Some(first) = run.trajectory.first() {
        out.push_str(&format!(
            "Equivalent in {}: {}\n",
            first.year,
            format_money(first.amount)
        ));
    }

    if let Some(stats) = &run.stats {
        out.push('\n');
        out.push_str(&format_stats(stats));
    }

    if !run.series.deduced_years.is_empty() {
        let years: Vec<String> = run.series.deduced_years.iter().map(|y| y.to_string()).collect();
        out.push_str(&format!("\nNo source data for {}; rates were deduced.\n", years.join(", ")));
    }

    out
}

fn format_stats(stats: &InflationStats) -> String {
    let mut out = String::new();
    out.push_str("Statistics:\n");
    out.push_str(&format!("- years                : {}\n", stats.years));
    out.push_str(&format!("- cumulative inflation : {}\n", format_percent(stats.cumulative_factor - 1.0)));
    out.push_str(&format!("- purchasing power lost: {}\n", format_percent(stats.purchasing_power_lost)));
    out.push_str(&format!("- average (geometric)  : {}\n", format_percent(stats.geometric_mean_rate)));
    out.push_str(&format!("- average (arithmetic) : {}\n", format_percent(stats.arithmetic_mean_rate)));
    out.push_str(&format!(
        "- highest              : {} ({})\n",
        format_percent(stats.highest.rate),
        stats.highest.year
    ));
    out.push_str(&format!(
        "- lowest               : {} ({})\n",
        format_percent(stats.lowest.rate),
        stats.lowest.year
    ));
    out
}

/// Per-year table: inflation rate (`*` = deduced) and equivalent amount.
pub fn format_year_table(run: &RunOutput) -> String {
    let mut out = String::new();
    out.push_str(format!("{:<6} {:>10} {:>20}", "year", "inflation", "value").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<6} {:-<10} {:-<20}", "", "", "").trim_end());
    out.push('\n');

    for point in &run.trajectory {
        let rate = run
            .series
            .observations
            .iter()
            .find(|o| o.year == point.year)
            .map(|o| {
                let marker = if o.was_deduced { "*" } else { " " };
                format!("{}{marker}", format_percent(o.rate))
            })
            .unwrap_or_default();
        out.push_str(
            format!("{:<6} {:>10} {:>20}", point.year, rate, format_money(point.amount)).trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Money with thousands separators and two decimals (`1234.5` -> `1,234.50`).
pub fn format_money(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    let digits = format!("{:.2}", value.abs());
    let (int, frac) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(int.len() + int.len() / 3);
    for (i, ch) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && digits != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{frac}")
}

/// Fraction as a percentage with two decimals (`0.0312` -> `3.12%`).
pub fn format_percent(rate: f64) -> String {
    if !rate.is_finite() {
        return "-".to_string();
    }
    format!("{:.2}%", rate * 100.0)
}
