//! Shared calculation pipeline used by the CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! World Bank fetch -> year filtering -> gap filling -> trajectory -> statistics
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::{InflationResponse, WorldBankClient};
use crate::domain::{CalculatorInput, FilledSeries, InflationStats, RawObservation, ValuePoint};
use crate::error::DataError;
use crate::math::{build_trajectory, fill_gaps};

/// All computed outputs of one calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutput {
    pub input: CalculatorInput,
    /// Year the principal is anchored at.
    pub current_year: i32,
    pub country_name: Option<String>,
    pub series: FilledSeries,
    pub trajectory: Vec<ValuePoint>,
    pub stats: Option<InflationStats>,
}

/// What the UI shows once a submission has been processed.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// No concrete observation in the requested period.
    NoData,
    /// Recoverable failure (network, malformed response, ...).
    Failed(String),
    Ready(Box<RunOutput>),
}

impl Outcome {
    pub fn from_result(result: Result<RunOutput, DataError>) -> Self {
        match result {
            Ok(run) => Outcome::Ready(Box::new(run)),
            Err(DataError::NoUsableData) => Outcome::NoData,
            Err(err) => {
                log::warn!("calculation failed: {err}");
                Outcome::Failed(err.to_string())
            }
        }
    }
}

/// Fetch data for `input` and run the full calculation.
pub fn run_calculation(
    client: &WorldBankClient,
    input: &CalculatorInput,
    current_year: i32,
) -> Result<RunOutput, DataError> {
    let response = client.fetch_inflation(&input.country_code, input.start_year, current_year)?;
    run_with_response(input, response, current_year)
}

/// Run the calculation on already-fetched rows.
///
/// Rows outside `start_year..current_year` are ignored: the current year's
/// annual figure is never final, and the API may pad the range. Years the
/// response leaves out entirely are treated like years reported without a value.
pub fn run_with_response(
    input: &CalculatorInput,
    response: InflationResponse,
    current_year: i32,
) -> Result<RunOutput, DataError> {
    let raw = one_row_per_year(&response.observations, input.start_year, current_year);

    let series = fill_gaps(&raw)?;
    if !series.deduced_years.is_empty() {
        log::info!(
            "{}: {} of {} years deduced",
            input.country_code,
            series.deduced_years.len(),
            series.len()
        );
    }

    let trajectory = build_trajectory(input.principal, &series, current_year)?;
    let stats = crate::report::compute_stats(&series);

    Ok(RunOutput {
        input: input.clone(),
        current_year,
        country_name: response.country_name,
        series,
        trajectory,
        stats,
    })
}

/// One observation per year in `start_year..end_year`, in ascending order.
///
/// The first row wins for duplicate years; absent years get `rate = None`.
fn one_row_per_year(observations: &[RawObservation], start_year: i32, end_year: i32) -> Vec<RawObservation> {
    let mut by_year: BTreeMap<i32, Option<f64>> = BTreeMap::new();
    for obs in observations {
        by_year.entry(obs.year).or_insert(obs.rate);
    }

    (start_year..end_year)
        .map(|year| {
            let rate = by_year.get(&year).copied().flatten();
            if !by_year.contains_key(&year) {
                log::debug!("no row for {year} in the response");
            }
            RawObservation::new(year, rate)
        })
        .collect()
}
