//! Gap filling for annual inflation series.
//!
//! The World Bank reports one row per year but often without a value (the
//! year is not published yet, or the statistics office never reported it).
//! Every year in the requested range needs a rate for the trajectory, so
//! missing years are synthesized from their neighbours:
//!
//! ```text
//! leading gap   -> copy of the first known rate      (carry back)
//! interior gap  -> linear blend of the two neighbours
//! trailing gap  -> copy of the last known rate       (carry forward)
//! ```
//!
//! Synthesized years are reported in `FilledSeries::deduced_years`.

use std::collections::BTreeSet;

use crate::domain::{FilledObservation, FilledSeries, RawObservation};
use crate::error::DataError;

/// Fill missing years and convert percentages to fractions.
///
/// The input may be in ascending or descending year order; the output is
/// always ascending. Fails with `NoUsableData` when no year has a value.
pub fn fill_gaps(raw: &[RawObservation]) -> Result<FilledSeries, DataError> {
    if raw.is_empty() {
        return Err(DataError::NoUsableData);
    }

    let ordered = chronological(raw);
    let next_known = next_known_indices(&ordered);

    let mut observations = Vec::with_capacity(ordered.len());
    let mut deduced_years = BTreeSet::new();
    // Last concrete rate (percent) and its index.
    let mut previous: Option<(usize, f64)> = None;

    for (i, obs) in ordered.iter().enumerate() {
        if let Some(rate) = obs.concrete_rate() {
            previous = Some((i, rate));
            observations.push(FilledObservation {
                year: obs.year,
                rate: rate / 100.0,
                was_deduced: false,
            });
            continue;
        }

        let next = next_known[i].and_then(|j| ordered[j].concrete_rate().map(|rate| (j, rate)));
        let rate = match (previous, next) {
            (None, None) => return Err(DataError::NoUsableData),
            (None, Some((_, next_rate))) => next_rate,
            (Some((_, prev_rate)), None) => prev_rate,
            (Some((prev_i, prev_rate)), Some((next_i, next_rate))) => {
                // next_i > i > prev_i, so the span is never zero.
                let u = (i - prev_i) as f64 / (next_i - prev_i) as f64;
                prev_rate + (next_rate - prev_rate) * u
            }
        };

        log::debug!("deduced {} inflation: {rate:.4}%", obs.year);
        deduced_years.insert(obs.year);
        observations.push(FilledObservation {
            year: obs.year,
            rate: rate / 100.0,
            was_deduced: true,
        });
    }

    Ok(FilledSeries {
        observations,
        deduced_years,
    })
}

/// Sort ascending by year; for duplicate years keep the first occurrence.
fn chronological(raw: &[RawObservation]) -> Vec<RawObservation> {
    let mut ordered = raw.to_vec();
    ordered.sort_by_key(|o| o.year);
    ordered.dedup_by_key(|o| o.year);
    ordered
}

/// For each index, the nearest index `j > i` with a concrete rate.
fn next_known_indices(ordered: &[RawObservation]) -> Vec<Option<usize>> {
    let mut out = vec![None; ordered.len()];
    let mut next = None;
    for i in (0..ordered.len()).rev() {
        out[i] = next;
        if ordered[i].concrete_rate().is_some() {
            next = Some(i);
        }
    }
    out
}
