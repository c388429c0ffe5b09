//! Reporting utilities: summary statistics and formatted terminal output.

pub mod format;

pub use format::*;

use crate::domain::{FilledObservation, FilledSeries, InflationStats};

/// Summary statistics over a filled series; `None` when the series is empty.
pub fn compute_stats(series: &FilledSeries) -> Option<InflationStats> {
    let first = *series.observations.first()?;

    let mut factor = 1.0;
    let mut sum = 0.0;
    let mut highest = first;
    let mut lowest = first;
    for obs in &series.observations {
        factor *= 1.0 + obs.rate;
        sum += obs.rate;
        if obs.rate > highest.rate {
            highest = *obs;
        }
        if obs.rate < lowest.rate {
            lowest = *obs;
        }
    }

    let n = series.len();
    Some(InflationStats {
        years: n,
        cumulative_factor: factor,
        purchasing_power_lost: 1.0 - 1.0 / factor,
        geometric_mean_rate: factor.powf(1.0 / n as f64) - 1.0,
        arithmetic_mean_rate: sum / n as f64,
        highest,
        lowest,
        deduced_count: series.deduced_years.len(),
    })
}

/// Deduced observations, oldest first.
pub fn deduced_observations(series: &FilledSeries) -> Vec<FilledObservation> {
    series.observations.iter().filter(|o| o.was_deduced).copied().collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn stats_over_two_years() {
        let series = FilledSeries {
            observations: vec![
                FilledObservation { year: 2020, rate: 0.10, was_deduced: false },
                FilledObservation { year: 2021, rate: 0.05, was_deduced: true },
            ],
            deduced_years: BTreeSet::from([2021]),
        };
        let stats = compute_stats(&series).unwrap();
        assert_eq!(stats.years, 2);
        assert_relative_eq!(stats.cumulative_factor, 1.155, max_relative = 1e-12);
        assert_relative_eq!(stats.purchasing_power_lost, 1.0 - 1.0 / 1.155, max_relative = 1e-12);
        assert_relative_eq!(stats.geometric_mean_rate, 1.155_f64.sqrt() - 1.0, max_relative = 1e-12);
        assert_relative_eq!(stats.arithmetic_mean_rate, 0.075, max_relative = 1e-12);
        assert_eq!(stats.highest.year, 2020);
        assert_eq!(stats.lowest.year, 2021);
        assert_eq!(stats.deduced_count, 1);
        assert_eq!(deduced_observations(&series).len(), 1);
    }

    #[test]
    fn stats_of_empty_series() {
        assert!(compute_stats(&FilledSeries::default()).is_none());
    }
}
