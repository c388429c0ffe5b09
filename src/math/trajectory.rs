//! Value trajectory: what the principal corresponds to in earlier years.
//!
//! Convention: the principal is anchored at `anchor_year` (today) and the walk
//! goes backward, compounding each year's inflation:
//!
//! ```text
//! value(anchor) = principal
//! value(y)      = value(y + 1) * (1 + rate(y))
//! ```
//!
//! The inverse walk (`deflate_forward`) divides by the same factors and lands
//! back on the principal.

use crate::domain::{FilledSeries, ValuePoint};
use crate::error::DataError;

/// Build the year-by-year trajectory, oldest first.
///
/// The result has `series.len() + 1` points: every filled year plus the
/// anchor year holding the principal. The series must cover consecutive
/// years ending the year before `anchor_year`.
pub fn build_trajectory(
    principal: f64,
    series: &FilledSeries,
    anchor_year: i32,
) -> Result<Vec<ValuePoint>, DataError> {
    if !(principal.is_finite() && principal > 0.0) {
        return Err(DataError::InvalidInput(format!(
            "Amount must be a positive number (got {principal})."
        )));
    }
    if let Some(last) = series.last_year() {
        if last != anchor_year - 1 {
            return Err(DataError::InvalidInput(format!(
                "Inflation series ends in {last}; expected {} for anchor year {anchor_year}.",
                anchor_year - 1
            )));
        }
    }
    if let Some(pair) = series.observations.windows(2).find(|w| w[1].year != w[0].year + 1) {
        return Err(DataError::InvalidInput(format!(
            "Inflation series skips from {} to {}.",
            pair[0].year, pair[1].year
        )));
    }

    let mut points = Vec::with_capacity(series.len() + 1);
    points.push(ValuePoint {
        year: anchor_year,
        amount: principal,
    });

    let mut value = principal;
    for obs in series.observations.iter().rev() {
        value *= growth_factor(obs.year, obs.rate)?;
        points.push(ValuePoint {
            year: obs.year,
            amount: value,
        });
    }

    points.reverse();
    Ok(points)
}

/// Walk forward from the oldest amount, undoing each year's inflation.
///
/// `deflate_forward(build_trajectory(p, s, a)?[0].amount, s)` returns `p`.
pub fn deflate_forward(oldest_amount: f64, series: &FilledSeries) -> Result<f64, DataError> {
    let mut value = oldest_amount;
    for obs in &series.observations {
        value /= growth_factor(obs.year, obs.rate)?;
    }
    Ok(value)
}

fn growth_factor(year: i32, rate: f64) -> Result<f64, DataError> {
    let factor = 1.0 + rate;
    if !(factor.is_finite() && factor > 0.0) {
        return Err(DataError::InvalidRate { year, rate });
    }
    Ok(factor)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use approx::assert_relative_eq;

    use super::*;
    use crate::domain::FilledObservation;

    fn series(start: i32, rates: &[f64]) -> FilledSeries {
        FilledSeries {
            observations: rates
                .iter()
                .enumerate()
                .map(|(i, &rate)| FilledObservation {
                    year: start + i as i32,
                    rate,
                    was_deduced: false,
                })
                .collect(),
            deduced_years: BTreeSet::new(),
        }
    }

    #[test]
    fn trajectory_compounds_backward() {
        let s = series(2022, &[0.10, 0.05]);
        let points = build_trajectory(100.0, &s, 2024).unwrap();

        let years: Vec<i32> = points.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2022, 2023, 2024]);
        assert_relative_eq!(points[2].amount, 100.0);
        assert_relative_eq!(points[1].amount, 105.0, max_relative = 1e-12);
        assert_relative_eq!(points[0].amount, 115.5, max_relative = 1e-12);
    }

    #[test]
    fn round_trip_returns_principal() {
        let s = series(1990, &[0.031, 0.042, -0.004, 0.12, 0.0, 0.27, 0.018]);
        let points = build_trajectory(12_345.0, &s, 1997).unwrap();
        let back = deflate_forward(points[0].amount, &s).unwrap();
        assert_relative_eq!(back, 12_345.0, max_relative = 1e-9);
    }

    #[test]
    fn empty_series_is_just_the_anchor() {
        let points = build_trajectory(50.0, &FilledSeries::default(), 2026).unwrap();
        assert_eq!(points, vec![ValuePoint { year: 2026, amount: 50.0 }]);
    }

    #[test]
    fn rejects_rates_at_or_below_minus_one() {
        let s = series(2000, &[0.02, -1.0]);
        let err = build_trajectory(100.0, &s, 2002).unwrap_err();
        assert_eq!(err, DataError::InvalidRate { year: 2001, rate: -1.0 });
    }

    #[test]
    fn rejects_series_reaching_the_anchor() {
        let s = series(2024, &[0.02, 0.03]);
        assert!(build_trajectory(100.0, &s, 2025).is_err());
        assert!(build_trajectory(-1.0, &series(2000, &[0.01]), 2001).is_err());
    }

    #[test]
    fn rejects_series_with_missing_years() {
        // Ends two years before the anchor.
        let short = series(2020, &[0.02, 0.03]);
        assert!(matches!(
            build_trajectory(100.0, &short, 2023),
            Err(DataError::InvalidInput(_))
        ));

        // Hole in the middle.
        let mut holed = series(2020, &[0.02, 0.03, 0.04]);
        holed.observations.remove(1);
        let err = build_trajectory(100.0, &holed, 2023).unwrap_err();
        assert_eq!(err, DataError::InvalidInput("Inflation series skips from 2020 to 2022.".to_string()));
    }
}
