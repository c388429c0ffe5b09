//! Shared domain types.
//!
//! These types are kept lightweight and serializable so they can be:
//!
//! - used in-memory by the fill/trajectory pipeline
//! - exported to JSON/CSV
//! - reloaded later for plotting

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// One calendar year as returned by the data source.
///
/// `rate` is the annual inflation in **percent** (e.g. `2.5` for 2.5%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawObservation {
    pub year: i32,
    pub rate: Option<f64>,
}

impl RawObservation {
    pub fn new(year: i32, rate: Option<f64>) -> Self {
        Self { year, rate }
    }

    /// The concrete rate, if any. NaN/inf count as missing.
    pub fn concrete_rate(&self) -> Option<f64> {
        self.rate.filter(|r| r.is_finite())
    }
}

/// A year with a concrete inflation rate, stored as a **fraction** (0.025 for 2.5%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilledObservation {
    pub year: i32,
    pub rate: f64,
    /// True when the source had no value for this year and the rate was synthesized.
    pub was_deduced: bool,
}

/// Gap-filled inflation series, chronological ascending.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilledSeries {
    pub observations: Vec<FilledObservation>,
    pub deduced_years: BTreeSet<i32>,
}

impl FilledSeries {
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn first_year(&self) -> Option<i32> {
        self.observations.first().map(|o| o.year)
    }

    pub fn last_year(&self) -> Option<i32> {
        self.observations.last().map(|o| o.year)
    }

    pub fn rates(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.rate).collect()
    }
}

/// Money-equivalent of the principal at a given year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuePoint {
    pub year: i32,
    pub amount: f64,
}

/// Summary statistics over a filled series and its trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InflationStats {
    /// Number of filled years contributing to the trajectory.
    pub years: usize,
    /// `prod(1 + rate)` over the filled years.
    pub cumulative_factor: f64,
    /// Share of purchasing power lost over the period: `1 - 1 / factor`.
    pub purchasing_power_lost: f64,
    /// Geometric mean annual rate.
    pub geometric_mean_rate: f64,
    pub arithmetic_mean_rate: f64,
    pub highest: FilledObservation,
    pub lowest: FilledObservation,
    pub deduced_count: usize,
}

/// Which kind of value a chart displays (affects tooltip formatting only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Money,
    Percentage,
}

/// A country offered by the data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    /// ISO 3166-1 alpha-2 code.
    pub code: String,
    /// ISO 3166-1 alpha-3 code.
    pub code3: String,
    pub name: String,
    pub region: String,
}
