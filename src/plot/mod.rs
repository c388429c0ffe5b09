//! Chart rendering.
//!
//! - coordinate mapping + hover resolution (`geometry`)
//! - standalone SVG documents (`svg`)
//! - fixed-size terminal plots (`ascii`)
//!
//! All renderers consume a `ChartSeries`, so the same data prep feeds the CLI,
//! the SVG export and the TUI.

pub mod ascii;
pub mod geometry;
pub mod svg;

pub use ascii::render_ascii_plot;
pub use geometry::{ChartGeometry, HoverState, TooltipDirection, ValueBounds, nearest_index};
pub use svg::{render_svg_chart, render_svg_document};

use crate::domain::{FilledSeries, ValueKind, ValuePoint};

/// One plotted point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPoint {
    pub year: i32,
    pub value: f64,
    /// Drawn with a hollow marker (synthesized inflation year).
    pub deduced: bool,
}

/// A year-indexed series ready for plotting.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub kind: ValueKind,
    pub title: String,
    pub points: Vec<ChartPoint>,
}

impl ChartSeries {
    /// Annual inflation rates (fractions), deduced years flagged.
    pub fn inflation(series: &FilledSeries) -> Self {
        Self {
            kind: ValueKind::Percentage,
            title: "Inflation".to_string(),
            points: series
                .observations
                .iter()
                .map(|o| ChartPoint {
                    year: o.year,
                    value: o.rate,
                    deduced: o.was_deduced,
                })
                .collect(),
        }
    }

    /// Money trajectory.
    pub fn value(trajectory: &[ValuePoint]) -> Self {
        Self {
            kind: ValueKind::Money,
            title: "Value".to_string(),
            points: trajectory
                .iter()
                .map(|p| ChartPoint {
                    year: p.year,
                    value: p.amount,
                    deduced: false,
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn bounds(&self) -> Option<ValueBounds> {
        ValueBounds::from_values(self.points.iter().map(|p| p.value))
    }

    /// Format a value the way this chart's tooltip shows it.
    pub fn format_value(&self, value: f64) -> String {
        match self.kind {
            ValueKind::Money => crate::report::format_money(value),
            ValueKind::Percentage => crate::report::format_percent(value),
        }
    }
}
