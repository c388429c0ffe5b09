//! Chart geometry: data -> logical canvas coordinates, pointer -> data index.
//!
//! The canvas is a fixed logical size (`1000 x 333.3` by default) that the
//! renderer scales to whatever it is drawn at. Markers are circles of radius
//! `r`, so the plot keeps `r` of margin on every side plus an extra bottom
//! margin for the filled area:
//!
//! ```text
//! x(i) = i / (n - 1) * (W - 2r) + r                       (n > 1)
//! y(v) = H - ((v - min) * (H - 2r - b) / (max - min) + r + b)
//! ```
//!
//! A single point sits at `W / 2`; a flat series sits at mid height.

use std::fmt::Write as _;

/// Logical canvas width.
pub const DEFAULT_WIDTH: f64 = 1000.0;
/// Stroke width of the line; markers use the same radius.
pub const LINE_WIDTH: f64 = 7.0;
/// Radius of the rounded bottom corners of the filled area.
pub const CORNER_RADIUS: f64 = 10.0;

/// Min/max over a series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueBounds {
    pub min: f64,
    pub max: f64,
}

impl ValueBounds {
    /// Bounds over the finite values; `None` if there are none.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in values.into_iter().filter(|v| v.is_finite()) {
            min = min.min(v);
            max = max.max(v);
        }
        (min.is_finite() && max.is_finite()).then_some(Self { min, max })
    }

    pub fn is_flat(&self) -> bool {
        self.max - self.min <= 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartGeometry {
    pub width: f64,
    pub height: f64,
    /// Marker radius, also the margin on each side.
    pub radius: f64,
    pub bottom_margin: f64,
}

impl Default for ChartGeometry {
    fn default() -> Self {
        Self::with_width(DEFAULT_WIDTH)
    }
}

impl ChartGeometry {
    /// Canvas of the given width with a 3:1 aspect ratio.
    pub fn with_width(width: f64) -> Self {
        let height = width / 3.0;
        Self {
            width,
            height,
            radius: LINE_WIDTH,
            bottom_margin: height / 10.0,
        }
    }

    /// Horizontal position of point `i` out of `n`.
    pub fn x(&self, i: usize, n: usize) -> f64 {
        if n <= 1 {
            return self.width / 2.0;
        }
        (i as f64 / (n as f64 - 1.0)) * (self.width - 2.0 * self.radius) + self.radius
    }

    /// Vertical position of value `v` (SVG convention: 0 is the top).
    pub fn y(&self, v: f64, bounds: ValueBounds) -> f64 {
        let span = self.height - 2.0 * self.radius - self.bottom_margin;
        let offset = self.radius + self.bottom_margin;
        if bounds.is_flat() {
            return self.height - (span / 2.0 + offset);
        }
        let interpolation = (v - bounds.min) * (span / (bounds.max - bounds.min)) + offset;
        self.height - interpolation
    }

    /// Map a whole series to canvas coordinates.
    pub fn project(&self, values: &[f64]) -> Vec<(f64, f64)> {
        let Some(bounds) = ValueBounds::from_values(values.iter().copied()) else {
            return Vec::new();
        };
        let n = values.len();
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| (self.x(i, n), self.y(v, bounds)))
            .collect()
    }

    /// Filled area under the line, closed along the bottom with rounded corners.
    pub fn area_path(&self, points: &[(f64, f64)]) -> String {
        let Some(&(_, first_y)) = points.first() else {
            return String::new();
        };
        let (w, h, m, r) = (self.width, self.height, self.radius, CORNER_RADIUS);

        let mut d = line_path(points);
        let _ = write!(
            d,
            " L {} {} Q {} {}, {} {} L {} {} Q {} {}, {} {} L {} {}",
            num(w - m),
            num(h - r),
            num(w - m),
            num(h),
            num(w - m - r),
            num(h),
            num(m + r),
            num(h),
            num(m),
            num(h),
            num(m),
            num(h - r),
            num(m),
            num(first_y),
        );
        d
    }

    /// Tooltip anchor in container pixels for a canvas point.
    ///
    /// `rendered` is where the canvas sits inside its container. A tooltip
    /// opening to the left is shifted by its own width so it ends at the point.
    pub fn tooltip_position(
        &self,
        point: (f64, f64),
        rendered: RenderedBox,
        direction: TooltipDirection,
        tooltip_width: f64,
    ) -> (f64, f64) {
        let scale_x = rendered.width / self.width;
        let scale_y = rendered.height / self.height;
        let shift = match direction {
            TooltipDirection::Right => 0.0,
            TooltipDirection::Left => tooltip_width,
        };
        (
            point.0 * scale_x + rendered.left - shift,
            point.1 * scale_y + rendered.top,
        )
    }
}

/// `M x0 y0 L x1 y1 ...` through the points.
pub fn line_path(points: &[(f64, f64)]) -> String {
    let joined: Vec<String> = points.iter().map(|&(x, y)| format!("{} {}", num(x), num(y))).collect();
    if joined.is_empty() {
        return String::new();
    }
    format!("M {}", joined.join(" L "))
}

/// Nearest data index for a pointer `px` pixels from the chart's left edge.
///
/// Points are `rendered_width / (n - 1)` apart; the result is clamped to
/// `[0, n - 1]`. With a single point (or nothing usable) the answer is 0.
pub fn nearest_index(px: f64, rendered_width: f64, n: usize) -> usize {
    if n <= 1 || !(px.is_finite() && rendered_width.is_finite() && rendered_width > 0.0) {
        return 0;
    }
    let space = rendered_width / (n as f64 - 1.0);
    let idx = (px / space).round();
    if idx <= 0.0 {
        0
    } else {
        (idx as usize).min(n - 1)
    }
}

/// Where the canvas is drawn, relative to its container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderedBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TooltipDirection {
    #[default]
    Right,
    Left,
}

/// Transient "which point is under the pointer" state of one chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HoverState {
    hovered: Option<usize>,
}

impl HoverState {
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Pointer moved to `px` over a chart drawn `rendered_width` wide.
    pub fn pointer_moved(&mut self, px: f64, rendered_width: f64, n: usize) -> Option<usize> {
        self.hovered = (n > 0).then(|| nearest_index(px, rendered_width, n));
        self.hovered
    }

    /// Keyboard stepping; starts at the last point when nothing is hovered.
    pub fn step(&mut self, delta: isize, n: usize) -> Option<usize> {
        if n == 0 {
            self.hovered = None;
            return None;
        }
        let current = self.hovered.unwrap_or(n - 1) as isize;
        let next = (current + delta).clamp(0, n as isize - 1) as usize;
        self.hovered = Some(next);
        self.hovered
    }

    pub fn pointer_left(&mut self) {
        self.hovered = None;
    }
}

fn num(v: f64) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn x_spans_margins() {
        let g = ChartGeometry::default();
        assert_eq!(g.x(0, 5), g.radius);
        assert!((g.x(4, 5) - (g.width - g.radius)).abs() < 1e-9);
        assert_eq!(g.x(0, 1), g.width / 2.0);
    }

    #[test]
    fn y_maps_min_to_bottom_band_and_max_to_top() {
        let g = ChartGeometry::default();
        let b = ValueBounds { min: 10.0, max: 20.0 };
        assert!((g.y(10.0, b) - (g.height - g.radius - g.bottom_margin)).abs() < 1e-9);
        assert!((g.y(20.0, b) - g.radius).abs() < 1e-9);
    }

    #[test]
    fn flat_series_sits_at_mid_height() {
        let g = ChartGeometry::default();
        let pts = g.project(&[5.0, 5.0, 5.0]);
        let expected = g.height - ((g.height - 2.0 * g.radius - g.bottom_margin) / 2.0 + g.radius + g.bottom_margin);
        assert!(pts.iter().all(|&(_, y)| (y - expected).abs() < 1e-9 && y.is_finite()));
    }

    #[test]
    fn nearest_index_rounds_and_clamps() {
        assert_eq!(nearest_index(0.0, 500.0, 11), 0);
        assert_eq!(nearest_index(24.0, 500.0, 11), 0);
        assert_eq!(nearest_index(26.0, 500.0, 11), 1);
        assert_eq!(nearest_index(499.0, 500.0, 11), 10);
        assert_eq!(nearest_index(900.0, 500.0, 11), 10);
        assert_eq!(nearest_index(-40.0, 500.0, 11), 0);
        assert_eq!(nearest_index(123.0, 500.0, 1), 0);
        assert_eq!(nearest_index(123.0, 0.0, 4), 0);
    }

    #[test]
    fn hover_state_tracks_pointer() {
        let mut hover = HoverState::default();
        assert_eq!(hover.pointer_moved(250.0, 500.0, 3), Some(1));
        assert_eq!(hover.step(5, 3), Some(2));
        assert_eq!(hover.step(-1, 3), Some(1));
        hover.pointer_left();
        assert_eq!(hover.hovered(), None);
        assert_eq!(hover.step(-1, 3), Some(1));
        assert_eq!(hover.pointer_moved(10.0, 500.0, 0), None);
    }

    #[test]
    fn paths_are_built_from_points() {
        let g = ChartGeometry::default();
        let pts = [(7.0, 100.0), (993.0, 7.5)];
        assert_eq!(line_path(&pts), "M 7 100 L 993 7.5");
        let area = g.area_path(&pts);
        assert!(area.starts_with("M 7 100 L 993 7.5 L 993 "));
        assert!(area.ends_with("L 7 100"));
        assert!(g.area_path(&[]).is_empty());
    }

    #[test]
    fn tooltip_scales_and_flips() {
        let g = ChartGeometry::default();
        let rendered = RenderedBox { left: 20.0, top: 10.0, width: 500.0, height: g.height / 2.0 };
        let right = g.tooltip_position((100.0, 60.0), rendered, TooltipDirection::Right, 80.0);
        assert!((right.0 - 70.0).abs() < 1e-9);
        assert!((right.1 - 40.0).abs() < 1e-9);
        let left = g.tooltip_position((100.0, 60.0), rendered, TooltipDirection::Left, 80.0);
        assert!((left.0 - -10.0).abs() < 1e-9);
    }
}
