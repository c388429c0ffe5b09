//! Plotters-powered year/value chart widget for Ratatui.
//!
//! The chart is drawn edge to edge (no Plotters label areas) so that terminal
//! columns map linearly onto data indices; tick labels are drawn by the caller
//! around the chart rect.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::plot::{ChartGeometry, ChartSeries, ValueBounds};

/// A lightweight, render-only chart description.
///
/// All bounds are computed outside the render call (see `plot_bounds`).
pub struct InflatioChart<'a> {
    pub series: &'a ChartSeries,
    /// Index of the highlighted point.
    pub hovered: Option<usize>,
    /// X bounds (years).
    pub x_bounds: [f64; 2],
    /// Y bounds (fraction or money, depending on the series).
    pub y_bounds: [f64; 2],
    pub line_color: RGBColor,
}

impl<'a> Widget for InflatioChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 10 || area.height < 3 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let points: Vec<(f64, f64)> = self
            .series
            .points
            .iter()
            .map(|p| (f64::from(p.year), p.value))
            .collect();
        let hovered = self.hovered.and_then(|i| points.get(i).copied());

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(0)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Vertical guide under the hovered year.
            if let Some((hx, _)) = hovered {
                chart.draw_series(LineSeries::new([(hx, y0), (hx, y1)], &RGBColor(90, 90, 90)))?;
            }

            chart.draw_series(LineSeries::new(points.iter().copied(), &self.line_color))?;

            // Deduced years get a dim marker, reported years a bright one.
            //
            // `Circle` markers are avoided: the backend maps circle radii in
            // pixels onto normalized canvas units, which produces huge circles.
            chart.draw_series(self.series.points.iter().map(|p| {
                let color = if p.deduced { RGBColor(128, 128, 128) } else { WHITE };
                Pixel::new((f64::from(p.year), p.value), color)
            }))?;

            if let Some(point) = hovered {
                chart.draw_series(std::iter::once(Pixel::new(point, RGBColor(255, 255, 0))))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Axis bounds that place points where `ChartGeometry` puts them on its canvas.
///
/// The geometry keeps a marker radius of margin on each side and an extra
/// bottom margin, so the data range is widened by the same proportions. A
/// single year or a flat series gets a unit of padding instead.
pub fn plot_bounds(series: &ChartSeries, geometry: &ChartGeometry) -> Option<([f64; 2], [f64; 2])> {
    let first = f64::from(series.points.first()?.year);
    let last = f64::from(series.points.last()?.year);
    let bounds: ValueBounds = series.bounds()?;

    let inner_w = geometry.width - 2.0 * geometry.radius;
    let x_bounds = if last > first && inner_w > 0.0 {
        let pad = (last - first) * geometry.radius / inner_w;
        [first - pad, last + pad]
    } else {
        [first - 1.0, last + 1.0]
    };

    let span = geometry.height - 2.0 * geometry.radius - geometry.bottom_margin;
    let y_bounds = if bounds.is_flat() || span <= 0.0 {
        let pad = bounds.max.abs().max(1.0) * 0.5;
        [bounds.min - pad, bounds.max + pad]
    } else {
        let per_unit = (bounds.max - bounds.min) / span;
        [
            bounds.min - (geometry.radius + geometry.bottom_margin) * per_unit,
            bounds.max + geometry.radius * per_unit,
        ]
    };

    Some((x_bounds, y_bounds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ValuePoint;

    #[test]
    fn bounds_follow_canvas_margins() {
        let series = ChartSeries::value(&[
            ValuePoint { year: 2000, amount: 100.0 },
            ValuePoint { year: 2010, amount: 200.0 },
        ]);
        let g = ChartGeometry::default();
        let (x, y) = plot_bounds(&series, &g).unwrap();

        // Map the data ends back through the widened bounds: they must land
        // where the canvas geometry puts the first/last point.
        let fx = |year: f64| (year - x[0]) / (x[1] - x[0]) * g.width;
        assert!((fx(2000.0) - g.x(0, 2)).abs() < 1e-9);
        assert!((fx(2010.0) - g.x(1, 2)).abs() < 1e-9);

        let b = series.bounds().unwrap();
        let fy = |v: f64| g.height - (v - y[0]) / (y[1] - y[0]) * g.height;
        assert!((fy(100.0) - g.y(100.0, b)).abs() < 1e-9);
        assert!((fy(200.0) - g.y(200.0, b)).abs() < 1e-9);
    }

    #[test]
    fn single_flat_point_gets_padding() {
        let series = ChartSeries::value(&[ValuePoint { year: 2020, amount: 50.0 }]);
        let (x, y) = plot_bounds(&series, &ChartGeometry::default()).unwrap();
        assert_eq!(x, [2019.0, 2021.0]);
        assert_eq!(y, [25.0, 75.0]);
    }

    #[test]
    fn empty_series_has_no_bounds() {
        let series = ChartSeries::value(&[]);
        assert!(plot_bounds(&series, &ChartGeometry::default()).is_none());
    }
}
