//! Standalone SVG rendering.
//!
//! Each chart is drawn on the logical canvas from `ChartGeometry`: a tinted
//! area under the line, the line itself, and one marker per year. Deduced
//! years get a hollow marker so synthesized rates stay visible.

use std::fmt::Write as _;

use crate::app::pipeline::RunOutput;
use crate::plot::geometry::{ChartGeometry, LINE_WIDTH, line_path};
use crate::plot::ChartSeries;

pub const INFLATION_COLOR: &str = "darkorange";
pub const VALUE_COLOR: &str = "red";

const TITLE_HEIGHT: f64 = 40.0;
const GAP: f64 = 30.0;

/// Render one chart as an `<svg>` element (no XML prolog).
pub fn render_svg_chart(series: &ChartSeries, geometry: &ChartGeometry, color: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}" width="100%">"#,
        geometry.width, geometry.height
    );
    out.push_str(&chart_body(series, geometry, color));
    out.push_str("</svg>\n");
    out
}

/// Render the inflation and value charts of a run, stacked, with titles.
pub fn render_svg_document(run: &RunOutput, geometry: &ChartGeometry) -> String {
    let charts = [
        (ChartSeries::inflation(&run.series), INFLATION_COLOR),
        (ChartSeries::value(&run.trajectory), VALUE_COLOR),
    ];

    let block = TITLE_HEIGHT + geometry.height;
    let total_height = block * charts.len() as f64 + GAP * (charts.len() as f64 - 1.0);

    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}" font-family="sans-serif">"#,
        geometry.width, total_height
    );

    for (i, (series, color)) in charts.iter().enumerate() {
        let top = i as f64 * (block + GAP);
        let subtitle = match (series.points.first(), series.points.last()) {
            (Some(first), Some(last)) => format!(
                "{} ({} - {})",
                series.title, first.year, last.year
            ),
            _ => series.title.clone(),
        };
        let _ = writeln!(
            out,
            r#"<text x="{}" y="{}" font-size="24" fill="black">{}</text>"#,
            geometry.radius,
            top + TITLE_HEIGHT * 0.7,
            escape(&format!("{} | {}", run.input.country_code, subtitle)),
        );
        let _ = writeln!(out, r#"<g transform="translate(0 {})">"#, top + TITLE_HEIGHT);
        out.push_str(&chart_body(series, geometry, color));
        out.push_str("</g>\n");
    }

    out.push_str("</svg>\n");
    out
}

fn chart_body(series: &ChartSeries, geometry: &ChartGeometry, color: &str) -> String {
    let points = geometry.project(&series.values());
    let mut out = String::new();
    if points.is_empty() {
        return out;
    }

    let _ = writeln!(
        out,
        r#"<path fill="{color}" opacity="0.15" d="{}"/>"#,
        geometry.area_path(&points)
    );
    let _ = writeln!(
        out,
        r#"<path fill="none" stroke="{color}" stroke-width="{LINE_WIDTH}" stroke-linejoin="round" d="{}"/>"#,
        line_path(&points)
    );

    out.push_str("<g>\n");
    for (point, &(x, y)) in series.points.iter().zip(&points) {
        let (fill, stroke) = if point.deduced { ("white", color) } else { (color, "none") };
        let _ = writeln!(
            out,
            r#"<circle cx="{x:.2}" cy="{y:.2}" r="{}" fill="{fill}" stroke="{stroke}" stroke-width="2"><title>{}: {}</title></circle>"#,
            geometry.radius,
            point.year,
            escape(&series.format_value(point.value)),
        );
    }
    out.push_str("</g>\n");
    out
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ValuePoint;

    #[test]
    fn chart_has_one_marker_per_point() {
        let series = ChartSeries::value(&[
            ValuePoint { year: 2020, amount: 110.0 },
            ValuePoint { year: 2021, amount: 105.0 },
            ValuePoint { year: 2022, amount: 100.0 },
        ]);
        let svg = render_svg_chart(&series, &ChartGeometry::default(), VALUE_COLOR);
        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches("<circle").count(), 3);
        assert!(svg.contains("<title>2020: 110.00</title>"));
        assert!(svg.contains(r#"cx="7.00""#));
        assert!(svg.contains(r#"cx="993.00""#));
    }

    #[test]
    fn empty_series_draws_nothing() {
        let series = ChartSeries::value(&[]);
        let svg = render_svg_chart(&series, &ChartGeometry::default(), VALUE_COLOR);
        assert!(!svg.contains("<path"));
    }
}
