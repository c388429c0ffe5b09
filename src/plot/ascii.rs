//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - reported years: `o`
//! - deduced years: `x`
//! - line between consecutive years: `-`

use crate::plot::ChartSeries;
use crate::plot::geometry::ValueBounds;

/// Render a series on a `width x height` character grid with a one-line header.
pub fn render_ascii_plot(series: &ChartSeries, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let mut out = String::new();
    let (Some(first), Some(last)) = (series.points.first(), series.points.last()) else {
        out.push_str(&format!("Plot: {} (no data)\n", series.title));
        return out;
    };

    let (y_min, y_max) = series
        .bounds()
        .map(|b| pad_range(b.min, b.max, 0.05))
        .unwrap_or((0.0, 1.0));

    let mut grid = vec![vec![' '; width]; height];
    let n = series.len();
    let cells: Vec<(usize, usize)> = series
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| (map_x(i, n, width), map_y(p.value, y_min, y_max, height)))
        .collect();

    // Line first so markers overlay it.
    for pair in cells.windows(2) {
        draw_line(&mut grid, pair[0].0, pair[0].1, pair[1].0, pair[1].1, '-');
    }
    for (p, &(x, y)) in series.points.iter().zip(&cells) {
        grid[y][x] = if p.deduced { 'x' } else { 'o' };
    }

    out.push_str(&format!(
        "Plot: {} | years=[{}, {}] | y=[{}, {}]\n",
        series.title,
        first.year,
        last.year,
        series.format_value(y_min),
        series.format_value(y_max),
    ));

    for row in grid {
        let line: String = row.into_iter().collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let bounds = ValueBounds { min, max };
    if bounds.is_flat() {
        let pad = (min.abs() * frac).max(1e-12);
        return (min - pad, max + pad);
    }
    let pad = (max - min) * frac;
    (min - pad, max + pad)
}

fn map_x(i: usize, n: usize, width: usize) -> usize {
    if n <= 1 {
        return width / 2;
    }
    let u = i as f64 / (n as f64 - 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ValuePoint;

    #[test]
    fn plot_golden_snapshot_small() {
        let series = ChartSeries::value(&[
            ValuePoint { year: 2020, amount: 110.0 },
            ValuePoint { year: 2021, amount: 100.0 },
        ]);

        let txt = render_ascii_plot(&series, 10, 5);
        let expected = concat!(
            "Plot: Value | years=[2020, 2021] | y=[99.50, 110.50]\n",
            "o-\n",
            "  --\n",
            "    --\n",
            "      --\n",
            "        -o\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn empty_series_has_header_only() {
        let series = ChartSeries::value(&[]);
        assert_eq!(render_ascii_plot(&series, 20, 5), "Plot: Value (no data)\n");
    }

    #[test]
    fn single_point_is_centered() {
        let series = ChartSeries::value(&[ValuePoint { year: 2025, amount: 100.0 }]);
        let txt = render_ascii_plot(&series, 10, 5);
        assert!(txt.lines().any(|l| l == "     o"));
    }
}
