//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - daily new counts: `o`
//! - moving average: `-` line

use crate::domain::MetricRow;

/// Render daily counts and the moving average over row index.
///
/// Works for a fresh run (`RegionMetrics::rows`) and for a reloaded
/// `MetricsFile::rows` alike.
pub fn render_series_plot(rows: &[MetricRow], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let x_max = rows.len().saturating_sub(1).max(1) as f64;
    let (y_min, y_max) = y_range(rows).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Draw the average first so daily points overlay it.
    let curve: Vec<(f64, f64)> = rows
        .iter()
        .enumerate()
        .map(|(i, r)| (i as f64, r.moving_average))
        .collect();
    draw_curve(&mut grid, &curve, x_max, y_min, y_max);

    for (i, r) in rows.iter().enumerate() {
        let x = map_x(i as f64, x_max, width);
        let y = map_y(r.daily_new as f64, y_min, y_max, height);
        grid[y][x] = 'o';
    }

    let mut out = String::new();
    match (rows.first(), rows.last()) {
        (Some(first), Some(last)) => out.push_str(&format!(
            "Plot: dates=[{}, {}] | y=[{y_min:.2}, {y_max:.2}] cases/day\n",
            first.date, last.date
        )),
        _ => out.push_str("Plot: (no rows)\n"),
    }

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn y_range(rows: &[MetricRow]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for r in rows {
        let d = r.daily_new as f64;
        min_y = min_y.min(d).min(r.moving_average);
        max_y = max_y.max(d).max(r.moving_average);
    }

    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(t: f64, t_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = (t / t_max).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], x_max: f64, y_min: f64, y_max: f64) {
    if curve.is_empty() {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(t, y) in curve {
        let x = map_x(t, x_max, width);
        let yy = map_y(y, y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(grid, x0, y0, x, yy, '-');
        } else {
            grid[yy][x] = '-';
        }
        prev = Some((x, yy));
    }
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
