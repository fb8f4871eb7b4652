//! Correlation heatmap, drawn cell by cell in pixel coordinates.

use crate::stats::CorrelationMatrix;
use crate::utils::truncate_str;
use plotters::prelude::*;
use std::error::Error;
use std::path::Path;

/// Values are written into the cells up to this many columns.
const ANNOTATE_UP_TO: usize = 12;

const LEFT: i32 = 150;
const TOP: i32 = 150;
const COLOR_BAR_WIDTH: i32 = 30;

const NEGATIVE: (f64, f64, f64) = (33.0, 102.0, 172.0);
const POSITIVE: (f64, f64, f64) = (178.0, 24.0, 43.0);
const UNDEFINED: RGBColor = RGBColor(200, 200, 200);

/// Diverging blue-white-red colour for a correlation, saturated at `vmax`.
/// Undefined values are grey.
pub fn heat_color(value: Option<f64>, vmax: f64) -> RGBColor {
    let Some(v) = value.filter(|v| v.is_finite()) else {
        return UNDEFINED;
    };

    let t = (v / vmax).clamp(-1.0, 1.0);
    let (r, g, b) = if t >= 0.0 { POSITIVE } else { NEGATIVE };
    let t = t.abs();
    let mix = |end: f64| (255.0 + (end - 255.0) * t).round() as u8;
    RGBColor(mix(r), mix(g), mix(b))
}

/// Side of one cell in pixels for an `n`-column matrix.
pub fn cell_size(n: usize) -> i32 {
    (800 / n.max(1) as i32).clamp(8, 80)
}

pub(crate) fn draw_heatmap(
    path: &Path,
    title: &str,
    matrix: &CorrelationMatrix,
    vmax: f64,
) -> Result<(), Box<dyn Error>> {
    let n = matrix.columns.len();
    let cell = cell_size(n);
    let grid = cell * n as i32;
    let width = (LEFT + grid + COLOR_BAR_WIDTH + 100) as u32;
    let height = (TOP + grid + 40) as u32;

    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE)?;

    root.draw_text(
        title,
        &TextStyle::from(("sans-serif", 28).into_font()).color(&BLACK),
        (LEFT, 20),
    )?;

    let font_size = (cell as f64 * 0.6).clamp(8.0, 14.0);
    let label_font = FontDesc::new(FontFamily::SansSerif, font_size, FontStyle::Normal);
    let row_style = TextStyle::from(label_font.clone()).color(&BLACK);
    let col_style =
        TextStyle::from(label_font.transform(FontTransform::Rotate270)).color(&BLACK);

    for (i, name) in matrix.columns.iter().enumerate() {
        let offset = i as i32 * cell + cell / 2;
        let label = truncate_str(name, 18);
        root.draw_text(&label, &row_style, (10, TOP + offset - font_size as i32 / 2))?;
        root.draw_text(&label, &col_style, (LEFT + offset - font_size as i32 / 2, TOP - 10))?;
    }

    let annotate = n <= ANNOTATE_UP_TO;
    let value_style = TextStyle::from(("sans-serif", 14).into_font()).color(&BLACK);

    for (i, row) in matrix.values.iter().enumerate() {
        for (j, value) in row.iter().enumerate() {
            let x = LEFT + j as i32 * cell;
            let y = TOP + i as i32 * cell;

            root.draw(&Rectangle::new(
                [(x, y), (x + cell, y + cell)],
                heat_color(*value, vmax).filled(),
            ))?;

            if annotate {
                let text = value.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "nan".into());
                root.draw_text(&text, &value_style, (x + cell / 2 - 15, y + cell / 2 - 7))?;
            }
        }
    }

    root.draw(&Rectangle::new(
        [(LEFT, TOP), (LEFT + grid, TOP + grid)],
        BLACK.stroke_width(1),
    ))?;

    // Colour bar from +vmax (top) to -vmax (bottom)
    let bar_x = LEFT + grid + 20;
    for step in 0..grid {
        let v = vmax - 2.0 * vmax * step as f64 / grid.max(1) as f64;
        root.draw(&Rectangle::new(
            [(bar_x, TOP + step), (bar_x + COLOR_BAR_WIDTH, TOP + step + 1)],
            heat_color(Some(v), vmax).filled(),
        ))?;
    }
    let bar_style = TextStyle::from(("sans-serif", 12).into_font()).color(&BLACK);
    root.draw_text(
        &format!("{:.1}", vmax),
        &bar_style,
        (bar_x + COLOR_BAR_WIDTH + 5, TOP),
    )?;
    root.draw_text(
        &format!("{:.1}", -vmax),
        &bar_style,
        (bar_x + COLOR_BAR_WIDTH + 5, TOP + grid - 12),
    )?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heat_color_endpoints() {
        assert_eq!(heat_color(Some(0.0), 0.8), RGBColor(255, 255, 255));
        assert_eq!(heat_color(Some(0.8), 0.8), RGBColor(178, 24, 43));
        assert_eq!(heat_color(Some(-0.8), 0.8), RGBColor(33, 102, 172));
    }

    #[test]
    fn test_heat_color_clamps_at_vmax() {
        assert_eq!(heat_color(Some(1.0), 0.8), heat_color(Some(0.8), 0.8));
        assert_eq!(heat_color(Some(-0.95), 0.8), heat_color(Some(-0.8), 0.8));
    }

    #[test]
    fn test_heat_color_undefined() {
        assert_eq!(heat_color(None, 0.8), UNDEFINED);
        assert_eq!(heat_color(Some(f64::NAN), 0.8), UNDEFINED);
    }

    #[test]
    fn test_cell_size_bounds() {
        assert_eq!(cell_size(1), 80);
        assert_eq!(cell_size(10), 80);
        assert_eq!(cell_size(38), 21);
        assert_eq!(cell_size(500), 8);
        assert_eq!(cell_size(0), 80);
    }
}
