//! Target distribution per category, drawn as box plots.

use crate::stats::CategoryGroup;
use plotters::prelude::*;
use std::error::Error;
use std::path::Path;

/// Above this many categories the axis labels are rotated.
const ROTATE_LABELS_ABOVE: usize = 20;

/// Half the width of a box, in category units.
const BOX_HALF_WIDTH: f64 = 0.3;

/// Label of the category drawn at `x`, if `x` sits on one.
pub fn category_label(labels: &[String], x: f64) -> Option<&str> {
    let rounded = x.round();
    if (x - rounded).abs() > 1e-6 || rounded < 0.0 {
        return None;
    }
    labels.get(rounded as usize).map(String::as_str)
}

pub(crate) fn draw_boxplot(
    path: &Path,
    feature: &str,
    target: &str,
    groups: &[CategoryGroup],
    y_max: f64,
) -> Result<(), Box<dyn Error>> {
    let rotate = groups.len() > ROTATE_LABELS_ABOVE;
    let width = if rotate { 1600 } else { 900 };
    let root = BitMapBackend::new(path, (width, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let labels: Vec<String> = groups.iter().map(|g| g.label.clone()).collect();
    let n = groups.len().max(1) as f64;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("{} by {}", target, feature), ("sans-serif", 28).into_font())
        .margin(10)
        .x_label_area_size(if rotate { 60 } else { 40 })
        .y_label_area_size(70)
        .build_cartesian_2d(-0.5f64..(n - 0.5), 0f64..y_max)?;

    let formatter = |x: &f64| category_label(&labels, *x).unwrap_or_default().to_string();
    let label_style = if rotate {
        ("sans-serif", 11).into_font().transform(FontTransform::Rotate90)
    } else {
        ("sans-serif", 14).into_font()
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(groups.len().max(1))
        .x_label_formatter(&formatter)
        .x_label_style(label_style)
        .x_desc(feature)
        .y_desc(target)
        .draw()?;

    for (i, group) in groups.iter().enumerate() {
        let x = i as f64;
        let s = &group.stats;
        let (left, right) = (x - BOX_HALF_WIDTH, x + BOX_HALF_WIDTH);

        chart.draw_series(std::iter::once(Rectangle::new(
            [(left, s.q1), (right, s.q3)],
            BLUE.mix(0.3).filled(),
        )))?;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(left, s.q1), (right, s.q3)],
            BLACK.stroke_width(1),
        )))?;

        // Median, whiskers and caps
        let cap = BOX_HALF_WIDTH / 2.0;
        let lines = [
            vec![(left, s.median), (right, s.median)],
            vec![(x, s.q3), (x, s.upper_whisker)],
            vec![(x, s.q1), (x, s.lower_whisker)],
            vec![(x - cap, s.upper_whisker), (x + cap, s.upper_whisker)],
            vec![(x - cap, s.lower_whisker), (x + cap, s.lower_whisker)],
        ];
        chart.draw_series(
            lines
                .into_iter()
                .map(|line| PathElement::new(line, BLACK.stroke_width(1))),
        )?;

        chart.draw_series(
            s.outliers
                .iter()
                .map(|&y| Circle::new((x, y), 2, RED.mix(0.6).filled())),
        )?;
    }

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_label_on_integer_positions() {
        let labels = vec!["5".to_string(), "6".to_string(), "7".to_string()];
        assert_eq!(category_label(&labels, 0.0), Some("5"));
        assert_eq!(category_label(&labels, 2.0), Some("7"));
        assert_eq!(category_label(&labels, 1.5), None);
        assert_eq!(category_label(&labels, 3.0), None);
        assert_eq!(category_label(&labels, -1.0), None);
    }
}
