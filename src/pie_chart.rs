use std::f64::consts::TAU;
use std::path::{Path, PathBuf};

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::models::{CategorizedComments, CommentCategory};
use crate::{to_render_error, RenderError};

const WIDTH: u32 = 700;
const HEIGHT: u32 = 700;
const RADIUS: f64 = 230.0;

/// Slice order and palette are fixed; the Positive slice is pulled outward.
const SLICE_ORDER: [CommentCategory; 4] = [
    CommentCategory::Positive,
    CommentCategory::Negative,
    CommentCategory::Question,
    CommentCategory::Neutral,
];
const SLICE_COLORS: [RGBColor; 4] = [
    RGBColor(0xff, 0x99, 0x99),
    RGBColor(0x66, 0xb3, 0xff),
    RGBColor(0x99, 0xff, 0x99),
    RGBColor(0xc2, 0xc2, 0xf0),
];
const EDGE_COLOR: RGBColor = RGBColor(128, 128, 128);
const START_ANGLE_DEG: f64 = 140.0;
const EXPLODE_FRACTION: f64 = 0.1;

/// Renders the category proportion chart as
/// `<video_id>_Pie_chart.png` in `out_dir`, overwriting any previous run,
/// and returns the written path. A run with zero comments produces a titled
/// but empty chart.
pub fn render_pie_chart(
    categorized: &CategorizedComments,
    video_id: &str,
    out_dir: &Path,
) -> Result<PathBuf, RenderError> {
    let filename = out_dir.join(format!("{}_Pie_chart.png", video_id));

    let root = BitMapBackend::new(&filename, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(to_render_error)?;
    let root = root
        .titled(
            &format!("Sentiment Distribution for Video: {}", video_id),
            ("sans-serif", 24),
        )
        .map_err(to_render_error)?;

    let total = categorized.total();
    if total == 0 {
        root.present().map_err(to_render_error)?;
        return Ok(filename.clone());
    }

    let center_x = WIDTH as f64 / 2.0;
    let center_y = HEIGHT as f64 / 2.0 + 15.0;
    let label_style = TextStyle::from(("sans-serif", 18).into_font())
        .pos(Pos::new(HPos::Center, VPos::Center));

    let mut angle = START_ANGLE_DEG.to_radians();
    for (index, category) in SLICE_ORDER.iter().enumerate() {
        let share = categorized.count(*category) as f64 / total as f64;
        let sweep = share * TAU;
        let mid = angle + sweep / 2.0;

        // The first slice (Positive) is offset along its bisector.
        let offset = if index == 0 { EXPLODE_FRACTION * RADIUS } else { 0.0 };
        let slice_x = center_x + offset * mid.cos();
        let slice_y = center_y - offset * mid.sin();

        if share > 0.0 {
            let points = wedge_points(slice_x, slice_y, RADIUS, angle, sweep);
            root.draw(&Polygon::new(points.clone(), SLICE_COLORS[index].filled()))
                .map_err(to_render_error)?;
            let mut outline = points;
            if let Some(first) = outline.first().copied() {
                outline.push(first);
            }
            root.draw(&PathElement::new(outline, EDGE_COLOR))
                .map_err(to_render_error)?;
        }

        let label_radius = RADIUS + 32.0;
        root.draw(&Text::new(
            category.label().to_string(),
            (
                (slice_x + label_radius * mid.cos()) as i32,
                (slice_y - label_radius * mid.sin()) as i32,
            ),
            label_style.clone(),
        ))
        .map_err(to_render_error)?;

        let percent_radius = RADIUS * 0.62;
        root.draw(&Text::new(
            format!("{:.1}%", share * 100.0),
            (
                (slice_x + percent_radius * mid.cos()) as i32,
                (slice_y - percent_radius * mid.sin()) as i32,
            ),
            label_style.clone(),
        ))
        .map_err(to_render_error)?;

        angle += sweep;
    }

    root.present().map_err(to_render_error)?;
    Ok(filename.clone())
}

/// Closed fan of points for one slice, sampled finely enough that the arc
/// looks round at the fixed radius.
fn wedge_points(center_x: f64, center_y: f64, radius: f64, start: f64, sweep: f64) -> Vec<(i32, i32)> {
    let steps = ((sweep / 0.02).ceil() as usize).max(2);
    let mut points = Vec::with_capacity(steps + 2);
    points.push((center_x as i32, center_y as i32));
    for step in 0..=steps {
        let theta = start + sweep * step as f64 / steps as f64;
        points.push((
            (center_x + radius * theta.cos()) as i32,
            (center_y - radius * theta.sin()) as i32,
        ));
    }
    points
}
