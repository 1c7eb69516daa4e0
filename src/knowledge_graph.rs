use std::path::{Path, PathBuf};

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use rand::Rng;

use crate::models::{CategorizedComments, CommentCategory};
use crate::{to_render_error, RenderError};

const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;
const MARGIN: f64 = 90.0;
const NODE_RADIUS: i32 = 42;

/// Spring constant matching the layout the charts were tuned against.
const SPRING_K: f64 = 1.3;
const LAYOUT_ITERATIONS: usize = 60;

const POSITIVE_COLOR: RGBColor = RGBColor(144, 238, 144);
const NEGATIVE_COLOR: RGBColor = RGBColor(240, 128, 128);
const NEUTRAL_COLOR: RGBColor = RGBColor(173, 216, 230);
const QUESTION_COLOR: RGBColor = RGBColor(255, 255, 224);
const TOTAL_COLOR: RGBColor = RGBColor(211, 211, 211);

/// Renders the star-shaped relationship graph: the video identifier at the
/// center, connected to one count-labeled node per category plus a total.
/// Writes `<video_id>_knowledge_graph.png` into `out_dir`, overwriting any
/// previous run, and returns the written path.
pub fn render_knowledge_graph(
    categorized: &CategorizedComments,
    video_id: &str,
    out_dir: &Path,
) -> Result<PathBuf, RenderError> {
    let filename = out_dir.join(format!("{}_knowledge_graph.png", video_id));

    let leaves = [
        ("Positive", categorized.count(CommentCategory::Positive), POSITIVE_COLOR),
        ("Negative", categorized.count(CommentCategory::Negative), NEGATIVE_COLOR),
        ("Neutral", categorized.count(CommentCategory::Neutral), NEUTRAL_COLOR),
        ("Questions", categorized.count(CommentCategory::Question), QUESTION_COLOR),
        ("Total Comments", categorized.total(), TOTAL_COLOR),
    ];

    // Node 0 is the center; every leaf hangs off it.
    let node_count = leaves.len() + 1;
    let edges: Vec<(usize, usize)> = (1..node_count).map(|leaf| (0, leaf)).collect();
    let layout = spring_layout(node_count, &edges, SPRING_K, LAYOUT_ITERATIONS);
    let pixels = to_pixels(&layout);

    let root = BitMapBackend::new(&filename, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(to_render_error)?;
    let root = root
        .titled(
            &format!("Knowledge Graph for Video: {}", video_id),
            ("sans-serif", 24),
        )
        .map_err(to_render_error)?;

    for &(from, to) in &edges {
        root.draw(&PathElement::new(
            vec![pixels[from], pixels[to]],
            BLACK.mix(0.5),
        ))
        .map_err(to_render_error)?;
    }

    let label_style = TextStyle::from(("sans-serif", 16).into_font())
        .pos(Pos::new(HPos::Center, VPos::Center));

    for (leaf, (label, count, color)) in leaves.iter().enumerate() {
        let center = pixels[leaf + 1];
        root.draw(&Circle::new(center, NODE_RADIUS, color.mix(0.8).filled()))
            .map_err(to_render_error)?;
        root.draw(&Text::new(
            format!("{} ({})", label, count),
            center,
            label_style.clone(),
        ))
        .map_err(to_render_error)?;
    }

    // The center node carries no disc, only the identifier label.
    root.draw(&Text::new(
        video_id.to_string(),
        pixels[0],
        label_style.clone(),
    ))
    .map_err(to_render_error)?;

    root.present().map_err(to_render_error)?;
    Ok(filename.clone())
}

/// Small Fruchterman-Reingold pass. Nodes start on a jittered circle and
/// settle under pairwise repulsion and edge attraction; positions come back
/// normalized to [-1, 1].
pub(crate) fn spring_layout(
    node_count: usize,
    edges: &[(usize, usize)],
    k: f64,
    iterations: usize,
) -> Vec<(f64, f64)> {
    if node_count == 0 {
        return Vec::new();
    }

    let mut rng = rand::thread_rng();
    let mut positions: Vec<(f64, f64)> = (0..node_count)
        .map(|node| {
            let angle = node as f64 / node_count as f64 * std::f64::consts::TAU;
            (
                angle.cos() + rng.gen_range(-0.1..0.1),
                angle.sin() + rng.gen_range(-0.1..0.1),
            )
        })
        .collect();

    let mut temperature = 0.5;
    for _ in 0..iterations {
        let mut displacement = vec![(0.0f64, 0.0f64); node_count];

        for a in 0..node_count {
            for b in (a + 1)..node_count {
                let dx = positions[a].0 - positions[b].0;
                let dy = positions[a].1 - positions[b].1;
                let distance = (dx * dx + dy * dy).sqrt().max(1e-9);
                let repulsion = k * k / distance;
                let (ux, uy) = (dx / distance, dy / distance);
                displacement[a].0 += ux * repulsion;
                displacement[a].1 += uy * repulsion;
                displacement[b].0 -= ux * repulsion;
                displacement[b].1 -= uy * repulsion;
            }
        }

        for &(from, to) in edges {
            let dx = positions[from].0 - positions[to].0;
            let dy = positions[from].1 - positions[to].1;
            let distance = (dx * dx + dy * dy).sqrt().max(1e-9);
            let attraction = distance * distance / k;
            let (ux, uy) = (dx / distance, dy / distance);
            displacement[from].0 -= ux * attraction;
            displacement[from].1 -= uy * attraction;
            displacement[to].0 += ux * attraction;
            displacement[to].1 += uy * attraction;
        }

        for (position, (dx, dy)) in positions.iter_mut().zip(&displacement) {
            let magnitude = (dx * dx + dy * dy).sqrt().max(1e-9);
            let limited = magnitude.min(temperature);
            position.0 += dx / magnitude * limited;
            position.1 += dy / magnitude * limited;
        }

        temperature *= 0.95;
    }

    let extent = positions
        .iter()
        .flat_map(|&(x, y)| [x.abs(), y.abs()])
        .fold(1e-9f64, f64::max);
    for position in &mut positions {
        position.0 /= extent;
        position.1 /= extent;
    }

    positions
}

fn to_pixels(layout: &[(f64, f64)]) -> Vec<(i32, i32)> {
    let half_width = (WIDTH as f64 - 2.0 * MARGIN) / 2.0;
    let half_height = (HEIGHT as f64 - 2.0 * MARGIN) / 2.0;
    layout
        .iter()
        .map(|&(x, y)| {
            (
                (WIDTH as f64 / 2.0 + x * half_width) as i32,
                (HEIGHT as f64 / 2.0 + y * half_height) as i32,
            )
        })
        .collect()
}
