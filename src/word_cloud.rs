use std::collections::HashMap;
use std::path::{Path, PathBuf};

use plotters::prelude::*;

use crate::models::Comment;
use crate::{to_render_error, RenderError};

const WIDTH: u32 = 800;
const HEIGHT: u32 = 400;
const MARGIN: i32 = 12;
const MAX_WORDS: usize = 60;
const MIN_FONT: f64 = 14.0;
const MAX_FONT: f64 = 58.0;

/// Common words excluded from the frequency count, in the spirit of the
/// usual word-cloud stopword lists.
const STOPWORDS: [&str; 44] = [
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "from",
    "had", "has", "have", "he", "her", "his", "i", "if", "in", "is", "it",
    "its", "just", "me", "my", "not", "of", "on", "or", "she", "so", "that",
    "the", "they", "this", "to", "was", "we", "were", "will", "with", "you",
    "your",
];

const WORD_COLORS: [RGBColor; 6] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
];

/// Renders a size-weighted word layout over the full comment set (not
/// per-category) as `<video_id>_Word_Cloud.png` in `out_dir`, overwriting
/// any previous run, and returns the written path.
pub fn render_word_cloud(
    comments: &[Comment],
    video_id: &str,
    out_dir: &Path,
) -> Result<PathBuf, RenderError> {
    let filename = out_dir.join(format!("{}_Word_Cloud.png", video_id));

    let combined = comments
        .iter()
        .map(|comment| comment.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let frequencies = word_frequencies(&combined);

    let root = BitMapBackend::new(&filename, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(to_render_error)?;
    let root = root
        .titled(
            &format!("Word Cloud for Video: {}", video_id),
            ("sans-serif", 20),
        )
        .map_err(to_render_error)?;

    let max_count = frequencies.first().map(|(_, count)| *count).unwrap_or(0);
    let min_count = frequencies.last().map(|(_, count)| *count).unwrap_or(0);

    let mut cursor_x = MARGIN;
    let mut cursor_y = MARGIN;
    let mut row_height = 0;

    for (index, (word, count)) in frequencies.iter().enumerate() {
        let size = font_size(*count, min_count, max_count);
        let word_width = (size * 0.58 * word.chars().count() as f64).ceil() as i32;
        let word_height = size.ceil() as i32;

        if cursor_x + word_width > WIDTH as i32 - MARGIN {
            cursor_x = MARGIN;
            cursor_y += row_height + 6;
            row_height = 0;
        }
        if cursor_y + word_height > HEIGHT as i32 - MARGIN {
            break;
        }

        let color = WORD_COLORS[index % WORD_COLORS.len()];
        let style = TextStyle::from(("sans-serif", size).into_font()).color(&color);
        root.draw(&Text::new(word.clone(), (cursor_x, cursor_y), style))
            .map_err(to_render_error)?;

        cursor_x += word_width + 10;
        row_height = row_height.max(word_height);
    }

    root.present().map_err(to_render_error)?;
    Ok(filename.clone())
}

/// Lowercased alphanumeric token counts, stopwords and single letters
/// dropped, ordered by count and then alphabetically so the layout is
/// deterministic. At most [`MAX_WORDS`] entries.
pub(crate) fn word_frequencies(text: &str) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();

    for raw in text.split_whitespace() {
        let word: String = raw
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        if word.chars().count() < 2 || STOPWORDS.contains(&word.as_str()) {
            continue;
        }
        *counts.entry(word).or_insert(0) += 1;
    }

    let mut frequencies: Vec<(String, usize)> = counts.into_iter().collect();
    frequencies.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    frequencies.truncate(MAX_WORDS);
    frequencies
}

fn font_size(count: usize, min_count: usize, max_count: usize) -> f64 {
    if max_count <= min_count {
        return MAX_FONT;
    }
    let weight = (count - min_count) as f64 / (max_count - min_count) as f64;
    MIN_FONT + (MAX_FONT - MIN_FONT) * weight
}
