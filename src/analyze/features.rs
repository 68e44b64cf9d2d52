//! Per-chunk statistical and geometric features.
//!
//! Counters are scoped per call and owned by the caller; no process-wide
//! state survives between chunk evaluations, so concurrent evaluations on
//! different threads each use their own instances.

use std::collections::HashMap;
use std::hash::Hash;

use crate::geom::Rect;
use crate::model::{Alignment, ChunkFeatures, Paragraph};

/// Vertical neighbor window above a chunk for the outlier test.
const OUTLIER_WINDOW_ABOVE: f32 = 30.0;
/// Vertical neighbor window below a chunk for the outlier test.
const OUTLIER_WINDOW_BELOW: f32 = 60.0;
/// Minimum neighbor and word counts below which a chunk is an outlier.
const OUTLIER_MIN_NEIGHBORS: usize = 10;
const OUTLIER_MIN_WORDS: usize = 10;
/// A chunk taller than this fraction of the page is abnormally tall.
const OUTLIER_TALL_RATIO: f32 = 0.25;

/// Column-boundary alignment tolerances, as multiples of the popular word
/// height (left edge and right edge respectively).
const COLUMN_ALIGN_LEFT_FACTOR: f32 = 1.5;
const COLUMN_ALIGN_RIGHT_FACTOR: f32 = 3.0;

/// A simple frequency counter over hashable values.
#[derive(Debug, Clone)]
pub struct FrequencyCounter<T: Eq + Hash> {
    counts: HashMap<T, usize>,
}

impl<T: Eq + Hash> FrequencyCounter<T> {
    /// Create an empty counter.
    pub fn new() -> Self {
        Self {
            counts: HashMap::new(),
        }
    }

    /// Record one observation.
    pub fn add(&mut self, value: T) {
        *self.counts.entry(value).or_insert(0) += 1;
    }

    /// Occurrences of a value.
    pub fn count(&self, value: &T) -> usize {
        self.counts.get(value).copied().unwrap_or(0)
    }

    /// The most frequent value and its count.
    pub fn most_common(&self) -> Option<(&T, usize)> {
        self.counts.iter().max_by_key(|(_, c)| *c).map(|(v, c)| (v, *c))
    }

    /// Check if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl<T: Eq + Hash> Default for FrequencyCounter<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Page-level context the feature pass consults.
#[derive(Debug, Clone)]
pub struct FeatureContext<'a> {
    /// Body-text frame of the page (content area)
    pub body_frame: Rect,
    /// Detected column boundary x-coordinates
    pub column_boundaries: &'a [f32],
    /// Bounds of all chunks on the page, in the same order the chunks
    /// are evaluated
    pub chunk_bounds: &'a [Rect],
    /// Page height
    pub page_height: f32,
}

/// Compute the features of one chunk.
///
/// `index` identifies the chunk within `ctx.chunk_bounds` so the neighbor
/// count excludes the chunk itself.
pub fn compute_features(
    chunk: &Paragraph,
    index: usize,
    ctx: &FeatureContext<'_>,
) -> ChunkFeatures {
    let mut fonts: FrequencyCounter<String> = FrequencyCounter::new();
    let mut heights: FrequencyCounter<i32> = FrequencyCounter::new();
    let mut bold = 0usize;
    let mut italic = 0usize;
    let mut word_area = 0.0f32;

    for word in chunk.words() {
        fonts.add(word.font_name.clone());
        // Tenth-of-a-unit precision, like a font-size histogram.
        heights.add((word.rect.height() * 10.0).round() as i32);
        if word.is_bold {
            bold += 1;
        }
        if word.is_italic {
            italic += 1;
        }
        word_area += word.rect.area();
    }

    let word_count = chunk.word_count();
    let popular_font = fonts.most_common().map(|(f, _)| f.clone());
    let popular_height = heights
        .most_common()
        .map(|(h, _)| *h as f32 / 10.0)
        .unwrap_or(0.0);

    let bounds = chunk.bounds();
    let density = match bounds {
        Some(r) if r.area() > 0.0 => word_area / r.area(),
        _ => 0.0,
    };

    let alignment = bounds
        .map(|r| frame_alignment(&r, &ctx.body_frame, popular_height))
        .unwrap_or(Alignment::Left);

    let text = chunk.text();
    let letters: Vec<char> = text.chars().filter(|c| c.is_alphabetic()).collect();
    let capitalization_ratio = if letters.is_empty() {
        0.0
    } else {
        letters.iter().filter(|c| c.is_uppercase()).count() as f32 / letters.len() as f32
    };

    let is_outlier = bounds
        .map(|r| {
            let neighbors = count_neighbors(&r, index, ctx.chunk_bounds);
            let isolated = neighbors < OUTLIER_MIN_NEIGHBORS && word_count < OUTLIER_MIN_WORDS;
            let too_tall = ctx.page_height > 0.0
                && r.height() > ctx.page_height * OUTLIER_TALL_RATIO;
            isolated || too_tall
        })
        .unwrap_or(false);

    let aligned_to_column = bounds
        .map(|r| is_column_aligned(&r, ctx.column_boundaries, popular_height))
        .unwrap_or(false);

    ChunkFeatures {
        popular_font,
        popular_height,
        alignment,
        capitalization_ratio,
        is_bold: word_count > 0 && bold * 2 > word_count,
        is_italic: word_count > 0 && italic * 2 > word_count,
        density,
        is_outlier,
        aligned_to_column,
    }
}

/// Alignment of a chunk relative to the body-frame midline.
fn frame_alignment(rect: &Rect, frame: &Rect, popular_height: f32) -> Alignment {
    let tolerance = popular_height.max(2.0);
    let mid = rect.midpoint().x;
    let frame_mid = frame.midpoint().x;
    if (mid - frame_mid).abs() <= tolerance {
        Alignment::Center
    } else if mid < frame_mid {
        Alignment::Left
    } else {
        Alignment::Right
    }
}

/// Other chunks whose bounds fall inside the vertical window −30/+60
/// around this chunk.
fn count_neighbors(rect: &Rect, index: usize, all: &[Rect]) -> usize {
    let window = Rect::new(
        f32::MIN / 2.0,
        rect.min_y - OUTLIER_WINDOW_ABOVE,
        f32::MAX / 2.0,
        rect.max_y + OUTLIER_WINDOW_BELOW,
    );
    all.iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .filter(|(_, r)| window.overlaps_vertically(r))
        .count()
}

/// Whether a chunk edge sits on a column boundary: left edge within
/// 1.5× the popular word height, or right edge within 3×.
fn is_column_aligned(rect: &Rect, boundaries: &[f32], popular_height: f32) -> bool {
    if boundaries.is_empty() || popular_height <= 0.0 {
        return false;
    }
    let left = boundaries
        .iter()
        .map(|b| (rect.min_x - b).abs())
        .fold(f32::INFINITY, f32::min);
    let right = boundaries
        .iter()
        .map(|b| (rect.max_x - b).abs())
        .fold(f32::INFINITY, f32::min);
    left < popular_height * COLUMN_ALIGN_LEFT_FACTOR
        || right < popular_height * COLUMN_ALIGN_RIGHT_FACTOR
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Fragment;
    use crate::model::{Line, Word};

    fn word(text: &str, font: &str, x: f32, y: f32, w: f32, h: f32) -> Word {
        Word::from_fragments(vec![Fragment::new(
            text,
            font,
            h,
            y + h,
            Rect::from_size(x, y, w, h),
        )])
        .unwrap()
    }

    fn chunk(words: Vec<Word>) -> Paragraph {
        Paragraph::new(vec![Line::new(words)])
    }

    #[test]
    fn test_frequency_counter() {
        let mut counter = FrequencyCounter::new();
        counter.add("a");
        counter.add("b");
        counter.add("a");
        assert_eq!(counter.count(&"a"), 2);
        assert_eq!(counter.most_common(), Some((&"a", 2)));
        assert!(!counter.is_empty());
        assert!(FrequencyCounter::<u32>::new().is_empty());
    }

    fn ctx<'a>(bounds: &'a [Rect], boundaries: &'a [f32]) -> FeatureContext<'a> {
        FeatureContext {
            body_frame: Rect::new(0.0, 0.0, 600.0, 800.0),
            column_boundaries: boundaries,
            chunk_bounds: bounds,
            page_height: 800.0,
        }
    }

    #[test]
    fn test_popular_font_and_height() {
        let c = chunk(vec![
            word("one", "Times", 0.0, 0.0, 20.0, 12.0),
            word("two", "Times", 25.0, 0.0, 20.0, 12.0),
            word("x", "CMMI10", 50.0, 0.0, 5.0, 9.0),
        ]);
        let bounds = [c.bounds().unwrap()];
        let f = compute_features(&c, 0, &ctx(&bounds, &[]));
        assert_eq!(f.popular_font.as_deref(), Some("Times"));
        assert_eq!(f.popular_height, 12.0);
    }

    #[test]
    fn test_isolated_small_chunk_is_outlier() {
        // Popular word height 12, only 3 neighbors within the window and
        // 4 words total.
        let c = chunk(vec![
            word("a", "Times", 0.0, 300.0, 20.0, 12.0),
            word("b", "Times", 25.0, 300.0, 20.0, 12.0),
            word("c", "Times", 50.0, 300.0, 20.0, 12.0),
            word("d", "Times", 75.0, 300.0, 20.0, 12.0),
        ]);
        let own = c.bounds().unwrap();
        // Three neighbors in the window, everything else far away.
        let mut bounds = vec![own];
        for i in 0..3 {
            bounds.push(Rect::from_size(0.0, 310.0 + i as f32 * 10.0, 100.0, 12.0));
        }
        for i in 0..20 {
            bounds.push(Rect::from_size(0.0, 500.0 + i as f32 * 20.0, 100.0, 12.0));
        }
        let f = compute_features(&c, 0, &ctx(&bounds, &[]));
        assert!(f.is_outlier);
    }

    #[test]
    fn test_dense_chunk_is_not_outlier() {
        let words: Vec<Word> = (0..12)
            .map(|i| word("w", "Times", i as f32 * 25.0, 300.0, 20.0, 12.0))
            .collect();
        let c = chunk(words);
        let own = c.bounds().unwrap();
        let mut bounds = vec![own];
        for i in 0..12 {
            bounds.push(Rect::from_size(0.0, 310.0 + i as f32 * 4.0, 100.0, 12.0));
        }
        let f = compute_features(&c, 0, &ctx(&bounds, &[]));
        assert!(!f.is_outlier);
    }

    #[test]
    fn test_abnormally_tall_chunk_is_outlier() {
        let c = chunk(vec![word("a", "Times", 0.0, 0.0, 20.0, 300.0)]);
        let bounds = [c.bounds().unwrap()];
        let f = compute_features(&c, 0, &ctx(&bounds, &[]));
        assert!(f.is_outlier);
    }

    #[test]
    fn test_column_alignment_flag() {
        let c = chunk(vec![
            word("a", "Times", 50.0, 0.0, 20.0, 12.0),
            word("b", "Times", 75.0, 0.0, 20.0, 12.0),
        ]);
        let bounds = [c.bounds().unwrap()];
        // Left edge at 50, boundary at 55: distance 5 < 1.5 * 12.
        let f = compute_features(&c, 0, &ctx(&bounds, &[55.0]));
        assert!(f.aligned_to_column);

        let f = compute_features(&c, 0, &ctx(&bounds, &[400.0]));
        assert!(!f.aligned_to_column);
    }

    #[test]
    fn test_density_and_capitalization() {
        let c = chunk(vec![
            word("AB", "Times", 0.0, 0.0, 20.0, 10.0),
            word("cd", "Times", 30.0, 0.0, 20.0, 10.0),
        ]);
        let bounds = [c.bounds().unwrap()];
        let f = compute_features(&c, 0, &ctx(&bounds, &[]));
        assert_eq!(f.capitalization_ratio, 0.5);
        // Two 200-area words over a 500-area chunk.
        assert!((f.density - 0.8).abs() < 1e-5);
    }

    #[test]
    fn test_bold_flag_from_majority() {
        let c = chunk(vec![
            word("a", "Times-Bold", 0.0, 0.0, 20.0, 10.0),
            word("b", "Times-Bold", 25.0, 0.0, 20.0, 10.0),
            word("c", "Times", 50.0, 0.0, 20.0, 10.0),
        ]);
        let bounds = [c.bounds().unwrap()];
        let f = compute_features(&c, 0, &ctx(&bounds, &[]));
        assert!(f.is_bold);
        assert!(!f.is_italic);
    }
}
