//! Word segmentation: grouping same-line fragments into words using
//! estimated character spacing.
//!
//! The spacing estimate relies on local kerning noise being small: pairwise
//! gaps between adjacent fragments are sorted ascending and the first jump
//! marks the transition from intra-word to inter-word spacing.

use crate::analyze::LayoutOptions;
use crate::input::Fragment;
use crate::model::Word;

/// Fallback font size when a fragment reports size 0.
const FALLBACK_FONT_SIZE: f32 = 12.0;

/// Largest fraction of the font size an intra-word gap can be. A line
/// whose smallest gap exceeds this carries only inter-word gaps.
const INTRA_WORD_GAP_RATIO: f32 = 0.25;

/// Estimate the character spacing of one visual line.
///
/// `fragments` must be in left-to-right geometric order. Gaps are sorted
/// ascending and the contiguous run below `2 × smallest` is averaged; the
/// first jump ends the run, so inter-word gaps never enter the average.
/// When even the smallest gap exceeds a quarter of the font size, every
/// gap is an inter-word gap and the spacing is 0.
///
/// The estimate deliberately does not depend on the font denominator
/// constant: the boundary sweep's allowance shrinks as the denominator
/// grows, and a denominator-sensitive estimate could offset that and
/// merge words a stricter setting had split.
pub fn estimate_char_spacing(fragments: &[Fragment], font_size: f32) -> f32 {
    let mut gaps: Vec<f32> = fragments
        .windows(2)
        .map(|w| w[1].rect.min_x - w[0].rect.max_x)
        .collect();
    if gaps.is_empty() {
        return 0.0;
    }
    gaps.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let smallest = gaps[0];
    if smallest > font_size * INTRA_WORD_GAP_RATIO {
        return 0.0;
    }

    let cutoff = 2.0 * smallest;
    let run: Vec<f32> = gaps.iter().copied().take_while(|g| *g < cutoff).collect();
    if run.is_empty() {
        return 0.0;
    }
    let spacing = run.iter().sum::<f32>() / run.len() as f32;
    spacing.max(0.0)
}

/// Group the fragments of one visual line into words.
///
/// With `use_existing_whitespace` set and explicit space fragments present,
/// boundary detection degrades to "boundary = empty-text fragment";
/// otherwise adjacent fragments are merged while
/// `gap − char_spacing ≤ 0.8 × font_size / font_denominator`.
/// Whitespace-only fragments are discarded once they have served as
/// boundary markers.
pub fn segment_words(mut fragments: Vec<Fragment>, options: &LayoutOptions) -> Vec<Word> {
    fragments.sort_by(|a, b| {
        a.rect
            .min_x
            .partial_cmp(&b.rect.min_x)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    if fragments.len() <= 1 {
        return Word::from_fragments(fragments).into_iter().collect();
    }

    if options.use_existing_whitespace && fragments.iter().any(|f| f.is_whitespace()) {
        return segment_at_whitespace(fragments);
    }

    // Whitespace fragments would corrupt the gap statistics; dropping them
    // widens the gap at their position, which the sweep then splits on.
    fragments.retain(|f| !f.is_whitespace());
    if fragments.len() <= 1 {
        return Word::from_fragments(fragments).into_iter().collect();
    }

    let font_size = fragments
        .iter()
        .map(|f| f.font_size)
        .find(|s| *s > 0.0)
        .unwrap_or(FALLBACK_FONT_SIZE);
    let spacing = estimate_char_spacing(&fragments, font_size);
    let allowance = 0.8 * font_size / options.font_denominator;
    log::debug!(
        "segmenting {} fragments: char spacing {:.2}, allowance {:.2}",
        fragments.len(),
        spacing,
        allowance
    );

    let mut words = Vec::new();
    let mut current: Vec<Fragment> = Vec::new();
    for fragment in fragments {
        if let Some(last) = current.last() {
            let gap = fragment.rect.min_x - last.rect.max_x;
            if gap - spacing > allowance {
                if let Some(word) = Word::from_fragments(std::mem::take(&mut current)) {
                    words.push(word);
                }
            }
        }
        current.push(fragment);
    }
    if let Some(word) = Word::from_fragments(current) {
        words.push(word);
    }
    words
}

/// Split on explicit whitespace fragments, dropping the markers.
fn segment_at_whitespace(fragments: Vec<Fragment>) -> Vec<Word> {
    let mut words = Vec::new();
    let mut current: Vec<Fragment> = Vec::new();
    for fragment in fragments {
        if fragment.is_whitespace() {
            if let Some(word) = Word::from_fragments(std::mem::take(&mut current)) {
                words.push(word);
            }
        } else {
            current.push(fragment);
        }
    }
    if let Some(word) = Word::from_fragments(current) {
        words.push(word);
    }
    words
}
