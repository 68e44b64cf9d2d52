//! Line and region clustering: fragments into lines, lines into
//! paragraphs, and separator-driven region splitting.

use std::cmp::Ordering;

use crate::analyze::{segmenter, LayoutOptions};
use crate::geom::Rect;
use crate::input::{Direction, Fragment, GraphicClass, GraphicPrimitive};
use crate::model::{Alignment, Line, LineStyle, Paragraph, Region};

/// Absolute indentation tolerance in layout units.
///
/// Deliberately not font-relative, unlike the other geometric thresholds
/// in this module; the literal value is pinned by a test.
const INDENT_TOLERANCE: f32 = 5.0;

/// Two y coordinates count as the same visual row when they differ by less
/// than this fraction of their magnitude.
const SAME_ROW_RATIO: f32 = 0.04;

/// Edge spread below which a set of lines counts as aligned on that edge.
const ALIGN_EPSILON: f32 = 2.0;

/// Font names that mark mathematical content.
const FORMULA_FONT_MARKERS: &[&str] = &["math", "symbol", "cmmi", "cmsy", "cmex"];

fn cmp_f32(a: f32, b: f32) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Formula-style ordering: purely by ascending left edge.
pub fn cmp_fragments_formula(a: &Fragment, b: &Fragment) -> Ordering {
    cmp_f32(a.rect.min_x, b.rect.min_x)
}

/// Normal-style ordering: visual row first, then horizontal.
///
/// Baselines within roughly 4% of each other count as the same visual
/// row and are tie-broken by x; otherwise the smaller baseline comes
/// first. The row is derived from the baseline alone via logarithmic
/// bucketing, which makes the comparator a total order — a comparator
/// that consults pairwise overlap is not transitive on staircase
/// layouts, and `sort_by` requires transitivity.
pub fn cmp_fragments_normal(a: &Fragment, b: &Fragment) -> Ordering {
    (row_key(a.baseline), a.rect.min_x, a.baseline)
        .partial_cmp(&(row_key(b.baseline), b.rect.min_x, b.baseline))
        .unwrap_or(Ordering::Equal)
}

/// Quantize a baseline into a row bucket whose width scales with the
/// coordinate, so that y values within `SAME_ROW_RATIO` of each other
/// usually land in the same bucket.
fn row_key(baseline: f32) -> i32 {
    let y = baseline.abs().max(1.0);
    (y.ln() / (1.0 + SAME_ROW_RATIO).ln()).floor() as i32
}

/// Detect whether a set of fragments is predominantly mathematical.
fn detect_line_style(fragments: &[Fragment]) -> LineStyle {
    let math = fragments
        .iter()
        .filter(|f| {
            let lower = f.font_name.to_lowercase();
            FORMULA_FONT_MARKERS.iter().any(|m| lower.contains(m))
        })
        .count();
    if math * 2 > fragments.len() {
        LineStyle::Formula
    } else {
        LineStyle::Normal
    }
}

/// Group fragments into visual lines by baseline proximity, then segment
/// each line into words.
pub fn group_into_lines(mut fragments: Vec<Fragment>, options: &LayoutOptions) -> Vec<Line> {
    if fragments.is_empty() {
        return vec![];
    }
    fragments.sort_by(cmp_fragments_normal);

    let mut groups: Vec<Vec<Fragment>> = Vec::new();
    let mut current: Vec<Fragment> = Vec::new();
    let mut current_baseline: Option<f32> = None;

    for fragment in fragments {
        let tolerance = if fragment.font_size > 0.0 {
            fragment.font_size * 0.3
        } else {
            3.0
        };
        match current_baseline {
            Some(baseline) if (fragment.baseline - baseline).abs() <= tolerance => {
                current.push(fragment);
            }
            Some(_) => {
                groups.push(std::mem::take(&mut current));
                current_baseline = Some(fragment.baseline);
                current.push(fragment);
            }
            None => {
                current_baseline = Some(fragment.baseline);
                current.push(fragment);
            }
        }
    }
    if !current.is_empty() {
        groups.push(current);
    }

    let mut lines: Vec<Line> = groups
        .into_iter()
        .map(|mut group| {
            let style = detect_line_style(&group);
            match style {
                LineStyle::Formula => group.sort_by(cmp_fragments_formula),
                LineStyle::Normal => group.sort_by(cmp_fragments_normal),
            }
            let mut line = Line::new(segmenter::segment_words(group, options));
            line.style = style;
            line
        })
        .filter(|l| !l.is_empty())
        .collect();

    lines.sort_by(|a, b| cmp_f32(a.baseline().unwrap_or(0.0), b.baseline().unwrap_or(0.0)));
    lines
}

/// Average vertical distance between consecutive line baselines.
fn average_line_spacing(lines: &[Line]) -> f32 {
    if lines.len() < 2 {
        return 12.0;
    }
    let spacings: Vec<f32> = lines
        .windows(2)
        .filter_map(|w| {
            let a = w[0].baseline()?;
            let b = w[1].baseline()?;
            let s = (b - a).abs();
            (s > 0.1).then_some(s)
        })
        .collect();
    if spacings.is_empty() {
        return 12.0;
    }
    spacings.iter().sum::<f32>() / spacings.len() as f32
}

/// Whether a new paragraph should start between two lines.
fn should_break(prev: &Line, curr: &Line, avg_spacing: f32) -> bool {
    let (Some(pb), Some(cb)) = (prev.baseline(), curr.baseline()) else {
        return true;
    };
    if (cb - pb).abs() > avg_spacing * 1.5 {
        return true;
    }
    if (prev.font_size() - curr.font_size()).abs() > 1.0 {
        return true;
    }
    let (Some(pr), Some(cr)) = (prev.bounds(), curr.bounds()) else {
        return true;
    };
    // Left margin jump indicates a new paragraph or list item.
    (pr.min_x - cr.min_x).abs() > 20.0
}

/// Classify the alignment of a set of lines within a frame.
fn detect_alignment(lines: &[Line], frame: &Rect) -> Alignment {
    let rects: Vec<Rect> = lines.iter().filter_map(|l| l.bounds()).collect();
    if rects.is_empty() {
        return Alignment::Left;
    }
    if rects.len() == 1 {
        let r = &rects[0];
        let frame_mid = frame.midpoint().x;
        if (r.midpoint().x - frame_mid).abs() <= ALIGN_EPSILON
            && (r.min_x - frame.min_x).abs() > ALIGN_EPSILON
        {
            return Alignment::Center;
        }
        if (r.max_x - frame.max_x).abs() <= ALIGN_EPSILON
            && (r.min_x - frame.min_x).abs() > ALIGN_EPSILON
        {
            return Alignment::Right;
        }
        return Alignment::Left;
    }

    let spread = |values: Vec<f32>| -> f32 {
        let min = values.iter().copied().fold(f32::INFINITY, f32::min);
        let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        max - min
    };
    let left = spread(rects.iter().map(|r| r.min_x).collect()) <= ALIGN_EPSILON;
    let right = spread(rects.iter().map(|r| r.max_x).collect()) <= ALIGN_EPSILON;
    let center = spread(rects.iter().map(|r| r.midpoint().x).collect()) <= ALIGN_EPSILON;

    match (left, right) {
        (true, true) => Alignment::Justify,
        (true, false) => Alignment::Left,
        (false, true) => Alignment::Right,
        (false, false) if center => Alignment::Center,
        _ => Alignment::Left,
    }
}

/// Group lines into paragraphs by spacing, size, and indent breaks, then
/// classify each paragraph's alignment and indentation against the frame.
pub fn group_into_paragraphs(lines: Vec<Line>, frame: &Rect) -> Vec<Paragraph> {
    if lines.is_empty() {
        return vec![];
    }
    let avg_spacing = average_line_spacing(&lines);

    let mut groups: Vec<Vec<Line>> = Vec::new();
    let mut current: Vec<Line> = Vec::new();
    for line in lines {
        if let Some(prev) = current.last() {
            if should_break(prev, &line, avg_spacing) {
                groups.push(std::mem::take(&mut current));
            }
        }
        current.push(line);
    }
    if !current.is_empty() {
        groups.push(current);
    }

    groups
        .into_iter()
        .map(|lines| {
            let alignment = detect_alignment(&lines, frame);
            let indented = lines
                .first()
                .and_then(|l| l.bounds())
                .map(|r| r.min_x > frame.min_x + INDENT_TOLERANCE)
                .unwrap_or(false);
            let mut p = Paragraph::new(lines);
            p.alignment = alignment;
            p.is_indented = indented;
            p
        })
        .collect()
}

/// Separators from a classified graphics list that fall inside a frame,
/// excluding any whose midpoint sits on the frame edge (already used for a
/// split higher up).
fn separators_inside<'a>(
    graphics: &'a [GraphicPrimitive],
    frame: &Rect,
    direction: Direction,
) -> Vec<&'a GraphicPrimitive> {
    graphics
        .iter()
        .filter(|g| g.class == Some(GraphicClass::Separator))
        .filter(|g| g.direction() == direction)
        .filter(|g| {
            let mid = g.rect.midpoint();
            match direction {
                Direction::Vertical => mid.x > frame.min_x && mid.x < frame.max_x,
                Direction::Horizontal => mid.y > frame.min_y && mid.y < frame.max_y,
                Direction::Other => false,
            }
        })
        .filter(|g| g.rect.overlaps(frame))
        .collect()
}

/// Cluster the fragments of a frame into a region tree.
///
/// The frame is first carved at the midpoints of vertical separators
/// (column boundaries), then at horizontal separators, recursing into the
/// parts with a bounded depth. Leaf frames run line and paragraph
/// clustering over the fragments whose midpoint they contain.
pub fn cluster_region(
    frame: Rect,
    fragments: Vec<Fragment>,
    graphics: &[GraphicPrimitive],
    options: &LayoutOptions,
    depth: u32,
) -> Region {
    let mut region = Region::new(frame);

    if depth < options.max_region_depth {
        let vertical = separators_inside(graphics, &frame, Direction::Vertical);
        let horizontal = separators_inside(graphics, &frame, Direction::Horizontal);

        let (parts, used): (Vec<Rect>, usize) = if !vertical.is_empty() {
            let cuts: Vec<Rect> = vertical.iter().map(|g| g.rect).collect();
            (frame.split_vertically_at_midpoints(&cuts), vertical.len())
        } else if !horizontal.is_empty() {
            let cuts: Vec<Rect> = horizontal.iter().map(|g| g.rect).collect();
            (frame.split_horizontally_at_midpoints(&cuts), horizontal.len())
        } else {
            (vec![frame], 0)
        };

        if parts.len() > 1 {
            log::debug!(
                "split frame into {} parts at depth {} ({} separators)",
                parts.len(),
                depth,
                used
            );
            let mut buckets: Vec<Vec<Fragment>> = vec![Vec::new(); parts.len()];
            for fragment in fragments {
                let mid = fragment.rect.midpoint();
                let idx = parts
                    .iter()
                    .position(|p| p.contains_point(&mid))
                    .unwrap_or(0);
                buckets[idx].push(fragment);
            }
            for (part, bucket) in parts.into_iter().zip(buckets) {
                let sub = cluster_region(part, bucket, graphics, options, depth + 1);
                region.push_subregion(sub);
            }
            return region;
        }
    }

    let lines = group_into_lines(fragments, options);
    for paragraph in group_into_paragraphs(lines, &frame) {
        region.push_paragraph(paragraph);
    }
    region
}
