//! Classification of vector-graphic primitives.
//!
//! Each primitive is classified once; the tag is stored on the primitive
//! and consumers dispatch on it, never on the primitive's shape.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::analyze::LayoutOptions;
use crate::geom::Rect;
use crate::input::{Direction, Fragment, GraphicClass, GraphicKind, GraphicPrimitive};

/// Quantization step for the separator-combination buckets.
const BUCKET_QUANTUM: f32 = 5.0;

/// Maximum vertical distance between strokes merged by the combination pass.
const COMBINE_DISTANCE: f32 = 50.0;

/// A container must hold at least this many content items.
const CONTAINER_MIN_ITEMS: usize = 5;

/// Math-bar geometry: maximum height and minimum width-to-height ratio.
const MATH_BAR_MAX_HEIGHT: f32 = 5.0;
const MATH_BAR_MIN_ASPECT: f32 = 6.0;

/// Math-bar neighborhood above and below the bar.
const MATH_BAR_NEIGHBORHOOD: f32 = 10.0;

/// Aspect-ratio separator rules (disabled by default, see
/// [`LayoutOptions::enable_aspect_separator_rules`]).
const SEPARATOR_H_ASPECT: f32 = 10.0;
const SEPARATOR_V_ASPECT: f32 = 15.0;
const SEPARATOR_MAX_THICKNESS: f32 = 15.0;

fn math_charset_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[0-9A-Za-z\u{0391}-\u{03c9}\s+\-*/=()\[\]^_,.<>|]+$")
            .expect("valid math charset pattern")
    })
}

/// Whether a text run looks mathematical: a single identifier character,
/// or a run drawn from digits, operators, Greek letters, and short
/// identifiers that contains at least one digit or operator.
pub fn is_math_text(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return false;
    }
    let mut chars = trimmed.chars();
    let first = chars.next().expect("non-empty text");
    if chars.next().is_none() {
        return first.is_alphanumeric();
    }
    math_charset_re().is_match(trimmed)
        && trimmed
            .chars()
            .any(|c| c.is_ascii_digit() || "+-*/=^_<>|".contains(c))
}

fn quantize(value: f32) -> i32 {
    (value / BUCKET_QUANTUM).round() as i32
}

/// Merge separator candidates split into multiple strokes by the rendering
/// pipeline.
///
/// Candidates sharing a quantized x-position/width/color bucket and lying
/// within 50 units vertically are merged into one primitive spanning both
/// y-ranges. Curves and squarish primitives pass through unchanged.
pub fn combine_separator_fragments(primitives: Vec<GraphicPrimitive>) -> Vec<GraphicPrimitive> {
    let mut passthrough = Vec::new();
    let mut buckets: HashMap<(i32, i32, [u8; 3]), Vec<GraphicPrimitive>> = HashMap::new();

    for p in primitives {
        if p.direction() == Direction::Other {
            passthrough.push(p);
            continue;
        }
        let key = (
            quantize(p.rect.min_x),
            quantize(p.rect.width()),
            p.color,
        );
        buckets.entry(key).or_default().push(p);
    }

    let mut out = passthrough;
    for (_, mut group) in buckets {
        group.sort_by(|a, b| {
            a.rect
                .min_y
                .partial_cmp(&b.rect.min_y)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let mut iter = group.into_iter();
        let mut current = match iter.next() {
            Some(p) => p,
            None => continue,
        };
        for next in iter {
            if next.rect.min_y - current.rect.max_y <= COMBINE_DISTANCE {
                log::debug!(
                    "combined separator strokes at x {:.1} (gap {:.1})",
                    current.rect.min_x,
                    next.rect.min_y - current.rect.max_y
                );
                current.rect = current.rect.union(&next.rect);
            } else {
                out.push(current);
                current = next;
            }
        }
        out.push(current);
    }
    out
}

/// Classify every primitive of a page, storing the tag on the primitive.
///
/// Primitives whose rectangle fully exceeds the page bounds (backgrounds)
/// are left unclassified.
pub fn classify_graphics(
    primitives: Vec<GraphicPrimitive>,
    page_bounds: &Rect,
    fragments: &[Fragment],
    options: &LayoutOptions,
) -> Vec<GraphicPrimitive> {
    primitives
        .into_iter()
        .map(|mut p| {
            if p.rect.contains(page_bounds) {
                log::debug!("skipping page-covering primitive");
                return p;
            }
            p.class = Some(classify_one(&p, fragments, options));
            p
        })
        .collect()
}

fn classify_one(
    p: &GraphicPrimitive,
    fragments: &[Fragment],
    options: &LayoutOptions,
) -> GraphicClass {
    if options.enable_aspect_separator_rules && is_aspect_separator(&p.rect) {
        return GraphicClass::Separator;
    }

    let contained = fragments
        .iter()
        .filter(|f| p.rect.contains(&f.rect))
        .count();
    if contained >= CONTAINER_MIN_ITEMS {
        return GraphicClass::Container;
    }

    if is_math_bar(&p.rect, fragments) {
        return GraphicClass::MathBar;
    }

    // Stroked lines with a clear direction divide layout regions; thin
    // rectangles only do so under the gated aspect rules above.
    if p.kind == GraphicKind::Line && p.direction() != Direction::Other {
        return GraphicClass::Separator;
    }

    GraphicClass::Image
}

/// Aspect-ratio separator test: thin and long on either axis with an
/// absolute size ceiling on the short axis.
fn is_aspect_separator(rect: &Rect) -> bool {
    let w = rect.width();
    let h = rect.height();
    let horizontal = h <= SEPARATOR_MAX_THICKNESS && w >= h * SEPARATOR_H_ASPECT;
    let vertical = w <= SEPARATOR_MAX_THICKNESS && h >= w * SEPARATOR_V_ASPECT;
    horizontal || vertical
}

/// A thin, wide bar with mathematical-looking text in the 10-unit
/// neighborhood both above and below it.
fn is_math_bar(rect: &Rect, fragments: &[Fragment]) -> bool {
    if rect.height() > MATH_BAR_MAX_HEIGHT || rect.width() < rect.height() * MATH_BAR_MIN_ASPECT {
        return false;
    }
    if rect.width() <= 0.0 {
        return false;
    }
    let above = Rect::new(
        rect.min_x,
        rect.min_y - MATH_BAR_NEIGHBORHOOD,
        rect.max_x,
        rect.min_y,
    );
    let below = Rect::new(
        rect.min_x,
        rect.max_y,
        rect.max_x,
        rect.max_y + MATH_BAR_NEIGHBORHOOD,
    );
    let has_math = |zone: &Rect| {
        fragments
            .iter()
            .any(|f| zone.overlaps(&f.rect) && is_math_text(&f.text))
    };
    has_math(&above) && has_math(&below)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::GraphicKind;

    fn line(x: f32, y: f32, w: f32, h: f32) -> GraphicPrimitive {
        GraphicPrimitive::new(
            Rect::from_size(x, y, w, h),
            GraphicKind::Line,
            [0, 0, 0],
        )
    }

    fn frag(text: &str, x: f32, y: f32, w: f32, h: f32) -> Fragment {
        Fragment::new(text, "CMMI10", 10.0, y + h, Rect::from_size(x, y, w, h))
    }

    #[test]
    fn test_math_text() {
        assert!(is_math_text("2"));
        assert!(is_math_text("x"));
        assert!(is_math_text("a"));
        assert!(is_math_text("1 + 2"));
        assert!(!is_math_text("word"));
        assert!(!is_math_text(""));
    }

    #[test]
    fn test_combine_merges_nearby_strokes() {
        // Two vertical strokes at the same x/width/color, 20 units apart:
        // merged into one primitive spanning both y-ranges.
        let a = line(50.0, 0.0, 2.0, 400.0);
        let b = line(50.0, 420.0, 2.0, 60.0);
        let merged = combine_separator_fragments(vec![a, b]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].rect, Rect::new(50.0, 0.0, 52.0, 480.0));
    }

    #[test]
    fn test_combine_respects_distance_limit() {
        let a = line(50.0, 0.0, 2.0, 100.0);
        let b = line(50.0, 200.0, 2.0, 60.0);
        let merged = combine_separator_fragments(vec![a, b]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_combine_keeps_different_buckets_apart() {
        let a = line(50.0, 0.0, 2.0, 100.0);
        let mut b = line(300.0, 120.0, 2.0, 100.0);
        b.color = [255, 0, 0];
        let merged = combine_separator_fragments(vec![a, b]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_container_classification() {
        let frame = GraphicPrimitive::new(
            Rect::new(0.0, 0.0, 200.0, 200.0),
            GraphicKind::Rect,
            [0, 0, 0],
        );
        let fragments: Vec<Fragment> = (0..5)
            .map(|i| frag("cell", 10.0 + i as f32 * 30.0, 10.0, 20.0, 10.0))
            .collect();
        let page = Rect::new(0.0, 0.0, 600.0, 800.0);
        let classified = classify_graphics(
            vec![frame],
            &page,
            &fragments,
            &LayoutOptions::default(),
        );
        assert_eq!(classified[0].class, Some(GraphicClass::Container));
    }

    #[test]
    fn test_math_bar_classification() {
        let bar = line(100.0, 50.0, 40.0, 2.0);
        let fragments = vec![
            frag("x+1", 100.0, 35.0, 30.0, 10.0),
            frag("2", 115.0, 55.0, 8.0, 10.0),
        ];
        let page = Rect::new(0.0, 0.0, 600.0, 800.0);
        let classified = classify_graphics(
            vec![bar],
            &page,
            &fragments,
            &LayoutOptions::default(),
        );
        assert_eq!(classified[0].class, Some(GraphicClass::MathBar));
    }

    #[test]
    fn test_fallback_is_image() {
        let blob = GraphicPrimitive::new(
            Rect::new(0.0, 0.0, 50.0, 50.0),
            GraphicKind::Rect,
            [10, 20, 30],
        );
        let page = Rect::new(0.0, 0.0, 600.0, 800.0);
        let classified =
            classify_graphics(vec![blob], &page, &[], &LayoutOptions::default());
        assert_eq!(classified[0].class, Some(GraphicClass::Image));
    }

    #[test]
    fn test_line_with_direction_is_separator() {
        let rule = line(0.0, 100.0, 300.0, 3.0);
        let page = Rect::new(0.0, 0.0, 600.0, 800.0);
        let classified = classify_graphics(vec![rule], &page, &[], &LayoutOptions::default());
        assert_eq!(classified[0].class, Some(GraphicClass::Separator));
    }

    #[test]
    fn test_aspect_separator_rules_gated() {
        // A thin stroked rectangle only becomes a separator under the
        // aspect rules.
        let rule = GraphicPrimitive::new(
            Rect::new(0.0, 100.0, 300.0, 103.0),
            GraphicKind::Rect,
            [0, 0, 0],
        );
        let page = Rect::new(0.0, 0.0, 600.0, 800.0);

        let default_opts = LayoutOptions::default();
        let classified = classify_graphics(vec![rule.clone()], &page, &[], &default_opts);
        assert_ne!(classified[0].class, Some(GraphicClass::Separator));

        let enabled = LayoutOptions::new().with_aspect_separator_rules(true);
        let classified = classify_graphics(vec![rule], &page, &[], &enabled);
        assert_eq!(classified[0].class, Some(GraphicClass::Separator));
    }

    #[test]
    fn test_page_covering_primitive_left_unclassified() {
        let page = Rect::new(0.0, 0.0, 600.0, 800.0);
        let background = GraphicPrimitive::new(
            Rect::new(-10.0, -10.0, 700.0, 900.0),
            GraphicKind::Rect,
            [255, 255, 255],
        );
        let classified =
            classify_graphics(vec![background], &page, &[], &LayoutOptions::default());
        assert_eq!(classified[0].class, None);
    }
}
