//! Sequential role classification of chunks.
//!
//! Roles are assigned in reading order; a chunk may consult the roles of
//! the chunks before it. The section-inheritance walk over predecessor
//! links is bounded by a visited set, terminating on self-loops and cycles
//! instead of looping.

use std::sync::OnceLock;

use regex::Regex;

use crate::geom::Rect;
use crate::model::{ChunkFeatures, Paragraph, Role};

/// A heading's popular word height relative to the body-text height.
const HEADING_HEIGHT_RATIO: f32 = 1.15;

/// Fraction of the page height treated as header/footer margin.
const MARGIN_RATIO: f32 = 0.05;

/// Top fraction of the first page where affiliations appear.
const AFFILIATION_ZONE_RATIO: f32 = 0.25;

fn caption_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(figure|fig\.?|table|tab\.?)\s*\d").expect("valid caption pattern")
    })
}

fn keywords_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^(keywords|index terms)\b").expect("valid keywords pattern"))
}

fn references_heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(references|bibliography)\s*$").expect("valid references pattern")
    })
}

fn reference_entry_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\[\d+\]").expect("valid reference entry pattern"))
}

fn divider_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[-\u{2013}\u{2014}_*=~\u{00b7}.\s]{3,}$").expect("valid divider pattern")
    })
}

fn affiliation_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(university|institute|department|laboratory|faculty)\b")
            .expect("valid affiliation pattern")
    })
}

/// Page-level context the role classifier consults.
#[derive(Debug, Clone)]
pub struct RoleContext<'a> {
    /// Page bounds
    pub page_bounds: Rect,
    /// Popular word height across the page (body text size)
    pub body_height: f32,
    /// Bounds of graphics classified as containers
    pub container_rects: &'a [Rect],
    /// Whether this is the first page of the document
    pub first_page: bool,
}

/// Walk backward over predecessor links until a main-section role is found.
///
/// `links[i]` is the predecessor of chunk `i`, normally `Some(i - 1)`. A
/// visited set guards against self-loops and cycles in malformed link
/// chains; on detection the walk terminates and returns the last valid
/// section found, or `None`.
pub fn last_main_section(roles: &[Role], links: &[Option<usize>], start: usize) -> Option<Role> {
    let mut visited = vec![false; roles.len()];
    let mut cursor = links.get(start).copied().flatten();
    while let Some(i) = cursor {
        if i >= roles.len() || visited[i] {
            log::warn!("cycle in section back-references at chunk {}", i);
            return None;
        }
        visited[i] = true;
        if roles[i].is_main_section() {
            return Some(roles[i]);
        }
        cursor = links.get(i).copied().flatten();
    }
    None
}

/// Assign roles to the chunks of one page, in reading order.
///
/// Each chunk receives a primary role and inherits the section of the
/// nearest preceding main-section chunk. Chunks no rule matches fall back
/// to [`Role::Unclassified`], which downstream consumers must treat as
/// valid.
pub fn assign_roles(
    chunks: &mut [&mut Paragraph],
    features: &[ChunkFeatures],
    ctx: &RoleContext<'_>,
) {
    let links: Vec<Option<usize>> = (0..chunks.len())
        .map(|i| i.checked_sub(1))
        .collect();
    let mut assigned: Vec<Role> = Vec::with_capacity(chunks.len());
    let mut in_references = false;

    for (i, chunk) in chunks.iter_mut().enumerate() {
        let role = classify_chunk(chunk, features.get(i), ctx, in_references);
        if role == Role::Heading && references_heading_re().is_match(chunk.text().trim()) {
            in_references = true;
        } else if role == Role::Heading {
            in_references = false;
        }

        chunk.section = last_main_section(&assigned, &links, i);
        chunk.add_role(role);
        if role == Role::Caption && chunk.lines().len() > 1 {
            chunk.add_role(Role::FigureLegend);
        }
        assigned.push(role);
    }
}

fn classify_chunk(
    chunk: &Paragraph,
    features: Option<&ChunkFeatures>,
    ctx: &RoleContext<'_>,
    in_references: bool,
) -> Role {
    if chunk.is_empty() {
        return Role::Unclassified;
    }
    let Some(features) = features else {
        return Role::Unclassified;
    };
    let Some(bounds) = chunk.bounds() else {
        return Role::Unclassified;
    };

    // Rule lines rendered as text (dashes, dots, underscores) carry no
    // prose; they stay separators even inside the margin zones.
    if divider_re().is_match(chunk.text().trim()) {
        return Role::Separator;
    }

    let page = &ctx.page_bounds;
    let margin = page.height() * MARGIN_RATIO;
    if bounds.max_y <= page.min_y + margin {
        return Role::Header;
    }
    if bounds.min_y >= page.max_y - margin {
        return Role::Footer;
    }

    if ctx
        .container_rects
        .iter()
        .any(|c| bounds.overlap_ratio(c).map_or(false, |r| r > 0.5))
    {
        return Role::Table;
    }

    let text = chunk.text();
    let trimmed = text.trim();
    if caption_re().is_match(trimmed) {
        return Role::Caption;
    }
    if keywords_re().is_match(trimmed) {
        return Role::Keywords;
    }
    if ctx.first_page
        && bounds.max_y <= page.min_y + page.height() * AFFILIATION_ZONE_RATIO
        && affiliation_re().is_match(trimmed)
    {
        return Role::Affiliation;
    }

    if reference_entry_re().is_match(trimmed) {
        return if in_references {
            Role::Reference
        } else {
            Role::Citation
        };
    }
    if in_references {
        return Role::Reference;
    }

    if references_heading_re().is_match(trimmed) {
        return Role::Heading;
    }
    if ctx.body_height > 0.0 && features.popular_height >= ctx.body_height * HEADING_HEIGHT_RATIO {
        return Role::Heading;
    }
    if features.is_bold && chunk.lines().len() == 1 && chunk.word_count() < 20 {
        return Role::Heading;
    }

    Role::BodyText
}
