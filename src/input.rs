//! Input contract for the analysis pipeline.
//!
//! A collaborator that understands the page-description format hands the
//! core typed geometric primitives: positioned text fragments with font
//! metadata and vector-graphic primitives, plus the page dimensions. No
//! ordering is required; the clusterer sorts internally.
//!
//! All coordinates use a top-left origin (y grows downward).

use serde::{Deserialize, Serialize};

use crate::geom::Rect;

/// A single positioned text run or glyph, the smallest unit the core
/// consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fragment {
    /// The text content
    pub text: String,
    /// Font name, including any style suffix (e.g., "Helvetica-Bold")
    pub font_name: String,
    /// Font size in layout units
    pub font_size: f32,
    /// Baseline y coordinate
    pub baseline: f32,
    /// Bounding rectangle
    pub rect: Rect,
    /// Whether the font name indicates a bold face
    pub is_bold: bool,
    /// Whether the font name indicates an italic face
    pub is_italic: bool,
}

impl Fragment {
    /// Create a fragment, deriving bold/italic flags from the font name.
    pub fn new(
        text: impl Into<String>,
        font_name: impl Into<String>,
        font_size: f32,
        baseline: f32,
        rect: Rect,
    ) -> Self {
        let font_name = font_name.into();
        let lower = font_name.to_lowercase();
        let is_bold =
            lower.contains("bold") || lower.contains("black") || lower.contains("heavy");
        let is_italic = lower.contains("italic") || lower.contains("oblique");

        Self {
            text: text.into(),
            font_name,
            font_size,
            baseline,
            rect,
            is_bold,
            is_italic,
        }
    }

    /// Check whether the trimmed text is empty (pure whitespace).
    pub fn is_whitespace(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Shape of a vector-graphic primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphicKind {
    /// A filled or stroked rectangle
    Rect,
    /// A line segment (possibly degenerate rectangle from a thin stroke)
    Line,
}

/// Dominant direction of a primitive, derived from its geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Wider than tall
    Horizontal,
    /// Taller than wide
    Vertical,
    /// Roughly square or curved
    Other,
}

/// Classification assigned to a primitive by the graphics classifier.
///
/// Decided once and stored as data; consumers dispatch on the tag, never
/// on the primitive's shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphicClass {
    /// A probable visual divider between layout regions
    Separator,
    /// A frame containing several content items (box, table border)
    Container,
    /// A fraction or similar mathematical bar
    MathBar,
    /// Drawn image content with no structural meaning
    Image,
}

/// A vector-drawing primitive extracted from the page description.
///
/// Consumed by region splitting and never mutated afterward except for the
/// classification tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphicPrimitive {
    /// Bounding rectangle
    pub rect: Rect,
    /// Shape kind
    pub kind: GraphicKind,
    /// RGB color
    pub color: [u8; 3],
    /// Whether the primitive came from a curved path
    pub is_curve: bool,
    /// Classification tag, `None` until the classifier has run
    pub class: Option<GraphicClass>,
}

impl GraphicPrimitive {
    /// Create an unclassified primitive.
    pub fn new(rect: Rect, kind: GraphicKind, color: [u8; 3]) -> Self {
        Self {
            rect,
            kind,
            color,
            is_curve: false,
            class: None,
        }
    }

    /// Dominant direction, derived from the aspect ratio.
    pub fn direction(&self) -> Direction {
        if self.is_curve {
            return Direction::Other;
        }
        let w = self.rect.width();
        let h = self.rect.height();
        if w > h * 2.0 {
            Direction::Horizontal
        } else if h > w * 2.0 {
            Direction::Vertical
        } else {
            Direction::Other
        }
    }
}

/// Everything the core consumes for one page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageInput {
    /// Page number (1-indexed)
    pub number: u32,
    /// Page width in layout units
    pub width: f32,
    /// Page height in layout units
    pub height: f32,
    /// Text fragments, in arbitrary order
    pub fragments: Vec<Fragment>,
    /// Vector-graphic primitives, in arbitrary order
    pub graphics: Vec<GraphicPrimitive>,
}

impl PageInput {
    /// Create an empty page input.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            fragments: Vec::new(),
            graphics: Vec::new(),
        }
    }

    /// Page bounds as a rectangle.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}
