//! Word, line, and paragraph (chunk) nodes of the logical tree.

use std::cell::Cell;

use serde::{Deserialize, Serialize};

use crate::geom::Rect;
use crate::input::Fragment;
use crate::model::Role;

/// A word merged from one or more positioned fragments.
///
/// Owns its constituent fragments; the text, bounding rectangle and
/// dominant style are fixed at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Word {
    /// Merged text of all fragments, in x order
    pub text: String,
    /// Union of the fragment rectangles
    pub rect: Rect,
    /// Dominant font name (from the longest fragment)
    pub font_name: String,
    /// Dominant font size
    pub font_size: f32,
    /// Baseline y of the first fragment
    pub baseline: f32,
    /// Whether the dominant font is bold
    pub is_bold: bool,
    /// Whether the dominant font is italic
    pub is_italic: bool,
    /// The constituent fragments
    pub fragments: Vec<Fragment>,
}

impl Word {
    /// Merge fragments into a word. Fragments are sorted by x internally.
    ///
    /// Returns `None` for an empty fragment list.
    pub fn from_fragments(mut fragments: Vec<Fragment>) -> Option<Self> {
        if fragments.is_empty() {
            return None;
        }
        fragments.sort_by(|a, b| {
            a.rect
                .min_x
                .partial_cmp(&b.rect.min_x)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let text: String = fragments.iter().map(|f| f.text.as_str()).collect();
        let rect = fragments
            .iter()
            .skip(1)
            .fold(fragments[0].rect, |acc, f| acc.union(&f.rect));

        // Dominant style comes from the longest fragment.
        let dominant = fragments
            .iter()
            .max_by_key(|f| f.text.chars().count())
            .expect("non-empty fragment list");
        let font_name = dominant.font_name.clone();
        let font_size = dominant.font_size;
        let is_bold = dominant.is_bold;
        let is_italic = dominant.is_italic;
        let baseline = fragments[0].baseline;

        Some(Self {
            text,
            rect,
            font_name,
            font_size,
            baseline,
            is_bold,
            is_italic,
            fragments,
        })
    }
}

/// Dominant style of a line, deciding the fragment ordering comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    /// Ordinary prose, ordered by vertical then horizontal interval
    #[default]
    Normal,
    /// Mathematical content, ordered purely by ascending x
    Formula,
}

/// An ordered sequence of words on one visual line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Line {
    words: Vec<Word>,
    /// Dominant style of the line
    pub style: LineStyle,
    #[serde(skip)]
    cached_bounds: Cell<Option<Rect>>,
}

impl Line {
    /// Create a line from words already in reading order.
    pub fn new(words: Vec<Word>) -> Self {
        Self {
            words,
            style: LineStyle::Normal,
            cached_bounds: Cell::new(None),
        }
    }

    /// The words of the line, left to right.
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Append a word, invalidating the cached bounds.
    pub fn push_word(&mut self, word: Word) {
        self.words.push(word);
        self.cached_bounds.set(None);
    }

    /// Bounding rectangle as the union of all words, or `None` for an
    /// empty line. Cached until the next structural mutation.
    pub fn bounds(&self) -> Option<Rect> {
        if let Some(r) = self.cached_bounds.get() {
            return Some(r);
        }
        let mut iter = self.words.iter();
        let first = iter.next()?.rect;
        let r = iter.fold(first, |acc, w| acc.union(&w.rect));
        self.cached_bounds.set(Some(r));
        Some(r)
    }

    /// Drop the cached bounds so the next access recomputes them.
    pub fn recompute_position(&self) {
        self.cached_bounds.set(None);
    }

    /// Baseline of the line (from its first word).
    pub fn baseline(&self) -> Option<f32> {
        self.words.first().map(|w| w.baseline)
    }

    /// Dominant font size, weighted by word text length.
    pub fn font_size(&self) -> f32 {
        let total: usize = self.words.iter().map(|w| w.text.len()).sum();
        if total == 0 {
            return 0.0;
        }
        let weighted: f32 = self
            .words
            .iter()
            .map(|w| w.font_size * w.text.len() as f32)
            .sum();
        weighted / total as f32
    }

    /// Combined text with single spaces between words.
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Check if the line has no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Text alignment of a chunk within its region frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left alignment (default)
    #[default]
    Left,
    /// Center alignment
    Center,
    /// Right alignment
    Right,
    /// Both edges aligned
    Justify,
}

/// Statistical and geometric features computed per chunk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChunkFeatures {
    /// Most popular word font+style, by frequency over constituent words
    pub popular_font: Option<String>,
    /// Most popular word height
    pub popular_height: f32,
    /// Alignment relative to the body-text frame midline
    pub alignment: Alignment,
    /// Ratio of uppercase letters among alphabetic characters
    pub capitalization_ratio: f32,
    /// Whether the popular font is bold
    pub is_bold: bool,
    /// Whether the popular font is italic
    pub is_italic: bool,
    /// Sum of word-bounding areas over the chunk area
    pub density: f32,
    /// Whether the chunk sits isolated from its neighbors
    pub is_outlier: bool,
    /// Whether a chunk edge sits on a column boundary
    pub aligned_to_column: bool,
}

/// A paragraph-level chunk: an ordered sequence of lines sharing geometric
/// and stylistic coherence, subject to role classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paragraph {
    lines: Vec<Line>,
    roles: Vec<Role>,
    /// Alignment detected by the clusterer
    pub alignment: Alignment,
    /// Whether the first line is indented past the region's left edge
    pub is_indented: bool,
    /// Features computed by the feature pass, `None` until it has run
    pub features: Option<ChunkFeatures>,
    /// Section role inherited from preceding chunks
    pub section: Option<Role>,
    /// Assignment marker set by the block builder, `None` while unassigned
    pub block_number: Option<u32>,
    #[serde(skip)]
    cached_bounds: Cell<Option<Rect>>,
}

impl Paragraph {
    /// Create a paragraph from lines already in reading order.
    pub fn new(lines: Vec<Line>) -> Self {
        Self {
            lines,
            roles: Vec::new(),
            alignment: Alignment::Left,
            is_indented: false,
            features: None,
            section: None,
            block_number: None,
            cached_bounds: Cell::new(None),
        }
    }

    /// The lines of the paragraph, top to bottom.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Append a line, invalidating the cached bounds.
    pub fn push_line(&mut self, line: Line) {
        self.lines.push(line);
        self.cached_bounds.set(None);
    }

    /// Merge another paragraph's lines into this one.
    pub fn merge(&mut self, other: Paragraph) {
        self.lines.extend(other.lines);
        self.cached_bounds.set(None);
    }

    /// Bounding rectangle as the union of all line bounds, or `None` when
    /// no line has geometry. Cached until the next structural mutation.
    pub fn bounds(&self) -> Option<Rect> {
        if let Some(r) = self.cached_bounds.get() {
            return Some(r);
        }
        let r = self
            .lines
            .iter()
            .filter_map(|l| l.bounds())
            .reduce(|acc, r| acc.union(&r))?;
        self.cached_bounds.set(Some(r));
        Some(r)
    }

    /// Drop cached bounds recursively so the next access recomputes them.
    pub fn recompute_position(&self) {
        for line in &self.lines {
            line.recompute_position();
        }
        self.cached_bounds.set(None);
    }

    /// Attach a role. A chunk may carry several roles.
    pub fn add_role(&mut self, role: Role) {
        if !self.roles.contains(&role) {
            self.roles.push(role);
        }
    }

    /// Check whether a role has been attached.
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// All attached roles, in assignment order.
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Primary role: the first assigned, or `Unclassified`.
    pub fn role(&self) -> Role {
        self.roles.first().copied().unwrap_or(Role::Unclassified)
    }

    /// Iterate over all words of the paragraph.
    pub fn words(&self) -> impl Iterator<Item = &Word> {
        self.lines.iter().flat_map(|l| l.words().iter())
    }

    /// Number of words in the paragraph.
    pub fn word_count(&self) -> usize {
        self.lines.iter().map(|l| l.words().len()).sum()
    }

    /// Combined text, lines joined by single spaces.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Check if the paragraph has no words or only whitespace.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() || self.text().trim().is_empty()
    }
}
