//! The logical document tree: Document → Page → Region → Paragraph →
//! Line → Word.
//!
//! Parents exclusively own their children; lookups go through index paths,
//! never through owning back-pointers. Cached bounding rectangles are
//! invalidated by the structural mutators and recomputed lazily on access.

mod document;
mod page;
mod paragraph;
mod role;

pub use document::Document;
pub use page::{Page, Region};
pub use paragraph::{Alignment, ChunkFeatures, Line, LineStyle, Paragraph, Word};
pub use role::Role;
