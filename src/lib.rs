//! # pagelayout
//!
//! Document layout reconstruction for Rust.
//!
//! Given the raw content of a page — positioned text fragments and vector
//! graphics, with no reading order — this library rebuilds the logical
//! structure: words, lines, paragraph chunks, columns and regions, and a
//! page/document tree whose chunks carry semantic roles (heading, body
//! text, caption, reference, and so on).
//!
//! ## Quick Start
//!
//! ```
//! use pagelayout::{analyze_document, LayoutOptions, PageInput};
//!
//! fn main() -> pagelayout::Result<()> {
//!     // One PageInput per page, filled by your format-specific reader.
//!     let pages = vec![PageInput::new(1, 612.0, 792.0)];
//!
//!     let analysis = analyze_document(pages, &LayoutOptions::default())?;
//!     println!("{}", analysis.document.plain_text());
//!
//!     for diagnostic in &analysis.diagnostics {
//!         eprintln!("page {}: {}", diagnostic.page, diagnostic.message);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Word segmentation**: fragments merge into words by estimated
//!   character spacing, or at explicit whitespace fragments
//! - **Line and chunk clustering**: baseline grouping, then paragraph
//!   breaks from spacing, font-size and margin changes
//! - **Region splitting**: separator graphics carve the page into columns
//!   and regions, recursively with bounded depth
//! - **Features and roles**: per-chunk statistics feed a sequential role
//!   classifier; unknown layouts degrade to `Unclassified`, never fail
//! - **Parallel processing**: pages are independent and fan out over
//!   Rayon unless disabled

pub mod analyze;
pub mod error;
pub mod geom;
pub mod input;
pub mod model;

// Re-export commonly used types
pub use analyze::{DocumentAnalysis, LayoutAnalyzer, LayoutOptions, PageAnalysis};
pub use error::{Diagnostic, Error, Result, Severity};
pub use geom::{Point, Rect};
pub use input::{Direction, Fragment, GraphicClass, GraphicKind, GraphicPrimitive, PageInput};
pub use model::{
    Alignment, ChunkFeatures, Document, Line, LineStyle, Page, Paragraph, Region, Role, Word,
};

/// Analyze a single page with the given options.
///
/// Convenience wrapper over [`LayoutAnalyzer::analyze_page`].
pub fn analyze_page(input: PageInput, options: &LayoutOptions) -> Result<PageAnalysis> {
    LayoutAnalyzer::new(options.clone()).analyze_page(input)
}

/// Analyze a whole document with the given options.
///
/// Convenience wrapper over [`LayoutAnalyzer::analyze_document`].
pub fn analyze_document(
    inputs: Vec<PageInput>,
    options: &LayoutOptions,
) -> Result<DocumentAnalysis> {
    LayoutAnalyzer::new(options.clone()).analyze_document(inputs)
}
