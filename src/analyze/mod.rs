//! Layout analysis passes and the page/document drivers.
//!
//! A page flows through the passes in a fixed order: separator-fragment
//! combination, graphic classification, recursive region clustering (lines,
//! then paragraph chunks), per-chunk features, and sequential role
//! classification. Pages are independent of each other, so document
//! analysis can fan pages out across threads and reassemble the results in
//! input order.

pub mod clusterer;
pub mod features;
pub mod graphics;
pub mod options;
pub mod roles;
pub mod segmenter;

pub use options::LayoutOptions;
pub use roles::RoleContext;

use rayon::prelude::*;

use crate::error::{Diagnostic, Error, Result};
use crate::geom::Rect;
use crate::input::{Direction, GraphicClass, GraphicPrimitive, PageInput};
use crate::model::{Document, Page, Paragraph, Region, Role};

use features::{compute_features, FeatureContext, FrequencyCounter};

/// The result of analyzing one page: the built page tree plus any
/// non-fatal diagnostics collected along the way.
#[derive(Debug)]
pub struct PageAnalysis {
    /// The fully-built page
    pub page: Page,
    /// Non-fatal problems encountered while building it
    pub diagnostics: Vec<Diagnostic>,
}

/// The result of analyzing a whole document.
#[derive(Debug)]
pub struct DocumentAnalysis {
    /// Pages in input order
    pub document: Document,
    /// Diagnostics from all pages, in page order
    pub diagnostics: Vec<Diagnostic>,
}

/// Drives the analysis passes over raw page inputs.
///
/// ```
/// use pagelayout::analyze::{LayoutAnalyzer, LayoutOptions};
/// use pagelayout::input::PageInput;
///
/// let analyzer = LayoutAnalyzer::new(LayoutOptions::default());
/// let analysis = analyzer.analyze_page(PageInput::new(1, 612.0, 792.0))?;
/// assert!(analysis.page.is_empty());
/// # Ok::<(), pagelayout::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct LayoutAnalyzer {
    options: LayoutOptions,
}

impl LayoutAnalyzer {
    /// Create an analyzer with the given options.
    pub fn new(options: LayoutOptions) -> Self {
        Self { options }
    }

    /// The options this analyzer runs with.
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Run all passes over one page.
    ///
    /// Fails only on invalid page dimensions; problems scoped to a single
    /// chunk or region are reported as diagnostics instead, with the
    /// offending unit dropped and its siblings kept.
    pub fn analyze_page(&self, input: PageInput) -> Result<PageAnalysis> {
        let PageInput {
            number,
            width,
            height,
            fragments,
            graphics,
        } = input;

        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(Error::InvalidPageDimensions { width, height });
        }
        let page_bounds = Rect::new(0.0, 0.0, width, height);
        let mut diagnostics = Vec::new();

        log::debug!(
            "page {}: {} fragments, {} graphics",
            number,
            fragments.len(),
            graphics.len()
        );

        let graphics = graphics::combine_separator_fragments(graphics);
        let graphics = graphics::classify_graphics(graphics, &page_bounds, &fragments, &self.options);

        let mut root =
            clusterer::cluster_region(page_bounds, fragments, &graphics, &self.options, 0);

        let dropped = root.prune_empty();
        if dropped > 0 {
            diagnostics.push(Diagnostic::warning(
                number,
                format!("dropped {} empty chunks", dropped),
            ));
        }
        if root.is_empty() {
            diagnostics.push(Diagnostic::info(number, "page has no text content"));
        }

        self.annotate_chunks(&mut root, &graphics, page_bounds, number);

        let mut page = Page::new(number, width, height);
        page.root = root;
        page.graphics = graphics;
        Ok(PageAnalysis { page, diagnostics })
    }

    /// Feature and role passes over the finished region tree.
    fn annotate_chunks(
        &self,
        root: &mut Region,
        graphics: &[GraphicPrimitive],
        page_bounds: Rect,
        number: u32,
    ) {
        let column_boundaries: Vec<f32> = graphics
            .iter()
            .filter(|g| g.class == Some(GraphicClass::Separator))
            .filter(|g| g.direction() == Direction::Vertical)
            .map(|g| g.rect.midpoint().x)
            .collect();
        let container_rects: Vec<Rect> = graphics
            .iter()
            .filter(|g| g.class == Some(GraphicClass::Container))
            .map(|g| g.rect)
            .collect();

        // Popular word height over the whole page approximates the body
        // text size.
        let mut heights: FrequencyCounter<i32> = FrequencyCounter::new();
        for p in root.all_paragraphs() {
            for w in p.words() {
                heights.add((w.rect.height() * 10.0).round() as i32);
            }
        }
        let body_height = heights
            .most_common()
            .map(|(h, _)| *h as f32 / 10.0)
            .unwrap_or(0.0);

        let chunk_bounds: Vec<Rect> = root
            .all_paragraphs()
            .iter()
            .map(|p| p.bounds().unwrap_or(page_bounds))
            .collect();
        let body_frame = chunk_bounds
            .iter()
            .copied()
            .reduce(|a, b| a.union(&b))
            .unwrap_or(page_bounds);

        let feature_ctx = FeatureContext {
            body_frame,
            column_boundaries: &column_boundaries,
            chunk_bounds: &chunk_bounds,
            page_height: page_bounds.height(),
        };

        let mut chunks: Vec<&mut Paragraph> = root.all_paragraphs_mut();
        let mut chunk_features = Vec::with_capacity(chunks.len());
        for (i, chunk) in chunks.iter_mut().enumerate() {
            let f = compute_features(chunk, i, &feature_ctx);
            chunk.features = Some(f.clone());
            chunk_features.push(f);
        }

        let role_ctx = RoleContext {
            page_bounds,
            body_height,
            container_rects: &container_rects,
            first_page: number <= 1,
        };
        roles::assign_roles(&mut chunks, &chunk_features, &role_ctx);

        for (i, chunk) in chunks.iter_mut().enumerate() {
            chunk.block_number = Some(i as u32);
        }
        drop(chunks);

        root.tag_uniform_role(Role::Table);
    }

    /// Run all passes over every page, reassembling the results in input
    /// order. Pages run in parallel unless the options disable it.
    pub fn analyze_document(&self, inputs: Vec<PageInput>) -> Result<DocumentAnalysis> {
        let results: Vec<Result<PageAnalysis>> = if self.options.parallel {
            inputs
                .into_par_iter()
                .map(|input| self.analyze_page(input))
                .collect()
        } else {
            inputs
                .into_iter()
                .map(|input| self.analyze_page(input))
                .collect()
        };

        let mut document = Document::new();
        let mut diagnostics = Vec::new();
        for result in results {
            let analysis = result?;
            diagnostics.extend(analysis.diagnostics);
            document.add_page(analysis.page);
        }
        Ok(DocumentAnalysis {
            document,
            diagnostics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Fragment;

    fn frag(text: &str, x: f32, y: f32, w: f32) -> Fragment {
        Fragment::new(
            text,
            "Helvetica",
            10.0,
            y + 8.0,
            Rect::new(x, y, x + w, y + 10.0),
        )
    }

    #[test]
    fn test_invalid_dimensions_rejected() {
        let analyzer = LayoutAnalyzer::default();
        let result = analyzer.analyze_page(PageInput::new(1, 0.0, 792.0));
        assert!(matches!(
            result,
            Err(Error::InvalidPageDimensions { .. })
        ));

        let result = analyzer.analyze_page(PageInput::new(1, 612.0, f32::NAN));
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_page_analysis() {
        let analyzer = LayoutAnalyzer::default();
        let analysis = analyzer.analyze_page(PageInput::new(1, 612.0, 792.0)).unwrap();
        assert!(analysis.page.is_empty());
        assert!(analysis
            .diagnostics
            .iter()
            .any(|d| d.message.contains("no text content")));
    }

    #[test]
    fn test_single_line_page() {
        let analyzer = LayoutAnalyzer::default();
        let mut input = PageInput::new(1, 612.0, 792.0);
        input.fragments = vec![
            frag("Hello", 100.0, 100.0, 30.0),
            frag("world", 145.0, 100.0, 30.0),
        ];
        let analysis = analyzer.analyze_page(input).unwrap();
        assert_eq!(analysis.page.plain_text(), "Hello world");

        let chunks = analysis.page.paragraphs();
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].features.is_some());
        assert_eq!(chunks[0].block_number, Some(0));
    }

    #[test]
    fn test_document_preserves_page_order() {
        let analyzer = LayoutAnalyzer::new(LayoutOptions::default().sequential());
        let inputs: Vec<PageInput> = (1..=3)
            .map(|n| {
                let mut input = PageInput::new(n, 612.0, 792.0);
                input.fragments = vec![frag(&format!("page{}", n), 100.0, 100.0, 30.0)];
                input
            })
            .collect();

        let analysis = analyzer.analyze_document(inputs).unwrap();
        assert_eq!(analysis.document.page_count(), 3);
        for n in 1..=3 {
            let page = analysis.document.get_page(n).unwrap();
            assert_eq!(page.number, n);
            assert_eq!(page.plain_text(), format!("page{}", n));
        }
    }

    #[test]
    fn test_document_error_propagates() {
        let analyzer = LayoutAnalyzer::default();
        let inputs = vec![
            PageInput::new(1, 612.0, 792.0),
            PageInput::new(2, -1.0, 792.0),
        ];
        assert!(analyzer.analyze_document(inputs).is_err());
    }
}
