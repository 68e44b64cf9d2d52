//! Document-level types.

use serde::{Deserialize, Serialize};

use crate::model::Page;

/// The assembled logical tree: all pages in reading order.
///
/// Immutable once constructed except for role annotations applied by later
/// passes; pages are only appended after their subtree is fully built.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// Pages in reading order
    pub pages: Vec<Page>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self { pages: Vec::new() }
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, page_num: u32) -> Option<&Page> {
        if page_num == 0 {
            return None;
        }
        self.pages.get((page_num - 1) as usize)
    }

    /// Append a fully-built page.
    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Plain text of the whole document.
    pub fn plain_text(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.plain_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
