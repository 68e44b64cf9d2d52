//! Page and region nodes of the logical tree.

use std::cell::Cell;

use serde::{Deserialize, Serialize};

use crate::geom::Rect;
use crate::input::GraphicPrimitive;
use crate::model::{Paragraph, Role};

/// A rectangular layout region of a page.
///
/// A region exclusively owns its paragraphs and any sub-regions produced by
/// separator splitting; sub-regions may recursively own further sub-regions,
/// forming a tree of bounded depth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    /// The carved page area this region covers
    pub frame: Rect,
    /// Directly-owned drawn geometry (e.g., a graphics region's own area)
    pub own_area: Option<Rect>,
    paragraphs: Vec<Paragraph>,
    subregions: Vec<Region>,
    roles: Vec<Role>,
    #[serde(skip)]
    cached_bounds: Cell<Option<Rect>>,
}

impl Region {
    /// Create an empty region covering the given frame.
    pub fn new(frame: Rect) -> Self {
        Self {
            frame,
            own_area: None,
            paragraphs: Vec::new(),
            subregions: Vec::new(),
            roles: Vec::new(),
            cached_bounds: Cell::new(None),
        }
    }

    /// The paragraphs directly owned by this region, in reading order.
    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    /// The sub-regions of this region, in reading order.
    pub fn subregions(&self) -> &[Region] {
        &self.subregions
    }

    /// Append a paragraph, invalidating the cached bounds.
    pub fn push_paragraph(&mut self, paragraph: Paragraph) {
        self.paragraphs.push(paragraph);
        self.cached_bounds.set(None);
    }

    /// Append a sub-region, invalidating the cached bounds.
    pub fn push_subregion(&mut self, region: Region) {
        self.subregions.push(region);
        self.cached_bounds.set(None);
    }

    /// Bounding rectangle: the union of all child bounds plus any
    /// directly-owned geometry. `None` when the region holds nothing with
    /// geometry. Cached until the next structural mutation.
    pub fn bounds(&self) -> Option<Rect> {
        if let Some(r) = self.cached_bounds.get() {
            return Some(r);
        }
        let r = self
            .paragraphs
            .iter()
            .filter_map(|p| p.bounds())
            .chain(self.subregions.iter().filter_map(|s| s.bounds()))
            .chain(self.own_area)
            .reduce(|acc, r| acc.union(&r))?;
        self.cached_bounds.set(Some(r));
        Some(r)
    }

    /// Drop cached bounds recursively so the next access recomputes them.
    pub fn recompute_position(&self) {
        for p in &self.paragraphs {
            p.recompute_position();
        }
        for s in &self.subregions {
            s.recompute_position();
        }
        self.cached_bounds.set(None);
    }

    /// Attach a role.
    pub fn add_role(&mut self, role: Role) {
        if !self.roles.contains(&role) {
            self.roles.push(role);
        }
    }

    /// Check whether a role has been attached.
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// All paragraphs in the subtree, own paragraphs first, then
    /// sub-regions in order.
    pub fn all_paragraphs(&self) -> Vec<&Paragraph> {
        let mut out: Vec<&Paragraph> = self.paragraphs.iter().collect();
        for s in &self.subregions {
            out.extend(s.all_paragraphs());
        }
        out
    }

    /// Attach a role to every region whose subtree's chunks all carry it.
    ///
    /// Regions without chunks are left untagged.
    pub fn tag_uniform_role(&mut self, role: Role) {
        let uniform = {
            let chunks = self.all_paragraphs();
            !chunks.is_empty() && chunks.iter().all(|p| p.has_role(role))
        };
        if uniform {
            self.add_role(role);
        }
        for s in &mut self.subregions {
            s.tag_uniform_role(role);
        }
    }

    /// Mutable references to all paragraphs in the subtree, in the same
    /// order as [`Region::all_paragraphs`]. Invalidates cached bounds.
    pub fn all_paragraphs_mut(&mut self) -> Vec<&mut Paragraph> {
        self.cached_bounds.set(None);
        let mut out: Vec<&mut Paragraph> = self.paragraphs.iter_mut().collect();
        for s in &mut self.subregions {
            out.extend(s.all_paragraphs_mut());
        }
        out
    }

    /// Remove empty paragraphs and childless sub-regions from the subtree.
    /// Returns how many paragraphs were dropped.
    pub fn prune_empty(&mut self) -> usize {
        let before = self.paragraphs.len();
        self.paragraphs.retain(|p| !p.is_empty());
        let mut removed = before - self.paragraphs.len();
        for s in &mut self.subregions {
            removed += s.prune_empty();
        }
        self.subregions
            .retain(|s| !s.is_empty() || s.own_area.is_some());
        self.cached_bounds.set(None);
        removed
    }

    /// Check whether the subtree holds no paragraphs.
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty() && self.subregions.iter().all(|s| s.is_empty())
    }
}

/// A single page of the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,
    /// Page width in layout units
    pub width: f32,
    /// Page height in layout units
    pub height: f32,
    /// Root layout region covering the page content
    pub root: Region,
    /// Classified vector graphics of the page
    pub graphics: Vec<GraphicPrimitive>,
}

impl Page {
    /// Create a page with an empty root region covering the whole page.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            root: Region::new(Rect::new(0.0, 0.0, width, height)),
            graphics: Vec::new(),
        }
    }

    /// Page bounds as a rectangle.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// All paragraphs of the page in reading order.
    pub fn paragraphs(&self) -> Vec<&Paragraph> {
        self.root.all_paragraphs()
    }

    /// Plain text of the page, paragraphs joined by blank lines.
    pub fn plain_text(&self) -> String {
        self.paragraphs()
            .iter()
            .map(|p| p.text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Check if the page holds no paragraphs.
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Fragment;
    use crate::model::{Line, Word};

    fn word(text: &str, x: f32, y: f32) -> Word {
        Word::from_fragments(vec![Fragment::new(
            text,
            "Helvetica",
            12.0,
            y + 10.0,
            Rect::new(x, y, x + 20.0, y + 12.0),
        )])
        .unwrap()
    }

    fn paragraph(text: &str, x: f32, y: f32) -> Paragraph {
        Paragraph::new(vec![Line::new(vec![word(text, x, y)])])
    }

    #[test]
    fn test_region_bounds_union_of_children() {
        let mut region = Region::new(Rect::new(0.0, 0.0, 600.0, 800.0));
        region.push_paragraph(paragraph("a", 10.0, 10.0));
        region.push_paragraph(paragraph("b", 100.0, 300.0));

        let bounds = region.bounds().unwrap();
        for p in region.paragraphs() {
            assert!(bounds.contains(&p.bounds().unwrap()));
        }
    }

    #[test]
    fn test_region_bounds_include_own_area() {
        let mut region = Region::new(Rect::new(0.0, 0.0, 600.0, 800.0));
        region.own_area = Some(Rect::new(500.0, 700.0, 590.0, 790.0));
        region.push_paragraph(paragraph("a", 10.0, 10.0));

        let bounds = region.bounds().unwrap();
        assert!(bounds.contains(&Rect::new(500.0, 700.0, 590.0, 790.0)));
    }

    #[test]
    fn test_region_mutation_invalidates_bounds() {
        let mut region = Region::new(Rect::new(0.0, 0.0, 600.0, 800.0));
        region.push_paragraph(paragraph("a", 10.0, 10.0));
        let before = region.bounds().unwrap();

        region.push_paragraph(paragraph("b", 400.0, 600.0));
        let after = region.bounds().unwrap();
        assert!(after.contains(&before));
        assert!(after.max_x >= 400.0);
    }

    #[test]
    fn test_empty_region_has_no_bounds() {
        let region = Region::new(Rect::new(0.0, 0.0, 600.0, 800.0));
        assert_eq!(region.bounds(), None);
        assert!(region.is_empty());
    }

    #[test]
    fn test_uniform_role_propagates_to_region() {
        let mut region = Region::new(Rect::new(0.0, 0.0, 600.0, 800.0));
        let mut sub = Region::new(Rect::new(0.0, 0.0, 600.0, 400.0));
        let mut cell = paragraph("cell", 10.0, 10.0);
        cell.add_role(Role::Table);
        sub.push_paragraph(cell);
        region.push_subregion(sub);
        region.push_paragraph(paragraph("prose", 10.0, 500.0));

        region.tag_uniform_role(Role::Table);
        // Mixed subtree at the root, uniform subtree below.
        assert!(!region.has_role(Role::Table));
        assert!(region.subregions()[0].has_role(Role::Table));
    }

    #[test]
    fn test_page_reading_order() {
        let mut page = Page::new(1, 600.0, 800.0);
        page.root.push_paragraph(paragraph("first", 10.0, 10.0));
        let mut sub = Region::new(Rect::new(0.0, 400.0, 600.0, 800.0));
        sub.push_paragraph(paragraph("second", 10.0, 500.0));
        page.root.push_subregion(sub);

        let texts: Vec<String> = page.paragraphs().iter().map(|p| p.text()).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert_eq!(page.plain_text(), "first\n\nsecond");
    }
}
