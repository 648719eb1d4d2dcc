//! Highlight overlay geometry for rendered PDF pages.
//!
//! Converts fractional match bounding boxes into absolute rectangles in a
//! page's base coordinate space (scale 1). The rendering surface applies the
//! zoom transform itself; geometry here is always unscaled.

use std::collections::HashMap;

use crate::models::Match;
use crate::risk::Rgba;

/// Minimum zoom factor.
pub const MIN_ZOOM: f64 = 0.5;
/// Maximum zoom factor.
pub const MAX_ZOOM: f64 = 3.0;
/// Zoom increment per step.
pub const ZOOM_STEP: f64 = 0.2;

/// Intrinsic page dimensions captured once per page at scale 1.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PageDimensions {
    width: f64,
    height: f64,
}

/// Registry of page dimensions, filled in as pages are rendered.
///
/// A page the user has never visited has no entry, and matches on it get no
/// overlay rather than a mis-positioned one.
#[derive(Debug, Clone, Default)]
pub struct PageRegistry {
    dimensions: HashMap<u32, PageDimensions>,
}

impl PageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a page's intrinsic dimensions (layout units at scale 1).
    pub fn record(&mut self, page: u32, width: f64, height: f64) {
        self.dimensions.insert(page, PageDimensions { width, height });
    }

    /// Whether dimensions for a page have been captured.
    pub fn has_page(&self, page: u32) -> bool {
        self.dimensions.contains_key(&page)
    }

    /// Absolute rectangle for a match, in the page's base coordinate space.
    ///
    /// Returns `None` when the match carries no bounding box or its page has
    /// not been rendered yet.
    pub fn overlay_rect(&self, m: &Match) -> Option<OverlayRect> {
        let bbox = m.bbox?;
        let dims = self.dimensions.get(&m.page)?;
        Some(OverlayRect {
            left: bbox.x * dims.width,
            top: bbox.y * dims.height,
            width: bbox.width * dims.width,
            height: bbox.height * dims.height,
        })
    }

    /// Styled overlays for every match on the given page.
    ///
    /// Matches on other pages never produce an overlay.
    pub fn page_overlays<'a>(&self, matches: &'a [Match], page: u32) -> Vec<OverlayStyle<'a>> {
        matches
            .iter()
            .filter(|m| m.page == page)
            .filter_map(|m| {
                let rect = self.overlay_rect(m)?;
                Some(OverlayStyle {
                    rect,
                    fill: m.tier().fill(),
                    border: m.tier().border(),
                    source: m,
                })
            })
            .collect()
    }
}

/// Absolute pixel rectangle at scale 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// A positioned, colored overlay for one match.
#[derive(Debug, Clone, Copy)]
pub struct OverlayStyle<'a> {
    pub rect: OverlayRect,
    pub fill: Rgba,
    pub border: Rgba,
    pub source: &'a Match,
}

/// Current page and zoom of the document view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    page: u32,
    num_pages: u32,
    zoom: f64,
}

impl Viewport {
    /// Viewport on page 1 at 100% zoom.
    pub fn new(num_pages: u32) -> Self {
        Self { page: 1, num_pages: num_pages.max(1), zoom: 1.0 }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn num_pages(&self) -> u32 {
        self.num_pages
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn next_page(&mut self) {
        self.page = (self.page + 1).min(self.num_pages);
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    /// Jump to a page, clamped to the document range.
    pub fn go_to(&mut self, page: u32) {
        self.page = page.clamp(1, self.num_pages);
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + ZOOM_STEP).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom - ZOOM_STEP).max(MIN_ZOOM);
    }
}
