//! Viewer-side state: overlay geometry and match browsing.

mod overlay;
mod state;

pub use overlay::{
    OverlayRect, OverlayStyle, PageRegistry, Viewport, MAX_ZOOM, MIN_ZOOM, ZOOM_STEP,
};
pub use state::{MatchBrowser, SortDirection, SortKey};
