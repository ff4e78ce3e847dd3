//! Host environment capabilities
//!
//! Browsers and embedders differ in what they offer. Components check these
//! flags and fall back to simpler behavior instead of failing.

/// Optional platform features the coordinators can use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Intersection observation of slides inside a scroll container
    pub intersection_observer: bool,
    /// A visual viewport distinct from the layout viewport
    pub visual_viewport: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            intersection_observer: true,
            visual_viewport: true,
        }
    }
}

impl Capabilities {
    /// Bare environment with no optional features
    pub fn minimal() -> Self {
        Self {
            intersection_observer: false,
            visual_viewport: false,
        }
    }
}
