//! Scroll Mode - page-wide navigation mode and bottom nav visibility
//!
//! A page owns one [`ScrollModeProvider`] and hands clones of it to whatever
//! layout code needs to read or change the mode. There is no global instance.

mod coordinator;

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::config::ScrollTuning;

pub use coordinator::ScrollModeCoordinator;

/// Which navigation paradigm the page is using
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollMode {
    /// Continuous scrolling
    #[default]
    Scroll,
    /// Section slider / paged panels
    Reel,
}

impl ScrollMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScrollMode::Scroll => "scroll",
            ScrollMode::Reel => "reel",
        }
    }
}

impl fmt::Display for ScrollMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of the most recent committed scroll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollDirection {
    Up,
    #[default]
    Down,
}

/// Identity of a scrollable container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScrollElementId(pub u64);

/// One scroll event reduced to what the coordinator needs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollSample {
    /// Scroll offset of the source container (px)
    pub offset: f64,
    pub timestamp: Instant,
    /// Container the event came from
    pub source: ScrollElementId,
}

impl ScrollSample {
    pub fn new(source: ScrollElementId, offset: f64, timestamp: Instant) -> Self {
        Self {
            offset,
            timestamp,
            source,
        }
    }
}

/// Snapshot of the shared scroll mode state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollModeState {
    pub mode: ScrollMode,
    pub bottom_nav_visible: bool,
    pub scroll_direction: ScrollDirection,
    pub registered_scroll_element: Option<ScrollElementId>,
}

impl Default for ScrollModeState {
    fn default() -> Self {
        Self {
            mode: ScrollMode::Scroll,
            bottom_nav_visible: true,
            scroll_direction: ScrollDirection::Down,
            registered_scroll_element: None,
        }
    }
}

/// Shared handle to a page's scroll mode coordinator
///
/// Cloning is cheap; all clones see the same state. Readers that want to react
/// to changes call [`ScrollModeProvider::subscribe`].
#[derive(Clone)]
pub struct ScrollModeProvider {
    inner: Arc<Mutex<ScrollModeCoordinator>>,
}

impl ScrollModeProvider {
    /// Create the provider for a page
    pub fn new(tuning: &ScrollTuning) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ScrollModeCoordinator::new(
                tuning.near_top_threshold,
            ))),
        }
    }

    /// Current snapshot
    pub fn state(&self) -> ScrollModeState {
        self.inner.lock().state()
    }

    pub fn mode(&self) -> ScrollMode {
        self.inner.lock().state().mode
    }

    pub fn set_mode(&self, next: ScrollMode) {
        self.inner.lock().set_mode(next);
    }

    pub fn register_scroll_element(&self, element: Option<ScrollElementId>) {
        self.inner.lock().register_scroll_element(element);
    }

    /// Feed a scroll event; returns true when a frame must be scheduled
    pub fn handle_scroll(&self, sample: ScrollSample) -> bool {
        self.inner.lock().handle_scroll(sample)
    }

    /// Commit the pending sample, if any; call once per animation frame
    pub fn on_animation_frame(&self) -> bool {
        self.inner.lock().on_animation_frame()
    }

    pub fn frame_requested(&self) -> bool {
        self.inner.lock().frame_requested()
    }

    /// Receive a snapshot on every committed change
    pub fn subscribe(&self) -> watch::Receiver<ScrollModeState> {
        self.inner.lock().subscribe()
    }
}

impl Default for ScrollModeProvider {
    fn default() -> Self {
        Self::new(&ScrollTuning::default())
    }
}
