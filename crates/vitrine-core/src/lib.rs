//! Vitrine Core - scroll coordination layer for storefront pages
//!
//! This crate provides the presentational state machines a page composes:
//! - Scroll mode store (continuous scroll vs. section slider, bottom nav)
//! - Section slider with debounced active-slide tracking and a one-time hint
//! - Responsive pagination (page numbers vs. incremental loading)
//! - Viewport metrics published as CSS custom properties
//!
//! Nothing here performs I/O beyond session storage for hint flags. Time is
//! always passed in, so every component can be driven frame by frame.

pub mod capabilities;
pub mod config;
pub mod constants;
pub mod error;
pub mod pagination;
pub mod paths;
pub mod scroll_mode;
pub mod slider;
pub mod storage;
pub mod timing;
pub mod viewport;

// Re-exports for convenience
pub use capabilities::Capabilities;
pub use config::VitrineConfig;
pub use error::{ConfigError, StorageError};
pub use pagination::{PageCounters, PaginationHandler, PaginationRequest, ResponsivePagination};
pub use scroll_mode::{ScrollDirection, ScrollElementId, ScrollMode, ScrollModeProvider, ScrollSample};
pub use slider::{Orientation, SectionSlider, SliderConfig, SliderLayout};
pub use storage::{FileSessionStorage, MemorySessionStorage, SessionStorage, UnavailableStorage};
pub use viewport::{RootStyle, ViewportMetrics, ViewportTracker};
