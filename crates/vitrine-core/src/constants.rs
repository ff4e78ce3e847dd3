//! Layer constants and configuration defaults
//!
//! Centralized location for thresholds and timings shared by the coordinators

use std::time::Duration;

/// Scroll mode coordination
pub mod scroll {
    use super::*;

    /// Offsets below this many pixels count as "effectively at top"
    pub const NEAR_TOP_THRESHOLD: f64 = 10.0;

    /// Nominal animation frame interval (~60fps)
    pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);
}

/// Section slider / reel behavior
pub mod slider {
    use super::*;

    /// Intersection ratio a slide must exceed to become the active slide
    pub const ACTIVE_RATIO: f64 = 0.6;

    /// Debounce window for active index updates during fling scrolls
    pub const INDEX_DEBOUNCE: Duration = Duration::from_millis(50);

    /// How long the swipe hint stays up before dismissing itself
    pub const HINT_TIMEOUT: Duration = Duration::from_millis(3000);

    /// Duration of a programmatic smooth scroll between slides
    pub const SMOOTH_SCROLL_DURATION: Duration = Duration::from_millis(320);

    /// Prefix of the session storage key for hint dismissal flags
    pub const HINT_KEY_PREFIX: &str = "reelHintShown";
}

/// Responsive pagination
pub mod pagination {
    use super::*;

    /// Viewports narrower than this are treated as mobile
    pub const MOBILE_BREAKPOINT: f64 = 768.0;

    /// Items requested per incremental load
    pub const PAGE_INCREMENT: usize = 10;

    /// Release a load-more guard that never saw its size update
    pub const STALE_GUARD_TIMEOUT: Duration = Duration::from_secs(8);

    /// Maximum numbered buttons in the desktop control strip
    pub const MAX_PAGE_BUTTONS: usize = 7;

    /// Sentinel copy once everything is loaded
    pub const NO_MORE_RESULTS: &str = "No more results";
}

/// Viewport measurements
pub mod viewport {
    /// Visual viewport shrinking below this share of the layout height means a keyboard is up
    pub const KEYBOARD_HEIGHT_RATIO: f64 = 0.75;
}

/// Configuration paths
pub mod paths {
    /// Config directory name
    pub const CONFIG_DIR_NAME: &str = ".vitrine";

    /// Config file name inside the config directory
    pub const CONFIG_FILE_NAME: &str = "config.toml";

    /// Session storage subdirectory name
    pub const SESSIONS_DIR_NAME: &str = "sessions";

    /// Logs subdirectory name
    pub const LOGS_DIR_NAME: &str = "logs";
}
