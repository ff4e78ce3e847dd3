//! Layer configuration
//!
//! Loaded from `~/.vitrine/config.toml`. Every field is optional and falls back
//! to the values in [`crate::constants`].

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants;
use crate::error::ConfigError;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VitrineConfig {
    pub scroll: ScrollTuning,
    pub slider: SliderTuning,
    pub pagination: PaginationTuning,
}

/// ScrollMode coordinator tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollTuning {
    /// Offsets below this (px) keep the bottom nav visible
    pub near_top_threshold: f64,
    /// Frame interval used by drivers that simulate animation frames
    pub frame_interval_ms: u64,
}

impl Default for ScrollTuning {
    fn default() -> Self {
        Self {
            near_top_threshold: constants::scroll::NEAR_TOP_THRESHOLD,
            frame_interval_ms: constants::scroll::FRAME_INTERVAL.as_millis() as u64,
        }
    }
}

impl ScrollTuning {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

/// Section slider tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliderTuning {
    /// Intersection ratio that makes a slide active
    pub active_ratio: f64,
    pub debounce_ms: u64,
    pub hint_timeout_ms: u64,
    pub smooth_scroll_ms: u64,
}

impl Default for SliderTuning {
    fn default() -> Self {
        Self {
            active_ratio: constants::slider::ACTIVE_RATIO,
            debounce_ms: constants::slider::INDEX_DEBOUNCE.as_millis() as u64,
            hint_timeout_ms: constants::slider::HINT_TIMEOUT.as_millis() as u64,
            smooth_scroll_ms: constants::slider::SMOOTH_SCROLL_DURATION.as_millis() as u64,
        }
    }
}

impl SliderTuning {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn hint_timeout(&self) -> Duration {
        Duration::from_millis(self.hint_timeout_ms)
    }

    pub fn smooth_scroll(&self) -> Duration {
        Duration::from_millis(self.smooth_scroll_ms)
    }
}

/// Responsive pagination tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationTuning {
    /// Viewports narrower than this (px) are mobile
    pub mobile_breakpoint: f64,
    /// Items requested per incremental load
    pub page_increment: usize,
    pub stale_guard_ms: u64,
    pub max_page_buttons: usize,
}

impl Default for PaginationTuning {
    fn default() -> Self {
        Self {
            mobile_breakpoint: constants::pagination::MOBILE_BREAKPOINT,
            page_increment: constants::pagination::PAGE_INCREMENT,
            stale_guard_ms: constants::pagination::STALE_GUARD_TIMEOUT.as_millis() as u64,
            max_page_buttons: constants::pagination::MAX_PAGE_BUTTONS,
        }
    }
}

impl PaginationTuning {
    pub fn stale_guard(&self) -> Duration {
        Duration::from_millis(self.stale_guard_ms)
    }
}

impl VitrineConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&raw)?;
        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Load from the default location
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load(&crate::paths::config_file())
    }

    /// Reject values the coordinators cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.slider.active_ratio > 0.0 && self.slider.active_ratio <= 1.0) {
            return Err(ConfigError::InvalidValue {
                field: "slider.active_ratio",
                reason: format!("{} is outside (0, 1]", self.slider.active_ratio),
            });
        }
        if self.scroll.near_top_threshold.is_nan() || self.scroll.near_top_threshold < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "scroll.near_top_threshold",
                reason: "must not be negative".to_string(),
            });
        }
        if self.scroll.frame_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scroll.frame_interval_ms",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.pagination.page_increment == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pagination.page_increment",
                reason: "must be at least 1".to_string(),
            });
        }
        let breakpoint = self.pagination.mobile_breakpoint;
        if !breakpoint.is_finite() || breakpoint <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "pagination.mobile_breakpoint",
                reason: format!("{breakpoint} is not a positive width"),
            });
        }
        if self.pagination.max_page_buttons < 5 {
            return Err(ConfigError::InvalidValue {
                field: "pagination.max_page_buttons",
                reason: "must be at least 5".to_string(),
            });
        }
        Ok(())
    }
}
