//! Viewport measurements and CSS custom properties
//!
//! Mobile browsers resize the visible area as the address bar collapses and the
//! on-screen keyboard opens. The tracker turns raw measurements into a width
//! class, a `--vh` unit, an address bar estimate and a keyboard height, and
//! publishes them as custom properties for layout code elsewhere.

use std::collections::BTreeMap;

use tracing::debug;

use crate::capabilities::Capabilities;
use crate::constants::viewport::KEYBOARD_HEIGHT_RATIO;

/// Custom property names written to the root element
pub const VH_PROPERTY: &str = "--vh";
pub const ADDRESS_BAR_PROPERTY: &str = "--address-bar-height";
pub const KEYBOARD_PROPERTY: &str = "--keyboard-height";

/// Width class used by responsive components
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportClass {
    Mobile,
    Desktop,
}

impl ViewportClass {
    pub fn classify(width: f64, mobile_breakpoint: f64) -> Self {
        if width < mobile_breakpoint {
            ViewportClass::Mobile
        } else {
            ViewportClass::Desktop
        }
    }
}

/// Raw measurements from one resize event (px)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportMetrics {
    /// Layout viewport width
    pub width: f64,
    /// Layout viewport height
    pub height: f64,
    /// Full screen height, when known
    pub screen_height: Option<f64>,
    /// Visual viewport height, when the platform has one
    pub visual_height: Option<f64>,
}

impl ViewportMetrics {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// One hundredth of the layout height
    pub fn vh_unit(&self) -> f64 {
        self.height / 100.0
    }

    /// Screen height not available to the layout viewport
    pub fn address_bar_height(&self) -> f64 {
        self.screen_height
            .map_or(0.0, |screen| (screen - self.height).max(0.0))
    }

    /// Height taken by an on-screen keyboard, if one seems to be open
    pub fn keyboard_height(&self) -> Option<f64> {
        let visual = self.visual_height?;
        if visual < self.height * KEYBOARD_HEIGHT_RATIO {
            Some(self.height - visual)
        } else {
            None
        }
    }
}

/// Destination for published custom properties
pub trait CssVariableSink {
    fn set_property(&mut self, name: &str, value: &str);
}

/// In-memory root element style
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootStyle {
    properties: BTreeMap<String, String>,
}

impl RootStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl CssVariableSink for RootStyle {
    fn set_property(&mut self, name: &str, value: &str) {
        self.properties.insert(name.to_string(), value.to_string());
    }
}

/// What changed on the latest measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewportChange {
    pub class_changed: bool,
    pub keyboard_changed: bool,
}

/// Follows resize events and republishes custom properties
#[derive(Debug, Clone)]
pub struct ViewportTracker {
    metrics: ViewportMetrics,
    class: ViewportClass,
    keyboard_open: bool,
    capabilities: Capabilities,
    mobile_breakpoint: f64,
}

impl ViewportTracker {
    pub fn new(
        metrics: ViewportMetrics,
        capabilities: Capabilities,
        mobile_breakpoint: f64,
        sink: &mut impl CssVariableSink,
    ) -> Self {
        let metrics = Self::sanitize(metrics, capabilities);
        let tracker = Self {
            class: ViewportClass::classify(metrics.width, mobile_breakpoint),
            keyboard_open: metrics.keyboard_height().is_some(),
            metrics,
            capabilities,
            mobile_breakpoint,
        };
        tracker.publish(sink);
        tracker
    }

    pub fn metrics(&self) -> ViewportMetrics {
        self.metrics
    }

    pub fn class(&self) -> ViewportClass {
        self.class
    }

    pub fn is_mobile(&self) -> bool {
        self.class == ViewportClass::Mobile
    }

    pub fn keyboard_open(&self) -> bool {
        self.keyboard_open
    }

    /// Apply a resize event
    pub fn update(
        &mut self,
        metrics: ViewportMetrics,
        sink: &mut impl CssVariableSink,
    ) -> ViewportChange {
        let metrics = Self::sanitize(metrics, self.capabilities);
        let class = ViewportClass::classify(metrics.width, self.mobile_breakpoint);
        let keyboard_open = metrics.keyboard_height().is_some();
        let change = ViewportChange {
            class_changed: class != self.class,
            keyboard_changed: keyboard_open != self.keyboard_open,
        };
        if change.class_changed || change.keyboard_changed {
            debug!(?class, keyboard_open, "Viewport changed");
        }

        self.metrics = metrics;
        self.class = class;
        self.keyboard_open = keyboard_open;
        self.publish(sink);
        change
    }

    /// Write current measurements as custom properties
    pub fn publish(&self, sink: &mut impl CssVariableSink) {
        sink.set_property(VH_PROPERTY, &px(self.metrics.vh_unit()));
        sink.set_property(ADDRESS_BAR_PROPERTY, &px(self.metrics.address_bar_height()));
        sink.set_property(
            KEYBOARD_PROPERTY,
            &px(self.metrics.keyboard_height().unwrap_or(0.0)),
        );
    }

    /// Drop measurements the platform cannot actually provide
    fn sanitize(mut metrics: ViewportMetrics, capabilities: Capabilities) -> ViewportMetrics {
        if !capabilities.visual_viewport {
            metrics.visual_height = None;
        }
        metrics
    }
}

fn px(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    format!("{rounded}px")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(ViewportClass::classify(375.0, 768.0), ViewportClass::Mobile);
        assert_eq!(ViewportClass::classify(768.0, 768.0), ViewportClass::Desktop);
    }

    #[test]
    fn test_publishes_properties() {
        let mut style = RootStyle::new();
        let metrics = ViewportMetrics {
            width: 390.0,
            height: 664.0,
            screen_height: Some(844.0),
            visual_height: Some(664.0),
        };
        let tracker = ViewportTracker::new(metrics, Capabilities::default(), 768.0, &mut style);

        assert!(tracker.is_mobile());
        assert!(!tracker.keyboard_open());
        assert_eq!(style.get(VH_PROPERTY), Some("6.64px"));
        assert_eq!(style.get(ADDRESS_BAR_PROPERTY), Some("180px"));
        assert_eq!(style.get(KEYBOARD_PROPERTY), Some("0px"));
    }

    #[test]
    fn test_keyboard_detection() {
        let mut style = RootStyle::new();
        let base = ViewportMetrics {
            visual_height: Some(700.0),
            ..ViewportMetrics::new(390.0, 700.0)
        };
        let mut tracker = ViewportTracker::new(base, Capabilities::default(), 768.0, &mut style);

        let change = tracker.update(
            ViewportMetrics {
                visual_height: Some(400.0),
                ..base
            },
            &mut style,
        );
        assert!(change.keyboard_changed);
        assert!(!change.class_changed);
        assert!(tracker.keyboard_open());
        assert_eq!(style.get(KEYBOARD_PROPERTY), Some("300px"));
    }

    #[test]
    fn test_without_visual_viewport() {
        let mut style = RootStyle::new();
        let metrics = ViewportMetrics {
            visual_height: Some(100.0),
            ..ViewportMetrics::new(390.0, 700.0)
        };
        let tracker = ViewportTracker::new(metrics, Capabilities::minimal(), 768.0, &mut style);
        assert!(!tracker.keyboard_open());
        assert_eq!(style.get(KEYBOARD_PROPERTY), Some("0px"));
        assert_eq!(style.get(ADDRESS_BAR_PROPERTY), Some("0px"));
    }

    #[test]
    fn test_class_change_on_resize() {
        let mut style = RootStyle::new();
        let mut tracker = ViewportTracker::new(
            ViewportMetrics::new(1280.0, 800.0),
            Capabilities::default(),
            768.0,
            &mut style,
        );
        let change = tracker.update(ViewportMetrics::new(600.0, 800.0), &mut style);
        assert!(change.class_changed);
        assert!(tracker.is_mobile());
        assert_eq!(style.get(VH_PROPERTY), Some("8px"));
    }
}
