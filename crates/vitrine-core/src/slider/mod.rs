//! Section Slider - swipeable panels with active-slide tracking
//!
//! A slider owns its panels, its scroll container geometry, an intersection
//! observer, a debounced active index and the swipe hint. While a slider is
//! alive the page's scroll mode is `Reel`; dropping it puts the mode back.

mod hint;
mod motion;
mod observer;

use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use crate::capabilities::Capabilities;
use crate::config::SliderTuning;
use crate::scroll_mode::{ScrollMode, ScrollModeProvider};
use crate::storage::SessionStorage;
use crate::timing::Debouncer;

pub use hint::{hint_storage_key, SwipeHint};
pub use motion::SmoothScroll;
pub use observer::{intersection_ratio, IntersectionEntry, IntersectionObserver};

/// Scroll axis of a slider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

/// Per-instance slider configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliderConfig {
    /// Stable identifier, used in the hint storage key
    pub slider_id: String,
    pub orientation: Orientation,
    pub show_hint: bool,
}

impl SliderConfig {
    pub fn new(slider_id: impl Into<String>) -> Self {
        Self {
            slider_id: slider_id.into(),
            orientation: Orientation::Horizontal,
            show_hint: true,
        }
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn show_hint(mut self, show_hint: bool) -> Self {
        self.show_hint = show_hint;
        self
    }
}

/// Measured container and slide sizes along the scroll axis
#[derive(Debug, Clone, PartialEq)]
pub struct SliderLayout {
    /// Visible extent of the scroll container
    pub viewport_extent: f64,
    /// Extent of each slide, in slide order
    pub slide_extents: Vec<f64>,
}

impl SliderLayout {
    /// Every slide fills the container exactly
    pub fn full_panels(viewport_extent: f64, slide_count: usize) -> Self {
        Self {
            viewport_extent,
            slide_extents: vec![viewport_extent; slide_count],
        }
    }
}

/// Mounted scroll container
#[derive(Debug, Clone)]
struct Container {
    layout: SliderLayout,
    slide_offsets: Vec<f64>,
    scroll_offset: f64,
}

impl Container {
    fn new(layout: SliderLayout) -> Self {
        let slide_offsets = layout
            .slide_extents
            .iter()
            .scan(0.0, |acc, extent| {
                let start = *acc;
                *acc += extent;
                Some(start)
            })
            .collect();
        Self {
            layout,
            slide_offsets,
            scroll_offset: 0.0,
        }
    }

    fn max_scroll(&self) -> f64 {
        let content: f64 = self.layout.slide_extents.iter().sum();
        (content - self.layout.viewport_extent).max(0.0)
    }

    fn clamp(&self, offset: f64) -> f64 {
        offset.clamp(0.0, self.max_scroll())
    }

    /// Slide whose start is closest to the current offset
    fn nearest_slide(&self) -> usize {
        self.slide_offsets
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                (*a - self.scroll_offset)
                    .abs()
                    .total_cmp(&(*b - self.scroll_offset).abs())
            })
            .map(|(i, _)| i)
            .unwrap_or(0)
    }
}

/// What a renderer needs to draw the slider chrome
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderSnapshot {
    pub current_slide_index: usize,
    pub slide_count: usize,
    pub hint_visible: bool,
    pub orientation: Orientation,
    pub scroll_offset: f64,
    /// False when the environment has no intersection observer
    pub tracking_enabled: bool,
}

/// A mounted section slider
pub struct SectionSlider<T> {
    config: SliderConfig,
    slides: Vec<T>,
    scroll_mode: ScrollModeProvider,
    mode_before_mount: ScrollMode,
    container: Option<Container>,
    observer: Option<IntersectionObserver>,
    index_updates: Debouncer<usize>,
    current_slide_index: usize,
    hint: SwipeHint,
    motion: Option<SmoothScroll>,
    tuning: SliderTuning,
}

impl<T> SectionSlider<T> {
    /// Mount a slider on a page
    ///
    /// Forces the page into `Reel` mode and decides whether the hint shows.
    pub fn mount(
        config: SliderConfig,
        slides: Vec<T>,
        scroll_mode: &ScrollModeProvider,
        storage: Arc<dyn SessionStorage>,
        capabilities: Capabilities,
        tuning: &SliderTuning,
        now: Instant,
    ) -> Self {
        let mode_before_mount = scroll_mode.mode();
        let hint = SwipeHint::on_mount(
            hint_storage_key(mode_before_mount, &config.slider_id),
            storage,
            config.show_hint,
            tuning.hint_timeout(),
            now,
        );
        scroll_mode.set_mode(ScrollMode::Reel);

        let observer = if capabilities.intersection_observer {
            Some(IntersectionObserver::new(tuning.active_ratio, slides.len()))
        } else {
            debug!(slider = %config.slider_id, "No intersection observer, slide tracking disabled");
            None
        };

        debug!(
            slider = %config.slider_id,
            slides = slides.len(),
            hint = hint.is_visible(),
            "Slider mounted"
        );

        Self {
            config,
            slides,
            scroll_mode: scroll_mode.clone(),
            mode_before_mount,
            container: None,
            observer,
            index_updates: Debouncer::new(tuning.debounce()),
            current_slide_index: 0,
            hint,
            motion: None,
            tuning: tuning.clone(),
        }
    }

    pub fn config(&self) -> &SliderConfig {
        &self.config
    }

    pub fn slides(&self) -> &[T] {
        &self.slides
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn current_slide_index(&self) -> usize {
        self.current_slide_index
    }

    pub fn hint_visible(&self) -> bool {
        self.hint.is_visible()
    }

    pub fn is_mounted(&self) -> bool {
        self.container.is_some()
    }

    pub fn is_animating(&self) -> bool {
        self.motion.is_some()
    }

    pub fn scroll_offset(&self) -> f64 {
        self.container.as_ref().map_or(0.0, |c| c.scroll_offset)
    }

    /// Offset of a slide along the axis, if it is rendered
    pub fn slide_offset(&self, index: usize) -> Option<f64> {
        let container = self.container.as_ref()?;
        container
            .slide_offsets
            .get(index)
            .map(|offset| container.clamp(*offset))
    }

    pub fn snapshot(&self) -> SliderSnapshot {
        SliderSnapshot {
            current_slide_index: self.current_slide_index,
            slide_count: self.slides.len(),
            hint_visible: self.hint.is_visible(),
            orientation: self.config.orientation,
            scroll_offset: self.scroll_offset(),
            tracking_enabled: self.observer.is_some(),
        }
    }

    /// The scroll container has been laid out
    ///
    /// Slides beyond the number of panels are ignored.
    pub fn attach_container(&mut self, mut layout: SliderLayout, now: Instant) {
        layout.slide_extents.truncate(self.slides.len());
        let mut container = Container::new(layout);
        if let Some(previous) = &self.container {
            container.scroll_offset = container.clamp(previous.scroll_offset);
        }
        self.container = Some(container);
        if let Some(observer) = &mut self.observer {
            observer.disconnect();
        }
        self.observe(now);
    }

    /// The scroll container went away; pending work is dropped
    pub fn detach_container(&mut self) {
        self.container = None;
        self.motion = None;
        self.index_updates.cancel();
        if let Some(observer) = &mut self.observer {
            observer.disconnect();
        }
    }

    /// The user scrolled the container
    ///
    /// Cancels any programmatic scroll in progress.
    pub fn set_scroll_offset(&mut self, offset: f64, now: Instant) {
        let Some(container) = &mut self.container else {
            return;
        };
        self.motion = None;
        container.scroll_offset = container.clamp(offset);
        self.observe(now);
    }

    /// Smooth-scroll to a slide
    ///
    /// No-op (returns false) before the container mounts or for an index with
    /// no rendered slide.
    pub fn scroll_to_slide(&mut self, index: usize, now: Instant) -> bool {
        let Some(target) = self.slide_offset(index) else {
            return false;
        };
        let from = self.scroll_offset();
        debug!(slider = %self.config.slider_id, index, "Scrolling to slide");
        self.motion = Some(SmoothScroll::new(
            from,
            target,
            now,
            self.tuning.smooth_scroll(),
        ));
        true
    }

    pub fn next_slide(&mut self, now: Instant) -> bool {
        let index = self.anchor_index() + 1;
        self.scroll_to_slide(index, now)
    }

    pub fn previous_slide(&mut self, now: Instant) -> bool {
        match self.anchor_index().checked_sub(1) {
            Some(index) => self.scroll_to_slide(index, now),
            None => false,
        }
    }

    /// User closed the hint
    pub fn dismiss_hint(&mut self) {
        self.hint.dismiss();
    }

    /// Advance animation and timers; call once per frame
    ///
    /// Returns true if anything visible changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;

        if let (Some(motion), Some(container)) = (self.motion, &mut self.container) {
            container.scroll_offset = container.clamp(motion.offset_at(now));
            if motion.is_finished(now) {
                self.motion = None;
            }
            self.observe(now);
            changed = true;
        }

        if let Some(index) = self.index_updates.poll(now) {
            if index != self.current_slide_index {
                debug!(slider = %self.config.slider_id, index, "Active slide changed");
                self.current_slide_index = index;
                changed = true;
            }
        }

        if self.hint.tick(now) {
            changed = true;
        }

        changed
    }

    /// Run the observer and queue the last slide that became active
    fn observe(&mut self, now: Instant) {
        let (Some(observer), Some(container)) = (&mut self.observer, &self.container) else {
            return;
        };
        let entries = observer.observe(
            container.scroll_offset,
            container.layout.viewport_extent,
            &container.slide_offsets,
            &container.layout.slide_extents,
        );
        if let Some(entry) = entries.iter().rev().find(|e| e.is_active) {
            self.index_updates.schedule(entry.index, now);
        }
    }

    /// Slide navigation starts from
    fn anchor_index(&self) -> usize {
        match (&self.observer, &self.container) {
            (None, Some(container)) => container.nearest_slide(),
            _ => self.current_slide_index,
        }
    }
}

impl<T> Drop for SectionSlider<T> {
    fn drop(&mut self) {
        debug!(
            slider = %self.config.slider_id,
            restore = %self.mode_before_mount,
            "Slider unmounted"
        );
        self.scroll_mode.set_mode(self.mode_before_mount);
    }
}
