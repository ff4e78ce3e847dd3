//! Scroll mode state machine
//!
//! Direction tracking is throttled to animation frames: `handle_scroll` only
//! records the latest sample and asks for a frame, `on_animation_frame` commits.

use tokio::sync::watch;
use tracing::debug;

use super::{ScrollDirection, ScrollElementId, ScrollMode, ScrollModeState, ScrollSample};

/// Owns the scroll mode state for one page
pub struct ScrollModeCoordinator {
    state: ScrollModeState,
    /// Offset of the last committed sample
    last_offset: f64,
    /// Latest sample received since the last frame
    pending: Option<ScrollSample>,
    frame_requested: bool,
    near_top_threshold: f64,
    tx: watch::Sender<ScrollModeState>,
}

impl ScrollModeCoordinator {
    pub fn new(near_top_threshold: f64) -> Self {
        let state = ScrollModeState::default();
        let (tx, _) = watch::channel(state);
        Self {
            state,
            last_offset: 0.0,
            pending: None,
            frame_requested: false,
            near_top_threshold,
            tx,
        }
    }

    pub fn state(&self) -> ScrollModeState {
        self.state
    }

    pub fn subscribe(&self) -> watch::Receiver<ScrollModeState> {
        self.tx.subscribe()
    }

    pub fn frame_requested(&self) -> bool {
        self.frame_requested
    }

    /// Switch navigation mode
    ///
    /// Entering `Reel` always shows the bottom nav.
    pub fn set_mode(&mut self, next: ScrollMode) {
        if self.state.mode != next {
            debug!(from = %self.state.mode, to = %next, "Scroll mode changed");
        }
        self.state.mode = next;
        if next == ScrollMode::Reel {
            self.state.bottom_nav_visible = true;
        }
        self.publish();
    }

    /// Point direction tracking at a container, or stop tracking with `None`
    ///
    /// Replacing a registration starts tracking from a fresh baseline. Detaching
    /// listeners from the old container is the caller's job.
    pub fn register_scroll_element(&mut self, element: Option<ScrollElementId>) {
        if self.state.registered_scroll_element == element {
            return;
        }
        self.state.registered_scroll_element = element;
        self.last_offset = 0.0;
        self.pending = None;
        self.frame_requested = false;
        self.publish();
    }

    /// Record a scroll event
    ///
    /// Returns true when this sample requested a new frame. Samples from
    /// anything but the registered container are ignored.
    pub fn handle_scroll(&mut self, sample: ScrollSample) -> bool {
        if self.state.registered_scroll_element != Some(sample.source) {
            return false;
        }

        self.pending = Some(sample);
        if self.frame_requested {
            return false;
        }
        self.frame_requested = true;
        true
    }

    /// Commit the latest pending sample
    ///
    /// Returns true if state was committed this frame.
    pub fn on_animation_frame(&mut self) -> bool {
        self.frame_requested = false;
        let Some(sample) = self.pending.take() else {
            return false;
        };

        let direction = classify_direction(self.last_offset, sample.offset);
        self.state.scroll_direction = direction;
        self.state.bottom_nav_visible =
            bottom_nav_visible(direction, sample.offset, self.near_top_threshold);
        self.last_offset = sample.offset;
        self.publish();
        true
    }

    fn publish(&self) {
        self.tx.send_replace(self.state);
    }
}

/// `Up` only when the offset decreased
pub fn classify_direction(last_offset: f64, offset: f64) -> ScrollDirection {
    if offset < last_offset {
        ScrollDirection::Up
    } else {
        ScrollDirection::Down
    }
}

/// Nav shows while scrolling up or while effectively at the top
pub fn bottom_nav_visible(direction: ScrollDirection, offset: f64, threshold: f64) -> bool {
    direction == ScrollDirection::Up || offset < threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    const CONTAINER: ScrollElementId = ScrollElementId(7);

    fn coordinator() -> ScrollModeCoordinator {
        let mut c = ScrollModeCoordinator::new(10.0);
        c.register_scroll_element(Some(CONTAINER));
        c
    }

    fn scroll_to(c: &mut ScrollModeCoordinator, offset: f64) {
        c.handle_scroll(ScrollSample::new(CONTAINER, offset, Instant::now()));
        c.on_animation_frame();
    }

    #[test]
    fn test_last_set_mode_wins() {
        let mut c = coordinator();
        let sequence = [
            ScrollMode::Reel,
            ScrollMode::Scroll,
            ScrollMode::Scroll,
            ScrollMode::Reel,
        ];
        for mode in sequence {
            c.set_mode(mode);
        }
        assert_eq!(c.state().mode, ScrollMode::Reel);
        assert!(c.state().bottom_nav_visible);

        c.set_mode(ScrollMode::Scroll);
        assert_eq!(c.state().mode, ScrollMode::Scroll);
    }

    #[test]
    fn test_reel_forces_nav_visible() {
        let mut c = coordinator();
        scroll_to(&mut c, 400.0);
        assert!(!c.state().bottom_nav_visible);

        c.set_mode(ScrollMode::Reel);
        assert!(c.state().bottom_nav_visible);
    }

    #[test]
    fn test_scrolling_down_hides_nav_and_top_shows_it() {
        let mut c = coordinator();

        scroll_to(&mut c, 120.0);
        assert_eq!(c.state().scroll_direction, ScrollDirection::Down);
        assert!(!c.state().bottom_nav_visible);

        scroll_to(&mut c, 5.0);
        assert_eq!(c.state().scroll_direction, ScrollDirection::Up);
        assert!(c.state().bottom_nav_visible);
    }

    #[test]
    fn test_scrolling_down_near_top_keeps_nav() {
        let mut c = coordinator();
        scroll_to(&mut c, 4.0);
        assert_eq!(c.state().scroll_direction, ScrollDirection::Down);
        assert!(c.state().bottom_nav_visible);
    }

    #[test]
    fn test_scrolling_up_mid_page_shows_nav() {
        let mut c = coordinator();
        scroll_to(&mut c, 800.0);
        assert!(!c.state().bottom_nav_visible);
        scroll_to(&mut c, 780.0);
        assert!(c.state().bottom_nav_visible);
    }

    #[test]
    fn test_one_commit_per_frame() {
        let mut c = coordinator();
        let mut rx = c.subscribe();
        rx.borrow_and_update();
        let start = Instant::now();

        assert!(c.handle_scroll(ScrollSample::new(CONTAINER, 50.0, start)));
        for step in 1..20 {
            let sample = ScrollSample::new(
                CONTAINER,
                50.0 + step as f64 * 10.0,
                start + Duration::from_millis(step),
            );
            assert!(!c.handle_scroll(sample));
        }
        assert!(!rx.has_changed().unwrap());
        assert_eq!(c.state().scroll_direction, ScrollDirection::Down);

        assert!(c.on_animation_frame());
        assert!(rx.has_changed().unwrap());
        rx.borrow_and_update();

        // Nothing pending: the next frame commits nothing
        assert!(!c.on_animation_frame());
        assert!(!rx.has_changed().unwrap());

        // Latest sample of the burst is the one committed
        scroll_to(&mut c, 235.0);
        assert_eq!(c.state().scroll_direction, ScrollDirection::Up);
    }

    #[test]
    fn test_unregistered_samples_ignored() {
        let mut c = ScrollModeCoordinator::new(10.0);
        assert!(!c.handle_scroll(ScrollSample::new(CONTAINER, 300.0, Instant::now())));
        assert!(!c.on_animation_frame());
        assert!(c.state().bottom_nav_visible);

        c.register_scroll_element(Some(CONTAINER));
        let other = ScrollElementId(8);
        assert!(!c.handle_scroll(ScrollSample::new(other, 300.0, Instant::now())));
    }

    #[test]
    fn test_clearing_registration_stops_tracking() {
        let mut c = coordinator();
        c.handle_scroll(ScrollSample::new(CONTAINER, 300.0, Instant::now()));
        c.register_scroll_element(None);

        assert!(!c.on_animation_frame());
        assert_eq!(c.state().registered_scroll_element, None);
        assert!(!c.handle_scroll(ScrollSample::new(CONTAINER, 600.0, Instant::now())));
    }

    #[test]
    fn test_replacing_registration() {
        let mut c = coordinator();
        scroll_to(&mut c, 500.0);

        let next = ScrollElementId(9);
        c.register_scroll_element(Some(next));
        assert_eq!(c.state().registered_scroll_element, Some(next));

        // Fresh baseline: 200 on the new container reads as downward
        c.handle_scroll(ScrollSample::new(next, 200.0, Instant::now()));
        c.on_animation_frame();
        assert_eq!(c.state().scroll_direction, ScrollDirection::Down);
    }
}
