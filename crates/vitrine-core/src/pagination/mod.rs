//! Responsive Pagination - numbered pages on desktop, incremental loading on mobile
//!
//! The adapter never fetches anything. It tells its [`PaginationHandler`] that
//! the user picked a page or that more items are needed, and learns about the
//! result through [`ResponsivePagination::update_counters`].

mod controls;

use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::config::PaginationTuning;
use crate::constants::pagination::NO_MORE_RESULTS;
use crate::timing::Deadline;

pub use controls::{page_controls, PageControl};

/// Paging counters owned by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageCounters {
    /// Zero-based current page
    pub current_page: usize,
    pub total_pages: usize,
    /// Items loaded so far
    pub size: usize,
    /// Items available in total
    pub total_elements: usize,
}

impl PageCounters {
    pub fn has_more(&self) -> bool {
        self.size < self.total_elements
    }
}

/// Receives navigation and load-more requests
pub trait PaginationHandler {
    /// Desktop navigation to a zero-based page
    fn on_page_change(&mut self, page: usize);

    /// Mobile request to grow the loaded list to `new_size` items
    fn on_mobile_page_change(&mut self, new_size: usize);
}

/// Request forwarded over a channel by the channel-backed handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationRequest {
    Page(usize),
    LoadMore { size: usize },
}

impl PaginationHandler for mpsc::UnboundedSender<PaginationRequest> {
    fn on_page_change(&mut self, page: usize) {
        if self.send(PaginationRequest::Page(page)).is_err() {
            debug!(page, "Pagination receiver gone, dropping page change");
        }
    }

    fn on_mobile_page_change(&mut self, new_size: usize) {
        if self.send(PaginationRequest::LoadMore { size: new_size }).is_err() {
            debug!(new_size, "Pagination receiver gone, dropping load more");
        }
    }
}

/// State of the mobile "load more" sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentinelStatus {
    Idle,
    Loading,
    NoMoreResults,
}

impl SentinelStatus {
    /// Copy displayed by the sentinel, if any
    pub fn message(&self) -> Option<&'static str> {
        match self {
            SentinelStatus::NoMoreResults => Some(NO_MORE_RESULTS),
            _ => None,
        }
    }
}

/// What to render below the list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaginationView {
    Desktop(Vec<PageControl>),
    Mobile(SentinelStatus),
}

/// Viewport-aware pagination adapter
pub struct ResponsivePagination<H> {
    handler: H,
    counters: PageCounters,
    is_mobile: bool,
    load_more_in_flight: bool,
    stale_guard: Option<Deadline>,
    tuning: PaginationTuning,
}

impl<H: PaginationHandler> ResponsivePagination<H> {
    pub fn new(
        handler: H,
        counters: PageCounters,
        viewport_width: f64,
        tuning: &PaginationTuning,
    ) -> Self {
        Self {
            handler,
            counters,
            is_mobile: viewport_width < tuning.mobile_breakpoint,
            load_more_in_flight: false,
            stale_guard: None,
            tuning: tuning.clone(),
        }
    }

    pub fn counters(&self) -> PageCounters {
        self.counters
    }

    pub fn is_mobile(&self) -> bool {
        self.is_mobile
    }

    pub fn load_more_in_flight(&self) -> bool {
        self.load_more_in_flight
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Re-classify the viewport; returns true if the layout flipped
    pub fn handle_resize(&mut self, viewport_width: f64) -> bool {
        let is_mobile = viewport_width < self.tuning.mobile_breakpoint;
        if is_mobile == self.is_mobile {
            return false;
        }
        debug!(viewport_width, is_mobile, "Pagination layout changed");
        self.is_mobile = is_mobile;
        true
    }

    /// Caller's counters changed
    ///
    /// Any change of `size` releases the in-flight guard, whichever request
    /// produced it.
    pub fn update_counters(&mut self, counters: PageCounters) {
        if counters.size != self.counters.size {
            self.release_guard();
        }
        self.counters = counters;
    }

    /// The mobile sentinel came into view
    ///
    /// Returns true if a load-more request was issued.
    pub fn sentinel_visible(&mut self, now: Instant) -> bool {
        if !self.is_mobile || self.load_more_in_flight || !self.counters.has_more() {
            return false;
        }

        let new_size = self.counters.size + self.tuning.page_increment;
        debug!(size = self.counters.size, new_size, "Requesting more items");
        self.load_more_in_flight = true;
        self.stale_guard = Some(Deadline::after(now, self.tuning.stale_guard()));
        self.handler.on_mobile_page_change(new_size);
        true
    }

    /// Restart incremental loading from the first increment
    ///
    /// Used when the list is rebuilt, e.g. after switching to the mobile
    /// layout. The request goes out under the in-flight guard, so the sentinel
    /// cannot add a second one before the response lands. Returns false on
    /// desktop.
    pub fn reset_incremental(&mut self, now: Instant) -> bool {
        if !self.is_mobile {
            return false;
        }

        let new_size = self.tuning.page_increment;
        debug!(new_size, "Restarting incremental loading");
        self.counters.current_page = 0;
        self.counters.size = 0;
        self.load_more_in_flight = true;
        self.stale_guard = Some(Deadline::after(now, self.tuning.stale_guard()));
        self.handler.on_mobile_page_change(new_size);
        true
    }

    /// Scroll-position fallback for environments without intersection observation
    pub fn on_scroll_position(
        &mut self,
        scroll_offset: f64,
        viewport_extent: f64,
        content_extent: f64,
        now: Instant,
    ) -> bool {
        if is_near_bottom(scroll_offset, viewport_extent, content_extent) {
            self.sentinel_visible(now)
        } else {
            false
        }
    }

    /// Navigate to a zero-based page
    ///
    /// Out-of-range pages and the current page are ignored.
    pub fn go_to_page(&mut self, page: usize) -> bool {
        if page >= self.counters.total_pages || page == self.counters.current_page {
            return false;
        }
        self.handler.on_page_change(page);
        true
    }

    pub fn previous_page(&mut self) -> bool {
        match self.counters.current_page.checked_sub(1) {
            Some(page) => self.go_to_page(page),
            None => false,
        }
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.counters.current_page + 1)
    }

    /// Release a guard whose response never arrived
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.stale_guard {
            Some(deadline) if deadline.is_due(now) => {
                warn!(size = self.counters.size, "Load more timed out, releasing guard");
                self.release_guard();
                true
            }
            _ => false,
        }
    }

    pub fn sentinel_status(&self) -> SentinelStatus {
        if !self.counters.has_more() {
            SentinelStatus::NoMoreResults
        } else if self.load_more_in_flight {
            SentinelStatus::Loading
        } else {
            SentinelStatus::Idle
        }
    }

    pub fn view(&self) -> PaginationView {
        if self.is_mobile {
            PaginationView::Mobile(self.sentinel_status())
        } else {
            PaginationView::Desktop(page_controls(
                self.counters.current_page,
                self.counters.total_pages,
                self.tuning.max_page_buttons,
            ))
        }
    }

    fn release_guard(&mut self) {
        self.load_more_in_flight = false;
        self.stale_guard = None;
    }
}

/// Within one viewport of the end of the content
pub fn is_near_bottom(scroll_offset: f64, viewport_extent: f64, content_extent: f64) -> bool {
    scroll_offset + viewport_extent * 2.0 >= content_extent
}
