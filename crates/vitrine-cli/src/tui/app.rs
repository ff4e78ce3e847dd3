//! Application state and event loop
//!
//! The page owns one scroll mode provider, the quick actions reel, the product
//! list and its pagination adapter. Terminal cells are mapped onto pixel
//! measurements so the core layer sees the same numbers a browser page would.

use std::io;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyCode, KeyEvent,
        KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use tokio::sync::mpsc;

use vitrine_core::pagination::PageControl;
use vitrine_core::{
    Capabilities, Orientation, PageCounters, PaginationHandler, PaginationRequest,
    ResponsivePagination, RootStyle, ScrollElementId, ScrollModeProvider, ScrollSample,
    SectionSlider, SessionStorage, SliderConfig, SliderLayout, ViewportMetrics, ViewportTracker,
    VitrineConfig,
};

use super::catalog::{self, Catalog, CatalogPage, Product};
use super::render;

/// Pixel size of one terminal cell
pub const CELL_WIDTH_PX: f64 = 8.0;
pub const CELL_HEIGHT_PX: f64 = 16.0;

/// Rows moved per wheel notch
const WHEEL_ROWS: usize = 3;

/// Pixels the reel moves per wheel notch
const REEL_WHEEL_PX: f64 = 48.0;

/// Width assumed before the first terminal size is known
const INITIAL_VIEWPORT_WIDTH: f64 = 1024.0;

/// Forced widths cycled with `m`
const MOBILE_WIDTH: f64 = 375.0;
const DESKTOP_WIDTH: f64 = 1280.0;

const LIST_ELEMENT: ScrollElementId = ScrollElementId(1);
const CATALOG_SIZE: usize = 64;
const REEL_ID: &str = "quickActions";

/// One panel of the quick actions reel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickAction {
    pub title: &'static str,
    pub subtitle: &'static str,
}

pub const QUICK_ACTIONS: [QuickAction; 3] = [
    QuickAction {
        title: "Book a repair",
        subtitle: "Same-day screen and battery service",
    },
    QuickAction {
        title: "Track an order",
        subtitle: "Live status for deliveries and pickups",
    },
    QuickAction {
        title: "Shop accessories",
        subtitle: "Chargers, cases and cables",
    },
];

/// Areas from the last render, for hit testing
#[derive(Debug, Default, Clone)]
pub struct LayoutState {
    pub reel_area: Option<Rect>,
    pub list_area: Option<Rect>,
    pub page_buttons: Vec<(Rect, PageControl)>,
}

/// Product list scroll position, in rows
#[derive(Debug, Default, Clone, Copy)]
pub struct ListScroll {
    pub offset: usize,
    pub viewport_rows: usize,
}

pub struct App {
    pub(crate) config: VitrineConfig,
    capabilities: Capabilities,
    storage: Arc<dyn SessionStorage>,
    pub(crate) scroll_mode: ScrollModeProvider,
    pub(crate) reel: Option<SectionSlider<QuickAction>>,
    pub(crate) pagination: ResponsivePagination<mpsc::UnboundedSender<PaginationRequest>>,
    /// Request side of the catalog, until `run` hands it to the feed task
    pub(crate) requests: Option<mpsc::UnboundedReceiver<PaginationRequest>>,
    responses: Option<mpsc::UnboundedReceiver<CatalogPage>>,
    pub(crate) items: Vec<Product>,
    pub(crate) list: ListScroll,
    pub(crate) layout: LayoutState,
    pub(crate) viewport: ViewportTracker,
    pub(crate) root_style: RootStyle,
    viewport_override: Option<f64>,
    terminal_size: Option<(u16, u16)>,
    reel_width: Option<u16>,
    needs_redraw: bool,
    should_quit: bool,
}

impl App {
    pub fn new(
        config: VitrineConfig,
        capabilities: Capabilities,
        storage: Arc<dyn SessionStorage>,
        viewport_override: Option<f64>,
    ) -> Self {
        let (tx, requests) = mpsc::unbounded_channel();
        let width = viewport_override.unwrap_or(INITIAL_VIEWPORT_WIDTH);

        let mut root_style = RootStyle::new();
        let viewport = ViewportTracker::new(
            ViewportMetrics::new(width, 0.0),
            capabilities,
            config.pagination.mobile_breakpoint,
            &mut root_style,
        );
        let pagination =
            ResponsivePagination::new(tx, PageCounters::default(), width, &config.pagination);

        let scroll_mode = ScrollModeProvider::new(&config.scroll);
        scroll_mode.register_scroll_element(Some(LIST_ELEMENT));

        let mut app = Self {
            config,
            capabilities,
            storage,
            scroll_mode,
            reel: None,
            pagination,
            requests: Some(requests),
            responses: None,
            items: Vec::new(),
            list: ListScroll::default(),
            layout: LayoutState::default(),
            viewport,
            root_style,
            viewport_override,
            terminal_size: None,
            reel_width: None,
            needs_redraw: true,
            should_quit: false,
        };
        app.mount_reel(Instant::now());
        app.pagination.handler_mut().on_page_change(0);
        app
    }

    /// Run the application
    pub async fn run(&mut self) -> Result<()> {
        if let Some(requests) = self.requests.take() {
            self.responses = Some(catalog::spawn(
                Catalog::new(CATALOG_SIZE),
                requests,
                catalog::DEFAULT_LATENCY,
            ));
        }

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal).await;

        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
        result
    }

    /// Main event loop
    async fn main_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let frame_interval = self.config.scroll.frame_interval();

        loop {
            let size = terminal.size()?;
            self.apply_terminal_size(size.width, size.height, Instant::now());

            if self.tick(Instant::now()) {
                self.needs_redraw = true;
            }

            if self.needs_redraw {
                let mut layout = LayoutState::default();
                terminal.draw(|f| layout = render::ui(f, self))?;
                self.layout = layout;
                self.sync_layout(Instant::now());
                self.needs_redraw = false;
            }

            tokio::select! {
                biased;

                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        let now = Instant::now();
                        match event {
                            Event::Key(key) => self.handle_key(key, now),
                            Event::Mouse(mouse) => self.handle_mouse(mouse, now),
                            // Resize is picked up from the terminal size next pass
                            _ => {}
                        }
                        self.needs_redraw = true;
                    }
                }
                _ = tokio::time::sleep(frame_interval) => {
                    // Next animation frame
                }
            }

            if self.should_quit {
                break;
            }
        }
        Ok(())
    }

    /// One animation frame: commit scroll state, advance timers, take responses
    ///
    /// Returns true if anything visible changed.
    pub(crate) fn tick(&mut self, now: Instant) -> bool {
        let mut changed = self.scroll_mode.on_animation_frame();

        if let Some(reel) = &mut self.reel {
            changed |= reel.tick(now);
        }
        changed |= self.pagination.tick(now);

        let mut arrived = Vec::new();
        if let Some(responses) = &mut self.responses {
            while let Ok(page) = responses.try_recv() {
                arrived.push(page);
            }
        }
        for page in arrived {
            self.apply_catalog_page(page, now);
            changed = true;
        }

        changed | self.check_sentinel(now)
    }

    /// A catalog response arrived
    pub(crate) fn apply_catalog_page(&mut self, page: CatalogPage, now: Instant) {
        let previous_page = self.pagination.counters().current_page;
        self.items = page.items;
        self.pagination.update_counters(page.counters);

        if !self.pagination.is_mobile() && page.counters.current_page != previous_page {
            self.set_list_offset(0, now);
        } else {
            let clamped = self.list.offset.min(self.max_list_offset());
            self.set_list_offset(clamped, now);
        }
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true
            }
            KeyCode::Char('r') => self.toggle_reel(now),
            KeyCode::Char('x') => {
                if let Some(reel) = &mut self.reel {
                    reel.dismiss_hint();
                }
            }
            KeyCode::Left | KeyCode::Char('h') => {
                if let Some(reel) = &mut self.reel {
                    reel.previous_slide(now);
                }
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if let Some(reel) = &mut self.reel {
                    reel.next_slide(now);
                }
            }
            KeyCode::Char(c @ '1'..='9') => {
                if let (Some(reel), Some(digit)) = (&mut self.reel, c.to_digit(10)) {
                    reel.scroll_to_slide(digit as usize - 1, now);
                }
            }
            KeyCode::Up | KeyCode::Char('k') => self.scroll_list_up(1, now),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_list_down(1, now),
            KeyCode::PageUp => self.scroll_list_up(self.list.viewport_rows.max(1), now),
            KeyCode::PageDown => self.scroll_list_down(self.list.viewport_rows.max(1), now),
            KeyCode::Home => self.set_list_offset(0, now),
            KeyCode::End => self.set_list_offset(self.max_list_offset(), now),
            KeyCode::Char('p') => {
                self.pagination.previous_page();
            }
            KeyCode::Char('n') => {
                self.pagination.next_page();
            }
            KeyCode::Char('m') => self.cycle_viewport_override(),
            _ => {}
        }
    }

    pub(crate) fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        let over = |area: Option<Rect>| {
            area.is_some_and(|a| {
                mouse.column >= a.x
                    && mouse.column < a.x + a.width
                    && mouse.row >= a.y
                    && mouse.row < a.y + a.height
            })
        };

        let over_reel = over(self.layout.reel_area);
        let over_list = over(self.layout.list_area);

        match mouse.kind {
            MouseEventKind::ScrollDown | MouseEventKind::ScrollRight if over_reel => {
                self.nudge_reel(REEL_WHEEL_PX, now)
            }
            MouseEventKind::ScrollUp | MouseEventKind::ScrollLeft if over_reel => {
                self.nudge_reel(-REEL_WHEEL_PX, now)
            }
            MouseEventKind::ScrollDown if over_list => self.scroll_list_down(WHEEL_ROWS, now),
            MouseEventKind::ScrollUp if over_list => self.scroll_list_up(WHEEL_ROWS, now),
            MouseEventKind::Down(MouseButton::Left) if over_reel => {
                if let Some(reel) = &mut self.reel {
                    reel.dismiss_hint();
                }
            }
            MouseEventKind::Down(MouseButton::Left) => {
                let clicked = self.layout.page_buttons.iter().find(|(rect, _)| {
                    mouse.column >= rect.x
                        && mouse.column < rect.x + rect.width
                        && mouse.row == rect.y
                });
                if let Some((_, control)) = clicked.copied() {
                    self.activate_page_control(control);
                }
            }
            _ => {}
        }
    }

    fn activate_page_control(&mut self, control: PageControl) {
        match control {
            PageControl::Previous { enabled: true } => {
                self.pagination.previous_page();
            }
            PageControl::Next { enabled: true } => {
                self.pagination.next_page();
            }
            PageControl::Page { index, .. } => {
                self.pagination.go_to_page(index);
            }
            _ => {}
        }
    }

    /// Mount or unmount the quick actions reel
    fn toggle_reel(&mut self, now: Instant) {
        if self.reel.take().is_some() {
            // Dropping the slider restored the page's scroll mode
            self.reel_width = None;
            tracing::info!("Quick actions reel hidden");
        } else {
            self.mount_reel(now);
            tracing::info!("Quick actions reel shown");
        }
    }

    fn mount_reel(&mut self, now: Instant) {
        let config = SliderConfig::new(REEL_ID)
            .orientation(Orientation::Horizontal)
            .show_hint(true);
        self.reel = Some(SectionSlider::mount(
            config,
            QUICK_ACTIONS.to_vec(),
            &self.scroll_mode,
            self.storage.clone(),
            self.capabilities,
            &self.config.slider,
            now,
        ));
        self.reel_width = None;
    }

    fn nudge_reel(&mut self, delta_px: f64, now: Instant) {
        if let Some(reel) = &mut self.reel {
            let offset = reel.scroll_offset() + delta_px;
            reel.set_scroll_offset(offset, now);
        }
    }

    /// Rows the list occupies, including the mobile sentinel row
    fn content_rows(&self) -> usize {
        self.items.len() + usize::from(self.pagination.is_mobile())
    }

    fn max_list_offset(&self) -> usize {
        self.content_rows().saturating_sub(self.list.viewport_rows)
    }

    fn scroll_list_up(&mut self, rows: usize, now: Instant) {
        self.set_list_offset(self.list.offset.saturating_sub(rows), now);
    }

    fn scroll_list_down(&mut self, rows: usize, now: Instant) {
        self.set_list_offset(self.list.offset.saturating_add(rows), now);
    }

    /// Move the list and report the scroll like a browser would
    fn set_list_offset(&mut self, offset: usize, now: Instant) {
        let offset = offset.min(self.max_list_offset());
        if offset == self.list.offset {
            return;
        }
        self.list.offset = offset;
        self.scroll_mode.handle_scroll(ScrollSample::new(
            LIST_ELEMENT,
            offset as f64 * CELL_HEIGHT_PX,
            now,
        ));
        self.check_sentinel(now);
    }

    /// Ask for more items when the sentinel is in reach
    fn check_sentinel(&mut self, now: Instant) -> bool {
        if !self.pagination.is_mobile() || self.list.viewport_rows == 0 {
            return false;
        }
        self.pagination.on_scroll_position(
            self.list.offset as f64 * CELL_HEIGHT_PX,
            self.list.viewport_rows as f64 * CELL_HEIGHT_PX,
            self.content_rows() as f64 * CELL_HEIGHT_PX,
            now,
        )
    }

    fn cycle_viewport_override(&mut self) {
        self.viewport_override = match self.viewport_override {
            None => Some(MOBILE_WIDTH),
            Some(w) if w < self.config.pagination.mobile_breakpoint => Some(DESKTOP_WIDTH),
            Some(_) => None,
        };
        self.terminal_size = None;
    }

    /// Feed the terminal size through the viewport tracker
    pub(crate) fn apply_terminal_size(&mut self, cols: u16, rows: u16, now: Instant) {
        if self.terminal_size == Some((cols, rows)) {
            return;
        }
        self.terminal_size = Some((cols, rows));

        let metrics = ViewportMetrics::new(
            self.viewport_override
                .unwrap_or(cols as f64 * CELL_WIDTH_PX),
            rows as f64 * CELL_HEIGHT_PX,
        );
        self.viewport.update(metrics, &mut self.root_style);

        if self.pagination.handle_resize(metrics.width) {
            if self.pagination.is_mobile() {
                self.items.clear();
                self.pagination.reset_incremental(now);
            } else {
                self.pagination.handler_mut().on_page_change(0);
            }
            // Through the scroll store, so the nav sees the jump to the top
            self.set_list_offset(0, now);
        }
        self.needs_redraw = true;
    }

    /// Pick up measurements from the last render
    fn sync_layout(&mut self, now: Instant) {
        if let Some(area) = self.layout.list_area {
            let rows = area.height.saturating_sub(2) as usize;
            if rows != self.list.viewport_rows {
                self.list.viewport_rows = rows;
                self.needs_redraw = true;
            }
        }

        let reel_width = self.layout.reel_area.map(|a| a.width.saturating_sub(2));
        if let (Some(reel), Some(width)) = (&mut self.reel, reel_width) {
            if self.reel_width != Some(width) {
                reel.attach_container(
                    SliderLayout::full_panels(width as f64 * CELL_WIDTH_PX, reel.slide_count()),
                    now,
                );
                self.reel_width = Some(width);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::{MemorySessionStorage, ScrollMode};

    fn app(width: f64) -> App {
        let mut app = App::new(
            VitrineConfig::default(),
            Capabilities::default(),
            Arc::new(MemorySessionStorage::new()),
            Some(width),
        );
        app.list.viewport_rows = 5;
        app
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::from(code), Instant::now());
    }

    fn drain(app: &mut App) -> Vec<PaginationRequest> {
        let mut out = Vec::new();
        if let Some(rx) = &mut app.requests {
            while let Ok(request) = rx.try_recv() {
                out.push(request);
            }
        }
        out
    }

    #[test]
    fn test_reel_toggles_scroll_mode() {
        let mut app = app(DESKTOP_WIDTH);
        assert_eq!(app.scroll_mode.mode(), ScrollMode::Reel);

        press(&mut app, KeyCode::Char('r'));
        assert!(app.reel.is_none());
        assert_eq!(app.scroll_mode.mode(), ScrollMode::Scroll);

        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.scroll_mode.mode(), ScrollMode::Reel);
    }

    #[test]
    fn test_list_scroll_drives_bottom_nav() {
        let mut app = app(DESKTOP_WIDTH);
        let now = Instant::now();
        app.apply_catalog_page(Catalog::new(CATALOG_SIZE).page(0), now);
        press(&mut app, KeyCode::Char('r'));

        press(&mut app, KeyCode::PageDown);
        app.tick(Instant::now());
        assert!(!app.scroll_mode.state().bottom_nav_visible);

        press(&mut app, KeyCode::Home);
        app.tick(Instant::now());
        assert!(app.scroll_mode.state().bottom_nav_visible);
    }

    #[test]
    fn test_initial_request() {
        let mut app = app(DESKTOP_WIDTH);
        assert_eq!(drain(&mut app), vec![PaginationRequest::Page(0)]);
    }

    #[test]
    fn test_mobile_loads_more_once_until_size_changes() {
        let mut app = app(MOBILE_WIDTH);
        drain(&mut app);
        let catalog = Catalog::new(CATALOG_SIZE);
        app.apply_catalog_page(catalog.page(0), Instant::now());
        assert!(drain(&mut app).is_empty());

        press(&mut app, KeyCode::End);
        assert_eq!(
            drain(&mut app),
            vec![PaginationRequest::LoadMore { size: 20 }]
        );

        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::End);
        assert!(drain(&mut app).is_empty());

        app.apply_catalog_page(catalog.first(20), Instant::now());
        assert!(!app.pagination.load_more_in_flight());
        assert_eq!(app.items.len(), 20);
    }

    #[test]
    fn test_desktop_page_keys() {
        let mut app = app(DESKTOP_WIDTH);
        drain(&mut app);
        let catalog = Catalog::new(CATALOG_SIZE);
        app.apply_catalog_page(catalog.page(0), Instant::now());

        press(&mut app, KeyCode::Char('p'));
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(drain(&mut app), vec![PaginationRequest::Page(1)]);

        press(&mut app, KeyCode::Down);
        app.apply_catalog_page(catalog.page(1), Instant::now());
        assert_eq!(app.list.offset, 0);
        assert_eq!(app.items[0].sku, "SKU-0011");
    }

    #[test]
    fn test_resize_flips_layout_and_reloads() {
        let mut app = App::new(
            VitrineConfig::default(),
            Capabilities::default(),
            Arc::new(MemorySessionStorage::new()),
            None,
        );
        drain(&mut app);

        app.apply_terminal_size(200, 40, Instant::now());
        assert!(!app.pagination.is_mobile());
        assert!(drain(&mut app).is_empty());

        app.apply_terminal_size(60, 40, Instant::now());
        assert!(app.pagination.is_mobile());
        assert_eq!(app.root_style.get("--vh"), Some("6.4px"));
        assert_eq!(
            drain(&mut app),
            vec![PaginationRequest::LoadMore { size: 10 }]
        );
    }

    fn resizable_app() -> App {
        let mut app = App::new(
            VitrineConfig::default(),
            Capabilities::default(),
            Arc::new(MemorySessionStorage::new()),
            None,
        );
        app.apply_terminal_size(200, 40, Instant::now());
        drain(&mut app);
        app.apply_catalog_page(Catalog::new(CATALOG_SIZE).page(0), Instant::now());
        app
    }

    #[test]
    fn test_layout_flip_shows_nav_at_top() {
        let mut app = resizable_app();
        app.list.viewport_rows = 5;
        press(&mut app, KeyCode::Char('r'));

        press(&mut app, KeyCode::PageDown);
        app.tick(Instant::now());
        assert!(!app.scroll_mode.state().bottom_nav_visible);

        app.apply_terminal_size(60, 40, Instant::now());
        app.tick(Instant::now());
        assert_eq!(app.list.offset, 0);
        assert!(app.scroll_mode.state().bottom_nav_visible);
    }

    #[test]
    fn test_layout_flip_issues_one_load_more() {
        let mut app = resizable_app();
        app.list.viewport_rows = 20;

        app.apply_terminal_size(60, 40, Instant::now());
        app.tick(Instant::now());
        app.tick(Instant::now());
        assert_eq!(
            drain(&mut app),
            vec![PaginationRequest::LoadMore { size: 10 }]
        );
        assert!(app.items.is_empty());

        app.apply_catalog_page(Catalog::new(CATALOG_SIZE).first(10), Instant::now());
        assert!(!app.pagination.load_more_in_flight());
        app.tick(Instant::now());
        assert_eq!(
            drain(&mut app),
            vec![PaginationRequest::LoadMore { size: 20 }]
        );
    }

    #[test]
    fn test_reel_keys_after_layout() {
        let mut app = app(DESKTOP_WIDTH);
        app.layout.reel_area = Some(Rect::new(0, 1, 42, 7));
        let start = Instant::now();
        app.sync_layout(start);

        press(&mut app, KeyCode::Char('3'));
        let reel = app.reel.as_ref().unwrap();
        assert!(reel.is_animating());

        let mut now = start;
        for _ in 0..40 {
            now += std::time::Duration::from_millis(16);
            app.tick(now);
        }
        let reel = app.reel.as_ref().unwrap();
        assert_eq!(reel.current_slide_index(), 2);
        assert_eq!(reel.scroll_offset(), 2.0 * 40.0 * CELL_WIDTH_PX);
    }
}
