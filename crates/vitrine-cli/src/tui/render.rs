//! Frame rendering
//!
//! Draws the page top to bottom: toolbar, quick actions reel, product list,
//! page strip (desktop) and the bottom nav. Returns the areas the event
//! handlers hit-test against.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use vitrine_core::pagination::{PageControl, PaginationView, SentinelStatus};
use vitrine_core::viewport::{ViewportClass, VH_PROPERTY};
use vitrine_core::{ScrollDirection, SectionSlider};

use super::app::{App, LayoutState, QuickAction, CELL_WIDTH_PX};
use super::utils::truncate_ellipsis;

const ACCENT: Color = Color::Cyan;
const MUTED: Color = Color::DarkGray;

/// Reel height including borders
const REEL_HEIGHT: u16 = 7;

const NAV_ITEMS: &[&str] = &["⌂ Home", "▤ Shop", "⚒ Repairs", "☰ Orders", "◉ Account"];

pub fn ui(f: &mut Frame, app: &App) -> LayoutState {
    let mobile = app.pagination.is_mobile();
    let reel_height = if app.reel.is_some() { REEL_HEIGHT } else { 0 };
    let strip_height = if mobile { 0 } else { 1 };

    let [toolbar, reel_area, list_area, strip_area, nav_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(reel_height),
        Constraint::Min(3),
        Constraint::Length(strip_height),
        Constraint::Length(1),
    ])
    .areas(f.area());

    render_toolbar(f, toolbar, app);

    let mut layout = LayoutState::default();
    if let Some(reel) = &app.reel {
        render_reel(f, reel_area, reel);
        layout.reel_area = Some(reel_area);
    }

    render_list(f, list_area, app);
    layout.list_area = Some(list_area);

    if let PaginationView::Desktop(controls) = app.pagination.view() {
        layout.page_buttons = render_page_strip(f.buffer_mut(), strip_area, &controls);
    }

    if app.scroll_mode.state().bottom_nav_visible {
        render_bottom_nav(f, nav_area);
    }

    layout
}

fn render_toolbar(f: &mut Frame, area: Rect, app: &App) {
    let state = app.scroll_mode.state();
    let arrow = match state.scroll_direction {
        ScrollDirection::Up => "↑",
        ScrollDirection::Down => "↓",
    };
    let class = match app.viewport.class() {
        ViewportClass::Mobile => "mobile",
        ViewportClass::Desktop => "desktop",
    };
    let metrics = app.viewport.metrics();
    let vh = app.root_style.get(VH_PROPERTY).unwrap_or("-");

    let line = Line::from(vec![
        Span::styled(
            " vitrine ",
            Style::default().fg(Color::Black).bg(ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  mode "),
        Span::styled(state.mode.as_str(), Style::default().fg(ACCENT)),
        Span::raw(format!("  {arrow}  ")),
        Span::styled(
            format!("{:.0}px {class}  --vh {vh}", metrics.width),
            Style::default().fg(MUTED),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn render_reel(f: &mut Frame, area: Rect, reel: &SectionSlider<QuickAction>) {
    let snapshot = reel.snapshot();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(MUTED))
        .title(" Quick actions ");
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.width == 0 || inner.height < 2 {
        return;
    }

    let panel_width = inner.width as i64;
    let offset_cells = (snapshot.scroll_offset / CELL_WIDTH_PX).round() as i64;
    let body_height = inner.height - 1;

    for (index, action) in reel.slides().iter().enumerate() {
        let start = index as i64 * panel_width - offset_cells;
        let visible_start = start.max(0);
        let visible_end = (start + panel_width).min(panel_width);
        if visible_end <= visible_start {
            continue;
        }

        let text = vec![
            Line::raw(""),
            Line::styled(
                format!("  {}", action.title),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Line::styled(format!("  {}", action.subtitle), Style::default().fg(MUTED)),
        ];
        let skip = (visible_start - start) as u16;
        let rect = Rect::new(
            inner.x + visible_start as u16,
            inner.y,
            (visible_end - visible_start) as u16,
            body_height,
        );
        f.render_widget(Paragraph::new(text).scroll((0, skip)), rect);
    }

    let mut footer = Vec::new();
    if snapshot.tracking_enabled {
        for i in 0..snapshot.slide_count {
            let (dot, color) = if i == snapshot.current_slide_index {
                ("● ", ACCENT)
            } else {
                ("○ ", MUTED)
            };
            footer.push(Span::styled(dot, Style::default().fg(color)));
        }
    }
    if snapshot.hint_visible {
        footer.push(Span::styled(
            "  ‹ swipe for more ›  (x to dismiss)",
            Style::default().fg(Color::Yellow),
        ));
    }
    let footer_area = Rect::new(inner.x, inner.y + body_height, inner.width, 1);
    f.render_widget(
        Paragraph::new(Line::from(footer)).alignment(Alignment::Center),
        footer_area,
    );
}

fn render_list(f: &mut Frame, area: Rect, app: &App) {
    let counters = app.pagination.counters();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(format!(
            " Products {}/{} ",
            app.items.len(),
            counters.total_elements
        ));
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.width < 2 || inner.height == 0 {
        return;
    }

    let mobile = app.pagination.is_mobile();
    let rows = app.items.len() + usize::from(mobile);
    let visible = inner.height as usize;
    let text_width = inner.width as usize - 1;

    let mut lines = Vec::with_capacity(visible);
    for row in app.list.offset..rows.min(app.list.offset + visible) {
        let line = match app.items.get(row) {
            Some(product) => {
                let price = product.price_label();
                let name_width = text_width.saturating_sub(product.sku.width() + price.width() + 4);
                let name = truncate_ellipsis(&product.name, name_width);
                let pad = name_width.saturating_sub(name.width());
                Line::from(vec![
                    Span::styled(product.sku.clone(), Style::default().fg(MUTED)),
                    Span::raw("  "),
                    Span::raw(name),
                    Span::raw(" ".repeat(pad)),
                    Span::raw("  "),
                    Span::styled(price, Style::default().fg(ACCENT)),
                ])
            }
            None => sentinel_line(app.pagination.sentinel_status()),
        };
        lines.push(line);
    }
    let text_area = Rect::new(inner.x, inner.y, inner.width - 1, inner.height);
    f.render_widget(Paragraph::new(lines), text_area);

    let bar = Rect::new(inner.x + inner.width - 1, inner.y, 1, inner.height);
    render_scrollbar(f.buffer_mut(), bar, app.list.offset, rows, visible);
}

fn sentinel_line(status: SentinelStatus) -> Line<'static> {
    match status {
        SentinelStatus::Loading => {
            Line::styled("Loading more…", Style::default().fg(Color::Yellow)).centered()
        }
        other => Line::styled(other.message().unwrap_or(""), Style::default().fg(MUTED)).centered(),
    }
}

/// One-column scrollbar: ░ track, █ thumb
fn render_scrollbar(buf: &mut Buffer, area: Rect, offset: usize, total: usize, visible: usize) {
    if total <= visible || area.height == 0 {
        return;
    }
    let height = area.height as usize;
    let thumb = ((visible * height) / total).clamp(1, height);
    let max_offset = total - visible;
    let thumb_pos = (offset.min(max_offset) * (height - thumb)) / max_offset;

    for y in 0..height {
        let (ch, color) = if (thumb_pos..thumb_pos + thumb).contains(&y) {
            ('█', ACCENT)
        } else {
            ('░', MUTED)
        };
        if let Some(cell) = buf.cell_mut((area.x, area.y + y as u16)) {
            cell.set_char(ch).set_fg(color);
        }
    }
}

/// Draw the page buttons and return their hit areas
fn render_page_strip(
    buf: &mut Buffer,
    area: Rect,
    controls: &[PageControl],
) -> Vec<(Rect, PageControl)> {
    let mut hits = Vec::new();
    let mut x = area.x + 1;
    let right = area.x + area.width;

    for control in controls {
        let (label, style) = match *control {
            PageControl::Previous { enabled } => ("‹ Prev".to_string(), button_style(enabled)),
            PageControl::Next { enabled } => ("Next ›".to_string(), button_style(enabled)),
            PageControl::Page { index, active: true } => (
                format!("{}", index + 1),
                Style::default().fg(Color::Black).bg(ACCENT).add_modifier(Modifier::BOLD),
            ),
            PageControl::Page { index, active: false } => {
                (format!("{}", index + 1), Style::default())
            }
            PageControl::Ellipsis => ("…".to_string(), Style::default().fg(MUTED)),
        };
        let label = format!(" {label} ");
        let width = label.width() as u16;
        if x + width > right {
            break;
        }
        buf.set_string(x, area.y, &label, style);
        hits.push((Rect::new(x, area.y, width, 1), *control));
        x += width + 1;
    }
    hits
}

fn button_style(enabled: bool) -> Style {
    if enabled {
        Style::default().fg(ACCENT)
    } else {
        Style::default().fg(MUTED)
    }
}

fn render_bottom_nav(f: &mut Frame, area: Rect) {
    let spans: Vec<Span> = NAV_ITEMS
        .iter()
        .flat_map(|item| [Span::raw(*item), Span::raw("   ")])
        .collect();
    f.render_widget(
        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .style(Style::default().add_modifier(Modifier::REVERSED)),
        area,
    );
}
