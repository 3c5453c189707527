//! TUI rendering for ticketwall using ratatui.

mod effects;
mod format;
mod input;
mod theme;

pub use effects::{blink_lit, tile_style};
pub use input::{InputPump, handle_events};
pub use theme::{Glyphs, Palette, glyphs, palette, styles};

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Padding, Paragraph},
};
use unicode_width::UnicodeWidthStr;
use url::Url;

use ticketwall_engine::{App, FeedStatus, StatusCategory};

use self::format::{format_feed_status, truncate_to_width};

/// Height of the category tile row, borders included.
pub const TILE_HEIGHT: u16 = 5;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &mut App) {
    let options = app.ui_options();
    let palette = palette(options);
    let glyphs = glyphs(options);
    // Clear with background color
    let bg_block = Block::default().style(Style::default().bg(palette.bg_dark));
    frame.render_widget(bg_block, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1),           // Header
            Constraint::Length(TILE_HEIGHT), // Category tiles
            Constraint::Min(3),              // Open tickets
            Constraint::Length(1),           // Status bar
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0], &palette);
    draw_tiles(frame, app, chunks[1]);
    draw_open_tickets(frame, app, chunks[2], &palette, &glyphs);
    draw_status_bar(frame, app, chunks[3], &palette, &glyphs);
}

/// Centered title, with the endpoint host on the left and the categorized
/// ticket total on the right when they fit beside it.
fn draw_header(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let title = truncate_to_width(app.title(), usize::from(area.width), "");
    let side = usize::from(area.width).saturating_sub(title.width()) / 2;
    let header = Paragraph::new(Line::from(Span::styled(title, styles::title(palette))))
        .alignment(Alignment::Center);
    frame.render_widget(header, area);

    if let Some(host) = endpoint_host(app.endpoint())
        && host.width() + 2 <= side
    {
        let host = Paragraph::new(Line::from(Span::styled(
            format!(" {host}"),
            styles::key_hint(palette),
        )));
        frame.render_widget(host, area);
    }

    let total = format!("{} total ", app.board().counts().total());
    if total.width() + 1 <= side {
        let total = Paragraph::new(Line::from(Span::styled(total, styles::secondary(palette))))
            .alignment(Alignment::Right);
        frame.render_widget(total, area);
    }
}

fn endpoint_host(endpoint: &str) -> Option<String> {
    let url = Url::parse(endpoint).ok()?;
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

fn draw_tiles(frame: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for (category, column) in StatusCategory::ALL.into_iter().zip(columns.iter()) {
        draw_tile(frame, app, category, *column);
    }
}

/// One bordered tile: category label as the title and its count centered inside.
pub fn draw_tile(frame: &mut Frame, app: &App, category: StatusCategory, area: Rect) {
    let options = app.ui_options();
    let palette = palette(options);
    let glyphs = glyphs(options);

    let style = tile_style(
        palette.category(category),
        palette.bg_panel,
        app.highlight(category),
        options,
    );
    let label = truncate_to_width(
        category.label(),
        usize::from(area.width.saturating_sub(4)),
        glyphs.ellipsis,
    );
    let block = glyphs
        .block()
        .title(Line::from(format!(" {label} ")))
        .style(style);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 {
        return;
    }
    let count_row = Rect {
        y: inner.y + inner.height.saturating_sub(1) / 2,
        height: 1,
        ..inner
    };
    let count = app.board().counts().get(category);
    let count = Paragraph::new(Line::from(Span::styled(
        count.to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(count, count_row);
}

fn draw_open_tickets(
    frame: &mut Frame,
    app: &mut App,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let title = format!(" Open tickets ({}) ", app.board().open_len());
    let block = glyphs
        .block()
        .title(Line::from(Span::styled(title, styles::title(palette))))
        .border_style(Style::default().fg(palette.bg_border))
        .padding(Padding::horizontal(1))
        .style(Style::default().bg(palette.bg_dark));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let viewport = usize::from(inner.height);
    app.set_list_viewport(viewport);

    if app.board().open_len() == 0 {
        let message = match app.feed() {
            FeedStatus::Loading => "Loading tickets...",
            FeedStatus::Stale {
                last_success: None, ..
            } => "Ticket feed unavailable",
            _ => "No open tickets",
        };
        let empty = Paragraph::new(Line::from(Span::styled(
            message,
            styles::secondary(palette),
        )))
        .alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let width = usize::from(inner.width);
    let lines = ticket_lines(app, width, palette, glyphs);
    let visible: Vec<Line> = if app.scroll().is_scrolling(lines.len()) {
        lines
            .iter()
            .cycle()
            .skip(app.scroll().offset())
            .take(viewport)
            .cloned()
            .collect()
    } else {
        lines.into_iter().take(viewport).collect()
    };
    frame.render_widget(Paragraph::new(visible), inner);
}

/// One copy of the open-ticket list, `ROWS_PER_TICKET` lines per ticket.
fn ticket_lines(
    app: &App,
    width: usize,
    palette: &Palette,
    glyphs: &Glyphs,
) -> Vec<Line<'static>> {
    let prefix = format!("{} ", glyphs.bullet);
    let indent = " ".repeat(prefix.width());
    let body_width = width.saturating_sub(prefix.width());

    let mut lines = Vec::with_capacity(app.list_rows());
    for ticket in app.board().open_tickets() {
        let headline = truncate_to_width(&ticket.headline(), body_width, glyphs.ellipsis);
        let status = truncate_to_width(
            &format!("Status: {}", ticket.situation_label()),
            body_width,
            glyphs.ellipsis,
        );
        lines.push(Line::from(vec![
            Span::styled(prefix.clone(), Style::default().fg(palette.tile_open)),
            Span::styled(headline, styles::headline(palette)),
        ]));
        lines.push(Line::from(vec![
            Span::raw(indent.clone()),
            Span::styled(status, styles::secondary(palette)),
        ]));
        lines.push(Line::from(""));
    }
    lines
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let status_style = match app.feed() {
        FeedStatus::Loading => Style::default().fg(palette.primary),
        FeedStatus::Live { .. } => Style::default().fg(palette.success),
        FeedStatus::Stale {
            last_success: Some(_),
            ..
        } => Style::default().fg(palette.warning),
        FeedStatus::Stale {
            last_success: None, ..
        } => Style::default().fg(palette.error),
    };
    let mut status_text = format_feed_status(app.feed(), glyphs);
    if app.scroll().is_paused() {
        status_text = format!("{status_text} {} {} paused", glyphs.separator, glyphs.paused);
    }

    let hints: [(&str, &str); 3] = [("r", "refresh"), ("space", "pause"), ("q", "quit")];
    let mut hint_spans = Vec::with_capacity(hints.len() * 3);
    for (i, (key, action)) in hints.iter().enumerate() {
        if i > 0 {
            hint_spans.push(Span::styled("  ", styles::key_hint(palette)));
        }
        hint_spans.push(Span::styled(*key, styles::key_highlight(palette)));
        hint_spans.push(Span::styled(format!(" {action}"), styles::key_hint(palette)));
    }
    let hints_width: usize = hint_spans.iter().map(|s| s.content.width()).sum();

    // Hints give way to the feed status on narrow terminals.
    let total = usize::from(area.width);
    let status_budget = total.saturating_sub(1);
    let show_hints = status_text.width() + hints_width + 3 <= total;
    let status_text = truncate_to_width(&status_text, status_budget, glyphs.ellipsis);

    let status = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(status_text, status_style),
    ]));
    frame.render_widget(status, area);

    if show_hints {
        let hints = Paragraph::new(Line::from(hint_spans)).alignment(Alignment::Right);
        frame.render_widget(hints, area);
    }
}
