//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`. The
//! transition effects work in viewport pixels; each terminal cell stands for
//! `cell_width_px` x `cell_height_px` of them.

use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    widgets::{Block, BorderType, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, rc::Rc, sync::LazyLock};

use crate::app::{App, Region, SceneRect};
use crate::audio::AudioDevice;
use crate::catalog::{ThemeColor, display_from_fields, time_text};
use crate::config::UiSettings;
use crate::session::PlaybackState;
use crate::transition::{BlobFrame, OverlayFrame, Page, Point};

static CONTROLS_MAP: LazyLock<BTreeMap<String, String>> = LazyLock::new(|| {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    map.insert("j/k".to_string(), "focus".to_string());
    map.insert("enter".to_string(), "open".to_string());
    map.insert("esc/b".to_string(), "back".to_string());
    map.insert("space".to_string(), "play/pause".to_string());
    map.insert("n/p".to_string(), "next/prev song".to_string());
    // H/L is filled dynamically from config.
    map.insert("+/-".to_string(), "volume".to_string());
    map.insert("r".to_string(), "loop".to_string());
    map.insert("s".to_string(), "shuffle".to_string());
    map.insert("d".to_string(), "dark mode".to_string());
    map.insert("e/m".to_string(), "expand/minimize".to_string());
    map.insert("o".to_string(), "playlist".to_string());
    map.insert("q".to_string(), "quit".to_string());
    map
});

/// Render the controls help text, incorporating scrub seconds.
pub(crate) fn controls_text(scrub_seconds: u64) -> String {
    let order = [
        "j/k", "enter", "esc/b", "space", "n/p", "H/L", "+/-", "r", "s", "d", "e/m", "o", "q",
    ];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] scrub -/+{}s", scrub_seconds))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width: width.min(r.width),
        height: height.min(r.height),
    }
}

/// Header, page, player and footer rows of the screen.
fn layout(area: Rect, minimized: bool) -> Rc<[Rect]> {
    let player_height = if minimized { 3 } else { 7 };
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(player_height),
            Constraint::Length(4),
        ])
        .split(area)
}

/// Inside of the landing scene's frame, given the page area.
fn scene_inner(page: Rect) -> Rect {
    Block::bordered().inner(page)
}

/// Cells the landing scene's outlines are drawn into on a screen of `area`.
pub(crate) fn scene_area(area: Rect, minimized: bool) -> Rect {
    scene_inner(layout(area, minimized)[1])
}

/// The landing scene's placement in viewport pixels, for hit testing.
pub(crate) fn scene_rect(area: Rect, minimized: bool, ui: &UiSettings) -> SceneRect {
    let inner = scene_area(area, minimized);
    let (cw, ch) = (f32::from(ui.cell_width_px), f32::from(ui.cell_height_px));
    SceneRect::new(
        f32::from(inner.x) * cw,
        f32::from(inner.y) * ch,
        f32::from(inner.width) * cw,
        f32::from(inner.height) * ch,
    )
}

/// Map a normalized scene region onto `area`, keeping at least one cell.
///
/// Edges round to the nearest cell boundary, so a drawn cell's center lies
/// inside the region it stands for.
pub(crate) fn region_rect(region: &Region, area: Rect) -> Rect {
    let w = f32::from(area.width);
    let h = f32::from(area.height);
    let x = area.x + (region.left * w).round() as u16;
    let y = area.y + (region.top * h).round() as u16;
    let right = area.right().min(area.x + ((region.left + region.width) * w).round() as u16);
    let bottom = area.bottom().min(area.y + ((region.top + region.height) * h).round() as u16);
    Rect {
        x: x.min(area.right().saturating_sub(1)),
        y: y.min(area.bottom().saturating_sub(1)),
        width: right.saturating_sub(x).max(1),
        height: bottom.saturating_sub(y).max(1),
    }
    .intersection(area)
}

fn color(c: &ThemeColor) -> Option<Color> {
    c.rgb().map(|(r, g, b)| Color::Rgb(r, g, b))
}

/// Linear mix of `base` toward `tint` by `amount` (0..=1).
pub(crate) fn blend(base: (u8, u8, u8), tint: (u8, u8, u8), amount: f32) -> (u8, u8, u8) {
    let a = amount.clamp(0.0, 1.0);
    let mix = |b: u8, t: u8| (f32::from(b) + (f32::from(t) - f32::from(b)) * a).round() as u8;
    (mix(base.0, tint.0), mix(base.1, tint.1), mix(base.2, tint.2))
}

struct Palette {
    bg: (u8, u8, u8),
    fg: Color,
}

impl Palette {
    fn new(dark_mode: bool) -> Self {
        if dark_mode {
            Self {
                bg: (18, 18, 24),
                fg: Color::Rgb(230, 230, 235),
            }
        } else {
            Self {
                bg: (250, 247, 242),
                fg: Color::Rgb(40, 36, 32),
            }
        }
    }

    fn base(&self) -> Style {
        let (r, g, b) = self.bg;
        Style::default().fg(self.fg).bg(Color::Rgb(r, g, b))
    }
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw<D: AudioDevice>(frame: &mut Frame, app: &App<D>, ui: &UiSettings) {
    let state = app.session.state();
    let palette = Palette::new(state.dark_mode);
    frame.render_widget(Block::default().style(palette.base()), frame.area());

    let chunks = layout(frame.area(), state.is_minimized);

    let header = Paragraph::new(ui.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" gramophone ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    match app.page() {
        Page::Home => draw_scene(frame, app, chunks[1]),
        Page::Music => draw_music_page(frame, state, chunks[1]),
        page => draw_page(frame, page, chunks[1]),
    }

    // Pages blur in and out; a terminal can only dim them.
    if !app.transition.content_fade().is_settled() {
        frame
            .buffer_mut()
            .set_style(chunks[1], Style::default().add_modifier(Modifier::DIM));
    }

    draw_player(frame, state, ui, chunks[2]);

    if let Some(cursor) = app.picker {
        draw_picker(frame, state, cursor, chunks[1]);
    }

    let footer = Paragraph::new(controls_text(ui.scrub_seconds))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);

    if let Some(overlay) = app.transition.overlay() {
        let area = frame.area();
        let reach = app.viewport().diagonal();
        paint_overlay(frame.buffer_mut(), area, &overlay, reach, &palette, ui);
    }
}

/// The landing scene: one outlined box per hotspot, laid out like the
/// illustration they were traced from.
fn draw_scene<D: AudioDevice>(frame: &mut Frame, app: &App<D>, area: Rect) {
    let title = match app.focused() {
        Some(h) => format!(" home · {} ", h.label),
        None => " home ".to_string(),
    };
    let inner = scene_inner(area);
    frame.render_widget(Block::bordered().title(title), area);

    // Larger outlines first so the small ones stay visible on top.
    let mut order: Vec<usize> = (0..app.hotspots().len()).collect();
    order.sort_by(|&a, &b| {
        let (a, b) = (&app.hotspots()[a].region, &app.hotspots()[b].region);
        b.area().total_cmp(&a.area())
    });

    for i in order {
        let h = &app.hotspots()[i];
        let rect = region_rect(&h.region, inner);
        if rect.is_empty() {
            continue;
        }
        let mut style = Style::default();
        if let Some(c) = color(&h.color) {
            style = style.fg(c);
        }
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(style)
            .title(h.label);
        if i == app.focus {
            block = block
                .border_type(BorderType::Thick)
                .title_style(style.add_modifier(Modifier::BOLD | Modifier::REVERSED));
        }
        frame.render_widget(Clear, rect);
        frame.render_widget(block, rect);
    }
}

fn draw_page(frame: &mut Frame, page: Page, area: Rect) {
    let body = Paragraph::new(format!("{}\n\n[esc/b] back", page.title()))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", page.id())),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(body, area);
}

fn draw_music_page(frame: &mut Frame, state: &PlaybackState, area: Rect) {
    let items: Vec<ListItem> = state
        .tracks
        .iter()
        .map(|t| ListItem::new(format!("{} - {} ({})", t.title, t.artist, t.album)))
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", Page::Music.id()))
                .title_bottom(" [esc/b] back "),
        )
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol("♪ ");
    let mut list_state = ListState::default();
    list_state.select(state.current);
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn draw_player(frame: &mut Frame, state: &PlaybackState, ui: &UiSettings, area: Rect) {
    let accent = color(&state.accent_color);
    let dominant = color(&state.dominant_color);

    let song = state
        .current_track()
        .map(|t| {
            display_from_fields(
                t,
                &ui.now_playing_track_fields,
                &ui.now_playing_track_separator,
            )
        })
        .unwrap_or_else(|| "No track".to_string());
    let time = time_text(
        state.current_time,
        state.effective_duration(),
        &ui.now_playing_time_fields,
        &ui.now_playing_time_separator,
    );

    let mut parts = vec![if state.is_playing { "Playing" } else { "Paused" }.to_string()];
    match time {
        Some(time) => parts.push(format!("{song} [{time}]")),
        None => parts.push(song),
    }

    let mut block = Block::bordered().title(" player ");
    if let Some(c) = dominant {
        block = block.border_style(Style::default().fg(c));
    }

    if state.is_minimized {
        let bar = Paragraph::new(parts.join(" • ")).block(block.padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        }));
        frame.render_widget(bar, area);
        return;
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let album = state
        .current_track()
        .map(|t| t.album.as_str())
        .unwrap_or("-");
    let mut title = Paragraph::new(parts.join(" • ")).bold();
    if state.is_transitioning {
        title = title.slow_blink();
    }
    frame.render_widget(title, rows[0]);
    frame.render_widget(Paragraph::new(album).italic(), rows[1]);

    let mut gauge = Gauge::default().ratio(state.progress()).label("");
    if let Some(c) = accent {
        gauge = gauge.gauge_style(Style::default().fg(c));
    }
    frame.render_widget(gauge, rows[2]);

    let flags = [
        format!("Volume: {:.0}%", state.volume * 100.0),
        format!("Loop: {}", if state.is_looping { "ON" } else { "OFF" }),
        format!("Shuffle: {}", if state.is_shuffling { "ON" } else { "OFF" }),
        format!("Dark: {}", if state.dark_mode { "ON" } else { "OFF" }),
    ];
    frame.render_widget(Paragraph::new(flags.join(" • ")), rows[3]);
}

fn draw_picker(frame: &mut Frame, state: &PlaybackState, cursor: usize, area: Rect) {
    let popup = centered_rect_sized(60, state.tracks.len() as u16 + 2, area);
    frame.render_widget(Clear, popup);

    let items: Vec<ListItem> = state
        .tracks
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let mark = if Some(i) == state.current { "♪" } else { " " };
            ListItem::new(format!("{mark} {} - {}", t.title, t.artist))
        })
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" playlist (o closes) "),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut list_state = ListState::default();
    list_state.select(Some(cursor));
    frame.render_stateful_widget(list, popup, &mut list_state);
}

/// Center of cell `(x, y)` in viewport pixels.
pub(crate) fn cell_center(x: u16, y: u16, ui: &UiSettings) -> Point {
    Point::new(
        (f32::from(x) + 0.5) * f32::from(ui.cell_width_px),
        (f32::from(y) + 0.5) * f32::from(ui.cell_height_px),
    )
}

/// How strongly the overlay tints the cell whose center is `at`, 0..=1.
pub(crate) fn overlay_tint(overlay: &OverlayFrame, at: Point, reach: f32) -> f32 {
    let d = (at.x - overlay.origin.x).hypot(at.y - overlay.origin.y);

    let rings: f32 = overlay
        .rings
        .iter()
        .filter(|r| d <= r.diameter / 2.0)
        .map(|r| r.alpha)
        .sum();
    let blob = match overlay.blob {
        BlobFrame::Growing { diameter } if d <= diameter / 2.0 => 0.5,
        BlobFrame::Growing { .. } => 0.0,
        BlobFrame::Filling { coverage } if d <= reach * coverage => 0.5,
        BlobFrame::Filling { .. } => 0.0,
    };
    ((rings + blob + overlay.glow) * overlay.opacity).clamp(0.0, 1.0)
}

fn paint_overlay(
    buf: &mut Buffer,
    area: Rect,
    overlay: &OverlayFrame,
    reach: f32,
    palette: &Palette,
    ui: &UiSettings,
) {
    let Some(tint) = overlay.accent.rgb() else {
        return;
    };

    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            let amount = overlay_tint(overlay, cell_center(x, y, ui), reach);
            if amount <= 0.0 {
                continue;
            }
            let (r, g, b) = blend(palette.bg, tint, amount);
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_bg(Color::Rgb(r, g, b));
            }
        }
    }

    let (r, g, b) = tint;
    for p in overlay.particles.iter().filter(|p| p.opacity > 0.1 && p.size > 0.5) {
        if p.position.x < 0.0 || p.position.y < 0.0 {
            continue;
        }
        let x = (p.position.x / f32::from(ui.cell_width_px)) as u16;
        let y = (p.position.y / f32::from(ui.cell_height_px)) as u16;
        if x < area.right() && y < area.bottom() {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_symbol("•").set_fg(Color::Rgb(r, g, b));
            }
        }
    }
}

#[cfg(test)]
mod tests;
