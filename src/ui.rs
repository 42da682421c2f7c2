//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Gauge, LineGauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::{App, DirBrowser, PROGRESS_SCALE, PlaybackState};
use crate::config::{ControlsSettings, UiSettings};
use crate::timefmt::format_time;

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("space/p", "play/pause");
    map.insert("n", "next song");
    // H/L is filled dynamically from config.
    map.insert("0-9", "jump to 0-90%");
    map.insert("+/-", "volume");
    map.insert("o", "open folder");
    map.insert("q", "quit");
    map
});

const BROWSER_HELP: &str = "[j/k] move | [enter/l] open | [h] up | [space/o] load | [esc] close";

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    // Keep the rendered order stable and human-friendly.
    let order = ["space/p", "n", "H/L", "0-9", "+/-", "o", "q"];
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

fn playback_label(state: PlaybackState) -> &'static str {
    match state {
        PlaybackState::Stopped => "Stopped",
        PlaybackState::Playing => "Playing",
        PlaybackState::Paused => "Paused",
    }
}

/// `elapsed / total`, or just `elapsed` while the duration is unknown.
fn time_label(app: &App, ui: &UiSettings) -> String {
    let elapsed = format_time(app.elapsed_ms(), ui.time_format);
    let total = format_time(app.total_ms(), ui.time_format);
    if total.is_empty() {
        elapsed
    } else {
        format!("{elapsed} / {total}")
    }
}

fn status_text(app: &App) -> String {
    let mut parts: Vec<String> = Vec::new();

    match app.current_track() {
        Some(track) => {
            let song = match (&track.artist, &track.title) {
                (Some(artist), Some(title)) => format!("{} ({artist} - {title})", track.name),
                _ => track.name.clone(),
            };
            parts.push(format!("Song: {song}"));
            parts.push(playback_label(app.playback).to_string());
        }
        None => parts.push("Idle".to_string()),
    }

    if let Some(dir) = &app.current_dir {
        parts.push(format!("Dir: {}", dir.display()));
    }

    if let Some(msg) = &app.status {
        parts.push(msg.clone());
    }

    parts.join(" • ")
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    // Keep the popup smaller and avoid covering the entire UI.
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// First visible row and the selection's offset inside a `height`-row
/// window that keeps `selected` centered when possible.
fn visible_window(total: usize, selected: usize, height: usize) -> (usize, usize, usize) {
    if total <= height || height == 0 {
        return (0, total, selected);
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height, selected - start)
}

fn lyric_lines<'a>(app: &'a App, ui: &UiSettings) -> Vec<Line<'a>> {
    let Some(table) = app.current_lyrics() else {
        let hint = if app.current_track().is_some() {
            "(no lyrics)"
        } else {
            ""
        };
        return vec![Line::from(hint).style(Style::default().add_modifier(Modifier::DIM))];
    };

    let at = u64::try_from(app.position.as_millis()).unwrap_or(u64::MAX);
    let window = table.window(at, ui.lyric_context_lines);
    let dim = Style::default().add_modifier(Modifier::DIM);

    let mut lines: Vec<Line> = window
        .before
        .iter()
        .map(|s| Line::from(*s).style(dim))
        .collect();
    lines.push(
        Line::from(window.active.unwrap_or(""))
            .style(Style::default().add_modifier(Modifier::BOLD)),
    );
    lines.extend(window.after.iter().map(|s| Line::from(*s).style(dim)));
    lines
}

fn draw_tracks(frame: &mut Frame, app: &App, area: Rect) {
    let total = app.tracks.len();
    // Borders take two rows.
    let list_height = area.height.saturating_sub(2) as usize;
    let selected = app.current.unwrap_or(0);
    let (start, end, selected_pos_in_visible) = visible_window(total, selected, list_height);

    // Only build ListItems for the visible window.
    let visible_items: Vec<ListItem> = app.tracks[start..end]
        .iter()
        .map(|t| ListItem::new(t.name.as_str()))
        .collect();

    let list = List::new(visible_items)
        .block(Block::default().borders(Borders::ALL).title(" tracks "))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if app.current.is_some() && total > 0 {
        state.select(Some(selected_pos_in_visible));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_browser(frame: &mut Frame, browser: &DirBrowser, area: Rect) {
    let popup_area = centered_rect_sized(72, 20, area);
    frame.render_widget(Clear, popup_area);

    let [list_area, help_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .areas(popup_area);

    let rows = browser.rows();
    let height = list_area.height.saturating_sub(2) as usize;
    let (start, end, selected_pos_in_visible) = visible_window(rows, browser.selected(), height);

    let items: Vec<ListItem> = (start..end)
        .map(|row| ListItem::new(browser.row_label(row)))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", browser.cwd().display())),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(Some(selected_pos_in_visible));
    frame.render_stateful_widget(list, list_area, &mut state);

    let help = Paragraph::new(BROWSER_HELP)
        .block(Block::default().borders(Borders::ALL).title(" open folder "))
        .wrap(Wrap { trim: true });
    frame.render_widget(help, help_area);
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" chorus ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Status box
    let status_par = Paragraph::new(status_text(app))
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    // Lyrics next to the track list
    let [lyrics_area, tracks_area] = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .areas(chunks[2]);

    let lyrics = Paragraph::new(lyric_lines(app, ui_settings))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" lyrics "))
        .wrap(Wrap { trim: true });
    frame.render_widget(lyrics, lyrics_area);
    draw_tracks(frame, app, tracks_area);

    // Progress and volume
    let [progress_area, volume_area] = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(24)])
        .areas(chunks[3]);

    let ratio = app
        .progress_permyriad()
        .map_or(0.0, |p| f64::from(p) / f64::from(PROGRESS_SCALE));
    let progress = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" progress "))
        .gauge_style(Style::default().add_modifier(Modifier::BOLD))
        .ratio(ratio)
        .label(time_label(app, ui_settings));
    frame.render_widget(progress, progress_area);

    let volume = LineGauge::default()
        .block(Block::default().borders(Borders::ALL).title(" volume "))
        .ratio(f64::from(app.volume_gain()).clamp(0.0, 1.0))
        .label(format!("{:>3}%", app.volume));
    frame.render_widget(volume, volume_area);

    if let Some(browser) = &app.browser {
        draw_browser(frame, browser, chunks[2]);
    }

    let footer_text = controls_text(controls_settings.scrub_seconds);
    let footer = Paragraph::new(footer_text)
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

    frame.render_widget(footer, chunks[4]);
}
