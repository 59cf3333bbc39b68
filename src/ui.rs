//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`. It is
//! a pure view: everything it shows comes from the `App` model, the
//! controller's accessors and the needle handle; every intent goes back out
//! through the runtime's key handler.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style, Stylize},
    widgets::{Block, Borders, Gauge, List, ListItem, Padding, Paragraph, Wrap},
};

use crate::app::{App, InputMode};
use crate::config::UiSettings;
use crate::graph::FREQUENCY_BANDS;
use crate::player::{PlaybackController, PlaybackState};

/// Render the controls help text.
fn controls_text() -> String {
    [
        "[j/k] move",
        "[enter] play",
        "[space/p] play/pause",
        "[h/l] prev/next",
        "[d] delete",
        "[a] add files",
        "[-/+] volume",
        "[e] eq band",
        "[[/]] band gain",
        "[q] quit",
    ]
    .join(" | ")
}

/// One row of dots with the needle block at the angle's position.
fn needle_row(angle: f32, width: usize) -> String {
    let width = width.max(3);
    let t = ((angle + 90.0) / 180.0).clamp(0.0, 1.0);
    let pos = (t * (width - 1) as f32).round() as usize;

    let mut row = String::with_capacity(width * 3);
    for i in 0..width {
        row.push(if i == pos { '█' } else { '·' });
    }
    row
}

/// The dial legend under the needle.
fn scale_row(width: usize) -> String {
    let width = width.max(3);
    let mut row: Vec<char> = vec!['─'; width];
    row[0] = '└';
    row[width / 2] = '┴';
    row[width - 1] = '┘';
    row.into_iter().collect()
}

fn format_band(band: usize, gain_db: f32) -> String {
    let hz = FREQUENCY_BANDS[band];
    let freq = if hz >= 1000.0 {
        format!("{:.0}kHz", hz / 1000.0)
    } else {
        format!("{hz:.0}Hz")
    };
    format!("EQ {freq} {gain_db:+.1}dB")
}

/// Render the entire UI into the provided `frame`.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    controller: &PlaybackController,
    needle_deg: f32,
    ui_settings: &UiSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    // Header: now playing, or the configured banner while idle.
    let header_text = controller
        .now_playing()
        .unwrap_or(ui_settings.header_text.as_str());
    let header = Paragraph::new(header_text)
        .alignment(Alignment::Center)
        .bold()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" vivace ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // VU needle.
    {
        let inner_width = chunks[1].width.saturating_sub(2) as usize;
        let meter = Paragraph::new(format!(
            "{}\n{}",
            needle_row(needle_deg, inner_width),
            scale_row(inner_width)
        ))
        .block(Block::default().borders(Borders::ALL).title(" vu "));
        frame.render_widget(meter, chunks[1]);
    }

    // Status: transport label, volume gauge, EQ readout.
    {
        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(1), Constraint::Length(24)])
            .split(chunks[2]);

        let mut parts: Vec<String> = Vec::new();
        // The transport label names the action the toggle key performs.
        parts.push(match controller.playback() {
            PlaybackState::Playing => "PAUSE".to_string(),
            PlaybackState::Paused | PlaybackState::Stopped => "PLAY".to_string(),
        });
        parts.push(format_band(app.band, controller.graph().band_gains()[app.band]));
        if let Some(err) = controller.audio_error() {
            parts.push(format!("AUDIO: {err}"));
        }
        if app.mode == InputMode::AddPath {
            parts.push(format!("ADD PATH: {}_", app.path_input));
        } else if let Some(status) = &app.status {
            parts.push(status.clone());
        }

        let status = Paragraph::new(parts.join(" • "))
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
        frame.render_widget(status, halves[0]);

        let volume = controller.volume();
        let gauge = Gauge::default()
            .block(Block::bordered().title(" volume "))
            .ratio(f64::from((volume / 1.25).clamp(0.0, 1.0)))
            .label(format!("{:.0}%", volume * 100.0));
        frame.render_widget(gauge, halves[1]);
    }

    // Playlist.
    {
        let playlist = controller.playlist();
        let current = playlist.current();
        let items: Vec<ListItem> = playlist
            .tracks()
            .iter()
            .enumerate()
            .map(|(i, track)| {
                let marker = if Some(i) == current { "▶ " } else { "  " };
                let row = format!("{marker}{}", track.display_name(i));
                if Some(i) == current {
                    ListItem::new(row).style(Style::default().add_modifier(Modifier::BOLD))
                } else {
                    ListItem::new(row)
                }
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(" playlist "))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ratatui::widgets::ListState::default();
        if !playlist.is_empty() {
            state.select(Some(app.cursor.min(playlist.len() - 1)));
        }
        frame.render_stateful_widget(list, chunks[3], &mut state);
    }

    let footer = Paragraph::new(controls_text())
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn needle_row_hits_the_expected_column() {
        assert!(needle_row(-90.0, 11).starts_with('█'));
        assert!(needle_row(90.0, 11).ends_with('█'));
        let mid = needle_row(0.0, 11);
        assert_eq!(mid.chars().nth(5), Some('█'));
    }

    #[test]
    fn format_band_switches_units_at_a_kilohertz() {
        assert_eq!(format_band(0, 0.0), "EQ 60Hz +0.0dB");
        assert_eq!(format_band(4, -2.5), "EQ 1kHz -2.5dB");
        assert_eq!(format_band(9, 3.0), "EQ 16kHz +3.0dB");
    }
}
