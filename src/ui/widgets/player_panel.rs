// src/ui/widgets/player_panel.rs
//! Player information panel widget.

use std::time::Duration;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::app::playback::{format_time, progress_percent};

/// What the panel needs to know about playback.
#[derive(Debug, Clone, Copy)]
pub struct PlayerView<'a> {
    pub title: &'a str,
    pub elapsed: Duration,
    pub duration: Option<Duration>,
    pub is_playing: bool,
    pub is_paused: bool,
}

/// Label shown inside the progress gauge, e.g. `1:05 / 3:20`.
pub fn time_label(elapsed: Duration, duration: Option<Duration>) -> String {
    format!(
        "{} / {}",
        format_time(elapsed.as_secs_f64()),
        format_time(duration.map_or(0.0, |d| d.as_secs_f64()))
    )
}

/// Render the player information panel.
pub fn render_player_panel(f: &mut Frame<'_>, area: Rect, view: &PlayerView<'_>) {
    f.render_widget(Block::default().borders(Borders::ALL).title("Player"), area);

    let inner = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    f.render_widget(
        Paragraph::new(view.title).alignment(Alignment::Center),
        inner[0],
    );

    // Playback control buttons
    let play_pause_icon = if !view.is_playing {
        Span::styled(" ⏵ ", Style::default().fg(Color::Gray))
    } else if view.is_paused {
        Span::styled(" ⏵ ", Style::default().fg(Color::Yellow))
    } else {
        Span::styled(" ⏸ ", Style::default().fg(Color::Green))
    };

    let controls = Line::from(vec![
        Span::styled(" ⏪ ", Style::default().fg(Color::Cyan)), // Seek back (←)
        Span::raw(" "),
        Span::styled(" ⏹ ", Style::default().fg(Color::Red)), // Stop (s)
        Span::raw(" "),
        play_pause_icon, // Play/Pause (space)
        Span::raw(" "),
        Span::styled(" ⏩ ", Style::default().fg(Color::Cyan)), // Seek forward (→)
    ]);
    f.render_widget(Paragraph::new(controls).alignment(Alignment::Center), inner[1]);

    let ratio = progress_percent(view.elapsed, view.duration) / 100.0;
    f.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(Color::Magenta).add_modifier(Modifier::ITALIC))
            .ratio(ratio)
            .label(time_label(view.elapsed, view.duration)),
        inner[2],
    );

    let help = "space play/pause · ←/→ seek · 0-9 jump · s stop · q quit";
    f.render_widget(
        Paragraph::new(help)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        inner[3],
    );
}
