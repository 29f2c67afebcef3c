//! Status bar — bottom lines with key hints and the last log message.

use radiohub_core::PlaybackSnapshot;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{state_color, state_icon, style_muted, C_SECONDARY};
use crate::widgets::text::truncate_to_width;

pub const KEY_HINTS: &str =
    "↑↓/jk select  Enter/Space play/stop  t toggle  s stop  g genre  r random  l logo  ? help  q quit";

/// Draw the log bar: playback bulb + last log line.
pub fn draw_log_bar(frame: &mut Frame, area: Rect, last_log: Option<&str>, playback: &PlaybackSnapshot) {
    let bulb = Span::styled(
        state_icon(playback.state),
        Style::default()
            .fg(state_color(playback.state))
            .add_modifier(Modifier::BOLD),
    );
    let width = (area.width as usize).saturating_sub(3);
    let log_span = Span::styled(
        truncate_to_width(last_log.unwrap_or(""), width),
        Style::default().fg(C_SECONDARY),
    );

    let line = Line::from(vec![Span::raw(" "), bulb, Span::raw(" "), log_span]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Draw the keybindings footer bar (one row).
pub fn draw_keys_bar(frame: &mut Frame, area: Rect, genre_filter: Option<&str>) {
    let mode = match genre_filter {
        Some(g) => format!(" {} ", g.to_uppercase()),
        None => " ALL ".to_string(),
    };
    let mode_span = Span::styled(
        mode,
        Style::default().fg(C_SECONDARY).add_modifier(Modifier::BOLD),
    );
    let keys_span = Span::styled(format!(" {}", KEY_HINTS), style_muted());
    frame.render_widget(Paragraph::new(Line::from(vec![mode_span, keys_span])), area);
}
