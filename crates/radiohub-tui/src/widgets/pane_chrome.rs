//! PaneChrome — standardized bordered pane with an optional badge.

use crate::theme::{style_border, style_muted, C_NUMBER_HINT, C_PRIMARY};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders},
};

/// A badge shown in the top-right of the pane header (e.g. "PLAYING", "ERR").
pub struct Badge<'a> {
    pub text: &'a str,
    pub color: Color,
}

/// Rounded bordered block titled `title`, with an optional dimmed `hint`
/// after the title and a right-aligned badge.
pub fn pane_chrome<'a>(title: &'a str, hint: Option<String>, badge: Option<Badge<'a>>) -> Block<'a> {
    let mut title_spans = vec![Span::styled(
        format!(" {} ", title),
        Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
    )];
    if let Some(hint) = hint {
        title_spans.push(Span::styled(
            format!("{} ", hint),
            Style::default().fg(C_NUMBER_HINT),
        ));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(style_border())
        .title(Line::from(title_spans));

    match badge {
        Some(b) => block.title_top(
            Line::from(Span::styled(
                format!(" {} ", b.text),
                Style::default().fg(b.color).add_modifier(Modifier::BOLD),
            ))
            .right_aligned(),
        ),
        None => block,
    }
}

/// Dim placeholder line used by empty panes.
pub fn placeholder(text: &str) -> Line<'_> {
    Line::from(Span::styled(text, style_muted()))
}
