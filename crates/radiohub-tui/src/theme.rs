//! Color palette and style constants for the radiohub TUI.

use radiohub_core::PlayerState;
use ratatui::style::{Color, Modifier, Style};

// ── Color palette ─────────────────────────────────────────────────────────────

pub const C_BG: Color = Color::Rgb(18, 18, 18);
pub const C_LOGO: Color = Color::Rgb(125, 86, 244);
pub const C_ACCENT: Color = Color::Rgb(242, 93, 148);
pub const C_PLAYING: Color = Color::Rgb(115, 245, 159);
pub const C_CONNECTING: Color = Color::Rgb(255, 184, 80);
pub const C_ERROR: Color = Color::Rgb(255, 80, 80);
pub const C_MUTED: Color = Color::Rgb(72, 72, 88);
pub const C_SECONDARY: Color = Color::Rgb(156, 163, 175);
pub const C_PRIMARY: Color = Color::Rgb(210, 210, 225);
pub const C_SELECTION_BG: Color = Color::Rgb(55, 40, 110);
pub const C_PANEL_BORDER: Color = Color::Rgb(55, 65, 81);
pub const C_NUMBER_HINT: Color = Color::Rgb(90, 90, 115);
pub const C_GENRE: Color = Color::Rgb(80, 140, 200);
pub const C_OVERLAY_BG: Color = Color::Rgb(18, 18, 26);

// ── Predefined styles ─────────────────────────────────────────────────────────

pub fn style_default() -> Style {
    Style::default().fg(C_PRIMARY)
}

pub fn style_secondary() -> Style {
    Style::default().fg(C_SECONDARY)
}

pub fn style_accent() -> Style {
    Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD)
}

pub fn style_border() -> Style {
    Style::default().fg(C_PANEL_BORDER)
}

pub fn style_muted() -> Style {
    Style::default().fg(C_MUTED)
}

pub fn state_color(state: PlayerState) -> Color {
    match state {
        PlayerState::Playing => C_PLAYING,
        PlayerState::Loading => C_CONNECTING,
        PlayerState::Error => C_ERROR,
        PlayerState::Stopped => C_SECONDARY,
    }
}

pub fn state_icon(state: PlayerState) -> &'static str {
    match state {
        PlayerState::Playing => "▶",
        PlayerState::Loading => "⋯",
        PlayerState::Error => "✗",
        PlayerState::Stopped => "■",
    }
}
