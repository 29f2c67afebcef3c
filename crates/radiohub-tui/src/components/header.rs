//! Header component — logo, logo selector and the animated subtitle.
//!
//! Sits at the top of the left pane.  Not focusable.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{state_color, C_LOGO, C_MUTED, C_SECONDARY},
    widgets::text::center_pad,
};

const WAVE: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

const BANNER: [&str; 4] = [
    "╔════════════════════════════════════╗",
    "║        R A D I O   H U B           ║",
    "║     ~ terminal radio player ~      ║",
    "╚════════════════════════════════════╝",
];

const COMPACT: [&str; 1] = ["♪ radiohub ♪"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogoStyle {
    #[default]
    Banner,
    Compact,
    None,
}

impl LogoStyle {
    pub fn next(self) -> Self {
        match self {
            Self::Banner => Self::Compact,
            Self::Compact => Self::None,
            Self::None => Self::Banner,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Banner => "banner",
            Self::Compact => "compact",
            Self::None => "none",
        }
    }

    pub fn lines(self) -> &'static [&'static str] {
        match self {
            Self::Banner => &BANNER,
            Self::Compact => &COMPACT,
            Self::None => &[],
        }
    }
}

/// One frame of the rotating level-bar animation.
pub fn wave_frame(step: usize) -> String {
    (0..WAVE.len())
        .map(|i| WAVE[(i + step) % WAVE.len()])
        .collect()
}

pub struct Header {
    pub logo: LogoStyle,
    wave_step: usize,
}

impl Header {
    pub fn new() -> Self {
        Self {
            logo: LogoStyle::default(),
            wave_step: 0,
        }
    }
}

impl Component for Header {
    fn id(&self) -> ComponentId {
        ComponentId::Header
    }

    fn tick(&mut self, _state: &AppState) -> Vec<Action> {
        self.wave_step = self.wave_step.wrapping_add(1);
        Vec::new()
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if *action == Action::CycleLogo {
            self.logo = self.logo.next();
        }
        Vec::new()
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let width = area.width as usize;
        let centred = |text: &str| format!("{}{}", " ".repeat(center_pad(text, width)), text);

        let mut lines: Vec<Line> = self
            .logo
            .lines()
            .iter()
            .map(|l| {
                Line::from(Span::styled(
                    centred(l),
                    Style::default().fg(C_LOGO).add_modifier(Modifier::BOLD),
                ))
            })
            .collect();

        let selector = format!("logo: {} (l to cycle)", self.logo.label());
        lines.push(Line::from(Span::styled(
            centred(&selector),
            Style::default().fg(C_MUTED).add_modifier(Modifier::ITALIC),
        )));

        let subtitle = format!("♪ Radio Stations {}", wave_frame(self.wave_step));
        let pad = center_pad(&subtitle, width);
        lines.push(Line::from(vec![
            Span::raw(" ".repeat(pad)),
            Span::styled(
                "♪ Radio Stations ",
                Style::default().fg(C_SECONDARY).add_modifier(Modifier::ITALIC),
            ),
            Span::styled(
                wave_frame(self.wave_step),
                Style::default().fg(state_color(state.playback.state)),
            ),
        ]));

        frame.render_widget(Paragraph::new(lines), area);
    }

    fn min_height(&self) -> u16 {
        self.logo.lines().len() as u16 + 2
    }
}
