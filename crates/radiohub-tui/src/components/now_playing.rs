//! NowPlaying component — right pane.
//!
//! Top box: the session (station, genre, status with error detail, simulated
//! track).  Below: details of the active station, or of the station under the
//! cursor when nothing is active.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use radiohub_core::{PlayerState, Station};

use crate::{
    action::ComponentId,
    app_state::AppState,
    component::Component,
    theme::{state_color, style_accent, style_default, style_secondary, C_ERROR, C_GENRE, C_PLAYING},
    widgets::pane_chrome::{pane_chrome, placeholder, Badge},
};

const SESSION_BOX_H: u16 = 8;

pub struct NowPlaying;

impl NowPlaying {
    pub fn new() -> Self {
        Self
    }

    /// Station shown in the details box.
    pub fn detail_station(state: &AppState) -> Option<&Station> {
        state
            .playback
            .active_station
            .as_ref()
            .or_else(|| state.selected_station())
    }

    fn session_lines(state: &AppState) -> Vec<Line<'_>> {
        let playback = &state.playback;
        let Some(station) = playback.active_station.as_ref() else {
            return vec![placeholder("No station selected")];
        };

        let status_style = if playback.state == PlayerState::Error {
            Style::default().fg(C_ERROR)
        } else {
            Style::default().fg(state_color(playback.state))
        };

        let mut lines = vec![
            Line::from(Span::styled(format!("♪ {}", station.name), style_accent())),
            Line::from(vec![
                Span::styled("Genre: ", style_secondary()),
                Span::styled(station.genre.as_str(), Style::default().fg(C_GENRE)),
            ]),
            Line::from(vec![
                Span::styled("Status: ", style_secondary()),
                Span::styled(playback.status_line(), status_style),
            ]),
        ];

        if playback.state == PlayerState::Playing {
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("♫ Now Playing: ", style_secondary()),
                Span::styled(
                    playback.now_playing_label(),
                    Style::default().fg(C_PLAYING).add_modifier(Modifier::BOLD),
                ),
            ]));
        }
        lines
    }

    fn detail_lines(station: &Station) -> Vec<Line<'_>> {
        vec![
            Line::from(Span::styled(
                station.name.as_str(),
                style_default().add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::styled("Genre: ", style_secondary()),
                Span::styled(station.genre.as_str(), Style::default().fg(C_GENRE)),
            ]),
            Line::from(""),
            Line::from(Span::styled("Description:", style_secondary())),
            Line::from(Span::styled(station.description.as_str(), style_default())),
            Line::from(""),
            Line::from(Span::styled("Stream URL:", style_secondary())),
            Line::from(Span::styled(station.url.as_str(), style_default())),
        ]
    }
}

impl Component for NowPlaying {
    fn id(&self) -> ComponentId {
        ComponentId::NowPlaying
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(SESSION_BOX_H), Constraint::Min(0)])
            .split(area);

        let playback_state = state.playback.state;
        let badge = (playback_state != PlayerState::Stopped).then(|| Badge {
            text: playback_state.label(),
            color: state_color(playback_state),
        });
        let session_block = pane_chrome("now playing", None, badge);
        frame.render_widget(
            Paragraph::new(Self::session_lines(state))
                .block(session_block)
                .wrap(Wrap { trim: false }),
            chunks[0],
        );

        let details_block = pane_chrome("station", None, None);
        let details = match Self::detail_station(state) {
            Some(station) => Self::detail_lines(station),
            None => vec![placeholder("Select a station to see details")],
        };
        frame.render_widget(
            Paragraph::new(details)
                .block(details_block)
                .wrap(Wrap { trim: false }),
            chunks[1],
        );
    }

    fn min_height(&self) -> u16 {
        SESSION_BOX_H + 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use radiohub_core::Catalog;

    fn text(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_session_without_station() {
        let state = AppState::new(Catalog::builtin());
        assert_eq!(text(&NowPlaying::session_lines(&state)), "No station selected");
    }

    #[test]
    fn test_session_error_shows_detail() {
        let mut state = AppState::new(Catalog::builtin());
        state.playback.state = PlayerState::Error;
        state.playback.active_station = state.catalog.get(2).cloned();
        state.playback.error_detail = "failed to start mpv: not found (make sure it is installed)".into();

        let out = text(&NowPlaying::session_lines(&state));
        assert!(out.contains("Status: Error: failed to start mpv"), "{out}");
        assert!(!out.contains("Now Playing"));
    }

    #[test]
    fn test_session_playing_shows_track() {
        let mut state = AppState::new(Catalog::builtin());
        state.playback.state = PlayerState::Playing;
        state.playback.active_station = state.catalog.get(0).cloned();
        state.playback.now_playing = Some("Ocean Waves - Ambient Collective".into());

        let out = text(&NowPlaying::session_lines(&state));
        assert!(out.starts_with("♪ Groove Salad"), "{out}");
        assert!(out.contains("Status: Playing"));
        assert!(out.contains("♫ Now Playing: Ocean Waves - Ambient Collective"));
    }

    #[test]
    fn test_details_follow_active_then_selection() {
        let mut state = AppState::new(Catalog::builtin());
        state.selected = Some(3);
        assert_eq!(
            NowPlaying::detail_station(&state).map(|s| s.name.clone()),
            state.catalog.get(3).map(|s| s.name.clone())
        );

        state.playback.active_station = state.catalog.get(0).cloned();
        assert_eq!(
            NowPlaying::detail_station(&state).map(|s| s.name.as_str()),
            Some("Groove Salad")
        );
    }
}
