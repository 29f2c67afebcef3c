use serde::{Deserialize, Serialize};

use crate::catalog::Station;

/// Shown by `now_playing_label` until the refresher has produced a title.
pub const NOW_PLAYING_PLACEHOLDER: &str = "Loading track info...";

/// Playback state as observed by the UI.
///
/// Transitions:
///   Stopped | Error | Playing --play--> Loading
///   Loading --resolved + started--> Playing
///   Loading --resolve/start failure--> Error
///   Playing --player exited--> Stopped
///   any --stop--> Stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerState {
    #[default]
    Stopped,
    Loading,
    Playing,
    Error,
}

impl PlayerState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Stopped => "Stopped",
            Self::Loading => "Loading...",
            Self::Playing => "Playing",
            Self::Error => "Error",
        }
    }
}

impl std::fmt::Display for PlayerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Consistent copy of the session, taken under a single lock.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackSnapshot {
    pub state: PlayerState,
    pub active_station: Option<Station>,
    pub error_detail: String,
    pub now_playing: Option<String>,
}

impl PlaybackSnapshot {
    pub fn now_playing_label(&self) -> &str {
        self.now_playing
            .as_deref()
            .unwrap_or(NOW_PLAYING_PLACEHOLDER)
    }

    /// Status line text, e.g. `Playing` or `Error: failed to start mpv ...`.
    pub fn status_line(&self) -> String {
        if self.state == PlayerState::Error && !self.error_detail.is_empty() {
            format!("{}: {}", self.state, self.error_detail)
        } else {
            self.state.to_string()
        }
    }

    pub fn is_playing_station(&self, station: &Station) -> bool {
        self.state == PlayerState::Playing && self.active_station.as_ref() == Some(station)
    }
}
