//! AppState — shared read-only data passed to all components during render/event.
//!
//! Components read this but never mutate it.
//! The App event-loop is the only thing that writes to AppState.

use radiohub_core::{Catalog, PlaybackSnapshot, Station};

const MAX_LOGS: usize = 200;

pub struct AppState {
    pub catalog: Catalog,
    /// Distinct genres, sorted; the `g` key cycles through these.
    pub genres: Vec<String>,
    pub genre_filter: Option<String>,

    /// Copy of the controller session, refreshed every poll tick.
    pub playback: PlaybackSnapshot,

    /// Catalog index of the station under the cursor.
    pub selected: Option<usize>,

    /// WARN/ERROR lines forwarded from tracing, plus app notices.
    pub logs: Vec<String>,
}

impl AppState {
    pub fn new(catalog: Catalog) -> Self {
        let genres = catalog.distinct_genres().into_iter().collect();
        let selected = if catalog.is_empty() { None } else { Some(0) };
        Self {
            catalog,
            genres,
            genre_filter: None,
            playback: PlaybackSnapshot::default(),
            selected,
            logs: Vec::new(),
        }
    }

    pub fn selected_station(&self) -> Option<&Station> {
        self.selected.and_then(|i| self.catalog.get(i))
    }

    /// True when the station under the cursor is the one playing.
    pub fn selected_is_playing(&self) -> bool {
        self.selected_station()
            .is_some_and(|station| self.playback.is_playing_station(station))
    }

    /// all → first genre → … → last genre → all
    pub fn next_genre(&self) -> Option<String> {
        match &self.genre_filter {
            None => self.genres.first().cloned(),
            Some(current) => {
                let pos = self.genres.iter().position(|g| g == current)?;
                self.genres.get(pos + 1).cloned()
            }
        }
    }

    pub fn push_log(&mut self, msg: String) {
        self.logs.push(msg);
        if self.logs.len() > MAX_LOGS {
            self.logs.remove(0);
        }
    }

    pub fn last_log(&self) -> Option<&str> {
        self.logs.last().map(String::as_str)
    }
}
