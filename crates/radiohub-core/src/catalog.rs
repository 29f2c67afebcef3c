//! Station catalog — the immutable list of stations shown in the UI.
//!
//! Built once at startup, either from the built-in list or from a user TOML
//! file with `[[station]]` tables.  Never mutated afterwards.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    pub name: String,
    /// Stream locator: a direct stream URL or a `.pls` pointer file.
    pub url: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub description: String,
}

impl Station {
    pub fn new(name: &str, url: &str, genre: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            genre: genre.to_string(),
            description: description.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    stations: Vec<Station>,
}

/// Matches the TOML `[[station]]` table layout.
#[derive(Debug, Deserialize)]
struct TomlStationFile {
    #[serde(default)]
    station: Vec<Station>,
}

impl Catalog {
    pub fn new(stations: Vec<Station>) -> Self {
        Self { stations }
    }

    /// The stations shipped with the binary.
    pub fn builtin() -> Self {
        let s = Station::new;
        Self::new(vec![
            s(
                "Groove Salad",
                "https://ice1.somafm.com/groovesalad-128-mp3",
                "Downtempo",
                "Chilled ambient/downtempo beats and grooves",
            ),
            s(
                "Drone Zone",
                "https://ice1.somafm.com/dronezone-128-mp3",
                "Ambient",
                "Deep ambient soundscapes for meditation",
            ),
            s(
                "Lush",
                "https://ice1.somafm.com/lush-128-mp3",
                "Dream Pop",
                "Sensuous vocals with electronic influence",
            ),
            s(
                "Space Station",
                "https://ice1.somafm.com/spacestation-128-mp3",
                "Space Ambient",
                "Spaced-out ambient electronica",
            ),
            s(
                "Fluid",
                "https://ice1.somafm.com/fluid-128-mp3",
                "Future Soul",
                "Instrumental hiphop and liquid trap",
            ),
            s(
                "Beat Blender",
                "https://ice1.somafm.com/beatblender-128-mp3",
                "Deep House",
                "Late night deep-house and downtempo chill",
            ),
            s(
                "Vaporwaves",
                "https://ice1.somafm.com/vaporwaves-128-mp3",
                "Vaporwave",
                "Aesthetic vaporwave and future funk",
            ),
            s(
                "Underground 80s",
                "https://ice1.somafm.com/u80s-128-mp3",
                "Synthpop",
                "Early 80s UK synthpop and new wave",
            ),
            s(
                "DEF CON Radio",
                "https://ice1.somafm.com/defcon-128-mp3",
                "Hacker",
                "Music for hacking - DEF CON vibes",
            ),
            s(
                "Secret Agent",
                "https://ice1.somafm.com/secretagent-128-mp3",
                "Spy Jazz",
                "The soundtrack for your stylish life",
            ),
            s(
                "Plaza Radio",
                "https://radio.plaza.one/ogg",
                "Vaporwave",
                "24/7 vaporwave, synthwave, and aesthetic",
            ),
            s(
                "Bassdrive DNB",
                "http://bassdrive.com/bassdrive3.m3u",
                "Drum & Bass",
                "World's largest drum & bass station",
            ),
            s(
                "ChillHop Radio",
                "http://stream.laut.fm/chillhop",
                "Lofi Hip Hop",
                "24/7 chillhop and lofi hip hop beats",
            ),
            s(
                "Deep Space One",
                "https://ice1.somafm.com/deepspaceone-128-mp3",
                "Space Music",
                "Deep ambient electronic space music",
            ),
            s(
                "Boot Liquor",
                "https://ice1.somafm.com/bootliquor-128-mp3",
                "Americana",
                "Roots music for cowpokes and indie rockers",
            ),
            s(
                "Cliqhop IDM",
                "https://ice1.somafm.com/cliqhop-128-mp3",
                "IDM",
                "Blips, beeps and clicks of intelligent dance",
            ),
            s(
                "The Trip",
                "https://ice1.somafm.com/thetrip-128-mp3",
                "Psychedelic",
                "Progressive rock and trippy experimental music",
            ),
            s(
                "Seven Inch Soul",
                "https://ice1.somafm.com/7soul-128-mp3",
                "Soul/R&B",
                "Vintage soul tracks from original 45 RPM vinyl",
            ),
            s(
                "Metal Detector",
                "https://ice1.somafm.com/metal-128-mp3",
                "Metal",
                "From black to doom, thrash to post-metal",
            ),
            s(
                "Folk Forward",
                "https://ice1.somafm.com/folkfwd-128-mp3",
                "Folk",
                "Indie folk, alt-folk and folk classics",
            ),
        ])
    }

    pub fn load_toml(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let file: TomlStationFile = toml::from_str(content)?;
        if file.station.is_empty() {
            anyhow::bail!("station file contains no [[station]] entries");
        }
        Ok(Self::new(file.station))
    }

    /// All stations in insertion order.
    pub fn list_all(&self) -> &[Station] {
        &self.stations
    }

    /// Stations whose genre equals `genre` exactly, in catalog order.
    pub fn filter_by_genre(&self, genre: &str) -> Vec<Station> {
        self.stations
            .iter()
            .filter(|s| s.genre == genre)
            .cloned()
            .collect()
    }

    pub fn distinct_genres(&self) -> BTreeSet<String> {
        self.stations.iter().map(|s| s.genre.clone()).collect()
    }

    pub fn genre_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for station in &self.stations {
            *counts.entry(station.genre.clone()).or_insert(0) += 1;
        }
        counts
    }

    pub fn get(&self, idx: usize) -> Option<&Station> {
        self.stations.get(idx)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn random_index(&self) -> Option<usize> {
        use rand::Rng;

        if self.stations.is_empty() {
            return None;
        }
        Some(rand::thread_rng().gen_range(0..self.stations.len()))
    }
}
