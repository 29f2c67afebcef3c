use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::platform;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub now_playing: NowPlayingConfig,
    #[serde(default)]
    pub stations: StationsConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// External player invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Program name (looked up beside the exe, then on PATH) or full path.
    #[serde(default = "default_binary")]
    pub binary: String,
    /// Flags passed before the stream URL.
    #[serde(default = "default_player_args")]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Upper bound for fetching a `.pls` pointer file.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NowPlayingConfig {
    /// How often the simulated track label is refreshed while playing.
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,
    /// How long each simulated track "lasts".
    #[serde(default = "default_rotate_secs")]
    pub rotate_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StationsConfig {
    /// Optional TOML station file replacing the built-in list.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Animation tick for the subtitle wave.
    #[serde(default = "default_tick_millis")]
    pub tick_millis: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            args: default_player_args(),
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for NowPlayingConfig {
    fn default() -> Self {
        Self {
            refresh_secs: default_refresh_secs(),
            rotate_secs: default_rotate_secs(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_millis: default_tick_millis(),
        }
    }
}

fn default_binary() -> String {
    "mpv".to_string()
}

fn default_player_args() -> Vec<String> {
    ["--no-video", "--no-terminal", "--really-quiet"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_refresh_secs() -> u64 {
    30
}

fn default_rotate_secs() -> u64 {
    180
}

fn default_tick_millis() -> u64 {
    1000
}

impl ResolverConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl NowPlayingConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_secs.max(1))
    }

    pub fn rotate_interval(&self) -> Duration {
        Duration::from_secs(self.rotate_secs.max(1))
    }
}

impl UiConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_millis.max(50))
    }
}

impl Config {
    /// Load from the default location.  A missing file yields defaults; the
    /// file is never written back.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.player.binary, "mpv");
        assert_eq!(
            config.player.args,
            vec!["--no-video", "--no-terminal", "--really-quiet"]
        );
        assert_eq!(config.resolver.timeout(), Duration::from_secs(10));
        assert_eq!(config.now_playing.refresh_interval(), Duration::from_secs(30));
        assert_eq!(config.now_playing.rotate_interval(), Duration::from_secs(180));
        assert!(config.stations.file.is_none());
        assert!(Config::config_path().ends_with("radiohub/config.toml"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
[player]
binary = "/usr/local/bin/mpv"

[now_playing]
refresh_secs = 5
"#,
        )
        .unwrap();
        assert_eq!(config.player.binary, "/usr/local/bin/mpv");
        assert_eq!(config.player.args.len(), 3);
        assert_eq!(config.now_playing.refresh_secs, 5);
        assert_eq!(config.now_playing.rotate_secs, 180);
        assert_eq!(config.resolver.timeout_secs, 10);
    }

    #[test]
    fn test_missing_file_is_default_and_not_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.player.binary, "mpv");
        assert!(!path.exists());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[stations]\nfile = \"/tmp/stations.toml\"\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(
            config.stations.file.as_deref(),
            Some(Path::new("/tmp/stations.toml"))
        );
    }

    #[test]
    fn test_invalid_toml_is_error() {
        assert!(Config::from_toml_str("[player\nbinary=").is_err());
    }

    #[test]
    fn test_zero_durations_are_clamped() {
        let config = Config::from_toml_str("[resolver]\ntimeout_secs = 0\n").unwrap();
        assert_eq!(config.resolver.timeout(), Duration::from_secs(1));
    }
}
