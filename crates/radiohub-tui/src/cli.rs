//! Command-line flags and the `--list` catalog printout.

use std::fmt::Write as _;
use std::path::PathBuf;

use clap::Parser;
use radiohub_core::Catalog;

#[derive(Parser, Debug)]
#[command(name = "radiohub")]
#[command(about = "Terminal internet radio player")]
#[command(version)]
pub struct Cli {
    /// Print the station catalog grouped by genre and exit
    #[arg(long)]
    pub list: bool,

    /// Start with the station list filtered to this genre
    #[arg(long, value_name = "GENRE")]
    pub genre: Option<String>,

    /// Player binary to launch instead of the configured one
    #[arg(long, value_name = "PATH")]
    pub player: Option<String>,

    /// TOML file with [[station]] entries, replacing the built-in list
    #[arg(long, value_name = "FILE")]
    pub stations: Option<PathBuf>,

    /// Config file to read instead of the default location
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Only look for the player on PATH, never next to the executable
    #[arg(long)]
    pub use_system_deps: bool,
}

/// Genre summary followed by the numbered station list.
pub fn catalog_listing(catalog: &Catalog) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} stations", catalog.len());
    for (genre, count) in catalog.genre_counts() {
        let _ = writeln!(out, "  {:<20} {}", genre, count);
    }
    let _ = writeln!(out);
    for (i, station) in catalog.list_all().iter().enumerate() {
        let _ = writeln!(out, "{:>3}. {} ({})", i + 1, station.name, station.genre);
        let _ = writeln!(out, "     {}", station.url);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::parse_from([
            "radiohub",
            "--genre",
            "Ambient",
            "--player",
            "/opt/mpv/bin/mpv",
            "--use-system-deps",
        ]);
        assert_eq!(cli.genre.as_deref(), Some("Ambient"));
        assert_eq!(cli.player.as_deref(), Some("/opt/mpv/bin/mpv"));
        assert!(cli.use_system_deps);
        assert!(!cli.list);
        assert!(cli.stations.is_none());
    }

    #[test]
    fn test_listing_has_counts_and_entries() {
        let listing = catalog_listing(&Catalog::builtin());
        assert!(listing.starts_with("20 stations\n"));
        assert!(listing.contains("  Vaporwave            2\n"));
        assert!(listing.contains("  1. Groove Salad (Downtempo)\n"));
        assert!(listing.contains(" 20. Folk Forward"));
    }
}
