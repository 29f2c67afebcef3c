use thiserror::Error;

/// Failure turning a station locator into a playable stream URL.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("failed to fetch playlist {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("no stream URL found in playlist {url}")]
    NoStreamEntry { url: String },

    #[error("invalid stream entry '{entry}' in playlist {url}")]
    InvalidEntry { url: String, entry: String },
}

/// Everything that can move a play attempt into the `Error` state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlaybackError {
    #[error(transparent)]
    Resolution(#[from] ResolveError),

    #[error("failed to start {program}: {reason} (make sure it is installed)")]
    ProcessStart { program: String, reason: String },
}
