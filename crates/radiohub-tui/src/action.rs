//! Action enum — all user-initiated intents and internal events.

/// Unique identifier for a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    Header,
    StationList,
    NowPlaying,
    HelpOverlay,
}

/// All actions that can flow through the system.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ── Playback ─────────────────────────────────────────────────────────────
    Play(usize), // play station by catalog index
    Stop,
    Toggle,
    Random,

    // ── Navigation ───────────────────────────────────────────────────────────
    Select(usize),            // select station by catalog index
    SetGenre(Option<String>), // None = all genres

    // ── UI toggles ───────────────────────────────────────────────────────────
    CycleLogo,
    ToggleHelp,

    // ── System ───────────────────────────────────────────────────────────────
    Quit,
}
