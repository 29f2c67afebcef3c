//! App — component-based event loop.
//!
//! - `App` owns all components and `AppState` (shared read-only data for components).
//! - A `tokio::mpsc` channel carries `AppMessage` events in from background tasks.
//! - The event loop draws a frame when something changed, then awaits the next
//!   message or timer.
//! - Components return `Vec<Action>`; App dispatches each Action.
//! - Playback goes through `PlaybackController`, whose session is polled into
//!   `AppState::playback` on every poll tick.

use std::io;
use std::path::Path;
use std::time::Duration;

use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use radiohub_core::{Catalog, PlaybackController};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    components::{
        header::Header, help_overlay::HelpOverlay, now_playing::NowPlaying,
        station_list::StationList,
    },
    widgets::status_bar,
};

// ── Internal event bus ────────────────────────────────────────────────────────

enum AppMessage {
    Event(Event),
    Log(String),
}

/// How often the controller session is copied into `AppState`.
const POLL_INTERVAL: Duration = Duration::from_millis(200);
/// How long the input thread blocks before checking whether the app is gone.
const INPUT_POLL: Duration = Duration::from_millis(250);

type Backend = CrosstermBackend<io::Stdout>;

pub struct App {
    controller: PlaybackController,
    state: AppState,

    header: Header,
    station_list: StationList,
    now_playing: NowPlaying,
    help_overlay: HelpOverlay,

    tick_interval: Duration,
    should_quit: bool,
}

impl App {
    pub fn new(
        controller: PlaybackController,
        catalog: Catalog,
        genre_filter: Option<String>,
        tick_interval: Duration,
        log_path: &Path,
    ) -> Self {
        let mut state = AppState::new(catalog);
        state.genre_filter = genre_filter;
        state.push_log(format!("radiohub started, log at {}", log_path.display()));

        let station_list = StationList::new(&state);
        state.selected = station_list.list.selected_original_index();

        Self {
            controller,
            state,
            header: Header::new(),
            station_list,
            now_playing: NowPlaying::new(),
            help_overlay: HelpOverlay::new(),
            tick_interval,
            should_quit: false,
        }
    }

    pub async fn run(mut self, log_rx: mpsc::UnboundedReceiver<String>) -> anyhow::Result<()> {
        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let result = self.event_loop(&mut terminal, log_rx).await;

        // ── Teardown ──────────────────────────────────────────────────────────
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<Backend>,
        mut log_rx: mpsc::UnboundedReceiver<String>,
    ) -> anyhow::Result<()> {
        let (tx, mut rx) = mpsc::channel::<AppMessage>(256);

        // ── Background task: keyboard events ──────────────────────────────────
        let event_tx = tx.clone();
        tokio::task::spawn_blocking(move || loop {
            if event_tx.is_closed() {
                break;
            }
            match event::poll(INPUT_POLL) {
                Ok(true) => match event::read() {
                    Ok(ev) => {
                        if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => break,
                },
                Ok(false) => {}
                Err(_) => break,
            }
        });

        // ── Background task: forwarded log lines ──────────────────────────────
        let log_tx = tx.clone();
        tokio::spawn(async move {
            while let Some(line) = log_rx.recv().await {
                if log_tx.send(AppMessage::Log(line)).await.is_err() {
                    break;
                }
            }
        });
        drop(tx);

        // ── Periodic timers ───────────────────────────────────────────────────
        let mut ui_tick = tokio::time::interval(self.tick_interval);
        ui_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut poll_tick = tokio::time::interval(POLL_INTERVAL);
        poll_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                msg = rx.recv() => {
                    let Some(msg) = msg else { break };
                    needs_redraw = self.handle_message(msg);
                }

                _ = ui_tick.tick() => {
                    let tick_actions: Vec<Action> = {
                        let s = &self.state;
                        let mut all = Vec::new();
                        all.extend(self.header.tick(s));
                        all.extend(self.station_list.tick(s));
                        all.extend(self.now_playing.tick(s));
                        all.extend(self.help_overlay.tick(s));
                        all
                    };
                    for action in tick_actions {
                        self.dispatch(action);
                    }
                    needs_redraw = true;
                }

                _ = poll_tick.tick() => {
                    needs_redraw = self.refresh_playback();
                }
            }
        }

        Ok(())
    }

    /// Returns true when a redraw is needed.
    fn handle_message(&mut self, msg: AppMessage) -> bool {
        match msg {
            AppMessage::Event(Event::Key(key)) => {
                for action in self.handle_key(key) {
                    self.dispatch(action);
                }
                self.refresh_playback();
                true
            }
            AppMessage::Event(Event::Resize(..)) => true,
            AppMessage::Event(_) => false,
            AppMessage::Log(line) => {
                self.state.push_log(line);
                true
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return vec![Action::Quit];
        }

        // Help overlay captures all keys when visible
        if self.help_overlay.visible {
            return self.help_overlay.handle_key(key, &self.state);
        }

        match key.code {
            KeyCode::Char('q') => vec![Action::Quit],
            KeyCode::Char('?') => vec![Action::ToggleHelp],
            KeyCode::Char('t') => vec![Action::Toggle],
            KeyCode::Char('s') => vec![Action::Stop],
            KeyCode::Char('r') => vec![Action::Random],
            KeyCode::Char('g') => vec![Action::SetGenre(self.state.next_genre())],
            KeyCode::Char('l') => vec![Action::CycleLogo],
            _ => self.station_list.handle_key(key, &self.state),
        }
    }

    fn dispatch(&mut self, action: Action) {
        // Broadcast to components first so they can react (filters, overlay, logo)
        let secondary: Vec<(ComponentId, Action)> = {
            let s = &self.state;
            let components: [&mut dyn Component; 4] = [
                &mut self.header,
                &mut self.station_list,
                &mut self.now_playing,
                &mut self.help_overlay,
            ];
            let mut out = Vec::new();
            for c in components {
                let id = c.id();
                out.extend(c.on_action(&action, s).into_iter().map(|a| (id, a)));
            }
            out
        };

        self.apply_action(action);

        // Secondary actions are applied at app level only (depth-limited to 1)
        for (from, a) in secondary {
            debug!("secondary action from {:?}", from);
            self.apply_action(a);
        }
    }

    fn apply_action(&mut self, action: Action) {
        debug!("apply_action: {:?}", action);
        match action {
            // ── Playback ──────────────────────────────────────────────────────
            Action::Play(idx) => {
                if let Some(station) = self.state.catalog.get(idx).cloned() {
                    self.state.selected = Some(idx);
                    self.controller.play(station);
                }
            }
            Action::Stop => self.controller.stop(),
            Action::Toggle => self.controller.toggle(),
            Action::Random => {
                let Some(idx) = self.state.catalog.random_index() else {
                    return;
                };
                let hidden = match (&self.state.genre_filter, self.state.catalog.get(idx)) {
                    (Some(genre), Some(station)) => station.genre != *genre,
                    _ => false,
                };
                if hidden {
                    self.dispatch(Action::SetGenre(None));
                }
                self.dispatch(Action::Select(idx));
                self.dispatch(Action::Play(idx));
            }

            // ── Navigation ────────────────────────────────────────────────────
            Action::Select(idx) => self.state.selected = Some(idx),
            Action::SetGenre(genre) => {
                info!("genre filter: {}", genre.as_deref().unwrap_or("all"));
                self.state.genre_filter = genre;
            }

            // ── System ────────────────────────────────────────────────────────
            Action::Quit => {
                self.controller.stop();
                self.should_quit = true;
            }

            // Handled by the components themselves
            Action::CycleLogo | Action::ToggleHelp => {}
        }
    }

    /// Copy the controller session into AppState.  Returns true if it changed.
    fn refresh_playback(&mut self) -> bool {
        let snapshot = self.controller.snapshot();
        if snapshot == self.state.playback {
            return false;
        }
        if snapshot.state != self.state.playback.state {
            debug!(
                "playback: {:?} → {:?}",
                self.state.playback.state, snapshot.state
            );
        }
        self.state.playback = snapshot;
        true
    }

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        use crate::theme::C_BG;
        use ratatui::widgets::Block;
        let area = frame.area();

        frame.render_widget(
            Block::default().style(ratatui::style::Style::default().bg(C_BG)),
            area,
        );

        // ── Outer layout: body | keys bar | log bar ───────────────────────────
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(area);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(outer[0]);

        self.draw_left(frame, body[0]);
        self.now_playing.draw(frame, body[1], &self.state);

        status_bar::draw_keys_bar(frame, outer[1], self.state.genre_filter.as_deref());
        status_bar::draw_log_bar(frame, outer[2], self.state.last_log(), &self.state.playback);

        // ── Help overlay (on top of everything) ──────────────────────────────
        self.help_overlay.draw(frame, area, &self.state);
    }

    fn draw_left(&mut self, frame: &mut ratatui::Frame, area: Rect) {
        // Drop the logo before squeezing the list below its minimum.
        let header_h = self.header.min_height();
        let header_h = if area.height >= header_h + self.station_list.min_height() {
            header_h
        } else {
            0
        };

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(header_h), Constraint::Min(0)])
            .split(area);

        if header_h > 0 {
            self.header.draw(frame, left[0], &self.state);
        }
        self.station_list.draw(frame, left[1], &self.state);
    }
}
