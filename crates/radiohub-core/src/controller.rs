//! PlaybackController — single owner of the playback session.
//!
//! The UI calls `play` / `stop` / `toggle` and polls the accessors every
//! frame.  Everything slow (playlist resolution, process start, waiting for
//! the player to exit, label refresh) runs on background tasks that write
//! their result back into the session under one mutex.
//!
//! Every `play` and `stop` bumps `generation`.  Background tasks carry the
//! generation they were started for and only touch the session while it still
//! matches, so a late result from a superseded session is dropped instead of
//! clobbering the newer one.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::catalog::Station;
use crate::config::Config;
use crate::error::PlaybackError;
use crate::now_playing::NowPlayingRefresher;
use crate::process::{ExitReport, ManagedProcess, MpvLauncher, ProcessLauncher, SpawnedProcess};
use crate::resolver::StreamResolver;
use crate::state::{PlaybackSnapshot, PlayerState, NOW_PLAYING_PLACEHOLDER};

#[derive(Default)]
struct Session {
    state: PlayerState,
    active_station: Option<Station>,
    error_detail: String,
    /// Present only while `Playing`.
    process: Option<Box<dyn ManagedProcess>>,
    now_playing: Option<String>,
    generation: u64,
    refresher: Option<CancellationToken>,
    shut_down: bool,
}

impl Session {
    /// Kill the player and cancel the refresher.  Leaves state fields alone.
    fn release(&mut self) {
        if let Some(mut process) = self.process.take() {
            debug!("session: killing player pid={:?}", process.id());
            process.kill();
        }
        if let Some(token) = self.refresher.take() {
            token.cancel();
        }
        self.now_playing = None;
    }

    fn set_state(&mut self, state: PlayerState) {
        if self.state != state {
            info!(
                "PlaybackController: status {:?} → {:?} (gen={})",
                self.state, state, self.generation
            );
            self.state = state;
        }
    }

    fn fail(&mut self, err: PlaybackError) {
        warn!("PlaybackController: play failed: {}", err);
        self.release();
        self.error_detail = err.to_string();
        self.set_state(PlayerState::Error);
    }

    fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            state: self.state,
            active_station: self.active_station.clone(),
            error_detail: self.error_detail.clone(),
            now_playing: self.now_playing.clone(),
        }
    }
}

struct Inner {
    session: Mutex<Session>,
    resolver: StreamResolver,
    launcher: Arc<dyn ProcessLauncher>,
    refresher: NowPlayingRefresher,
    runtime: Handle,
}

/// Cheaply cloneable handle; all clones share one session.
#[derive(Clone)]
pub struct PlaybackController {
    inner: Arc<Inner>,
}

impl PlaybackController {
    /// Build the production controller (HTTP resolver + mpv launcher).
    /// Must be called from within a tokio runtime.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let resolver = StreamResolver::http(config.resolver.timeout())?;
        let launcher = MpvLauncher::new(&config.player);
        info!(
            "PlaybackController: player binary {}",
            launcher.program().display()
        );
        Ok(Self::with_parts(
            resolver,
            Arc::new(launcher),
            NowPlayingRefresher::from_config(&config.now_playing),
            Handle::try_current()?,
        ))
    }

    pub fn with_parts(
        resolver: StreamResolver,
        launcher: Arc<dyn ProcessLauncher>,
        refresher: NowPlayingRefresher,
        runtime: Handle,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                session: Mutex::new(Session::default()),
                resolver,
                launcher,
                refresher,
                runtime,
            }),
        }
    }

    // ── commands ──────────────────────────────────────────────────────────────

    /// Supersede any current session and start playing `station`.
    ///
    /// Returns immediately; the outcome shows up in `state()`.
    pub fn play(&self, station: Station) {
        let generation = {
            let mut session = self.inner.lock();
            if session.shut_down {
                warn!("PlaybackController: play '{}' after shutdown ignored", station.name);
                return;
            }
            session.release();
            session.generation += 1;
            session.error_detail.clear();
            session.active_station = Some(station.clone());
            session.set_state(PlayerState::Loading);
            session.generation
        };

        info!("Playing station: {} ({})", station.name, station.url);
        let inner = Arc::clone(&self.inner);
        self.inner
            .runtime
            .spawn(async move { inner.run_session(generation, station).await });
    }

    /// Stop playback.  A no-op when already stopped.
    pub fn stop(&self) {
        let mut session = self.inner.lock();
        if session.state == PlayerState::Stopped && session.active_station.is_none() {
            return;
        }
        info!("Stopping playback");
        session.release();
        session.generation += 1;
        session.active_station = None;
        session.error_detail.clear();
        session.set_state(PlayerState::Stopped);
    }

    /// Stop when playing, otherwise replay the active station (if any).
    pub fn toggle(&self) {
        let (state, station) = {
            let session = self.inner.lock();
            (session.state, session.active_station.clone())
        };
        if state == PlayerState::Playing {
            self.stop();
        } else if let Some(station) = station {
            self.play(station);
        }
    }

    /// Stop for good; later `play` calls are ignored.
    pub fn shutdown(&self) {
        let mut session = self.inner.lock();
        info!("PlaybackController: shutdown");
        session.release();
        session.generation += 1;
        session.active_station = None;
        session.error_detail.clear();
        session.set_state(PlayerState::Stopped);
        session.shut_down = true;
    }

    // ── accessors ─────────────────────────────────────────────────────────────

    pub fn state(&self) -> PlayerState {
        self.inner.lock().state
    }

    pub fn active_station(&self) -> Option<Station> {
        self.inner.lock().active_station.clone()
    }

    pub fn error_detail(&self) -> String {
        self.inner.lock().error_detail.clone()
    }

    pub fn now_playing_label(&self) -> String {
        self.inner
            .lock()
            .now_playing
            .clone()
            .unwrap_or_else(|| NOW_PLAYING_PLACEHOLDER.to_string())
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.inner.lock().snapshot()
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn run_session(self: Arc<Self>, generation: u64, station: Station) {
        let resolved = self.resolver.resolve(&station.url).await;
        let Some((token, exited)) = self.start_player(generation, resolved) else {
            return;
        };

        let weak = Arc::downgrade(&self);
        self.refresher
            .spawn(&self.runtime, token, move |title| {
                publish_label(&weak, generation, title)
            });

        self.watch_exit(generation, exited).await;
    }

    /// Apply the resolution result and, if still current, launch the player.
    ///
    /// The launch happens under the session lock after the generation check,
    /// so a superseded session can never leave a process behind.
    fn start_player(
        &self,
        generation: u64,
        resolved: Result<String, crate::error::ResolveError>,
    ) -> Option<(CancellationToken, oneshot::Receiver<ExitReport>)> {
        let mut session = self.lock();
        if session.generation != generation {
            debug!(
                "PlaybackController: dropping stale resolution (gen={} current={})",
                generation, session.generation
            );
            return None;
        }

        let stream_url = match resolved {
            Ok(url) => url,
            Err(e) => {
                session.fail(e.into());
                return None;
            }
        };

        match self.launcher.start(&stream_url) {
            Ok(SpawnedProcess { process, exited }) => {
                let token = CancellationToken::new();
                session.process = Some(process);
                session.refresher = Some(token.clone());
                session.set_state(PlayerState::Playing);
                Some((token, exited))
            }
            Err(e) => {
                session.fail(e);
                None
            }
        }
    }

    async fn watch_exit(&self, generation: u64, exited: oneshot::Receiver<ExitReport>) {
        let report = match exited.await {
            Ok(report) => report,
            Err(_) => {
                debug!("PlaybackController: exit channel closed (gen={})", generation);
                return;
            }
        };

        let mut session = self.lock();
        if session.generation != generation || session.state != PlayerState::Playing {
            debug!(
                "PlaybackController: ignoring exit of superseded player (gen={} current={}): {}",
                generation,
                session.generation,
                report.summary()
            );
            return;
        }

        warn!(
            "PlaybackController: player exited on its own: {}",
            report.summary()
        );
        session.process = None;
        if let Some(token) = session.refresher.take() {
            token.cancel();
        }
        session.now_playing = None;
        // Station is kept so toggle() can restart it.
        session.set_state(PlayerState::Stopped);
    }
}

fn publish_label(inner: &Weak<Inner>, generation: u64, title: String) -> bool {
    let Some(inner) = inner.upgrade() else {
        return false;
    };
    let mut session = inner.lock();
    if session.generation != generation || session.state != PlayerState::Playing {
        return false;
    }
    if session.now_playing.as_deref() != Some(title.as_str()) {
        debug!("now-playing: {}", title);
        session.now_playing = Some(title);
    }
    true
}
