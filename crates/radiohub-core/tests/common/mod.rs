//! Test doubles for the playback controller: a scripted playlist fetcher and
//! an in-memory process launcher.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use radiohub_core::error::PlaybackError;
use radiohub_core::now_playing::NowPlayingRefresher;
use radiohub_core::process::{ExitReport, ManagedProcess, ProcessLauncher, SpawnedProcess};
use radiohub_core::resolver::{PlaylistFetcher, StreamResolver};
use radiohub_core::{PlaybackController, Station};
use tokio::sync::{oneshot, Semaphore};

// ── fetcher ───────────────────────────────────────────────────────────────────

/// Serves canned playlist bodies.  A URL can be gated so its fetch blocks
/// until `open()` is called, which lets tests order concurrent sessions.
#[derive(Default)]
pub struct ScriptedFetcher {
    bodies: Mutex<HashMap<String, Result<String, String>>>,
    gates: Mutex<HashMap<String, Arc<Semaphore>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn serve(&self, url: &str, body: &str) {
        self.bodies
            .lock()
            .unwrap()
            .insert(url.to_string(), Ok(body.to_string()));
    }

    pub fn fail(&self, url: &str, reason: &str) {
        self.bodies
            .lock()
            .unwrap()
            .insert(url.to_string(), Err(reason.to_string()));
    }

    pub fn gate(&self, url: &str) {
        self.gates
            .lock()
            .unwrap()
            .insert(url.to_string(), Arc::new(Semaphore::new(0)));
    }

    pub fn open(&self, url: &str) {
        if let Some(gate) = self.gates.lock().unwrap().get(url) {
            gate.add_permits(1);
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlaylistFetcher for ScriptedFetcher {
    async fn fetch_text(&self, url: &str) -> anyhow::Result<String> {
        self.calls.lock().unwrap().push(url.to_string());
        let gate = self.gates.lock().unwrap().get(url).cloned();
        if let Some(gate) = gate {
            gate.acquire().await?.forget();
        }
        let body = self.bodies.lock().unwrap().get(url).cloned();
        match body {
            Some(Ok(body)) => Ok(body),
            Some(Err(reason)) => Err(anyhow::anyhow!(reason)),
            None => Err(anyhow::anyhow!("HTTP status client error (404 Not Found)")),
        }
    }
}

// ── launcher ──────────────────────────────────────────────────────────────────

type ExitSlot = Arc<Mutex<Option<oneshot::Sender<ExitReport>>>>;

struct Run {
    url: String,
    killed: Arc<AtomicBool>,
    exit: ExitSlot,
}

/// Records every start; each "process" stays alive until killed or
/// `finish()`ed by the test.
#[derive(Default)]
pub struct FakeLauncher {
    runs: Mutex<Vec<Run>>,
    fail_with: Option<String>,
}

impl FakeLauncher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing(reason: &str) -> Arc<Self> {
        Arc::new(Self {
            runs: Mutex::new(Vec::new()),
            fail_with: Some(reason.to_string()),
        })
    }

    pub fn started_urls(&self) -> Vec<String> {
        self.runs
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.url.clone())
            .collect()
    }

    pub fn start_count(&self) -> usize {
        self.runs.lock().unwrap().len()
    }

    pub fn was_killed(&self, idx: usize) -> bool {
        self.runs.lock().unwrap()[idx].killed.load(Ordering::SeqCst)
    }

    /// Simulate the player exiting by itself.
    pub fn finish(&self, idx: usize) {
        let slot = self.runs.lock().unwrap()[idx].exit.clone();
        let tx = slot.lock().unwrap().take();
        if let Some(tx) = tx {
            let _ = tx.send(ExitReport {
                code: Some(0),
                killed: false,
                detail: "exit status: 0".to_string(),
            });
        }
    }
}

impl ProcessLauncher for FakeLauncher {
    fn start(&self, stream_url: &str) -> Result<SpawnedProcess, PlaybackError> {
        if let Some(reason) = &self.fail_with {
            return Err(PlaybackError::ProcessStart {
                program: "fake-player".to_string(),
                reason: reason.clone(),
            });
        }
        let (tx, rx) = oneshot::channel();
        let killed = Arc::new(AtomicBool::new(false));
        let exit: ExitSlot = Arc::new(Mutex::new(Some(tx)));
        self.runs.lock().unwrap().push(Run {
            url: stream_url.to_string(),
            killed: killed.clone(),
            exit: exit.clone(),
        });
        Ok(SpawnedProcess {
            process: Box::new(FakeProcess { killed, exit }),
            exited: rx,
        })
    }
}

struct FakeProcess {
    killed: Arc<AtomicBool>,
    exit: ExitSlot,
}

impl ManagedProcess for FakeProcess {
    fn id(&self) -> Option<u32> {
        Some(4242)
    }

    fn kill(&mut self) {
        self.killed.store(true, Ordering::SeqCst);
        let tx = self.exit.lock().unwrap().take();
        if let Some(tx) = tx {
            let _ = tx.send(ExitReport {
                code: None,
                killed: true,
                detail: "signal: 9 (SIGKILL)".to_string(),
            });
        }
    }
}

impl Drop for FakeProcess {
    fn drop(&mut self) {
        self.kill();
    }
}

// ── helpers ───────────────────────────────────────────────────────────────────

pub const REFRESH: Duration = Duration::from_millis(10);

pub fn controller(
    fetcher: Arc<ScriptedFetcher>,
    launcher: Arc<dyn ProcessLauncher>,
) -> PlaybackController {
    PlaybackController::with_parts(
        StreamResolver::new(fetcher),
        launcher,
        NowPlayingRefresher::new(REFRESH, Duration::from_secs(180)),
        tokio::runtime::Handle::current(),
    )
}

pub fn station(name: &str, url: &str) -> Station {
    Station::new(name, url, "Ambient", "test station")
}

/// Poll `cond` until it holds or five seconds pass.
pub async fn wait_until(what: &str, cond: impl Fn() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !cond() {
        if Instant::now() > deadline {
            panic!("timed out waiting for {}", what);
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

/// Give background tasks a chance to (wrongly) act.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(60)).await;
}
