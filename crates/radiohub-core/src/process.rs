//! Managed subprocess — the narrow seam between the controller and the OS.
//!
//! ```text
//!   ProcessLauncher::start(url)
//!         │
//!         ├── ManagedProcess   ← kept by the session, kill() / drop terminates
//!         └── exited (oneshot) ← resolves once with an ExitReport
//! ```
//!
//! The real launcher wraps `tokio::process`; tests substitute a fake.

use std::path::PathBuf;
use std::process::Stdio;

use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::config::PlayerConfig;
use crate::error::PlaybackError;
use crate::platform;

/// How a player process ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitReport {
    /// Exit code, `None` when terminated by a signal or when waiting failed.
    pub code: Option<i32>,
    /// True when the exit was caused by our own `kill()`.
    pub killed: bool,
    pub detail: String,
}

impl ExitReport {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// One-line description for logs.
    pub fn summary(&self) -> String {
        if self.killed {
            format!("killed ({})", self.detail)
        } else if self.success() {
            "exited cleanly".to_string()
        } else if let Some(code) = self.code {
            format!("exit code {} ({})", code, self.detail)
        } else {
            self.detail.clone()
        }
    }
}

/// Handle to a running player.  Dropping it must terminate the process.
pub trait ManagedProcess: Send {
    fn id(&self) -> Option<u32>;

    /// Best-effort termination; does not wait for the process to exit.
    fn kill(&mut self);
}

pub struct SpawnedProcess {
    pub process: Box<dyn ManagedProcess>,
    pub exited: oneshot::Receiver<ExitReport>,
}

pub trait ProcessLauncher: Send + Sync {
    /// Start the player on `stream_url`.  Must not block; must be called from
    /// within a tokio runtime.
    fn start(&self, stream_url: &str) -> Result<SpawnedProcess, PlaybackError>;
}

/// Launches mpv (or whatever `[player]` configures) with audio-only flags.
pub struct MpvLauncher {
    program: PathBuf,
    display_name: String,
    args: Vec<String>,
}

impl MpvLauncher {
    pub fn new(config: &PlayerConfig) -> Self {
        let program = platform::find_binary(&config.binary).unwrap_or_else(|| {
            debug!("player binary '{}' not found, deferring to spawn", config.binary);
            PathBuf::from(&config.binary)
        });
        Self {
            program,
            display_name: config.binary.clone(),
            args: config.args.clone(),
        }
    }

    pub fn program(&self) -> &std::path::Path {
        &self.program
    }
}

impl ProcessLauncher for MpvLauncher {
    fn start(&self, stream_url: &str) -> Result<SpawnedProcess, PlaybackError> {
        let mut child = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .arg(stream_url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| PlaybackError::ProcessStart {
                program: self.display_name.clone(),
                reason: e.to_string(),
            })?;

        let pid = child.id();
        info!("player: started {} pid={:?}", self.program.display(), pid);

        let (kill_tx, mut kill_rx) = oneshot::channel::<()>();
        let (exit_tx, exit_rx) = oneshot::channel();

        tokio::spawn(async move {
            let (status, killed) = tokio::select! {
                status = child.wait() => (status, false),
                // Fires on an explicit kill() and when the handle is dropped.
                _ = &mut kill_rx => {
                    if let Err(e) = child.start_kill() {
                        debug!("player: start_kill pid={:?}: {}", pid, e);
                    }
                    (child.wait().await, true)
                }
            };
            let report = match status {
                Ok(status) => ExitReport {
                    code: status.code(),
                    killed,
                    detail: status.to_string(),
                },
                Err(e) => {
                    warn!("player: wait failed pid={:?}: {}", pid, e);
                    ExitReport {
                        code: None,
                        killed,
                        detail: e.to_string(),
                    }
                }
            };
            debug!("player: pid={:?} exited: {}", pid, report.detail);
            let _ = exit_tx.send(report);
        });

        Ok(SpawnedProcess {
            process: Box::new(ChildProcess {
                pid,
                kill_tx: Some(kill_tx),
            }),
            exited: exit_rx,
        })
    }
}

struct ChildProcess {
    pid: Option<u32>,
    kill_tx: Option<oneshot::Sender<()>>,
}

impl ManagedProcess for ChildProcess {
    fn id(&self) -> Option<u32> {
        self.pid
    }

    fn kill(&mut self) {
        if let Some(tx) = self.kill_tx.take() {
            debug!("player: killing pid={:?}", self.pid);
            let _ = tx.send(());
        }
    }
}


#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Duration;

    fn launcher(binary: &str, args: &[&str]) -> MpvLauncher {
        MpvLauncher::new(&PlayerConfig {
            binary: binary.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
        })
    }

    #[tokio::test]
    async fn test_missing_binary_is_start_error() {
        let l = launcher("radiohub-no-such-player", &[]);
        let err = l.start("http://x/stream").err().expect("spawn must fail");
        match err {
            PlaybackError::ProcessStart { program, reason } => {
                assert_eq!(program, "radiohub-no-such-player");
                assert!(!reason.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_natural_exit_is_reported() {
        // `true <url>` exits 0 immediately
        let l = launcher("true", &[]);
        let spawned = l.start("http://x/stream").unwrap();
        let report = tokio::time::timeout(Duration::from_secs(5), spawned.exited)
            .await
            .unwrap()
            .unwrap();
        assert!(report.success());
        assert!(!report.killed);
    }

    #[tokio::test]
    async fn test_kill_terminates() {
        // `sleep 30 <url>` would fail on the url arg, so pass the url as a
        // second duration-like argument via sh.
        let l = launcher("sh", &["-c", "sleep 30", "player"]);
        let mut spawned = l.start("http://x/stream").unwrap();
        assert!(spawned.process.id().is_some());
        spawned.process.kill();
        let report = tokio::time::timeout(Duration::from_secs(5), spawned.exited)
            .await
            .unwrap()
            .unwrap();
        assert!(report.killed);
        assert!(!report.success());
    }

    #[tokio::test]
    async fn test_drop_terminates() {
        let l = launcher("sh", &["-c", "sleep 30", "player"]);
        let spawned = l.start("http://x/stream").unwrap();
        let SpawnedProcess { process, exited } = spawned;
        drop(process);
        let report = tokio::time::timeout(Duration::from_secs(5), exited)
            .await
            .unwrap()
            .unwrap();
        assert!(report.killed);
    }
}
