//! Simulated "now playing" titles.
//!
//! Streams are not inspected for ICY metadata; instead a title is derived from
//! wall-clock time so it changes every `rotate` interval, and it is re-published
//! every `refresh` interval while the session is playing.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::NowPlayingConfig;

pub const SAMPLE_TITLES: [&str; 10] = [
    "Ambient Journey - Unknown Artist",
    "Chillwave Sunset - Synthmaster",
    "Lofi Dreams - Beat Producer",
    "Deep Space Meditation - Cosmic Sounds",
    "Retro Vibes - Synthwave Artist",
    "Study Session - Lofi Hip Hop",
    "Midnight Drive - Retrowave",
    "Ocean Waves - Ambient Collective",
    "City Lights - Electronic Dream",
    "Peaceful Mind - Meditation Music",
];

/// Title for a given unix timestamp.
pub fn title_at(unix_secs: i64, rotate: Duration) -> &'static str {
    let slot = unix_secs.max(0) as u64 / rotate.as_secs().max(1);
    SAMPLE_TITLES[(slot % SAMPLE_TITLES.len() as u64) as usize]
}

pub fn current_title(rotate: Duration) -> &'static str {
    title_at(chrono::Utc::now().timestamp(), rotate)
}

/// Periodic label publisher with an explicit cancellation token.
#[derive(Debug, Clone)]
pub struct NowPlayingRefresher {
    refresh: Duration,
    rotate: Duration,
}

impl NowPlayingRefresher {
    pub fn new(refresh: Duration, rotate: Duration) -> Self {
        Self { refresh, rotate }
    }

    pub fn from_config(config: &NowPlayingConfig) -> Self {
        Self::new(config.refresh_interval(), config.rotate_interval())
    }

    /// Publish immediately, then every `refresh`, until `token` is cancelled
    /// or `publish` returns `false` (the session moved on).
    pub fn spawn<F>(&self, handle: &Handle, token: CancellationToken, mut publish: F) -> JoinHandle<()>
    where
        F: FnMut(String) -> bool + Send + 'static,
    {
        let refresh = self.refresh;
        let rotate = self.rotate;
        handle.spawn(async move {
            let mut ticker = tokio::time::interval(refresh);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        debug!("now-playing: cancelled");
                        break;
                    }
                    _ = ticker.tick() => {
                        if !publish(current_title(rotate).to_string()) {
                            debug!("now-playing: session superseded");
                            break;
                        }
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_title_rotation() {
        let rotate = Duration::from_secs(180);
        assert_eq!(title_at(0, rotate), SAMPLE_TITLES[0]);
        assert_eq!(title_at(179, rotate), SAMPLE_TITLES[0]);
        assert_eq!(title_at(180, rotate), SAMPLE_TITLES[1]);
        assert_eq!(title_at(180 * 10, rotate), SAMPLE_TITLES[0]);
        assert_eq!(title_at(-5, rotate), SAMPLE_TITLES[0]);
    }

    #[tokio::test]
    async fn test_publishes_until_cancelled() {
        let published = Arc::new(Mutex::new(Vec::new()));
        let sink = published.clone();
        let token = CancellationToken::new();
        let task = NowPlayingRefresher::new(Duration::from_millis(10), Duration::from_secs(180))
            .spawn(&Handle::current(), token.clone(), move |title| {
                sink.lock().unwrap().push(title);
                true
            });

        tokio::time::sleep(Duration::from_millis(60)).await;
        token.cancel();
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .unwrap()
            .unwrap();

        let count = published.lock().unwrap().len();
        assert!(count >= 2, "expected several refreshes, got {count}");
        assert!(published
            .lock()
            .unwrap()
            .iter()
            .all(|t| SAMPLE_TITLES.contains(&t.as_str())));
    }

    #[tokio::test]
    async fn test_stops_when_publish_declines() {
        let token = CancellationToken::new();
        let task = NowPlayingRefresher::new(Duration::from_millis(5), Duration::from_secs(1))
            .spawn(&Handle::current(), token, |_| false);
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .unwrap()
            .unwrap();
    }
}
