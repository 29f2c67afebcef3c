//! Stream locator resolution.
//!
//! Most stations point straight at an Icecast/Shoutcast stream and are handed
//! to the player untouched.  Stations whose URL path ends in `.pls` point at a
//! small INI-like playlist instead:
//!
//! ```text
//! [playlist]
//! File1=http://host/stream
//! Title1=...
//! File2=http://mirror/stream
//! ```
//!
//! Those are fetched once and the first `FileN=` entry wins.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::ResolveError;

/// Fetches the text body of a playlist pointer file.
#[async_trait]
pub trait PlaylistFetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> anyhow::Result<String>;
}

/// `reqwest`-backed fetcher with a bounded request timeout.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(concat!("radiohub/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PlaylistFetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> anyhow::Result<String> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

pub struct StreamResolver {
    fetcher: Arc<dyn PlaylistFetcher>,
}

impl StreamResolver {
    pub fn new(fetcher: Arc<dyn PlaylistFetcher>) -> Self {
        Self { fetcher }
    }

    pub fn http(timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self::new(Arc::new(HttpFetcher::new(timeout)?)))
    }

    /// Turn a station locator into the URL the player should open.
    ///
    /// Exactly one fetch for `.pls` locators, none otherwise.  No retries.
    pub async fn resolve(&self, locator: &str) -> Result<String, ResolveError> {
        if !is_pointer_locator(locator) {
            return Ok(locator.to_string());
        }

        debug!("resolver: fetching playlist {}", locator);
        let body = self
            .fetcher
            .fetch_text(locator)
            .await
            .map_err(|e| ResolveError::Fetch {
                url: locator.to_string(),
                reason: format!("{:#}", e),
            })?;

        let entry = first_stream_entry(&body).ok_or_else(|| ResolveError::NoStreamEntry {
            url: locator.to_string(),
        })?;
        let resolved = resolve_relative_url(locator, entry)?;
        info!("resolver: {} -> {}", locator, resolved);
        Ok(resolved)
    }
}

/// True when the URL path (query and fragment ignored) ends in `.pls`.
pub fn is_pointer_locator(locator: &str) -> bool {
    let path = match reqwest::Url::parse(locator) {
        Ok(url) => url.path().to_string(),
        Err(_) => locator
            .split(|c| c == '?' || c == '#')
            .next()
            .unwrap_or(locator)
            .to_string(),
    };
    path.to_ascii_lowercase().ends_with(".pls")
}

/// Value of the first `FileN=` line, trimmed.  Empty values are skipped.
pub fn first_stream_entry(body: &str) -> Option<&str> {
    body.lines().find_map(|line| {
        let (key, value) = line.trim().split_once('=')?;
        let key = key.trim();
        let index = key.get(..4)?.eq_ignore_ascii_case("file").then(|| &key[4..])?;
        if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let value = value.trim();
        (!value.is_empty()).then_some(value)
    })
}

fn resolve_relative_url(base: &str, candidate: &str) -> Result<String, ResolveError> {
    if reqwest::Url::parse(candidate).is_ok() {
        return Ok(candidate.to_string());
    }
    let invalid = || ResolveError::InvalidEntry {
        url: base.to_string(),
        entry: candidate.to_string(),
    };
    let base_url = reqwest::Url::parse(base).map_err(|_| invalid())?;
    base_url
        .join(candidate)
        .map(|u| u.to_string())
        .map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticFetcher {
        /// Error chain, outermost message first.
        body: Result<String, Vec<String>>,
        calls: AtomicUsize,
    }

    impl StaticFetcher {
        fn ok(body: &str) -> Arc<Self> {
            Arc::new(Self {
                body: Ok(body.to_string()),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(chain: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                body: Err(chain.iter().map(|m| m.to_string()).collect()),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl PlaylistFetcher for StaticFetcher {
        async fn fetch_text(&self, _url: &str) -> anyhow::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.body {
                Ok(b) => Ok(b.clone()),
                Err(chain) => {
                    let mut messages = chain.iter().rev();
                    let root = messages.next().cloned().unwrap_or_default();
                    Err(messages.fold(anyhow::anyhow!(root), |err, outer| {
                        err.context(outer.clone())
                    }))
                }
            }
        }
    }

    #[test]
    fn test_pointer_detection() {
        assert!(is_pointer_locator("http://somafm.com/groovesalad.pls"));
        assert!(is_pointer_locator("http://host/LIST.PLS"));
        assert!(is_pointer_locator("http://host/list.pls?sid=1"));
        assert!(!is_pointer_locator("https://ice1.somafm.com/groovesalad-128-mp3"));
        assert!(!is_pointer_locator("http://bassdrive.com/bassdrive3.m3u"));
        assert!(!is_pointer_locator("http://host/stream.mp3?format=.pls"));
    }

    #[test]
    fn test_first_stream_entry_wins() {
        let body = "File1=http://x/stream\nFile2=http://y/stream";
        assert_eq!(first_stream_entry(body), Some("http://x/stream"));
    }

    #[test]
    fn test_first_stream_entry_ini_layout() {
        let body = "[playlist]\r\nNumberOfEntries=2\r\n  file3 = http://a/3  \r\nTitle3=x\r\nFile1=http://a/1\r\nVersion=2\r\n";
        assert_eq!(first_stream_entry(body), Some("http://a/3"));
    }

    #[test]
    fn test_first_stream_entry_skips_non_file_keys_and_empty_values() {
        assert_eq!(first_stream_entry("Filename=http://nope\nFile1=\nFile2=http://ok"), Some("http://ok"));
        assert_eq!(first_stream_entry("[playlist]\nTitle1=Nothing here\n"), None);
        assert_eq!(first_stream_entry(""), None);
    }

    #[tokio::test]
    async fn test_resolve_pointer() {
        let fetcher = StaticFetcher::ok("File1=http://x/stream\nFile2=http://y/stream");
        let resolver = StreamResolver::new(fetcher.clone());
        let url = resolver.resolve("http://host/station.pls").await.unwrap();
        assert_eq!(url, "http://x/stream");
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_resolve_pointer_without_entry_fails() {
        let fetcher = StaticFetcher::ok("[playlist]\nNumberOfEntries=0\n");
        let resolver = StreamResolver::new(fetcher);
        let err = resolver.resolve("http://host/station.pls").await.unwrap_err();
        assert!(matches!(err, ResolveError::NoStreamEntry { .. }));
    }

    #[tokio::test]
    async fn test_resolve_fetch_failure() {
        let fetcher = StaticFetcher::failing(&["connection refused"]);
        let resolver = StreamResolver::new(fetcher.clone());
        let err = resolver.resolve("http://host/station.pls").await.unwrap_err();
        match err {
            ResolveError::Fetch { url, reason } => {
                assert_eq!(url, "http://host/station.pls");
                assert!(reason.contains("connection refused"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_underlying_cause() {
        let fetcher = StaticFetcher::failing(&[
            "error sending request for url (http://host/station.pls)",
            "operation timed out",
        ]);
        let resolver = StreamResolver::new(fetcher);
        let err = resolver.resolve("http://host/station.pls").await.unwrap_err();
        match err {
            ResolveError::Fetch { reason, .. } => {
                assert!(reason.starts_with("error sending request"), "{reason}");
                assert!(reason.contains("operation timed out"), "{reason}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_direct_locator_is_untouched() {
        let fetcher = StaticFetcher::ok("File1=http://never");
        let resolver = StreamResolver::new(fetcher.clone());
        let url = resolver
            .resolve("https://ice1.somafm.com/dronezone-128-mp3")
            .await
            .unwrap();
        assert_eq!(url, "https://ice1.somafm.com/dronezone-128-mp3");
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_relative_entry_is_joined() {
        let fetcher = StaticFetcher::ok("File1=/live/stream.mp3\n");
        let resolver = StreamResolver::new(fetcher);
        let url = resolver.resolve("http://host/radio/list.pls").await.unwrap();
        assert_eq!(url, "http://host/live/stream.mp3");
    }
}
