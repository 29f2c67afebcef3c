//! Tracing setup: everything goes to `<data_dir>/radiohub.log`; WARN and ERROR
//! lines are also forwarded to the status bar.

use std::path::{Path, PathBuf};

use tokio::sync::mpsc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,radiohub=debug,radiohub_core=debug,reqwest=warn,hyper=warn";

/// A tracing layer that forwards WARN/ERROR messages to the UI.
struct ForwardLayer {
    sender: mpsc::UnboundedSender<String>,
}

impl<S> tracing_subscriber::Layer<S> for ForwardLayer
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let level = *event.metadata().level();
        if !matches!(level, tracing::Level::WARN | tracing::Level::ERROR) {
            return;
        }
        let _ = self.sender.send(format_line(
            &chrono::Local::now().format("%H:%M:%S").to_string(),
            level,
            event,
        ));
    }
}

fn format_line(timestamp: &str, level: tracing::Level, event: &tracing::Event<'_>) -> String {
    let mut message = format!("{} [{}] ", timestamp, level);
    event.record(&mut MessageVisitor(&mut message));
    message
}

struct MessageVisitor<'a>(&'a mut String);

impl tracing::field::Visit for MessageVisitor<'_> {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0.push_str(&format!("{:?}", value));
        } else {
            self.0.push_str(&format!(" {}={:?}", field.name(), value));
        }
    }
}

/// Install the global subscriber.  Returns the log file path and the receiver
/// for forwarded lines.
pub fn init(data_dir: &Path) -> anyhow::Result<(PathBuf, mpsc::UnboundedReceiver<String>)> {
    std::fs::create_dir_all(data_dir)?;
    let log_path = data_dir.join("radiohub.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let (tx, rx) = mpsc::unbounded_channel();

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(log_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(ForwardLayer { sender: tx })
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)))
        .init();

    Ok((log_path, rx))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forwards_only_warn_and_error() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let subscriber = tracing_subscriber::registry().with(ForwardLayer { sender: tx });

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("quiet");
            tracing::debug!("quieter");
            tracing::warn!("player exited on its own: {}", "exit status: 1");
            tracing::error!(station = "Groove Salad", "failed");
        });

        let first = rx.try_recv().unwrap();
        assert!(first.contains("[WARN] player exited on its own: exit status: 1"), "{first}");
        let second = rx.try_recv().unwrap();
        assert!(second.contains("[ERROR] failed station=\"Groove Salad\""), "{second}");
        assert!(rx.try_recv().is_err());
    }
}
