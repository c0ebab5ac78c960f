use serde::Serialize;
use std::fmt;
use tracing::Level;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Log verbosity selected by repeating `-v`
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Verbosity {
    Warning,
    Info,
    Debug,
}

impl Verbosity {
    /// Map a `-v` count, clamping anything past the last level
    pub fn from_count(count: u8) -> Self {
        match count {
            0 => Verbosity::Warning,
            1 => Verbosity::Info,
            _ => Verbosity::Debug,
        }
    }

    pub fn level(self) -> Level {
        match self {
            Verbosity::Warning => Level::WARN,
            Verbosity::Info => Level::INFO,
            Verbosity::Debug => Level::DEBUG,
        }
    }

    /// Filter directive used when `RUST_LOG` is not set
    pub fn directive(self) -> String {
        format!(
            "relish_notifier={}",
            self.level().as_str().to_lowercase()
        )
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.level().as_str())
    }
}

/// Local time down to the minute, e.g. `2024-05-02 11:45`
#[derive(Clone, Copy, Debug, Default)]
pub struct ShortTime;

impl FormatTime for ShortTime {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%F %H:%M"))
    }
}

/// Install the global subscriber. Logs go to stderr so stdout only carries
/// the arrival notice and the arrival command's own output.
pub fn init(verbosity: Verbosity) {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| verbosity.directive().into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_timer(ShortTime)
                .with_target(false),
        )
        .try_init();
}
