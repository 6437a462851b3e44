//! Structured logging setup.

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set
    pub filter: String,
    /// Emit JSON lines instead of human-readable text
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "flowprobe=info".to_string(),
            json: false,
        }
    }
}

impl LogConfig {
    /// Filter that will be installed: `RUST_LOG` when set and valid, the
    /// configured directive otherwise
    #[must_use]
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.filter))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Install the global subscriber.
///
/// Returns `false` if a subscriber was already installed, which happens
/// when several suites share one test binary.
pub fn init(config: &LogConfig) -> bool {
    let layer = fmt::layer().with_target(true);
    let registry = tracing_subscriber::registry().with(config.env_filter());
    if config.json {
        registry.with(layer.json()).try_init().is_ok()
    } else {
        registry.with(layer).try_init().is_ok()
    }
}
