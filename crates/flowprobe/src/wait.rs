//! Bounded waits.
//!
//! Every wait in flowprobe is explicit and has a name and a bound taken from
//! [`Timeouts`]. Polling is the only retry mechanism; nothing runs again once
//! its deadline has passed.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default timeout for element actions (10 seconds)
pub const DEFAULT_ACTION_TIMEOUT_MS: u64 = 10_000;

/// Default timeout for navigation (30 seconds)
pub const DEFAULT_NAVIGATION_TIMEOUT_MS: u64 = 30_000;

/// Default timeout for network idle (60 seconds)
pub const DEFAULT_NETWORK_IDLE_TIMEOUT_MS: u64 = 60_000;

/// Network idle threshold (500ms without new requests)
pub const NETWORK_IDLE_THRESHOLD_MS: u64 = 500;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

// =============================================================================
// LOAD STATE
// =============================================================================

/// Page load states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoadState {
    /// Document reached `readyState == "complete"`
    #[default]
    Load,
    /// Document complete and no new resources for the idle window
    NetworkIdle,
}

impl LoadState {
    /// Name used in logs and timeout errors
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::NetworkIdle => "networkidle",
        }
    }
}

impl std::fmt::Display for LoadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.event_name())
    }
}

// =============================================================================
// TIMEOUTS
// =============================================================================

/// Wait bounds for one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    /// Bound for element actions and element state waits
    pub action_ms: u64,
    /// Bound for `goto` and `reload`
    pub navigation_ms: u64,
    /// Bound for network idle waits
    pub network_idle_ms: u64,
    /// How long the resource counter must stay flat to count as idle
    pub idle_window_ms: u64,
    /// Sleep between polls
    pub poll_interval_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            action_ms: DEFAULT_ACTION_TIMEOUT_MS,
            navigation_ms: DEFAULT_NAVIGATION_TIMEOUT_MS,
            network_idle_ms: DEFAULT_NETWORK_IDLE_TIMEOUT_MS,
            idle_window_ms: NETWORK_IDLE_THRESHOLD_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl Timeouts {
    /// Create timeouts with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the action timeout
    #[must_use]
    pub const fn with_action_ms(mut self, ms: u64) -> Self {
        self.action_ms = ms;
        self
    }

    /// Set the navigation timeout
    #[must_use]
    pub const fn with_navigation_ms(mut self, ms: u64) -> Self {
        self.navigation_ms = ms;
        self
    }

    /// Set the network idle timeout
    #[must_use]
    pub const fn with_network_idle_ms(mut self, ms: u64) -> Self {
        self.network_idle_ms = ms;
        self
    }

    /// Set the idle window
    #[must_use]
    pub const fn with_idle_window_ms(mut self, ms: u64) -> Self {
        self.idle_window_ms = ms;
        self
    }

    /// Set the poll interval
    #[must_use]
    pub const fn with_poll_interval_ms(mut self, ms: u64) -> Self {
        self.poll_interval_ms = ms;
        self
    }

    /// Poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Idle window as Duration
    #[must_use]
    pub const fn idle_window(&self) -> Duration {
        Duration::from_millis(self.idle_window_ms)
    }

    /// Deadline for an element action starting now
    #[must_use]
    pub fn action_deadline(&self) -> Deadline {
        Deadline::after(self.action_ms, self.poll_interval())
    }

    /// Deadline for a network idle wait starting now
    #[must_use]
    pub fn network_idle_deadline(&self) -> Deadline {
        Deadline::after(self.network_idle_ms, self.poll_interval())
    }

    /// Name of the first zero-valued bound, if any
    #[must_use]
    pub const fn first_zero(&self) -> Option<&'static str> {
        if self.action_ms == 0 {
            Some("action_ms")
        } else if self.navigation_ms == 0 {
            Some("navigation_ms")
        } else if self.network_idle_ms == 0 {
            Some("network_idle_ms")
        } else if self.poll_interval_ms == 0 {
            Some("poll_interval_ms")
        } else {
            None
        }
    }
}

// =============================================================================
// DEADLINE
// =============================================================================

/// A poll loop bound.
///
/// ```ignore
/// let mut deadline = timeouts.action_deadline();
/// loop {
///     if ready().await? { break; }
///     if !deadline.wait().await { return Err(...); }
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    limit: Duration,
    interval: Duration,
}

impl Deadline {
    /// Deadline `ms` from now, polling every `interval`
    #[must_use]
    pub fn after(ms: u64, interval: Duration) -> Self {
        Self {
            started: Instant::now(),
            limit: Duration::from_millis(ms),
            interval,
        }
    }

    /// Bound in milliseconds
    #[must_use]
    pub fn limit_ms(&self) -> u64 {
        u64::try_from(self.limit.as_millis()).unwrap_or(u64::MAX)
    }

    /// Time since the deadline was created
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Whether the bound has passed
    #[must_use]
    pub fn expired(&self) -> bool {
        self.elapsed() >= self.limit
    }

    /// Sleep one interval (clamped to the remaining time).
    ///
    /// Returns `false` without sleeping once the deadline has passed.
    pub async fn wait(&mut self) -> bool {
        let elapsed = self.elapsed();
        if elapsed >= self.limit {
            return false;
        }
        let remaining = self.limit - elapsed;
        tokio::time::sleep(self.interval.min(remaining)).await;
        true
    }
}
