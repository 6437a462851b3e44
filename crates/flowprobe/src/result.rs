//! Result and error types for flowprobe.

use thiserror::Error;

/// Result type for flowprobe operations
pub type FlowResult<T> = Result<T, FlowError>;

/// How a failure should be triaged in a scenario report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureCategory {
    /// Observed value differed from the expected one
    Assertion,
    /// Browser, element or timing problem
    Infrastructure,
    /// Missing or malformed fixtures, configuration or persisted state
    Setup,
}

/// Errors that can occur in flowprobe
#[derive(Debug, Error)]
pub enum FlowError {
    /// No node matched the element query within the bounded wait
    #[error("Element '{element}' not found after {timeout_ms}ms")]
    ElementNotFound {
        /// Element description
        element: String,
        /// Wait bound in milliseconds
        timeout_ms: u64,
    },

    /// The element resolved but never reached the required state
    #[error("Element '{element}' not ready ({state}) after {timeout_ms}ms")]
    ElementNotReady {
        /// Element description
        element: String,
        /// Last observed state or the state that was awaited
        state: String,
        /// Wait bound in milliseconds
        timeout_ms: u64,
    },

    /// A page-object operation stalled on one of its elements
    #[error("{page}::{operation} stalled on '{element}': {source}")]
    PageObjectTimeout {
        /// Page object name
        page: &'static str,
        /// Operation name
        operation: &'static str,
        /// Element description
        element: String,
        /// Underlying facade error
        #[source]
        source: Box<FlowError>,
    },

    /// Observed value differs from the expected one
    #[error("Assertion '{check}' failed: expected '{expected}', got '{actual}'")]
    AssertionMismatch {
        /// Name of the check
        check: String,
        /// Expected value
        expected: String,
        /// Observed value
        actual: String,
    },

    /// Tabular fixture row is malformed
    #[error("Invalid fixture row {row}: {message}")]
    InvalidFixtureRow {
        /// 1-based row number in the sheet
        row: usize,
        /// Error message
        message: String,
    },

    /// The persistence slot has never been written
    #[error("No fixture available at {path}")]
    NoFixtureAvailable {
        /// Slot path
        path: String,
    },

    /// Page-level wait (navigation, network idle, URL) timed out
    #[error("{waited_for} timed out after {ms}ms")]
    Timeout {
        /// What was waited for
        waited_for: String,
        /// Timeout in milliseconds
        ms: u64,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Driver error
    #[error("Driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Fixture error (workbook, sheet, generated data)
    #[error("Fixture error: {message}")]
    Fixture {
        /// Error message
        message: String,
    },

    /// Configuration error
    #[error("Invalid configuration: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl FlowError {
    /// Build an assertion mismatch
    pub fn mismatch(
        check: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::AssertionMismatch {
            check: check.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Build a driver error
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }

    /// Classify the error for triage
    #[must_use]
    pub fn category(&self) -> FailureCategory {
        match self {
            Self::AssertionMismatch { .. } => FailureCategory::Assertion,
            Self::InvalidFixtureRow { .. }
            | Self::NoFixtureAvailable { .. }
            | Self::Fixture { .. }
            | Self::Config { .. }
            | Self::Yaml(_) => FailureCategory::Setup,
            Self::ElementNotFound { .. }
            | Self::ElementNotReady { .. }
            | Self::PageObjectTimeout { .. }
            | Self::Timeout { .. }
            | Self::Navigation { .. }
            | Self::Driver { .. }
            | Self::BrowserLaunch { .. }
            | Self::Io(_)
            | Self::Json(_) => FailureCategory::Infrastructure,
        }
    }

    /// Whether this is a wait that ran out of time
    #[must_use]
    pub const fn is_wait_failure(&self) -> bool {
        matches!(
            self,
            Self::ElementNotFound { .. } | Self::ElementNotReady { .. } | Self::Timeout { .. }
        )
    }

    /// Element (or page-level target) the error refers to, if any
    #[must_use]
    pub fn element(&self) -> Option<&str> {
        match self {
            Self::ElementNotFound { element, .. }
            | Self::ElementNotReady { element, .. }
            | Self::PageObjectTimeout { element, .. } => Some(element),
            Self::Timeout { waited_for, .. } => Some(waited_for),
            _ => None,
        }
    }
}
