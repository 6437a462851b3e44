//! Scenario runner.
//!
//! Each scenario gets a fresh [`Session`] from a [`SessionFactory`], runs as
//! one sequential script, and has its session closed on every exit path:
//! success, assertion failure, infrastructure failure or panic.

use crate::result::{FailureCategory, FlowError, FlowResult};
use crate::session::Session;
use async_trait::async_trait;
use futures::FutureExt;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Opens a new session per scenario
#[async_trait]
pub trait SessionFactory: Send + Sync {
    /// Open a fresh page
    async fn open(&self) -> FlowResult<Session>;
}

#[async_trait]
impl<F> SessionFactory for F
where
    F: Fn() -> FlowResult<Session> + Send + Sync,
{
    async fn open(&self) -> FlowResult<Session> {
        self()
    }
}

/// One end-to-end script over one session
#[async_trait]
pub trait Scenario: Send + Sync {
    /// Name used in reports and logs
    fn name(&self) -> &str;

    /// Drive the page. Returning an error fails the scenario.
    async fn run(&self, session: &mut Session) -> FlowResult<()>;
}

/// How a scenario ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Every check held
    Passed,
    /// An observed value differed from the expected one
    AssertionFailed,
    /// Browser, element, timing problem, or a panic
    InfrastructureFailed,
    /// Fixtures, persisted state or configuration were unusable
    SetupFailed,
}

impl Outcome {
    fn from_error(err: &FlowError) -> Self {
        match err.category() {
            FailureCategory::Assertion => Self::AssertionFailed,
            FailureCategory::Infrastructure => Self::InfrastructureFailed,
            FailureCategory::Setup => Self::SetupFailed,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Passed => "passed",
            Self::AssertionFailed => "assertion failed",
            Self::InfrastructureFailed => "infrastructure failed",
            Self::SetupFailed => "setup failed",
        };
        f.write_str(label)
    }
}

/// Result of running a single scenario
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    /// Scenario name
    pub name: String,
    /// How it ended
    pub outcome: Outcome,
    /// Error message if it did not pass
    pub error: Option<String>,
    /// Wall time including session open and close
    pub duration: Duration,
}

impl ScenarioReport {
    /// Whether the scenario passed
    #[must_use]
    pub fn passed(&self) -> bool {
        self.outcome == Outcome::Passed
    }

    fn failed(name: &str, outcome: Outcome, error: String, duration: Duration) -> Self {
        Self {
            name: name.to_string(),
            outcome,
            error: Some(error),
            duration,
        }
    }
}

/// Results from running a list of scenarios
#[derive(Debug, Clone, Default)]
pub struct SuiteReport {
    /// Individual reports in run order
    pub reports: Vec<ScenarioReport>,
    /// Total duration
    pub duration: Duration,
}

impl SuiteReport {
    /// Check if all scenarios passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.reports.iter().all(ScenarioReport::passed)
    }

    /// Count scenarios with the given outcome
    #[must_use]
    pub fn count(&self, outcome: Outcome) -> usize {
        self.reports.iter().filter(|r| r.outcome == outcome).count()
    }

    /// Get total scenario count
    #[must_use]
    pub fn total(&self) -> usize {
        self.reports.len()
    }

    /// Get failed scenarios
    #[must_use]
    pub fn failures(&self) -> Vec<&ScenarioReport> {
        self.reports.iter().filter(|r| !r.passed()).collect()
    }

    /// One-line summary
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} scenarios: {} passed, {} assertion failures, {} infrastructure failures, {} setup failures",
            self.total(),
            self.count(Outcome::Passed),
            self.count(Outcome::AssertionFailed),
            self.count(Outcome::InfrastructureFailed),
            self.count(Outcome::SetupFailed),
        )
    }
}

/// Runs scenarios against sessions from one factory
#[derive(Clone)]
pub struct ScenarioRunner {
    factory: Arc<dyn SessionFactory>,
    fail_fast: bool,
}

impl fmt::Debug for ScenarioRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScenarioRunner")
            .field("fail_fast", &self.fail_fast)
            .finish_non_exhaustive()
    }
}

impl ScenarioRunner {
    /// Create a runner
    #[must_use]
    pub fn new(factory: impl SessionFactory + 'static) -> Self {
        Self::from_shared(Arc::new(factory))
    }

    /// Create a runner from a shared factory
    #[must_use]
    pub fn from_shared(factory: Arc<dyn SessionFactory>) -> Self {
        Self {
            factory,
            fail_fast: false,
        }
    }

    /// Stop a suite after the first scenario that does not pass
    #[must_use]
    pub const fn with_fail_fast(mut self) -> Self {
        self.fail_fast = true;
        self
    }

    /// Run one scenario in its own session
    pub async fn run(&self, scenario: &dyn Scenario) -> ScenarioReport {
        let name = scenario.name();
        let start = Instant::now();
        info!(scenario = name, "scenario started");

        let mut session = match self.factory.open().await {
            Ok(session) => session,
            Err(err) => {
                warn!(scenario = name, error = %err, "could not open session");
                return ScenarioReport::failed(name, Outcome::from_error(&err), err.to_string(), start.elapsed());
            }
        };

        let result = AssertUnwindSafe(scenario.run(&mut session))
            .catch_unwind()
            .await;

        if let Err(err) = session.close().await {
            warn!(scenario = name, session = %session.id(), error = %err, "session close failed");
        }

        let duration = start.elapsed();
        let report = match result {
            Ok(Ok(())) => ScenarioReport {
                name: name.to_string(),
                outcome: Outcome::Passed,
                error: None,
                duration,
            },
            Ok(Err(err)) => ScenarioReport::failed(name, Outcome::from_error(&err), err.to_string(), duration),
            Err(panic) => ScenarioReport::failed(
                name,
                Outcome::InfrastructureFailed,
                format!("scenario panicked: {}", panic_message(&*panic)),
                duration,
            ),
        };
        info!(
            scenario = name,
            outcome = %report.outcome,
            duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            "scenario finished"
        );
        report
    }

    /// Run scenarios one after another
    pub async fn run_suite(&self, scenarios: &[Arc<dyn Scenario>]) -> SuiteReport {
        let start = Instant::now();
        let mut reports = Vec::with_capacity(scenarios.len());
        for scenario in scenarios {
            let report = self.run(scenario.as_ref()).await;
            let stop = self.fail_fast && !report.passed();
            reports.push(report);
            if stop {
                break;
            }
        }
        SuiteReport {
            reports,
            duration: start.elapsed(),
        }
    }

    /// Run scenarios concurrently, each in its own task and session.
    ///
    /// Reports keep the input order.
    pub async fn run_parallel(&self, scenarios: &[Arc<dyn Scenario>]) -> SuiteReport {
        let start = Instant::now();
        let handles: Vec<_> = scenarios
            .iter()
            .map(|scenario| {
                let runner = self.clone();
                let scenario = Arc::clone(scenario);
                tokio::spawn(async move { runner.run(scenario.as_ref()).await })
            })
            .collect();

        let reports = futures::future::join_all(handles)
            .await
            .into_iter()
            .zip(scenarios)
            .map(|(joined, scenario)| {
                joined.unwrap_or_else(|err| {
                    ScenarioReport::failed(
                        scenario.name(),
                        Outcome::InfrastructureFailed,
                        format!("scenario task failed: {err}"),
                        Duration::ZERO,
                    )
                })
            })
            .collect();
        SuiteReport {
            reports,
            duration: start.elapsed(),
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
