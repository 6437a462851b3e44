//! Session - the locator/action facade over one live page.
//!
//! Callers hand in [`ElementDescriptor`]s or [`ElementQuery`]s; the session
//! polls the driver until the target is ready, then acts. Every poll loop is
//! bounded by the session's [`Timeouts`] and reports which element stalled
//! and in what state.

use crate::driver::FlowDriver;
use crate::locator::{ElementProbe, ElementQuery};
use crate::result::{FlowError, FlowResult};
use crate::wait::{Deadline, LoadState, Timeouts};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};
use uuid::Uuid;

/// One live page, owned by exactly one scenario
pub struct Session {
    id: Uuid,
    driver: Box<dyn FlowDriver>,
    timeouts: Timeouts,
    closed: bool,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("timeouts", &self.timeouts)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Wrap a driver
    #[must_use]
    pub fn new(driver: impl FlowDriver + 'static, timeouts: Timeouts) -> Self {
        Self::from_boxed(Box::new(driver), timeouts)
    }

    /// Wrap an already boxed driver
    #[must_use]
    pub fn from_boxed(driver: Box<dyn FlowDriver>, timeouts: Timeouts) -> Self {
        Self {
            id: Uuid::new_v4(),
            driver,
            timeouts,
            closed: false,
        }
    }

    /// Session identifier used in logs
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Wait bounds
    #[must_use]
    pub const fn timeouts(&self) -> &Timeouts {
        &self.timeouts
    }

    /// Whether `close` has run
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    // =========================================================================
    // ELEMENT ACTIONS
    // =========================================================================

    /// Click once the element is visible and enabled
    pub async fn click(&self, target: impl Into<ElementQuery>) -> FlowResult<()> {
        let query = target.into();
        self.wait_actionable(&query).await?;
        debug!(session = %self.id, element = %query.describe(), "click");
        self.driver.click(&query).await
    }

    /// Replace the value of an input once it is visible and enabled
    pub async fn fill(&self, target: impl Into<ElementQuery>, text: &str) -> FlowResult<()> {
        let query = target.into();
        self.wait_actionable(&query).await?;
        debug!(session = %self.id, element = %query.describe(), chars = text.len(), "fill");
        self.driver.fill(&query, text).await
    }

    /// Pick an option of a select element
    pub async fn select(&self, target: impl Into<ElementQuery>, option: &str) -> FlowResult<()> {
        let query = target.into();
        self.wait_actionable(&query).await?;
        debug!(session = %self.id, element = %query.describe(), option, "select");
        self.driver.select_option(&query, option).await
    }

    /// Check a checkbox or radio button
    pub async fn check(&self, target: impl Into<ElementQuery>) -> FlowResult<()> {
        let query = target.into();
        self.wait_actionable(&query).await?;
        debug!(session = %self.id, element = %query.describe(), "check");
        self.driver.check(&query).await
    }

    /// Hover once the element is visible
    pub async fn hover(&self, target: impl Into<ElementQuery>) -> FlowResult<()> {
        let query = target.into();
        self.wait_until(&query, "visible", |p| p.attached && p.visible)
            .await?;
        debug!(session = %self.id, element = %query.describe(), "hover");
        self.driver.hover(&query).await
    }

    /// Number of matches right now
    pub async fn count(&self, target: impl Into<ElementQuery>) -> FlowResult<usize> {
        let query = target.into();
        self.driver.count(&query).await
    }

    /// Trimmed text of the element once it is attached
    pub async fn read_text(&self, target: impl Into<ElementQuery>) -> FlowResult<String> {
        let query = target.into();
        let mut deadline = self.timeouts.action_deadline();
        loop {
            let probe = self.driver.probe(&query).await?;
            if probe.attached {
                return Ok(probe.trimmed_text());
            }
            if !deadline.wait().await {
                return Err(FlowError::ElementNotFound {
                    element: query.describe(),
                    timeout_ms: deadline.limit_ms(),
                });
            }
        }
    }

    /// Trimmed text of the nth (0-based) match
    pub async fn read_text_nth(
        &self,
        target: impl Into<ElementQuery>,
        index: usize,
    ) -> FlowResult<String> {
        self.read_text(target.into().nth(index)).await
    }

    /// Poll the element's text until `accept` holds or the action timeout
    /// passes, returning the last observed text either way.
    ///
    /// Fails only if the element never attaches.
    pub async fn wait_text_matching(
        &self,
        target: impl Into<ElementQuery>,
        accept: impl Fn(&str) -> bool + Send,
    ) -> FlowResult<String> {
        let query = target.into();
        let mut deadline = self.timeouts.action_deadline();
        let mut last: Option<String> = None;
        loop {
            let probe = self.driver.probe(&query).await?;
            if probe.attached {
                let text = probe.trimmed_text();
                if accept(&text) {
                    return Ok(text);
                }
                last = Some(text);
            }
            if !deadline.wait().await {
                return last.ok_or_else(|| FlowError::ElementNotFound {
                    element: query.describe(),
                    timeout_ms: deadline.limit_ms(),
                });
            }
        }
    }

    /// Poll until the element's trimmed text is no longer `unwanted` or the
    /// action timeout passes, returning the last observed text.
    ///
    /// A detached element counts as having left and reads as `""`.
    pub async fn wait_text_leaving(&self, target: impl Into<ElementQuery>, unwanted: &str) -> FlowResult<String> {
        let query = target.into();
        let mut deadline = self.timeouts.action_deadline();
        loop {
            let probe = self.driver.probe(&query).await?;
            if !probe.attached {
                return Ok(String::new());
            }
            let text = probe.trimmed_text();
            if text != unwanted || !deadline.wait().await {
                return Ok(text);
            }
        }
    }

    /// Wait until the element is visible
    pub async fn wait_visible(&self, target: impl Into<ElementQuery>) -> FlowResult<()> {
        let query = target.into();
        self.wait_until(&query, "visible", |p| p.attached && p.visible)
            .await
            .map(drop)
    }

    /// Wait until the element is hidden or detached
    pub async fn wait_hidden(&self, target: impl Into<ElementQuery>) -> FlowResult<()> {
        let query = target.into();
        self.wait_until(&query, "hidden", |p| !p.attached || !p.visible)
            .await
            .map(drop)
    }

    /// Wait until the element is attached and disabled
    pub async fn wait_disabled(&self, target: impl Into<ElementQuery>) -> FlowResult<()> {
        let query = target.into();
        self.wait_until(&query, "disabled", |p| p.attached && !p.enabled)
            .await
            .map(drop)
    }

    /// Single observation without waiting
    pub async fn probe(&self, target: impl Into<ElementQuery>) -> FlowResult<ElementProbe> {
        let query = target.into();
        self.driver.probe(&query).await
    }

    async fn wait_actionable(&self, query: &ElementQuery) -> FlowResult<ElementProbe> {
        let mut deadline = self.timeouts.action_deadline();
        loop {
            let probe = self.driver.probe(query).await?;
            if probe.is_actionable() {
                return Ok(probe);
            }
            if !deadline.wait().await {
                let element = query.describe();
                let timeout_ms = deadline.limit_ms();
                return Err(if probe.attached {
                    FlowError::ElementNotReady {
                        element,
                        state: probe.state_label().to_string(),
                        timeout_ms,
                    }
                } else {
                    FlowError::ElementNotFound {
                        element,
                        timeout_ms,
                    }
                });
            }
        }
    }

    async fn wait_until(
        &self,
        query: &ElementQuery,
        desired: &str,
        accept: impl Fn(&ElementProbe) -> bool + Send,
    ) -> FlowResult<ElementProbe> {
        let mut deadline = self.timeouts.action_deadline();
        loop {
            let probe = self.driver.probe(query).await?;
            if accept(&probe) {
                return Ok(probe);
            }
            if !deadline.wait().await {
                return Err(FlowError::ElementNotReady {
                    element: query.describe(),
                    state: format!("expected {desired}, was {}", probe.state_label()),
                    timeout_ms: deadline.limit_ms(),
                });
            }
        }
    }

    // =========================================================================
    // PAGE OPERATIONS
    // =========================================================================

    /// Navigate and wait for the given load state
    pub async fn goto(&mut self, url: &str, until: LoadState) -> FlowResult<()> {
        debug!(session = %self.id, url, %until, "goto");
        let bound = Duration::from_millis(self.timeouts.navigation_ms);
        tokio::time::timeout(bound, self.driver.navigate(url))
            .await
            .map_err(|_| FlowError::Timeout {
                waited_for: format!("navigation to {url}"),
                ms: self.timeouts.navigation_ms,
            })??;
        self.wait_for_load_state(until).await
    }

    /// Reload the current page and wait for the given load state
    pub async fn reload(&mut self, until: LoadState) -> FlowResult<()> {
        debug!(session = %self.id, %until, "reload");
        let bound = Duration::from_millis(self.timeouts.navigation_ms);
        tokio::time::timeout(bound, self.driver.reload())
            .await
            .map_err(|_| FlowError::Timeout {
                waited_for: "reload".to_string(),
                ms: self.timeouts.navigation_ms,
            })??;
        self.wait_for_load_state(until).await
    }

    /// Wait for a load state on the current page
    pub async fn wait_for_load_state(&self, state: LoadState) -> FlowResult<()> {
        match state {
            LoadState::Load => self.wait_for_load().await,
            LoadState::NetworkIdle => self.wait_for_network_idle().await,
        }
    }

    async fn wait_for_load(&self) -> FlowResult<()> {
        let mut deadline = Deadline::after(self.timeouts.navigation_ms, self.timeouts.poll_interval());
        loop {
            if self.driver.activity().await?.ready {
                return Ok(());
            }
            if !deadline.wait().await {
                return Err(FlowError::Timeout {
                    waited_for: LoadState::Load.to_string(),
                    ms: deadline.limit_ms(),
                });
            }
        }
    }

    /// Wait until the document is complete and no new resources have been
    /// requested for the idle window
    pub async fn wait_for_network_idle(&self) -> FlowResult<()> {
        let mut deadline = self.timeouts.network_idle_deadline();
        let window = self.timeouts.idle_window();
        let mut last_count: Option<u64> = None;
        let mut quiet_since = Instant::now();
        loop {
            let activity = self.driver.activity().await?;
            if activity.ready && last_count == Some(activity.resources) {
                if quiet_since.elapsed() >= window {
                    return Ok(());
                }
            } else {
                last_count = activity.ready.then_some(activity.resources);
                quiet_since = Instant::now();
            }
            if !deadline.wait().await {
                return Err(FlowError::Timeout {
                    waited_for: LoadState::NetworkIdle.to_string(),
                    ms: deadline.limit_ms(),
                });
            }
        }
    }

    /// Current URL
    pub async fn current_url(&self) -> FlowResult<String> {
        self.driver.current_url().await
    }

    /// Poll the URL until it contains `marker` or the action timeout passes,
    /// returning the last observed URL either way
    pub async fn wait_for_url_containing(&self, marker: &str) -> FlowResult<String> {
        let mut deadline = self.timeouts.action_deadline();
        loop {
            let url = self.driver.current_url().await?;
            if url.contains(marker) || !deadline.wait().await {
                return Ok(url);
            }
        }
    }

    /// Press a key on the focused element
    pub async fn press_key(&self, key: &str) -> FlowResult<()> {
        debug!(session = %self.id, key, "press");
        self.driver.press_key(key).await
    }

    /// PNG screenshot of the viewport
    pub async fn screenshot(&self) -> FlowResult<Vec<u8>> {
        self.driver.screenshot().await
    }

    /// Write a PNG screenshot to `path`, creating parent directories
    pub async fn save_screenshot(&self, path: &Path) -> FlowResult<()> {
        let bytes = self.driver.screenshot().await?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, bytes).await?;
        debug!(session = %self.id, path = %path.display(), "screenshot saved");
        Ok(())
    }

    /// Release the page. Safe to call more than once.
    pub async fn close(&mut self) -> FlowResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.driver.close().await
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if !self.closed {
            warn!(session = %self.id, "session dropped without close");
        }
    }
}
