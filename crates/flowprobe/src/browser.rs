//! Browser launch and the Chromium driver.
//!
//! With the `browser` feature, [`ChromiumLauncher`] starts one Chromium over
//! CDP (chromiumoxide) and hands out a page per session, each in its own
//! browser context so cookies and storage never leak between scenarios.
//! Without the feature only [`BrowserConfig`] is available.

use crate::result::FlowResult;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

/// Browser window size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in CSS pixels
    pub width: u32,
    /// Height in CSS pixels
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Browser configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run without a window
    pub headless: bool,
    /// Window size
    pub viewport: Viewport,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<PathBuf>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport: Viewport::default(),
            chromium_path: None,
            sandbox: true,
        }
    }
}

impl BrowserConfig {
    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport = Viewport { width, height };
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

// ============================================================================
// CDP driver (when `browser` feature is enabled)
// ============================================================================

#[cfg(feature = "browser")]
#[allow(clippy::significant_drop_tightening, clippy::missing_errors_doc)]
mod cdp {
    use super::BrowserConfig;
    use crate::driver::{FlowDriver, PageActivity};
    use crate::locator::{ElementProbe, ElementQuery};
    use crate::result::{FlowError, FlowResult};
    use crate::scenario::SessionFactory;
    use crate::session::Session;
    use crate::wait::Timeouts;
    use async_trait::async_trait;
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::cdp::browser_protocol::browser::BrowserContextId;
    use chromiumoxide::cdp::browser_protocol::input::{DispatchKeyEventParams, DispatchKeyEventType};
    use chromiumoxide::cdp::browser_protocol::page::{CaptureScreenshotFormat, CaptureScreenshotParams};
    use chromiumoxide::cdp::browser_protocol::target::{CreateBrowserContextParams, CreateTargetParams};
    use chromiumoxide::layout::Point;
    use chromiumoxide::page::Page as CdpPage;
    use futures::StreamExt;
    use serde::de::DeserializeOwned;
    use serde::Deserialize;
    use std::sync::Arc;
    use tokio::sync::Mutex;
    use tracing::{debug, info};

    fn driver_err(e: impl std::fmt::Display) -> FlowError {
        FlowError::driver(e.to_string())
    }

    /// One running Chromium; opens a fresh page per session
    #[derive(Debug)]
    pub struct ChromiumLauncher {
        config: BrowserConfig,
        timeouts: Timeouts,
        browser: Arc<Mutex<CdpBrowser>>,
        handle: tokio::task::JoinHandle<()>,
    }

    impl ChromiumLauncher {
        /// Launch Chromium
        pub async fn launch(config: BrowserConfig, timeouts: Timeouts) -> FlowResult<Self> {
            let mut builder = CdpConfig::builder().window_size(config.viewport.width, config.viewport.height);

            if !config.headless {
                builder = builder.with_head();
            }

            if !config.sandbox {
                builder = builder.no_sandbox();
            }

            if let Some(ref path) = config.chromium_path {
                builder = builder.chrome_executable(path);
            }

            let cdp_config = builder
                .build()
                .map_err(|message| FlowError::BrowserLaunch { message })?;

            let (browser, mut handler) = CdpBrowser::launch(cdp_config)
                .await
                .map_err(|e| FlowError::BrowserLaunch {
                    message: e.to_string(),
                })?;

            let handle = tokio::spawn(async move {
                while let Some(h) = handler.next().await {
                    if h.is_err() {
                        break;
                    }
                }
            });
            info!(headless = config.headless, "chromium launched");

            Ok(Self {
                config,
                timeouts,
                browser: Arc::new(Mutex::new(browser)),
                handle,
            })
        }

        /// Browser configuration
        #[must_use]
        pub const fn config(&self) -> &BrowserConfig {
            &self.config
        }

        /// Open a page in a new browser context
        pub async fn new_driver(&self) -> FlowResult<ChromiumDriver> {
            let mut browser = self.browser.lock().await;
            let context = browser
                .create_browser_context(CreateBrowserContextParams::default())
                .await
                .map_err(driver_err)?;
            let target = CreateTargetParams::builder()
                .url("about:blank")
                .browser_context_id(context.clone())
                .build()
                .map_err(FlowError::driver)?;
            let page = browser.new_page(target).await.map_err(driver_err)?;
            debug!(context = ?context, "page opened");
            Ok(ChromiumDriver {
                page: Some(page),
                context: Some(context),
                browser: Arc::clone(&self.browser),
            })
        }

        /// Close the browser
        pub async fn close(self) -> FlowResult<()> {
            let closed = self.browser.lock().await.close().await;
            self.handle.abort();
            closed.map(|_| ()).map_err(|e| FlowError::BrowserLaunch {
                message: e.to_string(),
            })
        }
    }

    #[async_trait]
    impl SessionFactory for ChromiumLauncher {
        async fn open(&self) -> FlowResult<Session> {
            let driver = self.new_driver().await?;
            Ok(Session::new(driver, self.timeouts))
        }
    }

    /// A page with a real CDP connection
    #[derive(Debug)]
    pub struct ChromiumDriver {
        page: Option<CdpPage>,
        context: Option<BrowserContextId>,
        browser: Arc<Mutex<CdpBrowser>>,
    }

    #[derive(Deserialize)]
    struct Center {
        x: f64,
        y: f64,
    }

    impl ChromiumDriver {
        fn page(&self) -> FlowResult<&CdpPage> {
            self.page
                .as_ref()
                .ok_or_else(|| FlowError::driver("page is closed"))
        }

        async fn eval<T: DeserializeOwned>(&self, expr: String) -> FlowResult<T> {
            self.page()?
                .evaluate(expr)
                .await
                .map_err(driver_err)?
                .into_value()
                .map_err(driver_err)
        }

        /// Run `body` with `el` bound to the target; fails if it is missing
        async fn with_element(&self, query: &ElementQuery, body: &str) -> FlowResult<()> {
            let found: bool = self
                .eval(format!(
                    "(() => {{ const el = {}; if (!el) {{ return false; }} {body} return true; }})()",
                    query.to_element_js()
                ))
                .await?;
            if found {
                Ok(())
            } else {
                Err(FlowError::driver(format!("no node for {}", query.describe())))
            }
        }

        async fn center(&self, query: &ElementQuery) -> FlowResult<Point> {
            let center: Option<Center> = self
                .eval(format!(
                    "(() => {{ const el = {}; if (!el) {{ return null; }} \
                     el.scrollIntoView({{ block: 'center' }}); const r = el.getBoundingClientRect(); \
                     return {{ x: r.left + r.width / 2, y: r.top + r.height / 2 }}; }})()",
                    query.to_element_js()
                ))
                .await?;
            center
                .map(|c| Point::new(c.x, c.y))
                .ok_or_else(|| FlowError::driver(format!("no node for {}", query.describe())))
        }
    }

    fn js_value(s: &str) -> String {
        serde_json::to_string(s).unwrap_or_else(|_| String::from("\"\""))
    }

    #[async_trait]
    impl FlowDriver for ChromiumDriver {
        async fn navigate(&mut self, url: &str) -> FlowResult<()> {
            self.page()?
                .goto(url)
                .await
                .map_err(|e| FlowError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
            Ok(())
        }

        async fn reload(&mut self) -> FlowResult<()> {
            self.page()?.reload().await.map_err(driver_err)?;
            Ok(())
        }

        async fn current_url(&self) -> FlowResult<String> {
            Ok(self
                .page()?
                .url()
                .await
                .map_err(driver_err)?
                .unwrap_or_default())
        }

        async fn probe(&self, query: &ElementQuery) -> FlowResult<ElementProbe> {
            self.eval(query.to_probe_js()).await
        }

        async fn count(&self, query: &ElementQuery) -> FlowResult<usize> {
            self.eval(format!("({}).length", query.to_matches_js())).await
        }

        async fn click(&self, query: &ElementQuery) -> FlowResult<()> {
            let point = self.center(query).await?;
            self.page()?.click(point).await.map_err(driver_err)?;
            Ok(())
        }

        async fn fill(&self, query: &ElementQuery, value: &str) -> FlowResult<()> {
            self.with_element(
                query,
                &format!(
                    "el.focus(); el.value = {}; \
                     el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
                     el.dispatchEvent(new Event('change', {{ bubbles: true }}));",
                    js_value(value)
                ),
            )
            .await
        }

        async fn select_option(&self, query: &ElementQuery, option: &str) -> FlowResult<()> {
            self.with_element(
                query,
                &format!(
                    "const want = {}; \
                     const opt = Array.from(el.options || []).find(o => o.value === want || o.label.trim() === want); \
                     if (!opt) {{ throw new Error('no option ' + want); }} \
                     el.value = opt.value; el.dispatchEvent(new Event('change', {{ bubbles: true }}));",
                    js_value(option)
                ),
            )
            .await
        }

        async fn check(&self, query: &ElementQuery) -> FlowResult<()> {
            self.with_element(query, "if (!el.checked) { el.click(); }").await
        }

        async fn hover(&self, query: &ElementQuery) -> FlowResult<()> {
            let point = self.center(query).await?;
            self.page()?.move_mouse(point).await.map_err(driver_err)?;
            Ok(())
        }

        async fn press_key(&self, key: &str) -> FlowResult<()> {
            let page = self.page()?;
            for kind in [DispatchKeyEventType::KeyDown, DispatchKeyEventType::KeyUp] {
                let mut params = DispatchKeyEventParams::builder().r#type(kind).key(key).code(key);
                if key == "Tab" {
                    params = params.windows_virtual_key_code(9);
                }
                page.execute(params.build().map_err(FlowError::driver)?)
                    .await
                    .map_err(driver_err)?;
            }
            Ok(())
        }

        async fn activity(&self) -> FlowResult<PageActivity> {
            self.eval(
                "({ ready: document.readyState === 'complete', \
                 resources: performance.getEntriesByType('resource').length })"
                    .to_string(),
            )
            .await
        }

        async fn screenshot(&self) -> FlowResult<Vec<u8>> {
            let params = CaptureScreenshotParams::builder()
                .format(CaptureScreenshotFormat::Png)
                .build();
            let screenshot = self.page()?.execute(params).await.map_err(driver_err)?;

            use base64::Engine;
            base64::engine::general_purpose::STANDARD
                .decode(&screenshot.data)
                .map_err(driver_err)
        }

        async fn close(&mut self) -> FlowResult<()> {
            let page_closed = match self.page.take() {
                Some(page) => page.close().await.map_err(driver_err),
                None => Ok(()),
            };
            let context_disposed = match self.context.take() {
                Some(context) => {
                    let mut browser = self.browser.lock().await;
                    browser.dispose_browser_context(context).await.map(|_| ()).map_err(driver_err)
                }
                None => Ok(()),
            };
            super::first_release_error(page_closed, context_disposed)
        }
    }
}

/// Keep the first failure of a page teardown, logging a later one
#[cfg_attr(not(feature = "browser"), allow(dead_code))]
fn first_release_error(page: FlowResult<()>, context: FlowResult<()>) -> FlowResult<()> {
    match (page, context) {
        (Err(first), Err(second)) => {
            warn!(error = %second, "browser context disposal failed after page close failed");
            Err(first)
        }
        (page, context) => page.and(context),
    }
}

#[cfg(feature = "browser")]
pub use cdp::{ChromiumDriver, ChromiumLauncher};
