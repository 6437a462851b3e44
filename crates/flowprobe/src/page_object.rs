//! Page Object Model support.
//!
//! A page object owns a `'static` table of [`ElementDescriptor`]s and a set
//! of async operations that borrow a [`Session`] for the duration of a call.
//! Page objects hold no domain state and never construct each other; flows
//! compose them.

use crate::locator::ElementDescriptor;
use crate::result::{FlowError, FlowResult};
use crate::session::Session;

/// Trait for page objects representing a page or component in the UI.
///
/// # Example
///
/// ```ignore
/// const SIGN_IN: ElementDescriptor = ElementDescriptor::new("sign in button", Selector::css("#sign_in_btn"));
///
/// struct LoginPage;
///
/// impl PageObject for LoginPage {
///     fn page_name(&self) -> &'static str { "LoginPage" }
///     fn elements(&self) -> &'static [ElementDescriptor] { &[SIGN_IN] }
/// }
/// ```
pub trait PageObject {
    /// Page name for errors and logs
    fn page_name(&self) -> &'static str;

    /// Every element the page object touches
    fn elements(&self) -> &'static [ElementDescriptor];

    /// Substring the URL contains once the page is showing
    fn url_marker(&self) -> Option<&'static str> {
        None
    }

    /// Look up an element by name
    fn element(&self, name: &str) -> Option<ElementDescriptor> {
        self.elements().iter().find(|e| e.name == name).copied()
    }
}

/// Wait for the URL to contain the page's marker and return the URL.
///
/// Pages without a marker return the current URL immediately.
pub async fn wait_for_arrival<P: PageObject + Sync>(
    page: &P,
    session: &Session,
) -> FlowResult<String> {
    match page.url_marker() {
        Some(marker) => session.wait_for_url_containing(marker).await,
        None => session.current_url().await,
    }
    .in_step(page.page_name(), "wait_for_arrival")
}

/// Attach page-object context to facade failures
pub trait StepContext<T> {
    /// Wrap wait failures in [`FlowError::PageObjectTimeout`].
    ///
    /// Driver and navigation errors pass through unchanged.
    fn in_step(self, page: &'static str, operation: &'static str) -> FlowResult<T>;
}

impl<T> StepContext<T> for FlowResult<T> {
    fn in_step(self, page: &'static str, operation: &'static str) -> FlowResult<T> {
        self.map_err(|err| {
            if !err.is_wait_failure() {
                return err;
            }
            FlowError::PageObjectTimeout {
                page,
                operation,
                element: err.element().unwrap_or(operation).to_string(),
                source: Box::new(err),
            }
        })
    }
}
