//! Login popup.

use crate::locator::{ElementDescriptor, Selector};
use crate::page_object::{PageObject, StepContext};
use crate::result::FlowResult;
use crate::session::Session;
use crate::wait::LoadState;

/// Username (or email) input
pub const USERNAME: ElementDescriptor = ElementDescriptor::new("username input", Selector::xpath("//input[@name='username']"));
/// Password input
pub const PASSWORD: ElementDescriptor = ElementDescriptor::new("password input", Selector::xpath("//input[@name='password']"));
/// Sign-in button, disabled until both fields are filled
pub const SIGN_IN: ElementDescriptor = ElementDescriptor::new("sign in button", Selector::css("#sign_in_btn"));
/// Page-wide loader
pub const LOADER: ElementDescriptor = ElementDescriptor::new("main loader", Selector::xpath("(//div[@class='loader'])[1]"));
/// Link to the registration page
pub const CREATE_ACCOUNT: ElementDescriptor = ElementDescriptor::new(
    "create new account link",
    Selector::xpath("//a[contains(text(),'CREATE NEW ACCOUNT')]"),
);
/// Inline validation label under an empty field
pub const FIELD_VALIDATION: ElementDescriptor =
    ElementDescriptor::new("field validation message", Selector::xpath("//label[@class='invalid']"));
/// Authentication result message
pub const RESULT_MESSAGE: ElementDescriptor =
    ElementDescriptor::new("sign-in result message", Selector::xpath("//label[@id='signInResultMessage']"));
/// Popup close button
pub const POPUP_CLOSE: ElementDescriptor = ElementDescriptor::new(
    "login popup close button",
    Selector::xpath("//div[@class='closeBtn loginPopUpCloseBtn']"),
);

static ELEMENTS: [ElementDescriptor; 8] = [
    USERNAME,
    PASSWORD,
    SIGN_IN,
    LOADER,
    CREATE_ACCOUNT,
    FIELD_VALIDATION,
    RESULT_MESSAGE,
    POPUP_CLOSE,
];

/// URL marker of the registration page
pub const REGISTER_MARKER: &str = "register";

/// Login popup, opened from the landing page's user icon
#[derive(Debug, Clone, Copy, Default)]
pub struct LoginPage;

impl PageObject for LoginPage {
    fn page_name(&self) -> &'static str {
        "LoginPage"
    }

    fn elements(&self) -> &'static [ElementDescriptor] {
        &ELEMENTS
    }
}

impl LoginPage {
    /// Type credentials into the open popup without submitting.
    ///
    /// The sign-in button must start out disabled.
    pub async fn submit_credentials(&self, session: &mut Session, username: &str, password: &str) -> FlowResult<()> {
        async {
            session.wait_disabled(SIGN_IN).await?;
            session.fill(USERNAME, username).await?;
            session.fill(PASSWORD, password).await
        }
        .await
        .in_step(self.page_name(), "submit_credentials")
    }

    /// Press sign in and wait for the loader to go away
    pub async fn sign_in(&self, session: &mut Session) -> FlowResult<()> {
        async {
            session.click(SIGN_IN).await?;
            session.wait_hidden(LOADER).await
        }
        .await
        .in_step(self.page_name(), "sign_in")
    }

    /// Follow "create new account" from the open popup and return the URL
    /// of the registration page
    pub async fn open_create_account(&self, session: &mut Session) -> FlowResult<String> {
        async {
            session.click(CREATE_ACCOUNT).await?;
            session.wait_for_url_containing(REGISTER_MARKER).await
        }
        .await
        .in_step(self.page_name(), "open_create_account")
    }

    /// Authentication error shown after a rejected sign in
    pub async fn last_error_message(&self, session: &mut Session) -> FlowResult<String> {
        async {
            session.wait_visible(RESULT_MESSAGE).await?;
            session.wait_text_matching(RESULT_MESSAGE, |t| !t.is_empty()).await
        }
        .await
        .in_step(self.page_name(), "last_error_message")
    }

    /// Move focus off the form and read the inline validation message
    pub async fn field_validation_message(&self, session: &mut Session) -> FlowResult<String> {
        async {
            session.press_key("Tab").await?;
            session.wait_visible(FIELD_VALIDATION).await?;
            session.wait_text_matching(FIELD_VALIDATION, |t| !t.is_empty()).await
        }
        .await
        .in_step(self.page_name(), "field_validation_message")
    }

    /// Close the popup and reload the page to a clean state
    pub async fn close_popup(&self, session: &mut Session) -> FlowResult<()> {
        session
            .click(POPUP_CLOSE)
            .await
            .in_step(self.page_name(), "close_popup")?;
        session
            .reload(LoadState::NetworkIdle)
            .await
            .in_step(self.page_name(), "close_popup")
    }
}
