//! Storefront landing page: user menu, sign out and category links.

use crate::locator::{ElementDescriptor, Selector};
use crate::page_object::{PageObject, StepContext};
use crate::result::FlowResult;
use crate::session::Session;
use crate::wait::LoadState;
use tracing::info;

/// User icon that opens the login popup
pub const USER_ICON: ElementDescriptor = ElementDescriptor::new("user icon", Selector::id("hrefUserIcon"));
/// Logged-in user menu
pub const MENU_USER_LINK: ElementDescriptor = ElementDescriptor::new("user menu link", Selector::id("menuUserLink"));
/// "Sign out" entry of the user menu
pub const SIGN_OUT: ElementDescriptor = ElementDescriptor::new(
    "sign out entry",
    Selector::xpath("//div[@id='loginMiniTitle']//following::label[contains(text(),'Sign out')]"),
);
/// Username shown next to the user icon
pub const USER_LABEL: ElementDescriptor =
    ElementDescriptor::new("logged-in user label", Selector::xpath("//a[@id='menuUserLink']//span"));
/// Offer banner button, present once the landing page has rendered
pub const SEE_OFFER: ElementDescriptor =
    ElementDescriptor::new("see offer button", Selector::xpath("//button[@id='see_offer_btn']"));
/// Speakers category tile
pub const SPEAKERS_LINK: ElementDescriptor =
    ElementDescriptor::new("speakers shop-now link", Selector::xpath("//label[@id='speakersLink']"));

static ELEMENTS: [ElementDescriptor; 6] = [USER_ICON, MENU_USER_LINK, SIGN_OUT, USER_LABEL, SEE_OFFER, SPEAKERS_LINK];

/// URL marker of the speakers category
pub const SPEAKERS_MARKER: &str = "Speakers";

/// Storefront landing page
#[derive(Debug, Clone)]
pub struct LandingPage {
    base_url: String,
}

impl PageObject for LandingPage {
    fn page_name(&self) -> &'static str {
        "LandingPage"
    }

    fn elements(&self) -> &'static [ElementDescriptor] {
        &ELEMENTS
    }
}

impl LandingPage {
    /// Landing page served at `base_url`
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Storefront root URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Open the storefront and wait for the network to settle
    pub async fn go_to_storefront(&self, session: &mut Session) -> FlowResult<()> {
        info!(url = %self.base_url, "opening storefront");
        session
            .goto(&self.base_url, LoadState::NetworkIdle)
            .await
            .in_step(self.page_name(), "go_to_storefront")
    }

    /// Click the user icon once the page has rendered
    pub async fn open_user_menu(&self, session: &mut Session) -> FlowResult<()> {
        async {
            session.wait_visible(SEE_OFFER).await?;
            session.click(USER_ICON).await
        }
        .await
        .in_step(self.page_name(), "open_user_menu")
    }

    /// Username shown in the header once it is non-empty
    pub async fn current_user_label(&self, session: &mut Session) -> FlowResult<String> {
        async {
            session.wait_for_load_state(LoadState::Load).await?;
            session.wait_text_matching(USER_LABEL, |t| !t.is_empty()).await
        }
        .await
        .in_step(self.page_name(), "current_user_label")
    }

    /// Sign out and return the header label once it no longer shows
    /// `expected_username`; a removed label reads as `""`
    pub async fn sign_out(&self, session: &mut Session, expected_username: &str) -> FlowResult<String> {
        async {
            session.click(MENU_USER_LINK).await?;
            session.click(SIGN_OUT).await?;
            session.wait_for_load_state(LoadState::Load).await?;
            session.wait_text_leaving(USER_LABEL, expected_username).await
        }
        .await
        .in_step(self.page_name(), "sign_out")
    }

    /// Open the speakers category and return the URL it landed on
    pub async fn open_speakers_section(&self, session: &mut Session) -> FlowResult<String> {
        async {
            session.click(SPEAKERS_LINK).await?;
            session.wait_for_network_idle().await?;
            session.wait_for_url_containing(SPEAKERS_MARKER).await
        }
        .await
        .in_step(self.page_name(), "open_speakers_section")
    }
}
