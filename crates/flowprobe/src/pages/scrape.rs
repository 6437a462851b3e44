//! Scraping targets outside the storefront: a quotes listing and a cricket
//! team directory.

use crate::locator::{ElementDescriptor, Selector};
use crate::page_object::{PageObject, StepContext};
use crate::result::{FlowError, FlowResult};
use crate::session::Session;
use crate::wait::LoadState;
use serde::{Deserialize, Serialize};
use std::path::Path;

// =============================================================================
// QUOTES
// =============================================================================

/// Site title link
pub const QUOTES_HEADING: ElementDescriptor =
    ElementDescriptor::new("quotes heading", Selector::xpath("(//div[@class = 'col-md-8']//h1/a)"));
/// Text of each quote block
pub const QUOTE_TEXT: ElementDescriptor =
    ElementDescriptor::new("quote text", Selector::xpath("//div[@class='quote']//span[@class='text']"));
/// Author of each quote block
pub const QUOTE_AUTHOR: ElementDescriptor =
    ElementDescriptor::new("quote author", Selector::xpath("//div[@class='quote']//small[@class='author']"));

static QUOTE_ELEMENTS: [ElementDescriptor; 3] = [QUOTES_HEADING, QUOTE_TEXT, QUOTE_AUTHOR];

/// Heading the quotes site shows on its front page
pub const QUOTES_TITLE: &str = "Quotes to Scrape";

/// One quote block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteEntry {
    /// Quote text
    pub text: String,
    /// Author name
    pub author: String,
}

/// Quotes listing
#[derive(Debug, Clone)]
pub struct QuotesPage {
    url: String,
}

impl PageObject for QuotesPage {
    fn page_name(&self) -> &'static str {
        "QuotesPage"
    }

    fn elements(&self) -> &'static [ElementDescriptor] {
        &QUOTE_ELEMENTS
    }
}

impl QuotesPage {
    /// Listing served at `url`
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Open the listing
    pub async fn open(&self, session: &mut Session) -> FlowResult<()> {
        session
            .goto(&self.url, LoadState::NetworkIdle)
            .await
            .in_step(self.page_name(), "open")
    }

    /// Site heading
    pub async fn heading(&self, session: &mut Session) -> FlowResult<String> {
        session
            .read_text(QUOTES_HEADING)
            .await
            .in_step(self.page_name(), "heading")
    }

    /// Quote at a 1-based position
    pub async fn quote(&self, session: &mut Session, position: usize) -> FlowResult<QuoteEntry> {
        let index = position.checked_sub(1).ok_or_else(|| FlowError::Config {
            message: "quote positions start at 1".to_string(),
        })?;
        async {
            Ok::<_, FlowError>(QuoteEntry {
                text: session.read_text_nth(QUOTE_TEXT, index).await?,
                author: session.read_text_nth(QUOTE_AUTHOR, index).await?,
            })
        }
        .await
        .in_step(self.page_name(), "quote")
    }
}

// =============================================================================
// TEAM DIRECTORY
// =============================================================================

/// Teams entry of the top menu
pub const TEAMS_MENU: ElementDescriptor =
    ElementDescriptor::new("teams menu", Selector::xpath("(//a[@href='/cricket-team'])[2]"));
/// "Test Teams" column header of the teams menu
pub const TEST_TEAMS_HEADER: ElementDescriptor =
    ElementDescriptor::new("test teams header", Selector::xpath("//a[contains(text(),'Test Teams')]"));
/// Team links under the test-teams column
pub const TEST_TEAM_LINKS: ElementDescriptor = ElementDescriptor::new(
    "test team link",
    Selector::xpath("//a[contains(text(),'Test Teams')]/parent::div//div//a"),
);
/// Heading of a team page
pub const TEAM_HEADING: ElementDescriptor =
    ElementDescriptor::new("team heading", Selector::xpath("//main/div[1]/h1/div/h1"));

static TEAM_ELEMENTS: [ElementDescriptor; 4] = [TEAMS_MENU, TEST_TEAMS_HEADER, TEST_TEAM_LINKS, TEAM_HEADING];

/// Cricket site front page with its team menu
#[derive(Debug, Clone)]
pub struct TeamDirectoryPage {
    url: String,
}

impl PageObject for TeamDirectoryPage {
    fn page_name(&self) -> &'static str {
        "TeamDirectoryPage"
    }

    fn elements(&self) -> &'static [ElementDescriptor] {
        &TEAM_ELEMENTS
    }
}

impl TeamDirectoryPage {
    /// Directory served at `url`
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Front page URL
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Open the front page and return the URL it landed on
    pub async fn open(&self, session: &mut Session) -> FlowResult<String> {
        async {
            session.goto(&self.url, LoadState::Load).await?;
            session.current_url().await
        }
        .await
        .in_step(self.page_name(), "open")
    }

    /// Hover the teams menu until the "Test Teams" column shows
    pub async fn reveal_test_teams(&self, session: &mut Session) -> FlowResult<()> {
        async {
            session.hover(TEAMS_MENU).await?;
            session.wait_visible(TEST_TEAMS_HEADER).await
        }
        .await
        .in_step(self.page_name(), "reveal_test_teams")
    }

    /// Names of every test-playing team, trimmed, in menu order
    pub async fn test_team_names(&self, session: &mut Session) -> FlowResult<Vec<String>> {
        async {
            let count = session.count(TEST_TEAM_LINKS).await?;
            let mut names = Vec::with_capacity(count);
            for index in 0..count {
                names.push(session.read_text_nth(TEST_TEAM_LINKS, index).await?);
            }
            Ok::<_, FlowError>(names)
        }
        .await
        .in_step(self.page_name(), "test_team_names")
    }

    /// Open a team's page from the revealed menu
    pub async fn open_team(&self, session: &mut Session, name: &str) -> FlowResult<()> {
        async {
            session.click(TEST_TEAM_LINKS.with_text(name)).await?;
            session.wait_for_load_state(LoadState::Load).await
        }
        .await
        .in_step(self.page_name(), "open_team")
    }

    /// Heading of the open team page
    pub async fn team_heading(&self, session: &mut Session) -> FlowResult<String> {
        session
            .wait_text_matching(TEAM_HEADING, |t| !t.is_empty())
            .await
            .in_step(self.page_name(), "team_heading")
    }

    /// Save a screenshot of the open page
    pub async fn capture(&self, session: &mut Session, path: &Path) -> FlowResult<()> {
        session
            .save_screenshot(path)
            .await
            .in_step(self.page_name(), "capture")
    }
}
