//! Storefront and scraping flows.
//!
//! Each flow is a plain async function over one [`Session`] that composes
//! page objects and compares what they observe with what the fixtures
//! expect. The `*Scenario` types wrap the flows for [`ScenarioRunner`].
//!
//! [`ScenarioRunner`]: crate::scenario::ScenarioRunner

use crate::bridge::{TeamListSlot, UserBridge};
use crate::fixture::{
    load_negative_credentials, NegativeCredentialRow, PaymentCard, PaymentMethod, PersistedUser, UserFixture,
    UserGenerator,
};
use crate::page_object::wait_for_arrival;
use crate::pages::landing::SPEAKERS_MARKER;
use crate::pages::login::REGISTER_MARKER;
use crate::pages::payment::{CONFIRMATION_TEXT, LOGIN_MARKER, PAYMENT_MARKER, SECTION_TITLE};
use crate::pages::scrape::QUOTES_TITLE;
use crate::pages::{QuoteEntry, QuotesPage, Storefront, TeamDirectoryPage};
use crate::result::{FailureCategory, FlowError, FlowResult};
use crate::scenario::Scenario;
use crate::session::Session;
use crate::verify::Verify;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info, warn};

// =============================================================================
// CREDENTIAL BRANCHING
// =============================================================================

/// Which message a negative-login row is checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialBranch {
    /// A field was left empty: the inline validation label
    FieldValidation,
    /// Both fields filled: the sign-in result message
    AuthenticationError,
}

impl CredentialBranch {
    /// Branch for a pair of credentials
    #[must_use]
    pub fn for_credentials(email: &str, password: &str) -> Self {
        if email.is_empty() || password.is_empty() {
            Self::FieldValidation
        } else {
            Self::AuthenticationError
        }
    }

    /// Branch for a fixture row
    #[must_use]
    pub fn for_row(row: &NegativeCredentialRow) -> Self {
        Self::for_credentials(&row.email, &row.password)
    }
}

/// Product name and price as the storefront showed them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductReference {
    /// Name from the listing
    pub name: String,
    /// Price text from the detail page
    pub price_text: String,
}

// =============================================================================
// ACCOUNT FLOWS
// =============================================================================

/// Register a generated user, check the header shows them, persist them,
/// then sign out.
///
/// The user is persisted only once the header label proves registration
/// went through.
pub async fn signup_and_sign_out(
    session: &mut Session,
    shop: &Storefront,
    user: &UserFixture,
    bridge: &UserBridge,
) -> FlowResult<()> {
    user.validate()?;
    info!(username = %user.username, "registering user");

    shop.landing.go_to_storefront(session).await?;
    shop.landing.open_user_menu(session).await?;
    let url = shop.login.open_create_account(session).await?;
    Verify::url_contains("registration url", REGISTER_MARKER, &url)?;

    shop.signup.fill_profile(session, user).await?;
    shop.signup.submit(session).await?;

    let label = shop.landing.current_user_label(session).await?;
    Verify::equals("signed in username", &user.username, &label)?;
    bridge.save(&PersistedUser::from(user))?;

    let after = shop.landing.sign_out(session, &user.username).await?;
    Verify::not_equal("username after sign out", &user.username, &after)
}

async fn sign_in_as(session: &mut Session, shop: &Storefront, user: &PersistedUser) -> FlowResult<()> {
    shop.landing.go_to_storefront(session).await?;
    shop.landing.open_user_menu(session).await?;
    shop.login
        .submit_credentials(session, &user.username, &user.password)
        .await?;
    shop.login.sign_in(session).await?;
    let label = shop.landing.current_user_label(session).await?;
    Verify::equals("signed in username", &user.username, &label)
}

/// Sign in as the persisted user and sign out again
pub async fn login_and_sign_out(session: &mut Session, shop: &Storefront, bridge: &UserBridge) -> FlowResult<()> {
    let user = bridge.load()?;
    info!(username = %user.username, "signing in persisted user");
    sign_in_as(session, shop, &user).await?;
    let after = shop.landing.sign_out(session, &user.username).await?;
    Verify::not_equal("username after sign out", &user.username, &after)
}

/// Type one row's credentials into an open storefront and check the message.
///
/// The popup is closed and the page reloaded whether or not the message
/// matched. A cleanup failure after a mismatch is returned in place of the
/// mismatch.
async fn check_credential_row(session: &mut Session, shop: &Storefront, row: &NegativeCredentialRow) -> FlowResult<()> {
    let branch = CredentialBranch::for_row(row);
    debug!(row = row.row, branch = ?branch, "checking credential row");

    shop.landing.open_user_menu(session).await?;
    shop.login
        .submit_credentials(session, &row.email, &row.password)
        .await?;
    let observed = match branch {
        CredentialBranch::FieldValidation => shop.login.field_validation_message(session).await,
        CredentialBranch::AuthenticationError => match shop.login.sign_in(session).await {
            Ok(()) => shop.login.last_error_message(session).await,
            Err(err) => Err(err),
        },
    };
    let check = match branch {
        CredentialBranch::FieldValidation => format!("field validation message (row {})", row.row),
        CredentialBranch::AuthenticationError => format!("sign in error message (row {})", row.row),
    };
    let verdict = observed.and_then(|message| Verify::equals(&check, &row.error_message, &message));

    let closed = shop.login.close_popup(session).await;
    match (verdict, closed) {
        (Err(mismatch), Err(cleanup)) if mismatch.category() == FailureCategory::Assertion => {
            warn!(row = row.row, mismatch = %mismatch, "popup cleanup failed after a mismatch");
            Err(cleanup)
        }
        (verdict, closed) => verdict.and(closed),
    }
}

/// Check one negative-login row from a fresh storefront
pub async fn negative_login(session: &mut Session, shop: &Storefront, row: &NegativeCredentialRow) -> FlowResult<()> {
    shop.landing.go_to_storefront(session).await?;
    check_credential_row(session, shop, row).await
}

/// Check every row in one session.
///
/// Mismatches do not stop the run; they are collected into one
/// [`FlowError::AssertionMismatch`]. Any other failure aborts.
pub async fn negative_login_suite(
    session: &mut Session,
    shop: &Storefront,
    rows: &[NegativeCredentialRow],
) -> FlowResult<()> {
    if rows.is_empty() {
        return Err(FlowError::Fixture {
            message: "no negative credential rows to check".to_string(),
        });
    }
    shop.landing.go_to_storefront(session).await?;

    let mut mismatches = Vec::new();
    for row in rows {
        match check_credential_row(session, shop, row).await {
            Ok(()) => {}
            Err(FlowError::AssertionMismatch { check, expected, actual }) => {
                mismatches.push(format!("{check}: expected '{expected}', got '{actual}'"));
            }
            Err(err) => return Err(err),
        }
    }
    info!(rows = rows.len(), mismatched = mismatches.len(), "negative login rows checked");

    if mismatches.is_empty() {
        Ok(())
    } else {
        Err(FlowError::mismatch(
            "negative login rows",
            format!("all {} rows to match", rows.len()),
            mismatches.join("; "),
        ))
    }
}

// =============================================================================
// CHECKOUT FLOWS
// =============================================================================

/// Open the first speaker and check listing, title and breadcrumb agree
async fn pick_first_speaker(session: &mut Session, shop: &Storefront) -> FlowResult<ProductReference> {
    let url = shop.landing.open_speakers_section(session).await?;
    Verify::url_contains("speakers url", SPEAKERS_MARKER, &url)?;
    let heading = shop.listing.category_heading(session).await?;
    Verify::equals("category heading", "SPEAKERS", &heading)?;

    let name = shop.listing.first_item_name(session).await?;
    shop.listing.open_first_item(session).await?;
    let breadcrumb = shop.detail.breadcrumb(session).await?;
    Verify::equals_ignore_case("breadcrumb product name", &name, &breadcrumb)?;
    let title = shop.detail.title(session).await?;
    Verify::equals_ignore_case("product title", &name, &title)?;

    let price_text = shop.detail.displayed_price(session).await?;
    debug!(product = %name, price = %price_text, "picked product");
    Ok(ProductReference { name, price_text })
}

/// Add the open product to the cart, check the popup price, go to checkout
async fn add_and_checkout(session: &mut Session, shop: &Storefront, product: &ProductReference) -> FlowResult<()> {
    shop.detail.add_to_cart(session).await?;
    let popup = shop.detail.cart_popup_price(session).await?;
    Verify::prices_match("cart popup price", &product.price_text, &popup)?;
    shop.detail.proceed_to_checkout(session).await
}

/// A guest who checks out is asked to log in instead of paying
pub async fn guest_checkout_requires_login(session: &mut Session, shop: &Storefront) -> FlowResult<ProductReference> {
    shop.landing.go_to_storefront(session).await?;
    let product = pick_first_speaker(session, shop).await?;
    add_and_checkout(session, shop, &product).await?;

    let prompt = shop.payment.guest_login_prompt_visible(session).await?;
    Verify::is_true("guest login prompt shown", prompt)?;
    let url = session.current_url().await?;
    Verify::url_contains("guest checkout url", LOGIN_MARKER, &url)?;
    Ok(product)
}

/// A signed-in user buys the first speaker by card
pub async fn member_checkout(
    session: &mut Session,
    shop: &Storefront,
    bridge: &UserBridge,
    card: &PaymentCard,
) -> FlowResult<ProductReference> {
    let user = bridge.load()?;
    info!(username = %user.username, "member checkout");
    sign_in_as(session, shop, &user).await?;

    let product = pick_first_speaker(session, shop).await?;
    add_and_checkout(session, shop, &product).await?;

    let url = wait_for_arrival(&shop.payment, session).await?;
    Verify::url_contains("payment url", PAYMENT_MARKER, &url)?;
    let title = shop.payment.section_title(session).await?;
    Verify::equals("payment section title", SECTION_TITLE, &title)?;

    let details = shop.payment.displayed_user_details(session).await?;
    Verify::user_details_match(&user, &details)?;
    let total = shop.payment.displayed_order_total(session).await?;
    Verify::prices_match("order total", &product.price_text, &total)?;

    shop.payment.proceed_to_payment_method(session).await?;
    shop.payment.select_method(session, PaymentMethod::MasterCredit).await?;
    shop.payment.submit_card_payment(session, card).await?;

    let confirmation = shop.payment.confirmation_message(session).await?;
    Verify::equals("payment confirmation", CONFIRMATION_TEXT, &confirmation)?;
    Ok(product)
}

// =============================================================================
// SCRAPING FLOWS
// =============================================================================

/// Open the quotes site, check its heading, read the quote at `position`
pub async fn read_quote(session: &mut Session, page: &QuotesPage, position: usize) -> FlowResult<QuoteEntry> {
    page.open(session).await?;
    let heading = page.heading(session).await?;
    Verify::equals("quotes heading", QUOTES_TITLE, &heading)?;

    let quote = page.quote(session, position).await?;
    Verify::is_true("quote text present", !quote.text.is_empty())?;
    Verify::is_true("quote author present", !quote.author.is_empty())?;
    info!(position, author = %quote.author, "read quote");
    Ok(quote)
}

/// List the test-playing teams and persist the names
pub async fn collect_test_teams(
    session: &mut Session,
    page: &TeamDirectoryPage,
    slot: &TeamListSlot,
) -> FlowResult<Vec<String>> {
    let url = page.open(session).await?;
    Verify::url_contains("team directory url", page.url(), &url)?;
    page.reveal_test_teams(session).await?;

    let teams = page.test_team_names(session).await?;
    Verify::is_true("test teams listed", !teams.is_empty())?;
    slot.save(&teams)?;
    info!(teams = teams.len(), "collected test teams");
    Ok(teams)
}

/// Visit every persisted team's page, check its heading, screenshot it.
///
/// Returns the screenshot paths in team order.
pub async fn capture_team_pages(
    session: &mut Session,
    page: &TeamDirectoryPage,
    slot: &TeamListSlot,
    screenshot_dir: &std::path::Path,
) -> FlowResult<Vec<PathBuf>> {
    let teams = slot.load()?;
    let mut shots = Vec::with_capacity(teams.len());
    for team in &teams {
        page.open(session).await?;
        page.reveal_test_teams(session).await?;
        page.open_team(session, team).await?;

        let heading = page.team_heading(session).await?;
        Verify::equals("team heading", &team.to_lowercase(), &heading)?;

        let path = screenshot_dir.join(format!("{team}_page.png"));
        page.capture(session, &path).await?;
        debug!(team = %team, path = %path.display(), "captured team page");
        shots.push(path);
    }
    Ok(shots)
}

// =============================================================================
// SCENARIOS
// =============================================================================

/// Register a freshly generated user
#[derive(Debug)]
pub struct SignupScenario {
    shop: Storefront,
    generator: Mutex<UserGenerator>,
    bridge: UserBridge,
}

impl SignupScenario {
    /// Scenario writing the registered user to `bridge`
    #[must_use]
    pub fn new(shop: Storefront, generator: UserGenerator, bridge: UserBridge) -> Self {
        Self {
            shop,
            generator: Mutex::new(generator),
            bridge,
        }
    }
}

#[async_trait]
impl Scenario for SignupScenario {
    fn name(&self) -> &str {
        "signup and sign out"
    }

    async fn run(&self, session: &mut Session) -> FlowResult<()> {
        let user = self
            .generator
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .generate();
        signup_and_sign_out(session, &self.shop, &user, &self.bridge).await
    }
}

/// Sign in as the persisted user
#[derive(Debug)]
pub struct LoginScenario {
    shop: Storefront,
    bridge: UserBridge,
}

impl LoginScenario {
    /// Scenario reading the user from `bridge`
    #[must_use]
    pub const fn new(shop: Storefront, bridge: UserBridge) -> Self {
        Self { shop, bridge }
    }
}

#[async_trait]
impl Scenario for LoginScenario {
    fn name(&self) -> &str {
        "login and sign out"
    }

    async fn run(&self, session: &mut Session) -> FlowResult<()> {
        login_and_sign_out(session, &self.shop, &self.bridge).await
    }
}

/// One negative-login row in its own session
#[derive(Debug)]
pub struct NegativeLoginScenario {
    name: String,
    shop: Storefront,
    row: NegativeCredentialRow,
}

impl NegativeLoginScenario {
    /// Scenario for one row
    #[must_use]
    pub fn new(shop: Storefront, row: NegativeCredentialRow) -> Self {
        Self {
            name: format!("negative login row {}", row.row),
            shop,
            row,
        }
    }
}

#[async_trait]
impl Scenario for NegativeLoginScenario {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, session: &mut Session) -> FlowResult<()> {
        negative_login(session, &self.shop, &self.row).await
    }
}

/// Every row of a negative-login sheet in one session.
///
/// The workbook is read when the scenario runs, so a broken sheet is
/// reported as a setup failure of this scenario.
#[derive(Debug)]
pub struct NegativeLoginSuiteScenario {
    shop: Storefront,
    workbook: PathBuf,
    sheet: String,
}

impl NegativeLoginSuiteScenario {
    /// Scenario over `sheet` of `workbook`
    #[must_use]
    pub fn new(shop: Storefront, workbook: impl Into<PathBuf>, sheet: impl Into<String>) -> Self {
        Self {
            shop,
            workbook: workbook.into(),
            sheet: sheet.into(),
        }
    }
}

#[async_trait]
impl Scenario for NegativeLoginSuiteScenario {
    fn name(&self) -> &str {
        "negative login suite"
    }

    async fn run(&self, session: &mut Session) -> FlowResult<()> {
        let rows = load_negative_credentials(&self.workbook, &self.sheet)?;
        negative_login_suite(session, &self.shop, &rows).await
    }
}

/// Guest checkout ends at the login prompt
#[derive(Debug)]
pub struct GuestCheckoutScenario {
    shop: Storefront,
}

impl GuestCheckoutScenario {
    /// Scenario for the given storefront
    #[must_use]
    pub const fn new(shop: Storefront) -> Self {
        Self { shop }
    }
}

#[async_trait]
impl Scenario for GuestCheckoutScenario {
    fn name(&self) -> &str {
        "guest checkout requires login"
    }

    async fn run(&self, session: &mut Session) -> FlowResult<()> {
        guest_checkout_requires_login(session, &self.shop).await.map(drop)
    }
}

/// Persisted user pays by card
#[derive(Debug)]
pub struct MemberCheckoutScenario {
    shop: Storefront,
    bridge: UserBridge,
    card: PaymentCard,
}

impl MemberCheckoutScenario {
    /// Scenario paying with `card`
    #[must_use]
    pub const fn new(shop: Storefront, bridge: UserBridge, card: PaymentCard) -> Self {
        Self { shop, bridge, card }
    }
}

#[async_trait]
impl Scenario for MemberCheckoutScenario {
    fn name(&self) -> &str {
        "member checkout"
    }

    async fn run(&self, session: &mut Session) -> FlowResult<()> {
        member_checkout(session, &self.shop, &self.bridge, &self.card)
            .await
            .map(drop)
    }
}

/// Read one quote
#[derive(Debug)]
pub struct QuoteScenario {
    page: QuotesPage,
    position: usize,
}

impl QuoteScenario {
    /// Scenario reading the quote at 1-based `position`
    #[must_use]
    pub const fn new(page: QuotesPage, position: usize) -> Self {
        Self { page, position }
    }
}

#[async_trait]
impl Scenario for QuoteScenario {
    fn name(&self) -> &str {
        "read quote"
    }

    async fn run(&self, session: &mut Session) -> FlowResult<()> {
        read_quote(session, &self.page, self.position).await.map(drop)
    }
}

/// Collect and persist the test team names
#[derive(Debug)]
pub struct CollectTeamsScenario {
    page: TeamDirectoryPage,
    slot: TeamListSlot,
}

impl CollectTeamsScenario {
    /// Scenario writing the names to `slot`
    #[must_use]
    pub const fn new(page: TeamDirectoryPage, slot: TeamListSlot) -> Self {
        Self { page, slot }
    }
}

#[async_trait]
impl Scenario for CollectTeamsScenario {
    fn name(&self) -> &str {
        "collect test teams"
    }

    async fn run(&self, session: &mut Session) -> FlowResult<()> {
        collect_test_teams(session, &self.page, &self.slot).await.map(drop)
    }
}

/// Visit and screenshot every persisted team
#[derive(Debug)]
pub struct TeamPagesScenario {
    page: TeamDirectoryPage,
    slot: TeamListSlot,
    screenshot_dir: PathBuf,
}

impl TeamPagesScenario {
    /// Scenario reading names from `slot`, writing screenshots under `screenshot_dir`
    #[must_use]
    pub fn new(page: TeamDirectoryPage, slot: TeamListSlot, screenshot_dir: impl Into<PathBuf>) -> Self {
        Self {
            page,
            slot,
            screenshot_dir: screenshot_dir.into(),
        }
    }
}

#[async_trait]
impl Scenario for TeamPagesScenario {
    fn name(&self) -> &str {
        "capture team pages"
    }

    async fn run(&self, session: &mut Session) -> FlowResult<()> {
        capture_team_pages(session, &self.page, &self.slot, &self.screenshot_dir)
            .await
            .map(drop)
    }
}
