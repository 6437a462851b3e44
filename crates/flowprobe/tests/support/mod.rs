//! Scripted storefront and scraping pages for flow tests.
//!
//! The mock page is flat: every element of every screen is attached from the
//! start and rules flip visibility, text and URL the way the real site does
//! on client-side navigation.

#![allow(dead_code)]

use flowprobe::pages::{landing, login, payment, product, scrape, signup};
use flowprobe::prelude::*;

pub const BASE_URL: &str = "https://shop.test/#/";
pub const SPEAKERS_URL: &str = "https://shop.test/#/category/Speakers/4";
pub const PRODUCT_URL: &str = "https://shop.test/#/product/20";
pub const PAYMENT_URL: &str = "https://shop.test/#/orderPayment";
pub const GUEST_LOGIN_URL: &str = "https://shop.test/#/login";
pub const REGISTER_URL: &str = "https://shop.test/#/register";

pub const PRODUCT_NAME: &str = "Bose Soundlink Bluetooth Speaker III";
pub const PRODUCT_PRICE: &str = "$269.99";
pub const WRONG_CREDENTIALS: &str = "Incorrect user name or password.";
pub const USERNAME_REQUIRED: &str = "Username field is required";
pub const PASSWORD_REQUIRED: &str = "Password field is required";

pub const QUOTES_URL: &str = "https://quotes.test/";
pub const TEAMS_URL: &str = "https://cricket.test/";
pub const TEAMS: [&str; 3] = ["India", "Australia", "England"];

fn key(descriptor: ElementDescriptor) -> &'static str {
    descriptor.selector.key()
}

/// Small bounds so failing waits finish quickly
pub fn fast_timeouts() -> Timeouts {
    Timeouts::new()
        .with_action_ms(300)
        .with_navigation_ms(1_000)
        .with_network_idle_ms(1_000)
        .with_idle_window_ms(20)
        .with_poll_interval_ms(5)
}

pub fn session_for(driver: &MockDriver) -> Session {
    Session::new(driver.clone(), fast_timeouts())
}

pub fn persisted_user() -> PersistedUser {
    PersistedUser {
        username: "mayam123".into(),
        password: "Password_1!".into(),
        first_name: "Maya".into(),
        last_name: "Menon".into(),
        phone_number: "+919876543210".into(),
        country: "India".into(),
        city: "Thrissur".into(),
        address: "12 MG Road".into(),
        state: "Kerala".into(),
        postal_code: "680001".into(),
    }
}

/// Storefront that accepts exactly one account and shows `shipping` on
/// the payment page
pub fn storefront(account: &PersistedUser, shipping: &PersistedUser) -> MockDriver {
    build(account, shipping, true)
}

/// Storefront whose registration silently fails: the header stays empty
pub fn storefront_rejecting_signup(account: &PersistedUser) -> MockDriver {
    build(account, account, false)
}

fn build(account: &PersistedUser, shipping: &PersistedUser, signup_accepts: bool) -> MockDriver {
    let driver = MockDriver::new();
    let driver = with_landing(driver);
    let driver = with_login(driver, account);
    let driver = with_signup(driver, signup_accepts);
    let driver = with_catalog(driver);
    with_payment(driver, shipping)
}

fn with_landing(driver: MockDriver) -> MockDriver {
    driver
        .with_element(key(landing::SEE_OFFER), MockElement::new("SEE OFFER"))
        .with_element(key(landing::USER_ICON), MockElement::input())
        .with_element(key(landing::MENU_USER_LINK), MockElement::input())
        .with_element(key(landing::SIGN_OUT), MockElement::new("Sign out"))
        .with_element(key(landing::USER_LABEL), MockElement::new(""))
        .with_element(key(landing::SPEAKERS_LINK), MockElement::new("SPEAKERS"))
        .with_rule(MockRule::on_click(key(landing::SIGN_OUT)).set_text(key(landing::USER_LABEL), ""))
        .with_rule(MockRule::on_click(key(landing::SPEAKERS_LINK)).navigate_to(SPEAKERS_URL))
}

fn with_login(driver: MockDriver, account: &PersistedUser) -> MockDriver {
    driver
        .with_element(key(login::USERNAME), MockElement::input())
        .with_element(key(login::PASSWORD), MockElement::input())
        .with_element(key(login::SIGN_IN), MockElement::new("SIGN IN").disabled())
        .with_element(key(login::LOADER), MockElement::input().hidden())
        .with_element(key(login::CREATE_ACCOUNT), MockElement::new("CREATE NEW ACCOUNT"))
        .with_element(key(login::FIELD_VALIDATION), MockElement::new("").hidden())
        .with_element(key(login::RESULT_MESSAGE), MockElement::new("").hidden())
        .with_element(key(login::POPUP_CLOSE), MockElement::input())
        .with_rule(
            MockRule::on_fill(key(login::PASSWORD))
                .when_filled(key(login::USERNAME))
                .when_filled(key(login::PASSWORD))
                .enable(key(login::SIGN_IN)),
        )
        .with_rule(
            MockRule::on_key("Tab")
                .when_empty(key(login::USERNAME))
                .set_text(key(login::FIELD_VALIDATION), USERNAME_REQUIRED)
                .show(key(login::FIELD_VALIDATION)),
        )
        .with_rule(
            MockRule::on_key("Tab")
                .when_empty(key(login::PASSWORD))
                .set_text(key(login::FIELD_VALIDATION), PASSWORD_REQUIRED)
                .show(key(login::FIELD_VALIDATION)),
        )
        .with_rule(
            MockRule::on_click(key(login::SIGN_IN))
                .when_value(key(login::USERNAME), account.username.clone())
                .when_value(key(login::PASSWORD), account.password.clone())
                .copy_value(key(login::USERNAME), key(landing::USER_LABEL)),
        )
        .with_rule(
            MockRule::on_click(key(login::SIGN_IN))
                .set_text(key(login::RESULT_MESSAGE), WRONG_CREDENTIALS)
                .show(key(login::RESULT_MESSAGE)),
        )
        .with_rule(MockRule::on_click(key(login::CREATE_ACCOUNT)).navigate_to(REGISTER_URL))
}

fn with_signup(driver: MockDriver, accepts: bool) -> MockDriver {
    let inputs = [
        signup::USERNAME,
        signup::EMAIL,
        signup::PASSWORD,
        signup::CONFIRM_PASSWORD,
        signup::FIRST_NAME,
        signup::LAST_NAME,
        signup::PHONE,
        signup::COUNTRY,
        signup::CITY,
        signup::ADDRESS,
        signup::STATE,
        signup::POSTAL_CODE,
        signup::AGREE,
    ];
    let register = if accepts {
        MockRule::on_click(key(signup::REGISTER)).copy_value(key(signup::USERNAME), key(landing::USER_LABEL))
    } else {
        MockRule::on_click(key(signup::REGISTER))
    };
    inputs
        .iter()
        .fold(driver, |driver, input| driver.with_element(key(*input), MockElement::input()))
        .with_element(key(signup::REGISTER), MockElement::new("REGISTER").disabled())
        .with_rule(MockRule::on_check(key(signup::AGREE)).enable(key(signup::REGISTER)))
        .with_rule(register.navigate_to(BASE_URL))
}

fn with_catalog(driver: MockDriver) -> MockDriver {
    driver
        .with_element(key(product::CATEGORY_HEADING), MockElement::new("SPEAKERS"))
        .with_element(key(product::LISTING_SECTION), MockElement::input())
        .with_element(key(product::FIRST_ITEM), MockElement::new(PRODUCT_NAME))
        .with_element(key(product::BREADCRUMB), MockElement::new(PRODUCT_NAME.to_uppercase()))
        .with_element(key(product::TITLE), MockElement::new(PRODUCT_NAME.to_uppercase()))
        .with_element(key(product::PRICE), MockElement::new(PRODUCT_PRICE))
        .with_element(key(product::ADD_TO_CART), MockElement::new("ADD TO CART"))
        .with_element(key(product::CART_POPUP), MockElement::input().hidden())
        .with_elements(
            key(product::PRICE_LINES),
            vec![
                MockElement::new(PRODUCT_PRICE).hidden(),
                MockElement::new(format!("{PRODUCT_PRICE} ")).hidden(),
            ],
        )
        .with_element(key(product::CHECKOUT), MockElement::new("CHECKOUT"))
        .with_rule(MockRule::on_click(key(product::FIRST_ITEM)).navigate_to(PRODUCT_URL))
        .with_rule(
            MockRule::on_click(key(product::ADD_TO_CART))
                .show(key(product::CART_POPUP))
                .show(key(product::PRICE_LINES)),
        )
        .with_rule(
            MockRule::on_click(key(product::CHECKOUT))
                .when_text(key(landing::USER_LABEL), "")
                .show(key(payment::GUEST_LOGIN_FOLD))
                .navigate_to(GUEST_LOGIN_URL),
        )
        .with_rule(
            MockRule::on_click(key(product::CHECKOUT))
                .set_text(key(payment::SECTION_BREADCRUMB), payment::SECTION_TITLE)
                .navigate_to(PAYMENT_URL),
        )
}

fn with_payment(driver: MockDriver, shipping: &PersistedUser) -> MockDriver {
    let details = vec![
        MockElement::new(format!("{} {}", shipping.first_name, shipping.last_name)),
        MockElement::new(shipping.address.clone()),
        MockElement::new(shipping.city.clone()),
        MockElement::new(shipping.country.clone()),
        MockElement::new(shipping.state.clone()),
        MockElement::new(shipping.postal_code.clone()),
        MockElement::new(shipping.phone_number.clone()),
    ];
    driver
        .with_elements(key(payment::USER_DETAILS), details)
        .with_element(key(payment::NEXT), MockElement::new("NEXT"))
        .with_element(key(payment::MASTER_CREDIT), MockElement::input())
        .with_element(key(payment::SAFEPAY), MockElement::input())
        .with_element(key(payment::CARD_NUMBER), MockElement::input().hidden())
        .with_element(key(payment::CVV), MockElement::input().hidden())
        .with_element(key(payment::HOLDER), MockElement::input().hidden())
        .with_element(key(payment::PAY_NOW), MockElement::new("PAY NOW"))
        .with_element(
            key(payment::CONFIRMATION),
            MockElement::new(payment::CONFIRMATION_TEXT).hidden(),
        )
        .with_element(key(payment::GUEST_LOGIN_FOLD), MockElement::input().hidden())
        .with_rule(
            MockRule::on_check(key(payment::MASTER_CREDIT))
                .show(key(payment::CARD_NUMBER))
                .show(key(payment::CVV))
                .show(key(payment::HOLDER)),
        )
        .with_rule(MockRule::on_click(key(payment::PAY_NOW)).show(key(payment::CONFIRMATION)))
}

/// Quotes listing with numbered quotes
pub fn quotes_site() -> MockDriver {
    let texts = (1..=5)
        .map(|i| MockElement::new(format!("\u{201c}Quote number {i}.\u{201d}")))
        .collect();
    let authors = (1..=5).map(|i| MockElement::new(format!("Author {i}"))).collect();
    MockDriver::new()
        .with_element(key(scrape::QUOTES_HEADING), MockElement::new(scrape::QUOTES_TITLE))
        .with_elements(key(scrape::QUOTE_TEXT), texts)
        .with_elements(key(scrape::QUOTE_AUTHOR), authors)
}

/// Team directory whose menu reveals [`TEAMS`] on hover
pub fn team_directory() -> MockDriver {
    let links = TEAMS.iter().map(|t| MockElement::new(format!(" {t} "))).collect();
    let driver = MockDriver::new()
        .with_element(key(scrape::TEAMS_MENU), MockElement::new("Teams"))
        .with_element(key(scrape::TEST_TEAMS_HEADER), MockElement::new("Test Teams").hidden())
        .with_elements(key(scrape::TEST_TEAM_LINKS), links)
        .with_rule(MockRule::on_hover(key(scrape::TEAMS_MENU)).show(key(scrape::TEST_TEAMS_HEADER)));
    TEAMS.iter().fold(driver, |driver, team| {
        driver.with_rule(
            MockRule::on_click_text(key(scrape::TEST_TEAM_LINKS), *team)
                .set_text(key(scrape::TEAM_HEADING), team.to_lowercase())
                .navigate_to(format!("{TEAMS_URL}cricket-team/{}", team.to_lowercase())),
        )
    })
}
