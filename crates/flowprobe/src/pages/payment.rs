//! Order payment page.

use crate::fixture::{PaymentCard, PaymentMethod};
use crate::locator::{ElementDescriptor, Selector};
use crate::page_object::{PageObject, StepContext};
use crate::result::{FlowError, FlowResult};
use crate::session::Session;
use serde::{Deserialize, Serialize};

/// Third breadcrumb entry, naming the checkout section
pub const SECTION_BREADCRUMB: ElementDescriptor = ElementDescriptor::new(
    "section breadcrumb",
    Selector::xpath("(//nav[contains(@class,'fixedImportant ')]//a)[3]"),
);
/// Labels of the shipping details block, in display order
pub const USER_DETAILS: ElementDescriptor =
    ElementDescriptor::new("user detail label", Selector::xpath("//div[@id='userDetails']//div//label"));
/// Price lines of the order summary; the total is the second
pub const SUMMARY_PRICES: ElementDescriptor =
    ElementDescriptor::new("order summary price", Selector::xpath("//p[contains(@class,'price ')]"));
/// Continue from shipping details to payment method
pub const NEXT: ElementDescriptor = ElementDescriptor::new("next button", Selector::xpath("(//button[@id='next_btn'])[1]"));
/// MasterCredit radio
pub const MASTER_CREDIT: ElementDescriptor =
    ElementDescriptor::new("master credit radio", Selector::xpath("//input[@name='masterCredit']"));
/// SafePay radio
pub const SAFEPAY: ElementDescriptor = ElementDescriptor::new("safepay radio", Selector::xpath("//input[@name='safepay']"));
/// Card number input, shown once MasterCredit is picked
pub const CARD_NUMBER: ElementDescriptor =
    ElementDescriptor::new("card number input", Selector::xpath("//input[@name='card_number']"));
/// Card security code input
pub const CVV: ElementDescriptor = ElementDescriptor::new("cvv input", Selector::xpath("//input[@name='cvv_number']"));
/// Name-on-card input
pub const HOLDER: ElementDescriptor =
    ElementDescriptor::new("cardholder name input", Selector::xpath("//input[@name='cardholder_name']"));
/// Pay now button of the card form
pub const PAY_NOW: ElementDescriptor =
    ElementDescriptor::new("pay now button", Selector::xpath("//button[@id='pay_now_btn_ManualPayment']"));
/// Heading of the order confirmation
pub const CONFIRMATION: ElementDescriptor = ElementDescriptor::new(
    "payment confirmation",
    Selector::xpath("//div[@id='orderPaymentSuccess']//h2/span"),
);
/// Login prompt shown to guests
pub const GUEST_LOGIN_FOLD: ElementDescriptor =
    ElementDescriptor::new("guest login prompt", Selector::xpath("//div[@class='noUserSection']"));

static ELEMENTS: [ElementDescriptor; 12] = [
    SECTION_BREADCRUMB,
    USER_DETAILS,
    SUMMARY_PRICES,
    NEXT,
    MASTER_CREDIT,
    SAFEPAY,
    CARD_NUMBER,
    CVV,
    HOLDER,
    PAY_NOW,
    CONFIRMATION,
    GUEST_LOGIN_FOLD,
];

/// URL marker of the payment page
pub const PAYMENT_MARKER: &str = "orderPayment";
/// URL marker shown to guests redirected to log in
pub const LOGIN_MARKER: &str = "login";
/// Breadcrumb title of the payment page
pub const SECTION_TITLE: &str = "ORDER PAYMENT";
/// Message shown after a successful payment
pub const CONFIRMATION_TEXT: &str = "Thank you for buying with Advantage";

/// Shipping details as the payment page shows them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayedUserDetails {
    /// First and last name
    pub full_name: String,
    /// Street address
    pub address: String,
    /// City
    pub city: String,
    /// Country
    pub country: String,
    /// State
    pub state: String,
    /// Postal code
    pub postal_code: String,
    /// Phone number
    pub phone_number: String,
}

/// Order payment page
#[derive(Debug, Clone, Copy, Default)]
pub struct PaymentPage;

impl PageObject for PaymentPage {
    fn page_name(&self) -> &'static str {
        "PaymentPage"
    }

    fn elements(&self) -> &'static [ElementDescriptor] {
        &ELEMENTS
    }

    fn url_marker(&self) -> Option<&'static str> {
        Some(PAYMENT_MARKER)
    }
}

impl PaymentPage {
    /// Breadcrumb title of the current section
    pub async fn section_title(&self, session: &mut Session) -> FlowResult<String> {
        session
            .read_text(SECTION_BREADCRUMB)
            .await
            .in_step(self.page_name(), "section_title")
    }

    /// Read the seven shipping detail labels
    pub async fn displayed_user_details(&self, session: &mut Session) -> FlowResult<DisplayedUserDetails> {
        async {
            Ok::<_, FlowError>(DisplayedUserDetails {
                full_name: session.read_text_nth(USER_DETAILS, 0).await?,
                address: session.read_text_nth(USER_DETAILS, 1).await?,
                city: session.read_text_nth(USER_DETAILS, 2).await?,
                country: session.read_text_nth(USER_DETAILS, 3).await?,
                state: session.read_text_nth(USER_DETAILS, 4).await?,
                postal_code: session.read_text_nth(USER_DETAILS, 5).await?,
                phone_number: session.read_text_nth(USER_DETAILS, 6).await?,
            })
        }
        .await
        .in_step(self.page_name(), "displayed_user_details")
    }

    /// Order total of the summary block
    pub async fn displayed_order_total(&self, session: &mut Session) -> FlowResult<String> {
        session
            .read_text_nth(SUMMARY_PRICES, 1)
            .await
            .in_step(self.page_name(), "displayed_order_total")
    }

    /// Continue from shipping details to payment method
    pub async fn proceed_to_payment_method(&self, session: &mut Session) -> FlowResult<()> {
        async {
            session.click(NEXT).await?;
            session.wait_for_network_idle().await
        }
        .await
        .in_step(self.page_name(), "proceed_to_payment_method")
    }

    /// Pick a payment method; card methods wait for the card form
    pub async fn select_method(&self, session: &mut Session, method: PaymentMethod) -> FlowResult<()> {
        let radio = match method {
            PaymentMethod::MasterCredit => MASTER_CREDIT,
            PaymentMethod::SafePay => SAFEPAY,
        };
        async {
            session.wait_visible(radio).await?;
            session.check(radio).await?;
            if method.needs_card() {
                session.wait_visible(CARD_NUMBER).await?;
            }
            Ok::<_, FlowError>(())
        }
        .await
        .in_step(self.page_name(), "select_method")
    }

    /// Type the card details and pay
    pub async fn submit_card_payment(&self, session: &mut Session, card: &PaymentCard) -> FlowResult<()> {
        async {
            session.fill(CARD_NUMBER, &card.number).await?;
            session.fill(CVV, &card.cvv).await?;
            session.fill(HOLDER, &card.holder_name).await?;
            session.click(PAY_NOW).await?;
            session.wait_for_network_idle().await
        }
        .await
        .in_step(self.page_name(), "submit_card_payment")
    }

    /// Confirmation shown after paying
    pub async fn confirmation_message(&self, session: &mut Session) -> FlowResult<String> {
        async {
            session.wait_visible(CONFIRMATION).await?;
            session.read_text(CONFIRMATION).await
        }
        .await
        .in_step(self.page_name(), "confirmation_message")
    }

    /// Whether the guest login prompt shows up within the action timeout
    pub async fn guest_login_prompt_visible(&self, session: &mut Session) -> FlowResult<bool> {
        match session.wait_visible(GUEST_LOGIN_FOLD).await {
            Ok(()) => Ok(true),
            Err(err) if err.is_wait_failure() => Ok(false),
            Err(err) => Err(err).in_step(self.page_name(), "guest_login_prompt_visible"),
        }
    }
}
