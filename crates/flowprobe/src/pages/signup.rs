//! Registration form.

use crate::fixture::UserFixture;
use crate::locator::{ElementDescriptor, Selector};
use crate::page_object::{PageObject, StepContext};
use crate::result::FlowResult;
use crate::session::Session;

/// Username input
pub const USERNAME: ElementDescriptor =
    ElementDescriptor::new("username input", Selector::xpath("//input[@name='usernameRegisterPage']"));
/// Email input
pub const EMAIL: ElementDescriptor =
    ElementDescriptor::new("email input", Selector::xpath("//input[@name='emailRegisterPage']"));
/// Password input
pub const PASSWORD: ElementDescriptor =
    ElementDescriptor::new("password input", Selector::xpath("//input[@name='passwordRegisterPage']"));
/// Password confirmation input
pub const CONFIRM_PASSWORD: ElementDescriptor = ElementDescriptor::new(
    "confirm password input",
    Selector::xpath("//input[@name='confirm_passwordRegisterPage']"),
);
/// First name input
pub const FIRST_NAME: ElementDescriptor =
    ElementDescriptor::new("first name input", Selector::xpath("//input[@name='first_nameRegisterPage']"));
/// Last name input
pub const LAST_NAME: ElementDescriptor =
    ElementDescriptor::new("last name input", Selector::xpath("//input[@name='last_nameRegisterPage']"));
/// Phone number input
pub const PHONE: ElementDescriptor =
    ElementDescriptor::new("phone number input", Selector::xpath("//input[@name='phone_numberRegisterPage']"));
/// Country dropdown
pub const COUNTRY: ElementDescriptor = ElementDescriptor::new(
    "country select",
    Selector::xpath("//select[@name='countryListboxRegisterPage']"),
);
/// City input
pub const CITY: ElementDescriptor =
    ElementDescriptor::new("city input", Selector::xpath("//input[@name='cityRegisterPage']"));
/// Street address input
pub const ADDRESS: ElementDescriptor =
    ElementDescriptor::new("address input", Selector::xpath("//input[@name='addressRegisterPage']"));
/// State, province or region input
pub const STATE: ElementDescriptor = ElementDescriptor::new(
    "state input",
    Selector::xpath("//input[@name='state_/_province_/_regionRegisterPage']"),
);
/// Postal code input
pub const POSTAL_CODE: ElementDescriptor =
    ElementDescriptor::new("postal code input", Selector::xpath("//input[@name='postal_codeRegisterPage']"));
/// Terms agreement checkbox
pub const AGREE: ElementDescriptor = ElementDescriptor::new("i agree checkbox", Selector::xpath("//input[@name='i_agree']"));
/// Register button, disabled until the agreement is checked
pub const REGISTER: ElementDescriptor =
    ElementDescriptor::new("register button", Selector::xpath("//button[@id='register_btn']"));

static ELEMENTS: [ElementDescriptor; 14] = [
    USERNAME,
    EMAIL,
    PASSWORD,
    CONFIRM_PASSWORD,
    FIRST_NAME,
    LAST_NAME,
    PHONE,
    COUNTRY,
    CITY,
    ADDRESS,
    STATE,
    POSTAL_CODE,
    AGREE,
    REGISTER,
];

/// Registration page reached from the login popup
#[derive(Debug, Clone, Copy, Default)]
pub struct SignupPage;

impl PageObject for SignupPage {
    fn page_name(&self) -> &'static str {
        "SignupPage"
    }

    fn elements(&self) -> &'static [ElementDescriptor] {
        &ELEMENTS
    }

    fn url_marker(&self) -> Option<&'static str> {
        Some(super::login::REGISTER_MARKER)
    }
}

impl SignupPage {
    /// Type every field of the form
    pub async fn fill_profile(&self, session: &mut Session, user: &UserFixture) -> FlowResult<()> {
        async {
            session.fill(USERNAME, &user.username).await?;
            session.fill(EMAIL, &user.email).await?;
            session.fill(PASSWORD, &user.password).await?;
            session.fill(CONFIRM_PASSWORD, &user.confirm_password).await?;

            session.fill(FIRST_NAME, &user.first_name).await?;
            session.fill(LAST_NAME, &user.last_name).await?;
            session.fill(PHONE, &user.phone_number).await?;

            session.select(COUNTRY, &user.country).await?;
            session.fill(CITY, &user.city).await?;
            session.fill(ADDRESS, &user.address).await?;
            session.fill(STATE, &user.state).await?;
            session.fill(POSTAL_CODE, &user.postal_code).await
        }
        .await
        .in_step(self.page_name(), "fill_profile")
    }

    /// Accept the terms and register
    pub async fn submit(&self, session: &mut Session) -> FlowResult<()> {
        async {
            session.check(AGREE).await?;
            session.click(REGISTER).await
        }
        .await
        .in_step(self.page_name(), "submit")
    }
}
