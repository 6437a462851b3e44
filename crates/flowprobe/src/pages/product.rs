//! Category listing and product detail pages, including the cart popup.

use crate::locator::{ElementDescriptor, Selector};
use crate::page_object::{PageObject, StepContext};
use crate::result::FlowResult;
use crate::session::Session;

// =============================================================================
// LISTING
// =============================================================================

/// Category heading in the breadcrumb bar
pub const CATEGORY_HEADING: ElementDescriptor = ElementDescriptor::new(
    "category heading",
    Selector::xpath("//nav[contains(@class,'pages categoryDataFixedNav')]//a[contains(text(),'SPEAKERS')]"),
);
/// Product grid
pub const LISTING_SECTION: ElementDescriptor =
    ElementDescriptor::new("product listing section", Selector::xpath("//div[@class='cell categoryRight']"));
/// First product link of the grid
pub const FIRST_ITEM: ElementDescriptor = ElementDescriptor::new(
    "first listed product",
    Selector::xpath("(//div[@class='cell categoryRight']//ul//li//a)[1]"),
);

static LISTING_ELEMENTS: [ElementDescriptor; 3] = [CATEGORY_HEADING, LISTING_SECTION, FIRST_ITEM];

/// Product listing of one category
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductListingPage;

impl PageObject for ProductListingPage {
    fn page_name(&self) -> &'static str {
        "ProductListingPage"
    }

    fn elements(&self) -> &'static [ElementDescriptor] {
        &LISTING_ELEMENTS
    }

    fn url_marker(&self) -> Option<&'static str> {
        Some(super::landing::SPEAKERS_MARKER)
    }
}

impl ProductListingPage {
    /// Heading of the category once the grid is showing
    pub async fn category_heading(&self, session: &mut Session) -> FlowResult<String> {
        async {
            session.wait_visible(LISTING_SECTION).await?;
            session.read_text(CATEGORY_HEADING).await
        }
        .await
        .in_step(self.page_name(), "category_heading")
    }

    /// Name of the first product
    pub async fn first_item_name(&self, session: &mut Session) -> FlowResult<String> {
        session
            .read_text(FIRST_ITEM)
            .await
            .in_step(self.page_name(), "first_item_name")
    }

    /// Open the first product's detail page
    pub async fn open_first_item(&self, session: &mut Session) -> FlowResult<()> {
        async {
            session.click(FIRST_ITEM).await?;
            session.wait_for_network_idle().await
        }
        .await
        .in_step(self.page_name(), "open_first_item")
    }
}

// =============================================================================
// DETAIL
// =============================================================================

/// Third breadcrumb entry: the product (or section) name
pub const BREADCRUMB: ElementDescriptor = ElementDescriptor::new(
    "breadcrumb title",
    Selector::xpath("(//nav[contains(@class,'fixedImportant ')]//a)[3]"),
);
/// Product title
pub const TITLE: ElementDescriptor = ElementDescriptor::new(
    "product title",
    Selector::xpath("//h1[@class='roboto-regular screen768 ng-binding']"),
);
/// Price in the description block
pub const PRICE: ElementDescriptor =
    ElementDescriptor::new("product price", Selector::xpath("(//div[@id='Description']//h2)[1]"));
/// Add to cart button
pub const ADD_TO_CART: ElementDescriptor =
    ElementDescriptor::new("add to cart button", Selector::xpath("//button[@name='save_to_cart']"));
/// Cart popup
pub const CART_POPUP: ElementDescriptor = ElementDescriptor::new("cart popup", Selector::xpath("//li//*[@id='toolTipCart']"));
/// Price lines; the cart popup line comes first, the order summary line second
pub const PRICE_LINES: ElementDescriptor =
    ElementDescriptor::new("price line", Selector::xpath("//p[contains(@class,'price ')]"));
/// Checkout button of the cart popup
pub const CHECKOUT: ElementDescriptor =
    ElementDescriptor::new("checkout button", Selector::xpath("//li//*[@id='checkOutPopUp']"));

static DETAIL_ELEMENTS: [ElementDescriptor; 7] = [BREADCRUMB, TITLE, PRICE, ADD_TO_CART, CART_POPUP, PRICE_LINES, CHECKOUT];

/// Product detail page
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductDetailPage;

impl PageObject for ProductDetailPage {
    fn page_name(&self) -> &'static str {
        "ProductDetailPage"
    }

    fn elements(&self) -> &'static [ElementDescriptor] {
        &DETAIL_ELEMENTS
    }
}

impl ProductDetailPage {
    /// Product title text
    pub async fn title(&self, session: &mut Session) -> FlowResult<String> {
        session.read_text(TITLE).await.in_step(self.page_name(), "title")
    }

    /// Breadcrumb product name
    pub async fn breadcrumb(&self, session: &mut Session) -> FlowResult<String> {
        session
            .read_text(BREADCRUMB)
            .await
            .in_step(self.page_name(), "breadcrumb")
    }

    /// Displayed price text once visible
    pub async fn displayed_price(&self, session: &mut Session) -> FlowResult<String> {
        async {
            session.wait_visible(PRICE).await?;
            session.read_text(PRICE).await
        }
        .await
        .in_step(self.page_name(), "displayed_price")
    }

    /// Add the product to the cart
    pub async fn add_to_cart(&self, session: &mut Session) -> FlowResult<()> {
        session
            .click(ADD_TO_CART)
            .await
            .in_step(self.page_name(), "add_to_cart")
    }

    /// Price shown in the cart popup
    pub async fn cart_popup_price(&self, session: &mut Session) -> FlowResult<String> {
        async {
            session.wait_visible(CART_POPUP).await?;
            session.wait_visible(PRICE_LINES).await?;
            session.read_text(PRICE_LINES).await
        }
        .await
        .in_step(self.page_name(), "cart_popup_price")
    }

    /// Leave for checkout from the cart popup
    pub async fn proceed_to_checkout(&self, session: &mut Session) -> FlowResult<()> {
        async {
            session.click(CHECKOUT).await?;
            session.wait_for_network_idle().await
        }
        .await
        .in_step(self.page_name(), "proceed_to_checkout")
    }
}
