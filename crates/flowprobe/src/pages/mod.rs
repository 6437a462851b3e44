//! Page objects for the storefront and the scraping targets.
//!
//! Each page keeps its selectors in a `'static` descriptor table next to the
//! operations that use them.

pub mod landing;
pub mod login;
pub mod payment;
pub mod product;
pub mod scrape;
pub mod signup;

pub use landing::LandingPage;
pub use login::LoginPage;
pub use payment::{DisplayedUserDetails, PaymentPage};
pub use product::{ProductDetailPage, ProductListingPage};
pub use scrape::{QuoteEntry, QuotesPage, TeamDirectoryPage};
pub use signup::SignupPage;

/// Every storefront page object, rooted at one base URL
#[derive(Debug, Clone)]
pub struct Storefront {
    /// Landing page
    pub landing: LandingPage,
    /// Login popup
    pub login: LoginPage,
    /// Registration form
    pub signup: SignupPage,
    /// Category listing
    pub listing: ProductListingPage,
    /// Product detail
    pub detail: ProductDetailPage,
    /// Order payment
    pub payment: PaymentPage,
}

impl Storefront {
    /// Page objects for the storefront at `base_url`
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            landing: LandingPage::new(base_url),
            login: LoginPage,
            signup: SignupPage,
            listing: ProductListingPage,
            detail: ProductDetailPage,
            payment: PaymentPage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page_object::PageObject;
    use std::collections::HashSet;

    fn tables() -> Vec<(&'static str, &'static [crate::locator::ElementDescriptor])> {
        let shop = Storefront::new("https://shop.test/#/");
        vec![
            (shop.landing.page_name(), shop.landing.elements()),
            (shop.login.page_name(), shop.login.elements()),
            (shop.signup.page_name(), shop.signup.elements()),
            (shop.listing.page_name(), shop.listing.elements()),
            (shop.detail.page_name(), shop.detail.elements()),
            (shop.payment.page_name(), shop.payment.elements()),
            (
                QuotesPage::new("https://quotes.test/").page_name(),
                QuotesPage::new("https://quotes.test/").elements(),
            ),
            (
                TeamDirectoryPage::new("https://cricket.test/").page_name(),
                TeamDirectoryPage::new("https://cricket.test/").elements(),
            ),
        ]
    }

    #[test]
    fn test_element_names_unique_per_page() {
        for (page, elements) in tables() {
            let names: HashSet<_> = elements.iter().map(|e| e.name).collect();
            assert_eq!(names.len(), elements.len(), "duplicate element name on {page}");
        }
    }

    #[test]
    fn test_tables_are_not_empty() {
        for (page, elements) in tables() {
            assert!(!elements.is_empty(), "{page} has no elements");
            assert!(elements.iter().all(|e| !e.selector.key().is_empty()));
        }
    }

    #[test]
    fn test_url_markers() {
        let shop = Storefront::new("https://shop.test/#/");
        assert_eq!(shop.payment.url_marker(), Some("orderPayment"));
        assert_eq!(shop.signup.url_marker(), Some("register"));
        assert_eq!(shop.listing.url_marker(), Some("Speakers"));
        assert_eq!(shop.landing.url_marker(), None);
        assert_eq!(shop.landing.base_url(), "https://shop.test/#/");
    }

    #[test]
    fn test_lookup_by_name() {
        let shop = Storefront::new("https://shop.test/#/");
        assert!(shop.login.element("sign in button").is_some());
        assert!(shop.payment.element("guest login prompt").is_some());
    }
}
