//! Payment test data.

use serde::{Deserialize, Serialize};

/// Card details typed into the manual payment form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentCard {
    /// Card number
    pub number: String,
    /// Security code
    pub cvv: String,
    /// Name on the card
    pub holder_name: String,
}

impl Default for PaymentCard {
    fn default() -> Self {
        Self::test_card()
    }
}

impl PaymentCard {
    /// Card the storefront accepts in its demo environment
    #[must_use]
    pub fn test_card() -> Self {
        Self {
            number: "488348834883".to_string(),
            cvv: "123".to_string(),
            holder_name: "Test User".to_string(),
        }
    }
}

/// Payment options offered on the order payment page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Manual card entry
    #[default]
    MasterCredit,
    /// SafePay account
    SafePay,
}

impl PaymentMethod {
    /// Whether paying needs card details
    #[must_use]
    pub const fn needs_card(&self) -> bool {
        matches!(self, Self::MasterCredit)
    }
}
