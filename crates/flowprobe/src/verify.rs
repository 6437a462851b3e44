//! Checks that turn observed page values into pass/fail.
//!
//! Every failing check is an [`FlowError::AssertionMismatch`] naming the
//! check and carrying both values.

use crate::fixture::PersistedUser;
use crate::pages::DisplayedUserDetails;
use crate::price::Price;
use crate::result::{FlowError, FlowResult};

/// Assertion helpers for flows
#[derive(Debug, Clone, Copy)]
pub struct Verify;

impl Verify {
    /// Exact text equality
    pub fn equals(check: &str, expected: &str, actual: &str) -> FlowResult<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(FlowError::mismatch(check, expected, actual))
        }
    }

    /// Equality after trimming and lowercasing both sides
    pub fn equals_ignore_case(check: &str, expected: &str, actual: &str) -> FlowResult<()> {
        if expected.trim().to_lowercase() == actual.trim().to_lowercase() {
            Ok(())
        } else {
            Err(FlowError::mismatch(check, expected, actual))
        }
    }

    /// `actual` contains `needle`
    pub fn contains(check: &str, needle: &str, actual: &str) -> FlowResult<()> {
        if actual.contains(needle) {
            Ok(())
        } else {
            Err(FlowError::mismatch(check, format!("text containing '{needle}'"), actual))
        }
    }

    /// `actual` differs from `unexpected`
    pub fn not_equal(check: &str, unexpected: &str, actual: &str) -> FlowResult<()> {
        if unexpected == actual {
            Err(FlowError::mismatch(check, format!("anything but '{unexpected}'"), actual))
        } else {
            Ok(())
        }
    }

    /// URL contains a marker
    pub fn url_contains(check: &str, marker: &str, url: &str) -> FlowResult<()> {
        if url.contains(marker) {
            Ok(())
        } else {
            Err(FlowError::mismatch(check, format!("URL containing '{marker}'"), url))
        }
    }

    /// A condition holds
    pub fn is_true(check: &str, condition: bool) -> FlowResult<()> {
        if condition {
            Ok(())
        } else {
            Err(FlowError::mismatch(check, "true", "false"))
        }
    }

    /// Both texts carry the same price value
    pub fn prices_match(check: &str, expected: &str, actual: &str) -> FlowResult<()> {
        match (Price::parse(expected), Price::parse(actual)) {
            (Some(e), Some(a)) if e == a => Ok(()),
            _ => Err(FlowError::mismatch(check, expected.trim(), actual.trim())),
        }
    }

    /// The payment page shows the registered user's shipping details
    pub fn user_details_match(user: &PersistedUser, shown: &DisplayedUserDetails) -> FlowResult<()> {
        Self::contains("user details: first name", &user.first_name, &shown.full_name)?;
        Self::contains("user details: last name", &user.last_name, &shown.full_name)?;
        Self::contains("user details: address", &user.address, &shown.address)?;
        Self::contains("user details: city", &user.city, &shown.city)?;
        Self::contains("user details: state", &user.state, &shown.state)?;
        Self::contains("user details: postal code", &user.postal_code, &shown.postal_code)?;
        Self::contains("user details: phone", &user.phone_number, &shown.phone_number)
    }
}
