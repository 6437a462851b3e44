//! Display-price normalization.
//!
//! Prices are compared by value, never by string: `"$269.99"`,
//! `"269.99 USD"` and `"  $269.99\n"` are all 26999 cents. A `$` amount wins
//! over bare numbers; without one the first number is taken. Thousands
//! separators are accepted.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

const NUMBER: &str = r"\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?";

fn number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(NUMBER).expect("price pattern compiles"))
}

fn currency_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(&format!(r"\$\s*({NUMBER})")).expect("currency pattern compiles"))
}

fn amount_text(text: &str) -> Option<&str> {
    if let Some(found) = currency_pattern().captures(text).and_then(|caps| caps.get(1)) {
        return Some(found.as_str());
    }
    number_pattern().find(text).map(|found| found.as_str())
}

/// An amount in integer cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price {
    /// Amount in cents
    pub cents: i64,
}

impl Price {
    /// Create from cents
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// Extract the amount from display text.
    ///
    /// The first `$` amount is preferred, then the first number. Digits past
    /// the second decimal place are dropped.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let found = amount_text(text)?.replace(',', "");
        let (whole, fraction) = found.split_once('.').unwrap_or((found.as_str(), ""));
        let whole: i64 = whole.parse().ok()?;
        let mut cents_digits: String = fraction.chars().take(2).collect();
        while cents_digits.len() < 2 {
            cents_digits.push('0');
        }
        let cents: i64 = cents_digits.parse().ok()?;
        whole.checked_mul(100)?.checked_add(cents).map(Self::from_cents)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.cents / 100, self.cents % 100)
    }
}
