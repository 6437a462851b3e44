//! Synthetic storefront users.

use crate::result::{FlowError, FlowResult};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Longest username the storefront accepts
pub const MAX_USERNAME_LEN: usize = 15;

/// Password used for every generated account
pub const DEFAULT_PASSWORD: &str = "Password_1!";

/// Fixed location of generated users
pub const DEFAULT_COUNTRY: &str = "India";
/// Fixed city of generated users
pub const DEFAULT_CITY: &str = "Thrissur";
/// Fixed state of generated users
pub const DEFAULT_STATE: &str = "Kerala";

const FIRST_NAMES: &[&str] = &[
    "Aarav", "Maya", "Rohan", "Ananya", "Vikram", "Meera", "Arjun", "Diya", "Kabir", "Isha",
    "Nikhil", "Priya", "Samuel", "Grace", "Oliver", "Chloe", "Lucas", "Nora", "Elias", "Hannah",
];

const LAST_NAMES: &[&str] = &[
    "Menon", "Nair", "Pillai", "Varghese", "Thomas", "Kurian", "Iyer", "Reddy", "Fernandes",
    "Sharma", "Walker", "Bennett", "Hughes", "Carter", "Foster", "Morrison",
];

const STREETS: &[&str] = &[
    "MG Road", "Church Street", "Temple Lane", "Round North", "Palace Road", "Station Road",
    "Market Street", "Lake View Avenue",
];

const EMAIL_DOMAINS: &[&str] = &["example.com", "mail.test", "shopper.example.org"];

/// A freshly generated account for the signup flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFixture {
    /// Login name
    pub username: String,
    /// Email address
    pub email: String,
    /// Password
    pub password: String,
    /// Password confirmation
    pub confirm_password: String,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// `+91` followed by digits
    pub phone_number: String,
    /// Country
    pub country: String,
    /// City
    pub city: String,
    /// Street address
    pub address: String,
    /// State or province
    pub state: String,
    /// Six-digit postal code
    pub postal_code: String,
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[a-z0-9._-]+@[a-z0-9-]+(\.[a-z0-9-]+)+$").expect("email pattern compiles")
    })
}

fn phone_pattern() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(r"^\+91\d{8,10}$").expect("phone pattern compiles"))
}

impl UserFixture {
    /// Check every field constraint, reporting the first violation
    pub fn validate(&self) -> FlowResult<()> {
        let required = [
            ("username", &self.username),
            ("email", &self.email),
            ("password", &self.password),
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("phone_number", &self.phone_number),
            ("country", &self.country),
            ("city", &self.city),
            ("address", &self.address),
            ("state", &self.state),
            ("postal_code", &self.postal_code),
        ];
        if let Some((field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(invalid(format!("{field} is empty")));
        }
        if self.username.chars().count() > MAX_USERNAME_LEN {
            return Err(invalid(format!(
                "username '{}' longer than {MAX_USERNAME_LEN} characters",
                self.username
            )));
        }
        if !email_pattern().is_match(&self.email) {
            return Err(invalid(format!("malformed email '{}'", self.email)));
        }
        if !phone_pattern().is_match(&self.phone_number) {
            return Err(invalid(format!("malformed phone number '{}'", self.phone_number)));
        }
        if self.postal_code.len() != 6 || !self.postal_code.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid(format!("malformed postal code '{}'", self.postal_code)));
        }
        if self.password != self.confirm_password {
            return Err(invalid("password confirmation differs".to_string()));
        }
        if !password_is_strong(&self.password) {
            return Err(invalid("password needs upper, lower, digit and symbol".to_string()));
        }
        Ok(())
    }

    /// Display name as the payment page shows it
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

fn invalid(message: String) -> FlowError {
    FlowError::Fixture { message }
}

fn password_is_strong(password: &str) -> bool {
    password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| !c.is_ascii_alphanumeric())
}

/// Source of unique synthetic users
#[derive(Debug)]
pub struct UserGenerator {
    rng: StdRng,
}

impl Default for UserGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl UserGenerator {
    /// Entropy-seeded generator
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible generator
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generator seeded from `seed` when given, from entropy otherwise
    #[must_use]
    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::new, Self::seeded)
    }

    fn pick(&mut self, list: &[&'static str]) -> &'static str {
        list.choose(&mut self.rng).copied().unwrap_or_default()
    }

    fn digits(&mut self, n: usize) -> String {
        (0..n)
            .map(|_| char::from(b'0' + self.rng.gen_range(0..10u8)))
            .collect()
    }

    /// Generate a fresh user
    pub fn generate(&mut self) -> UserFixture {
        let first_name = self.pick(FIRST_NAMES).to_string();
        let last_name = self.pick(LAST_NAMES).to_string();
        let suffix = self.rng.gen_range(100..100_000u32);

        let username: String = format!("{}{}{suffix}", first_name.to_lowercase(), &last_name[..1])
            .chars()
            .take(MAX_USERNAME_LEN)
            .collect();
        let email = format!(
            "{}.{}{suffix}@{}",
            first_name.to_lowercase(),
            last_name.to_lowercase(),
            self.pick(EMAIL_DOMAINS)
        );
        let phone_number = format!("+91{}{}", self.rng.gen_range(6..10u8), self.digits(9));
        let address = format!("{} {}", self.rng.gen_range(1..400u16), self.pick(STREETS));
        let postal_code = format!("{}{}", self.rng.gen_range(1..10u8), self.digits(5));

        UserFixture {
            username,
            email,
            password: DEFAULT_PASSWORD.to_string(),
            confirm_password: DEFAULT_PASSWORD.to_string(),
            first_name,
            last_name,
            phone_number,
            country: DEFAULT_COUNTRY.to_string(),
            city: DEFAULT_CITY.to_string(),
            address,
            state: DEFAULT_STATE.to_string(),
            postal_code,
        }
    }
}

/// The registered account a later scenario logs in with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedUser {
    /// Login name
    pub username: String,
    /// Password
    pub password: String,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Phone number
    pub phone_number: String,
    /// Country
    pub country: String,
    /// City
    pub city: String,
    /// Street address
    pub address: String,
    /// State or province
    pub state: String,
    /// Postal code
    pub postal_code: String,
}

impl From<&UserFixture> for PersistedUser {
    fn from(user: &UserFixture) -> Self {
        Self {
            username: user.username.clone(),
            password: user.password.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            phone_number: user.phone_number.clone(),
            country: user.country.clone(),
            city: user.city.clone(),
            address: user.address.clone(),
            state: user.state.clone(),
            postal_code: user.postal_code.clone(),
        }
    }
}
