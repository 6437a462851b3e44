//! Flowprobe: data-driven UI-flow test runner
//!
//! Drives a browser through storefront flows (signup, login, checkout,
//! payment) and two scraping targets, comparing what the page shows with
//! what the fixtures expect.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                   FLOWPROBE Architecture                        │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Fixtures   │    │ Scenario   │    │ Page       │            │
//! │   │ + Bridge   │───►│ Runner +   │───►│ Objects    │            │
//! │   │            │    │ Flows      │    │            │            │
//! │   └────────────┘    └────────────┘    └─────┬──────┘            │
//! │                                             ▼                   │
//! │                     ┌────────────┐    ┌────────────┐            │
//! │                     │ FlowDriver │◄───│ Session    │            │
//! │                     │ (CDP/mock) │    │ (facade)   │            │
//! │                     └────────────┘    └────────────┘            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

pub mod bridge;
pub mod browser;
pub mod config;
pub mod driver;
pub mod fixture;
pub mod flows;
pub mod locator;
pub mod logging;
pub mod page_object;
pub mod pages;
pub mod price;
mod result;
pub mod scenario;
pub mod session;
pub mod verify;
pub mod wait;

pub use bridge::{JsonSlot, TeamListSlot, UserBridge};
pub use browser::{BrowserConfig, Viewport};
#[cfg(feature = "browser")]
pub use browser::{ChromiumDriver, ChromiumLauncher};
pub use config::{FixturePaths, SuiteConfig};
pub use driver::{FlowDriver, MockDriver, MockElement, MockRule, PageActivity};
pub use fixture::{
    load_negative_credentials, NegativeCredentialRow, PaymentCard, PaymentMethod, PersistedUser,
    UserFixture, UserGenerator,
};
pub use flows::{CredentialBranch, ProductReference};
pub use locator::{ElementDescriptor, ElementProbe, ElementQuery, Selector};
pub use logging::LogConfig;
pub use page_object::{wait_for_arrival, PageObject, StepContext};
pub use price::Price;
pub use result::{FailureCategory, FlowError, FlowResult};
pub use scenario::{Outcome, Scenario, ScenarioReport, ScenarioRunner, SessionFactory, SuiteReport};
pub use session::Session;
pub use verify::Verify;
pub use wait::{LoadState, Timeouts};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::bridge::*;
    pub use super::browser::*;
    pub use super::config::*;
    pub use super::driver::*;
    pub use super::fixture::*;
    pub use super::flows::*;
    pub use super::locator::*;
    pub use super::page_object::*;
    pub use super::pages::*;
    pub use super::price::*;
    pub use super::result::*;
    pub use super::scenario::*;
    pub use super::session::*;
    pub use super::verify::*;
    pub use super::wait::*;
}
