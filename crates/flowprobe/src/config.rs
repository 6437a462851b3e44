//! Suite configuration.
//!
//! Loaded from YAML, then overridden from `FLOWPROBE_*` environment
//! variables, then validated. Every field has a default so an empty file is
//! a valid configuration.

use crate::browser::BrowserConfig;
use crate::logging::LogConfig;
use crate::result::{FlowError, FlowResult};
use crate::wait::Timeouts;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Storefront the suite targets by default
pub const DEFAULT_BASE_URL: &str = "https://advantageonlineshopping.com/#/";
/// Quotes scraping target
pub const DEFAULT_QUOTES_URL: &str = "https://quotes.toscrape.com/";
/// Cricket team directory scraping target
pub const DEFAULT_TEAMS_URL: &str = "https://www.cricbuzz.com/";

/// Where fixtures and artifacts live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixturePaths {
    /// Workbook with negative-login rows
    pub credentials_workbook: PathBuf,
    /// Sheet of that workbook
    pub credentials_sheet: String,
    /// Slot holding the last registered user
    pub user_slot: PathBuf,
    /// Slot holding the scraped team names
    pub teams_slot: PathBuf,
    /// Directory for team page screenshots
    pub screenshot_dir: PathBuf,
}

impl Default for FixturePaths {
    fn default() -> Self {
        Self {
            credentials_workbook: PathBuf::from("invalidLoginData.xlsx"),
            credentials_sheet: "Sheet1".to_string(),
            user_slot: PathBuf::from("test-data/latestUser.json"),
            teams_slot: PathBuf::from("testTeams.json"),
            screenshot_dir: PathBuf::from("screenshots"),
        }
    }
}

/// Full suite configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Storefront root URL
    pub base_url: String,
    /// Quotes site URL
    pub quotes_url: String,
    /// Team directory URL
    pub teams_url: String,
    /// Browser launch options
    pub browser: BrowserConfig,
    /// Wait bounds
    pub timeouts: Timeouts,
    /// Fixture and artifact locations
    pub fixtures: FixturePaths,
    /// Seed for the user generator; entropy when absent
    pub generator_seed: Option<u64>,
    /// Logging options
    pub log: LogConfig,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            quotes_url: DEFAULT_QUOTES_URL.to_string(),
            teams_url: DEFAULT_TEAMS_URL.to_string(),
            browser: BrowserConfig::default(),
            timeouts: Timeouts::default(),
            fixtures: FixturePaths::default(),
            generator_seed: None,
            log: LogConfig::default(),
        }
    }
}

impl SuiteConfig {
    /// Parse YAML without applying the environment
    pub fn from_yaml(yaml: &str) -> FlowResult<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Load a file, apply environment overrides and validate
    pub fn load(path: impl AsRef<Path>) -> FlowResult<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| FlowError::Config {
            message: format!("cannot read {}: {e}", path.display()),
        })?;
        let mut config = Self::from_yaml(&yaml)?;
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `FLOWPROBE_*` overrides from the process environment
    pub fn apply_env(&mut self) -> FlowResult<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> FlowResult<()> {
        if let Some(url) = lookup("FLOWPROBE_BASE_URL") {
            self.base_url = url;
        }
        if let Some(raw) = lookup("FLOWPROBE_HEADLESS") {
            self.browser.headless = parse_bool("FLOWPROBE_HEADLESS", &raw)?;
        }
        if let Some(raw) = lookup("FLOWPROBE_ACTION_TIMEOUT_MS") {
            self.timeouts.action_ms = parse_u64("FLOWPROBE_ACTION_TIMEOUT_MS", &raw)?;
        }
        if let Some(raw) = lookup("FLOWPROBE_SEED") {
            self.generator_seed = Some(parse_u64("FLOWPROBE_SEED", &raw)?);
        }
        if let Some(filter) = lookup("FLOWPROBE_LOG") {
            self.log.filter = filter;
        }
        Ok(())
    }

    /// Reject configurations no scenario could run with
    pub fn validate(&self) -> FlowResult<()> {
        for (name, url) in [
            ("base_url", &self.base_url),
            ("quotes_url", &self.quotes_url),
            ("teams_url", &self.teams_url),
        ] {
            if url.trim().is_empty() {
                return Err(FlowError::Config {
                    message: format!("{name} is empty"),
                });
            }
        }
        if let Some(field) = self.timeouts.first_zero() {
            return Err(FlowError::Config {
                message: format!("timeouts.{field} must be greater than zero"),
            });
        }
        if self.fixtures.credentials_sheet.trim().is_empty() {
            return Err(FlowError::Config {
                message: "fixtures.credentials_sheet is empty".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_bool(key: &str, raw: &str) -> FlowResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(FlowError::Config {
            message: format!("{key}: expected a boolean, got '{other}'"),
        }),
    }
}

fn parse_u64(key: &str, raw: &str) -> FlowResult<u64> {
    raw.trim().parse().map_err(|_| FlowError::Config {
        message: format!("{key}: expected an unsigned integer, got '{raw}'"),
    })
}
