//! FlowDriver - abstract page automation capability.
//!
//! The facade ([`crate::session::Session`]) only ever talks to a
//! `Box<dyn FlowDriver>`. Two implementations ship with the crate:
//!
//! - `ChromiumDriver` (feature `browser`): CDP via chromiumoxide
//! - [`MockDriver`]: scriptable in-memory page used by tests
//!
//! Drivers answer single observations (probe, count, activity) and perform
//! single actions. They never wait: polling and bounds belong to the
//! facade.

use crate::locator::{ElementProbe, ElementQuery};
use crate::result::{FlowError, FlowResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Snapshot of page loading activity, used for network idle detection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageActivity {
    /// `document.readyState == "complete"`
    pub ready: bool,
    /// Monotonic count of resources requested by the page so far
    pub resources: u64,
}

/// Abstract driver trait for page automation
#[async_trait]
pub trait FlowDriver: Send + Sync {
    /// Navigate to URL
    async fn navigate(&mut self, url: &str) -> FlowResult<()>;

    /// Reload the current page
    async fn reload(&mut self) -> FlowResult<()>;

    /// Get current URL
    async fn current_url(&self) -> FlowResult<String>;

    /// Observe the element targeted by a query
    async fn probe(&self, query: &ElementQuery) -> FlowResult<ElementProbe>;

    /// Number of nodes matching a query (ignores the query index)
    async fn count(&self, query: &ElementQuery) -> FlowResult<usize>;

    /// Click element
    async fn click(&self, query: &ElementQuery) -> FlowResult<()>;

    /// Replace the value of an input
    async fn fill(&self, query: &ElementQuery, value: &str) -> FlowResult<()>;

    /// Pick an option of a select element by value or label
    async fn select_option(&self, query: &ElementQuery, option: &str) -> FlowResult<()>;

    /// Check a checkbox or radio button
    async fn check(&self, query: &ElementQuery) -> FlowResult<()>;

    /// Move the pointer over an element
    async fn hover(&self, query: &ElementQuery) -> FlowResult<()>;

    /// Press a key on the focused element
    async fn press_key(&self, key: &str) -> FlowResult<()>;

    /// Current loading activity
    async fn activity(&self) -> FlowResult<PageActivity>;

    /// Take a PNG screenshot of the viewport
    async fn screenshot(&self) -> FlowResult<Vec<u8>>;

    /// Close the page
    async fn close(&mut self) -> FlowResult<()>;
}

// =============================================================================
// MOCK DRIVER
// =============================================================================

/// PNG signature returned by mock screenshots
pub const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// One node on a mock page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockElement {
    /// Text content
    pub text: String,
    /// Input value
    pub value: String,
    /// Rendered
    pub visible: bool,
    /// Not disabled
    pub enabled: bool,
    /// Checkbox state
    pub checked: bool,
}

impl MockElement {
    /// Visible, enabled element with text
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            visible: true,
            enabled: true,
            ..Self::default()
        }
    }

    /// Visible, enabled element without text (inputs, buttons)
    #[must_use]
    pub fn input() -> Self {
        Self::new("")
    }

    /// Mark as hidden
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Mark as disabled
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Set the input value
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    fn probe(&self) -> ElementProbe {
        ElementProbe {
            attached: true,
            visible: self.visible,
            enabled: self.enabled,
            text: Some(self.text.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Trigger {
    Click(String),
    Fill(String),
    Check(String),
    Hover(String),
    Key(String),
    Navigate(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Condition {
    Value(String, String),
    ValueNot(String, String),
    Filled(String),
    Empty(String),
    Text(String, String),
    TextNot(String, String),
    TargetText(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Effect {
    SetText(String, String),
    CopyValue { from: String, to: String },
    Show(String),
    Hide(String),
    Enable(String),
    Disable(String),
    NavigateTo(String),
    Insert(String, Vec<MockElement>),
    Remove(String),
}

/// Scripted page behaviour: when `trigger` fires and every condition holds,
/// apply the effects in order.
///
/// For one event only the first matching rule (in registration order) runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockRule {
    trigger: Trigger,
    conditions: Vec<Condition>,
    effects: Vec<Effect>,
}

impl MockRule {
    fn new(trigger: Trigger) -> Self {
        Self {
            trigger,
            conditions: Vec::new(),
            effects: Vec::new(),
        }
    }

    /// Fire on a click of the element with this selector
    #[must_use]
    pub fn on_click(key: impl Into<String>) -> Self {
        Self::new(Trigger::Click(key.into()))
    }

    /// Fire on a click of a `key` element whose text contains `text`
    #[must_use]
    pub fn on_click_text(key: impl Into<String>, text: impl Into<String>) -> Self {
        let mut rule = Self::new(Trigger::Click(key.into()));
        rule.conditions.push(Condition::TargetText(text.into()));
        rule
    }

    /// Fire after a fill of the element
    #[must_use]
    pub fn on_fill(key: impl Into<String>) -> Self {
        Self::new(Trigger::Fill(key.into()))
    }

    /// Fire after a check of the element
    #[must_use]
    pub fn on_check(key: impl Into<String>) -> Self {
        Self::new(Trigger::Check(key.into()))
    }

    /// Fire on hover over the element
    #[must_use]
    pub fn on_hover(key: impl Into<String>) -> Self {
        Self::new(Trigger::Hover(key.into()))
    }

    /// Fire on a key press
    #[must_use]
    pub fn on_key(key: impl Into<String>) -> Self {
        Self::new(Trigger::Key(key.into()))
    }

    /// Fire after navigating to a URL containing `fragment`
    #[must_use]
    pub fn on_navigate(fragment: impl Into<String>) -> Self {
        Self::new(Trigger::Navigate(fragment.into()))
    }

    /// Require the first `key` element's value to equal `value`
    #[must_use]
    pub fn when_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.conditions.push(Condition::Value(key.into(), value.into()));
        self
    }

    /// Require the first `key` element's value to differ from `value`
    #[must_use]
    pub fn when_value_not(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.conditions
            .push(Condition::ValueNot(key.into(), value.into()));
        self
    }

    /// Require a non-empty value
    #[must_use]
    pub fn when_filled(mut self, key: impl Into<String>) -> Self {
        self.conditions.push(Condition::Filled(key.into()));
        self
    }

    /// Require an empty (or missing) value
    #[must_use]
    pub fn when_empty(mut self, key: impl Into<String>) -> Self {
        self.conditions.push(Condition::Empty(key.into()));
        self
    }

    /// Require the first `key` element's text to equal `text`
    #[must_use]
    pub fn when_text(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.conditions.push(Condition::Text(key.into(), text.into()));
        self
    }

    /// Require the first `key` element's text to differ from `text`
    #[must_use]
    pub fn when_text_not(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.conditions
            .push(Condition::TextNot(key.into(), text.into()));
        self
    }

    /// Set the text of the first `key` element, creating it if absent
    #[must_use]
    pub fn set_text(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.effects.push(Effect::SetText(key.into(), text.into()));
        self
    }

    /// Copy the value of `from` into the text of `to`
    #[must_use]
    pub fn copy_value(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.effects.push(Effect::CopyValue {
            from: from.into(),
            to: to.into(),
        });
        self
    }

    /// Make every `key` element visible
    #[must_use]
    pub fn show(mut self, key: impl Into<String>) -> Self {
        self.effects.push(Effect::Show(key.into()));
        self
    }

    /// Hide every `key` element
    #[must_use]
    pub fn hide(mut self, key: impl Into<String>) -> Self {
        self.effects.push(Effect::Hide(key.into()));
        self
    }

    /// Enable every `key` element
    #[must_use]
    pub fn enable(mut self, key: impl Into<String>) -> Self {
        self.effects.push(Effect::Enable(key.into()));
        self
    }

    /// Disable every `key` element
    #[must_use]
    pub fn disable(mut self, key: impl Into<String>) -> Self {
        self.effects.push(Effect::Disable(key.into()));
        self
    }

    /// Change the URL without resetting the page (client-side routing)
    #[must_use]
    pub fn navigate_to(mut self, url: impl Into<String>) -> Self {
        self.effects.push(Effect::NavigateTo(url.into()));
        self
    }

    /// Replace all `key` elements
    #[must_use]
    pub fn insert(mut self, key: impl Into<String>, elements: Vec<MockElement>) -> Self {
        self.effects.push(Effect::Insert(key.into(), elements));
        self
    }

    /// Detach all `key` elements
    #[must_use]
    pub fn remove(mut self, key: impl Into<String>) -> Self {
        self.effects.push(Effect::Remove(key.into()));
        self
    }

    fn fires_on(&self, event: &MockEvent<'_>) -> bool {
        match (&self.trigger, event) {
            (Trigger::Click(k), MockEvent::Click { key, .. })
            | (Trigger::Fill(k), MockEvent::Fill(key))
            | (Trigger::Check(k), MockEvent::Check(key))
            | (Trigger::Hover(k), MockEvent::Hover(key))
            | (Trigger::Key(k), MockEvent::Key(key)) => k == key,
            (Trigger::Navigate(fragment), MockEvent::Navigate(url)) => url.contains(fragment.as_str()),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum MockEvent<'a> {
    Click { key: &'a str, text: &'a str },
    Fill(&'a str),
    Check(&'a str),
    Hover(&'a str),
    Key(&'a str),
    Navigate(&'a str),
}

#[derive(Debug, Default)]
struct MockState {
    url: String,
    initial: HashMap<String, Vec<MockElement>>,
    elements: HashMap<String, Vec<MockElement>>,
    rules: Vec<MockRule>,
    history: Vec<String>,
    resources: u64,
    busy: bool,
    closed: bool,
}

impl MockState {
    fn ensure_open(&self) -> FlowResult<()> {
        if self.closed {
            return Err(FlowError::driver("page is closed"));
        }
        Ok(())
    }

    fn matches(&self, query: &ElementQuery) -> Vec<(usize, &MockElement)> {
        self.elements
            .get(query.selector().key())
            .map(|list| {
                list.iter()
                    .enumerate()
                    .filter(|(_, el)| {
                        query
                            .has_text
                            .as_deref()
                            .map_or(true, |t| el.text.contains(t))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn target_mut(&mut self, query: &ElementQuery) -> FlowResult<&mut MockElement> {
        let position = self
            .matches(query)
            .get(query.index)
            .map(|(pos, _)| *pos)
            .ok_or_else(|| FlowError::driver(format!("no element for {}", query.describe())))?;
        self.elements
            .get_mut(query.selector().key())
            .and_then(|list| list.get_mut(position))
            .ok_or_else(|| FlowError::driver(format!("no element for {}", query.describe())))
    }

    fn first(&self, key: &str) -> Option<&MockElement> {
        self.elements.get(key).and_then(|list| list.first())
    }

    fn holds(&self, condition: &Condition, event: &MockEvent<'_>) -> bool {
        let value = |key: &str| self.first(key).map(|el| el.value.as_str()).unwrap_or_default();
        let text = |key: &str| self.first(key).map(|el| el.text.as_str()).unwrap_or_default();
        match condition {
            Condition::Value(key, expected) => value(key) == expected,
            Condition::ValueNot(key, expected) => value(key) != expected,
            Condition::Filled(key) => !value(key).is_empty(),
            Condition::Empty(key) => value(key).is_empty(),
            Condition::Text(key, expected) => text(key) == expected,
            Condition::TextNot(key, expected) => text(key) != expected,
            Condition::TargetText(expected) => match event {
                MockEvent::Click { text, .. } => text.contains(expected.as_str()),
                _ => false,
            },
        }
    }

    fn for_each(&mut self, key: &str, f: impl Fn(&mut MockElement)) {
        if let Some(list) = self.elements.get_mut(key) {
            list.iter_mut().for_each(f);
        }
    }

    fn apply(&mut self, effect: &Effect) {
        match effect {
            Effect::SetText(key, text) => self.set_text(key, text.clone()),
            Effect::CopyValue { from, to } => {
                let value = self.first(from).map(|el| el.value.clone()).unwrap_or_default();
                self.set_text(to, value);
            }
            Effect::Show(key) => self.for_each(key, |el| el.visible = true),
            Effect::Hide(key) => self.for_each(key, |el| el.visible = false),
            Effect::Enable(key) => self.for_each(key, |el| el.enabled = true),
            Effect::Disable(key) => self.for_each(key, |el| el.enabled = false),
            Effect::NavigateTo(url) => {
                self.url.clone_from(url);
                self.resources += 1;
            }
            Effect::Insert(key, elements) => {
                self.elements.insert(key.clone(), elements.clone());
            }
            Effect::Remove(key) => {
                self.elements.remove(key);
            }
        }
    }

    fn set_text(&mut self, key: &str, text: String) {
        let list = self.elements.entry(key.to_string()).or_default();
        match list.first_mut() {
            Some(el) => el.text = text,
            None => list.push(MockElement::new(text)),
        }
    }

    fn dispatch(&mut self, event: MockEvent<'_>) {
        let rule = self
            .rules
            .iter()
            .find(|rule| {
                rule.fires_on(&event) && rule.conditions.iter().all(|c| self.holds(c, &event))
            })
            .cloned();
        if let Some(rule) = rule {
            for effect in &rule.effects {
                self.apply(effect);
            }
        }
    }

    fn reset_page(&mut self) {
        self.elements = self.initial.clone();
        self.resources += 1;
    }
}

/// Scriptable in-memory page for tests.
///
/// Cloning shares the page, so a test can keep a handle for assertions after
/// boxing the driver into a session. Elements are keyed by raw selector
/// string; `navigate` and `reload` restore the page as it was built, then
/// run `on_navigate` rules.
#[derive(Debug, Clone, Default)]
pub struct MockDriver {
    state: Arc<Mutex<MockState>>,
}

impl MockDriver {
    /// Create new mock driver
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add an element to the page as built
    #[must_use]
    pub fn with_element(self, key: impl Into<String>, element: MockElement) -> Self {
        {
            let mut state = self.state();
            let key = key.into();
            state.initial.entry(key.clone()).or_default().push(element.clone());
            state.elements.entry(key).or_default().push(element);
        }
        self
    }

    /// Add several elements under one selector
    #[must_use]
    pub fn with_elements(self, key: impl Into<String>, elements: Vec<MockElement>) -> Self {
        let key = key.into();
        elements
            .into_iter()
            .fold(self, |driver, el| driver.with_element(key.clone(), el))
    }

    /// Register a rule
    #[must_use]
    pub fn with_rule(self, rule: MockRule) -> Self {
        self.state().rules.push(rule);
        self
    }

    /// Keep the resource counter moving so the page never goes idle
    pub fn set_busy(&self, busy: bool) {
        self.state().busy = busy;
    }

    /// Current state of the nth element under a selector
    #[must_use]
    pub fn element(&self, key: &str, index: usize) -> Option<MockElement> {
        self.state()
            .elements
            .get(key)
            .and_then(|list| list.get(index))
            .cloned()
    }

    /// Current URL
    #[must_use]
    pub fn url(&self) -> String {
        self.state().url.clone()
    }

    /// Get call history
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.state().history.clone()
    }

    /// Check if method was called
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.state().history.iter().any(|c| c.starts_with(method))
    }

    /// Whether `close` has run
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state().closed
    }
}

#[async_trait]
impl FlowDriver for MockDriver {
    async fn navigate(&mut self, url: &str) -> FlowResult<()> {
        let mut state = self.state();
        state.ensure_open()?;
        state.history.push(format!("navigate:{url}"));
        state.url = url.to_string();
        state.reset_page();
        state.dispatch(MockEvent::Navigate(url));
        Ok(())
    }

    async fn reload(&mut self) -> FlowResult<()> {
        let mut state = self.state();
        state.ensure_open()?;
        state.history.push("reload".to_string());
        state.reset_page();
        let url = state.url.clone();
        state.dispatch(MockEvent::Navigate(&url));
        Ok(())
    }

    async fn current_url(&self) -> FlowResult<String> {
        let state = self.state();
        state.ensure_open()?;
        Ok(state.url.clone())
    }

    async fn probe(&self, query: &ElementQuery) -> FlowResult<ElementProbe> {
        let state = self.state();
        state.ensure_open()?;
        Ok(state
            .matches(query)
            .get(query.index)
            .map_or_else(ElementProbe::detached, |(_, el)| el.probe()))
    }

    async fn count(&self, query: &ElementQuery) -> FlowResult<usize> {
        let state = self.state();
        state.ensure_open()?;
        Ok(state.matches(query).len())
    }

    async fn click(&self, query: &ElementQuery) -> FlowResult<()> {
        let mut state = self.state();
        state.ensure_open()?;
        let key = query.selector().key();
        state.history.push(format!("click:{key}"));
        let text = state.target_mut(query)?.text.clone();
        state.dispatch(MockEvent::Click { key, text: &text });
        Ok(())
    }

    async fn fill(&self, query: &ElementQuery, value: &str) -> FlowResult<()> {
        let mut state = self.state();
        state.ensure_open()?;
        let key = query.selector().key();
        state.history.push(format!("fill:{key}={value}"));
        state.target_mut(query)?.value = value.to_string();
        state.dispatch(MockEvent::Fill(key));
        Ok(())
    }

    async fn select_option(&self, query: &ElementQuery, option: &str) -> FlowResult<()> {
        let mut state = self.state();
        state.ensure_open()?;
        let key = query.selector().key();
        state.history.push(format!("select:{key}={option}"));
        state.target_mut(query)?.value = option.to_string();
        state.dispatch(MockEvent::Fill(key));
        Ok(())
    }

    async fn check(&self, query: &ElementQuery) -> FlowResult<()> {
        let mut state = self.state();
        state.ensure_open()?;
        let key = query.selector().key();
        state.history.push(format!("check:{key}"));
        state.target_mut(query)?.checked = true;
        state.dispatch(MockEvent::Check(key));
        Ok(())
    }

    async fn hover(&self, query: &ElementQuery) -> FlowResult<()> {
        let mut state = self.state();
        state.ensure_open()?;
        let key = query.selector().key();
        state.history.push(format!("hover:{key}"));
        state.target_mut(query)?;
        state.dispatch(MockEvent::Hover(key));
        Ok(())
    }

    async fn press_key(&self, key: &str) -> FlowResult<()> {
        let mut state = self.state();
        state.ensure_open()?;
        state.history.push(format!("press:{key}"));
        state.dispatch(MockEvent::Key(key));
        Ok(())
    }

    async fn activity(&self) -> FlowResult<PageActivity> {
        let mut state = self.state();
        state.ensure_open()?;
        if state.busy {
            state.resources += 1;
        }
        Ok(PageActivity {
            ready: true,
            resources: state.resources,
        })
    }

    async fn screenshot(&self) -> FlowResult<Vec<u8>> {
        let mut state = self.state();
        state.ensure_open()?;
        state.history.push("screenshot".to_string());
        Ok(PNG_MAGIC.to_vec())
    }

    async fn close(&mut self) -> FlowResult<()> {
        let mut state = self.state();
        state.history.push("close".to_string());
        state.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::{ElementDescriptor, Selector};

    const USER: ElementDescriptor = ElementDescriptor::new("username", Selector::xpath("//input[@name='username']"));
    const PASS: ElementDescriptor = ElementDescriptor::new("password", Selector::xpath("//input[@name='password']"));
    const SIGN_IN: ElementDescriptor = ElementDescriptor::new("sign in", Selector::css("#sign_in_btn"));
    const RESULT: ElementDescriptor = ElementDescriptor::new("result", Selector::id("signInResultMessage"));
    const TEAMS: ElementDescriptor = ElementDescriptor::new("team", Selector::css("a.team"));

    fn login_page() -> MockDriver {
        MockDriver::new()
            .with_element(USER.selector.key(), MockElement::input())
            .with_element(PASS.selector.key(), MockElement::input())
            .with_element(SIGN_IN.selector.key(), MockElement::input().disabled())
            .with_rule(
                MockRule::on_fill(PASS.selector.key())
                    .when_filled(USER.selector.key())
                    .when_filled(PASS.selector.key())
                    .enable(SIGN_IN.selector.key()),
            )
            .with_rule(
                MockRule::on_click(SIGN_IN.selector.key())
                    .when_value(USER.selector.key(), "alice")
                    .set_text(RESULT.selector.key(), "welcome"),
            )
            .with_rule(
                MockRule::on_click(SIGN_IN.selector.key())
                    .set_text(RESULT.selector.key(), "Incorrect user name or password."),
            )
    }

    mod element_tests {
        use super::*;

        #[test]
        fn test_builders() {
            let el = MockElement::new("Sign out").hidden().disabled().with_value("x");
            assert!(!el.visible);
            assert!(!el.enabled);
            assert_eq!(el.value, "x");
            assert_eq!(el.probe().state_label(), "hidden");
        }
    }

    mod mock_driver_tests {
        use super::*;

        #[tokio::test]
        async fn test_probe_missing_is_detached() {
            let driver = MockDriver::new();
            let probe = driver.probe(&USER.into()).await.unwrap();
            assert!(!probe.attached);
        }

        #[tokio::test]
        async fn test_fill_rule_enables_button() {
            let driver = login_page();
            assert!(!driver.probe(&SIGN_IN.into()).await.unwrap().enabled);
            driver.fill(&USER.into(), "alice").await.unwrap();
            assert!(!driver.probe(&SIGN_IN.into()).await.unwrap().enabled);
            driver.fill(&PASS.into(), "pw").await.unwrap();
            assert!(driver.probe(&SIGN_IN.into()).await.unwrap().enabled);
        }

        #[tokio::test]
        async fn test_first_matching_rule_wins() {
            let driver = login_page();
            driver.fill(&USER.into(), "alice").await.unwrap();
            driver.click(&SIGN_IN.into()).await.unwrap();
            assert_eq!(driver.element(RESULT.selector.key(), 0).unwrap().text, "welcome");

            driver.fill(&USER.into(), "mallory").await.unwrap();
            driver.click(&SIGN_IN.into()).await.unwrap();
            assert_eq!(
                driver.element(RESULT.selector.key(), 0).unwrap().text,
                "Incorrect user name or password."
            );
        }

        #[tokio::test]
        async fn test_reload_restores_built_page() {
            let mut driver = login_page();
            driver.navigate("https://shop.test/#/").await.unwrap();
            driver.fill(&USER.into(), "alice").await.unwrap();
            driver.reload().await.unwrap();
            assert_eq!(driver.element(USER.selector.key(), 0).unwrap().value, "");
            assert_eq!(driver.current_url().await.unwrap(), "https://shop.test/#/");
        }

        #[tokio::test]
        async fn test_text_filter_and_index() {
            let driver = MockDriver::new().with_elements(
                TEAMS.selector.key(),
                vec![MockElement::new("India"), MockElement::new("Australia"), MockElement::new("Ireland")],
            );
            assert_eq!(driver.count(&TEAMS.into()).await.unwrap(), 3);
            assert_eq!(driver.count(&TEAMS.with_text("Ir")).await.unwrap(), 1);
            let probe = driver.probe(&TEAMS.nth(1)).await.unwrap();
            assert_eq!(probe.text.as_deref(), Some("Australia"));
            assert!(!driver.probe(&TEAMS.nth(3)).await.unwrap().attached);
        }

        #[tokio::test]
        async fn test_click_text_rule_and_client_navigation() {
            let driver = MockDriver::new()
                .with_elements(
                    TEAMS.selector.key(),
                    vec![MockElement::new("India"), MockElement::new("Australia")],
                )
                .with_rule(MockRule::on_click_text(TEAMS.selector.key(), "Australia").navigate_to("/teams/australia"));
            driver.click(&TEAMS.with_text("India")).await.unwrap();
            assert_eq!(driver.url(), "");
            driver.click(&TEAMS.with_text("Australia")).await.unwrap();
            assert_eq!(driver.url(), "/teams/australia");
        }

        #[tokio::test]
        async fn test_busy_page_never_idles() {
            let driver = MockDriver::new();
            let a = driver.activity().await.unwrap();
            let b = driver.activity().await.unwrap();
            assert_eq!(a, b);
            driver.set_busy(true);
            let c = driver.activity().await.unwrap();
            assert!(c.resources > b.resources);
        }

        #[tokio::test]
        async fn test_closed_page_rejects_calls() {
            let mut driver = MockDriver::new();
            let handle = driver.clone();
            driver.close().await.unwrap();
            assert!(handle.is_closed());
            assert!(driver.current_url().await.is_err());
            assert!(handle.was_called("close"));
        }

        #[tokio::test]
        async fn test_click_missing_element_is_driver_error() {
            let driver = MockDriver::new();
            let err = driver.click(&SIGN_IN.into()).await.unwrap_err();
            assert!(matches!(err, FlowError::Driver { .. }));
        }

        #[tokio::test]
        async fn test_screenshot_is_png() {
            let driver = MockDriver::new();
            let bytes = driver.screenshot().await.unwrap();
            assert_eq!(&bytes[..8], &PNG_MAGIC);
        }
    }
}
