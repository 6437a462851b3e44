//! Element descriptors and queries.
//!
//! Page objects declare their elements as `'static` [`ElementDescriptor`]
//! tables. The facade turns a descriptor into an [`ElementQuery`] (optionally
//! narrowed by position or text) and hands it to the driver, so no caller
//! above the driver ever sees raw selector syntax.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Selector type for locating elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selector {
    /// CSS selector (e.g., "button.primary")
    Css(&'static str),
    /// XPath selector
    XPath(&'static str),
    /// Element id attribute
    Id(&'static str),
    /// Text content selector
    Text(&'static str),
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub const fn css(selector: &'static str) -> Self {
        Self::Css(selector)
    }

    /// Create an XPath selector
    #[must_use]
    pub const fn xpath(selector: &'static str) -> Self {
        Self::XPath(selector)
    }

    /// Create an id selector
    #[must_use]
    pub const fn id(id: &'static str) -> Self {
        Self::Id(id)
    }

    /// Create a text selector
    #[must_use]
    pub const fn text(text: &'static str) -> Self {
        Self::Text(text)
    }

    /// Raw selector string, used as the lookup key by in-memory drivers
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Css(s) | Self::XPath(s) | Self::Id(s) | Self::Text(s) => s,
        }
    }

    /// JavaScript expression evaluating to an array of all matching nodes
    #[must_use]
    pub fn to_collection_js(&self) -> String {
        match self {
            Self::Css(s) => format!("Array.from(document.querySelectorAll({}))", js_str(s)),
            Self::XPath(s) => format!(
                "(() => {{ const r = document.evaluate({}, document, null, \
                 XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null); const out = []; \
                 for (let i = 0; i < r.snapshotLength; i++) {{ out.push(r.snapshotItem(i)); }} \
                 return out; }})()",
                js_str(s)
            ),
            Self::Id(id) => format!("[document.getElementById({})].filter(Boolean)", js_str(id)),
            Self::Text(t) => format!(
                "Array.from(document.querySelectorAll('body *')).filter(el => \
                 el.children.length === 0 && el.textContent.includes({}))",
                js_str(t)
            ),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(s) => write!(f, "css={s}"),
            Self::XPath(s) => write!(f, "xpath={s}"),
            Self::Id(s) => write!(f, "id={s}"),
            Self::Text(s) => write!(f, "text={s}"),
        }
    }
}

/// Quote a Rust string as a JavaScript string literal
fn js_str(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| String::from("\"\""))
}

/// A named, semantic element of a page.
///
/// The name is what shows up in errors and logs; the selector is only ever
/// interpreted by a driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementDescriptor {
    /// Human-readable element name
    pub name: &'static str,
    /// How the driver finds it
    pub selector: Selector,
}

impl ElementDescriptor {
    /// Create a new descriptor
    #[must_use]
    pub const fn new(name: &'static str, selector: Selector) -> Self {
        Self { name, selector }
    }

    /// Query the nth (0-based) match
    #[must_use]
    pub fn nth(self, index: usize) -> ElementQuery {
        ElementQuery::from(self).nth(index)
    }

    /// Query the first match whose text contains `text`
    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> ElementQuery {
        ElementQuery::from(self).with_text(text)
    }
}

/// A concrete lookup handed to the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementQuery {
    /// Descriptor being resolved
    pub descriptor: ElementDescriptor,
    /// Which match to use (0-based)
    pub index: usize,
    /// Restrict matches to nodes whose text contains this
    pub has_text: Option<String>,
}

impl ElementQuery {
    /// Select the nth match
    #[must_use]
    pub const fn nth(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    /// Restrict to matches containing text
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.has_text = Some(text.into());
        self
    }

    /// Selector of the underlying descriptor
    #[must_use]
    pub const fn selector(&self) -> Selector {
        self.descriptor.selector
    }

    /// Human-readable description for errors
    #[must_use]
    pub fn describe(&self) -> String {
        let mut out = String::from(self.descriptor.name);
        if let Some(text) = &self.has_text {
            out.push_str(&format!(" containing '{text}'"));
        }
        if self.index > 0 {
            out.push_str(&format!(" #{}", self.index + 1));
        }
        out
    }

    /// JavaScript expression evaluating to the filtered match array
    #[must_use]
    pub fn to_matches_js(&self) -> String {
        let base = self.descriptor.selector.to_collection_js();
        match &self.has_text {
            Some(text) => format!(
                "{base}.filter(el => (el.textContent || '').includes({}))",
                js_str(text)
            ),
            None => base,
        }
    }

    /// JavaScript expression evaluating to the targeted node or `undefined`
    #[must_use]
    pub fn to_element_js(&self) -> String {
        format!("({})[{}]", self.to_matches_js(), self.index)
    }

    /// JavaScript expression returning an [`ElementProbe`]-shaped object
    #[must_use]
    pub fn to_probe_js(&self) -> String {
        format!(
            "(() => {{ const el = {}; \
             if (!el) {{ return {{ attached: false, visible: false, enabled: false, text: null }}; }} \
             const r = el.getBoundingClientRect(); const s = window.getComputedStyle(el); \
             return {{ attached: true, \
             visible: r.width > 0 && r.height > 0 && s.visibility !== 'hidden' && s.display !== 'none', \
             enabled: !el.disabled && el.getAttribute('aria-disabled') !== 'true' \
             && !el.classList.contains('disabled'), \
             text: el.textContent }}; }})()",
            self.to_element_js()
        )
    }
}

impl From<ElementDescriptor> for ElementQuery {
    fn from(descriptor: ElementDescriptor) -> Self {
        Self {
            descriptor,
            index: 0,
            has_text: None,
        }
    }
}

impl From<&ElementDescriptor> for ElementQuery {
    fn from(descriptor: &ElementDescriptor) -> Self {
        Self::from(*descriptor)
    }
}

/// One observation of an element's state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementProbe {
    /// A node matched
    pub attached: bool,
    /// Rendered with a non-empty box and not hidden by style
    pub visible: bool,
    /// Not disabled
    pub enabled: bool,
    /// Raw text content
    pub text: Option<String>,
}

impl ElementProbe {
    /// Probe of a query that matched nothing
    #[must_use]
    pub const fn detached() -> Self {
        Self {
            attached: false,
            visible: false,
            enabled: false,
            text: None,
        }
    }

    /// Visible and enabled
    #[must_use]
    pub const fn is_actionable(&self) -> bool {
        self.attached && self.visible && self.enabled
    }

    /// Trimmed text content, empty when absent
    #[must_use]
    pub fn trimmed_text(&self) -> String {
        self.text.as_deref().map(str::trim).unwrap_or_default().to_string()
    }

    /// Short label of the state for error messages
    #[must_use]
    pub const fn state_label(&self) -> &'static str {
        match (self.attached, self.visible, self.enabled) {
            (false, _, _) => "detached",
            (true, false, _) => "hidden",
            (true, true, false) => "disabled",
            (true, true, true) => "actionable",
        }
    }
}
