//! Ordered CSS selector chains with first-match semantics.
//!
//! Listing sites rename classes and test-id attributes often, so every field
//! is located through a chain: a primary selector followed by fallbacks. The
//! chain is evaluated in order and stops at the first selector that yields a
//! non-empty value. A miss is an ordinary outcome (`None`), never an error.

use scraper::{ElementRef, Html, Selector};
use tracing::warn;

/// What to read from a matched element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Accessor {
    /// Visible text, whitespace-collapsed and trimmed
    Text,
    /// Value of the named attribute, trimmed
    Attr(String),
}

impl Accessor {
    /// Shorthand for an attribute accessor.
    pub fn attr(name: impl Into<String>) -> Self {
        Accessor::Attr(name.into())
    }

    /// Read this accessor from an element, `None` if absent or blank.
    pub fn read(&self, element: ElementRef<'_>) -> Option<String> {
        let value = match self {
            Accessor::Text => collapse_whitespace(element.text()),
            Accessor::Attr(name) => element.value().attr(name)?.trim().to_string(),
        };
        Some(value).filter(|v| !v.is_empty())
    }
}

/// An ordered list of compiled selectors.
#[derive(Debug, Clone, Default)]
pub struct SelectorChain {
    selectors: Vec<(String, Selector)>,
}

impl SelectorChain {
    /// Compile a chain from candidate selector strings.
    ///
    /// Candidates that fail to parse are dropped with a warning; the rest of
    /// the chain stays usable.
    pub fn new<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let selectors = candidates
            .into_iter()
            .filter_map(|candidate| {
                let candidate = candidate.as_ref();
                match Selector::parse(candidate) {
                    Ok(selector) => Some((candidate.to_string(), selector)),
                    Err(e) => {
                        warn!(selector = %candidate, error = %e, "Dropping unparseable selector");
                        None
                    }
                }
            })
            .collect();

        Self { selectors }
    }

    /// Number of usable selectors in the chain.
    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    /// True when no candidate compiled.
    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    /// The selector strings, in evaluation order.
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.selectors.iter().map(|(s, _)| s.as_str())
    }

    /// Resolve the first non-empty value within `scope`.
    ///
    /// Each selector is tried in order; within one selector, matched elements
    /// are visited in document order until one yields a non-empty value.
    pub fn resolve(&self, scope: ElementRef<'_>, accessor: &Accessor) -> Option<String> {
        self.resolve_where(scope, accessor, |_| true)
    }

    /// Like [`SelectorChain::resolve`], but values rejected by `accept` do not
    /// stop the search.
    pub fn resolve_where(
        &self,
        scope: ElementRef<'_>,
        accessor: &Accessor,
        accept: impl Fn(&str) -> bool,
    ) -> Option<String> {
        self.selectors.iter().find_map(|(_, selector)| {
            scope
                .select(selector)
                .filter_map(|el| accessor.read(el))
                .find(|value| accept(value))
        })
    }

    /// Elements of the first selector that matches anything in the document.
    ///
    /// Returns the matching selector string alongside at most `cap` elements.
    pub fn select_all<'a>(&self, document: &'a Html, cap: usize) -> Option<(&str, Vec<ElementRef<'a>>)> {
        self.selectors.iter().find_map(|(source, selector)| {
            let elements: Vec<_> = document.select(selector).take(cap).collect();
            if elements.is_empty() {
                None
            } else {
                Some((source.as_str(), elements))
            }
        })
    }
}

/// Join text nodes and collapse runs of whitespace into single spaces.
fn collapse_whitespace<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    let mut out = String::new();
    for word in parts.flat_map(str::split_whitespace) {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}
