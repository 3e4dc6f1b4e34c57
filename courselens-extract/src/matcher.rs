//! Ordered strategy lists of field matchers.
//!
//! A field's rules are expressed once as a `&[Matcher]` and handed to a
//! single generic routine, instead of per-field copies of the
//! try-selectors-until-one-matches loop.

use courselens_common::CatalogError;
use regex::Regex;
use scraper::{Html, Selector};

use crate::boilerplate::BoilerplateFilter;
use crate::text::{collapse_whitespace, visible_text};

/// One entry in a priority-ordered matcher list: either a structural CSS
/// selector against the parsed markup, or a regex against the flattened
/// visible text.
#[derive(Debug, Clone)]
pub enum Matcher {
    Css(Selector),
    Pattern(Regex),
}

impl Matcher {
    pub fn css(selector: &str) -> Result<Self, CatalogError> {
        Selector::parse(selector)
            .map(Self::Css)
            .map_err(|e| CatalogError::Parse(format!("invalid selector '{selector}': {e}")))
    }

    pub fn pattern(pattern: &str) -> Result<Self, CatalogError> {
        Regex::new(pattern)
            .map(Self::Pattern)
            .map_err(|e| CatalogError::Parse(format!("invalid pattern '{pattern}': {e}")))
    }
}

/// A parsed page together with its flattened visible text, so both matcher
/// kinds can run against the same document.
pub struct PageDocument {
    html: Html,
    text: String,
}

impl PageDocument {
    /// Parse rendered markup. The HTML parser is tolerant; malformed input
    /// degrades to empty extractions rather than an error.
    pub fn parse(html_source: &str) -> Self {
        let html = Html::parse_document(html_source);
        let text = visible_text(&html);
        Self { html, text }
    }

    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Footer/nav-pruned, whitespace-collapsed visible text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Acceptance thresholds for single-valued text fields.
#[derive(Debug, Clone)]
pub struct TextMatchOptions {
    /// Trimmed matches at or below this length are rejected.
    pub min_length: usize,
    /// Matches beyond this length are rejected outright (likely a
    /// container element, not a field).
    pub max_length: usize,
    /// Accepted text is cut to this many characters.
    pub truncate_to: usize,
}

impl Default for TextMatchOptions {
    fn default() -> Self {
        Self {
            min_length: 10,
            max_length: 2000,
            truncate_to: 1000,
        }
    }
}

impl TextMatchOptions {
    pub fn with_min_length(min_length: usize) -> Self {
        Self {
            min_length,
            ..Self::default()
        }
    }
}

/// Acceptance thresholds for list-valued fields.
#[derive(Debug, Clone)]
pub struct ListMatchOptions {
    pub min_item_length: usize,
    pub max_items: usize,
}

impl Default for ListMatchOptions {
    fn default() -> Self {
        Self {
            min_item_length: 5,
            max_items: 10,
        }
    }
}

/// Apply matchers in priority order and return the first acceptable text.
///
/// A candidate is accepted when it survives the boilerplate filter and its
/// trimmed, whitespace-collapsed form is longer than `min_length` and
/// shorter than `max_length`. Later rules are never consulted once one
/// matches, even if they would also produce a result.
pub fn first_text_match(
    doc: &PageDocument,
    matchers: &[Matcher],
    filter: &BoilerplateFilter,
    opts: &TextMatchOptions,
) -> Option<String> {
    for matcher in matchers {
        match matcher {
            Matcher::Css(selector) => {
                for element in doc.html.select(selector) {
                    let candidate = collapse_whitespace(&element.text().collect::<String>());
                    if let Some(accepted) = accept_text(&candidate, filter, opts) {
                        return Some(accepted);
                    }
                }
            }
            Matcher::Pattern(re) => {
                if let Some(caps) = re.captures(&doc.text) {
                    let raw = caps.get(1).or_else(|| caps.get(0)).map(|m| m.as_str())?;
                    let candidate = collapse_whitespace(raw);
                    if let Some(accepted) = accept_text(&candidate, filter, opts) {
                        return Some(accepted);
                    }
                }
            }
        }
    }
    None
}

fn accept_text(
    candidate: &str,
    filter: &BoilerplateFilter,
    opts: &TextMatchOptions,
) -> Option<String> {
    if candidate.is_empty() || filter.is_boilerplate(candidate) {
        return None;
    }
    let len = candidate.chars().count();
    if len <= opts.min_length || len >= opts.max_length {
        return None;
    }
    Some(candidate.chars().take(opts.truncate_to).collect())
}

/// Apply matchers in priority order; the first matcher that yields any
/// accepted items wins and its items (bounded to `max_items`) are returned.
pub fn collect_list_matches(
    doc: &PageDocument,
    matchers: &[Matcher],
    filter: &BoilerplateFilter,
    opts: &ListMatchOptions,
) -> Vec<String> {
    for matcher in matchers {
        let mut items = Vec::new();
        match matcher {
            Matcher::Css(selector) => {
                for element in doc.html.select(selector).take(opts.max_items) {
                    let candidate = collapse_whitespace(&element.text().collect::<String>());
                    push_item(&mut items, candidate, filter, opts);
                }
            }
            Matcher::Pattern(re) => {
                for caps in re.captures_iter(&doc.text).take(opts.max_items) {
                    if let Some(m) = caps.get(1).or_else(|| caps.get(0)) {
                        push_item(&mut items, collapse_whitespace(m.as_str()), filter, opts);
                    }
                }
            }
        }
        if !items.is_empty() {
            return items;
        }
    }
    Vec::new()
}

fn push_item(
    items: &mut Vec<String>,
    candidate: String,
    filter: &BoilerplateFilter,
    opts: &ListMatchOptions,
) {
    if candidate.chars().count() > opts.min_item_length && !filter.is_boilerplate(&candidate) {
        items.push(candidate);
    }
}
