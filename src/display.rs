//! Computes the displayed result from the base value and the active segments.
//!
//! This is a pure function of its inputs: no session state is read or kept.

use url::Url;

use crate::query::QueryAccumulator;
use crate::segment::QueryPair;

/// Shown when there is nothing to display, so the output row keeps its height.
pub const BLANK_PLACEHOLDER: &str = "\u{a0}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComputedResult {
    /// The base parsed as an absolute URL; segments were merged into its query
    Url(String),
    /// No URL, but the accumulated query string is non-empty
    Query(String),
    Blank,
}

impl ComputedResult {
    /// Text for the output region.
    pub fn display_text(&self) -> &str {
        match self {
            ComputedResult::Url(text) | ComputedResult::Query(text) => text,
            ComputedResult::Blank => BLANK_PLACEHOLDER,
        }
    }

    /// The result as it is stored in the page address, if any.
    pub fn as_link_value(&self) -> Option<&str> {
        match self {
            ComputedResult::Url(text) | ComputedResult::Query(text) => Some(text),
            ComputedResult::Blank => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, ComputedResult::Blank)
    }
}

/// Try to read `base` as an absolute URL. Any parse failure means "not a URL".
pub fn parse_absolute(base: &str) -> Option<Url> {
    if base.is_empty() {
        return None;
    }
    Url::parse(base).ok()
}

/// Overlay `pairs` onto `base` and render the result.
///
/// Pairs are applied in order, so a later pair wins over an earlier one with
/// the same name, and both win over a parameter already present in `base`.
pub fn compute_result<I>(base: &str, pairs: I) -> ComputedResult
where
    I: IntoIterator<Item = QueryPair>,
{
    let mut url = parse_absolute(base);
    let mut accumulator = match &url {
        Some(url) => QueryAccumulator::from_url(url),
        None => QueryAccumulator::parse(base),
    };

    let mut touched = false;
    for pair in pairs {
        accumulator.set(&pair.name, &pair.value);
        touched = true;
    }

    let serialized = accumulator.serialize();

    if let Some(url) = url.as_mut() {
        if touched {
            if serialized.is_empty() {
                url.set_query(None);
            } else {
                url.set_query(Some(&serialized));
            }
        }
        ComputedResult::Url(url.to_string())
    } else if !serialized.is_empty() {
        ComputedResult::Query(serialized)
    } else {
        ComputedResult::Blank
    }
}
