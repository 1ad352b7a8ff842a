//! Decomposes a base value into a bare URL and its query pairs.

use crate::display::parse_absolute;
use crate::query::QueryAccumulator;
use crate::segment::QueryPair;

/// Outcome of decomposing a base value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decomposed {
    /// The base URL with its query removed, when the base was an absolute URL
    pub stripped_base: Option<String>,
    pub pairs: Vec<QueryPair>,
}

/// Split `base` into segments.
///
/// An absolute URL yields its query pairs and the URL without query. Anything
/// else is read as a raw query string, decoded the same way the display does.
pub fn decompose(base: &str) -> Decomposed {
    let (accumulator, stripped_base) = match parse_absolute(base) {
        Some(mut url) => {
            let accumulator = QueryAccumulator::from_url(&url);
            url.set_query(None);
            (accumulator, Some(url.to_string()))
        }
        None => (QueryAccumulator::parse(base), None),
    };

    let pairs = accumulator
        .iter()
        .map(|(name, value)| QueryPair::new(name, value))
        .collect();

    Decomposed {
        stripped_base,
        pairs,
    }
}
