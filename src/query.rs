//! Ordered query-parameter accumulator.
//!
//! Behaves like the WHATWG `URLSearchParams` list: pairs keep their
//! insertion order, `set` overwrites the first occurrence of a key and drops
//! the others, and serialization uses `application/x-www-form-urlencoded`.

use std::fmt;

use url::form_urlencoded;
use url::Url;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryAccumulator {
    pairs: Vec<(String, String)>,
}

impl QueryAccumulator {
    /// Parse a raw query string (with or without leading `?`).
    ///
    /// Invalid escapes are replaced with U+FFFD, like a browser does.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        let pairs = form_urlencoded::parse(raw.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { pairs }
    }

    /// Seed from the query component of an already parsed URL.
    pub fn from_url(url: &Url) -> Self {
        let pairs = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { pairs }
    }

    /// Set `key` to a single `value`, keeping the position of its first occurrence.
    pub fn set(&mut self, key: &str, value: &str) {
        let mut found = false;
        self.pairs.retain_mut(|(k, v)| {
            if k != key {
                return true;
            }
            if found {
                return false;
            }
            found = true;
            *v = value.to_string();
            true
        });
        if !found {
            self.pairs.push((key.to_string(), value.to_string()));
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serialize without a leading `?`; empty when there are no pairs.
    pub fn serialize(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }
}

impl fmt::Display for QueryAccumulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(qs: &QueryAccumulator) -> Vec<(&str, &str)> {
        qs.iter().collect()
    }

    // ============ parse tests ============

    #[test]
    fn test_parse_empty() {
        assert!(pairs(&QueryAccumulator::parse("")).is_empty());
        assert!(pairs(&QueryAccumulator::parse("?")).is_empty());
    }

    #[test]
    fn test_parse_strips_question_mark() {
        let qs = QueryAccumulator::parse("?a=1&b=2");
        assert_eq!(pairs(&qs), vec![("a", "1"), ("b", "2")]);
    }

    #[test]
    fn test_parse_key_without_value() {
        let qs = QueryAccumulator::parse("flag&x=1");
        assert_eq!(pairs(&qs), vec![("flag", ""), ("x", "1")]);
    }

    #[test]
    fn test_parse_skips_empty_pieces() {
        let qs = QueryAccumulator::parse("a=1&&b=2&");
        assert_eq!(pairs(&qs), vec![("a", "1"), ("b", "2")]);
    }

    #[test]
    fn test_parse_decodes_plus_and_percent() {
        let qs = QueryAccumulator::parse("q=hello+world&k=a%26b");
        assert_eq!(pairs(&qs), vec![("q", "hello world"), ("k", "a&b")]);
    }

    #[test]
    fn test_parse_lossy_on_invalid_utf8() {
        let qs = QueryAccumulator::parse("a=%FF&b=%C3%28");
        assert_eq!(pairs(&qs), vec![("a", "\u{FFFD}"), ("b", "\u{FFFD}(")]);
    }

    // ============ set tests ============

    #[test]
    fn test_set_appends_new_key() {
        let mut qs = QueryAccumulator::parse("a=1");
        qs.set("b", "2");
        assert_eq!(qs.serialize(), "a=1&b=2");
    }

    #[test]
    fn test_set_overwrites_in_place() {
        let mut qs = QueryAccumulator::parse("a=1&b=2");
        qs.set("a", "9");
        assert_eq!(qs.serialize(), "a=9&b=2");
    }

    #[test]
    fn test_set_collapses_duplicates() {
        let mut qs = QueryAccumulator::parse("a=1&b=2&a=3");
        qs.set("a", "x");
        assert_eq!(qs.serialize(), "a=x&b=2");
    }

    // ============ serialize tests ============

    #[test]
    fn test_serialize_empty() {
        assert_eq!(QueryAccumulator::default().serialize(), "");
    }

    #[test]
    fn test_serialize_encodes_specials() {
        let mut qs = QueryAccumulator::default();
        qs.set("name", "hello world");
        qs.set("special", "a&b=c");
        assert_eq!(qs.to_string(), "name=hello+world&special=a%26b%3Dc");
    }

    #[test]
    fn test_from_url() {
        let url = Url::parse("https://example.com/?x=1&y=two").unwrap();
        let qs = QueryAccumulator::from_url(&url);
        assert_eq!(pairs(&qs), vec![("x", "1"), ("y", "two")]);
    }
}
