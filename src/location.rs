//! The application's own address, the desktop counterpart of a browser
//! address bar. The computed result is mirrored into its `url` parameter so
//! the current state can be shared as a link and reopened later.

use url::Url;

pub const DEFAULT_PAGE_ADDRESS: &str = "query-builder://builder/";

/// Query parameter carrying the computed result.
pub const LINK_PARAM: &str = "url";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageAddress {
    current: Url,
}

impl PageAddress {
    /// Parse `address`, falling back to [`DEFAULT_PAGE_ADDRESS`] when it is not
    /// an absolute URL.
    pub fn parse_or_default(address: &str) -> Self {
        match Url::parse(address) {
            Ok(current) => Self { current },
            Err(e) => {
                log::warn!("Ignoring invalid page address \"{}\": {}", address, e);
                Self::default()
            }
        }
    }

    /// The deep-linked base value, if the address carries one.
    pub fn deep_link(&self) -> Option<String> {
        self.current
            .query_pairs()
            .find(|(k, _)| k == LINK_PARAM)
            .map(|(_, v)| v.into_owned())
            .filter(|v| !v.is_empty())
    }

    /// Replace the address in place: drop every query parameter and store
    /// `link` under [`LINK_PARAM`] when given.
    pub fn replace_state(&mut self, link: Option<&str>) {
        self.current.set_query(None);
        if let Some(link) = link {
            self.current
                .query_pairs_mut()
                .append_pair(LINK_PARAM, link);
        }
    }

    pub fn as_str(&self) -> &str {
        self.current.as_str()
    }
}

impl Default for PageAddress {
    fn default() -> Self {
        Self {
            current: Url::parse(DEFAULT_PAGE_ADDRESS).expect("default page address is a valid URL"),
        }
    }
}
