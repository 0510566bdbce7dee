use url::Url;

/// Preference key under which the active wiki base is stored.
pub const PREFERENCE_KEY: &str = "wikiBase";

/// The set of wikis the popup can search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WikiEndpoint {
    #[default]
    Poe1,
    Poe2,
}

impl WikiEndpoint {
    pub const ALL: [WikiEndpoint; 2] = [WikiEndpoint::Poe1, WikiEndpoint::Poe2];

    /// Base URL persisted for this endpoint. Stable regardless of overrides.
    pub fn canonical_base(self) -> &'static str {
        match self {
            WikiEndpoint::Poe1 => "https://www.poewiki.net",
            WikiEndpoint::Poe2 => "https://www.poe2wiki.net",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WikiEndpoint::Poe1 => "PoE1",
            WikiEndpoint::Poe2 => "PoE2",
        }
    }

    /// Maps a stored base back to its endpoint. Only exact canonical bases
    /// (ignoring one trailing slash) are members of the allowed set.
    pub fn from_base_url(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
        Self::ALL
            .into_iter()
            .find(|endpoint| endpoint.canonical_base() == trimmed)
    }

    pub fn toggled(self) -> Self {
        match self {
            WikiEndpoint::Poe1 => WikiEndpoint::Poe2,
            WikiEndpoint::Poe2 => WikiEndpoint::Poe1,
        }
    }
}

/// A resolved wiki: which endpoint it is and where its scripts live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiSite {
    endpoint: WikiEndpoint,
    base: Url,
}

impl WikiSite {
    /// Builds a site from an explicit base URL. The base must be usable as a
    /// hierarchical URL so script paths can be appended to it.
    pub fn new(endpoint: WikiEndpoint, base: &str) -> Result<Self, url::ParseError> {
        let base = Url::parse(base.trim())?;
        if base.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase);
        }
        Ok(Self { endpoint, base })
    }

    pub fn canonical(endpoint: WikiEndpoint) -> Self {
        Self::new(endpoint, endpoint.canonical_base()).expect("canonical wiki base is a valid URL")
    }

    pub fn endpoint(&self) -> WikiEndpoint {
        self.endpoint
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Resolves `href` against the base when it is relative. Absolute links
    /// are returned untouched.
    pub fn absolute_url(&self, href: &str) -> String {
        match Url::parse(href) {
            Err(url::ParseError::RelativeUrlWithoutBase) => self
                .base
                .join(href)
                .map(String::from)
                .unwrap_or_else(|_| href.to_string()),
            _ => href.to_string(),
        }
    }

    /// `{base}/{segment}/{segment}...`, each segment percent-encoded.
    pub(crate) fn join_segments(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);
        url.set_fragment(None);
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

/// Base URL table threaded through fetch and resolve calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiSites {
    poe1: WikiSite,
    poe2: WikiSite,
}

impl Default for WikiSites {
    fn default() -> Self {
        Self {
            poe1: WikiSite::canonical(WikiEndpoint::Poe1),
            poe2: WikiSite::canonical(WikiEndpoint::Poe2),
        }
    }
}

impl WikiSites {
    /// Points `endpoint` at a different base, e.g. a mirror or a test server.
    pub fn with_base(mut self, endpoint: WikiEndpoint, base: &str) -> Result<Self, url::ParseError> {
        let site = WikiSite::new(endpoint, base)?;
        match endpoint {
            WikiEndpoint::Poe1 => self.poe1 = site,
            WikiEndpoint::Poe2 => self.poe2 = site,
        }
        Ok(self)
    }

    pub fn site(&self, endpoint: WikiEndpoint) -> &WikiSite {
        match endpoint {
            WikiEndpoint::Poe1 => &self.poe1,
            WikiEndpoint::Poe2 => &self.poe2,
        }
    }
}
