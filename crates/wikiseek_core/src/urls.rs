//! URL construction for the MediaWiki endpoints the popup talks to.

use url::Url;

use crate::WikiSite;

/// Maximum number of suggestions requested from the open-search interface.
pub const OPENSEARCH_LIMIT: usize = 10;

/// Trims and collapses internal whitespace runs to single spaces.
pub fn normalize_term(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn opensearch_url(site: &WikiSite, query: &str) -> Url {
    let mut url = site.join_segments(&["api.php"]);
    url.query_pairs_mut()
        .append_pair("action", "opensearch")
        .append_pair("search", query)
        .append_pair("limit", &OPENSEARCH_LIMIT.to_string())
        .append_pair("namespace", "0")
        .append_pair("format", "json")
        .append_pair("origin", "*");
    url
}

pub fn page_info_url(site: &WikiSite, title: &str) -> Url {
    let mut url = site.join_segments(&["api.php"]);
    url.query_pairs_mut()
        .append_pair("action", "query")
        .append_pair("titles", title)
        .append_pair("redirects", "1")
        .append_pair("prop", "info")
        .append_pair("inprop", "url")
        .append_pair("format", "json")
        .append_pair("origin", "*");
    url
}

/// Special:Search in full-text mode for `term`, which is used verbatim.
pub fn fulltext_search_url(site: &WikiSite, term: &str) -> String {
    let mut url = site.join_segments(&["index.php"]);
    url.query_pairs_mut()
        .append_pair("search", term)
        .append_pair("title", "Special:Search")
        .append_pair("profile", "default")
        .append_pair("fulltext", "1");
    url.into()
}

/// Article URL following the `/wiki/<title>` page-path convention.
pub fn page_url(site: &WikiSite, title: &str) -> String {
    site.join_segments(&["wiki", title]).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WikiEndpoint;

    fn poe1() -> WikiSite {
        WikiSite::canonical(WikiEndpoint::Poe1)
    }

    fn query_value(url: &Url, key: &str) -> Option<String> {
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    #[test]
    fn normalize_collapses_whitespace() {
        assert_eq!(normalize_term("  Flame \t  Dash \n"), "Flame Dash");
        assert_eq!(normalize_term("   "), "");
    }

    #[test]
    fn opensearch_url_carries_all_parameters() {
        let url = opensearch_url(&poe1(), "Flame Dash");
        assert_eq!(url.path(), "/api.php");
        assert_eq!(query_value(&url, "action").as_deref(), Some("opensearch"));
        assert_eq!(query_value(&url, "search").as_deref(), Some("Flame Dash"));
        assert_eq!(query_value(&url, "limit").as_deref(), Some("10"));
        assert_eq!(query_value(&url, "namespace").as_deref(), Some("0"));
        assert_eq!(query_value(&url, "format").as_deref(), Some("json"));
        assert_eq!(query_value(&url, "origin").as_deref(), Some("*"));
    }

    #[test]
    fn page_info_url_follows_redirects() {
        let url = page_info_url(&poe1(), "Flame Dash");
        assert_eq!(query_value(&url, "action").as_deref(), Some("query"));
        assert_eq!(query_value(&url, "titles").as_deref(), Some("Flame Dash"));
        assert_eq!(query_value(&url, "redirects").as_deref(), Some("1"));
        assert_eq!(query_value(&url, "prop").as_deref(), Some("info"));
        assert_eq!(query_value(&url, "inprop").as_deref(), Some("url"));
    }

    #[test]
    fn fulltext_url_encodes_term() {
        let raw = fulltext_search_url(&poe1(), "a&b  c");
        assert!(raw.starts_with("https://www.poewiki.net/index.php?search="));
        assert!(raw.contains("title=Special%3ASearch"));
        let url = Url::parse(&raw).unwrap();
        assert_eq!(query_value(&url, "search").as_deref(), Some("a&b  c"));
        assert_eq!(query_value(&url, "fulltext").as_deref(), Some("1"));
        assert_eq!(query_value(&url, "profile").as_deref(), Some("default"));
    }

    #[test]
    fn page_url_escapes_title_segment() {
        assert_eq!(
            page_url(&poe1(), "Flame Dash"),
            "https://www.poewiki.net/wiki/Flame%20Dash"
        );
        assert_eq!(page_url(&poe1(), "A/B"), "https://www.poewiki.net/wiki/A%2FB");
    }

    #[test]
    fn base_with_path_prefix_is_preserved() {
        let site = WikiSite::new(WikiEndpoint::Poe2, "http://localhost:9000/mirror/").unwrap();
        assert_eq!(opensearch_url(&site, "x").path(), "/mirror/api.php");
    }
}
