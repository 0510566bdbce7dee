use wikiseek_core::{fulltext_search_url, normalize_term, Resolution, WikiSite};
use wikiseek_logging::{seek_info, seek_warn};

use crate::PageLookup;

/// Decides where confirming `raw_term` without a highlighted suggestion leads.
///
/// The lookup runs on the whitespace-normalized term. When the wiki reports
/// no existing page, or anything goes wrong, the result is a full-text search
/// for the trimmed term exactly as typed.
pub async fn resolve(lookup: &dyn PageLookup, site: &WikiSite, raw_term: &str) -> Resolution {
    let term = raw_term.trim();
    let normalized = normalize_term(term);
    let fallback = || Resolution::FullTextSearch(fulltext_search_url(site, term));
    if normalized.is_empty() {
        return fallback();
    }

    match lookup.lookup(site, &normalized).await {
        Ok(Some(url)) => {
            seek_info!("Exact page found for {:?} on {:?}", normalized, site.endpoint());
            Resolution::Direct(url)
        }
        Ok(None) => fallback(),
        Err(err) => {
            seek_warn!("Exact page check failed, using search: {}", err);
            fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FailureKind, FetchError};
    use std::sync::Mutex;
    use wikiseek_core::WikiEndpoint;

    struct Canned {
        answer: Result<Option<String>, FetchError>,
        asked: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl PageLookup for Canned {
        async fn lookup(&self, _site: &WikiSite, title: &str) -> Result<Option<String>, FetchError> {
            self.asked.lock().unwrap().push(title.to_string());
            self.answer.clone()
        }
    }

    fn canned(answer: Result<Option<String>, FetchError>) -> Canned {
        Canned {
            answer,
            asked: Mutex::new(Vec::new()),
        }
    }

    #[tokio::test]
    async fn lookup_uses_normalized_term() {
        let lookup = canned(Ok(Some("https://wiki/X".into())));
        let site = WikiSite::canonical(WikiEndpoint::Poe1);
        let resolution = resolve(&lookup, &site, "  Flame   Dash ").await;
        assert_eq!(resolution, Resolution::Direct("https://wiki/X".into()));
        assert_eq!(*lookup.asked.lock().unwrap(), vec!["Flame Dash".to_string()]);
    }

    #[tokio::test]
    async fn error_falls_back_to_search_with_raw_term() {
        let lookup = canned(Err(FetchError::new(FailureKind::Network, "down")));
        let site = WikiSite::canonical(WikiEndpoint::Poe2);
        let resolution = resolve(&lookup, &site, "Flame   Dash").await;
        assert_eq!(
            resolution,
            Resolution::FullTextSearch(fulltext_search_url(&site, "Flame   Dash"))
        );
    }

    #[tokio::test]
    async fn blank_term_skips_lookup() {
        let lookup = canned(Ok(Some("https://wiki/X".into())));
        let site = WikiSite::canonical(WikiEndpoint::Poe1);
        let resolution = resolve(&lookup, &site, "   ").await;
        assert!(matches!(resolution, Resolution::FullTextSearch(_)));
        assert!(lookup.asked.lock().unwrap().is_empty());
    }
}
