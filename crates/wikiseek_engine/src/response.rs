//! Decoding of MediaWiki API payloads.

use serde_json::{Map, Value};
use wikiseek_core::{page_url, Suggestion, WikiSite};

use crate::FetchError;

/// Pairs the titles and URLs of an open-search response positionally.
///
/// The payload is `[query, titles, descriptions, urls]`. A missing or empty
/// URL is replaced by the site's `/wiki/<title>` path.
pub fn parse_opensearch(site: &WikiSite, body: &[u8]) -> Result<Vec<Suggestion>, FetchError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|err| FetchError::malformed(format!("invalid json: {err}")))?;
    let items = value
        .as_array()
        .filter(|items| items.len() >= 4)
        .ok_or_else(|| FetchError::malformed("expected a 4-element array"))?;
    let titles = items[1]
        .as_array()
        .ok_or_else(|| FetchError::malformed("titles are not an array"))?;
    let urls = items[3]
        .as_array()
        .ok_or_else(|| FetchError::malformed("urls are not an array"))?;

    titles
        .iter()
        .enumerate()
        .map(|(index, title)| {
            let title = title
                .as_str()
                .ok_or_else(|| FetchError::malformed(format!("title {index} is not a string")))?;
            let url = urls
                .get(index)
                .and_then(Value::as_str)
                .filter(|url| !url.is_empty())
                .map(ToOwned::to_owned)
                .unwrap_or_else(|| page_url(site, title));
            Ok(Suggestion::new(title, url))
        })
        .collect()
}

/// Returns the full URL of the first existing page in a page-info response.
///
/// Accepts both the legacy object-keyed `pages` map and the array form.
/// A response without `query.pages` simply has no page.
pub fn parse_page_info(body: &[u8]) -> Result<Option<String>, FetchError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|err| FetchError::malformed(format!("invalid json: {err}")))?;
    let root = value
        .as_object()
        .ok_or_else(|| FetchError::malformed("expected a json object"))?;

    let pages = match root.get("query").and_then(|query| query.get("pages")) {
        None => return Ok(None),
        Some(pages) => pages,
    };
    let found = match pages {
        Value::Object(map) => map.values().find_map(existing_page_url),
        Value::Array(list) => list.iter().find_map(existing_page_url),
        _ => return Err(FetchError::malformed("pages is neither a map nor a list")),
    };
    Ok(found)
}

fn existing_page_url(page: &Value) -> Option<String> {
    let page = page.as_object()?;
    let has_id = page
        .get("pageid")
        .and_then(Value::as_i64)
        .is_some_and(|id| id > 0);
    if !has_id || flag_set(page, "missing") || flag_set(page, "invalid") {
        return None;
    }
    page.get("fullurl")
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
        .map(ToOwned::to_owned)
}

// Legacy responses mark flags with an empty string; newer ones use booleans.
fn flag_set(page: &Map<String, Value>, name: &str) -> bool {
    match page.get(name) {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(_) => true,
    }
}
