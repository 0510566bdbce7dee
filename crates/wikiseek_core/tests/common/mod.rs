#![allow(dead_code)]

use std::sync::Once;

use wikiseek_core::{update, AppState, Effect, FetchTag, Msg, Suggestion};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(wikiseek_logging::initialize_for_tests);
}

/// Types `text` and lets the debounce timer fire, returning the fetch tag.
pub fn type_and_settle(state: AppState, text: &str) -> (AppState, FetchTag) {
    let (state, effects) = update(state, Msg::InputChanged(text.to_string()));
    let request_id = effects
        .iter()
        .find_map(|effect| match effect {
            Effect::ScheduleFetch { request_id, .. } => Some(*request_id),
            _ => None,
        })
        .expect("schedule effect");
    let (state, effects) = update(state, Msg::DebounceElapsed { request_id });
    let tag = fetch_tag(&effects).expect("fetch effect");
    (state, tag)
}

pub fn fetch_tag(effects: &[Effect]) -> Option<FetchTag> {
    effects.iter().find_map(|effect| match effect {
        Effect::FetchSuggestions(tag) => Some(tag.clone()),
        _ => None,
    })
}

pub fn deliver(state: AppState, tag: FetchTag, titles: &[&str]) -> AppState {
    let suggestions = titles
        .iter()
        .map(|title| Suggestion::new(*title, format!("https://www.poewiki.net/wiki/{title}")))
        .collect();
    let (state, effects) = update(state, Msg::SuggestionsLoaded { tag, suggestions });
    assert!(effects.is_empty());
    state
}

/// State with `query` typed and `titles` shown in an open dropdown.
pub fn open_dropdown(query: &str, titles: &[&str]) -> AppState {
    let (state, tag) = type_and_settle(AppState::new(), query);
    deliver(state, tag, titles)
}
