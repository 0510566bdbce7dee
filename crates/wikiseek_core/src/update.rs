use wikiseek_logging::{excerpt, seek_debug, seek_info};

use crate::{
    Activation, AppState, Disposition, Effect, Key, Msg, Resolution, WikiEndpoint, DEBOUNCE_DELAY,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    if state.is_finished() {
        return (state, Vec::new());
    }

    let effects = match msg {
        Msg::EndpointRestored(endpoint) => {
            state.set_endpoint(endpoint);
            Vec::new()
        }
        Msg::InputChanged(raw) => input_changed(&mut state, raw),
        Msg::DebounceElapsed { request_id } => match state.take_pending_if(request_id) {
            Some(tag) => {
                state.start_fetch(tag.clone());
                vec![Effect::FetchSuggestions(tag)]
            }
            None => {
                seek_debug!("Ignoring superseded debounce timer {}", request_id);
                Vec::new()
            }
        },
        Msg::SuggestionsLoaded { tag, suggestions } => {
            if state.accepts(&tag) {
                state.drop_in_flight();
                state.replace_suggestions(suggestions);
            } else {
                seek_debug!(
                    "Discarding stale suggestions for request {} ({:?})",
                    tag.request_id,
                    tag.endpoint
                );
            }
            Vec::new()
        }
        Msg::SuggestionsFailed { tag, reason } => {
            if state.accepts(&tag) {
                seek_debug!("Request {} failed: {}", tag.request_id, reason);
                state.drop_in_flight();
                state.clear_suggestions();
            }
            Vec::new()
        }
        Msg::KeyPressed(key) => key_pressed(&mut state, key),
        Msg::EndpointSelected(endpoint) => endpoint_selected(&mut state, endpoint),
        Msg::EntryActivated { index, activation } => match state.entry_url(index) {
            Some(url) => match activation {
                Activation::Primary => open_and_finish(&mut state, url),
                Activation::Secondary => vec![
                    Effect::OpenUrl {
                        url,
                        disposition: Disposition::Background,
                    },
                    Effect::FocusInput,
                ],
            },
            None => Vec::new(),
        },
        Msg::PointerOutside => {
            if state.is_dropdown_open() {
                state.clear_suggestions();
            }
            Vec::new()
        }
        Msg::Resolved(resolution) => {
            match &resolution {
                Resolution::Direct(_) => seek_info!("Opening exact page match"),
                Resolution::FullTextSearch(_) => seek_info!("No exact page; opening search"),
            }
            open_and_finish(&mut state, resolution.url().to_owned())
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn input_changed(state: &mut AppState, raw: String) -> Vec<Effect> {
    let mut effects = cancel_pending(state);
    state.set_query(raw);

    if state.trimmed_query().is_empty() {
        state.drop_in_flight();
        state.clear_suggestions();
        return effects;
    }

    let tag = state.new_tag();
    seek_debug!(
        "Scheduling request {} for '{}'",
        tag.request_id,
        excerpt(&tag.query, 40)
    );
    effects.push(Effect::ScheduleFetch {
        request_id: tag.request_id,
        delay: DEBOUNCE_DELAY,
    });
    state.schedule(tag);
    effects
}

fn key_pressed(state: &mut AppState, key: Key) -> Vec<Effect> {
    match key {
        Key::Down | Key::Up => {
            if state.is_dropdown_open() {
                state.move_selection(if key == Key::Down { 1 } else { -1 });
            }
            Vec::new()
        }
        Key::Enter => {
            if let Some(url) = state.selected().and_then(|index| state.entry_url(index)) {
                return open_and_finish(state, url);
            }
            let term = state.trimmed_query().to_string();
            if term.is_empty() {
                return Vec::new();
            }
            let mut effects = cancel_pending(state);
            state.drop_in_flight();
            state.clear_suggestions();
            effects.push(Effect::Resolve {
                endpoint: state.endpoint(),
                term,
            });
            effects
        }
        Key::Escape => {
            let effects = cancel_pending(state);
            state.drop_in_flight();
            state.clear_suggestions();
            effects
        }
    }
}

fn endpoint_selected(state: &mut AppState, endpoint: WikiEndpoint) -> Vec<Effect> {
    let mut effects = cancel_pending(state);
    state.set_endpoint(endpoint);
    effects.push(Effect::PersistEndpoint(endpoint));
    state.drop_in_flight();
    state.clear_suggestions();

    if !state.trimmed_query().is_empty() {
        let tag = state.new_tag();
        state.start_fetch(tag.clone());
        effects.push(Effect::FetchSuggestions(tag));
    }
    effects
}

fn cancel_pending(state: &mut AppState) -> Vec<Effect> {
    match state.take_pending() {
        Some(tag) => vec![Effect::CancelScheduledFetch {
            request_id: tag.request_id,
        }],
        None => Vec::new(),
    }
}

fn open_and_finish(state: &mut AppState, url: String) -> Vec<Effect> {
    state.finish();
    vec![
        Effect::OpenUrl {
            url,
            disposition: Disposition::Foreground,
        },
        Effect::ClosePopup,
    ]
}
