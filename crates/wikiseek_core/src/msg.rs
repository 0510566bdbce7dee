use crate::{FetchTag, RequestId, Resolution, Suggestion, WikiEndpoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Enter,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Plain primary-button click: open in the foreground and finish.
    Primary,
    /// Modifier-held or middle click: open in the background and stay.
    Secondary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Endpoint loaded from the preference store at startup.
    EndpointRestored(WikiEndpoint),
    /// User edited the search input.
    InputChanged(String),
    /// A debounce timer ran to completion.
    DebounceElapsed { request_id: RequestId },
    /// Suggestions arrived for a tagged request.
    SuggestionsLoaded {
        tag: FetchTag,
        suggestions: Vec<Suggestion>,
    },
    /// A tagged suggestion request failed.
    SuggestionsFailed { tag: FetchTag, reason: String },
    /// Keyboard navigation and confirmation.
    KeyPressed(Key),
    /// User picked a wiki with the toggle.
    EndpointSelected(WikiEndpoint),
    /// Pointer activation of a rendered dropdown row.
    EntryActivated { index: usize, activation: Activation },
    /// Pointer click outside the input and the dropdown.
    PointerOutside,
    /// Exact-title lookup finished.
    Resolved(Resolution),
    /// UI/render tick.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
