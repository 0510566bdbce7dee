use std::time::Duration;

use crate::view_model::{AppViewModel, EntryKind, EntryView};
use crate::{fulltext_search_url, WikiEndpoint, WikiSites};

/// Quiet period after the last keystroke before suggestions are fetched.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(300);

pub type RequestId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub title: String,
    pub url: String,
}

impl Suggestion {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

/// Identifies a suggestion request by the query and wiki it was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTag {
    pub request_id: RequestId,
    pub query: String,
    pub endpoint: WikiEndpoint,
}

impl FetchTag {
    fn targets(&self, query: &str, endpoint: WikiEndpoint) -> bool {
        self.query == query && self.endpoint == endpoint
    }
}

/// Outcome of an exact-title lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The wiki has a page for the term; open it.
    Direct(String),
    /// No unambiguous page; fall back to a full-text search.
    FullTextSearch(String),
}

impl Resolution {
    pub fn url(&self) -> &str {
        match self {
            Resolution::Direct(url) | Resolution::FullTextSearch(url) => url,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Debouncing,
    AwaitingFetch,
    DropdownOpen,
    DropdownClosed,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    sites: WikiSites,
    endpoint: WikiEndpoint,
    raw_query: String,
    suggestions: Vec<Suggestion>,
    selected: Option<usize>,
    dropdown_open: bool,
    pending: Option<FetchTag>,
    in_flight: Option<FetchTag>,
    next_request_id: RequestId,
    touched: bool,
    finished: bool,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sites(sites: WikiSites) -> Self {
        Self {
            sites,
            ..Self::default()
        }
    }

    pub fn endpoint(&self) -> WikiEndpoint {
        self.endpoint
    }

    pub fn trimmed_query(&self) -> &str {
        self.raw_query.trim()
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_dropdown_open(&self) -> bool {
        self.dropdown_open
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn pending_fetch(&self) -> Option<&FetchTag> {
        self.pending.as_ref()
    }

    pub fn in_flight_fetch(&self) -> Option<&FetchTag> {
        self.in_flight.as_ref()
    }

    pub fn phase(&self) -> Phase {
        if self.finished {
            Phase::Finished
        } else if self.pending.is_some() {
            Phase::Debouncing
        } else if self.in_flight.is_some() {
            Phase::AwaitingFetch
        } else if self.dropdown_open {
            Phase::DropdownOpen
        } else if self.touched {
            Phase::DropdownClosed
        } else {
            Phase::Idle
        }
    }

    /// Number of selectable rows: API suggestions plus the full-text entry.
    pub fn entry_count(&self) -> usize {
        if self.dropdown_open {
            self.suggestions.len() + 1
        } else {
            0
        }
    }

    /// URL behind the rendered row at `index`, if the dropdown shows it.
    pub fn entry_url(&self, index: usize) -> Option<String> {
        if !self.dropdown_open {
            return None;
        }
        match index.cmp(&self.suggestions.len()) {
            std::cmp::Ordering::Less => Some(self.suggestion_url(&self.suggestions[index])),
            std::cmp::Ordering::Equal => Some(self.fulltext_url()),
            std::cmp::Ordering::Greater => None,
        }
    }

    pub fn view(&self) -> AppViewModel {
        let mut entries: Vec<EntryView> = Vec::with_capacity(self.entry_count());
        if self.dropdown_open {
            entries.extend(self.suggestions.iter().map(|suggestion| EntryView {
                label: suggestion.title.clone(),
                url: self.suggestion_url(suggestion),
                kind: EntryKind::Suggestion,
            }));
            entries.push(EntryView {
                label: format!("Search for pages containing \"{}\"", self.trimmed_query()),
                url: self.fulltext_url(),
                kind: EntryKind::FullTextSearch,
            });
        }
        AppViewModel {
            query: self.raw_query.clone(),
            endpoint: self.endpoint,
            phase: self.phase(),
            dropdown_open: self.dropdown_open,
            entries,
            selected: self.selected,
            dirty: self.dirty,
        }
    }

    /// Returns whether a re-render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    /// Suggestion links may be site-relative; anchor them to the active wiki.
    fn suggestion_url(&self, suggestion: &Suggestion) -> String {
        self.sites.site(self.endpoint).absolute_url(&suggestion.url)
    }

    fn fulltext_url(&self) -> String {
        fulltext_search_url(self.sites.site(self.endpoint), self.trimmed_query())
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_query(&mut self, raw: String) {
        self.raw_query = raw;
        self.touched = true;
        self.mark_dirty();
    }

    pub(crate) fn set_endpoint(&mut self, endpoint: WikiEndpoint) {
        self.endpoint = endpoint;
        self.mark_dirty();
    }

    pub(crate) fn finish(&mut self) {
        self.pending = None;
        self.in_flight = None;
        self.finished = true;
        self.mark_dirty();
    }

    /// Empties the list and closes the dropdown; the selection resets with it.
    pub(crate) fn clear_suggestions(&mut self) {
        self.suggestions.clear();
        self.selected = None;
        self.dropdown_open = false;
        self.mark_dirty();
    }

    pub(crate) fn replace_suggestions(&mut self, suggestions: Vec<Suggestion>) {
        self.dropdown_open = !suggestions.is_empty();
        self.suggestions = suggestions;
        self.selected = None;
        self.mark_dirty();
    }

    pub(crate) fn new_tag(&mut self) -> FetchTag {
        self.next_request_id += 1;
        FetchTag {
            request_id: self.next_request_id,
            query: self.trimmed_query().to_string(),
            endpoint: self.endpoint,
        }
    }

    pub(crate) fn schedule(&mut self, tag: FetchTag) {
        self.pending = Some(tag);
        self.mark_dirty();
    }

    pub(crate) fn take_pending(&mut self) -> Option<FetchTag> {
        let tag = self.pending.take();
        if tag.is_some() {
            self.mark_dirty();
        }
        tag
    }

    /// Takes the pending tag only if it belongs to `request_id`.
    pub(crate) fn take_pending_if(&mut self, request_id: RequestId) -> Option<FetchTag> {
        if self.pending.as_ref()?.request_id == request_id {
            self.take_pending()
        } else {
            None
        }
    }

    pub(crate) fn start_fetch(&mut self, tag: FetchTag) {
        self.in_flight = Some(tag);
        self.mark_dirty();
    }

    pub(crate) fn drop_in_flight(&mut self) {
        if self.in_flight.take().is_some() {
            self.mark_dirty();
        }
    }

    /// A completion is current when it matches the outstanding request and
    /// the query and wiki the user is looking at right now.
    pub(crate) fn accepts(&self, tag: &FetchTag) -> bool {
        let outstanding = match &self.in_flight {
            Some(outstanding) => outstanding,
            None => return false,
        };
        outstanding.targets(&tag.query, tag.endpoint)
            && tag.targets(self.trimmed_query(), self.endpoint)
    }

    /// Moves the highlight by `step` rows, wrapping at either end.
    pub(crate) fn move_selection(&mut self, step: isize) {
        let count = self.entry_count();
        if count == 0 {
            return;
        }
        let count = count as isize;
        let current = self.selected.map_or(-1, |index| index as isize);
        let next = (current + step).rem_euclid(count);
        self.selected = Some(next as usize);
        self.mark_dirty();
    }
}
