use crate::{Phase, WikiEndpoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Suggestion,
    /// The always-present "search for pages containing" row.
    FullTextSearch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryView {
    pub label: String,
    pub url: String,
    pub kind: EntryKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub query: String,
    pub endpoint: WikiEndpoint,
    pub phase: Phase,
    pub dropdown_open: bool,
    pub entries: Vec<EntryView>,
    pub selected: Option<usize>,
    pub dirty: bool,
}
