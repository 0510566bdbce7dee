//! Wikiseek engine: MediaWiki API access, preference storage and effect execution.
mod client;
mod engine;
mod prefs;
mod resolve;
mod response;
mod types;

pub use client::{FetchSettings, PageLookup, SuggestionSource, WikiClient};
pub use engine::EngineHandle;
pub use prefs::{
    load_endpoint, save_endpoint, LocalStore, MemoryStore, PreferenceStore, ProfileStore,
    StorageError, StorageTier,
};
pub use resolve::resolve;
pub use response::{parse_opensearch, parse_page_info};
pub use types::{EngineEvent, FailureKind, FetchError};
