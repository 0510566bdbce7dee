//! Wikiseek core: pure interaction state machine, wiki endpoints and URL helpers.
mod effect;
mod endpoint;
mod msg;
mod state;
mod update;
mod urls;
mod view_model;

pub use effect::{Disposition, Effect};
pub use endpoint::{WikiEndpoint, WikiSite, WikiSites, PREFERENCE_KEY};
pub use msg::{Activation, Key, Msg};
pub use state::{AppState, FetchTag, Phase, RequestId, Resolution, Suggestion, DEBOUNCE_DELAY};
pub use update::update;
pub use urls::{
    fulltext_search_url, normalize_term, opensearch_url, page_info_url, page_url,
    OPENSEARCH_LIMIT,
};
pub use view_model::{AppViewModel, EntryKind, EntryView};
