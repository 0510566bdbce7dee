use std::time::Duration;

use crate::{FetchTag, RequestId, WikiEndpoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Foreground,
    Background,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ScheduleFetch { request_id: RequestId, delay: Duration },
    CancelScheduledFetch { request_id: RequestId },
    FetchSuggestions(FetchTag),
    Resolve { endpoint: WikiEndpoint, term: String },
    PersistEndpoint(WikiEndpoint),
    OpenUrl { url: String, disposition: Disposition },
    FocusInput,
    ClosePopup,
}
