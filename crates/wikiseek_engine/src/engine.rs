use std::collections::HashMap;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use wikiseek_core::{FetchTag, RequestId, WikiEndpoint, WikiSites};
use wikiseek_logging::{seek_debug, seek_error, seek_warn};

use crate::client::{PageLookup, SuggestionSource, WikiClient};
use crate::{resolve, EngineEvent};

enum EngineCommand {
    Schedule { request_id: RequestId, delay: Duration },
    Cancel { request_id: RequestId },
    Fetch(FetchTag),
    Resolve { endpoint: WikiEndpoint, term: String },
}

/// Runs timers and API calls on a background tokio runtime.
///
/// Commands are fire-and-forget; results come back as [`EngineEvent`]s that
/// the UI loop polls with [`EngineHandle::try_recv`].
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(client: WikiClient, sites: WikiSites) -> Self {
        let client = Arc::new(client);
        Self::with_backend(client.clone(), client, sites)
    }

    pub fn with_backend(
        source: Arc<dyn SuggestionSource>,
        lookup: Arc<dyn PageLookup>,
        sites: WikiSites,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let sites = Arc::new(sites);

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    seek_error!("Failed to start engine runtime: {}", err);
                    return;
                }
            };
            let mut timers: HashMap<RequestId, CancellationToken> = HashMap::new();

            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Schedule { request_id, delay } => {
                        timers.retain(|_, token| !token.is_cancelled());
                        let token = CancellationToken::new();
                        timers.insert(request_id, token.clone());
                        runtime.spawn(run_timer(request_id, delay, token, event_tx.clone()));
                    }
                    EngineCommand::Cancel { request_id } => {
                        if let Some(token) = timers.remove(&request_id) {
                            token.cancel();
                        }
                    }
                    EngineCommand::Fetch(tag) => {
                        let source = source.clone();
                        let sites = sites.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            let site = sites.site(tag.endpoint);
                            let result = source.suggest(site, &tag.query).await;
                            if let Err(err) = &result {
                                seek_warn!("Suggestion request {} failed: {}", tag.request_id, err);
                            }
                            let _ = event_tx.send(EngineEvent::SuggestionsFetched { tag, result });
                        });
                    }
                    EngineCommand::Resolve { endpoint, term } => {
                        let lookup = lookup.clone();
                        let sites = sites.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            let resolution =
                                resolve(lookup.as_ref(), sites.site(endpoint), &term).await;
                            let _ = event_tx.send(EngineEvent::Resolved(resolution));
                        });
                    }
                }
            }
            seek_debug!("Engine command channel closed");
        });

        Self { cmd_tx, event_rx }
    }

    pub fn schedule_fetch(&self, request_id: RequestId, delay: Duration) {
        let _ = self.cmd_tx.send(EngineCommand::Schedule { request_id, delay });
    }

    /// Stops a timer that has not fired yet. Late cancels are harmless.
    pub fn cancel_fetch(&self, request_id: RequestId) {
        let _ = self.cmd_tx.send(EngineCommand::Cancel { request_id });
    }

    pub fn fetch(&self, tag: FetchTag) {
        let _ = self.cmd_tx.send(EngineCommand::Fetch(tag));
    }

    pub fn resolve(&self, endpoint: WikiEndpoint, term: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Resolve {
            endpoint,
            term: term.into(),
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Blocks up to `timeout` for the next event.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn run_timer(
    request_id: RequestId,
    delay: Duration,
    token: CancellationToken,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    tokio::select! {
        _ = token.cancelled() => {
            seek_debug!("Debounce timer {} cancelled", request_id);
        }
        _ = tokio::time::sleep(delay) => {
            // Marks the timer as spent so the command loop can forget it.
            token.cancel();
            let _ = event_tx.send(EngineEvent::DebounceElapsed { request_id });
        }
    }
}
