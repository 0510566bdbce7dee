use wikiseek_core::{Disposition, Effect, Msg};
use wikiseek_engine::{save_endpoint, EngineEvent, EngineHandle, PreferenceStore};
use wikiseek_logging::{seek_debug, seek_info, seek_warn};

/// Opens URLs for the host. Background requests leave the popup running.
pub trait Navigator {
    fn open(&mut self, url: &str, disposition: Disposition);
}

/// Hands URLs to the system's default browser.
#[derive(Debug, Default)]
pub struct SystemBrowser;

impl Navigator for SystemBrowser {
    fn open(&mut self, url: &str, disposition: Disposition) {
        seek_info!("Opening {:?} ({:?})", url, disposition);
        if let Err(err) = open::that_detached(url) {
            seek_warn!("Failed to open {}: {}", url, err);
        }
    }
}

pub struct EffectRunner {
    engine: EngineHandle,
    store: PreferenceStore,
    navigator: Box<dyn Navigator>,
    closed: bool,
    focus_requested: bool,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, store: PreferenceStore, navigator: Box<dyn Navigator>) -> Self {
        Self {
            engine,
            store,
            navigator,
            closed: false,
            focus_requested: false,
        }
    }

    pub fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ScheduleFetch { request_id, delay } => {
                    self.engine.schedule_fetch(request_id, delay);
                }
                Effect::CancelScheduledFetch { request_id } => {
                    self.engine.cancel_fetch(request_id);
                }
                Effect::FetchSuggestions(tag) => {
                    seek_debug!("FetchSuggestions request_id={} endpoint={:?}", tag.request_id, tag.endpoint);
                    self.engine.fetch(tag);
                }
                Effect::Resolve { endpoint, term } => {
                    self.engine.resolve(endpoint, term);
                }
                Effect::PersistEndpoint(endpoint) => {
                    save_endpoint(&mut self.store, endpoint);
                }
                Effect::OpenUrl { url, disposition } => {
                    self.navigator.open(&url, disposition);
                }
                Effect::FocusInput => {
                    self.focus_requested = true;
                }
                Effect::ClosePopup => {
                    self.closed = true;
                }
            }
        }
    }

    /// Next engine result, translated into a core message.
    pub fn poll(&self) -> Option<Msg> {
        self.engine.try_recv().map(event_to_msg)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn take_focus_request(&mut self) -> bool {
        std::mem::replace(&mut self.focus_requested, false)
    }
}

fn event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::DebounceElapsed { request_id } => Msg::DebounceElapsed { request_id },
        EngineEvent::SuggestionsFetched { tag, result } => match result {
            Ok(suggestions) => Msg::SuggestionsLoaded { tag, suggestions },
            Err(err) => Msg::SuggestionsFailed {
                tag,
                reason: err.to_string(),
            },
        },
        EngineEvent::Resolved(resolution) => Msg::Resolved(resolution),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use wikiseek_core::{FetchTag, Resolution, WikiEndpoint, WikiSites};
    use wikiseek_engine::{load_endpoint, FailureKind, FetchError, WikiClient, FetchSettings};

    #[derive(Clone, Default)]
    struct Recorder {
        opened: Arc<Mutex<Vec<(String, Disposition)>>>,
    }

    impl Navigator for Recorder {
        fn open(&mut self, url: &str, disposition: Disposition) {
            self.opened.lock().unwrap().push((url.to_string(), disposition));
        }
    }

    fn runner(recorder: Recorder) -> EffectRunner {
        let client = WikiClient::new(FetchSettings::default()).unwrap();
        let engine = EngineHandle::new(client, WikiSites::default());
        EffectRunner::new(engine, PreferenceStore::in_memory(), Box::new(recorder))
    }

    #[test]
    fn navigation_effects_reach_navigator_and_close() {
        let recorder = Recorder::default();
        let mut runner = runner(recorder.clone());
        runner.run(vec![
            Effect::OpenUrl {
                url: "https://wiki/A".into(),
                disposition: Disposition::Background,
            },
            Effect::FocusInput,
        ]);
        assert!(!runner.is_closed());
        assert!(runner.take_focus_request());
        assert!(!runner.take_focus_request());

        runner.run(vec![
            Effect::OpenUrl {
                url: "https://wiki/B".into(),
                disposition: Disposition::Foreground,
            },
            Effect::ClosePopup,
        ]);
        assert!(runner.is_closed());
        assert_eq!(
            *recorder.opened.lock().unwrap(),
            vec![
                ("https://wiki/A".to_string(), Disposition::Background),
                ("https://wiki/B".to_string(), Disposition::Foreground),
            ]
        );
    }

    #[test]
    fn persist_effect_writes_preference() {
        let mut runner = runner(Recorder::default());
        runner.run(vec![Effect::PersistEndpoint(WikiEndpoint::Poe2)]);
        assert_eq!(load_endpoint(&runner.store), WikiEndpoint::Poe2);
    }

    #[test]
    fn engine_events_map_to_messages() {
        let tag = FetchTag {
            request_id: 9,
            query: "x".into(),
            endpoint: WikiEndpoint::Poe1,
        };
        let failed = event_to_msg(EngineEvent::SuggestionsFetched {
            tag: tag.clone(),
            result: Err(FetchError {
                kind: FailureKind::HttpStatus(502),
                message: "502 Bad Gateway".into(),
            }),
        });
        assert_eq!(
            failed,
            Msg::SuggestionsFailed {
                tag,
                reason: "http status 502: 502 Bad Gateway".into(),
            }
        );
        assert_eq!(
            event_to_msg(EngineEvent::Resolved(Resolution::Direct("u".into()))),
            Msg::Resolved(Resolution::Direct("u".into()))
        );
    }
}
