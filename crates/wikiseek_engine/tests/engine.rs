use std::sync::{Arc, Mutex};
use std::time::Duration;

use wikiseek_core::{FetchTag, Resolution, Suggestion, WikiEndpoint, WikiSite, WikiSites};
use wikiseek_engine::{
    EngineEvent, EngineHandle, FailureKind, FetchError, PageLookup, SuggestionSource,
};

const WAIT: Duration = Duration::from_secs(2);

#[derive(Default)]
struct FakeWiki {
    queries: Mutex<Vec<(WikiEndpoint, String)>>,
}

#[async_trait::async_trait]
impl SuggestionSource for FakeWiki {
    async fn suggest(&self, site: &WikiSite, query: &str) -> Result<Vec<Suggestion>, FetchError> {
        self.queries
            .lock()
            .unwrap()
            .push((site.endpoint(), query.to_string()));
        if query == "fail" {
            return Err(FetchError {
                kind: FailureKind::Network,
                message: "offline".into(),
            });
        }
        Ok(vec![Suggestion::new(query, format!("https://wiki/{query}"))])
    }
}

#[async_trait::async_trait]
impl PageLookup for FakeWiki {
    async fn lookup(&self, _site: &WikiSite, title: &str) -> Result<Option<String>, FetchError> {
        Ok((title == "Known").then(|| "https://wiki/Known".to_string()))
    }
}

fn engine() -> (EngineHandle, Arc<FakeWiki>) {
    wikiseek_logging::initialize_for_tests();
    let fake = Arc::new(FakeWiki::default());
    let handle = EngineHandle::with_backend(fake.clone(), fake.clone(), WikiSites::default());
    (handle, fake)
}

#[test]
fn scheduled_timer_reports_elapsed() {
    let (engine, _) = engine();
    engine.schedule_fetch(7, Duration::from_millis(20));
    assert_eq!(
        engine.recv_timeout(WAIT),
        Some(EngineEvent::DebounceElapsed { request_id: 7 })
    );
}

#[test]
fn cancelled_timer_stays_silent() {
    let (engine, _) = engine();
    engine.schedule_fetch(1, Duration::from_millis(150));
    engine.cancel_fetch(1);
    engine.schedule_fetch(2, Duration::from_millis(30));

    assert_eq!(
        engine.recv_timeout(WAIT),
        Some(EngineEvent::DebounceElapsed { request_id: 2 })
    );
    assert_eq!(engine.recv_timeout(Duration::from_millis(300)), None);
}

#[test]
fn fetch_reports_tagged_result() {
    let (engine, fake) = engine();
    let tag = FetchTag {
        request_id: 3,
        query: "Flame".into(),
        endpoint: WikiEndpoint::Poe2,
    };
    engine.fetch(tag.clone());

    match engine.recv_timeout(WAIT) {
        Some(EngineEvent::SuggestionsFetched { tag: got, result }) => {
            assert_eq!(got, tag);
            assert_eq!(result.unwrap()[0].title, "Flame");
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(
        *fake.queries.lock().unwrap(),
        vec![(WikiEndpoint::Poe2, "Flame".to_string())]
    );
}

#[test]
fn fetch_failure_is_delivered_as_error() {
    let (engine, _) = engine();
    engine.fetch(FetchTag {
        request_id: 4,
        query: "fail".into(),
        endpoint: WikiEndpoint::Poe1,
    });
    match engine.recv_timeout(WAIT) {
        Some(EngineEvent::SuggestionsFetched { result, .. }) => {
            assert_eq!(result.unwrap_err().kind, FailureKind::Network);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn resolve_reports_resolution() {
    let (engine, _) = engine();
    engine.resolve(WikiEndpoint::Poe1, "Known");
    assert_eq!(
        engine.recv_timeout(WAIT),
        Some(EngineEvent::Resolved(Resolution::Direct(
            "https://wiki/Known".into()
        )))
    );

    engine.resolve(WikiEndpoint::Poe1, "Unknown");
    match engine.recv_timeout(WAIT) {
        Some(EngineEvent::Resolved(Resolution::FullTextSearch(url))) => {
            assert!(url.starts_with("https://www.poewiki.net/index.php?search=Unknown"));
        }
        other => panic!("unexpected {other:?}"),
    }
}
