//! Paginated fetch controller: owns the visible page and the loading/error
//! flags, and publishes a snapshot after every state transition.
//!
//! Overlapping loads are not serialized beyond the `is_loading` guard on
//! `load_next`/`load_previous`. `load_first` has no guard, so when it overlaps
//! another fetch the fetch that completes last decides the final state.

use std::sync::Arc;

use shared::{
    domain::{PageLinks, Record},
    error::FetchError,
    mapping::map_envelope,
    protocol::RawEnvelope,
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};
use url::Url;

use crate::gateway::FetchGateway;

pub const INITIAL_LOAD_FAILED_MESSAGE: &str = "There seems to be a problem on providers side.";
pub const PAGINATION_FAILED_MESSAGE: &str = "Oups, it looks there is some issue..";

const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    First,
    Next,
    Previous,
}

impl LoadKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Next => "next",
            Self::Previous => "previous",
        }
    }

    pub fn failure_message(self) -> &'static str {
        match self {
            Self::First => INITIAL_LOAD_FAILED_MESSAGE,
            Self::Next | Self::Previous => PAGINATION_FAILED_MESSAGE,
        }
    }
}

/// Read-only view of the controller state handed to the display layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControllerSnapshot {
    pub records: Vec<Record>,
    pub links: Option<PageLinks>,
    pub total_count: Option<u64>,
    pub total_pages: Option<u64>,
    pub is_loading: bool,
    pub error_message: Option<String>,
}

impl ControllerSnapshot {
    pub fn has_next(&self) -> bool {
        self.links.as_ref().is_some_and(PageLinks::has_next)
    }

    pub fn has_previous(&self) -> bool {
        self.links.as_ref().is_some_and(PageLinks::has_previous)
    }
}

#[derive(Debug, Clone)]
pub enum ControllerEvent {
    StateChanged(ControllerSnapshot),
    LoadFailed { kind: LoadKind, error: FetchError },
}

#[derive(Default)]
struct ControllerState {
    records: Vec<Record>,
    links: Option<PageLinks>,
    total_count: Option<u64>,
    total_pages: Option<u64>,
    is_loading: bool,
    error_message: Option<String>,
    last_error: Option<FetchError>,
    failed_load: Option<LoadKind>,
}

impl ControllerState {
    fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot {
            records: self.records.clone(),
            links: self.links.clone(),
            total_count: self.total_count,
            total_pages: self.total_pages,
            is_loading: self.is_loading,
            error_message: self.error_message.clone(),
        }
    }

    fn adjacent_link(&self, kind: LoadKind) -> Option<Url> {
        let links = self.links.as_ref()?;
        match kind {
            LoadKind::First => None,
            LoadKind::Next => links.next.clone(),
            LoadKind::Previous => links.previous.clone(),
        }
    }

    fn begin(&mut self) {
        self.is_loading = true;
        self.error_message = None;
        self.last_error = None;
        self.failed_load = None;
    }

    fn apply_page(&mut self, raw: RawEnvelope) {
        let envelope = map_envelope(raw);
        self.records = envelope.records;
        self.links = Some(envelope.links);
        self.total_count = envelope.total_count;
        self.total_pages = envelope.total_pages;
        self.is_loading = false;
    }

    fn apply_failure(&mut self, kind: LoadKind, error: FetchError) {
        self.error_message = Some(kind.failure_message().to_string());
        self.last_error = Some(error);
        self.failed_load = Some(kind);
        self.is_loading = false;
    }
}

pub struct PaginationController {
    gateway: Arc<dyn FetchGateway>,
    inner: Mutex<ControllerState>,
    events: broadcast::Sender<ControllerEvent>,
}

impl PaginationController {
    pub fn new(gateway: Arc<dyn FetchGateway>) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            gateway,
            inner: Mutex::new(ControllerState::default()),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> ControllerSnapshot {
        self.inner.lock().await.snapshot()
    }

    /// The error behind the current `error_message`, if any.
    pub async fn last_error(&self) -> Option<FetchError> {
        self.inner.lock().await.last_error.clone()
    }

    pub async fn load_first(&self) {
        {
            let mut guard = self.inner.lock().await;
            guard.begin();
            self.publish(&guard);
        }

        let result = self.gateway.fetch_first_page().await;
        self.finish(LoadKind::First, result).await;
    }

    pub async fn load_next(&self) {
        self.load_adjacent(LoadKind::Next).await;
    }

    pub async fn load_previous(&self) {
        self.load_adjacent(LoadKind::Previous).await;
    }

    /// Re-runs the load that produced the current error. No-op otherwise.
    pub async fn retry(&self) {
        let failed = self.inner.lock().await.failed_load;
        match failed {
            Some(LoadKind::First) => self.load_first().await,
            Some(kind) => self.load_adjacent(kind).await,
            None => debug!("retry requested without a failed load"),
        }
    }

    async fn load_adjacent(&self, kind: LoadKind) {
        let link = {
            let mut guard = self.inner.lock().await;
            if guard.is_loading {
                debug!(kind = kind.as_str(), "load skipped: fetch already in flight");
                return;
            }
            let Some(link) = guard.adjacent_link(kind) else {
                debug!(kind = kind.as_str(), "load skipped: no page link");
                return;
            };
            guard.begin();
            self.publish(&guard);
            link
        };

        let result = self.gateway.fetch_page(Some(&link)).await;
        self.finish(kind, result).await;
    }

    async fn finish(&self, kind: LoadKind, result: Result<RawEnvelope, FetchError>) {
        let mut guard = self.inner.lock().await;
        match result {
            Ok(raw) => {
                guard.apply_page(raw);
                info!(
                    kind = kind.as_str(),
                    records = guard.records.len(),
                    has_next = guard.links.as_ref().is_some_and(PageLinks::has_next),
                    has_previous = guard.links.as_ref().is_some_and(PageLinks::has_previous),
                    "page loaded"
                );
                self.publish(&guard);
            }
            Err(error) => {
                warn!(
                    kind = kind.as_str(),
                    status = error.status_code(),
                    "page load failed: {error}"
                );
                guard.apply_failure(kind, error.clone());
                self.publish(&guard);
                let _ = self.events.send(ControllerEvent::LoadFailed { kind, error });
            }
        }
    }

    fn publish(&self, state: &ControllerState) {
        let _ = self
            .events
            .send(ControllerEvent::StateChanged(state.snapshot()));
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
