// Document cache and fetch coordinator.
// Read-through caching, single-flight fetches, and write-through invalidation.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{Notify, OnceCell};
use tracing::{debug, error, info, warn};

use crate::error::{FolioError, Result};
use crate::model::Document;

use super::transport::Transport;

/// What `read` hands back when the transport fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadErrorPolicy {
    /// Log the failure and return an empty document.
    #[default]
    Empty,
    /// Return the failure to the caller.
    Fail,
}

impl fmt::Display for ReadErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadErrorPolicy::Empty => f.write_str("empty"),
            ReadErrorPolicy::Fail => f.write_str("fail"),
        }
    }
}

impl FromStr for ReadErrorPolicy {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "empty" => Ok(ReadErrorPolicy::Empty),
            "fail" | "throw" => Ok(ReadErrorPolicy::Fail),
            _ => Err(FolioError::InvalidConfig {
                key: "FOLIO_READ_ERROR",
                value: s.to_string(),
            }),
        }
    }
}

/// Shared outcome of one fetch. Errors are kept as text so every joined
/// caller can receive a copy.
type ReadOutcome = std::result::Result<Arc<Document>, String>;

/// A fetch in progress that later callers join instead of starting their own.
struct InFlight {
    outcome: OnceCell<ReadOutcome>,
    notify: Notify,
}

impl InFlight {
    fn new() -> Self {
        Self {
            outcome: OnceCell::new(),
            notify: Notify::new(),
        }
    }

    fn finish(&self, outcome: ReadOutcome) {
        // Only the leader sets the outcome, once.
        let _ = self.outcome.set(outcome);
        self.notify.notify_waiters();
    }

    async fn wait(&self) -> ReadOutcome {
        loop {
            // Register before checking so a finish in between is not missed
            let notified = self.notify.notified();
            if let Some(outcome) = self.outcome.get() {
                return outcome.clone();
            }
            notified.await;
        }
    }
}

#[derive(Default)]
struct CacheState {
    cached: Option<Arc<Document>>,
    pending: Option<Arc<InFlight>>,
    /// Bumped by every write and invalidation. A fetch that started under an
    /// older generation must not populate the cache.
    generation: u64,
}

impl CacheState {
    fn clear_pending(&mut self, flight: &Arc<InFlight>) {
        if self
            .pending
            .as_ref()
            .is_some_and(|pending| Arc::ptr_eq(pending, flight))
        {
            self.pending = None;
        }
    }
}

fn lock_state(state: &Mutex<CacheState>) -> MutexGuard<'_, CacheState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Held by the leader across the transport call. If the leader is dropped
/// before finishing, joined callers get a failure and the next read starts
/// a new fetch.
struct FetchGuard<'a> {
    state: &'a Mutex<CacheState>,
    flight: &'a Arc<InFlight>,
    armed: bool,
}

impl FetchGuard<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        lock_state(self.state).clear_pending(self.flight);
        warn!("document fetch cancelled before completing");
        self.flight.finish(Err("document fetch cancelled".to_string()));
    }
}

enum ReadRole {
    Hit(Arc<Document>),
    Leader(Arc<InFlight>, u64),
    Follower(Arc<InFlight>),
}

/// Sole gateway to the stored document.
///
/// Holds the last known document in memory, collapses concurrent fetches
/// into one transport call, and keeps the cache in step with writes. Writes
/// always replace the whole document; concurrent writers race and the last
/// one to finish wins.
///
/// There is no timeout of its own. If the caller leading a fetch is dropped
/// mid-flight, callers that joined it receive a failed read (subject to the
/// read error policy) and nothing is cached.
pub struct DocumentStore<T> {
    transport: T,
    policy: ReadErrorPolicy,
    state: Mutex<CacheState>,
}

impl<T: Transport> DocumentStore<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            policy: ReadErrorPolicy::default(),
            state: Mutex::new(CacheState::default()),
        }
    }

    pub fn with_policy(mut self, policy: ReadErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn policy(&self) -> ReadErrorPolicy {
        self.policy
    }

    fn state(&self) -> MutexGuard<'_, CacheState> {
        lock_state(&self.state)
    }

    /// Current document. Served from memory once loaded; concurrent callers
    /// during a load share a single fetch.
    pub async fn read(&self) -> Result<Arc<Document>> {
        match self.load().await {
            Ok(document) => Ok(document),
            Err(message) => match self.policy {
                ReadErrorPolicy::Empty => Ok(Arc::new(Document::empty())),
                ReadErrorPolicy::Fail => Err(FolioError::ReadFailed(message)),
            },
        }
    }

    /// Document to base a read-modify-write on. A failed fetch is an error
    /// whatever the policy, so a mutation never writes back on top of the
    /// empty fallback.
    pub(crate) async fn read_for_update(&self) -> Result<Arc<Document>> {
        self.load().await.map_err(FolioError::ReadFailed)
    }

    async fn load(&self) -> ReadOutcome {
        let role = {
            let mut state = self.state();
            if let Some(document) = &state.cached {
                ReadRole::Hit(Arc::clone(document))
            } else if let Some(pending) = &state.pending {
                ReadRole::Follower(Arc::clone(pending))
            } else {
                let flight = Arc::new(InFlight::new());
                state.pending = Some(Arc::clone(&flight));
                ReadRole::Leader(flight, state.generation)
            }
        };

        match role {
            ReadRole::Hit(document) => Ok(document),
            ReadRole::Leader(flight, generation) => self.lead_fetch(&flight, generation).await,
            ReadRole::Follower(flight) => {
                debug!("joining in-flight document fetch");
                flight.wait().await
            }
        }
    }

    async fn lead_fetch(&self, flight: &Arc<InFlight>, generation: u64) -> ReadOutcome {
        let guard = FetchGuard {
            state: &self.state,
            flight,
            armed: true,
        };

        info!("fetching document from store");
        let fetched = self.transport.fetch().await;

        let outcome = {
            let mut state = self.state();
            let outcome = match fetched {
                Ok(document) => {
                    let document = Arc::new(document);
                    if state.generation == generation {
                        state.cached = Some(Arc::clone(&document));
                        info!(
                            works = document.works.len(),
                            gallery = document.gallery.len(),
                            "document loaded and cached"
                        );
                    } else {
                        debug!("document changed during fetch, keeping newer cache state");
                    }
                    Ok(document)
                }
                Err(e) => {
                    warn!(error = %e, policy = %self.policy, "could not fetch document");
                    Err(e.to_string())
                }
            };
            state.clear_pending(flight);
            outcome
        };

        guard.disarm();
        flight.finish(outcome.clone());
        outcome
    }

    /// Replace the stored document. On success the cache holds `document`
    /// before this returns; on failure the cache is dropped so the next
    /// read goes back to the store.
    pub async fn write(&self, document: Document) -> Result<()> {
        info!(
            works = document.works.len(),
            gallery = document.gallery.len(),
            "writing document to store"
        );

        match self.transport.store(&document).await {
            Ok(()) => {
                let mut state = self.state();
                state.cached = Some(Arc::new(document));
                state.generation += 1;
                Ok(())
            }
            Err(e) => {
                {
                    let mut state = self.state();
                    state.cached = None;
                    state.generation += 1;
                }
                error!(error = %e, "could not write document, cache invalidated");
                Err(e)
            }
        }
    }

    /// Forget the cached document.
    pub fn invalidate(&self) {
        let mut state = self.state();
        state.cached = None;
        state.generation += 1;
    }

    /// Cached document, if loaded. Never touches the transport.
    pub fn cached(&self) -> Option<Arc<Document>> {
        self.state().cached.clone()
    }

    /// Whether a fetch is currently in flight.
    pub fn is_loading(&self) -> bool {
        self.state().pending.is_some()
    }
}
