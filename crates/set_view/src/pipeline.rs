//! Fetch-and-build pipeline owning the single "current result" slot.
//!
//! Every fetch carries a [`FetchTicket`]; a completion is applied only when
//! its ticket is still the one in flight, so a slow response for a superseded
//! identifier can never overwrite newer state. The transport offers no
//! cancellation, so stale responses are simply dropped on arrival.

use std::sync::Arc;

use ledger_client::{QueryError, SetQueryExecutor};
use shared::{domain::SetId, protocol::TopshotSetResult};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::{
    builder::{build_view, RowViewModel, SetView},
    error::ViewError,
};

const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Idle,
    /// `previous` is the last ready view, kept visible until the new fetch
    /// settles.
    Loading {
        set_id: SetId,
        previous: Option<Arc<SetView>>,
    },
    Error {
        set_id: SetId,
        error: ViewError,
    },
    Ready {
        set_id: SetId,
        view: Arc<SetView>,
    },
}

impl ViewState {
    pub fn set_id(&self) -> Option<SetId> {
        match self {
            Self::Idle => None,
            Self::Loading { set_id, .. } | Self::Error { set_id, .. } | Self::Ready { set_id, .. } => {
                Some(*set_id)
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    pub fn view(&self) -> Option<&SetView> {
        match self {
            Self::Ready { view, .. } => Some(view.as_ref()),
            _ => None,
        }
    }

    /// Rows are exposed only in the ready state.
    pub fn rows(&self) -> Option<&[RowViewModel]> {
        self.view().map(|view| view.rows.as_slice())
    }

    pub fn error(&self) -> Option<&ViewError> {
        match self {
            Self::Error { error, .. } => Some(error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    set_id: SetId,
}

impl FetchTicket {
    pub fn set_id(&self) -> SetId {
        self.set_id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    Loading { set_id: SetId },
    Ready { set_id: SetId, rows: usize },
    Failed { set_id: SetId, error: ViewError },
    Discarded { set_id: SetId },
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The fetch settled and its result is the committed state.
    Applied(ViewState),
    /// A fetch for the same identifier is already running.
    AlreadyInFlight,
    /// Another request took over while this one was running.
    Superseded,
}

struct PipelineSlot {
    generation: u64,
    in_flight: Option<FetchTicket>,
    state: ViewState,
}

pub struct SetViewPipeline {
    executor: Arc<dyn SetQueryExecutor>,
    slot: Mutex<PipelineSlot>,
    events: broadcast::Sender<ViewEvent>,
}

impl SetViewPipeline {
    pub fn new(executor: Arc<dyn SetQueryExecutor>) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            executor,
            slot: Mutex::new(PipelineSlot {
                generation: 0,
                in_flight: None,
                state: ViewState::Idle,
            }),
            events,
        })
    }

    pub async fn state(&self) -> ViewState {
        self.slot.lock().await.state.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ViewEvent> {
        self.events.subscribe()
    }

    /// Fetches `set_id` and commits the result unless a newer request has
    /// taken over in the meantime.
    pub async fn load(&self, set_id: SetId) -> LoadOutcome {
        let Some(ticket) = self.begin(set_id).await else {
            return LoadOutcome::AlreadyInFlight;
        };

        let result = self.executor.fetch_set(set_id).await;
        match self.complete(ticket, result).await {
            Some(state) => LoadOutcome::Applied(state),
            None => LoadOutcome::Superseded,
        }
    }

    /// Re-issues the fetch for the current identifier. `None` when idle.
    pub async fn refetch(&self) -> Option<LoadOutcome> {
        let set_id = self.slot.lock().await.state.set_id()?;
        Some(self.load(set_id).await)
    }

    /// Moves to `Loading` for `set_id` and hands out the ticket the
    /// completion must present. `None` if that identifier is already in
    /// flight.
    pub async fn begin(&self, set_id: SetId) -> Option<FetchTicket> {
        let mut slot = self.slot.lock().await;
        if slot.in_flight.is_some_and(|ticket| ticket.set_id == set_id) {
            debug!(set_id = set_id.0, "fetch already in flight");
            return None;
        }

        slot.generation += 1;
        let ticket = FetchTicket {
            generation: slot.generation,
            set_id,
        };
        let previous = match &slot.state {
            ViewState::Ready { view, .. } => Some(view.clone()),
            ViewState::Loading { previous, .. } => previous.clone(),
            ViewState::Idle | ViewState::Error { .. } => None,
        };
        if let Some(superseded) = slot.in_flight.replace(ticket) {
            debug!(
                set_id = superseded.set_id.0,
                next = set_id.0,
                "in-flight fetch superseded"
            );
        }
        slot.state = ViewState::Loading { set_id, previous };
        info!(set_id = set_id.0, "loading set");
        let _ = self.events.send(ViewEvent::Loading { set_id });
        Some(ticket)
    }

    /// Applies the outcome of the fetch identified by `ticket`. Returns the
    /// committed state, or `None` when the ticket is stale and the result was
    /// dropped.
    pub async fn complete(
        &self,
        ticket: FetchTicket,
        result: Result<TopshotSetResult, QueryError>,
    ) -> Option<ViewState> {
        let built = result
            .map_err(ViewError::from)
            .and_then(|fetched| build_view(&fetched));

        let mut slot = self.slot.lock().await;
        if slot.in_flight != Some(ticket) {
            debug!(set_id = ticket.set_id.0, "discarding stale fetch result");
            let _ = self.events.send(ViewEvent::Discarded {
                set_id: ticket.set_id,
            });
            return None;
        }
        slot.in_flight = None;

        let set_id = ticket.set_id;
        slot.state = match built {
            Ok(view) => {
                info!(set_id = set_id.0, rows = view.rows.len(), "set ready");
                let _ = self.events.send(ViewEvent::Ready {
                    set_id,
                    rows: view.rows.len(),
                });
                ViewState::Ready {
                    set_id,
                    view: Arc::new(view),
                }
            }
            Err(error) => {
                warn!(
                    set_id = set_id.0,
                    category = ?error.category(),
                    error = %error,
                    "could not fetch set"
                );
                let _ = self.events.send(ViewEvent::Failed {
                    set_id,
                    error: error.clone(),
                });
                ViewState::Error { set_id, error }
            }
        };
        Some(slot.state.clone())
    }

    /// Drops the current result and invalidates any fetch still running.
    pub async fn clear(&self) {
        let mut slot = self.slot.lock().await;
        slot.generation += 1;
        slot.in_flight = None;
        slot.state = ViewState::Idle;
    }
}

#[cfg(test)]
#[path = "tests/pipeline_tests.rs"]
mod tests;
