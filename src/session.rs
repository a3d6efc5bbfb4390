//! Query submission state machine.
//!
//! A session moves between `Idle`, `Loading`, `Success` and `Error`. Only one
//! request may be in flight: submissions while loading are ignored, and each
//! settled request replaces the previous payload wholesale.

use crate::api::ApiError;
use std::future::Future;
use tracing::debug;

/// Current state of a query workflow.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
    Idle,
    Loading { query: String },
    Success(T),
    Error(String),
}

impl<T> QueryState<T> {
    /// Returns true while a request is outstanding.
    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading { .. })
    }

    /// Returns the payload of a successful query.
    pub fn payload(&self) -> Option<&T> {
        match self {
            QueryState::Success(payload) => Some(payload),
            _ => None,
        }
    }

    /// Returns the error message of a failed query.
    pub fn error(&self) -> Option<&str> {
        match self {
            QueryState::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Short name of the state, for logging.
    pub fn label(&self) -> &'static str {
        match self {
            QueryState::Idle => "idle",
            QueryState::Loading { .. } => "loading",
            QueryState::Success(_) => "success",
            QueryState::Error(_) => "error",
        }
    }
}

/// Handle for an in-flight request, issued by [`QuerySession::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Drives one query workflow (product comparison or brand search).
#[derive(Debug)]
pub struct QuerySession<T> {
    state: QueryState<T>,
    generation: u64,
}

impl<T> QuerySession<T> {
    /// Creates an idle session.
    pub fn new() -> Self {
        Self { state: QueryState::Idle, generation: 0 }
    }

    /// Returns the current state.
    pub fn state(&self) -> &QueryState<T> {
        &self.state
    }

    /// Moves into `Loading`, or returns None if a request is already in flight.
    pub fn begin(&mut self, query: impl Into<String>) -> Option<Ticket> {
        let query = query.into();

        if self.state.is_loading() {
            debug!("Ignoring submission of {:?} while loading", query);
            return None;
        }

        debug!("{} -> loading ({:?})", self.state.label(), query);
        self.generation += 1;
        self.state = QueryState::Loading { query };
        Some(Ticket(self.generation))
    }

    /// Applies the outcome of the request identified by `ticket`.
    ///
    /// Returns false if the ticket is stale (the session was reset since).
    pub fn settle(&mut self, ticket: Ticket, outcome: Result<T, ApiError>) -> bool {
        if ticket.0 != self.generation || !self.state.is_loading() {
            debug!("Discarding stale result for ticket {}", ticket.0);
            return false;
        }

        self.state = match outcome {
            Ok(payload) => QueryState::Success(payload),
            Err(e) => QueryState::Error(e.to_string()),
        };
        debug!("loading -> {}", self.state.label());

        true
    }

    /// Returns to `Idle`; any outstanding ticket becomes stale.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = QueryState::Idle;
    }

    /// Submits a query: one `fetch` call, then settle.
    ///
    /// Returns false without calling `fetch` if a request is already in flight.
    pub async fn submit<F, Fut>(&mut self, query: &str, fetch: F) -> bool
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let Some(ticket) = self.begin(query) else {
            return false;
        };

        let outcome = fetch(query.to_string()).await;
        self.settle(ticket, outcome)
    }
}

impl<T> Default for QuerySession<T> {
    fn default() -> Self {
        Self::new()
    }
}
