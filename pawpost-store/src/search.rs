use crate::{backend::SearchBackend, error::StoreError, list::LoadStatus};
use pawpost_common::model::search::{SearchKind, SearchQuery, SearchResults};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

/// Results shown for a search; at most one page per category.
pub const SEARCH_LIMIT: u32 = 20;

#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct SearchSnapshot {
    pub query: String,
    pub kind: SearchKind,
    pub results: SearchResults,
    pub status: LoadStatus,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
struct SearchState {
    /// Bumped for every search so only the latest response lands.
    generation: u64,
    snapshot: SearchSnapshot,
}

/// Search over users, pets and posts.
#[derive(Debug)]
pub struct SearchStore<B> {
    backend: B,
    state: Mutex<SearchState>,
}

impl<B: SearchBackend> SearchStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: Mutex::new(SearchState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, SearchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn snapshot(&self) -> SearchSnapshot {
        self.state().snapshot.clone()
    }

    /// Runs a search. A blank query clears the results without asking the
    /// backend. Failures are recorded in the snapshot.
    pub async fn search(&self, query: &str, kind: SearchKind) {
        let query = query.trim();
        let generation = {
            let mut state = self.state();
            state.generation += 1;
            state.snapshot.query = query.to_owned();
            state.snapshot.kind = kind;
            state.snapshot.error = None;
            if query.is_empty() {
                state.snapshot.results = SearchResults::default();
                state.snapshot.status = LoadStatus::Idle;
                return;
            }
            state.snapshot.status = LoadStatus::Loading;
            state.generation
        };
        debug!(query, %kind, "Searching");

        let request = SearchQuery {
            query: query.to_owned(),
            kind: Some(kind),
            page: 1,
            limit: SEARCH_LIMIT,
        };
        let result = self.backend.search(&request).await;

        let mut state = self.state();
        if state.generation != generation {
            debug!(query, "Dropping superseded search results");
            return;
        }
        match result {
            Ok(results) => {
                state.snapshot.results = results;
                state.snapshot.status = LoadStatus::Loaded;
            }
            Err(err) => {
                let err = StoreError::Fetch(err);
                warn!(query, error = %err, "Search failed");
                state.snapshot.status = LoadStatus::Errored;
                state.snapshot.error = Some(err.to_string());
            }
        }
    }

    pub fn clear(&self) {
        let mut state = self.state();
        state.generation += 1;
        state.snapshot = SearchSnapshot::default();
    }
}
