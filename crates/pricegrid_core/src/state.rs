use std::time::Duration;

use pricegrid_logging::{grid_debug, grid_info};

use crate::model::{Comparison, Metadata, Offer, PlatformBucket, SearchFailure, SearchOutcome};
use crate::view_model::AppViewModel;

/// Monotonic tag attached to every dispatched search.
pub type Generation = u64;

pub const VALIDATION_MESSAGE: &str = "Describe what you want to compare.";
pub const DECLINED_FALLBACK_MESSAGE: &str = "Search failed. Try again.";
pub const CONNECTIVITY_MESSAGE: &str = "Backend not responding.";

/// Shortcuts offered next to the input box.
pub const SAMPLE_QUERIES: &[&str] = &[
    "macbook air m2",
    "iphone 15 128gb",
    "sony wh-1000xm5",
    "samsung galaxy s24",
];

pub fn no_results_message(query: &str) -> String {
    format!("No results found for \"{query}\"")
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchPhase {
    #[default]
    Idle,
    Searching {
        generation: Generation,
        query: String,
    },
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Empty query; never reaches the network.
    Validation,
    /// Server declined the search or returned nothing.
    Domain,
    /// Request could not complete.
    Connectivity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNotice {
    pub kind: ErrorKind,
    pub message: String,
}

/// One generation of search results, replaced wholesale on every search.
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct SearchResults {
    pub(crate) query: String,
    pub(crate) offers: Vec<Offer>,
    pub(crate) comparison: Option<Comparison>,
    pub(crate) buckets: Vec<PlatformBucket>,
    pub(crate) metadata: Option<Metadata>,
    pub(crate) elapsed: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    input: String,
    generation: Generation,
    phase: SearchPhase,
    results: Option<SearchResults>,
    error: Option<ErrorNotice>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel::from_state(
            &self.input,
            &self.phase,
            self.results.as_ref(),
            self.error.as_ref(),
            self.dirty,
        )
    }

    pub fn phase(&self) -> &SearchPhase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, SearchPhase::Searching { .. })
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Returns true if the view changed since the previous call.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_input(&mut self, text: String) {
        if self.input != text {
            self.input = text;
            self.dirty = true;
        }
    }

    /// Moves to `Searching` for the trimmed input, or records a validation
    /// error and leaves prior results alone when the input is blank.
    pub(crate) fn begin_search(&mut self) -> Option<(Generation, String)> {
        let query = self.input.trim().to_string();
        self.dirty = true;
        if query.is_empty() {
            self.error = Some(ErrorNotice {
                kind: ErrorKind::Validation,
                message: VALIDATION_MESSAGE.to_string(),
            });
            return None;
        }

        self.generation += 1;
        self.results = None;
        self.error = None;
        self.phase = SearchPhase::Searching {
            generation: self.generation,
            query: query.clone(),
        };
        grid_info!("Search started generation={} query={:?}", self.generation, query);
        Some((self.generation, query))
    }

    /// Applies a settled search. Results for anything but the in-flight
    /// generation are dropped and `false` is returned.
    pub(crate) fn settle(
        &mut self,
        generation: Generation,
        query: String,
        result: Result<SearchOutcome, SearchFailure>,
    ) -> bool {
        let current = match &self.phase {
            SearchPhase::Searching { generation: current, .. } => Some(*current),
            _ => None,
        };
        if current != Some(generation) {
            grid_debug!(
                "Discarding stale result generation={} current={:?}",
                generation,
                current
            );
            return false;
        }

        self.dirty = true;
        match result {
            Ok(outcome) if outcome.response.products.is_empty() => {
                self.fail(ErrorKind::Domain, no_results_message(&query));
            }
            Ok(outcome) => {
                let response = outcome.response;
                grid_info!(
                    "Search succeeded generation={} offers={} elapsed_ms={}",
                    generation,
                    response.products.len(),
                    outcome.elapsed.as_millis()
                );
                self.results = Some(SearchResults {
                    query,
                    offers: response.products,
                    comparison: response.comparison,
                    buckets: response.platform_buckets,
                    metadata: response.metadata,
                    elapsed: Some(outcome.elapsed),
                });
                self.error = None;
                self.phase = SearchPhase::Succeeded;
            }
            Err(SearchFailure::Declined { message }) => {
                let message = message
                    .map(|text| text.trim().to_string())
                    .filter(|text| !text.is_empty())
                    .unwrap_or_else(|| DECLINED_FALLBACK_MESSAGE.to_string());
                self.fail(ErrorKind::Domain, message);
            }
            Err(SearchFailure::Unreachable) => {
                self.fail(ErrorKind::Connectivity, CONNECTIVITY_MESSAGE.to_string());
            }
        }
        true
    }

    fn fail(&mut self, kind: ErrorKind, message: String) {
        grid_info!("Search failed kind={:?} message={:?}", kind, message);
        self.results = None;
        self.error = Some(ErrorNotice { kind, message });
        self.phase = SearchPhase::Failed;
    }
}
