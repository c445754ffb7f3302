//! Debounced place search
//!
//! A depth-one replacement queue: each new query bumps a generation counter,
//! waits out the debounce delay and only proceeds while it is still the
//! newest query. The counter is checked again when the lookup completes, so
//! results of superseded lookups are discarded even if they arrive late.

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use domain::PlaceCandidate;
use parking_lot::Mutex;
use tracing::debug;

use crate::ports::GeocodingPort;

/// Delay between the last keystroke and the lookup
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(350);

/// Queries shorter than this never reach the geocoder
pub const DEFAULT_MIN_QUERY_CHARS: usize = 2;

/// Result of one debounced search
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// A newer query replaced this one
    Superseded,
    /// The query was too short; suggestions were cleared
    TooShort,
    /// Settled suggestions, best first (may be empty)
    Suggestions(Vec<PlaceCandidate>),
}

/// Debounces free-text searches against a geocoder
pub struct SearchDebouncer {
    geocoder: Arc<dyn GeocodingPort>,
    delay: Duration,
    min_chars: usize,
    generation: AtomicU64,
    suggestions: Mutex<Vec<PlaceCandidate>>,
}

impl std::fmt::Debug for SearchDebouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchDebouncer")
            .field("delay", &self.delay)
            .field("min_chars", &self.min_chars)
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl SearchDebouncer {
    /// Create a debouncer with the default delay and minimum length
    pub fn new(geocoder: Arc<dyn GeocodingPort>) -> Self {
        Self::with_settings(geocoder, DEFAULT_SEARCH_DEBOUNCE, DEFAULT_MIN_QUERY_CHARS)
    }

    /// Create a debouncer with explicit settings
    pub fn with_settings(geocoder: Arc<dyn GeocodingPort>, delay: Duration, min_chars: usize) -> Self {
        Self {
            geocoder,
            delay,
            min_chars,
            generation: AtomicU64::new(0),
            suggestions: Mutex::new(Vec::new()),
        }
    }

    /// Search after the debounce delay unless a newer query arrives first
    pub async fn search(&self, query: &str) -> SearchOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let query = query.trim();

        if query.chars().count() < self.min_chars {
            self.suggestions.lock().clear();
            return SearchOutcome::TooShort;
        }

        tokio::time::sleep(self.delay).await;
        if !self.is_current(generation) {
            debug!(%query, "Search superseded before lookup");
            return SearchOutcome::Superseded;
        }

        let places = self.geocoder.search_by_text(query).await;
        if !self.is_current(generation) {
            debug!(%query, "Search superseded during lookup");
            return SearchOutcome::Superseded;
        }

        debug!(%query, count = places.len(), "Search settled");
        self.suggestions.lock().clone_from(&places);
        SearchOutcome::Suggestions(places)
    }

    /// Discard any pending search
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Suggestions of the latest settled search
    pub fn suggestions(&self) -> Vec<PlaceCandidate> {
        self.suggestions.lock().clone()
    }

    /// Best suggestion of the latest settled search (what "Enter" picks)
    pub fn first_suggestion(&self) -> Option<PlaceCandidate> {
        self.suggestions.lock().first().cloned()
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }
}
