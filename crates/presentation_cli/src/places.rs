//! Turning command line place arguments into positions

use std::{sync::Arc, time::Duration};

use anyhow::{Result, bail};
use application::{GeocodingPort, SearchDebouncer, SearchOutcome};
use domain::GeoPoint;
use tracing::debug;

/// A place argument resolved to a position and a label
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPlace {
    /// Where the place is
    pub position: GeoPoint,
    /// What to call it
    pub label: String,
}

/// Resolves `lat,lon` pairs and free-text place names
pub struct PlaceResolver {
    geocoder: Arc<dyn GeocodingPort>,
    search: SearchDebouncer,
}

impl std::fmt::Debug for PlaceResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaceResolver").finish_non_exhaustive()
    }
}

impl PlaceResolver {
    /// Create a resolver; arguments are typed in full, so there is no debounce
    pub fn new(geocoder: Arc<dyn GeocodingPort>, min_query_chars: usize) -> Self {
        let search =
            SearchDebouncer::with_settings(geocoder.clone(), Duration::ZERO, min_query_chars);
        Self { geocoder, search }
    }

    /// Resolve one argument
    ///
    /// Coordinates are named by reverse lookup and keep their decimal form
    /// when no name is found; text picks the best search suggestion.
    pub async fn resolve(&self, input: &str) -> Result<ResolvedPlace> {
        if let Ok(position) = input.parse::<GeoPoint>() {
            let label = self
                .geocoder
                .reverse_lookup(position)
                .await
                .unwrap_or_else(|| position.to_string());
            debug!(%position, %label, "Resolved coordinates");
            return Ok(ResolvedPlace { position, label });
        }

        match self.search.search(input).await {
            SearchOutcome::TooShort => bail!("'{input}' is too short to search for"),
            SearchOutcome::Superseded => bail!("search for '{input}' was cancelled"),
            SearchOutcome::Suggestions(_) => {},
        }

        let Some(best) = self.search.first_suggestion() else {
            bail!("no place found for '{input}'");
        };
        debug!(%input, place = %best.display_name, "Resolved place name");
        Ok(ResolvedPlace {
            position: best.position,
            label: best.display_name,
        })
    }
}
