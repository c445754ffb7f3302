//! Intermediate stops of a route
//!
//! The stop list is ordered: the order of stops is the order of the route's
//! legs. A stop may exist without a position while the user has not picked
//! or geocoded it yet; such stops are skipped when building a route.

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::{GeoPoint, StopId};

/// A named point on the route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedStop {
    /// Unique identifier within its list
    pub id: StopId,
    /// Position, absent until picked or geocoded
    pub position: Option<GeoPoint>,
    /// Display label
    pub label: String,
}

impl NamedStop {
    /// Create a stop that has no position yet
    #[must_use]
    pub const fn empty(id: StopId) -> Self {
        Self {
            id,
            position: None,
            label: String::new(),
        }
    }

    /// Whether the stop has a position
    #[must_use]
    pub const fn is_placed(&self) -> bool {
        self.position.is_some()
    }
}

/// Ordered list of intermediate stops
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopList {
    stops: Vec<NamedStop>,
}

impl Default for StopList {
    /// A list holding a single empty stop, ready to be filled in
    fn default() -> Self {
        Self {
            stops: vec![NamedStop::empty(StopId::new(1))],
        }
    }
}

impl StopList {
    /// Create a list with no stops
    #[must_use]
    pub const fn empty() -> Self {
        Self { stops: Vec::new() }
    }

    /// Number of stops, placed or not
    #[must_use]
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Whether the list has no stops
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Stop at `index`
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&NamedStop> {
        self.stops.get(index)
    }

    /// Stop with the given identifier
    #[must_use]
    pub fn find(&self, id: StopId) -> Option<&NamedStop> {
        self.stops.iter().find(|s| s.id == id)
    }

    /// Iterate over stops in route order
    pub fn iter(&self) -> impl Iterator<Item = &NamedStop> {
        self.stops.iter()
    }

    /// Append an empty stop and return its identifier
    pub fn add(&mut self) -> StopId {
        let id = self
            .stops
            .iter()
            .map(|s| s.id)
            .max()
            .map_or(StopId::new(1), |max| max.next());
        self.stops.push(NamedStop::empty(id));
        id
    }

    /// Remove the stop with the given identifier
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown identifier and `NotPermitted` when
    /// the stop is the only one left.
    pub fn remove(&mut self, id: StopId) -> Result<NamedStop, DomainError> {
        let index = self
            .stops
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| DomainError::not_found("Stop", id.to_string()))?;
        if self.stops.len() <= 1 {
            return Err(DomainError::NotPermitted(
                "the last stop cannot be removed".to_string(),
            ));
        }
        Ok(self.stops.remove(index))
    }

    /// Swap the stop at `index` with its predecessor
    ///
    /// Returns `false` when there is nothing to swap with.
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.stops.len() {
            return false;
        }
        self.stops.swap(index - 1, index);
        true
    }

    /// Swap the stop at `index` with its successor
    ///
    /// Returns `false` when there is nothing to swap with.
    pub fn move_down(&mut self, index: usize) -> bool {
        let Some(next) = index.checked_add(1).filter(|n| *n < self.stops.len()) else {
            return false;
        };
        self.stops.swap(index, next);
        true
    }

    /// Set position and label of the stop at `index`
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when `index` is out of range.
    pub fn place_at(
        &mut self,
        index: usize,
        position: GeoPoint,
        label: impl Into<String>,
    ) -> Result<(), DomainError> {
        let stop = self
            .stops
            .get_mut(index)
            .ok_or_else(|| DomainError::not_found("Stop index", index.to_string()))?;
        stop.position = Some(position);
        stop.label = label.into();
        Ok(())
    }

    /// Set the position of a stop, replacing the label only when one is given
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown identifier.
    pub fn place(
        &mut self,
        id: StopId,
        position: GeoPoint,
        label: Option<String>,
    ) -> Result<(), DomainError> {
        let stop = self
            .stops
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| DomainError::not_found("Stop", id.to_string()))?;
        stop.position = Some(position);
        if let Some(label) = label {
            stop.label = label;
        }
        Ok(())
    }

    /// First stop that has no position yet
    #[must_use]
    pub fn first_unplaced(&self) -> Option<StopId> {
        self.stops.iter().find(|s| !s.is_placed()).map(|s| s.id)
    }

    /// Positions of placed stops, in route order
    #[must_use]
    pub fn waypoints(&self) -> Vec<GeoPoint> {
        self.stops.iter().filter_map(|s| s.position).collect()
    }
}
