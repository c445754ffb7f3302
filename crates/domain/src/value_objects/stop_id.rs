//! Stop identifier value object

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a stop in the planner's stop list
///
/// Unique within one stop list; new stops get the current maximum plus one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StopId(u32);

impl StopId {
    /// Wrap a raw identifier
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// The raw identifier
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }

    /// The identifier that follows this one
    #[must_use]
    pub const fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for StopId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}
