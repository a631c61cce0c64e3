//! Course request model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a course within one generation session.
///
/// Preference maps are keyed by this type rather than by stringified ids;
/// string keys at the serialization boundary are converted on ingest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CourseId(pub u64);

impl From<u64> for CourseId {
    fn from(id: u64) -> Self {
        CourseId(id)
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A course the caller wants exactly one section of.
///
/// Immutable input, owned by the caller for the duration of one
/// generation session. The credit weight amplifies the course's
/// contribution to candidate scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRequest {
    /// Unique course identifier.
    pub id: CourseId,
    /// Human-readable course code (used in warnings).
    pub code: String,
    /// Credit weight; must be positive.
    pub credits: u32,
}

impl CourseRequest {
    /// Creates a course request with a credit weight of 1.
    pub fn new(id: impl Into<CourseId>, code: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
            credits: 1,
        }
    }

    /// Sets the credit weight.
    pub fn with_credits(mut self, credits: u32) -> Self {
        self.credits = credits;
        self
    }
}
