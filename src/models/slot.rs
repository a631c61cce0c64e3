//! Slot option model.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::CourseId;

/// Identifier of a slot option.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SlotId(pub u64);

impl From<u64> for SlotId {
    fn from(id: u64) -> Self {
        SlotId(id)
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One substitutable way to take a course.
///
/// Carries the meeting pattern as a compound code ("A11+A12" meets twice a
/// week), the teaching faculty, and a venue label. Immutable input; belongs
/// to exactly one [`CourseRequest`](super::CourseRequest).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotOption {
    /// Unique slot identifier.
    pub id: SlotId,
    /// Owning course.
    pub course_id: CourseId,
    /// Compound meeting-pattern code, atomic codes joined by `+` or `/`.
    pub code: String,
    /// Teaching faculty name, when known.
    #[serde(default)]
    pub faculty: Option<String>,
    /// Venue label ("CR-011").
    #[serde(default)]
    pub venue: String,
}

impl SlotOption {
    /// Creates a slot option with no faculty or venue.
    pub fn new(
        id: impl Into<SlotId>,
        course_id: impl Into<CourseId>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            course_id: course_id.into(),
            code: code.into(),
            faculty: None,
            venue: String::new(),
        }
    }

    /// Sets the faculty name.
    pub fn with_faculty(mut self, faculty: impl Into<String>) -> Self {
        self.faculty = Some(faculty.into());
        self
    }

    /// Sets the venue label.
    pub fn with_venue(mut self, venue: impl Into<String>) -> Self {
        self.venue = venue.into();
        self
    }

    /// Splits the compound code into its atomic codes.
    ///
    /// `"A11+A12"` and `"A11/A12"` both yield `["A11", "A12"]`.
    pub fn atomic_codes(&self) -> Vec<&str> {
        self.code
            .split(['+', '/'])
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect()
    }
}
