//! Generation preference configuration.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::CourseId;

/// Shape of the per-period time score curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeMode {
    /// Neutral baseline; every period scores the same.
    #[default]
    None,
    /// Earlier periods score higher.
    Morning,
    /// Later periods score higher.
    #[serde(alias = "evening")]
    Afternoon,
    /// Mid-day periods score higher.
    Middle,
}

impl TimeMode {
    /// Parses a mode name from the string boundary.
    ///
    /// `"evening"` is accepted as an alias of `afternoon`. Unknown names
    /// yield `None` and should be rejected as caller errors.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "none" => Some(TimeMode::None),
            "morning" => Some(TimeMode::Morning),
            "afternoon" | "evening" => Some(TimeMode::Afternoon),
            "middle" => Some(TimeMode::Middle),
            _ => None,
        }
    }
}

/// User preferences for one generation session.
///
/// Immutable input. Faculty preferences are ranked per course (index 0 =
/// most preferred); avoided faculties and excluded codes act as hard
/// filters for the pre-filtering strategies and as large score penalties
/// for the pool-sampling strategies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Preferences {
    /// Time score curve selector.
    #[serde(default)]
    pub time_mode: TimeMode,
    /// Force period-1 cells to score zero.
    #[serde(default)]
    pub avoid_early_morning: bool,
    /// Force period-7 cells to score zero.
    #[serde(default)]
    pub avoid_late_evening: bool,
    /// Ordered preferred faculty names per course (rank 0 first).
    #[serde(default)]
    pub course_faculty_preferences: HashMap<CourseId, Vec<String>>,
    /// Faculty names to exclude outright.
    #[serde(default)]
    pub avoided_faculties: HashSet<String>,
    /// Atomic codes to exclude outright.
    #[serde(default)]
    pub exclude_slots: HashSet<String>,
}

impl Preferences {
    /// Sets the time mode.
    pub fn with_time_mode(mut self, mode: TimeMode) -> Self {
        self.time_mode = mode;
        self
    }

    /// Avoids period-1 (early morning) cells.
    pub fn avoiding_early_morning(mut self) -> Self {
        self.avoid_early_morning = true;
        self
    }

    /// Avoids period-7 (late evening) cells.
    pub fn avoiding_late_evening(mut self) -> Self {
        self.avoid_late_evening = true;
        self
    }

    /// Sets the ranked faculty preference list for a course.
    pub fn with_faculty_preference<I>(mut self, course: impl Into<CourseId>, faculties: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.course_faculty_preferences.insert(
            course.into(),
            faculties.into_iter().map(Into::into).collect(),
        );
        self
    }

    /// Adds a faculty to the hard-exclusion set.
    pub fn with_avoided_faculty(mut self, faculty: impl Into<String>) -> Self {
        self.avoided_faculties.insert(faculty.into());
        self
    }

    /// Adds an atomic code to the hard-exclusion set.
    pub fn with_excluded_slot(mut self, code: impl Into<String>) -> Self {
        self.exclude_slots.insert(code.into());
        self
    }

    /// Whether any time-shaped preference is active.
    pub fn has_time_preference(&self) -> bool {
        self.time_mode != TimeMode::None || self.avoid_early_morning || self.avoid_late_evening
    }

    /// Whether any per-course faculty preference is configured.
    pub fn has_faculty_preference(&self) -> bool {
        !self.course_faculty_preferences.is_empty()
    }

    /// Preference rank of a faculty for a course (0 = most preferred).
    pub fn faculty_rank(&self, course: CourseId, faculty: &str) -> Option<usize> {
        self.course_faculty_preferences
            .get(&course)?
            .iter()
            .position(|name| name == faculty)
    }

    /// Whether the slot's faculty is on the course's preference list.
    pub fn is_preferred(&self, course: CourseId, faculty: Option<&str>) -> bool {
        faculty.is_some_and(|name| self.faculty_rank(course, name).is_some())
    }

    /// Whether the slot's faculty is hard-avoided.
    pub fn is_avoided(&self, faculty: Option<&str>) -> bool {
        faculty.is_some_and(|name| self.avoided_faculties.contains(name))
    }
}
