//! Input validation for generation sessions.
//!
//! Checks structural integrity of the courses, slot options, and
//! preference configuration before any search begins. Detects:
//! - Duplicate course or slot IDs
//! - Slot options and preferences referencing unknown courses
//! - Courses with a zero credit weight
//!
//! Caller errors are reported all at once, distinct from "unsatisfiable":
//! an instance with no conflict-free assignment is a normal empty result,
//! never a validation error.

use std::collections::HashSet;

use crate::models::{CourseId, CourseRequest, Preferences, SlotOption};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A slot option or preference references a course not in the request.
    UnknownCourse,
    /// A course has a zero credit weight.
    ZeroCredits,
    /// A course has no usable slot option left after filtering.
    EmptyDomain,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the input data for one generation session.
///
/// Checks:
/// 1. No duplicate course IDs
/// 2. No duplicate slot IDs
/// 3. Every course has a positive credit weight
/// 4. Every slot option belongs to a requested course
/// 5. Every faculty-preference entry names a requested course
///
/// The empty-domain check (a course with no surviving candidate after
/// faulty and hard-exclusion filtering) happens when the solver builds its
/// candidate index, since it depends on the timing table and preferences.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(
    courses: &[CourseRequest],
    slots: &[SlotOption],
    preferences: &Preferences,
) -> ValidationResult {
    let mut errors = Vec::new();

    let mut course_ids: HashSet<CourseId> = HashSet::new();
    for course in courses {
        if !course_ids.insert(course.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate course ID: {}", course.id),
            ));
        }
        if course.credits == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::ZeroCredits,
                format!("Course '{}' has a zero credit weight", course.code),
            ));
        }
    }

    let mut slot_ids = HashSet::new();
    for slot in slots {
        if !slot_ids.insert(slot.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate slot ID: {}", slot.id),
            ));
        }
        if !course_ids.contains(&slot.course_id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownCourse,
                format!(
                    "Slot '{}' references unknown course {}",
                    slot.code, slot.course_id
                ),
            ));
        }
    }

    for course_id in preferences.course_faculty_preferences.keys() {
        if !course_ids.contains(course_id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownCourse,
                format!("Faculty preference references unknown course {course_id}"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
