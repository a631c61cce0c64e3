//! Solver domain models.
//!
//! Input types for one generation session — courses, their substitutable
//! slot options, and the preference configuration — plus the produced
//! [`Solution`]. All inputs are immutable for the duration of a session;
//! the solver materializes its own indices from them and never re-queries.

mod course;
mod preferences;
mod slot;
mod solution;

pub use course::{CourseId, CourseRequest};
pub use preferences::{Preferences, TimeMode};
pub use slot::{SlotId, SlotOption};
pub use solution::Solution;
