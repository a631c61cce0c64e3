//! Constraint-based course timetable solver.
//!
//! Given a set of courses, each with a menu of mutually substitutable slot
//! options (faculty, venue, meeting pattern), produces ranked, conflict-free
//! assignments — exactly one option per course. Combines domain reduction
//! (AC-3), exhaustive and randomized backtracking, beam search, tiered
//! multi-objective ranking, and diversity-aware sampling under hard
//! attempt budgets.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `CourseRequest`, `SlotOption`,
//!   `Preferences`, `Solution`
//! - **`timing`**: Atomic slot-code timing table and mutual-exclusion groups
//! - **`validation`**: Input integrity checks (duplicate IDs, unknown
//!   courses, empty domains)
//! - **`scoring`**: Preference-driven candidate and assignment scoring
//! - **`diagnostics`**: Per-solution detail (day gaps, Saturday load,
//!   faculty matches)
//! - **`solver`**: The generation session — candidate indexing, arc
//!   consistency, and the search strategies
//!
//! # Architecture
//!
//! The solver is a library-level computational boundary: it consumes course
//! records and a preference configuration, and returns ranked solutions
//! plus non-fatal warnings. Storage, import, and presentation of courses
//! and results belong to the caller. One `Solver` is built per request;
//! the candidate arena, timing caches, and pairwise conflict matrix are
//! materialized once at construction and shared read-only by every
//! strategy. Randomness comes from a seedable generator injected through
//! the request, so sampling strategies are reproducible in tests.

pub mod diagnostics;
pub mod models;
pub mod scoring;
pub mod solver;
pub mod timing;
pub mod validation;

mod candidates;

pub use models::{CourseId, CourseRequest, Preferences, SlotId, SlotOption, Solution, TimeMode};
pub use solver::{CancelToken, SolveRequest, Solver};
