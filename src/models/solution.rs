//! Solution model.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::diagnostics::Diagnostics;

use super::{CourseId, SlotId, SlotOption};

/// A complete, conflict-free assignment — one slot option per course.
///
/// The only produced entity of the solver; never persisted by it. Picks
/// are listed in the caller's course order. The score's meaning depends on
/// the strategy that produced the solution (see [`Diagnostics::method`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    /// Chosen slot options, one per course, in request course order.
    pub picks: Vec<SlotOption>,
    /// Quality score; higher is better.
    pub score: f64,
    /// Sum of the credit weights of the covered courses.
    pub total_credits: u32,
    /// Informational diagnostics attached by the assembler.
    pub details: Diagnostics,
}

impl Solution {
    /// Identifiers of the chosen slots, as a set signature.
    pub fn slot_ids(&self) -> BTreeSet<SlotId> {
        self.picks.iter().map(|s| s.id).collect()
    }

    /// The chosen slot option for a course, if the course is covered.
    pub fn pick_for(&self, course: CourseId) -> Option<&SlotOption> {
        self.picks.iter().find(|s| s.course_id == course)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{Diagnostics, SearchMethod};

    fn sample_solution() -> Solution {
        Solution {
            picks: vec![
                SlotOption::new(10, 1, "A11").with_faculty("Rao"),
                SlotOption::new(20, 2, "D11").with_faculty("Das"),
            ],
            score: 120.0,
            total_credits: 7,
            details: Diagnostics::new(SearchMethod::Exhaustive),
        }
    }

    #[test]
    fn test_slot_ids() {
        let s = sample_solution();
        let ids: Vec<SlotId> = s.slot_ids().into_iter().collect();
        assert_eq!(ids, vec![SlotId(10), SlotId(20)]);
    }

    #[test]
    fn test_pick_for() {
        let s = sample_solution();
        assert_eq!(s.pick_for(CourseId(2)).unwrap().id, SlotId(20));
        assert!(s.pick_for(CourseId(9)).is_none());
    }
}
