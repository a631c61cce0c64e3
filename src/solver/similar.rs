//! Local search around a reference solution.
//!
//! Re-solves the instance while holding all but one or two courses fixed
//! to their reference picks, enumerating single-course variations before
//! pairs. Useful for "show me something close to this" follow-up queries.

use std::collections::{HashMap, HashSet};

use crate::diagnostics::SearchMethod;
use crate::models::{SlotId, Solution};
use crate::scoring::penalized_sum_score;
use crate::timing::CellSet;

use super::{signature, Solver};

impl Solver {
    /// Collects up to `limit` solutions that differ from `reference` in
    /// one course, then in two.
    ///
    /// Each varied-course combination contributes at most one variation,
    /// taken greedily from the ordered domains, so the neighbors spread
    /// across courses instead of exhausting one course's alternatives.
    /// The reference itself is never returned. A reference whose picks
    /// are not part of this session yields an empty result.
    pub fn search_similar(&self, reference: &Solution, limit: usize) -> Vec<Solution> {
        let n = self.courses.len();
        if n == 0 || limit == 0 {
            return Vec::new();
        }

        let by_slot: HashMap<SlotId, usize> = self
            .index
            .candidates
            .iter()
            .enumerate()
            .map(|(i, cand)| (cand.slot.id, i))
            .collect();

        let mut reference_picks = vec![usize::MAX; n];
        for pick in &reference.picks {
            if let Some(&i) = by_slot.get(&pick.id) {
                reference_picks[self.index.candidates[i].course] = i;
            }
        }
        if reference_picks.contains(&usize::MAX) {
            return Vec::new();
        }

        let mut seen: HashSet<Vec<usize>> = HashSet::new();
        seen.insert(signature(&reference_picks));

        let mut combos: Vec<Vec<usize>> = (0..n).map(|i| vec![i]).collect();
        for i in 0..n {
            for j in (i + 1)..n {
                combos.push(vec![i, j]);
            }
        }

        let mut solutions = Vec::new();
        for combo in combos {
            if solutions.len() >= limit || self.cancel.is_cancelled() {
                break;
            }

            let mut base: Vec<usize> = Vec::with_capacity(n - combo.len());
            let mut occupied = CellSet::EMPTY;
            for (course, &pick) in reference_picks.iter().enumerate() {
                if !combo.contains(&course) {
                    base.push(pick);
                    occupied = occupied.union(self.index.candidates[pick].mask);
                }
            }

            if let Some(picks) =
                self.vary(&combo, 0, &mut base, occupied, &reference_picks, &seen)
            {
                seen.insert(signature(&picks));
                let details = self.details_for(&picks, SearchMethod::Similar);
                let score = penalized_sum_score(&self.candidate_refs(&picks), &details);
                solutions.push(self.assemble(&picks, score, details));
            }
        }
        solutions
    }

    /// Depth-first fill of the varied courses; returns the first complete
    /// assignment not yet seen.
    fn vary(
        &self,
        combo: &[usize],
        pos: usize,
        picks: &mut Vec<usize>,
        occupied: CellSet,
        reference_picks: &[usize],
        seen: &HashSet<Vec<usize>>,
    ) -> Option<Vec<usize>> {
        if pos == combo.len() {
            if seen.contains(&signature(picks)) {
                return None;
            }
            return Some(picks.clone());
        }

        let course = combo[pos];
        for &cand_idx in &self.index.domains[course] {
            if cand_idx == reference_picks[course] {
                continue;
            }
            let cand = &self.index.candidates[cand_idx];
            if occupied.intersects(cand.mask) {
                continue;
            }
            if picks.iter().any(|&p| self.index.conflicts(p, cand_idx)) {
                continue;
            }
            picks.push(cand_idx);
            let result = self.vary(
                combo,
                pos + 1,
                picks,
                occupied.union(cand.mask),
                reference_picks,
                seen,
            );
            picks.pop();
            if result.is_some() {
                return result;
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CourseRequest, SlotOption};
    use crate::solver::SolveRequest;

    fn sample_courses() -> Vec<CourseRequest> {
        vec![
            CourseRequest::new(1, "CSE1001"),
            CourseRequest::new(2, "MAT1011"),
        ]
    }

    fn sample_slots() -> Vec<SlotOption> {
        vec![
            SlotOption::new(10, 1, "A11"), // MON p1
            SlotOption::new(11, 1, "B11"), // MON p2
            SlotOption::new(20, 2, "D11"), // TUE p1
            SlotOption::new(21, 2, "E11"), // TUE p2
        ]
    }

    fn solver_and_reference() -> (Solver, Solution) {
        let solver =
            Solver::new(SolveRequest::new(sample_courses(), sample_slots()).with_seed(42))
                .unwrap();
        let reference = solver
            .search_exhaustive(1000, 100)
            .into_iter()
            .find(|s| {
                s.pick_for(1.into()).unwrap().code == "A11"
                    && s.pick_for(2.into()).unwrap().code == "D11"
            })
            .unwrap();
        (solver, reference)
    }

    #[test]
    fn test_similar_excludes_reference() {
        let (solver, reference) = solver_and_reference();
        let solutions = solver.search_similar(&reference, 10);

        assert!(!solutions.is_empty());
        for solution in &solutions {
            assert_ne!(solution.slot_ids(), reference.slot_ids());
        }
    }

    #[test]
    fn test_single_variations_come_first() {
        let (solver, reference) = solver_and_reference();
        let solutions = solver.search_similar(&reference, 10);

        let differing = |s: &Solution| {
            s.picks
                .iter()
                .filter(|p| !reference.slot_ids().contains(&p.id))
                .count()
        };
        // Three combinations (two single, one pair), one variation each.
        assert_eq!(solutions.len(), 3);
        assert_eq!(differing(&solutions[0]), 1);
        assert_eq!(differing(&solutions[1]), 1);
        assert_eq!(differing(&solutions[2]), 2);
    }

    #[test]
    fn test_limit_respected() {
        let (solver, reference) = solver_and_reference();
        assert_eq!(solver.search_similar(&reference, 1).len(), 1);
    }

    #[test]
    fn test_variations_do_not_conflict_with_fixed_picks() {
        // Course 2's only alternative collides with course 1's fixed pick,
        // so varying course 2 alone yields nothing.
        let courses = sample_courses();
        let slots = vec![
            SlotOption::new(10, 1, "A11"), // MON p1 (fixed)
            SlotOption::new(20, 2, "D11"), // TUE p1 (reference)
            SlotOption::new(21, 2, "A11"), // MON p1 → collides
        ];
        let solver = Solver::new(SolveRequest::new(courses, slots).with_seed(1)).unwrap();
        let reference = solver.search_exhaustive(1000, 100).remove(0);
        assert_eq!(reference.pick_for(2.into()).unwrap().code, "D11");

        assert!(solver.search_similar(&reference, 10).is_empty());
    }

    #[test]
    fn test_foreign_reference_yields_empty() {
        let (solver, mut reference) = solver_and_reference();
        reference.picks[0].id = 999.into();
        assert!(solver.search_similar(&reference, 10).is_empty());
    }
}
