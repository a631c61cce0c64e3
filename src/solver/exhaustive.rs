//! Exhaustive backtracking enumeration and solution counting.
//!
//! Depth-first over the courses with an explicit decision stack, pruning
//! on the occupied-cell mask and the conflict matrix. Deterministic given
//! a fixed course and candidate order.

use std::collections::HashSet;

use crate::diagnostics::SearchMethod;
use crate::models::Solution;
use crate::scoring::average_candidate_score;
use crate::timing::CellSet;

use super::{signature, Solver};

impl Solver {
    /// Enumerates every valid assignment up to `max_solutions`, ranks all
    /// of them by average candidate score, and returns the top
    /// `target_size`.
    ///
    /// Courses are processed most-constrained-first for early pruning.
    /// The safety cap bounds the enumeration, not the result: hitting it
    /// returns the best of what was found.
    pub fn search_exhaustive(&self, max_solutions: usize, target_size: usize) -> Vec<Solution> {
        if self.courses.is_empty() {
            return Vec::new();
        }

        let order = self.constrained_order();
        let mut found: Vec<Vec<usize>> = Vec::new();
        self.enumerate(&order, max_solutions, |picks| found.push(picks.to_vec()));

        let total = found.len();
        let mut solutions: Vec<Solution> = found
            .into_iter()
            .map(|picks| {
                let score = average_candidate_score(&self.candidate_refs(&picks));
                let mut details = self.details_for(&picks, SearchMethod::Exhaustive);
                details.total_enumerated = Some(total);
                self.assemble(&picks, score, details)
            })
            .collect();

        solutions.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        solutions.truncate(target_size);
        solutions
    }

    /// Counts valid assignments over the filtered domains, capped at
    /// `max_count`.
    pub fn count_solutions(&self, max_count: usize) -> usize {
        if self.courses.is_empty() {
            return 0;
        }
        let order: Vec<usize> = (0..self.courses.len()).collect();
        let mut count = 0;
        self.enumerate(&order, max_count, |_| count += 1);
        count
    }

    /// Counts distinct meeting-pattern combinations, ignoring faculty
    /// differences, capped at `max_count`.
    ///
    /// Candidates sharing a compound code collapse into one pattern per
    /// course. Compatibility is tested on time overlap alone.
    pub fn count_distinct_patterns(&self, max_count: usize) -> usize {
        if self.courses.is_empty() {
            return 0;
        }

        // TODO: decide whether the cross-lunch exclusion pairs should also
        // prune here; they never overlap in time, so two patterns joined
        // only by such a pair are currently counted as compatible.
        let mut patterns: Vec<Vec<CellSet>> = Vec::with_capacity(self.courses.len());
        for domain in &self.index.domains {
            let mut seen: HashSet<&str> = HashSet::new();
            let mut masks = Vec::new();
            for &i in domain {
                let cand = &self.index.candidates[i];
                if seen.insert(cand.slot.code.as_str()) {
                    masks.push(cand.mask);
                }
            }
            if masks.is_empty() {
                return 0;
            }
            patterns.push(masks);
        }

        let mut count = 0usize;
        let depth_max = patterns.len();
        let mut cursors = vec![0usize; depth_max + 1];
        let mut occupied = vec![CellSet::EMPTY; depth_max + 1];
        let mut depth = 0usize;

        loop {
            if count >= max_count || self.cancel.is_cancelled() {
                return count;
            }
            if depth == depth_max {
                count += 1;
                depth -= 1;
                continue;
            }
            let masks = &patterns[depth];
            let mut advanced = false;
            while cursors[depth] < masks.len() {
                let mask = masks[cursors[depth]];
                cursors[depth] += 1;
                if occupied[depth].intersects(mask) {
                    continue;
                }
                occupied[depth + 1] = occupied[depth].union(mask);
                depth += 1;
                cursors[depth] = 0;
                advanced = true;
                break;
            }
            if !advanced {
                if depth == 0 {
                    return count;
                }
                depth -= 1;
            }
        }
    }

    /// Depth-first enumeration of complete valid assignments.
    ///
    /// `visit` receives each unique assignment (by candidate signature) as
    /// arena indices in `order` position; at most `cap` assignments are
    /// visited. Iterative on an explicit stack of domain cursors.
    fn enumerate<F: FnMut(&[usize])>(&self, order: &[usize], cap: usize, mut visit: F) {
        let depth_max = order.len();
        let mut seen: HashSet<Vec<usize>> = HashSet::new();
        let mut cursors = vec![0usize; depth_max + 1];
        let mut occupied = vec![CellSet::EMPTY; depth_max + 1];
        let mut picks: Vec<usize> = Vec::with_capacity(depth_max);
        let mut emitted = 0usize;
        let mut depth = 0usize;

        loop {
            if emitted >= cap || self.cancel.is_cancelled() {
                return;
            }
            if depth == depth_max {
                if seen.insert(signature(&picks)) {
                    visit(&picks);
                    emitted += 1;
                }
                if depth == 0 {
                    return;
                }
                depth -= 1;
                picks.pop();
                continue;
            }

            let domain = &self.index.domains[order[depth]];
            let mut advanced = false;
            while cursors[depth] < domain.len() {
                let cand_idx = domain[cursors[depth]];
                cursors[depth] += 1;
                let cand = &self.index.candidates[cand_idx];
                if occupied[depth].intersects(cand.mask) {
                    continue;
                }
                if picks.iter().any(|&p| self.index.conflicts(p, cand_idx)) {
                    continue;
                }
                occupied[depth + 1] = occupied[depth].union(cand.mask);
                picks.push(cand_idx);
                depth += 1;
                cursors[depth] = 0;
                advanced = true;
                break;
            }
            if !advanced {
                if depth == 0 {
                    return;
                }
                depth -= 1;
                picks.pop();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CourseRequest, Preferences, SlotOption};
    use crate::solver::SolveRequest;
    use crate::timing::TimingIndex;

    fn solver_for(courses: Vec<CourseRequest>, slots: Vec<SlotOption>) -> Solver {
        Solver::new(SolveRequest::new(courses, slots).with_seed(42)).unwrap()
    }

    fn assert_conflict_free(solution: &Solution) {
        let timing = TimingIndex::standard();
        let mut occupied = CellSet::EMPTY;
        for pick in &solution.picks {
            for code in pick.atomic_codes() {
                let cell = timing.resolve(code).unwrap();
                assert!(
                    !occupied.contains(cell.day, cell.period),
                    "cell {code} reused in {:?}",
                    solution.picks
                );
                occupied.insert(cell.day, cell.period);
            }
        }
    }

    #[test]
    fn test_three_valid_combinations() {
        // A: MON p1 / MON p2. B: MON p1 / TUE p1. The double MON p1
        // pairing collides, leaving three combinations.
        let courses = vec![
            CourseRequest::new(1, "CSE1001"),
            CourseRequest::new(2, "MAT1011"),
        ];
        let slots = vec![
            SlotOption::new(10, 1, "A11"),
            SlotOption::new(11, 1, "B11"),
            SlotOption::new(20, 2, "A11"),
            SlotOption::new(21, 2, "D11"),
        ];
        let solver = solver_for(courses, slots);

        let solutions = solver.search_exhaustive(1000, 100);
        assert_eq!(solutions.len(), 3);
        for solution in &solutions {
            assert_eq!(solution.picks.len(), 2);
            assert_conflict_free(solution);
            assert_eq!(solution.details.total_enumerated, Some(3));
        }
    }

    #[test]
    fn test_one_pick_per_course() {
        let courses = vec![
            CourseRequest::new(1, "CSE1001"),
            CourseRequest::new(2, "MAT1011"),
            CourseRequest::new(3, "PHY1001"),
        ];
        let slots = vec![
            SlotOption::new(10, 1, "A11"),
            SlotOption::new(11, 1, "B11"),
            SlotOption::new(20, 2, "D11"),
            SlotOption::new(30, 3, "A12"),
        ];
        let solver = solver_for(courses, slots);

        for solution in solver.search_exhaustive(1000, 100) {
            let mut courses_covered: Vec<u64> =
                solution.picks.iter().map(|p| p.course_id.0).collect();
            courses_covered.sort_unstable();
            assert_eq!(courses_covered, vec![1, 2, 3]);
        }
    }

    #[test]
    fn test_exclusion_group_respected() {
        // F11 and D21 are a cross-lunch pair; E11 is free.
        let courses = vec![
            CourseRequest::new(1, "CSE1001"),
            CourseRequest::new(2, "MAT1011"),
        ];
        let slots = vec![
            SlotOption::new(10, 1, "F11"),
            SlotOption::new(20, 2, "D21"),
            SlotOption::new(21, 2, "E11"),
        ];
        let solver = solver_for(courses, slots);

        let solutions = solver.search_exhaustive(1000, 100);
        assert_eq!(solutions.len(), 1);
        assert_eq!(solutions[0].pick_for(2.into()).unwrap().code, "E11");
    }

    #[test]
    fn test_unsatisfiable_yields_empty() {
        let courses = vec![
            CourseRequest::new(1, "CSE1001"),
            CourseRequest::new(2, "MAT1011"),
        ];
        let slots = vec![
            SlotOption::new(10, 1, "A11"),
            SlotOption::new(20, 2, "A11"),
        ];
        let solver = solver_for(courses, slots);
        assert!(solver.search_exhaustive(1000, 100).is_empty());
    }

    #[test]
    fn test_ranked_by_score() {
        // Middle mode: A21 (p4) outranks A11 (p1).
        let courses = vec![CourseRequest::new(1, "CSE1001")];
        let slots = vec![
            SlotOption::new(10, 1, "A11"),
            SlotOption::new(11, 1, "A21"),
        ];
        let request = SolveRequest::new(courses, slots)
            .with_preferences(
                Preferences::default().with_time_mode(crate::models::TimeMode::Middle),
            )
            .with_seed(42);
        let solver = Solver::new(request).unwrap();

        let solutions = solver.search_exhaustive(1000, 100);
        assert_eq!(solutions.len(), 2);
        assert_eq!(solutions[0].picks[0].code, "A21");
        assert!(solutions[0].score > solutions[1].score);
    }

    #[test]
    fn test_count_independent_courses() {
        // Three courses with two non-clashing options each: 2^3 = 8.
        let courses = vec![
            CourseRequest::new(1, "CSE1001"),
            CourseRequest::new(2, "MAT1011"),
            CourseRequest::new(3, "PHY1001"),
        ];
        let slots = vec![
            SlotOption::new(10, 1, "A11"),
            SlotOption::new(11, 1, "B11"),
            SlotOption::new(20, 2, "D11"),
            SlotOption::new(21, 2, "E11"),
            SlotOption::new(30, 3, "A12"),
            SlotOption::new(31, 3, "B12"),
        ];
        let solver = solver_for(courses, slots);

        assert_eq!(solver.count_solutions(100_000), 8);
        assert_eq!(solver.count_solutions(5), 5);
    }

    #[test]
    fn test_count_respects_conflicts() {
        let courses = vec![
            CourseRequest::new(1, "CSE1001"),
            CourseRequest::new(2, "MAT1011"),
        ];
        let slots = vec![
            SlotOption::new(10, 1, "A11"),
            SlotOption::new(11, 1, "B11"),
            SlotOption::new(20, 2, "A11"),
            SlotOption::new(21, 2, "D11"),
        ];
        let solver = solver_for(courses, slots);
        assert_eq!(solver.count_solutions(100_000), 3);
    }

    #[test]
    fn test_distinct_patterns_ignore_faculty() {
        // Two faculties teach the same A11 pattern: one pattern, not two.
        let courses = vec![
            CourseRequest::new(1, "CSE1001"),
            CourseRequest::new(2, "MAT1011"),
        ];
        let slots = vec![
            SlotOption::new(10, 1, "A11").with_faculty("Rao"),
            SlotOption::new(11, 1, "A11").with_faculty("Iyer"),
            SlotOption::new(12, 1, "B11").with_faculty("Das"),
            SlotOption::new(20, 2, "D11"),
        ];
        let solver = solver_for(courses, slots);

        assert_eq!(solver.count_distinct_patterns(100_000), 2);
        assert_eq!(solver.count_solutions(100_000), 3);
    }

    #[test]
    fn test_empty_input() {
        let solver = solver_for(Vec::new(), Vec::new());
        assert!(solver.search_exhaustive(1000, 100).is_empty());
        assert_eq!(solver.count_solutions(1000), 0);
        assert_eq!(solver.count_distinct_patterns(1000), 0);
    }
}
