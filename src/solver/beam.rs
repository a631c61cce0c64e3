//! Beam search over cumulative candidate scores.
//!
//! Courses are folded in most-constrained-first; after each course only
//! the top-K partial assignments by cumulative score survive. Arc
//! consistency runs first so the per-level domains are already free of
//! unsupported candidates.

use std::collections::HashSet;

use crate::diagnostics::SearchMethod;
use crate::models::Solution;
use crate::timing::CellSet;

use super::{signature, Solver};

/// One partial assignment in the beam.
struct Beam {
    score: f64,
    picks: Vec<usize>,
    occupied: CellSet,
}

impl Solver {
    /// Beam search retaining `beam_width` partial assignments per level;
    /// returns up to `target_size` complete solutions, best first.
    ///
    /// Runs AC-3 first; an unsatisfiable instance yields an empty result.
    /// The beam seeds from the first course's top `2 × beam_width`
    /// candidates so early near-ties are not cut before they can combine.
    pub fn search_beam(&mut self, beam_width: usize, target_size: usize) -> Vec<Solution> {
        if self.courses.is_empty() || beam_width == 0 {
            return Vec::new();
        }
        if !self.reduce_domains() {
            return Vec::new();
        }

        let order = self.constrained_order();
        let mut seeds = self.index.domains[order[0]].clone();
        seeds.sort_by(|&a, &b| {
            self.index.candidates[b]
                .score
                .partial_cmp(&self.index.candidates[a].score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        seeds.truncate(beam_width * 2);

        let mut beams: Vec<Beam> = seeds
            .into_iter()
            .map(|i| Beam {
                score: self.index.candidates[i].score,
                picks: vec![i],
                occupied: self.index.candidates[i].mask,
            })
            .collect();
        retain_top(&mut beams, beam_width);

        for &course in &order[1..] {
            if self.cancel.is_cancelled() {
                break;
            }
            let mut next: Vec<Beam> = Vec::new();
            for beam in &beams {
                for &cand_idx in &self.index.domains[course] {
                    let cand = &self.index.candidates[cand_idx];
                    if beam.occupied.intersects(cand.mask) {
                        continue;
                    }
                    if beam.picks.iter().any(|&p| self.index.conflicts(p, cand_idx)) {
                        continue;
                    }
                    let mut picks = beam.picks.clone();
                    picks.push(cand_idx);
                    next.push(Beam {
                        score: beam.score + cand.score,
                        picks,
                        occupied: beam.occupied.union(cand.mask),
                    });
                }
            }
            retain_top(&mut next, beam_width);
            beams = next;
            if beams.is_empty() {
                break;
            }
        }

        let mut seen: HashSet<Vec<usize>> = HashSet::new();
        let mut solutions = Vec::new();
        for beam in beams {
            if beam.picks.len() != self.courses.len() {
                continue;
            }
            if !seen.insert(signature(&beam.picks)) {
                continue;
            }
            let details = self.details_for(&beam.picks, SearchMethod::Beam);
            solutions.push(self.assemble(&beam.picks, beam.score, details));
            if solutions.len() >= target_size {
                break;
            }
        }
        solutions
    }
}

/// Keeps the best `width` beams by cumulative score.
fn retain_top(beams: &mut Vec<Beam>, width: usize) {
    beams.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    beams.truncate(width);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CourseRequest, Preferences, SlotOption, TimeMode};
    use crate::solver::SolveRequest;

    fn sample_courses() -> Vec<CourseRequest> {
        vec![
            CourseRequest::new(1, "CSE1001"),
            CourseRequest::new(2, "MAT1011"),
        ]
    }

    fn sample_slots() -> Vec<SlotOption> {
        vec![
            SlotOption::new(10, 1, "A11"),
            SlotOption::new(11, 1, "A21"),
            SlotOption::new(20, 2, "D11"),
            SlotOption::new(21, 2, "D21"),
        ]
    }

    #[test]
    fn test_beam_finds_complete_solutions() {
        let mut solver =
            Solver::new(SolveRequest::new(sample_courses(), sample_slots()).with_seed(42))
                .unwrap();
        let solutions = solver.search_beam(10, 10);

        assert_eq!(solutions.len(), 4);
        for solution in &solutions {
            assert_eq!(solution.picks.len(), 2);
        }
        for pair in solutions.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_beam_prefers_high_scores() {
        // Middle mode ranks period 4 above period 1 for both courses.
        let request = SolveRequest::new(sample_courses(), sample_slots())
            .with_preferences(Preferences::default().with_time_mode(TimeMode::Middle))
            .with_seed(42);
        let mut solver = Solver::new(request).unwrap();

        let solutions = solver.search_beam(10, 10);
        let best = &solutions[0];
        assert_eq!(best.pick_for(1.into()).unwrap().code, "A21");
        assert_eq!(best.pick_for(2.into()).unwrap().code, "D21");
    }

    #[test]
    fn test_narrow_beam_limits_results() {
        let mut solver =
            Solver::new(SolveRequest::new(sample_courses(), sample_slots()).with_seed(42))
                .unwrap();
        let solutions = solver.search_beam(1, 10);
        assert_eq!(solutions.len(), 1);
    }

    #[test]
    fn test_beam_unsatisfiable_yields_empty() {
        let courses = sample_courses();
        let slots = vec![
            SlotOption::new(10, 1, "A11"),
            SlotOption::new(20, 2, "A11"),
        ];
        let mut solver = Solver::new(SolveRequest::new(courses, slots).with_seed(1)).unwrap();
        assert!(solver.search_beam(10, 10).is_empty());
    }

    #[test]
    fn test_beam_respects_exclusion_groups() {
        // F11/D21 are a cross-lunch pair, so only the E11 pairing survives.
        let courses = sample_courses();
        let slots = vec![
            SlotOption::new(10, 1, "F11"),
            SlotOption::new(20, 2, "D21"),
            SlotOption::new(21, 2, "E11"),
        ];
        let mut solver = Solver::new(SolveRequest::new(courses, slots).with_seed(1)).unwrap();

        let solutions = solver.search_beam(10, 10);
        assert_eq!(solutions.len(), 1);
        assert_eq!(solutions[0].pick_for(2.into()).unwrap().code, "E11");
    }

    #[test]
    fn test_zero_width_beam() {
        let mut solver =
            Solver::new(SolveRequest::new(sample_courses(), sample_slots()).with_seed(42))
                .unwrap();
        assert!(solver.search_beam(0, 10).is_empty());
    }
}
