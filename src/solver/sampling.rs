//! Randomized pool sampling.
//!
//! Builds a large pool of random valid assignments by repeated first-fit
//! attempts over shuffled course orders, then ranks the pool by preference
//! score. Sampling works on the unfiltered domains: hard exclusions stay
//! in the pool and rely on their large negative scores to sink to the
//! bottom, which keeps the pool as diverse as the instance allows.

use std::collections::HashSet;

use rand::seq::{IndexedRandom, SliceRandom};

use crate::diagnostics::SearchMethod;
use crate::models::Solution;
use crate::scoring::average_candidate_score;
use crate::timing::CellSet;

use super::{signature, Solver};

/// Random candidates tried per course in one attempt.
const PER_COURSE_DRAWS: usize = 5;

/// Consecutive non-progress attempts treated as pool exhaustion.
const NO_PROGRESS_LIMIT: usize = 1000;

impl Solver {
    /// Samples up to `target_pool` random valid assignments, ranks them by
    /// average candidate score, and returns the top `target_size`.
    pub fn search_random_pool(&mut self, target_pool: usize, target_size: usize) -> Vec<Solution> {
        let pool = self.random_pool(target_pool);
        let pool_len = pool.len();

        let mut solutions: Vec<Solution> = pool
            .into_iter()
            .map(|picks| {
                let score = average_candidate_score(&self.candidate_refs(&picks));
                let mut details = self.details_for(&picks, SearchMethod::RandomPool);
                details.pool_size = Some(pool_len);
                self.assemble(&picks, score, details)
            })
            .collect();

        solutions.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        solutions.truncate(target_size);
        solutions
    }

    /// Samples random valid assignments without scoring them.
    ///
    /// Backs the no-preference routing mode, where ranking would be
    /// meaningless; solutions carry a zero score.
    pub(crate) fn random_unscored(&mut self, target_size: usize) -> Vec<Solution> {
        if self.courses.is_empty() {
            return Vec::new();
        }
        self.index.shuffle_full(&mut self.rng);

        let mut solutions: Vec<Solution> = Vec::new();
        let mut seen: HashSet<Vec<usize>> = HashSet::new();
        let max_attempts = target_size.saturating_mul(100);
        let mut attempts = 0usize;

        while solutions.len() < target_size && attempts < max_attempts {
            if self.cancel.is_cancelled() {
                break;
            }
            attempts += 1;
            if let Some(picks) = self.try_random_assignment() {
                if seen.insert(signature(&picks)) {
                    let details = self.details_for(&picks, SearchMethod::Random);
                    solutions.push(self.assemble(&picks, 0.0, details));
                }
            }
        }

        let total = solutions.len();
        for solution in &mut solutions {
            solution.details.pool_size = Some(total);
        }
        solutions
    }

    /// Collects up to `target_pool` unique random assignments.
    ///
    /// Attempts are capped at ten times the pool target; a run of
    /// [`NO_PROGRESS_LIMIT`] consecutive failures or duplicates terminates
    /// early, treating prolonged non-progress as exhaustion.
    pub(crate) fn random_pool(&mut self, target_pool: usize) -> Vec<Vec<usize>> {
        if self.courses.is_empty() {
            return Vec::new();
        }
        self.index.shuffle_full(&mut self.rng);

        let mut pool: Vec<Vec<usize>> = Vec::new();
        let mut seen: HashSet<Vec<usize>> = HashSet::new();
        let max_attempts = target_pool.saturating_mul(10);
        let mut attempts = 0usize;
        let mut no_progress = 0usize;

        while pool.len() < target_pool && attempts < max_attempts {
            if self.cancel.is_cancelled() {
                break;
            }
            attempts += 1;

            match self.try_random_assignment() {
                Some(picks) if seen.insert(signature(&picks)) => {
                    pool.push(picks);
                    no_progress = 0;
                }
                _ => no_progress += 1,
            }
            if no_progress >= NO_PROGRESS_LIMIT {
                break;
            }
        }
        pool
    }

    /// One first-fit attempt over a shuffled course order.
    ///
    /// Draws a small random subset of each course's unfiltered domain and
    /// takes the first member that fits; a course with no fitting draw
    /// fails the whole attempt.
    fn try_random_assignment(&mut self) -> Option<Vec<usize>> {
        let mut course_order: Vec<usize> = (0..self.courses.len()).collect();
        course_order.shuffle(&mut self.rng);

        let mut picks: Vec<usize> = Vec::with_capacity(course_order.len());
        let mut occupied = CellSet::EMPTY;

        for &course in &course_order {
            let domain = &self.index.full_domains[course];
            if domain.is_empty() {
                return None;
            }
            let draws: Vec<usize> = domain
                .choose_multiple(&mut self.rng, PER_COURSE_DRAWS)
                .copied()
                .collect();

            let mut chosen = None;
            'draws: for cand_idx in draws {
                let cand = &self.index.candidates[cand_idx];
                if occupied.intersects(cand.mask) {
                    continue;
                }
                for &p in &picks {
                    if self.index.conflicts(p, cand_idx) {
                        continue 'draws;
                    }
                }
                chosen = Some(cand_idx);
                break;
            }

            let cand_idx = chosen?;
            occupied = occupied.union(self.index.candidates[cand_idx].mask);
            picks.push(cand_idx);
        }
        Some(picks)
    }
}
