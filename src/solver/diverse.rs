//! Diversity-aware sampling.
//!
//! Repeated randomized backtracking where a new solution is accepted only
//! if it is sufficiently different from every solution accepted so far.
//! Similarity weighs shared candidates, shared teaching days, and shared
//! periods; the acceptance threshold relaxes after a streak of rejections
//! so the search always makes forward progress.

use std::collections::HashSet;

use rand::seq::SliceRandom;

use crate::diagnostics::SearchMethod;
use crate::models::{Solution, TimeMode};
use crate::scoring::penalized_sum_score;
use crate::timing::CellSet;

use super::{signature, Solver};

/// Rejections in a row before the diversity bar drops.
const RELAX_STREAK: usize = 20;

/// How far the bar drops each time.
const RELAX_STEP: f64 = 5.0;

/// The bar never drops below this.
const DIVERSITY_FLOOR: f64 = 5.0;

/// Day and period usage of an accepted solution, kept for cheap
/// similarity checks against later candidates.
struct Profile {
    ids: Vec<usize>,
    days: u8,
    periods: u8,
}

impl Profile {
    /// Weighted overlap with another profile; higher means more alike.
    fn similarity(&self, other: &Profile) -> f64 {
        let mut shared_ids = 0usize;
        let (mut i, mut j) = (0, 0);
        while i < self.ids.len() && j < other.ids.len() {
            match self.ids[i].cmp(&other.ids[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    shared_ids += 1;
                    i += 1;
                    j += 1;
                }
            }
        }
        let shared_days = (self.days & other.days).count_ones();
        let shared_periods = (self.periods & other.periods).count_ones();
        shared_ids as f64 * 10.0 + f64::from(shared_days) * 2.0 + f64::from(shared_periods)
    }
}

impl Solver {
    /// Collects up to `limit` mutually diverse solutions.
    ///
    /// A candidate is accepted only when its diversity against the most
    /// similar accepted solution — `100 − 5 × similarity`, floored at
    /// zero — meets the current bar, which starts at `min_diversity` and
    /// relaxes by [`RELAX_STEP`] after [`RELAX_STREAK`] consecutive
    /// rejections. The first solution is always accepted.
    ///
    /// Candidate ordering within a domain stays greedy (best score first)
    /// whenever a time or faculty preference is active; with no preference
    /// the domains are reshuffled per attempt for maximum spread.
    pub fn search_diverse(&mut self, limit: usize, min_diversity: f64) -> Vec<Solution> {
        if self.courses.is_empty() || limit == 0 {
            return Vec::new();
        }

        let shuffle_slots = self.preferences.time_mode == TimeMode::None
            && !self.preferences.has_faculty_preference();
        let max_attempts = limit.saturating_mul(50);
        let mut attempts = 0usize;
        let mut threshold = min_diversity;
        let mut rejection_streak = 0usize;

        let mut solutions: Vec<Solution> = Vec::new();
        let mut accepted: Vec<Profile> = Vec::new();
        let mut seen: HashSet<Vec<usize>> = HashSet::new();
        let mut course_order: Vec<usize> = (0..self.courses.len()).collect();

        while solutions.len() < limit && attempts < max_attempts {
            if self.cancel.is_cancelled() {
                break;
            }

            course_order.shuffle(&mut self.rng);
            if shuffle_slots {
                for domain in &mut self.index.domains {
                    domain.shuffle(&mut self.rng);
                }
            }

            let Some(picks) = self.first_assignment(&course_order, &mut attempts, max_attempts)
            else {
                break;
            };
            let sig = signature(&picks);
            if seen.contains(&sig) {
                attempts += 1;
                continue;
            }

            let profile = self.profile_of(&picks);
            let diversity = if accepted.is_empty() {
                100.0
            } else {
                let max_sim = accepted
                    .iter()
                    .map(|a| profile.similarity(a))
                    .fold(0.0_f64, f64::max);
                (100.0 - max_sim * 5.0).max(0.0)
            };

            if rejection_streak > RELAX_STREAK {
                threshold = (threshold - RELAX_STEP).max(DIVERSITY_FLOOR);
                rejection_streak = 0;
            }

            if solutions.is_empty() || diversity >= threshold {
                seen.insert(sig);
                let details = self.details_for(&picks, SearchMethod::Diverse);
                let score = penalized_sum_score(&self.candidate_refs(&picks), &details);
                solutions.push(self.assemble(&picks, score, details));
                accepted.push(profile);
                rejection_streak = 0;
            } else {
                rejection_streak += 1;
            }
        }
        solutions
    }

    /// First complete assignment found by depth-first search over the
    /// given course order, or `None` when the attempt budget runs out or
    /// the ordered domains admit no assignment.
    fn first_assignment(
        &self,
        order: &[usize],
        attempts: &mut usize,
        max_attempts: usize,
    ) -> Option<Vec<usize>> {
        let depth_max = order.len();
        let mut cursors = vec![0usize; depth_max + 1];
        let mut occupied = vec![CellSet::EMPTY; depth_max + 1];
        let mut picks: Vec<usize> = Vec::with_capacity(depth_max);
        let mut depth = 0usize;

        loop {
            if depth == depth_max {
                return Some(picks);
            }
            let domain = &self.index.domains[order[depth]];
            let mut advanced = false;
            while cursors[depth] < domain.len() {
                *attempts += 1;
                if *attempts >= max_attempts {
                    return None;
                }
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
                    return None;
                }
                depth -= 1;
                picks.pop();
            }
        }
    }

    /// Day/period usage profile of an assignment.
    fn profile_of(&self, picks: &[usize]) -> Profile {
        let mut days = 0u8;
        let mut periods = 0u8;
        for &i in picks {
            for cell in &self.index.candidates[i].cells {
                days |= 1 << (cell.day as u8);
                periods |= 1 << (cell.period - 1);
            }
        }
        Profile {
            ids: signature(picks),
            days,
            periods,
        }
    }
}
