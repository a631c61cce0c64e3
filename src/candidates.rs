//! Candidate index: per-course domains and the pairwise conflict matrix.
//!
//! Materializes an immutable arena of candidates at session start — one
//! entry per usable slot option, with cached cell timings, occupancy mask,
//! atomic codes, and precomputed preference score. Options with any
//! unresolvable code never enter the arena; each produces one warning.
//!
//! Two domain views index into the arena per course:
//! - `domains` applies the hard exclusions (avoided faculty, excluded
//!   code) and is what the pre-filtering strategies and AC-3 operate on;
//! - `full_domains` keeps every non-faulty option for the pool-sampling
//!   strategies, which rely on score penalties instead of filtering.
//!
//! The conflict matrix covers the whole arena, so it stays valid across
//! domain reordering and AC-3 pruning and is built exactly once.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{CourseRequest, Preferences, SlotOption};
use crate::scoring::Scorer;
use crate::timing::{CellSet, CellTiming, TimingIndex};

/// One usable slot option with its cached derived data.
#[derive(Debug, Clone)]
pub(crate) struct Candidate {
    /// The underlying slot option.
    pub(crate) slot: SlotOption,
    /// Index of the owning course in the request order.
    pub(crate) course: usize,
    /// Atomic codes of the meeting pattern.
    pub(crate) codes: Vec<String>,
    /// Resolved timing per atomic code, parallel to `codes`.
    pub(crate) cells: Vec<CellTiming>,
    /// Occupied (day, period) cells.
    pub(crate) mask: CellSet,
    /// Precomputed preference score.
    pub(crate) score: f64,
}

/// Session-scoped candidate arena, domains, and conflict matrix.
#[derive(Debug, Clone)]
pub(crate) struct CandidateIndex {
    pub(crate) candidates: Vec<Candidate>,
    pub(crate) domains: Vec<Vec<usize>>,
    pub(crate) full_domains: Vec<Vec<usize>>,
    pub(crate) warnings: Vec<String>,
    conflicts: Vec<bool>,
    arena_len: usize,
}

impl CandidateIndex {
    /// Builds the index for one session.
    pub(crate) fn build(
        courses: &[CourseRequest],
        slots: &[SlotOption],
        prefs: &Preferences,
        timing: &TimingIndex,
    ) -> Self {
        let scorer = Scorer::new(prefs);
        let mut candidates: Vec<Candidate> = Vec::new();
        let mut domains = vec![Vec::new(); courses.len()];
        let mut full_domains = vec![Vec::new(); courses.len()];
        let mut warnings = Vec::new();

        for (course_idx, course) in courses.iter().enumerate() {
            for slot in slots.iter().filter(|s| s.course_id == course.id) {
                let codes: Vec<String> =
                    slot.atomic_codes().into_iter().map(String::from).collect();

                let mut cells = Vec::with_capacity(codes.len());
                let mut unknown = Vec::new();
                for code in &codes {
                    match timing.resolve(code) {
                        Some(cell) => cells.push(cell),
                        None => unknown.push(code.clone()),
                    }
                }
                if !unknown.is_empty() || codes.is_empty() {
                    warnings.push(format!(
                        "Excluded {} for {}: unknown slot code(s) {}",
                        slot.faculty.as_deref().unwrap_or("unknown faculty"),
                        course.code,
                        unknown.join(", "),
                    ));
                    continue;
                }

                let mut mask = CellSet::EMPTY;
                for cell in &cells {
                    mask.insert(cell.day, cell.period);
                }

                let score = scorer.candidate_score(course, slot, &codes, &cells);
                let idx = candidates.len();
                let excluded = prefs.is_avoided(slot.faculty.as_deref())
                    || codes.iter().any(|c| prefs.exclude_slots.contains(c));

                candidates.push(Candidate {
                    slot: slot.clone(),
                    course: course_idx,
                    codes,
                    cells,
                    mask,
                    score,
                });
                full_domains[course_idx].push(idx);
                if !excluded {
                    domains[course_idx].push(idx);
                }
            }
        }

        let arena_len = candidates.len();
        let mut conflicts = vec![false; arena_len * arena_len];
        for i in 0..arena_len {
            for j in (i + 1)..arena_len {
                let (a, b) = (&candidates[i], &candidates[j]);
                if a.course == b.course {
                    continue;
                }
                let clash = a.mask.intersects(b.mask)
                    || timing
                        .exclusions()
                        .iter()
                        .any(|g| g.links(&a.codes, &b.codes));
                if clash {
                    conflicts[i * arena_len + j] = true;
                    conflicts[j * arena_len + i] = true;
                }
            }
        }

        Self {
            candidates,
            domains,
            full_domains,
            warnings,
            conflicts,
            arena_len,
        }
    }

    /// O(1) conflict lookup between two arena candidates.
    pub(crate) fn conflicts(&self, a: usize, b: usize) -> bool {
        self.conflicts[a * self.arena_len + b]
    }

    /// Orders the filtered domains best-first: shuffled, then sorted by
    /// descending score so equal scores keep a randomized relative order.
    pub(crate) fn order_greedy<R: Rng>(&mut self, rng: &mut R) {
        for domain in &mut self.domains {
            domain.shuffle(rng);
            domain.sort_by(|&a, &b| {
                self.candidates[b]
                    .score
                    .partial_cmp(&self.candidates[a].score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }
    }

    /// Shuffles the unfiltered domains for the sampling strategies.
    pub(crate) fn shuffle_full<R: Rng>(&mut self, rng: &mut R) {
        for domain in &mut self.full_domains {
            domain.shuffle(rng);
        }
    }

    /// Removes values of `a`'s domain with no conflict-free counterpart in
    /// `b`'s domain. Returns whether anything was removed.
    pub(crate) fn revise(&mut self, a: usize, b: usize) -> bool {
        let kept: Vec<usize> = self.domains[a]
            .iter()
            .copied()
            .filter(|&x| self.domains[b].iter().any(|&y| !self.conflicts(x, y)))
            .collect();
        if kept.len() == self.domains[a].len() {
            return false;
        }
        self.domains[a] = kept;
        true
    }
}
