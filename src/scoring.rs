//! Preference-driven quality scoring.
//!
//! Scores individual candidates and complete assignments from the
//! preference configuration. Candidate scores are computed once when the
//! candidate index is built; solution-level scores combine them per
//! strategy (plain average for ranking pools, penalized sum for the
//! diversity-oriented strategies).
//!
//! # Score shape
//!
//! Per candidate: average over its cells of (time score + faculty score),
//! plus a gap heuristic, multiplied by the course's credit weight. Faculty
//! rank 0/1/2 scores 1000/800/600 so that faculty preference dominates the
//! 0–100 time curves; hard exclusions force a cell to −1000 instead of
//! removing the candidate, for strategies that score without pre-filtering.

use crate::candidates::Candidate;
use crate::diagnostics::Diagnostics;
use crate::models::{CourseId, CourseRequest, Preferences, SlotOption, TimeMode};
use crate::timing::CellTiming;

/// Score awarded to a rank-0 preferred faculty match.
pub const FACULTY_RANK_SCORES: [f64; 3] = [1000.0, 800.0, 600.0];

/// Score forced onto a hard-excluded cell.
const EXCLUDED_CELL_SCORE: f64 = -1000.0;

/// Gap-heuristic weight per period of distance from mid-day.
const GAP_PENALTY_PER_PERIOD: f64 = 8.0;

/// Stateless scorer over a preference configuration.
#[derive(Debug, Clone, Copy)]
pub struct Scorer<'a> {
    prefs: &'a Preferences,
}

impl<'a> Scorer<'a> {
    /// Creates a scorer for the given preferences.
    pub fn new(prefs: &'a Preferences) -> Self {
        Self { prefs }
    }

    /// Time score of a single cell by period.
    ///
    /// Hard-avoided periods score zero regardless of mode; otherwise the
    /// curve is selected by `time_mode`, normalized to roughly 0–100.
    pub fn cell_time_score(&self, period: u8) -> f64 {
        if self.prefs.avoid_early_morning && period == 1 {
            return 0.0;
        }
        if self.prefs.avoid_late_evening && period == 7 {
            return 0.0;
        }
        let p = f64::from(period);
        match self.prefs.time_mode {
            TimeMode::Morning => (115.0 - 15.0 * p).max(0.0),
            TimeMode::Afternoon => (10.0 + 15.0 * (p - 1.0)).max(0.0),
            TimeMode::Middle => (100.0 - 30.0 * (p - 4.0).abs()).max(0.0),
            TimeMode::None => 50.0,
        }
    }

    /// Faculty preference score for a course/faculty pairing.
    pub fn faculty_score(&self, course: CourseId, faculty: Option<&str>) -> f64 {
        faculty
            .and_then(|name| self.prefs.faculty_rank(course, name))
            .and_then(|rank| FACULTY_RANK_SCORES.get(rank).copied())
            .unwrap_or(0.0)
    }

    /// Gap heuristic: cells far from mid-day are more likely to create
    /// idle periods. Returns a non-positive value averaged over the cells.
    pub fn gap_penalty(&self, cells: &[CellTiming]) -> f64 {
        if cells.is_empty() {
            return 0.0;
        }
        let total: f64 = cells
            .iter()
            .map(|c| (f64::from(c.period) - 4.0).abs() * GAP_PENALTY_PER_PERIOD)
            .sum();
        -total / cells.len() as f64
    }

    /// Full preference score of one candidate.
    ///
    /// `codes` and `cells` run in parallel (one resolved timing per atomic
    /// code). Excluded codes and avoided faculties force the cell score to
    /// a large negative value rather than skipping the candidate.
    pub(crate) fn candidate_score(
        &self,
        course: &CourseRequest,
        slot: &SlotOption,
        codes: &[String],
        cells: &[CellTiming],
    ) -> f64 {
        if cells.is_empty() {
            return 0.0;
        }

        let faculty_score = self.faculty_score(course.id, slot.faculty.as_deref());
        let avoided = self.prefs.is_avoided(slot.faculty.as_deref());

        let mut total = 0.0;
        for (code, cell) in codes.iter().zip(cells) {
            let cell_score = if self.prefs.exclude_slots.contains(code) || avoided {
                EXCLUDED_CELL_SCORE
            } else {
                self.cell_time_score(cell.period)
            };
            total += cell_score + faculty_score;
        }

        let avg = total / cells.len() as f64 + self.gap_penalty(cells);
        avg * f64::from(course.credits.max(1))
    }

    /// Average time score over every cell of an assignment.
    ///
    /// Used by the tiered router to rank pool members on time fit alone.
    pub(crate) fn assignment_time_score(&self, picks: &[&Candidate]) -> f64 {
        let mut total = 0.0;
        let mut cell_count = 0usize;
        for cand in picks {
            for cell in &cand.cells {
                total += self.cell_time_score(cell.period);
                cell_count += 1;
            }
        }
        if cell_count == 0 {
            0.0
        } else {
            total / cell_count as f64
        }
    }

    /// Summed faculty priority score over an assignment.
    pub(crate) fn faculty_priority_score(&self, picks: &[&Candidate]) -> f64 {
        picks
            .iter()
            .map(|c| self.faculty_score(c.slot.course_id, c.slot.faculty.as_deref()))
            .sum()
    }

    /// Number of picks whose faculty is on the course's preference list.
    pub(crate) fn preferred_matches(&self, picks: &[&Candidate]) -> usize {
        picks
            .iter()
            .filter(|c| {
                self.prefs
                    .is_preferred(c.slot.course_id, c.slot.faculty.as_deref())
            })
            .count()
    }
}

/// Plain average of precomputed candidate scores.
pub(crate) fn average_candidate_score(picks: &[&Candidate]) -> f64 {
    if picks.is_empty() {
        return 0.0;
    }
    picks.iter().map(|c| c.score).sum::<f64>() / picks.len() as f64
}

/// Summed candidate scores reduced by the day-gap and Saturday penalties.
///
/// Used by the strategies that explicitly trade quality for spread
/// (diverse and similar search).
pub(crate) fn penalized_sum_score(picks: &[&Candidate], details: &Diagnostics) -> f64 {
    let sum: f64 = picks.iter().map(|c| c.score).sum();
    sum - 2.0 * f64::from(details.total_gaps) - 3.0 * f64::from(details.saturday_cells)
}
