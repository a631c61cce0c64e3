//! Per-solution diagnostic detail.
//!
//! Every finished solution carries a [`Diagnostics`] value: how many
//! courses matched a preferred faculty, the idle periods wedged between
//! classes on each day, and the Saturday load. These are informational —
//! they never gate acceptance, except where a strategy explicitly folds
//! gaps and Saturday cells into its score.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::candidates::Candidate;
use crate::models::Preferences;
use crate::timing::Day;

/// Which search strategy produced a solution.
///
/// Also fixes the meaning of [`Solution::score`](crate::models::Solution):
/// average candidate score for the enumerating strategies, time score or
/// faculty priority score for the tiered router, cumulative score for beam
/// search, penalized sum for the diversity-oriented strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMethod {
    /// Exhaustive backtracking enumeration.
    Exhaustive,
    /// Randomized pool sampling, ranked by preference score.
    RandomPool,
    /// Uniform random sampling, unscored.
    Random,
    /// Random pool ranked purely by time score.
    TimeRanked,
    /// Tiered by faculty-match count, ranked by priority within a tier.
    TieredFacultyPriority,
    /// Tiered by faculty-match count, ranked by time score within a tier.
    TieredTimeRanked,
    /// Beam search over cumulative scores.
    Beam,
    /// Diversity-gated sampling.
    Diverse,
    /// Local variation around a reference solution.
    Similar,
}

/// Informational detail attached to each solution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Strategy that produced the solution.
    pub method: SearchMethod,
    /// Courses whose chosen faculty is on their preference list.
    pub preferred_faculty_matches: usize,
    /// Idle periods strictly between the first and last class, per day.
    pub gaps_per_day: BTreeMap<Day, u32>,
    /// Sum of all per-day gaps.
    pub total_gaps: u32,
    /// Number of cells scheduled on Saturday.
    pub saturday_cells: u32,
    /// Faculty-match tier, for the tiered router.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<usize>,
    /// Average time score, where the strategy ranked on it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_score: Option<f64>,
    /// Summed faculty priority score, where the strategy ranked on it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faculty_priority_score: Option<f64>,
    /// Size of the sampled pool the solution was drawn from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool_size: Option<usize>,
    /// Number of complete assignments the enumeration visited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_enumerated: Option<usize>,
}

impl Diagnostics {
    /// Creates empty diagnostics for the given method.
    pub fn new(method: SearchMethod) -> Self {
        Self {
            method,
            preferred_faculty_matches: 0,
            gaps_per_day: BTreeMap::new(),
            total_gaps: 0,
            saturday_cells: 0,
            tier: None,
            time_score: None,
            faculty_priority_score: None,
            pool_size: None,
            total_enumerated: None,
        }
    }

    /// Assembles diagnostics for a complete assignment.
    pub(crate) fn collect(
        method: SearchMethod,
        picks: &[&Candidate],
        prefs: &Preferences,
    ) -> Self {
        let mut details = Self::new(method);

        for cand in picks {
            if prefs.is_preferred(cand.slot.course_id, cand.slot.faculty.as_deref()) {
                details.preferred_faculty_matches += 1;
            }
        }

        let mut day_periods: BTreeMap<Day, Vec<u8>> = BTreeMap::new();
        for cand in picks {
            for cell in &cand.cells {
                day_periods.entry(cell.day).or_default().push(cell.period);
                if cell.day == Day::Sat {
                    details.saturday_cells += 1;
                }
            }
        }

        for (day, mut periods) in day_periods {
            periods.sort_unstable();
            let mut gaps = 0u32;
            for pair in periods.windows(2) {
                gaps += u32::from(pair[1].saturating_sub(pair[0]).saturating_sub(1));
            }
            details.gaps_per_day.insert(day, gaps);
            details.total_gaps += gaps;
        }

        details
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidates::CandidateIndex;
    use crate::models::{CourseRequest, SlotOption};
    use crate::timing::TimingIndex;

    fn collect_for(slots: Vec<SlotOption>, prefs: &Preferences) -> Diagnostics {
        let courses: Vec<CourseRequest> = slots
            .iter()
            .map(|s| CourseRequest::new(s.course_id.0, format!("C{}", s.course_id)))
            .collect();
        let index = CandidateIndex::build(&courses, &slots, prefs, &TimingIndex::standard());
        let picks: Vec<&_> = index.candidates.iter().collect();
        Diagnostics::collect(SearchMethod::Exhaustive, &picks, prefs)
    }

    #[test]
    fn test_gaps_per_day() {
        // MON periods 1 and 3 leave one idle period between them.
        let details = collect_for(
            vec![
                SlotOption::new(10, 1, "A11"), // MON p1
                SlotOption::new(20, 2, "C11"), // MON p3
            ],
            &Preferences::default(),
        );

        assert_eq!(details.gaps_per_day.get(&Day::Mon), Some(&1));
        assert_eq!(details.total_gaps, 1);
        assert_eq!(details.saturday_cells, 0);
    }

    #[test]
    fn test_adjacent_periods_have_no_gap() {
        let details = collect_for(
            vec![
                SlotOption::new(10, 1, "A11"), // MON p1
                SlotOption::new(20, 2, "B11"), // MON p2
            ],
            &Preferences::default(),
        );
        assert_eq!(details.gaps_per_day.get(&Day::Mon), Some(&0));
        assert_eq!(details.total_gaps, 0);
    }

    #[test]
    fn test_gaps_span_days_independently() {
        // MON p1/p4 (gap 2) and TUE p2/p4 (gap 1).
        let details = collect_for(
            vec![
                SlotOption::new(10, 1, "A11+A21"),
                SlotOption::new(20, 2, "E11+D21"),
            ],
            &Preferences::default(),
        );
        assert_eq!(details.gaps_per_day.get(&Day::Mon), Some(&2));
        assert_eq!(details.gaps_per_day.get(&Day::Tue), Some(&1));
        assert_eq!(details.total_gaps, 3);
    }

    #[test]
    fn test_saturday_cells() {
        let details = collect_for(
            vec![
                SlotOption::new(10, 1, "D13+E13"), // SAT p1, p2
                SlotOption::new(20, 2, "A11"),     // MON p1
            ],
            &Preferences::default(),
        );
        assert_eq!(details.saturday_cells, 2);
    }

    #[test]
    fn test_preferred_faculty_matches() {
        let prefs = Preferences::default()
            .with_faculty_preference(1u64, ["Rao"])
            .with_faculty_preference(2u64, ["Iyer"]);
        let details = collect_for(
            vec![
                SlotOption::new(10, 1, "A11").with_faculty("Rao"),
                SlotOption::new(20, 2, "D11").with_faculty("Nair"),
            ],
            &prefs,
        );
        assert_eq!(details.preferred_faculty_matches, 1);
    }

    #[test]
    fn test_serde_skips_unset_extras() {
        let details = Diagnostics::new(SearchMethod::Beam);
        let json = serde_json::to_string(&details).unwrap();
        assert!(json.contains("\"method\":\"beam\""));
        assert!(!json.contains("tier"));
        assert!(!json.contains("pool_size"));
    }
}
