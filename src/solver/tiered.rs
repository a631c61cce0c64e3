//! Tiered preference routing.
//!
//! Dispatches on which preference categories are active:
//!
//! 1. neither time nor faculty → uniform random sample, unscored;
//! 2. time only → random pool ranked purely by time score;
//! 3. faculty only → pool tiered by preferred-faculty match count, ranked
//!    by summed priority score within a tier;
//! 4. both → same tiering, ranked by time score within a tier — the match
//!    count dominates and time is the tiebreak.
//!
//! Tiers fill from the highest match count down, so a solution matching
//! every preferred faculty always outranks one matching fewer, whatever
//! their time scores.

use crate::diagnostics::SearchMethod;
use crate::models::Solution;
use crate::scoring::Scorer;

use super::Solver;

/// Pool target shared by the ranked routing modes.
const TIERED_POOL_TARGET: usize = 20_000;

/// One pool member with its routing metrics.
struct PoolEntry {
    picks: Vec<usize>,
    matches: usize,
    time_score: f64,
    priority_score: f64,
}

/// Ranking applied within a faculty-match tier.
enum TierRank {
    FacultyPriority,
    Time,
}

impl Solver {
    /// Routes to one of the four ranking modes and returns up to
    /// `target_size` solutions.
    pub fn search_tiered(&mut self, target_size: usize) -> Vec<Solution> {
        if self.courses.is_empty() {
            return Vec::new();
        }
        let has_faculty = self.preferences.has_faculty_preference();
        let has_time = self.preferences.has_time_preference();

        if !has_faculty && !has_time {
            return self.random_unscored(target_size);
        }

        let pool = self.random_pool(TIERED_POOL_TARGET);
        if pool.is_empty() {
            return Vec::new();
        }

        let scorer = Scorer::new(&self.preferences);
        let entries: Vec<PoolEntry> = pool
            .into_iter()
            .map(|picks| {
                let refs = self.candidate_refs(&picks);
                PoolEntry {
                    matches: scorer.preferred_matches(&refs),
                    time_score: scorer.assignment_time_score(&refs),
                    priority_score: scorer.faculty_priority_score(&refs),
                    picks,
                }
            })
            .collect();

        if has_time && !has_faculty {
            self.rank_by_time(entries, target_size)
        } else if has_faculty && !has_time {
            self.rank_tiered(entries, target_size, TierRank::FacultyPriority)
        } else {
            self.rank_tiered(entries, target_size, TierRank::Time)
        }
    }

    /// Time-only mode: the whole pool ranked by average time score.
    fn rank_by_time(&self, mut entries: Vec<PoolEntry>, target_size: usize) -> Vec<Solution> {
        entries.sort_by(|a, b| {
            b.time_score
                .partial_cmp(&a.time_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let pool_len = entries.len();
        entries
            .iter()
            .take(target_size)
            .map(|entry| {
                let mut details = self.details_for(&entry.picks, SearchMethod::TimeRanked);
                details.time_score = Some(entry.time_score);
                details.pool_size = Some(pool_len);
                self.assemble(&entry.picks, entry.time_score, details)
            })
            .collect()
    }

    /// Faculty-tiered modes: fill tiers from the highest match count down,
    /// ranking within a tier by the selected metric.
    fn rank_tiered(
        &self,
        entries: Vec<PoolEntry>,
        target_size: usize,
        rank: TierRank,
    ) -> Vec<Solution> {
        let pool_len = entries.len();
        let mut results = Vec::new();

        for tier in (0..=self.courses.len()).rev() {
            let mut tier_items: Vec<&PoolEntry> =
                entries.iter().filter(|e| e.matches == tier).collect();
            tier_items.sort_by(|a, b| {
                let (x, y) = match rank {
                    TierRank::FacultyPriority => (b.priority_score, a.priority_score),
                    TierRank::Time => (b.time_score, a.time_score),
                };
                x.partial_cmp(&y).unwrap_or(std::cmp::Ordering::Equal)
            });

            for entry in tier_items {
                if results.len() >= target_size {
                    return results;
                }
                let (method, score) = match rank {
                    TierRank::FacultyPriority => {
                        (SearchMethod::TieredFacultyPriority, entry.priority_score)
                    }
                    TierRank::Time => (SearchMethod::TieredTimeRanked, entry.time_score),
                };
                let mut details = self.details_for(&entry.picks, method);
                details.tier = Some(tier);
                details.pool_size = Some(pool_len);
                match rank {
                    TierRank::FacultyPriority => {
                        details.faculty_priority_score = Some(entry.priority_score);
                    }
                    TierRank::Time => details.time_score = Some(entry.time_score),
                }
                results.push(self.assemble(&entry.picks, score, details));
            }
        }
        results
    }
}
