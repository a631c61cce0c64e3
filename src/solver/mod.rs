//! The generation session.
//!
//! A [`Solver`] is built once per request from the caller's courses, slot
//! options, and preferences. Construction validates the input, materializes
//! the candidate index (collecting warnings for faulty options), and fails
//! fast on caller errors — a course left with no usable candidate is an
//! input error, distinct from an unsatisfiable instance, which search
//! reports as an empty result.
//!
//! Search strategies live in the submodules and share the index, the
//! conflict matrix, one seedable random generator, and the assembly helpers
//! defined here. All budgets are hard caps: exhausting one returns whatever
//! was accumulated, never an error.

mod beam;
mod diverse;
mod exhaustive;
mod sampling;
mod similar;
mod tiered;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::candidates::{Candidate, CandidateIndex};
use crate::diagnostics::{Diagnostics, SearchMethod};
use crate::models::{CourseRequest, Preferences, SlotOption, Solution};
use crate::timing::TimingIndex;
use crate::validation::{self, ValidationError, ValidationErrorKind};

/// Input container for one generation session.
#[derive(Debug, Clone)]
pub struct SolveRequest {
    /// Courses to cover, one slot option each.
    pub courses: Vec<CourseRequest>,
    /// Slot options of all courses.
    pub slots: Vec<SlotOption>,
    /// Generation preferences.
    pub preferences: Preferences,
    /// Timing table and exclusion groups.
    pub timing: TimingIndex,
    /// Seed for the random generator; random per session when unset.
    pub seed: Option<u64>,
}

impl SolveRequest {
    /// Creates a request with default preferences and the standard timing
    /// table.
    pub fn new(courses: Vec<CourseRequest>, slots: Vec<SlotOption>) -> Self {
        Self {
            courses,
            slots,
            preferences: Preferences::default(),
            timing: TimingIndex::standard(),
            seed: None,
        }
    }

    /// Sets the preferences.
    pub fn with_preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = preferences;
        self
    }

    /// Sets a custom timing table.
    pub fn with_timing(mut self, timing: TimingIndex) -> Self {
        self.timing = timing;
        self
    }

    /// Fixes the random seed, making every sampling strategy reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Cooperative cancellation flag.
///
/// Cheap to clone; strategies check it between outer-loop iterations and
/// return whatever they have accumulated so far. Budgets remain the
/// primary termination mechanism.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a token in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Sorted-candidate signature used to suppress duplicate solutions.
pub(crate) fn signature(picks: &[usize]) -> Vec<usize> {
    let mut sig = picks.to_vec();
    sig.sort_unstable();
    sig
}

/// Constraint-based section-assignment solver for one session.
///
/// # Example
///
/// ```
/// use timetable_solver::models::{CourseRequest, SlotOption};
/// use timetable_solver::solver::{SolveRequest, Solver};
///
/// let courses = vec![
///     CourseRequest::new(1, "CSE1001"),
///     CourseRequest::new(2, "MAT1011"),
/// ];
/// let slots = vec![
///     SlotOption::new(10, 1, "A11").with_faculty("Rao"),
///     SlotOption::new(11, 1, "B11").with_faculty("Iyer"),
///     SlotOption::new(20, 2, "A11").with_faculty("Das"),
/// ];
///
/// let solver = Solver::new(SolveRequest::new(courses, slots).with_seed(7)).unwrap();
/// let solutions = solver.search_exhaustive(1000, 10);
/// assert_eq!(solutions.len(), 1); // only B11 leaves room for A11
/// ```
#[derive(Debug, Clone)]
pub struct Solver {
    courses: Vec<CourseRequest>,
    preferences: Preferences,
    index: CandidateIndex,
    rng: SmallRng,
    cancel: CancelToken,
}

impl Solver {
    /// Builds a solver session, failing fast on caller errors.
    ///
    /// Validates the request, builds the candidate index (faulty options
    /// become warnings, hard exclusions narrow the filtered domains), and
    /// rejects any course left without a usable candidate.
    pub fn new(request: SolveRequest) -> Result<Self, Vec<ValidationError>> {
        let SolveRequest {
            courses,
            slots,
            preferences,
            timing,
            seed,
        } = request;

        validation::validate_input(&courses, &slots, &preferences)?;

        let mut rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };

        let mut index = CandidateIndex::build(&courses, &slots, &preferences, &timing);

        let empty: Vec<ValidationError> = courses
            .iter()
            .enumerate()
            .filter(|&(i, _)| index.domains[i].is_empty())
            .map(|(_, course)| {
                ValidationError::new(
                    ValidationErrorKind::EmptyDomain,
                    format!("No usable slot options remain for course '{}'", course.code),
                )
            })
            .collect();
        if !empty.is_empty() {
            return Err(empty);
        }

        index.order_greedy(&mut rng);

        Ok(Self {
            courses,
            preferences,
            index,
            rng,
            cancel: CancelToken::new(),
        })
    }

    /// Attaches a cancellation token checked between search iterations.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Warnings collected while filtering faulty slot options.
    pub fn warnings(&self) -> &[String] {
        &self.index.warnings
    }

    /// The courses of this session, in request order.
    pub fn courses(&self) -> &[CourseRequest] {
        &self.courses
    }

    /// Current filtered domain size of a course, by request position.
    pub fn domain_size(&self, course: usize) -> usize {
        self.index.domains[course].len()
    }

    /// AC-3 domain reduction over all course pairs.
    ///
    /// Removes candidates with no conflict-free counterpart in some other
    /// course's domain; a removal re-enqueues the arcs pointing into the
    /// revised course. Returns `false` when a domain empties out, which
    /// means the instance is unsatisfiable. Pure pruning — the set of
    /// complete assignments is unchanged — and idempotent.
    pub fn reduce_domains(&mut self) -> bool {
        let n = self.courses.len();
        if n < 2 {
            return true;
        }

        let mut queue: VecDeque<(usize, usize)> = (0..n)
            .flat_map(|a| (0..n).filter(move |&b| b != a).map(move |b| (a, b)))
            .collect();

        while let Some((a, b)) = queue.pop_front() {
            if self.index.revise(a, b) {
                if self.index.domains[a].is_empty() {
                    return false;
                }
                for c in (0..n).filter(|&c| c != a && c != b) {
                    queue.push_back((c, a));
                }
            }
        }
        true
    }

    /// Narrows each course's domain to its preferred faculties, where that
    /// leaves anything.
    ///
    /// Soft: a course whose preference list matches none of its candidates
    /// keeps its full domain.
    pub fn restrict_to_preferred_faculties(&mut self) {
        for (course_idx, course) in self.courses.iter().enumerate() {
            let Some(preferred) = self.preferences.course_faculty_preferences.get(&course.id)
            else {
                continue;
            };
            if preferred.is_empty() {
                continue;
            }
            let kept: Vec<usize> = self.index.domains[course_idx]
                .iter()
                .copied()
                .filter(|&i| {
                    self.index.candidates[i]
                        .slot
                        .faculty
                        .as_deref()
                        .is_some_and(|name| preferred.iter().any(|p| p == name))
                })
                .collect();
            if !kept.is_empty() {
                self.index.domains[course_idx] = kept;
            }
        }
    }

    /// Course positions ordered by ascending domain size
    /// (most-constrained-first).
    fn constrained_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.courses.len()).collect();
        order.sort_by_key(|&c| self.index.domains[c].len());
        order
    }

    /// Arena candidates of an assignment, in caller course order.
    fn candidate_refs(&self, picks: &[usize]) -> Vec<&Candidate> {
        let mut refs: Vec<&Candidate> = picks.iter().map(|&i| &self.index.candidates[i]).collect();
        refs.sort_by_key(|c| c.course);
        refs
    }

    /// Diagnostics for an assignment.
    fn details_for(&self, picks: &[usize], method: SearchMethod) -> Diagnostics {
        Diagnostics::collect(method, &self.candidate_refs(picks), &self.preferences)
    }

    /// Builds the outgoing solution for an assignment.
    fn assemble(&self, picks: &[usize], score: f64, details: Diagnostics) -> Solution {
        let refs = self.candidate_refs(picks);
        let total_credits = refs.iter().map(|c| self.courses[c.course].credits).sum();
        Solution {
            picks: refs.iter().map(|c| c.slot.clone()).collect(),
            score,
            total_credits,
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CourseRequest, Preferences, SlotOption};

    fn sample_request() -> SolveRequest {
        let courses = vec![
            CourseRequest::new(1, "CSE1001").with_credits(4),
            CourseRequest::new(2, "MAT1011").with_credits(3),
        ];
        let slots = vec![
            SlotOption::new(10, 1, "A11").with_faculty("Rao"),
            SlotOption::new(11, 1, "B11").with_faculty("Iyer"),
            SlotOption::new(20, 2, "A11").with_faculty("Das"),
            SlotOption::new(21, 2, "D11").with_faculty("Nair"),
        ];
        SolveRequest::new(courses, slots).with_seed(42)
    }

    #[test]
    fn test_construction_collects_warnings() {
        let mut request = sample_request();
        request.slots.push(SlotOption::new(30, 1, "Z99").with_faculty("Ghost"));
        let solver = Solver::new(request).unwrap();
        assert_eq!(solver.warnings().len(), 1);
        assert!(solver.warnings()[0].contains("Ghost"));
    }

    #[test]
    fn test_construction_rejects_invalid_input() {
        let mut request = sample_request();
        request.courses[1] = request.courses[0].clone();
        let errors = Solver::new(request).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId));
    }

    #[test]
    fn test_empty_domain_is_a_caller_error() {
        // The only option of MAT1011 names an avoided faculty.
        let mut request = sample_request();
        request.slots.retain(|s| s.id.0 != 21);
        request.preferences = Preferences::default().with_avoided_faculty("Das");
        let errors = Solver::new(request).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::EmptyDomain);
        assert!(errors[0].message.contains("MAT1011"));
    }

    #[test]
    fn test_reduce_domains_prunes_unsupported() {
        // CSE1001's A11 collides with MAT1011's only option A11.
        let mut request = sample_request();
        request.slots.retain(|s| s.id.0 != 21);
        let mut solver = Solver::new(request).unwrap();

        assert!(solver.reduce_domains());
        assert_eq!(solver.domain_size(0), 1);
        assert_eq!(solver.domain_size(1), 1);
    }

    #[test]
    fn test_reduce_domains_detects_unsatisfiable() {
        let courses = vec![
            CourseRequest::new(1, "CSE1001"),
            CourseRequest::new(2, "MAT1011"),
        ];
        let slots = vec![
            SlotOption::new(10, 1, "A11"),
            SlotOption::new(20, 2, "A11"),
        ];
        let mut solver = Solver::new(SolveRequest::new(courses, slots).with_seed(1)).unwrap();
        assert!(!solver.reduce_domains());
    }

    #[test]
    fn test_reduce_domains_is_idempotent() {
        let mut request = sample_request();
        request.slots.retain(|s| s.id.0 != 21);
        let mut solver = Solver::new(request).unwrap();

        assert!(solver.reduce_domains());
        let first: Vec<usize> = (0..2).map(|c| solver.domain_size(c)).collect();
        assert!(solver.reduce_domains());
        let second: Vec<usize> = (0..2).map(|c| solver.domain_size(c)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_reduce_domains_trivial_for_single_course() {
        let courses = vec![CourseRequest::new(1, "CSE1001")];
        let slots = vec![SlotOption::new(10, 1, "A11")];
        let mut solver = Solver::new(SolveRequest::new(courses, slots)).unwrap();
        assert!(solver.reduce_domains());
    }

    #[test]
    fn test_restrict_to_preferred_faculties_is_soft() {
        let mut request = sample_request();
        request.preferences = Preferences::default()
            .with_faculty_preference(1u64, ["Rao"])
            .with_faculty_preference(2u64, ["Unknown"]);
        let mut solver = Solver::new(request).unwrap();

        solver.restrict_to_preferred_faculties();
        // CSE1001 narrows to Rao; MAT1011 keeps its full domain.
        assert_eq!(solver.domain_size(0), 1);
        assert_eq!(solver.domain_size(1), 2);
    }

    #[test]
    fn test_cancel_token() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
        let shared = token.clone();
        shared.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_signature_is_order_independent() {
        assert_eq!(signature(&[3, 1, 2]), signature(&[2, 3, 1]));
    }
}
