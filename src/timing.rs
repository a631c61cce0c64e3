//! Slot timing reference.
//!
//! Maps atomic slot codes (e.g. `"A11"`) to their day, period, and
//! wall-clock times, and defines the mutual-exclusion pairs that conflict
//! even without a literal time overlap (slots adjacent across the lunch
//! break). Pure lookup tables — no state, safe for concurrent reads.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Teaching day. The timetable runs Monday through Saturday.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Day {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

impl Day {
    /// Short uppercase label ("MON", "TUE", ...).
    pub fn label(&self) -> &'static str {
        match self {
            Day::Mon => "MON",
            Day::Tue => "TUE",
            Day::Wed => "WED",
            Day::Thu => "THU",
            Day::Fri => "FRI",
            Day::Sat => "SAT",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Resolved timing of a single atomic cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellTiming {
    /// Teaching day.
    pub day: Day,
    /// Period within the day, 1-based.
    pub period: u8,
    /// Wall-clock start ("08:30").
    pub start: &'static str,
    /// Wall-clock end ("10:00").
    pub end: &'static str,
}

/// Occupancy set over (day, period) cells.
///
/// Six days of at most eight periods fit in one `u64`, giving O(1)
/// overlap tests during search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellSet(u64);

impl CellSet {
    /// The empty set.
    pub const EMPTY: CellSet = CellSet(0);

    fn bit(day: Day, period: u8) -> u64 {
        1u64 << (day as u64 * 8 + u64::from(period - 1))
    }

    /// Adds a (day, period) cell.
    pub fn insert(&mut self, day: Day, period: u8) {
        self.0 |= Self::bit(day, period);
    }

    /// Whether the given cell is present.
    pub fn contains(&self, day: Day, period: u8) -> bool {
        self.0 & Self::bit(day, period) != 0
    }

    /// Whether the two sets share any cell.
    pub fn intersects(&self, other: CellSet) -> bool {
        self.0 & other.0 != 0
    }

    /// Set union.
    pub fn union(&self, other: CellSet) -> CellSet {
        CellSet(self.0 | other.0)
    }

    /// Number of occupied cells.
    pub fn len(&self) -> u32 {
        self.0.count_ones()
    }

    /// Whether no cell is occupied.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// Two sets of atomic codes that conflict regardless of time overlap.
///
/// A pair of slot options conflicts under a group if one option touches
/// `first` while the other touches `second` (in either direction). Models
/// institution-level scheduling rules; the standard groups pair the
/// pre-lunch band with the post-lunch band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExclusionGroup {
    /// First code set.
    pub first: HashSet<String>,
    /// Second code set.
    pub second: HashSet<String>,
}

impl ExclusionGroup {
    /// Creates a group from two code lists.
    pub fn new<A, B>(first: A, second: B) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        B: IntoIterator,
        B::Item: Into<String>,
    {
        Self {
            first: first.into_iter().map(Into::into).collect(),
            second: second.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether two code lists are linked by this group.
    pub fn links(&self, a: &[String], b: &[String]) -> bool {
        let a_first = a.iter().any(|c| self.first.contains(c));
        let a_second = a.iter().any(|c| self.second.contains(c));
        let b_first = b.iter().any(|c| self.first.contains(c));
        let b_second = b.iter().any(|c| self.second.contains(c));
        (a_first && b_second) || (a_second && b_first)
    }
}

/// Code layout of the standard grid: one row per day, one column per period.
const CODE_GRID: [(Day, [&str; 7]); 6] = [
    (Day::Mon, ["A11", "B11", "C11", "A21", "A14", "B21", "C21"]),
    (Day::Tue, ["D11", "E11", "F11", "D21", "E14", "E21", "F21"]),
    (Day::Wed, ["A12", "B12", "C12", "A22", "B14", "B22", "A24"]),
    (Day::Thu, ["D12", "E12", "F12", "D22", "F14", "E22", "F22"]),
    (Day::Fri, ["A13", "B13", "C13", "A23", "C14", "B23", "B24"]),
    (Day::Sat, ["D13", "E13", "F13", "D23", "D14", "D24", "E23"]),
];

/// Wall-clock bounds per period, shared by every day.
const PERIOD_TIMES: [(&str, &str); 7] = [
    ("08:30", "10:00"),
    ("10:05", "11:35"),
    ("11:40", "13:10"),
    ("13:15", "14:45"),
    ("14:50", "16:20"),
    ("16:25", "17:55"),
    ("18:00", "19:30"),
];

/// Read-only timing table plus mutual-exclusion groups.
///
/// Lookup of an unknown code returns `None`, which marks the owning slot
/// option as faulty upstream.
#[derive(Debug, Clone)]
pub struct TimingIndex {
    cells: HashMap<&'static str, CellTiming>,
    exclusions: Vec<ExclusionGroup>,
}

impl TimingIndex {
    /// Builds the standard 42-code grid with the standard exclusion groups.
    pub fn standard() -> Self {
        let mut cells = HashMap::new();
        for (day, codes) in CODE_GRID {
            for (col, code) in codes.iter().enumerate() {
                let (start, end) = PERIOD_TIMES[col];
                cells.insert(
                    *code,
                    CellTiming {
                        day,
                        period: col as u8 + 1,
                        start,
                        end,
                    },
                );
            }
        }

        let exclusions = vec![
            // Theory band C1 clashes with lab band A2 as a whole.
            ExclusionGroup::new(["C11", "C12", "C13"], ["A21", "A22", "A23"]),
            // Per-day cross-lunch pairs (periods 3 and 4 never overlap in
            // time, yet the pairs are defined to clash).
            ExclusionGroup::new(["C11"], ["A21"]),
            ExclusionGroup::new(["F11"], ["D21"]),
            ExclusionGroup::new(["C12"], ["A22"]),
            ExclusionGroup::new(["F12"], ["D22"]),
            ExclusionGroup::new(["C13"], ["A23"]),
            ExclusionGroup::new(["F13"], ["D23"]),
        ];

        Self { cells, exclusions }
    }

    /// Adds a custom exclusion group.
    pub fn with_exclusion(mut self, group: ExclusionGroup) -> Self {
        self.exclusions.push(group);
        self
    }

    /// Resolves an atomic code; `None` for unknown codes.
    pub fn resolve(&self, code: &str) -> Option<CellTiming> {
        self.cells.get(code).copied()
    }

    /// The configured mutual-exclusion groups.
    pub fn exclusions(&self) -> &[ExclusionGroup] {
        &self.exclusions
    }

    /// Number of known atomic codes.
    pub fn code_count(&self) -> usize {
        self.cells.len()
    }
}

impl Default for TimingIndex {
    fn default() -> Self {
        Self::standard()
    }
}
