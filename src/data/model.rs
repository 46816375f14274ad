use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// CellValue – a single spreadsheet cell
// ---------------------------------------------------------------------------

/// A dynamically-typed cell as read from a spreadsheet, CSV, JSON or Parquet
/// table.
///
/// Integers and floats compare numerically with each other so a year stored
/// as `2020` in one file and `2020.0` in another is the same category.
#[derive(Debug, Clone)]
pub enum CellValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    /// Numeric view of the cell, if it holds a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Text of the cell, `None` for empty cells. Numbers are stringified.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            CellValue::Text(s) if s.is_empty() => None,
            other => Some(other.to_string()),
        }
    }
}

// -- Manual Eq/Ord so CellValue can key BTreeMap / BTreeSet --

fn rank(v: &CellValue) -> u8 {
    match v {
        CellValue::Null => 0,
        CellValue::Bool(_) => 1,
        CellValue::Integer(_) | CellValue::Float(_) => 2,
        CellValue::Text(_) => 3,
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> Ordering {
        use CellValue::*;
        let (ra, rb) = (rank(self), rank(other));
        if ra != rb {
            return ra.cmp(&rb);
        }
        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Integer(a), Float(b)) => (*a as f64).total_cmp(b),
            (Float(a), Integer(b)) => a.total_cmp(&(*b as f64)),
            (Text(a), Text(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CellValue {}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        rank(self).hash(state);
        match self {
            CellValue::Null => {}
            CellValue::Bool(b) => b.hash(state),
            CellValue::Integer(i) => i.hash(state),
            // Integral floats must hash like the equal Integer.
            CellValue::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                (*f as i64).hash(state)
            }
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Text(s) => s.hash(state),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => write!(f, "<null>"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Null => serializer.serialize_none(),
            CellValue::Bool(b) => serializer.serialize_bool(*b),
            CellValue::Integer(i) => serializer.serialize_i64(*i),
            // Whole-number floats (spreadsheet years) serialize like their display form.
            CellValue::Float(v) if v.fract() == 0.0 && v.abs() < 9.0e15 => {
                serializer.serialize_i64(*v as i64)
            }
            CellValue::Float(v) => serializer.serialize_f64(*v),
            CellValue::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One row of the per-student placement sheet.
///
/// A row with a package counts as a placement. A student with several offers
/// appears once per offer.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentRecord {
    pub name: Option<String>,
    pub year: CellValue,
    pub branch: CellValue,
    pub company: Option<String>,
    /// Offered package in LPA.
    pub package: Option<f64>,
}

impl StudentRecord {
    pub fn is_placed(&self) -> bool {
        self.package.is_some()
    }
}

/// One row of the per-branch report sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchSummaryRecord {
    pub branch: String,
    pub eligible_students: u64,
    pub placed_students: u64,
}

// ---------------------------------------------------------------------------
// PlacementStore – both loaded datasets
// ---------------------------------------------------------------------------

/// Both datasets, loaded once and never mutated, plus the selector domains.
#[derive(Debug, Clone)]
pub struct PlacementStore {
    pub students: Vec<StudentRecord>,
    pub branch_summaries: Vec<BranchSummaryRecord>,
    /// Sorted distinct non-null years of the student sheet.
    pub years: Vec<CellValue>,
    /// Sorted distinct non-null branches of the student sheet.
    pub branches: Vec<CellValue>,
}

impl PlacementStore {
    pub fn new(students: Vec<StudentRecord>, branch_summaries: Vec<BranchSummaryRecord>) -> Self {
        let mut years = BTreeSet::new();
        let mut branches = BTreeSet::new();
        for rec in &students {
            if !rec.year.is_null() {
                years.insert(rec.year.clone());
            }
            if !rec.branch.is_null() {
                branches.insert(rec.branch.clone());
            }
        }
        PlacementStore {
            students,
            branch_summaries,
            years: years.into_iter().collect(),
            branches: branches.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }
}
