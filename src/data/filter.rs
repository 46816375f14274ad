use std::fmt;

use super::model::{CellValue, StudentRecord};

// ---------------------------------------------------------------------------
// Selector: "All" or one exact value
// ---------------------------------------------------------------------------

/// One dimension of the filter. `All` applies no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Selector {
    #[default]
    All,
    Only(CellValue),
}

impl Selector {
    pub fn matches(&self, value: &CellValue) -> bool {
        match self {
            Selector::All => true,
            Selector::Only(wanted) => wanted == value,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selector::All)
    }

    /// Resolve user text against the known values of a dimension.
    ///
    /// `"All"` (any case) is the sentinel. Text that names no known value
    /// still produces a selector; it simply matches nothing.
    pub fn parse(raw: &str, domain: &[CellValue]) -> Self {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("all") {
            return Selector::All;
        }
        match domain.iter().find(|v| v.to_string() == raw) {
            Some(v) => Selector::Only(v.clone()),
            None => {
                log::warn!("'{raw}' is not a known value; the selection will be empty");
                Selector::Only(CellValue::Text(raw.to_string()))
            }
        }
    }

    /// "All" followed by every value of the domain, for selector widgets.
    pub fn options(domain: &[CellValue]) -> Vec<Selector> {
        std::iter::once(Selector::All)
            .chain(domain.iter().cloned().map(Selector::Only))
            .collect()
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::All => write!(f, "All"),
            Selector::Only(v) => write!(f, "{v}"),
        }
    }
}

// ---------------------------------------------------------------------------
// FilterSelection
// ---------------------------------------------------------------------------

/// The two active selectors for one render cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub year: Selector,
    pub branch: Selector,
}

impl FilterSelection {
    pub fn matches(&self, record: &StudentRecord) -> bool {
        self.year.matches(&record.year) && self.branch.matches(&record.branch)
    }
}

/// Records passing both selectors, in input order.
pub fn filter_records<'a, I>(records: I, selection: &FilterSelection) -> Vec<&'a StudentRecord>
where
    I: IntoIterator<Item = &'a StudentRecord>,
{
    records
        .into_iter()
        .filter(|rec| selection.matches(rec))
        .collect()
}
