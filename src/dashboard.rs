use serde::Serialize;

use crate::data::aggregate::{
    self, BranchAverage, BranchPlacement, CompanyCount, HistogramBin, SummaryScalars, YearAverage,
    YearCount,
};
use crate::data::filter::{FilterSelection, filter_records};
use crate::data::model::PlacementStore;

/// Tunables for one dashboard build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardOptions {
    /// Bars in the top hiring companies chart.
    pub top_companies: usize,
    /// Buckets in the package distribution histogram.
    pub histogram_bins: usize,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            top_companies: 7,
            histogram_bins: 10,
        }
    }
}

/// Per-branch breakdown: averages across branches when no branch is
/// selected, otherwise the selected branch's distribution and summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BranchBreakdown {
    Averages {
        branches: Vec<BranchAverage>,
    },
    Distribution {
        histogram: Vec<HistogramBin>,
        summary: SummaryScalars,
    },
}

/// Shown only when every branch is selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub year: String,
    pub branch: String,
    pub students_placed: usize,
}

/// Everything the presentation layer draws for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub year: String,
    pub branch: String,
    pub matching_records: usize,
    pub total_placed: usize,
    pub yearly_placements: Vec<YearCount>,
    pub yearly_average_package: Vec<YearAverage>,
    pub top_companies: Vec<CompanyCount>,
    pub breakdown: BranchBreakdown,
    pub summary: Option<DashboardSummary>,
    pub branch_placements: Vec<BranchPlacement>,
}

impl DashboardView {
    /// Recompute every aggregate from scratch for `selection`.
    pub fn compute(store: &PlacementStore, selection: &FilterSelection, options: &DashboardOptions) -> Self {
        let view = filter_records(&store.students, selection);
        let visible = || view.iter().copied();

        let total_placed = aggregate::total_placed_count(visible());
        let breakdown = if selection.branch.is_all() {
            BranchBreakdown::Averages {
                branches: aggregate::branch_average_package(visible()),
            }
        } else {
            BranchBreakdown::Distribution {
                histogram: aggregate::package_distribution(visible(), options.histogram_bins),
                summary: aggregate::branch_summary_scalars(visible()),
            }
        };
        let summary = selection.branch.is_all().then(|| DashboardSummary {
            year: selection.year.to_string(),
            branch: selection.branch.to_string(),
            students_placed: total_placed,
        });

        log::debug!(
            "Dashboard for year={} branch={}: {} of {} rows",
            selection.year,
            selection.branch,
            view.len(),
            store.len()
        );

        DashboardView {
            year: selection.year.to_string(),
            branch: selection.branch.to_string(),
            matching_records: view.len(),
            total_placed,
            yearly_placements: aggregate::yearly_placed_counts(&store.students),
            yearly_average_package: aggregate::yearly_average_package(&store.students),
            top_companies: aggregate::top_companies(visible(), options.top_companies),
            breakdown,
            summary,
            branch_placements: aggregate::branch_placements(selection, &store.branch_summaries),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::Selector;
    use crate::data::model::{BranchSummaryRecord, CellValue, StudentRecord};

    fn store() -> PlacementStore {
        let rec = |name: &str, year: i64, branch: &str, company: &str, package: Option<f64>| StudentRecord {
            name: Some(name.to_string()),
            year: CellValue::Integer(year),
            branch: branch.into(),
            company: Some(company.to_string()),
            package,
        };
        PlacementStore::new(
            vec![
                rec("Asha", 2022, "CSE", "Infosys", Some(6.0)),
                rec("Asha", 2022, "CSE", "Google", Some(30.0)),
                rec("Ravi", 2022, "ECE", "Infosys", Some(4.0)),
                rec("Meena", 2023, "CSE", "TCS", Some(5.0)),
                rec("Kiran", 2023, "ECE", "TCS", None),
            ],
            vec![
                BranchSummaryRecord { branch: "CSE".into(), eligible_students: 3, placed_students: 2 },
                BranchSummaryRecord { branch: "ECE".into(), eligible_students: 2, placed_students: 3 },
                BranchSummaryRecord { branch: "MECH".into(), eligible_students: 4, placed_students: 0 },
            ],
        )
    }

    #[test]
    fn all_branches_shows_averages_and_summary() {
        let store = store();
        let view = DashboardView::compute(&store, &FilterSelection::default(), &DashboardOptions::default());

        assert_eq!(view.matching_records, 5);
        assert_eq!(view.total_placed, 3);
        assert!(matches!(view.breakdown, BranchBreakdown::Averages { ref branches } if branches.len() == 2));
        assert_eq!(
            view.summary,
            Some(DashboardSummary { year: "All".into(), branch: "All".into(), students_placed: 3 })
        );
        let pies: Vec<&str> = view.branch_placements.iter().map(|p| p.branch.as_str()).collect();
        assert_eq!(pies, ["CSE", "ECE", "MECH"]);
        assert_eq!(view.branch_placements[1].unplaced, 0);
    }

    #[test]
    fn single_branch_shows_distribution() {
        let store = store();
        let selection = FilterSelection {
            year: Selector::Only(CellValue::Integer(2022)),
            branch: Selector::Only("CSE".into()),
        };
        let view = DashboardView::compute(&store, &selection, &DashboardOptions::default());

        assert_eq!(view.matching_records, 2);
        assert!(view.summary.is_none());
        match &view.breakdown {
            BranchBreakdown::Distribution { histogram, summary } => {
                assert_eq!(histogram.iter().map(|b| b.count).sum::<usize>(), 2);
                assert_eq!(summary.max_package, 30.0);
                assert_eq!(summary.top_recruiters, ["Infosys", "Google"]);
            }
            other => panic!("expected distribution, got {other:?}"),
        }
        assert_eq!(view.branch_placements.len(), 1);
        // Trend charts always cover the whole sheet.
        assert_eq!(view.yearly_placements.len(), 2);
    }

    #[test]
    fn empty_selection_does_not_panic() {
        let store = store();
        let selection = FilterSelection {
            year: Selector::Only(CellValue::Integer(1999)),
            branch: Selector::Only("CIVIL".into()),
        };
        let view = DashboardView::compute(&store, &selection, &DashboardOptions::default());

        assert_eq!(view.total_placed, 0);
        assert!(view.top_companies.is_empty());
        assert!(view.branch_placements.is_empty());
        let BranchBreakdown::Distribution { histogram, summary } = &view.breakdown else {
            panic!("expected distribution");
        };
        assert!(histogram.is_empty());
        assert!(summary.mean_package.is_nan());

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["breakdown"]["kind"], "distribution");
        assert!(json["breakdown"]["summary"]["mean_package"].is_null());
    }
}
