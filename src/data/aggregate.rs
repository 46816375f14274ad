//! Pure aggregations feeding each chart.
//!
//! Every function takes an iterator of borrowed records so the same code runs
//! over the full sheet (`store.students.iter()`) or a filtered view
//! (`view.iter().copied()`).

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde::Serialize;

use super::filter::{FilterSelection, Selector};
use super::model::{BranchSummaryRecord, CellValue, StudentRecord};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearCount {
    pub year: CellValue,
    pub placed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearAverage {
    pub year: CellValue,
    pub average_package: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyCount {
    pub company: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchAverage {
    pub branch: CellValue,
    /// NaN when the branch has no recorded package.
    pub average_package: f64,
}

/// One histogram bucket, `[start, end)`; the last bucket also holds `end`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Headline numbers for a filtered view. Mean, max and min are NaN when the
/// view holds no package.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryScalars {
    pub mean_package: f64,
    pub max_package: f64,
    pub min_package: f64,
    pub top_recruiters: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchPlacement {
    pub branch: String,
    pub eligible: u64,
    pub placed: u64,
    pub unplaced: u64,
}

/// Distinct student names per year among placed rows.
pub fn yearly_placed_counts<'a, I>(records: I) -> Vec<YearCount>
where
    I: IntoIterator<Item = &'a StudentRecord>,
{
    let mut by_year: BTreeMap<&CellValue, HashSet<&str>> = BTreeMap::new();
    for rec in records.into_iter().filter(|r| r.is_placed()) {
        if rec.year.is_null() {
            continue;
        }
        let names = by_year.entry(&rec.year).or_default();
        if let Some(name) = rec.name.as_deref() {
            names.insert(name);
        }
    }
    by_year
        .into_iter()
        .map(|(year, names)| YearCount { year: year.clone(), placed: names.len() })
        .collect()
}

/// Mean package per year among placed rows.
pub fn yearly_average_package<'a, I>(records: I) -> Vec<YearAverage>
where
    I: IntoIterator<Item = &'a StudentRecord>,
{
    let mut by_year: BTreeMap<&CellValue, Vec<f64>> = BTreeMap::new();
    for rec in records {
        if let (Some(pkg), false) = (rec.package, rec.year.is_null()) {
            by_year.entry(&rec.year).or_default().push(pkg);
        }
    }
    by_year
        .into_iter()
        .map(|(year, pkgs)| YearAverage { year: year.clone(), average_package: mean(&pkgs) })
        .collect()
}

/// Offer counts per company, most frequent first, at most `n` entries.
/// Ties keep the order in which companies were first seen.
pub fn top_companies<'a, I>(records: I, n: usize) -> Vec<CompanyCount>
where
    I: IntoIterator<Item = &'a StudentRecord>,
{
    let mut counts: Vec<CompanyCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for company in records.into_iter().filter_map(|r| r.company.as_deref()) {
        match index.get(company) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(company, counts.len());
                counts.push(CompanyCount { company: company.to_string(), count: 1 });
            }
        }
    }
    // stable
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(n);
    counts
}

/// Mean package per branch, highest first.
pub fn branch_average_package<'a, I>(records: I) -> Vec<BranchAverage>
where
    I: IntoIterator<Item = &'a StudentRecord>,
{
    let mut by_branch: BTreeMap<&CellValue, Vec<f64>> = BTreeMap::new();
    for rec in records {
        if rec.branch.is_null() {
            continue;
        }
        let pkgs = by_branch.entry(&rec.branch).or_default();
        pkgs.extend(rec.package);
    }
    let mut out: Vec<BranchAverage> = by_branch
        .into_iter()
        .map(|(branch, pkgs)| BranchAverage { branch: branch.clone(), average_package: mean(&pkgs) })
        .collect();
    out.sort_by(|a, b| descending_nan_last(a.average_package, b.average_package));
    out
}

/// Equal-width histogram of the recorded packages.
pub fn package_distribution<'a, I>(records: I, bins: usize) -> Vec<HistogramBin>
where
    I: IntoIterator<Item = &'a StudentRecord>,
{
    let values: Vec<f64> = records.into_iter().filter_map(|r| r.package).collect();
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (lo, hi) = if max > min { (min, max) } else { (min - 0.5, min + 0.5) };
    let width = (hi - lo) / bins as f64;

    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            start: lo + i as f64 * width,
            end: if i + 1 == bins { hi } else { lo + (i + 1) as f64 * width },
            count: 0,
        })
        .collect();
    for v in values {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

/// Mean, max and min package plus the three most frequent recruiters.
pub fn branch_summary_scalars<'a, I>(records: I) -> SummaryScalars
where
    I: IntoIterator<Item = &'a StudentRecord> + Clone,
{
    let pkgs: Vec<f64> = records.clone().into_iter().filter_map(|r| r.package).collect();
    let (max, min) = if pkgs.is_empty() {
        (f64::NAN, f64::NAN)
    } else {
        (
            pkgs.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            pkgs.iter().copied().fold(f64::INFINITY, f64::min),
        )
    };
    SummaryScalars {
        mean_package: mean(&pkgs),
        max_package: max,
        min_package: min,
        top_recruiters: top_companies(records, 3)
            .into_iter()
            .map(|c| c.company)
            .collect(),
    }
}

/// Number of distinct student names with a recorded package.
pub fn total_placed_count<'a, I>(records: I) -> usize
where
    I: IntoIterator<Item = &'a StudentRecord>,
{
    records
        .into_iter()
        .filter(|r| r.is_placed())
        .filter_map(|r| r.name.as_deref())
        .collect::<HashSet<_>>()
        .len()
}

/// Eligible / placed / unplaced for one branch of the report sheet.
/// The first matching row wins; unplaced never goes below zero.
pub fn branch_placement(summaries: &[BranchSummaryRecord], branch: &str) -> Option<BranchPlacement> {
    let row = summaries.iter().find(|s| s.branch == branch)?;
    Some(BranchPlacement {
        branch: row.branch.clone(),
        eligible: row.eligible_students,
        placed: row.placed_students,
        unplaced: row.eligible_students.saturating_sub(row.placed_students),
    })
}

/// Branches that get a placed/unplaced chart for this selection: the selected
/// branch, or every report branch in sorted order.
pub fn pie_branches(selection: &FilterSelection, summaries: &[BranchSummaryRecord]) -> Vec<String> {
    match &selection.branch {
        Selector::Only(branch) => vec![branch.to_string()],
        Selector::All => summaries
            .iter()
            .map(|s| s.branch.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect(),
    }
}

/// Placement triples for every branch in [`pie_branches`] that the report
/// sheet knows about.
pub fn branch_placements(selection: &FilterSelection, summaries: &[BranchSummaryRecord]) -> Vec<BranchPlacement> {
    pie_branches(selection, summaries)
        .iter()
        .filter_map(|b| branch_placement(summaries, b))
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn descending_nan_last(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.total_cmp(&a),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::filter_records;

    fn rec(name: &str, year: i64, branch: &str, company: Option<&str>, package: Option<f64>) -> StudentRecord {
        StudentRecord {
            name: Some(name.to_string()),
            year: CellValue::Integer(year),
            branch: branch.into(),
            company: company.map(str::to_string),
            package,
        }
    }

    fn summary(branch: &str, eligible: u64, placed: u64) -> BranchSummaryRecord {
        BranchSummaryRecord {
            branch: branch.to_string(),
            eligible_students: eligible,
            placed_students: placed,
        }
    }

    #[test]
    fn yearly_figures_ignore_unplaced_rows() {
        let data = vec![
            rec("A", 2020, "CS", Some("X"), Some(10.0)),
            rec("B", 2020, "CS", Some("Y"), None),
        ];
        assert_eq!(
            yearly_placed_counts(&data),
            vec![YearCount { year: CellValue::Integer(2020), placed: 1 }]
        );
        assert_eq!(
            yearly_average_package(&data),
            vec![YearAverage { year: CellValue::Integer(2020), average_package: 10.0 }]
        );
    }

    #[test]
    fn multiple_offers_count_once_per_year() {
        let data = vec![
            rec("A", 2021, "CS", Some("X"), Some(8.0)),
            rec("A", 2021, "CS", Some("Y"), Some(12.0)),
            rec("B", 2021, "EE", Some("X"), Some(4.0)),
            rec("C", 2022, "EE", None, None),
        ];
        let counts = yearly_placed_counts(&data);
        assert_eq!(counts, vec![YearCount { year: CellValue::Integer(2021), placed: 2 }]);
        assert_eq!(yearly_average_package(&data)[0].average_package, 8.0);
        assert_eq!(total_placed_count(&data), 2);
    }

    #[test]
    fn years_are_ordered() {
        let data = vec![
            rec("A", 2023, "CS", None, Some(5.0)),
            rec("B", 2021, "CS", None, Some(7.0)),
        ];
        let years: Vec<CellValue> = yearly_placed_counts(&data).into_iter().map(|c| c.year).collect();
        assert_eq!(years, vec![CellValue::Integer(2021), CellValue::Integer(2023)]);
    }

    #[test]
    fn total_placed_is_zero_without_packages() {
        let data = vec![rec("A", 2020, "CS", Some("X"), None)];
        assert_eq!(total_placed_count(&data), 0);
    }

    #[test]
    fn top_companies_takes_most_frequent() {
        let mut data = Vec::new();
        for (company, times) in [("Z", 1), ("Y", 2), ("X", 3)] {
            for i in 0..times {
                data.push(rec(&format!("{company}{i}"), 2020, "CS", Some(company), Some(5.0)));
            }
        }
        assert_eq!(
            top_companies(&data, 2),
            vec![
                CompanyCount { company: "X".into(), count: 3 },
                CompanyCount { company: "Y".into(), count: 2 },
            ]
        );
    }

    #[test]
    fn top_companies_ties_keep_first_seen_order() {
        let data = vec![
            rec("A", 2020, "CS", Some("Beta"), None),
            rec("B", 2020, "CS", Some("Alpha"), None),
            rec("C", 2020, "CS", Some("Alpha"), None),
            rec("D", 2020, "CS", Some("Beta"), None),
            rec("E", 2020, "CS", None, None),
        ];
        let top = top_companies(&data, 7);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].company, "Beta");
        assert_eq!(top[1].company, "Alpha");
        assert!(top.windows(2).all(|w| w[0].count >= w[1].count));
    }

    #[test]
    fn branch_averages_sort_descending() {
        let data = vec![
            rec("A", 2020, "CS", None, Some(10.0)),
            rec("B", 2020, "CS", None, Some(20.0)),
            rec("C", 2020, "EE", None, Some(30.0)),
            rec("D", 2020, "ME", None, None),
        ];
        let avgs = branch_average_package(&data);
        let branches: Vec<String> = avgs.iter().map(|a| a.branch.to_string()).collect();
        assert_eq!(branches, ["EE", "CS", "ME"]);
        assert_eq!(avgs[1].average_package, 15.0);
        assert!(avgs[2].average_package.is_nan());
    }

    #[test]
    fn histogram_covers_every_package() {
        let data: Vec<StudentRecord> = [3.0, 4.0, 4.5, 6.0, 12.0, 30.0]
            .into_iter()
            .enumerate()
            .map(|(i, p)| rec(&i.to_string(), 2020, "CS", None, Some(p)))
            .chain(std::iter::once(rec("x", 2020, "CS", None, None)))
            .collect();
        let bins = package_distribution(&data, 10);
        assert_eq!(bins.len(), 10);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 6);
        assert_eq!(bins[0].start, 3.0);
        assert_eq!(bins[9].end, 30.0);
        assert_eq!(bins[9].count, 1);
        assert_eq!(bins[0].count, 3);
    }

    #[test]
    fn histogram_of_one_value_has_unit_span() {
        let data = vec![rec("A", 2020, "CS", None, Some(7.0)), rec("B", 2020, "CS", None, Some(7.0))];
        let bins = package_distribution(&data, 4);
        assert_eq!(bins.first().map(|b| b.start), Some(6.5));
        assert_eq!(bins.last().map(|b| b.end), Some(7.5));
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 2);
        assert!(package_distribution(&Vec::<StudentRecord>::new(), 10).is_empty());
    }

    #[test]
    fn empty_view_gives_sentinels() {
        let data = vec![rec("A", 2020, "CS", Some("X"), Some(9.0))];
        let sel = FilterSelection {
            year: Selector::Only(CellValue::Integer(1999)),
            branch: Selector::All,
        };
        let view = filter_records(&data, &sel);
        let scalars = branch_summary_scalars(view.iter().copied());
        assert!(scalars.mean_package.is_nan());
        assert!(scalars.max_package.is_nan());
        assert!(scalars.min_package.is_nan());
        assert!(scalars.top_recruiters.is_empty());
        assert!(top_companies(view.iter().copied(), 7).is_empty());
    }

    #[test]
    fn summary_scalars_over_view() {
        let data = vec![
            rec("A", 2020, "CS", Some("X"), Some(4.0)),
            rec("B", 2020, "CS", Some("Y"), Some(10.0)),
            rec("C", 2020, "CS", Some("X"), None),
            rec("D", 2020, "CS", Some("Z"), Some(7.0)),
            rec("E", 2020, "CS", Some("W"), Some(7.0)),
        ];
        let s = branch_summary_scalars(data.iter());
        assert_eq!(s.mean_package, 7.0);
        assert_eq!(s.max_package, 10.0);
        assert_eq!(s.min_package, 4.0);
        assert_eq!(s.top_recruiters, ["X", "Y", "Z"]);
    }

    #[test]
    fn unplaced_is_clamped() {
        let summaries = vec![summary("EE", 50, 60), summary("CS", 80, 60)];
        let ee = branch_placement(&summaries, "EE").unwrap();
        assert_eq!(ee.unplaced, 0);
        assert_eq!(branch_placement(&summaries, "CS").unwrap().unplaced, 20);
        assert_eq!(branch_placement(&summaries, "ME"), None);
    }

    #[test]
    fn duplicate_report_rows_use_first() {
        let summaries = vec![summary("CS", 80, 60), summary("CS", 10, 1)];
        assert_eq!(branch_placement(&summaries, "CS").unwrap().eligible, 80);
    }

    #[test]
    fn pie_branches_follow_selection() {
        let summaries = vec![summary("ME", 10, 5), summary("CS", 80, 60), summary("CS", 1, 1)];
        assert_eq!(pie_branches(&FilterSelection::default(), &summaries), ["CS", "ME"]);

        let only_ee = FilterSelection { year: Selector::All, branch: Selector::Only("EE".into()) };
        assert_eq!(pie_branches(&only_ee, &summaries), ["EE"]);
        assert!(branch_placements(&only_ee, &summaries).is_empty());
        assert_eq!(branch_placements(&FilterSelection::default(), &summaries).len(), 2);
    }
}
