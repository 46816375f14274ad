//! Command-line interface definitions.

use std::path::PathBuf;

use clap::Parser;

use crate::dashboard::DashboardOptions;
use crate::data::filter::{FilterSelection, Selector};
use crate::data::model::PlacementStore;

/// Campus placement overview: trends, recruiters and branch outcomes.
#[derive(Parser, Debug)]
#[command(name = "placement-overview", version, about)]
pub struct Cli {
    /// Per-student placement sheet (Name, Year, Branch, Company, Package).
    #[arg(long, default_value = "all_placed_data.xlsx")]
    pub data: PathBuf,

    /// Per-branch report sheet (Branch, Eligible_Students, Placed_Students).
    #[arg(long, default_value = "all_report_data.xlsx")]
    pub report_data: PathBuf,

    /// Image shown in the "Download Report" section.
    #[arg(long, default_value = "QR_link.png")]
    pub qr: PathBuf,

    /// Number of companies in the top hiring chart.
    #[arg(long, default_value_t = 7)]
    pub top_companies: usize,

    /// Number of buckets in the package histogram.
    #[arg(long, default_value_t = 10)]
    pub bins: usize,

    /// Print the dashboard as JSON instead of opening a window.
    #[arg(long)]
    pub report: bool,

    /// Year used by `--report`.
    #[arg(long, default_value = "All")]
    pub year: String,

    /// Branch used by `--report`.
    #[arg(long, default_value = "All")]
    pub branch: String,
}

impl Cli {
    pub fn dashboard_options(&self) -> DashboardOptions {
        DashboardOptions {
            top_companies: self.top_companies,
            histogram_bins: self.bins,
        }
    }

    /// Resolve `--year` / `--branch` against the loaded data.
    pub fn selection(&self, store: &PlacementStore) -> FilterSelection {
        FilterSelection {
            year: Selector::parse(&self.year, &store.years),
            branch: Selector::parse(&self.branch, &store.branches),
        }
    }
}
