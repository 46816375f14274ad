use std::sync::Arc;

use crate::color::BranchColors;
use crate::dashboard::{DashboardOptions, DashboardView};
use crate::data::filter::{FilterSelection, Selector};
use crate::data::model::PlacementStore;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Both datasets, loaded once at startup.
    pub store: PlacementStore,

    pub options: DashboardOptions,

    /// Active year / branch selectors.
    pub selection: FilterSelection,

    /// Aggregates for `selection`, rebuilt on every selector change.
    pub view: DashboardView,

    /// Selector choices: "All" plus every value seen in the placement sheet.
    pub year_options: Vec<Selector>,
    pub branch_options: Vec<Selector>,

    pub branch_colors: BranchColors,

    /// Raw bytes of the QR image, if it could be read.
    pub qr_image: Option<Arc<[u8]>>,
}

impl AppState {
    pub fn new(store: PlacementStore, options: DashboardOptions, qr_image: Option<Arc<[u8]>>) -> Self {
        let selection = FilterSelection::default();
        let view = DashboardView::compute(&store, &selection, &options);
        Self {
            year_options: Selector::options(&store.years),
            branch_options: Selector::options(&store.branches),
            branch_colors: BranchColors::new(&store.branches),
            store,
            options,
            selection,
            view,
            qr_image,
        }
    }

    /// Recompute the dashboard for the current selection.
    pub fn refresh(&mut self) {
        self.view = DashboardView::compute(&self.store, &self.selection, &self.options);
    }

    pub fn set_year(&mut self, year: Selector) {
        if self.selection.year != year {
            self.selection.year = year;
            self.refresh();
        }
    }

    pub fn set_branch(&mut self, branch: Selector) {
        if self.selection.branch != branch {
            self.selection.branch = branch;
            self.refresh();
        }
    }
}
