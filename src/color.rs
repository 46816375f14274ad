use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::CellValue;

/// Line colour of the yearly placements chart.
pub const PLACEMENTS_LINE: Color32 = Color32::from_rgb(70, 130, 180);
/// Line colour of the yearly average package chart.
pub const PACKAGE_LINE: Color32 = Color32::from_rgb(46, 139, 87);
/// Bars of the top companies chart.
pub const COMPANY_BAR: Color32 = Color32::from_rgb(70, 130, 180);
/// Bars of the package histogram.
pub const HISTOGRAM_BAR: Color32 = Color32::from_rgb(78, 121, 167);
/// Donut slices.
pub const PLACED: Color32 = Color32::from_rgb(78, 121, 167);
pub const UNPLACED: Color32 = Color32::from_rgb(242, 142, 43);

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.6);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Branch colours
// ---------------------------------------------------------------------------

/// Stable colour per branch, so a branch keeps its colour when the year
/// selector changes.
#[derive(Debug, Clone)]
pub struct BranchColors {
    mapping: BTreeMap<CellValue, Color32>,
    default_color: Color32,
}

impl BranchColors {
    pub fn new(branches: &[CellValue]) -> Self {
        let mapping = branches
            .iter()
            .cloned()
            .zip(generate_palette(branches.len()))
            .collect();
        BranchColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, branch: &CellValue) -> Color32 {
        self.mapping
            .get(branch)
            .copied()
            .unwrap_or(self.default_color)
    }
}
