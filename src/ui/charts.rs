use std::f64::consts::TAU;
use std::ops::RangeInclusive;

use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoint, PlotPoints, Points, Polygon, Text};

use crate::color;
use crate::dashboard::BranchBreakdown;
use crate::data::aggregate::{BranchAverage, BranchPlacement, CompanyCount, HistogramBin, SummaryScalars};
use crate::state::AppState;

const CHART_HEIGHT: f32 = 260.0;
const DONUT_SEGMENT: f64 = TAU / 180.0;

// ---------------------------------------------------------------------------
// Dashboard page (central panel)
// ---------------------------------------------------------------------------

/// Render every chart and text block for the current selection.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let view = &state.view;

    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading("📈 Placement Overview");
        ui.label("Explore key placement statistics including top hiring companies and package trends.");
    });
    ui.separator();

    ui.vertical_centered(|ui: &mut Ui| ui.heading("📊 Trends Over the Years"));

    let years: Vec<String> = view.yearly_placements.iter().map(|y| y.year.to_string()).collect();
    let placed: Vec<f64> = view.yearly_placements.iter().map(|y| y.placed as f64).collect();
    described(
        ui,
        "Total Students Placed Per Year",
        "This line chart shows the number of students placed each year, allowing you to track \
         the overall placement performance of the institute over time.",
        |ui| year_line(ui, "yearly_placements", &years, &placed, "Placed", color::PLACEMENTS_LINE),
    );

    let years: Vec<String> = view.yearly_average_package.iter().map(|y| y.year.to_string()).collect();
    let averages: Vec<f64> = view.yearly_average_package.iter().map(|y| y.average_package).collect();
    described(
        ui,
        "Average Package Per Year",
        "This graph reflects how the average salary packages have evolved over the years, \
         indicating the demand and compensation trends across all branches.",
        |ui| year_line(ui, "yearly_package", &years, &averages, "Avg Package (LPA)", color::PACKAGE_LINE),
    );

    described(
        ui,
        "🏢 Top Hiring Companies",
        "This chart displays the top companies that hired the most students. It helps identify \
         the most active recruiters on campus.",
        |ui| company_bars(ui, &view.top_companies),
    );

    match &view.breakdown {
        BranchBreakdown::Averages { branches } => described(
            ui,
            "💰 Branchwise Average Package",
            "This bar chart illustrates the average salary received by students in each branch, \
             highlighting departments with the highest compensation.",
            |ui| branch_bars(ui, branches, state),
        ),
        BranchBreakdown::Distribution { histogram, summary } => {
            described(
                ui,
                "Package Distribution",
                "This histogram shows how packages are distributed among students in the selected \
                 branch, giving a sense of range and concentration.",
                |ui| histogram_bars(ui, histogram),
            );
            branch_summary(ui, &view.branch, summary);
        }
    }

    if let Some(summary) = &view.summary {
        ui.separator();
        ui.vertical_centered(|ui: &mut Ui| ui.heading("🔍 Dashboard Summary"));
        bullet(ui, "Year", &summary.year);
        bullet(ui, "Branch", &summary.branch);
        bullet(ui, "Students Placed", &summary.students_placed.to_string());
        bullet(ui, "Top Companies", "Visualized in hiring chart");
        bullet(ui, "Placement by Branch", "Shown via donut charts");
    }

    ui.separator();
    ui.vertical_centered(|ui: &mut Ui| ui.heading("Branchwise Placement Distribution"));
    for placement in &view.branch_placements {
        placement_donut(ui, placement);
    }
}

/// Chart on the left, explanatory text on the right.
fn described(ui: &mut Ui, title: &str, text: &str, chart: impl FnOnce(&mut Ui)) {
    ui.add_space(8.0);
    ui.label(RichText::new(title).strong().size(16.0));
    ui.columns(2, |cols: &mut [Ui]| {
        chart(&mut cols[0]);
        cols[1].label(text);
    });
}

fn bullet(ui: &mut Ui, key: &str, value: &str) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(RichText::new(format!("• {key}:")).strong());
        ui.monospace(value);
    });
}

fn lpa(value: f64) -> String {
    if value.is_nan() {
        "n/a".to_string()
    } else {
        format!("{value:.2} LPA")
    }
}

/// Axis formatter for categorical charts: integer marks become labels,
/// everything else stays blank.
fn category_axis(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let rounded = mark.value.round();
        if (mark.value - rounded).abs() > 1e-6 || rounded < 0.0 {
            return String::new();
        }
        labels.get(rounded as usize).cloned().unwrap_or_default()
    }
}

fn static_plot(id: &str) -> Plot<'_> {
    Plot::new(id)
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
}

// ---------------------------------------------------------------------------
// Individual charts
// ---------------------------------------------------------------------------

fn year_line(ui: &mut Ui, id: &str, years: &[String], values: &[f64], y_label: &str, color: Color32) {
    let points: Vec<[f64; 2]> = values
        .iter()
        .enumerate()
        .map(|(i, &v)| [i as f64, v])
        .collect();

    static_plot(id)
        .x_axis_label("Year")
        .y_axis_label(y_label)
        .x_axis_formatter(category_axis(years.to_vec()))
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(PlotPoints::from(points.clone())).color(color).width(2.0).name(y_label));
            plot_ui.points(Points::new(PlotPoints::from(points)).color(color).radius(4.0));
        });
}

fn company_bars(ui: &mut Ui, companies: &[CompanyCount]) {
    // Most frequent company on top.
    let n = companies.len();
    let labels: Vec<String> = companies.iter().rev().map(|c| c.company.clone()).collect();
    let bars: Vec<Bar> = companies
        .iter()
        .enumerate()
        .map(|(i, c)| {
            Bar::new((n - 1 - i) as f64, c.count as f64)
                .name(&c.company)
                .width(0.6)
        })
        .collect();

    static_plot("top_companies")
        .x_axis_label("No. of Students")
        .y_axis_formatter(category_axis(labels))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(color::COMPANY_BAR).horizontal());
        });
}

fn branch_bars(ui: &mut Ui, branches: &[BranchAverage], state: &AppState) {
    let n = branches.len();
    let labels: Vec<String> = branches.iter().rev().map(|b| b.branch.to_string()).collect();

    static_plot("branch_average")
        .x_axis_label("Avg Package (LPA)")
        .y_axis_formatter(category_axis(labels))
        .show(ui, |plot_ui| {
            for (i, b) in branches.iter().enumerate() {
                if b.average_package.is_nan() {
                    continue;
                }
                let bar = Bar::new((n - 1 - i) as f64, b.average_package).width(0.6);
                plot_ui.bar_chart(
                    BarChart::new(vec![bar])
                        .name(b.branch.to_string())
                        .color(state.branch_colors.color_for(&b.branch))
                        .horizontal(),
                );
            }
        });
}

fn histogram_bars(ui: &mut Ui, histogram: &[HistogramBin]) {
    if histogram.is_empty() {
        ui.label("No packages recorded for this selection.");
        return;
    }
    let bars: Vec<Bar> = histogram
        .iter()
        .map(|b| {
            Bar::new((b.start + b.end) / 2.0, b.count as f64)
                .width(b.end - b.start)
                .name(format!("{:.1}–{:.1}", b.start, b.end))
        })
        .collect();

    static_plot("package_distribution")
        .x_axis_label("Package (LPA)")
        .y_axis_label("No. of Students")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(color::HISTOGRAM_BAR));
        });
}

fn branch_summary(ui: &mut Ui, branch: &str, summary: &SummaryScalars) {
    ui.add_space(8.0);
    ui.label(RichText::new("📊 Branch Summary").strong().size(16.0));
    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].label(
            "This section summarizes the key statistics for the selected branch, helping students \
             and parents quickly understand the placement performance.",
        );
        let ui = &mut cols[1];
        bullet(ui, "Branch", branch);
        bullet(ui, "Average Package", &lpa(summary.mean_package));
        bullet(ui, "Highest Package", &lpa(summary.max_package));
        bullet(ui, "Lowest Package", &lpa(summary.min_package));
        bullet(ui, "Top Recruiters", &summary.top_recruiters.join(", "));
    });
}

/// Annular sector from `from` to `to` (radians), split into convex quads so
/// egui can fill them.
fn donut_slice(from: f64, to: f64, inner: f64, outer: f64) -> Vec<Vec<[f64; 2]>> {
    let steps = ((to - from) / DONUT_SEGMENT).ceil().max(1.0) as usize;
    let step = (to - from) / steps as f64;
    let at = |r: f64, a: f64| [r * a.cos(), r * a.sin()];
    (0..steps)
        .map(|i| {
            let a0 = from + i as f64 * step;
            let a1 = a0 + step;
            vec![at(inner, a0), at(outer, a0), at(outer, a1), at(inner, a1)]
        })
        .collect()
}

fn placement_donut(ui: &mut Ui, placement: &BranchPlacement) {
    ui.add_space(8.0);
    ui.columns(2, |cols: &mut [Ui]| {
        let ui = &mut cols[0];
        ui.label(RichText::new(format!("📘 {} Branch Summary", placement.branch)).strong().size(16.0));
        bullet(ui, "Eligible Students", &placement.eligible.to_string());
        bullet(ui, "Placed Students", &placement.placed.to_string());
        bullet(ui, "Unplaced Students", &placement.unplaced.to_string());

        let total = (placement.placed + placement.unplaced) as f64;
        let ui = &mut cols[1];
        if total == 0.0 {
            ui.label("No students recorded for this branch.");
            return;
        }
        let placed_end = TAU * placement.placed as f64 / total;
        let slices = [
            ("Placed", 0.0, placed_end, color::PLACED),
            ("Unplaced", placed_end, TAU, color::UNPLACED),
        ];

        Plot::new(format!("donut_{}", placement.branch))
            .height(CHART_HEIGHT)
            .data_aspect(1.0)
            .show_axes(false)
            .show_grid(false)
            .show_background(false)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                for (status, from, to, fill) in slices {
                    if to <= from {
                        continue;
                    }
                    for quad in donut_slice(from, to, 0.5, 1.0) {
                        plot_ui.polygon(
                            Polygon::new(PlotPoints::from(quad))
                                .fill_color(fill)
                                .stroke(Stroke::new(0.5, fill))
                                .name(status),
                        );
                    }
                }
                let share = 100.0 * placement.placed as f64 / total;
                plot_ui.text(Text::new(PlotPoint::new(0.0, 0.0), format!("{share:.0}%")));
            });
    });
}
