use std::ops::RangeInclusive;

use eframe::egui::{self, Align2, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoint, PlotPoints, Text};

use crate::color::{viridis, ColorMap};
use crate::data::aggregate::{
    CategoryMatrix, ContinentSourceMatrix, EmissionRow, Series, SourceShare,
};
use crate::state::AppState;

const CHART_HEIGHT: f32 = 320.0;

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render every dashboard view, top to bottom.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    ui.heading("Energy Consumption Dashboard");

    if state.datasets.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a data folder to view charts  (File → Open data folder…)");
        });
        return;
    }

    let views = &state.views;
    let colors = &state.colors;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            section(ui, "Primary Energy Consumption Trends Over Time By Source");
            series_chart(
                ui,
                "consumption_by_source",
                &views.consumption_by_source,
                colors,
                "Energy Consumption (TWh)",
            );

            section(ui, "Energy Consumption by Energy Type Over Years");
            stacked_area_chart(ui, &views.consumption_by_type, colors);

            section(ui, "Energy Source Consumption Distribution");
            distribution_chart(ui, &views.source_distribution, colors);

            section(ui, "Primary Energy Consumption Trends Over Time Per Capita");
            series_chart(
                ui,
                "per_capita",
                &views.per_capita,
                colors,
                "Energy Consumption (KWh)",
            );

            section(ui, "Energy Consumption by Source and Continent");
            grouped_bar_chart(ui, &views.source_by_continent, colors);

            section(ui, "CO2 Emissions (Metric Million Tons)");
            emissions_table(ui, &views.emissions);
        });
}

fn section(ui: &mut Ui, title: &str) {
    ui.add_space(12.0);
    ui.label(RichText::new(title).heading());
}

fn empty_hint(ui: &mut Ui) {
    ui.label(RichText::new("No data for the current filters.").italics());
}

/// Axis labels only on whole numbers (years, category indices).
fn integer_ticks(mark: GridMark, _range: &RangeInclusive<f64>) -> String {
    if mark.value.fract() == 0.0 {
        format!("{:.0}", mark.value)
    } else {
        String::new()
    }
}

/// Axis labels from a list of names indexed by the tick value.
fn name_ticks(names: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark, _range| {
        if mark.value.fract() != 0.0 || mark.value < 0.0 {
            return String::new();
        }
        names.get(mark.value as usize).cloned().unwrap_or_default()
    }
}

fn to_points(points: &[(i32, f64)]) -> PlotPoints<'static> {
    points.iter().map(|&(x, y)| [x as f64, y]).collect()
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

/// Multi-line time series, one line per series.
fn series_chart(ui: &mut Ui, id: &str, series: &[Series], colors: &ColorMap, y_label: &str) {
    if series.is_empty() {
        empty_hint(ui);
        return;
    }

    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label(y_label)
        .x_axis_formatter(integer_ticks)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for s in series {
                let line = Line::new(to_points(&s.points))
                    .name(&s.name)
                    .color(colors.color_for(&s.name))
                    .width(2.0);
                plot_ui.line(line);
            }
        });
}

/// Stacked area: cumulative lines filled down to zero, drawn top layer first
/// so each lower layer paints over the one above it.
fn stacked_area_chart(ui: &mut Ui, matrix: &CategoryMatrix, colors: &ColorMap) {
    if matrix.is_empty() {
        empty_hint(ui);
        return;
    }

    Plot::new("consumption_by_type")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label("Energy Consumption (TWh)")
        .x_axis_formatter(integer_ticks)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (col, category) in matrix.categories.iter().enumerate().rev() {
                let color = colors.color_for(category.label());
                let line = Line::new(to_points(&matrix.stacked(col)))
                    .name(category.label())
                    .color(color)
                    .fill(0.0_f32)
                    .width(1.5);
                plot_ui.line(line);
            }
        });
}

/// Horizontal bars per source, annotated with the share of the total.
fn distribution_chart(ui: &mut Ui, shares: &[SourceShare], colors: &ColorMap) {
    if shares.is_empty() {
        empty_hint(ui);
        return;
    }

    let names: Vec<String> = shares.iter().map(|s| s.energy_source.clone()).collect();
    let bars: Vec<Bar> = shares
        .iter()
        .enumerate()
        .map(|(i, s)| {
            Bar::new(i as f64, s.value)
                .name(&s.energy_source)
                .fill(colors.color_for(&s.energy_source))
        })
        .collect();

    Plot::new("source_distribution")
        .height(CHART_HEIGHT)
        .x_axis_label("Energy Consumption (TWh)")
        .y_axis_label("Energy Source")
        .y_axis_formatter(name_ticks(names))
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal().width(0.7));
            for (i, s) in shares.iter().enumerate() {
                plot_ui.text(
                    Text::new(PlotPoint::new(s.value, i as f64), format!("  {}", s.label()))
                        .anchor(Align2::LEFT_CENTER),
                );
            }
        });
}

/// One bar group per continent, one bar per source inside each group.
fn grouped_bar_chart(ui: &mut Ui, matrix: &ContinentSourceMatrix, colors: &ColorMap) {
    if matrix.is_empty() {
        empty_hint(ui);
        return;
    }

    let n_sources = matrix.sources.len();
    let group_width = 0.8;
    let bar_width = group_width / n_sources as f64;

    let charts: Vec<BarChart> = matrix
        .sources
        .iter()
        .enumerate()
        .map(|(col, source)| {
            let offset = -group_width / 2.0 + bar_width * (col as f64 + 0.5);
            let bars = matrix
                .values
                .iter()
                .enumerate()
                .map(|(row, values)| Bar::new(row as f64 + offset, values[col]).width(bar_width))
                .collect();
            BarChart::new(bars)
                .name(source)
                .color(colors.color_for(source))
        })
        .collect();

    Plot::new("source_by_continent")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Continent")
        .y_axis_label("Energy Consumption (TWh)")
        .x_axis_formatter(name_ticks(matrix.continents.clone()))
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

/// Emissions per country, largest first, each row tinted on a sequential
/// scale between the smallest and largest value shown.
fn emissions_table(ui: &mut Ui, rows: &[EmissionRow]) {
    if rows.is_empty() {
        empty_hint(ui);
        return;
    }

    let mut sorted: Vec<&EmissionRow> = rows.iter().collect();
    sorted.sort_by(|a, b| b.value.total_cmp(&a.value));

    let min = sorted.iter().map(|r| r.value).fold(f64::INFINITY, f64::min);
    let max = sorted.iter().map(|r| r.value).fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::exact(48.0))
        .column(Column::auto().at_least(160.0))
        .column(Column::auto())
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|_| {});
            header.col(|ui| {
                ui.strong("Country");
            });
            header.col(|ui| {
                ui.strong("Year");
            });
            header.col(|ui| {
                ui.strong("CO2 Emissions (Metric Million Tons)");
            });
        })
        .body(|mut body| {
            for r in sorted {
                let t = if range.abs() < f64::EPSILON {
                    1.0
                } else {
                    (r.value - min) / range
                };
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        let (rect, _) =
                            ui.allocate_exact_size(egui::vec2(40.0, 12.0), egui::Sense::hover());
                        ui.painter().rect_filled(rect, 2.0, viridis(t));
                    });
                    row.col(|ui| {
                        ui.label(&r.country);
                    });
                    row.col(|ui| {
                        ui.label(r.year.to_string());
                    });
                    row.col(|ui| {
                        ui.label(format!("{:.2}", r.value));
                    });
                });
            }
        });
}
