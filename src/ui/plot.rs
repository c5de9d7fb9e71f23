use std::f32::consts::FRAC_PI_2;

use eframe::egui::{
    self, Align2, Color32, FontId, Rect, RichText, ScrollArea, Sense, Stroke, Ui, epaint,
};
use egui_extras::{Size, StripBuilder};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints, Points};

use crate::color::{Palette, SKY_BLUE, contrast_text};
use crate::data::stats::CorrelationMatrix;
use crate::state::AppState;
use crate::view::{Chart, Histogram, PairGrid, RankedBar, Ranking, Scatter};

const HISTOGRAM_LINE: Color32 = Color32::from_rgb(0x1f, 0x77, 0xb4);
const POINT_RADIUS: f32 = 4.5;

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the selected view: its chart, or why it cannot be drawn.
pub fn view_panel(ui: &mut Ui, state: &AppState) {
    let Some(chart) = &state.chart else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view the dashboard  (File → Open…)");
        });
        return;
    };

    let chart = match chart {
        Ok(chart) => chart,
        Err(e) => {
            ui.label(RichText::new(format!("⚠ {e}")).color(Color32::RED).strong());
            return;
        }
    };

    ui.heading(state.view.heading());
    ui.add_space(6.0);

    match chart {
        Chart::Ranking(ranking) => ranking_plots(ui, ranking),
        Chart::Scatter(scatter) => scatter_plot(ui, scatter),
        Chart::Histogram(histogram) => histogram_plot(ui, histogram),
        Chart::Heatmap(matrix) => {
            ScrollArea::both().show(ui, |ui: &mut Ui| heatmap(ui, matrix));
        }
        Chart::PairGrid(grid) => {
            ScrollArea::both().show(ui, |ui: &mut Ui| pair_grid(ui, grid));
        }
    }
}

// ---------------------------------------------------------------------------
// Top & bottom ranking
// ---------------------------------------------------------------------------

fn ranking_plots(ui: &mut Ui, ranking: &Ranking) {
    StripBuilder::new(ui)
        .sizes(Size::remainder(), 2)
        .horizontal(|mut strip| {
            strip.cell(|ui: &mut Ui| {
                ui.strong("Top 10 Happiest Countries");
                ranking_bars(ui, "top_10", &ranking.top, Palette::GreensR);
            });
            strip.cell(|ui: &mut Ui| {
                ui.strong("Bottom 10 Happiest Countries");
                ranking_bars(ui, "bottom_10", &ranking.bottom, Palette::RedsR);
            });
        });
}

/// Horizontal bars, first entry at the top, country names on the y axis.
fn ranking_bars(ui: &mut Ui, id: &str, bars: &[RankedBar], palette: Palette) {
    let n = bars.len();
    let labels: Vec<String> = bars.iter().map(|b| b.label.clone()).collect();

    let chart_bars: Vec<Bar> = bars
        .iter()
        .zip(palette.discrete(n))
        .enumerate()
        .map(|(i, (bar, color))| {
            Bar::new((n - 1 - i) as f64, bar.value)
                .name(&bar.label)
                .fill(color)
                .width(0.8)
        })
        .collect();

    Plot::new(id)
        .x_axis_label("Happiness Score")
        .y_axis_label("Country")
        .y_axis_min_width(110.0)
        .y_axis_formatter(move |mark: GridMark, _range| {
            let pos = mark.value.round();
            if (mark.value - pos).abs() > 1e-6 || pos < 0.0 || pos as usize >= n {
                return String::new();
            }
            labels[n - 1 - pos as usize].clone()
        })
        .include_x(0.0)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(chart_bars).horizontal());
        });
}

// ---------------------------------------------------------------------------
// Scatter plots
// ---------------------------------------------------------------------------

fn scatter_plot(ui: &mut Ui, scatter: &Scatter) {
    ui.label(RichText::new(scatter.title).strong());

    let colors = scatter.palette.discrete(scatter.groups.len());
    Plot::new(scatter.title)
        .legend(Legend::default())
        .x_axis_label(scatter.x_label)
        .y_axis_label(scatter.y_label)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (group, color) in scatter.groups.iter().zip(colors) {
                let mut points = Points::new(PlotPoints::new(group.points.clone()))
                    .radius(POINT_RADIUS)
                    .filled(true)
                    .color(color);
                if let Some(name) = &group.name {
                    points = points.name(name);
                }
                plot_ui.points(points);
            }
        });
}

// ---------------------------------------------------------------------------
// Histogram with density overlay
// ---------------------------------------------------------------------------

fn histogram_plot(ui: &mut Ui, histogram: &Histogram) {
    ui.label(RichText::new("Distribution of Global Happiness Scores").strong());

    let bars: Vec<Bar> = histogram
        .bins
        .iter()
        .map(|bin| {
            Bar::new(bin.center(), bin.count as f64)
                .width(bin.width())
                .fill(SKY_BLUE)
                .stroke(Stroke::new(1.0, Color32::WHITE))
                .name(format!("{:.2} – {:.2}", bin.start, bin.end))
        })
        .collect();

    Plot::new("happiness_distribution")
        .x_axis_label("Happiness Score")
        .y_axis_label("Number of Countries")
        .include_y(0.0)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
            if !histogram.kde.is_empty() {
                plot_ui.line(
                    Line::new(PlotPoints::new(histogram.kde.clone()))
                        .color(HISTOGRAM_LINE)
                        .width(2.0)
                        .name("density"),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Correlation heatmap
// ---------------------------------------------------------------------------

const HEATMAP_LABEL_WIDTH: f32 = 150.0;
const HEATMAP_LABEL_HEIGHT: f32 = 130.0;
const HEATMAP_BAR_WIDTH: f32 = 70.0;

fn heatmap(ui: &mut Ui, matrix: &CorrelationMatrix) {
    ui.label(RichText::new("Correlation Heatmap of Happiness Factors").strong());

    let n = matrix.labels.len();
    let cell = ((ui.available_width() - HEATMAP_LABEL_WIDTH - HEATMAP_BAR_WIDTH) / n as f32)
        .clamp(36.0, 96.0);
    let grid_side = cell * n as f32;
    let size = egui::vec2(
        HEATMAP_LABEL_WIDTH + grid_side + HEATMAP_BAR_WIDTH,
        grid_side + HEATMAP_LABEL_HEIGHT,
    );
    let (response, painter) = ui.allocate_painter(size, Sense::hover());

    let origin = response.rect.min + egui::vec2(HEATMAP_LABEL_WIDTH, 0.0);
    let text_color = ui.visuals().text_color();
    let label_font = FontId::proportional(13.0);
    let value_font = FontId::proportional((cell * 0.3).clamp(10.0, 15.0));
    let cell_rect = |row: usize, col: usize| {
        Rect::from_min_size(
            origin + egui::vec2(col as f32 * cell, row as f32 * cell),
            egui::vec2(cell, cell),
        )
    };

    for (i, label) in matrix.labels.iter().enumerate() {
        // Row label, right-aligned against the grid.
        painter.text(
            egui::pos2(origin.x - 6.0, origin.y + (i as f32 + 0.5) * cell),
            Align2::RIGHT_CENTER,
            label,
            label_font.clone(),
            text_color,
        );

        // Column label, running downwards under the grid.
        let galley = painter.layout_no_wrap(label.clone(), label_font.clone(), text_color);
        let pos = egui::pos2(
            origin.x + (i as f32 + 0.5) * cell + galley.size().y * 0.5,
            origin.y + grid_side + 6.0,
        );
        painter.add(epaint::TextShape::new(pos, galley, text_color).with_angle(FRAC_PI_2));

        for (j, &r) in matrix.values[i].iter().enumerate() {
            // 0.5 px gaps between cells.
            let rect = cell_rect(i, j).shrink(0.5);
            if r.is_nan() {
                painter.rect_filled(rect, 0.0, ui.visuals().faint_bg_color);
                continue;
            }
            let fill = Palette::Coolwarm.at(((r + 1.0) * 0.5) as f32);
            painter.rect_filled(rect, 0.0, fill);
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                format!("{r:.2}"),
                value_font.clone(),
                contrast_text(fill),
            );
        }
    }

    colour_bar(&painter, origin + egui::vec2(grid_side + 16.0, 0.0), grid_side, text_color);

    if let Some(pos) = response.hover_pos() {
        let rel = pos - origin;
        if rel.x >= 0.0 && rel.y >= 0.0 {
            let (row, col) = ((rel.y / cell) as usize, (rel.x / cell) as usize);
            if row < n && col < n {
                let r = matrix.values[row][col];
                response.on_hover_text(format!(
                    "{} × {}: {r:.3}",
                    matrix.labels[row], matrix.labels[col]
                ));
            }
        }
    }
}

/// Vertical legend for the [-1, 1] coolwarm scale.
fn colour_bar(painter: &egui::Painter, top_left: egui::Pos2, height: f32, text_color: Color32) {
    const STEPS: usize = 64;
    const WIDTH: f32 = 14.0;
    let step = height / STEPS as f32;
    for k in 0..STEPS {
        let t = 1.0 - (k as f32 + 0.5) / STEPS as f32;
        let rect = Rect::from_min_size(
            top_left + egui::vec2(0.0, k as f32 * step),
            egui::vec2(WIDTH, step + 0.5),
        );
        painter.rect_filled(rect, 0.0, Palette::Coolwarm.at(t));
    }
    for (label, frac) in [("1.0", 0.0), ("0.0", 0.5), ("-1.0", 1.0)] {
        painter.text(
            top_left + egui::vec2(WIDTH + 4.0, frac * height),
            Align2::LEFT_CENTER,
            label,
            FontId::proportional(11.0),
            text_color,
        );
    }
}

// ---------------------------------------------------------------------------
// Pairwise grid
// ---------------------------------------------------------------------------

fn pair_grid(ui: &mut Ui, grid: &PairGrid) {
    ui.label(RichText::new("Relationships Between Key Happiness Indicators").strong());
    ui.label(format!("{} complete rows", grid.rows()));

    let n = grid.columns.len();
    let side = ((ui.available_width() - 8.0 * n as f32) / n as f32).clamp(150.0, 280.0);
    let color = Palette::Viridis.at(0.3);

    egui::Grid::new("pair_grid")
        .spacing([4.0, 4.0])
        .show(ui, |ui: &mut Ui| {
            for row in 0..n {
                for col in 0..n {
                    let mut plot = Plot::new(("pair", row, col))
                        .width(side)
                        .height(side)
                        .allow_drag(false)
                        .allow_zoom(false)
                        .allow_scroll(false)
                        .allow_boxed_zoom(false);
                    if row + 1 == n {
                        plot = plot.x_axis_label(grid.columns[col]);
                    }
                    if col == 0 {
                        plot = plot.y_axis_label(grid.columns[row]);
                    }
                    plot.show(ui, |plot_ui| {
                        if row == col {
                            plot_ui.line(
                                Line::new(PlotPoints::new(grid.densities[col].clone()))
                                    .color(color)
                                    .fill(0.0)
                                    .width(1.5),
                            );
                        } else {
                            plot_ui.points(
                                Points::new(PlotPoints::new(grid.points(row, col)))
                                    .radius(2.0)
                                    .filled(true)
                                    .color(color),
                            );
                        }
                    });
                }
                ui.end_row();
            }
        });
}
