//! KPI summary panel with grouped net income and bar charts.

use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, FILE_PDF};

use super::app::App;
use super::components::{
    back_button, bar_chart, colors, panel_header, primary_button_with_icon, styled_button_with_icon,
};
use crate::kpi::{GroupIncome, KpiSummary};
use crate::report::{GroupOrder, group_rows, summary_lines};

const CHART_HEIGHT: f32 = 220.0;

/// Show the KPI panel.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let mut go_back = false;

    if back_button(ui) {
        go_back = true;
    }

    panel_header(ui, "KPI Summary");

    ui.horizontal(|ui| {
        if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Refresh").clicked() {
            app.load_kpi();
        }

        ui.add_space(10.0);

        if ui
            .add_enabled_ui(app.kpi.is_some(), |ui| primary_button_with_icon(ui, FILE_PDF, "Export PDF"))
            .inner
            .clicked()
        {
            app.export_pdf();
        }

        if !app.kpi_loaded {
            ui.add_space(10.0);
            ui.spinner();
        }
    });

    ui.add_space(10.0);

    let currency = app.config.report.currency_symbol.clone();
    match &app.kpi {
        None if app.kpi_loaded => {
            show_empty(ui);
        }
        None => {
            ui.label("Loading...");
        }
        Some(summary) => {
            ScrollArea::vertical().id_salt("kpi_scroll").show(ui, |ui| {
                show_summary(ui, summary, &currency);
            });
        }
    }

    go_back
}

fn show_empty(ui: &mut Ui) {
    let size = egui::vec2((ui.available_width() / 2.0 - 8.0).max(200.0), CHART_HEIGHT);
    ui.colored_label(colors::NEUTRAL, "Total Revenue: No Data");
    ui.colored_label(colors::NEUTRAL, "Total Costs: No Data");
    ui.colored_label(colors::NEUTRAL, "Net Income: No Data");
    ui.add_space(10.0);
    ui.horizontal(|ui| {
        bar_chart(ui, "Net income by country", &[], size);
        bar_chart(ui, "Net income by date", &[], size);
    });
}

fn show_summary(ui: &mut Ui, summary: &KpiSummary, currency: &str) {
    for line in summary_lines(summary, currency) {
        ui.label(RichText::new(line).size(15.0));
    }

    ui.add_space(16.0);

    let size = egui::vec2((ui.available_width() / 2.0 - 8.0).max(200.0), CHART_HEIGHT);
    ui.horizontal(|ui| {
        bar_chart(ui, "Net income by country", &summary.net_income_by_country(), size);
        bar_chart(ui, "Net income by date", &summary.net_income_by_date(), size);
    });

    ui.add_space(16.0);

    ui.columns(2, |cols| {
        group_table(&mut cols[0], "kpi_country_date", &summary.by_country_date, GroupOrder::CountryDate, currency);
        group_table(&mut cols[1], "kpi_date_country", &summary.by_date_country, GroupOrder::DateCountry, currency);
    });
}

fn group_table(ui: &mut Ui, id: &str, groups: &[GroupIncome], order: GroupOrder, currency: &str) {
    ui.label(RichText::new(order.title()).strong());
    ui.add_space(6.0);

    egui::Grid::new(id)
        .num_columns(3)
        .striped(true)
        .spacing([16.0, 6.0])
        .show(ui, |ui| {
            for header in order.headers() {
                ui.strong(header);
            }
            ui.end_row();

            for (group, [a, b, income]) in groups.iter().zip(group_rows(groups, order, currency)) {
                ui.label(a);
                ui.label(b);
                let color = if group.net_income() >= 0.0 {
                    colors::SUCCESS
                } else {
                    colors::ERROR
                };
                ui.colored_label(color, income);
                ui.end_row();
            }
        });
}
