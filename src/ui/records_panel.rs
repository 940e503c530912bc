//! Records panel: entry form above the editable sales grid.

use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, CHART_BAR, FILE_XLS, FLOPPY_DISK, PLUS, TRASH};

use super::app::{App, Panel};
use super::components::{
    colors, danger_button_with_icon, panel_header, primary_button_with_icon, styled_button_with_icon,
};
use crate::grid::SalesGrid;
use crate::models::sales::{FieldKind, SalesField};

/// Placeholder shown in an empty form input.
fn hint(field: SalesField) -> &'static str {
    match field.kind() {
        FieldKind::Text => "required",
        FieldKind::Date => "",
        FieldKind::Real => "0.00",
        FieldKind::Integer => match field {
            SalesField::SatisfactionRate => "0-100",
            _ => "0",
        },
    }
}

/// Width of a grid cell editor.
fn cell_width(field: SalesField) -> f32 {
    match field.kind() {
        FieldKind::Text => 140.0,
        FieldKind::Date => 90.0,
        FieldKind::Real => 90.0,
        FieldKind::Integer => 70.0,
    }
}

/// Show the records panel.
///
/// Returns the panel to switch to, if any.
pub fn show(app: &mut App, ui: &mut Ui) -> Option<Panel> {
    let mut next = None;

    panel_header(ui, "Sales Records");

    show_form(app, ui);

    ui.add_space(10.0);
    ui.separator();
    ui.add_space(10.0);

    // Toolbar
    ui.horizontal(|ui| {
        let dirty = app.grid.dirty_count();
        let save_label = if dirty > 0 {
            format!("Save All ({dirty})")
        } else {
            "Save All".to_string()
        };
        if ui
            .add_enabled_ui(!app.is_saving, |ui| primary_button_with_icon(ui, FLOPPY_DISK, &save_label))
            .inner
            .clicked()
        {
            app.save_all();
        }

        ui.add_space(10.0);

        if ui
            .add_enabled_ui(app.grid.selected().is_some(), |ui| {
                danger_button_with_icon(ui, TRASH, "Delete")
            })
            .inner
            .clicked()
        {
            app.request_delete_selected();
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Refresh").clicked() {
            if app.grid.dirty_count() > 0 {
                app.log_warning("Unsaved edits discarded by refresh");
            }
            app.load_records();
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, FILE_XLS, "Export Excel").clicked() {
            app.export_excel();
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, CHART_BAR, "KPI").clicked() {
            next = Some(Panel::Kpi);
        }
    });

    ui.add_space(10.0);

    if app.is_loading && app.grid.is_empty() {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Loading records...");
        });
    } else if app.grid.is_empty() {
        ui.colored_label(colors::NEUTRAL, "No records yet. Use the form above to add one.");
    } else {
        let editable = !app.is_saving;
        ui.add_enabled_ui(editable, |ui| show_grid(&mut app.grid, ui));
    }

    next
}

fn show_form(app: &mut App, ui: &mut Ui) {
    ui.label(RichText::new("New Record").strong());
    ui.add_space(6.0);

    egui::Grid::new("sales_form_grid")
        .num_columns(6)
        .spacing([16.0, 8.0])
        .show(ui, |ui| {
            for (i, field) in SalesField::ALL.into_iter().enumerate() {
                ui.label(format!("{}:", field.label()));
                if field == SalesField::Date {
                    ui.add(egui_extras::DatePickerButton::new(&mut app.form.date).id_salt("sales_form_date"));
                } else if let Some(text) = app.form.text_mut(field) {
                    ui.add(
                        egui::TextEdit::singleline(text)
                            .hint_text(hint(field))
                            .desired_width(160.0),
                    );
                }
                if i % 3 == 2 {
                    ui.end_row();
                }
            }
        });

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        if ui
            .add_enabled_ui(!app.is_adding, |ui| primary_button_with_icon(ui, PLUS, "Add Record"))
            .inner
            .clicked()
        {
            app.add_record();
        }
        ui.add_space(10.0);
        if ui.button("Clear").clicked() {
            app.form.reset();
        }
    });
}

fn show_grid(grid: &mut SalesGrid, ui: &mut Ui) {
    let selected = grid.selected();
    let mut clicked = None;

    ScrollArea::both().id_salt("sales_grid_scroll").show(ui, |ui| {
        egui::Grid::new("sales_grid")
            .num_columns(SalesGrid::headers().len())
            .striped(true)
            .spacing([8.0, 6.0])
            .show(ui, |ui| {
                for header in SalesGrid::headers() {
                    ui.strong(header);
                }
                ui.end_row();

                for (index, row) in grid.rows_mut().iter_mut().enumerate() {
                    let id_label = if row.is_dirty() {
                        RichText::new(format!("{} *", row.id)).color(colors::WARNING)
                    } else {
                        RichText::new(row.id.to_string())
                    };
                    if ui.selectable_label(selected == Some(index), id_label).clicked() {
                        clicked = Some(index);
                    }

                    for field in SalesField::ALL {
                        let dirty = row.is_cell_dirty(field);
                        let mut edit = egui::TextEdit::singleline(row.cell_mut(field)).desired_width(cell_width(field));
                        if dirty {
                            edit = edit.text_color(colors::WARNING);
                        }
                        if ui.add(edit).gained_focus() {
                            clicked = Some(index);
                        }
                    }
                    ui.end_row();
                }
            });
    });

    if let Some(index) = clicked {
        grid.select(Some(index));
    }
}
