//! Shared UI components.

use eframe::egui::{self, Color32, Response, RichText, Sense, Stroke, Ui};

use crate::kpi::BarDatum;

/// Status indicator colors.
pub mod colors {
    use super::Color32;

    pub const SUCCESS: Color32 = Color32::from_rgb(100, 200, 100);
    pub const ERROR: Color32 = Color32::from_rgb(255, 100, 100);
    pub const WARNING: Color32 = Color32::from_rgb(255, 200, 100);
    pub const NEUTRAL: Color32 = Color32::from_rgb(150, 150, 150);
    pub const PRIMARY: Color32 = Color32::from_rgb(0x44, 0x72, 0xC4);
}

/// Render a back button that returns true when clicked.
pub fn back_button(ui: &mut Ui) -> bool {
    ui.button(RichText::new("< Back to Records").size(14.0)).clicked()
}

/// Render a panel header with title.
pub fn panel_header(ui: &mut Ui, title: &str) {
    ui.heading(RichText::new(title).size(24.0));
    ui.add_space(10.0);
    ui.separator();
    ui.add_space(10.0);
}

/// Toolbar button with a leading icon.
pub fn styled_button_with_icon(ui: &mut Ui, icon: &str, text: &str) -> Response {
    ui.add(egui::Button::new(RichText::new(format!("{icon} {text}")).size(14.0)).min_size(egui::vec2(0.0, 28.0)))
}

/// Highlighted button for the main action of a panel.
pub fn primary_button_with_icon(ui: &mut Ui, icon: &str, text: &str) -> Response {
    let label = if icon.is_empty() {
        text.to_string()
    } else {
        format!("{icon} {text}")
    };
    ui.add(
        egui::Button::new(RichText::new(label).size(14.0).color(Color32::WHITE))
            .fill(colors::PRIMARY)
            .min_size(egui::vec2(0.0, 28.0)),
    )
}

/// Button for destructive actions.
pub fn danger_button_with_icon(ui: &mut Ui, icon: &str, text: &str) -> Response {
    ui.add(
        egui::Button::new(RichText::new(format!("{icon} {text}")).size(14.0).color(colors::ERROR))
            .min_size(egui::vec2(0.0, 28.0)),
    )
}

/// Render a bar chart of `bars` in a fixed-size box.
///
/// Positive values are drawn in green above the baseline, negative ones in
/// red below it. Hovering a bar shows its label and value.
pub fn bar_chart(ui: &mut Ui, title: &str, bars: &[BarDatum], size: egui::Vec2) -> Response {
    let (rect, response) = ui.allocate_exact_size(size, Sense::hover());

    let plot = egui::Rect::from_min_max(
        egui::pos2(rect.left() + 12.0, rect.top() + 30.0),
        egui::pos2(rect.right() - 12.0, rect.bottom() - 24.0),
    );
    let slot = if bars.is_empty() {
        0.0
    } else {
        plot.width() / bars.len() as f32
    };

    if ui.is_rect_visible(rect) {
        let painter = ui.painter();
        let text_color = ui.visuals().text_color();
        let weak_color = ui.visuals().weak_text_color();

        painter.rect_filled(rect, 8.0, ui.visuals().extreme_bg_color);
        painter.text(
            egui::pos2(rect.left() + 12.0, rect.top() + 14.0),
            egui::Align2::LEFT_CENTER,
            title,
            egui::FontId::proportional(15.0),
            text_color,
        );

        if bars.is_empty() {
            painter.text(
                plot.center(),
                egui::Align2::CENTER_CENTER,
                "No Data",
                egui::FontId::proportional(14.0),
                weak_color,
            );
        } else {
            let max = bars.iter().map(|b| b.value.abs()).fold(0.0_f64, f64::max).max(f64::EPSILON);
            let has_negative = bars.iter().any(|b| b.value < 0.0);
            let (zero_y, span) = if has_negative {
                (plot.center().y, plot.height() / 2.0)
            } else {
                (plot.bottom(), plot.height())
            };

            for (i, bar) in bars.iter().enumerate() {
                let x0 = plot.left() + slot * i as f32 + slot * 0.15;
                let x1 = x0 + slot * 0.7;
                let height = (bar.value.abs() / max) as f32 * span;
                let (top, bottom, color) = if bar.value >= 0.0 {
                    (zero_y - height, zero_y, colors::SUCCESS)
                } else {
                    (zero_y, zero_y + height, colors::ERROR)
                };
                painter.rect_filled(
                    egui::Rect::from_min_max(egui::pos2(x0, top), egui::pos2(x1, bottom)),
                    2.0,
                    color,
                );

                painter.text(
                    egui::pos2((x0 + x1) / 2.0, rect.bottom() - 12.0),
                    egui::Align2::CENTER_CENTER,
                    &bar.label,
                    egui::FontId::proportional(11.0),
                    weak_color,
                );
            }

            painter.line_segment(
                [egui::pos2(plot.left(), zero_y), egui::pos2(plot.right(), zero_y)],
                Stroke::new(1.0, weak_color),
            );
        }
    }

    let hovered = response
        .hover_pos()
        .filter(|pos| plot.x_range().contains(pos.x) && slot > 0.0)
        .and_then(|pos| bars.get(((pos.x - plot.left()) / slot) as usize));

    match hovered {
        Some(bar) => response.on_hover_text(format!("{}: {:.2}", bar.label, bar.value)),
        None => response,
    }
}
