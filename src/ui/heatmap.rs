use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::{text_color_on, ColorScale};
use crate::data::aggregate::CorrelationMatrix;

const CELL_WIDTH: f32 = 64.0;
const ROW_HEIGHT: f32 = 22.0;

fn cell_text(r: f64) -> String {
    if r.is_nan() {
        "NaN".to_string()
    } else {
        format!("{r:.2}")
    }
}

/// Annotated correlation heatmap: one shaded cell per column pair.
pub fn correlation_heatmap(ui: &mut Ui, id: &str, matrix: &CorrelationMatrix, scale: ColorScale) {
    if matrix.is_empty() {
        ui.weak("No numeric columns to correlate.");
        return;
    }
    let n = matrix.len();

    ui.push_id(id, |ui: &mut Ui| {
        egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(false)
                .vscroll(false)
                .column(Column::auto().at_least(120.0))
                .columns(Column::exact(CELL_WIDTH), n)
                .header(ROW_HEIGHT * 2.0, |mut header| {
                    header.col(|_ui| {});
                    for name in &matrix.columns {
                        header.col(|ui: &mut Ui| {
                            ui.add(egui::Label::new(RichText::new(name).small().strong()).wrap());
                        });
                    }
                })
                .body(|mut body| {
                    for (i, name) in matrix.columns.iter().enumerate() {
                        body.row(ROW_HEIGHT, |mut row| {
                            row.col(|ui: &mut Ui| {
                                ui.strong(name);
                            });
                            for j in 0..n {
                                let r = matrix.get(i, j);
                                let fill = scale.for_correlation(r);
                                row.col(|ui: &mut Ui| {
                                    ui.painter().rect_filled(ui.max_rect(), 0.0, fill);
                                    ui.centered_and_justified(|ui: &mut Ui| {
                                        ui.label(RichText::new(cell_text(r)).color(text_color_on(fill)));
                                    });
                                });
                            }
                        });
                    }
                });
        });
    });
}
