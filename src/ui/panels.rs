use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::{AppState, Facet, Tab};

/// A dataset file picked from the File menu, to be loaded by the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileRequest {
    Employees(PathBuf),
    Happiness(PathBuf),
}

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Employee Dataset");
    ui.separator();

    if state.datasets.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for facet in [Facet::Department, Facet::JobRole] {
                facet_filter(ui, state, facet);
            }
            ui.separator();
            age_filter(ui, state);
            ui.separator();

            if let Some(views) = &state.filtered {
                ui.label(format!("{} employees match", views.matching_rows));
            }
        });
}

fn facet_filter(ui: &mut Ui, state: &mut AppState, facet: Facet) {
    // Clone so the checkboxes can mutate state.
    let universe = state.universe(facet).clone();
    let n_selected = state.selection(facet).len();
    let header_text = format!("{}  ({n_selected}/{})", facet.label(), universe.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(facet.column())
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all(facet);
                }
                if ui.small_button("None").clicked() {
                    state.select_none(facet);
                }
            });

            for value in &universe {
                let mut checked = state.selection(facet).contains(value);
                if ui.checkbox(&mut checked, value.as_str()).changed() {
                    state.toggle_filter_value(facet, value);
                }
            }
        });
}

fn age_filter(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Age Range");
    let (lo, hi) = state.age_limits;
    let (mut min, mut max) = state.criteria.age_range;

    let min_changed = ui
        .add(egui::Slider::new(&mut min, lo..=hi).text("min"))
        .changed();
    let max_changed = ui
        .add(egui::Slider::new(&mut max, lo..=hi).text("max"))
        .changed();

    if min_changed || max_changed {
        state.set_age_range(min, max);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / tab strip. Returns a file the user asked to open.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) -> Option<FileRequest> {
    let mut request = None;

    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open employee table…").clicked() {
                request = pick_table("Open employee attrition data").map(FileRequest::Employees);
                ui.close_menu();
            }
            if ui.button("Open happiness table…").clicked() {
                request = pick_table("Open country happiness data").map(FileRequest::Happiness);
                ui.close_menu();
            }
        });

        ui.separator();

        for tab in Tab::ALL {
            ui.selectable_value(&mut state.active_tab, tab, tab.title());
        }

        ui.separator();

        if let Some(ds) = &state.datasets {
            ui.label(format!(
                "{} employees, {} countries",
                ds.employees.len(),
                ds.happiness.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });

    request
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

fn pick_table(title: &str) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title(title)
        .add_filter("Supported files", &["parquet", "pq", "json", "csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .pick_file()
}
