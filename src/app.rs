use eframe::egui;

use crate::config::Settings;
use crate::data::store::DatasetStore;
use crate::state::AppState;
use crate::ui::panels::{self, FileRequest};
use crate::ui::views;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct HrInsightsApp {
    pub state: AppState,
    store: DatasetStore,
}

impl HrInsightsApp {
    pub fn new(settings: &Settings) -> Self {
        let store = DatasetStore::new(settings.dataset_paths());
        let mut state = AppState::new(settings);
        state.load_from(&store);
        Self { state, store }
    }

    /// Swap one data file and reload both tables through a fresh store.
    fn open(&mut self, request: FileRequest) {
        let mut paths = self.store.paths().clone();
        match request {
            FileRequest::Employees(path) => paths.employees = path,
            FileRequest::Happiness(path) => paths.happiness = path,
        }
        log::info!(
            "Reloading datasets from {} and {}",
            paths.employees.display(),
            paths.happiness.display()
        );
        self.store = DatasetStore::new(paths);
        self.state.load_from(&self.store);
    }
}

impl eframe::App for HrInsightsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar + tabs ----
        let request = egui::TopBottomPanel::top("top_bar")
            .show(ctx, |ui| panels::top_bar(ui, &mut self.state))
            .inner;

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: active tab ----
        egui::CentralPanel::default().show(ctx, |ui| {
            views::show(ui, &self.state);
        });

        if let Some(request) = request {
            self.open(request);
        }
    }
}
