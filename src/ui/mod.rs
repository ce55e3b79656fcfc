// ---------------------------------------------------------------------------
// egui rendering. Everything here reads `AppState` and the
// summaries it holds; no computation happens during drawing.
// ---------------------------------------------------------------------------

pub mod heatmap;
pub mod panels;
pub mod plot;
pub mod views;
