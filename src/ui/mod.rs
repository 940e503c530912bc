//! GUI panels and application state.

pub mod app;
pub mod components;
pub mod kpi_panel;
pub mod records_panel;

pub use app::App;
