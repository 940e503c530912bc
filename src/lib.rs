pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod export;
pub mod form;
pub mod grid;
pub mod kpi;
pub mod models;
pub mod report;
pub mod ui;

pub use error::{AppError, Result};
