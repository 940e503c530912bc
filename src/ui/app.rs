//! Main application state.

use std::path::PathBuf;

use chrono::{DateTime, Local};
use eframe::egui::{self, Align, Layout};
use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::db::SalesStore;
use crate::export;
use crate::form::SalesForm;
use crate::grid::{SaveReport, SalesGrid};
use crate::kpi::KpiSummary;
use crate::models::sales::SalesRecord;
use crate::report;

use super::components::colors;
use super::{kpi_panel, records_panel};

/// Maximum number of entries kept in the activity log.
const LOG_CAPACITY: usize = 100;

/// Current panel being displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panel {
    #[default]
    Records,
    Kpi,
}

impl Panel {
    /// Get the display name for the panel.
    pub fn name(&self) -> &'static str {
        match self {
            Panel::Records => "Records",
            Panel::Kpi => "KPI Summary",
        }
    }
}

/// Messages from async tasks to UI.
pub enum UiMessage {
    // Data loading
    RecordsLoaded(Vec<SalesRecord>),
    KpiLoaded(Vec<SalesRecord>),
    LoadError(String),

    // CRUD operations
    RecordAdded(SalesRecord),
    RecordDeleted(i32),
    SaveCompleted(SaveReport),
    OperationFailed(String),
}

/// Log level for UI messages.
#[derive(Clone, Copy, Debug)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Log entry for display in the UI.
#[derive(Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
    pub level: LogLevel,
}

/// Row awaiting delete confirmation.
#[derive(Clone)]
pub struct DeleteTarget {
    pub id: i32,
    pub label: String,
}

/// Main application state.
pub struct App {
    // Runtime and database
    pub rt: tokio::runtime::Runtime,
    pub store: SalesStore,

    // Message channel for async communication
    pub tx: mpsc::UnboundedSender<UiMessage>,
    pub rx: mpsc::UnboundedReceiver<UiMessage>,

    // Navigation
    pub current_panel: Panel,

    // Records
    pub grid: SalesGrid,
    pub form: SalesForm,

    // KPI view
    pub kpi: Option<KpiSummary>,
    pub kpi_loaded: bool,

    // Loading states
    pub is_loading: bool,
    pub is_saving: bool,
    pub is_adding: bool,

    // Log messages
    pub log_messages: Vec<LogEntry>,
    pub show_log: bool,

    // Configuration
    pub config: AppConfig,
    pub config_dir: PathBuf,

    // Dialogs
    pub show_delete_confirm: bool,
    pub delete_target: Option<DeleteTarget>,
    pub error_message: Option<String>,
    pub success_message: Option<String>,
}

impl App {
    pub fn new(
        store: SalesStore,
        config: AppConfig,
        config_dir: PathBuf,
        rt: tokio::runtime::Runtime,
        startup_error: Option<String>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let mut app = Self {
            rt,
            store,
            tx,
            rx,
            current_panel: Panel::default(),
            grid: SalesGrid::default(),
            form: SalesForm::default(),
            kpi: None,
            kpi_loaded: false,
            is_loading: false,
            is_saving: false,
            is_adding: false,
            log_messages: Vec::new(),
            show_log: false,
            config,
            config_dir,
            show_delete_confirm: false,
            delete_target: None,
            error_message: None,
            success_message: None,
        };

        if let Some(e) = startup_error {
            app.log_warning(format!("Using default configuration: {}", e));
            app.error_message = Some(format!("Configuration invalid, defaults in use.\n{}", e));
        }

        // Load initial data
        app.load_records();

        app
    }

    /// Log a message to the UI log.
    pub fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        self.log_messages.push(LogEntry {
            timestamp: Local::now(),
            message: message.into(),
            level,
        });

        if self.log_messages.len() > LOG_CAPACITY {
            self.log_messages.remove(0);
        }
    }

    /// Log an info message.
    pub fn log_info(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    /// Log a success message.
    pub fn log_success(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Success, message);
    }

    /// Log a warning message.
    pub fn log_warning(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message);
    }

    /// Log an error message.
    pub fn log_error(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    /// Show an error dialog and record it in the activity log.
    fn report_error(&mut self, message: String) {
        tracing::error!("{}", message);
        self.log_error(message.clone());
        self.error_message = Some(message);
    }

    /// Reload the grid from the database, discarding unsaved edits.
    pub fn load_records(&mut self) {
        let store = self.store.clone();
        let tx = self.tx.clone();
        self.is_loading = true;

        self.rt.spawn(async move {
            match store.fetch_all().await {
                Ok(records) => {
                    let _ = tx.send(UiMessage::RecordsLoaded(records));
                }
                Err(e) => {
                    let _ = tx.send(UiMessage::LoadError(e.to_string()));
                }
            }
        });
    }

    /// Fetch the full table and recompute the KPI summary.
    pub fn load_kpi(&mut self) {
        let store = self.store.clone();
        let tx = self.tx.clone();
        self.kpi_loaded = false;

        self.rt.spawn(async move {
            match store.fetch_all().await {
                Ok(records) => {
                    let _ = tx.send(UiMessage::KpiLoaded(records));
                }
                Err(e) => {
                    let _ = tx.send(UiMessage::LoadError(e.to_string()));
                }
            }
        });
    }

    /// Collect the entry form and insert a new record.
    pub fn add_record(&mut self) {
        if self.is_adding {
            return;
        }

        let data = match self.form.collect() {
            Ok(data) => data,
            Err(e) => {
                self.log_warning(format!("Entry rejected: {}", e));
                self.error_message = Some(format!("Please check your input.\n{}", e));
                return;
            }
        };

        let store = self.store.clone();
        let tx = self.tx.clone();
        self.is_adding = true;

        self.rt.spawn(async move {
            match store.add(data).await {
                Ok(record) => {
                    let _ = tx.send(UiMessage::RecordAdded(record));
                }
                Err(e) => {
                    let _ = tx.send(UiMessage::OperationFailed(e.to_string()));
                }
            }
        });
    }

    /// Ask for confirmation before deleting the selected row.
    pub fn request_delete_selected(&mut self) {
        let Some(index) = self.grid.selected() else {
            self.error_message = Some("Select a row to delete".to_string());
            return;
        };
        let Some(row) = self.grid.rows().get(index) else {
            return;
        };

        let snapshot = row.snapshot();
        self.delete_target = Some(DeleteTarget {
            id: row.id,
            label: format!("{} ({}, {})", snapshot.filiale_name, snapshot.country, snapshot.date),
        });
        self.show_delete_confirm = true;
    }

    /// Delete a record from the database; the grid row goes once that succeeds.
    pub fn delete_record(&mut self, id: i32) {
        let store = self.store.clone();
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            match store.delete(id).await {
                Ok(true) => {
                    let _ = tx.send(UiMessage::RecordDeleted(id));
                }
                Ok(false) => {
                    let _ = tx.send(UiMessage::OperationFailed(format!("Record {} not found", id)));
                }
                Err(e) => {
                    let _ = tx.send(UiMessage::OperationFailed(e.to_string()));
                }
            }
        });
    }

    /// Validate all edited rows and write the valid ones.
    pub fn save_all(&mut self) {
        let plan = self.grid.prepare_save();

        if plan.updates.is_empty() && plan.rejected.is_empty() {
            self.success_message = Some("No changes to save".to_string());
            return;
        }

        self.is_saving = true;
        self.log_info(format!("Saving {} edited row(s)...", plan.updates.len() + plan.rejected.len()));

        let store = self.store.clone();
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            let report = plan.apply(&store).await;
            let _ = tx.send(UiMessage::SaveCompleted(report));
        });
    }

    /// Export all stored records to Excel.
    pub fn export_excel(&mut self) {
        let default_name = export::generate_export_filename("sales", "xlsx");
        let Some(path) = export::show_save_dialog(&default_name, "Excel Files", "xlsx") else {
            return;
        };

        let records = self.grid.records();
        match export::export_records_to_excel(&records, &path) {
            Ok(()) => {
                self.success_message = Some(format!("Exported to: {}", path.display()));
                self.log_success(format!("Exported {} records: {}", records.len(), path.display()));
            }
            Err(e) => self.report_error(format!("Export failed: {}", e)),
        }
    }

    /// Export the current KPI summary to PDF.
    pub fn export_pdf(&mut self) {
        let Some(summary) = self.kpi.clone() else {
            self.error_message = Some("No data to export".to_string());
            return;
        };

        let default_name = export::generate_export_filename("kpi_report", "pdf");
        let Some(path) = export::show_save_dialog(&default_name, "PDF Files", "pdf") else {
            return;
        };

        let font_dir = self.config.report.resolve_font_dir(&self.config_dir);
        match report::write_kpi_report(&summary, &self.config.report, &font_dir, &path) {
            Ok(()) => {
                self.success_message = Some(format!("Report saved to: {}", path.display()));
                self.log_success(format!("KPI report exported: {}", path.display()));
            }
            Err(e) => self.report_error(format!("PDF export failed: {}", e)),
        }
    }

    /// Switch panels, refreshing the KPI data when it is opened.
    pub fn open_panel(&mut self, panel: Panel) {
        if panel == Panel::Kpi {
            self.load_kpi();
        }
        self.current_panel = panel;
    }

    /// Clear the activity log.
    pub fn clear_log(&mut self) {
        self.log_messages.clear();
    }

    /// Poll async operation results.
    fn poll_async_results(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            self.handle_message(msg);
        }
    }

    /// Apply one async result to the UI state.
    fn handle_message(&mut self, msg: UiMessage) {
        match msg {
            UiMessage::RecordsLoaded(records) => {
                self.log_info(format!("Loaded {} records", records.len()));
                self.grid.load(records);
                self.is_loading = false;
            }
            UiMessage::KpiLoaded(records) => {
                self.kpi = KpiSummary::compute(&records);
                self.kpi_loaded = true;
            }
            UiMessage::LoadError(e) => {
                self.is_loading = false;
                self.kpi_loaded = true;
                self.report_error(e);
            }
            UiMessage::RecordAdded(record) => {
                self.is_adding = false;
                self.log_success(format!("Added record {} for {}", record.id, record.filiale_name));
                self.grid.add_row(record);
                self.form.reset();
            }
            UiMessage::RecordDeleted(id) => {
                self.grid.remove_id(id);
                self.log_success(format!("Deleted record {}", id));
            }
            UiMessage::SaveCompleted(report) => {
                self.is_saving = false;
                self.grid.apply_report(&report);
                if report.is_success() {
                    self.success_message = Some(format!("Saved {} row(s)", report.saved.len()));
                    self.log_success(format!("Save completed: {}", report.summary()));
                } else {
                    let first = report.first_problem().unwrap_or_default();
                    self.log_warning(format!("Save completed with problems: {}", report.summary()));
                    self.error_message = Some(format!(
                        "Some rows were not saved and have been restored.\n{}\n({})",
                        first,
                        report.summary()
                    ));
                }
            }
            UiMessage::OperationFailed(e) => {
                self.is_adding = false;
                self.report_error(e);
            }
        }
    }

    /// Render menu bar.
    fn show_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Export Records to Excel").clicked() {
                        self.export_excel();
                        ui.close();
                    }
                    if ui
                        .add_enabled(self.kpi.is_some(), egui::Button::new("Export KPI Report (PDF)"))
                        .clicked()
                    {
                        self.export_pdf();
                        ui.close();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("View", |ui| {
                    for panel in [Panel::Records, Panel::Kpi] {
                        if ui.selectable_label(self.current_panel == panel, panel.name()).clicked() {
                            self.open_panel(panel);
                            ui.close();
                        }
                    }
                    ui.separator();
                    ui.checkbox(&mut self.show_log, "Activity Log");
                });
            });
        });
    }

    /// Render status bar (display only, no interaction).
    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .min_height(28.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if self.is_loading || self.is_saving {
                        ui.spinner();
                    }
                    ui.colored_label(
                        colors::NEUTRAL,
                        format!(
                            "Database: {}",
                            self.config.database.resolve_path(&self.config_dir).display()
                        ),
                    );

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        let dirty = self.grid.dirty_count();
                        if dirty > 0 {
                            ui.colored_label(colors::WARNING, format!("{} unsaved row(s)", dirty));
                            ui.separator();
                        }
                        ui.label(format!("{} records", self.grid.len()));
                    });
                });
            });
    }

    /// Render the activity log panel.
    fn show_log_panel(&mut self, ctx: &egui::Context) {
        if !self.show_log {
            return;
        }

        egui::TopBottomPanel::bottom("activity_log")
            .resizable(true)
            .default_height(140.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.strong("Activity Log");
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if ui.small_button("Clear").clicked() {
                            self.clear_log();
                        }
                    });
                });
                ui.separator();
                egui::ScrollArea::vertical().stick_to_bottom(true).show(ui, |ui| {
                    for entry in &self.log_messages {
                        let color = match entry.level {
                            LogLevel::Info => ui.visuals().text_color(),
                            LogLevel::Success => colors::SUCCESS,
                            LogLevel::Warning => colors::WARNING,
                            LogLevel::Error => colors::ERROR,
                        };
                        ui.colored_label(
                            color,
                            format!("[{}] {}", entry.timestamp.format("%H:%M:%S"), entry.message),
                        );
                    }
                });
            });
    }

    /// Render modal dialogs (error, success, delete confirmation).
    fn show_dialogs(&mut self, ctx: &egui::Context) {
        // Error dialog
        if let Some(ref error) = self.error_message.clone() {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.colored_label(colors::ERROR, error);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.error_message = None;
                    }
                });
        }

        // Success dialog
        if let Some(ref msg) = self.success_message.clone() {
            egui::Window::new("Success")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.colored_label(colors::SUCCESS, msg);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.success_message = None;
                    }
                });
        }

        // Delete confirmation dialog
        if self.show_delete_confirm
            && let Some(target) = self.delete_target.clone()
        {
            egui::Window::new("Delete Record")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(format!("Delete record {}: {}?", target.id, target.label));
                    ui.add_space(10.0);
                    ui.horizontal(|ui| {
                        if ui.button("Cancel").clicked() {
                            self.show_delete_confirm = false;
                            self.delete_target = None;
                        }
                        if ui.button("Delete").clicked() {
                            self.confirm_delete();
                            self.show_delete_confirm = false;
                        }
                    });
                });
        }
    }

    /// Execute the confirmed delete operation.
    fn confirm_delete(&mut self) {
        if let Some(target) = self.delete_target.take() {
            self.log_info(format!("Deleting record {}: {}", target.id, target.label));
            self.delete_record(target.id);
        }
    }

    /// Whether a blocking dialog is open.
    fn has_modal(&self) -> bool {
        self.error_message.is_some() || self.success_message.is_some() || self.show_delete_confirm
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Poll async results
        self.poll_async_results();

        // Request repaint during async operations
        if self.is_loading || self.is_saving || self.is_adding || (self.current_panel == Panel::Kpi && !self.kpi_loaded) {
            ctx.request_repaint();
        }

        self.show_menu_bar(ctx);
        self.show_status_bar(ctx);
        self.show_log_panel(ctx);
        self.show_dialogs(ctx);

        let enabled = !self.has_modal();
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(enabled, |ui| match self.current_panel {
                Panel::Records => {
                    if let Some(next) = records_panel::show(self, ui) {
                        self.open_panel(next);
                    }
                }
                Panel::Kpi => {
                    if kpi_panel::show(self, ui) {
                        self.current_panel = Panel::Records;
                    }
                }
            });
        });
    }
}
