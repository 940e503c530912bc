//! Filiale Sales - Desktop app for recording filiale sales figures and reviewing KPIs.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use eframe::egui;
use filiale_sales as app;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use app::config::{AppConfig, ConfigLoadResult, LoggingConfig};
use app::db::SalesStore;
use app::ui::App;

/// Desktop app for recording filiale sales figures and reviewing KPIs.
#[derive(Parser)]
#[command(name = "filiale-sales")]
struct Cli {
    /// Use config.toml from current directory (dev mode)
    #[arg(long)]
    dev: bool,

    /// Path to the config file
    #[arg(long, value_name = "FILE", conflicts_with = "dev")]
    config: Option<PathBuf>,

    /// Override the database file from the config
    #[arg(long, value_name = "FILE")]
    database: Option<PathBuf>,
}

/// Initialize tracing; the returned guard flushes the log file on drop.
fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},sqlx=warn", config.level.to_lowercase())));

    let registry = tracing_subscriber::registry().with(filter).with(fmt::layer());

    if !config.file_enabled {
        registry.init();
        return None;
    }

    let dir = config.log_dir();
    if let Err(e) = std::fs::create_dir_all(&dir) {
        registry.init();
        tracing::warn!("Cannot create log directory {}: {}", dir.display(), e);
        return None;
    }

    let appender = tracing_appender::rolling::daily(&dir, "filiale-sales.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    registry
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .init();

    Some(guard)
}

/// Load the config, falling back to defaults when missing or invalid.
fn load_config(path: &Path) -> (AppConfig, Option<String>) {
    match AppConfig::try_load(path) {
        ConfigLoadResult::Loaded(config) => (config, None),
        ConfigLoadResult::Missing => {
            let config = AppConfig::default();
            // Logging is not up yet; failures surface in the UI log instead.
            let error = config
                .save(path)
                .err()
                .map(|e| format!("Could not write default config to {}: {}", path.display(), e));
            (config, error)
        }
        ConfigLoadResult::Invalid(e) => (AppConfig::default(), Some(e.to_string())),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Determine config path based on mode
    let config_path = match (&cli.config, cli.dev) {
        (Some(path), _) => path.clone(),
        (None, true) => PathBuf::from("config.toml"),
        (None, false) => AppConfig::default_path(),
    };
    let config_dir = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let (mut config, startup_error) = load_config(&config_path);
    if let Some(path) = &cli.database {
        config.database.path = path.display().to_string();
    }

    let _log_guard = init_logging(&config.logging);

    tracing::info!("Filiale Sales starting...");
    tracing::info!("Config path: {:?}", config_path);
    if let Some(e) = &startup_error {
        tracing::warn!("Config problem, using defaults: {}", e);
    }

    // Create tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;

    // Open database, creating the file and table on first run
    let database_url = config.database.connection_string(&config_dir);
    let store = rt.block_on(async {
        let store = SalesStore::open(&database_url)
            .await
            .with_context(|| format!("Failed to open database {}", database_url))?;

        match store.count().await {
            Ok(count) => tracing::info!("Database ready: {} sales records", count),
            Err(e) => tracing::warn!("Could not count records: {}", e),
        }

        anyhow::Ok(store)
    })?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Filiale Sales")
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([960.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Filiale Sales",
        options,
        Box::new(|cc| {
            let mut fonts = egui::FontDefinitions::default();
            egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
            cc.egui_ctx.set_fonts(fonts);

            Ok(Box::new(App::new(store, config, config_dir, rt, startup_error)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("GUI error: {e}"))?;

    tracing::info!("Filiale Sales closed");
    Ok(())
}
