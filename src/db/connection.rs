//! Database connection and schema setup.

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use std::time::Duration;
use tracing::log::LevelFilter;

/// Schema of the single `sales_data` table.
const CREATE_SALES_DATA: &str = r#"
CREATE TABLE IF NOT EXISTS sales_data (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    filiale_name TEXT,
    country TEXT,
    date TEXT,
    monthly_revenue REAL,
    monthly_costs REAL,
    sales_volume INTEGER,
    new_clients INTEGER,
    satisfaction_rate INTEGER,
    advertising_costs REAL
);
"#;

/// Open a SQLite database.
///
/// The pool holds exactly one connection, so statements run one at a time and
/// an in-memory database (`sqlite::memory:`) lives as long as the pool.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(database_url);
    opt.max_connections(1)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(true)
        .sqlx_logging_level(LevelFilter::Debug);

    Database::connect(opt).await
}

/// Create the `sales_data` table if it does not exist yet.
pub async fn initialize_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    db.execute_unprepared(CREATE_SALES_DATA).await?;
    Ok(())
}
