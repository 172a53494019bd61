//! Persistence: database connection and the file-based report store

pub mod reports;

pub use reports::ReportStore;

use crate::config::DatabaseConfig;
use crate::utils::error::Result;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// Connect to the relational store with pool settings from config
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection> {
    info!("connecting to database");

    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .sqlx_logging(false);

    let db = Database::connect(options).await?;
    info!("database connection established");
    Ok(db)
}
