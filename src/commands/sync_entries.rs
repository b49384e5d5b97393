//! Sync-entries command - run the time entry reconciliation once.

use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::Database;
use crate::services::{ServiceContainer, Services};

/// Execute the sync-entries command
pub async fn execute(config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await?;
    let services = Services::from_connection(db.get_connection(), config);

    let report = services.timesheets().sync_time_entries().await?;

    println!(
        "Synced {} time entries into {} timesheets",
        report.entries_synced, report.timesheets_updated
    );
    Ok(())
}
