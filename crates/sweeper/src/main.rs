//! Runs one status sweep against the snapshot file and writes it back.
//!
//! Usage: `eventstock-sweep [CONFIG_FILE]`. Schedule it externally (cron,
//! systemd timer).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;

use eventstock_infra::config::DEFAULT_CONFIG_FILE;
use eventstock_infra::{AppConfig, InMemoryStore, StatusSweeper, load_snapshot, save_snapshot};
use eventstock_notifications::PrivilegeOrderResolver;

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let config = AppConfig::load_from(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    eventstock_observability::init(&config.logging);

    let data_file = Path::new(&config.data_file);
    let tables = load_snapshot(data_file)
        .with_context(|| format!("failed to read snapshot {}", data_file.display()))?;
    let store = Arc::new(InMemoryStore::from_tables(tables));

    let now = Utc::now();
    tracing::info!(data_file = %data_file.display(), %now, "starting status sweep");
    let report = StatusSweeper::from_config(store.clone(), PrivilegeOrderResolver, &config)
        .run(now)
        .context("status sweep failed")?;

    let tables = store.snapshot().context("failed to copy store state")?;
    save_snapshot(data_file, &tables)
        .with_context(|| format!("failed to write snapshot {}", data_file.display()))?;

    tracing::info!(
        events_updated = report.events_updated,
        rentals_updated = report.rentals_updated,
        notifications_created = report.notifications_created,
        "snapshot saved"
    );
    Ok(())
}
