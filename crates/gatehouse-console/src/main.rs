//! Gatehouse console: loads the membership store and prints a JSON
//! directory report.

mod config;
mod report;

use std::process::ExitCode;

use gatehouse_access::AccessService;
use gatehouse_core::clock::SystemClock;
use gatehouse_core::error::{GatehouseError, GatehouseResult};
use gatehouse_store::MembershipStore;
use tracing_subscriber::EnvFilter;

use crate::config::ConsoleConfig;
use crate::report::DirectoryReport;

fn main() -> ExitCode {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gatehouse=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .json()
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "Gatehouse console failed");
            ExitCode::FAILURE
        }
    }
}

fn run() -> GatehouseResult<()> {
    let config = ConsoleConfig::from_env()?;
    tracing::info!(
        seed = ?config.store.seed_path,
        policy = %config.access.validity_policy,
        "Starting Gatehouse console..."
    );

    let store = MembershipStore::open(&config.store, SystemClock)?;
    let access = AccessService::with_system_clock(config.access);
    let report = DirectoryReport::build(&store, &access)?;

    let json = serde_json::to_string_pretty(&report)
        .map_err(|e| GatehouseError::Internal(e.to_string()))?;
    println!("{json}");

    tracing::info!(users = report.users.len(), "Directory report written.");
    Ok(())
}
