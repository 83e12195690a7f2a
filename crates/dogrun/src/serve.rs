// SPDX-FileCopyrightText: 2026 Dogrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `dogrun serve` command implementation.
//!
//! Opens the SQLite record store and filesystem object store, wires the
//! approval engine, notification dispatcher, and maintenance gate, and
//! runs the HTTP gateway until ctrl-c.

use std::sync::Arc;

use dogrun_approval::ApprovalEngine;
use dogrun_config::DogrunConfig;
use dogrun_core::{DogrunError, ObjectStore, RecordStore};
use dogrun_gateway::{ServerConfig, ServerState};
use dogrun_maintenance::MaintenanceGate;
use dogrun_storage::{FsObjectStore, SqliteStore};
use tracing::{info, warn};

/// Run the `dogrun serve` command.
pub async fn run_serve(config: DogrunConfig) -> Result<(), DogrunError> {
    init_tracing(&config.service.log_level);

    info!("starting dogrun serve");

    if config.gateway.admin_token.is_none() {
        warn!("no admin token configured; the admin API will reject every request");
    }

    let store = Arc::new(SqliteStore::open(&config.storage).await?);
    store.health_check().await?;
    info!(path = %config.storage.database_path, "record store ready");

    let record_store: Arc<dyn RecordStore> = store.clone();
    let objects: Arc<dyn ObjectStore> =
        Arc::new(FsObjectStore::new(&config.storage.object_root));

    let engine = Arc::new(ApprovalEngine::new(
        Arc::clone(&record_store),
        Arc::clone(&objects),
    ));
    let gate = Arc::new(MaintenanceGate::new(Arc::clone(&record_store)));

    let server_config = ServerConfig::from(&config.gateway);
    let state = ServerState {
        engine,
        store: record_store,
        gate,
        client_ip_header: config.maintenance.client_ip_header.clone(),
        admin_utc_offset_hours: config.maintenance.admin_utc_offset_hours,
        start_time: std::time::Instant::now(),
    };

    tokio::select! {
        result = dogrun_gateway::start_server(&server_config, state) => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }

    store.close().await?;
    info!("dogrun serve shutdown complete");
    Ok(())
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("dogrun={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
