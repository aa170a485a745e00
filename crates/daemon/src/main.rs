//! Completion Engine - Main Entry Point
//! Periodically records activity-based course completion

mod config;
mod telemetry;

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

// Import workspace crates
use completion_core::application::{
    shutdown_channel, ActivityCriteria, CriteriaSweep, CronScheduler, ReportConfig,
};
use completion_core::domain::CriteriaFilter;
use completion_core::port::time_provider::SystemTimeProvider;
use completion_core::port::EnglishStrings;
use completion_infra_sqlite::{create_pool, run_migrations, sqlite_ports};
use config::DaemonConfig;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration, then initialize logging
    let (config, warnings) = DaemonConfig::from_env();
    let _log_guard = telemetry::init_logging(&config)?;
    for warning in &warnings {
        warn!("{}", warning);
    }

    info!("Completion Engine v{} starting...", VERSION);

    // 2. Initialize database
    info!(db_path = %config.db_path, "Initializing database...");
    if let Some(parent) = Path::new(&config.db_path).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let pool = create_pool(&config.db_path)
        .await
        .map_err(|e| anyhow::anyhow!("DB pool creation failed: {}", e))?;
    run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;

    // 3. Setup dependencies (DI wiring)
    let ports = sqlite_ports(
        pool.clone(),
        Arc::new(EnglishStrings),
        Arc::new(SystemTimeProvider),
    );
    let activity_criteria = Arc::new(ActivityCriteria::new(
        ports,
        ReportConfig::new(config.wwwroot.clone()),
    ));

    let configured = activity_criteria
        .fetch(CriteriaFilter::default())
        .await
        .map_err(|e| anyhow::anyhow!("Loading criteria failed: {}", e))?;
    info!(activity_criteria = configured.len(), "Criteria loaded");

    let sweeps: Vec<Arc<dyn CriteriaSweep>> = vec![activity_criteria];
    let scheduler = CronScheduler::new(sweeps, config.cron_interval);

    // 4. Single sweep mode (invoked from an external cron)
    if config.run_once {
        for (criteria_type, report) in scheduler
            .run_now()
            .await
            .map_err(|e| anyhow::anyhow!("Sweep failed: {}", e))?
        {
            info!(
                criteria_type = %criteria_type,
                found = report.found,
                marked = report.marked,
                "Sweep completed"
            );
        }
        pool.close().await;
        return Ok(());
    }

    // 5. Start cron scheduler
    info!("Starting cron scheduler...");
    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let scheduler_handle = tokio::spawn(scheduler.run(shutdown_rx));

    info!("System ready. Press Ctrl+C to shutdown");

    // 6. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    // 7. Graceful shutdown
    shutdown_tx.shutdown();
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), scheduler_handle).await;
    pool.close().await;

    info!("Shutdown complete.");

    Ok(())
}
