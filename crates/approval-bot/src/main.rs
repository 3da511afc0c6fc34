//! Freshers auto-approval bot - main entry point.

mod config;
mod engine;
mod error;

use crate::config::Config;
use crate::engine::{EngineConfig, GroupGateway, ReconciliationEngine};
use crate::error::AppResult;
use admission_store::{ApprovalLedger, Store, WhitelistRegistry};
use anyhow::Context;
use std::time::Duration;
use tokio::signal;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> AppResult<()> {
    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    // Initialize logging
    init_logging(&config.bot.log_level);

    info!("Starting freshers auto-approval bot...");
    info!("Monitoring groups: {:?}", config.group_list());
    info!("Check interval: {:?}", config.bot.poll_interval);

    // Open the shared tables
    let whitelist = WhitelistRegistry::open(
        Store::file(&config.storage.whitelist_path),
        config.phone.clone(),
    )
    .await?;
    let ledger = ApprovalLedger::open(Store::file(&config.storage.approvals_path)).await?;

    info!("Whitelist has {} verified numbers", whitelist.count().await);
    info!("Approval ledger has {} records", ledger.count().await);

    // Bridge client
    let bridge = whatsapp_client::WhatsAppClient::new(
        &config.bridge.base_url,
        config.bridge.request_timeout,
    )?;

    if !bridge.health_check().await {
        error!(
            "WhatsApp bridge not reachable at {}",
            config.bridge.base_url
        );
        return Err(anyhow::anyhow!("WhatsApp bridge not reachable").into());
    }

    // Acquiring the browser session is the only fatal failure; everything
    // past this point is isolated per item or per group.
    bridge.open_session().await?;
    info!("Bridge session acquired");

    let engine = ReconciliationEngine::new(
        bridge.clone(),
        whitelist,
        ledger,
        config.phone.clone(),
        EngineConfig {
            groups: config.group_list(),
            max_approvals_per_cycle: config.bot.max_approvals_per_cycle,
            action_timeout: config.bot.action_timeout,
        },
    );

    let result = run_loop(&engine, config.bot.poll_interval).await;

    // Release the session on every exit path
    if let Err(e) = bridge.close_session().await {
        warn!("Failed to close bridge session: {}", e);
    }
    info!("Shut down");

    result
}

/// Poll loop: one reconciliation cycle, then sleep, until shutdown.
async fn run_loop<G: GroupGateway>(
    engine: &ReconciliationEngine<G>,
    poll_interval: Duration,
) -> AppResult<()> {
    let mut cycle: u64 = 0;

    loop {
        cycle += 1;
        let report = engine.run_cycle().await;

        let approved = report.total_approved();
        if approved > 0 {
            info!("Cycle {}: approved {} request(s)", cycle, approved);
        } else {
            debug!("Cycle {}: nothing to approve", cycle);
        }

        tokio::select! {
            _ = sleep(poll_interval) => {}
            _ = signal::ctrl_c() => {
                info!("Shutdown signal received");
                return Ok(());
            }
        }
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
