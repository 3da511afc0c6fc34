//! Batch roster ingestion.
//!
//! Reads one admission export, filters it to the target programme and
//! upserts every surviving row into the shared roster store. Runs to
//! completion; re-running with the same export is harmless because
//! upserts are last-write-wins.

mod config;
mod feed;

use admission_store::{RosterStore, Store};
use config::Config;
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log.level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        feed = %config.feed.path,
        category = %config.feed.category,
        filter = %config.feed.programme_filter,
        "Starting roster ingestion"
    );

    let rows = feed::read_feed(Path::new(&config.feed.path)).await?;
    let roster = RosterStore::open(Store::file(&config.storage.roster_path)).await?;

    let mut saved = 0usize;
    let mut skipped = 0usize;
    let mut failed = 0usize;

    for row in &rows {
        if !feed::matches_programme(row, &config.feed.programme_filter) {
            skipped += 1;
            continue;
        }

        // One bad row must not abort the batch
        match roster
            .upsert(
                &row.applicant_id,
                &row.full_name,
                &row.programme,
                &config.feed.category,
            )
            .await
        {
            Ok(()) => saved += 1,
            Err(e) => {
                error!(applicant_id = %row.applicant_id, error = %e, "Failed to save roster record");
                failed += 1;
            }
        }
    }

    info!(
        total = rows.len(),
        saved, skipped, failed,
        roster = roster.count().await,
        "Ingestion complete"
    );

    Ok(())
}
