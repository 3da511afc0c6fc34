//! Verification API server entry point.

use admission_store::{RosterStore, Store, WhitelistRegistry};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use verification_api::api::GroupLinks;
use verification_api::{create_router_with_rate_limit, AppState, Config, RateLimitState};

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

    info!("Starting verification API");

    let roster = RosterStore::open(Store::file(&config.storage.roster_path)).await?;
    let whitelist = WhitelistRegistry::open(
        Store::file(&config.storage.whitelist_path),
        config.phone.clone(),
    )
    .await?;

    info!(
        roster = roster.count().await,
        whitelist = whitelist.count().await,
        "Stores loaded"
    );

    let links = GroupLinks {
        official: config.groups.official_link.clone(),
        unofficial: config.groups.unofficial_link.clone(),
    };

    let state = AppState::new(roster, whitelist, links);
    let rate_limit = RateLimitState::new(
        config.rate_limit.global_per_minute,
        config.rate_limit.per_applicant_per_minute,
    );
    let app = create_router_with_rate_limit(state, rate_limit);

    let addr = config.bind_addr();
    info!(%addr, "Listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
