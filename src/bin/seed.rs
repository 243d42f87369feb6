// Seed - fills the configured database with a small sample site

use page_builder::{app_state::AppState, config::Config, data_seeder::seed_sample_site};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "page_builder=info".into()),
        )
        .init();

    let config = Config::from_env()?;
    info!("Seeding database at {}", config.database.url);

    let state = AppState::new(config).await?;
    let summary = seed_sample_site(&state).await?;

    info!(
        "Seed finished: {} page(s), {} section(s) created",
        summary.pages, summary.sections
    );
    Ok(())
}
