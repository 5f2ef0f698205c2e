//! Seed script for development. Fills empty collections without starting
//! the HTTP server.
//!
//! Usage: `cargo run --bin seed`
//!
//! Requires the `DATABASE_URL` environment variable (reads .env).

use dashboard_api::config::AppConfig;
use dashboard_api::services::seed::SeedOutcome;
use dashboard_api::startup;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "dashboard_api=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    println!("=== Dashboard Seed Script ===");

    let (_state, report) = startup::prepare(config).await?;

    for (collection, outcome) in &report.collections {
        match outcome {
            SeedOutcome::Seeded { inserted } => {
                println!("[done] Inserted {inserted} {collection} records");
            }
            SeedOutcome::Skipped { existing } => {
                println!("[skip] {collection} already has {existing} records");
            }
        }
    }

    println!("\n=== Seed complete! ({} records inserted) ===", report.inserted());
    Ok(())
}
