//! TrailBldr editor - composition root binary.
//!
//! Wires the desktop storage, the stored session and the HTTP adapter
//! together, then lists the logged-in user's scenarios. The editing surface
//! itself lives behind the library API.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trailbldr_editor::application::{EditBuffer, ScenarioService, SessionService};
use trailbldr_editor::infrastructure::{FileStorageProvider, HttpScenarioApi};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trailbldr_editor=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting TrailBldr editor");

    let sessions = SessionService::new(FileStorageProvider::new());
    let session = sessions.load();
    let Some(token) = session.token else {
        tracing::error!("no stored session token; log in from the app first");
        return Ok(());
    };

    let api = Arc::new(HttpScenarioApi::from_env()?);
    let scenarios = ScenarioService::new(api);

    let mut buffer = EditBuffer::new();
    scenarios.fetch_scenarios(&mut buffer, &token).await;
    if let Some(error) = buffer.last_error.as_deref() {
        tracing::error!(error, "scenario listing failed");
        return Ok(());
    }

    tracing::info!(count = buffer.scenarios.len(), "loaded scenarios");
    for scenario in &buffer.scenarios {
        println!(
            "#{} {} [{}]",
            scenario.id,
            scenario.title,
            if scenario.published {
                "published"
            } else {
                "draft"
            }
        );
    }
    Ok(())
}
