use dotenvy::dotenv;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mergington_activities::config::AppConfig;
use mergington_activities::database::activity_directory::ActivityDirectory;
use mergington_activities::web::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // 1. Logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mergington_activities=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Config + seeded directory
    let config = AppConfig::from_env();
    let directory = ActivityDirectory::seeded();
    info!(
        build = env!("MERGINGTON_BUILD_ID"),
        activities = directory.len(),
        static_dir = %config.static_dir.display(),
        "activity directory seeded"
    );

    let app = web::build_router(AppState::new(directory), &config.static_dir);

    // 3. Bind, falling back to the next port when the primary one is taken
    let addr = config.socket_addr()?;
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            let fallback = config.fallback_socket_addr()?;
            warn!("Could not bind {}: {}. Trying fallback {}", addr, e, fallback);
            tokio::net::TcpListener::bind(fallback).await?
        }
    };

    let bound_addr = listener.local_addr()?;
    info!("Server running on http://{}", bound_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
