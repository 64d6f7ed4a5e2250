use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod record;
mod refresh;
mod routes;
mod sources;
mod store;
mod utils;

use config::Config;
use refresh::{spawn_schedule, Refresher};
use routes::{create_router, AppState};
use sources::HttpUpstream;
use store::{CacheStore, MemoryStore, RedisStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "air_quality_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let store: Arc<dyn CacheStore> = match RedisStore::connect(&config.redis_url).await {
        Ok(redis) => Arc::new(redis),
        Err(e) => {
            tracing::warn!(
                "Redis unavailable at {} ({}), falling back to in-memory store",
                config.redis_url,
                e
            );
            Arc::new(MemoryStore::new())
        }
    };

    let upstream = Arc::new(HttpUpstream::new(&config)?);

    let refresher = Arc::new(Refresher::new(
        upstream,
        store,
        config.site.clone(),
        config.stale_after(),
    ));

    spawn_schedule(refresher.clone(), config.refresh_every());

    let state = AppState { refresher };

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server is running on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
