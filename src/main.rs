use std::sync::Arc;

use outfit_studio::{
    config::Config,
    demo::DemoOutfitService,
    routes::{router, AppState},
    service::{HttpOutfitService, OutfitService},
};
use tower::ServiceBuilder;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let config = Config::from_env();
    let service: Arc<dyn OutfitService> = match &config.api_base {
        Some(base) => {
            tracing::info!("Using wardrobe service at {}", base);
            Arc::new(HttpOutfitService::new(base.clone()))
        }
        None => {
            tracing::info!("OUTFIT_API_BASE not set, running with the demo service");
            Arc::new(DemoOutfitService::new())
        }
    };
    if let Err(e) = service.ping().await {
        tracing::warn!("⚠️ Wardrobe service not reachable yet: {}", e);
    }

    let app = router(AppState::new(service)).layer(ServiceBuilder::new().layer(config.cors()));

    let addr = config.addr();
    tracing::info!(%addr, "Starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;
    Ok(())
}
