use std::future::Future;
use std::sync::Arc;

use axum::Router;
use configs::AppConfig;
use migration::{Migrator, MigratorTrait};
use service::listing::{ImagePolicy, ListingService, SeaOrmListingRepository};
use service::media;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes::{self, ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Connect the store, apply pending migrations and wire the listing service.
pub async fn build_state(cfg: &AppConfig) -> anyhow::Result<ServerState> {
    let db = models::db::connect_with_config(&cfg.database).await?;
    Migrator::up(&db, None).await?;
    info!("migrations applied");

    let repo = Arc::new(SeaOrmListingRepository::new(db));
    let uploader = media::from_config(&cfg.media);
    let policy = ImagePolicy::from_config(&cfg.listings);
    info!(?policy, "listing service ready");
    Ok(ServerState { listings: Arc::new(ListingService::new(repo, uploader, policy)) })
}

pub fn build_app(state: ServerState, cfg: &AppConfig) -> Router {
    routes::build_router(state, build_cors(), cfg.server.max_body_bytes)
}

/// Build the app and serve it until `shutdown` resolves.
pub async fn run<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = build_state(&cfg).await?;
    let app = build_app(state, &cfg);

    let addr = cfg.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "listing dashboard api listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    info!("server stopped");
    Ok(())
}
