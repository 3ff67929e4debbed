// rest/mod.rs — Public REST API server.
//
// Axum HTTP server bridging JSON requests to the habit model. Request
// shapes are plain serde structs validated at extraction time; the
// handlers only translate between wire JSON and `HabitModel` calls.
//
// Endpoints:
//   GET    /habit/meditation          (interpolated history)
//   POST   /habit/meditation          (record performed dates)
//   DELETE /habit/meditation          (remove dates)
//   GET    /habit/meditation/streak
//   GET    /health

pub mod error;
pub mod routes;

use anyhow::Result;
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::AppContext;

pub async fn start_rest_server(ctx: Arc<AppContext>) -> Result<()> {
    let bind = format!("{}:{}", ctx.config.bind_address, ctx.config.port);
    let addr: SocketAddr = bind.parse()?;

    let router = build_router(ctx);

    info!("REST API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

pub fn build_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        // Health (no body, no params)
        .route("/health", get(routes::health::health))
        // The one habit this daemon tracks
        .route(
            "/habit/meditation",
            get(routes::habit::get_history)
                .post(routes::habit::add_dates)
                .delete(routes::habit::delete_dates),
        )
        .route("/habit/meditation/streak", get(routes::habit::get_streak))
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}
