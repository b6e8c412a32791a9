mod handlers;
mod state;

use axum::routing::get;
use axum::Router;
use state::AppState;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::geocode::AddressResolver;

pub fn build_router(resolver: AddressResolver) -> Router {
    let state = Arc::new(AppState { resolver });

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/resolve", get(handlers::resolve))
        .route("/api/extract", get(handlers::extract))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start(resolver: AddressResolver, host: &str, port: u16) {
    let app = build_router(resolver);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            eprintln!("Error: Cannot bind to {}: {}", addr, e);
            std::process::exit(1);
        });

    log::info!("rsvp-geo listening on http://{}", addr);
    eprintln!("  rsvp-geo server listening on http://{}", addr);
    eprintln!("  Press Ctrl+C to stop.");

    axum::serve(listener, app)
        .await
        .unwrap_or_else(|e| {
            eprintln!("Server error: {}", e);
            std::process::exit(1);
        });
}
