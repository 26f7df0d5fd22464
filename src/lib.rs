//! Revalidation backend for the storefront.
//!
//! The storefront's pages are statically rendered and cached; when content
//! changes (a product, a blog post), the CMS webhook calls this service,
//! which marks the changed page and its dependent listing pages stale so the
//! renderer regenerates them on the next request. Uploads from the admin
//! back-office are proxied through here to object storage so the service key
//! never reaches the browser.
//!
//! # Infrastructure
//! - Content lives in the hosted backend, read over its REST endpoint
//! - Staleness markers live in Redis, consumed by the renderer
//! - Triggers are protected by a shared secret read from `/run/secrets`
use std::time::Duration;

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod cache;
pub mod config;
pub mod content;
pub mod error;
pub mod resolver;
pub mod routes;
pub mod state;
pub mod storage;

#[cfg(test)]
pub mod testing;

use routes::{health_handler, revalidate_handler, revalidate_query_handler, upload_handler};
use state::State;

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = State::new().await;

    info!("Starting server...");

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let app = Router::new()
        .route(
            "/revalidate",
            post(revalidate_handler).get(revalidate_query_handler),
        )
        .route("/upload", post(upload_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .with_state(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
