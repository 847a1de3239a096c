use axum::extract::DefaultBodyLimit;
use axum::http::Method;
use axum::routing::{get, post};
use axum::{http, Extension, Router};
use clap::Parser;
use log::{error, info};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::*;
use crate::provider::InvoiceProvider;
use crate::routes::*;
use crate::store::Storage;

mod config;
mod error;
mod models;
mod provider;
mod routes;
mod store;

#[derive(Clone)]
pub struct State {
    pub provider: Arc<dyn InvoiceProvider>,
    pub store: Arc<dyn Storage>,
}

pub fn app(state: State) -> Router {
    Router::new()
        .route("/health-check", get(health_check))
        .route("/invoice", post(create_invoice))
        .route("/invoices", get(list_invoices))
        .route("/invoices/task/:task_id", get(list_invoices_by_task))
        .route("/tasks/:id", get(list_tasks_by_user))
        .fallback(fallback)
        .layer(Extension(state))
        .layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::mirror_request())
                .allow_credentials(true)
                .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS]),
        )
        .layer(DefaultBodyLimit::max(1_000_000)) // max 1mb body size
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    pretty_env_logger::try_init()?;
    let config: Config = Config::parse();

    let state = State {
        provider: config.invoice_provider()?,
        store: config.storage()?,
    };
    info!("Creating invoices with {}", config.provider);

    let addr: std::net::SocketAddr = format!("{}:{}", config.bind, config.port).parse()?;

    info!("Webserver running on http://{addr}");

    let server = axum::Server::bind(&addr).serve(app(state).into_make_service());

    let graceful = server.with_graceful_shutdown(async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for Ctrl+C: {e}");
        }
    });

    // Await the server to receive the shutdown signal
    if let Err(e) = graceful.await {
        error!("shutdown error: {e}");
    }

    Ok(())
}
