pub mod api;
pub mod config;
pub mod models;
pub mod persistence;
pub mod postgres;
pub mod service;

use axum::{Router, serve::Serve};
use tower_http::trace::TraceLayer;

use crate::api::{app_state::AppState, routes::api_router};

pub struct Application {
    server: Serve<tokio::net::TcpListener, Router, Router>,
    pub address: String,
}

impl Application {
    pub async fn build(
        address: &str,
        app_state: AppState,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let router = api_router(app_state).layer(TraceLayer::new_for_http());

        let listener = tokio::net::TcpListener::bind(address).await?;
        let address = listener.local_addr()?.to_string();
        let server = axum::serve(listener, router);

        Ok(Self { server, address })
    }

    pub async fn run(self) -> Result<(), std::io::Error> {
        tracing::info!("listening on {}", &self.address);
        self.server.await
    }
}
