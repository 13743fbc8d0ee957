//! # linkpeek API Server
//!
//! HTTP surface of the link preview resolver.
//!
//! ## Endpoints
//!
//! - `GET /link_resolver/:url` - Preview for a percent-encoded URL
//! - `GET /health` - Liveness and cache statistics
//!
//! ## Example
//!
//! ```rust,ignore
//! use linkpeek_api::{ApiServer, ApiConfig};
//!
//! let server = ApiServer::new(ApiConfig::from_env()?)?;
//! server.run(([0, 0, 0, 0], 8080)).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod dto;
mod error;
mod handlers;
mod routes;
mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::{ApiConfig, AppState};

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use linkpeek_core::Result;

/// API server for linkpeek.
pub struct ApiServer {
    state: Arc<AppState>,
}

impl ApiServer {
    /// Creates a new API server with the given configuration.
    pub fn new(config: ApiConfig) -> Result<Self> {
        Ok(Self {
            state: Arc::new(AppState::new(config)?),
        })
    }

    /// The shared application state.
    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Creates the router with all routes and middleware configured.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        create_router(self.state.clone())
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Runs the server on the given address.
    pub async fn run(self, addr: impl Into<SocketAddr>) -> Result<()> {
        let addr = addr.into();

        if let Some(every) = self.state.config.cache.compaction_interval() {
            self.state.coalescer.spawn_compaction(every);
        }

        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("linkpeek API server listening on {}", addr);

        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}
