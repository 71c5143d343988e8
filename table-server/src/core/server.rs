//! Server Implementation
//!
//! HTTP 服务器启动和管理

use std::net::SocketAddr;
use std::time::Duration;

use axum::{Router, http::StatusCode, middleware};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::auth::identify;
use crate::core::{Config, Result, ServerState};

/// Build the fully layered application
///
/// Used by the HTTP server and by in-process tests.
pub fn build_app(state: ServerState) -> Router {
    let timeout = request_timeout(state.config.request_timeout_ms);

    crate::api::router()
        // 身份头 -> CurrentUser, 在所有路由之前执行
        .layer(middleware::from_fn(identify))
        .with_state(state)
        .layer(timeout)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// 超时请求返回 408
fn request_timeout(timeout_ms: u64) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, Duration::from_millis(timeout_ms))
}

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self { config, state: None }
    }

    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> Result<()> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await?,
        };

        let tasks = state.start_background_tasks();
        let app = build_app(state);

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Table server listening on {}", addr);

        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        };

        axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;

        tasks
            .shutdown(Duration::from_millis(self.config.shutdown_timeout_ms))
            .await;
        Ok(())
    }
}
