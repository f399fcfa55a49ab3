use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::{
    response::Json,
    routing::{delete, get, patch, post},
    Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use super::{admin, directory, tokens, AppState};
use crate::config::ServerConfig;

#[derive(Clone)]
pub struct WebServer {
    pub port: u16,
    pub host: String,
    pub state: AppState,
}

impl WebServer {
    pub fn new(config: &ServerConfig, state: AppState) -> Self {
        Self {
            port: config.port,
            host: config.bind_host().to_string(),
            state,
        }
    }

    /// Serve until Ctrl+C
    pub async fn start(&self) -> Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.host, self.port))?;

        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        info!("🚀 Hospital API listening on http://{}", addr);

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        axum::serve(listener, self.create_app())
            .with_graceful_shutdown(shutdown)
            .await
            .context("Web server failed")?;

        info!("Web server stopped");
        Ok(())
    }

    pub fn create_app(&self) -> Router {
        create_router(self.state.clone())
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route(
            "/api/tokens",
            get(tokens::list_tokens)
                .post(tokens::create_token)
                .delete(tokens::clear_queue),
        )
        .route("/api/tokens/stats", get(tokens::get_stats))
        .route("/api/tokens/call-next", post(tokens::call_next))
        .route("/api/tokens/mark-completed", post(tokens::mark_completed))
        .route("/api/tokens/:id", delete(tokens::remove_token))
        .route("/api/departments", get(directory::list_departments))
        .route("/api/departments/:id", get(directory::get_department))
        .route(
            "/api/doctors",
            get(directory::list_doctors).post(directory::add_doctor),
        )
        .route(
            "/api/doctors/:id",
            get(directory::get_doctor).delete(directory::delete_doctor),
        )
        .route("/api/doctors/:id/toggle-duty", patch(directory::toggle_on_duty))
        .route(
            "/api/appointments",
            get(directory::list_appointments).post(directory::create_appointment),
        )
        .route("/api/appointments/search", get(directory::search_appointments))
        .route("/api/hospital/stats", get(directory::hospital_stats))
        .route("/api/hospital/services", get(directory::hospital_services))
        .route("/api/admin/stats", get(admin::get_stats))
        .route("/api/admin/login", post(admin::login))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "Hospital Management System API - Backend is running",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "tokens": "/api/tokens",
            "doctors": "/api/doctors",
            "departments": "/api/departments",
            "appointments": "/api/appointments",
            "hospital": "/api/hospital/stats",
            "admin": "/api/admin/stats",
        },
    }))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for ctrl_c: {}", e);
        std::future::pending::<()>().await;
    }
    info!("🛑 Received Ctrl+C, shutting down...");
}
