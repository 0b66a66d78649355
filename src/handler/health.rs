use tracing::info;

/// Handler for GET /
pub async fn root_handler() -> &'static str {
    "share wave starting"
}

/// Handler for GET /health
pub async fn health_handler() -> &'static str {
    info!("Health check requested");
    "Healthy"
}
