pub mod router;
pub mod server;
pub mod state;
pub mod tracing;

use crate::adapter::mongo::MongoConnection;
use crate::config;
use crate::error::ShareWaveError;

/// Application entry point. Initializes tracing and configuration, connects
/// to MongoDB, serves until a shutdown signal, then closes the connection.
pub async fn run() -> Result<(), ShareWaveError> {
    // Handle healthcheck subcommand (for Docker healthcheck in distroless image)
    if std::env::args().nth(1).as_deref() == Some("healthcheck") {
        match crate::healthcheck().await {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                eprintln!("Healthcheck failed: {e}");
                std::process::exit(1)
            }
        }
    }

    tracing::init_tracing();

    let settings =
        config::get_configuration().map_err(|e| ShareWaveError::Config(e.to_string()))?;
    ::tracing::info!(
        port = settings.http_port,
        database = %settings.mongodb_database,
        production = settings.production,
        "Loaded settings"
    );

    let connection =
        MongoConnection::connect(&settings.mongodb_uri, &settings.mongodb_database).await?;

    let app_state = state::AppState::from_connection(&connection, &settings);
    let app = router::with_layers(router::api_router(app_state), &settings.allowed_origins);

    let served = server::serve(app, settings.http_port).await;

    connection.shutdown().await;
    served
}
