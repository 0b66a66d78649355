use std::env;
use std::fs;

use crate::error::ShareWaveError;

const DEFAULT_DATABASE: &str = "shareWave";
const DEFAULT_HTTP_PORT: &str = "3000";
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:5173";

#[derive(Debug, Clone)]
pub struct Settings {
    pub mongodb_uri: String,
    pub mongodb_database: String,
    /// HS256 secret used to sign session tokens
    pub jwt_secret: String,
    pub http_port: u16,
    /// Origins allowed to call the API with credentials
    pub allowed_origins: Vec<String>,
    /// Production mode changes the flags on the cleared session cookie
    pub production: bool,
}

impl Settings {
    /// Validates the settings and returns an error if invalid.
    pub fn validate(&self) -> Result<(), ShareWaveError> {
        validate_mongodb_uri(&self.mongodb_uri)?;
        validate_not_blank("MONGODB_DATABASE", &self.mongodb_database)?;
        validate_not_blank("JWT_ACCESS_SECRET", &self.jwt_secret)?;
        validate_port(self.http_port)?;
        if self.allowed_origins.is_empty() {
            return Err(ShareWaveError::Config(
                "At least one CORS origin is required".into(),
            ));
        }
        for origin in &self.allowed_origins {
            validate_origin(origin)?;
        }
        Ok(())
    }
}

fn validate_not_blank(name: &str, value: &str) -> Result<(), ShareWaveError> {
    if value.trim().is_empty() {
        return Err(ShareWaveError::Config(format!("{name} cannot be empty")));
    }
    Ok(())
}

fn validate_mongodb_uri(uri: &str) -> Result<(), ShareWaveError> {
    if !(uri.starts_with("mongodb://") || uri.starts_with("mongodb+srv://")) {
        return Err(ShareWaveError::Config(
            "MONGODB_URI must start with mongodb:// or mongodb+srv://".into(),
        ));
    }
    Ok(())
}

/// Validates that the port is in valid range (1-65535).
fn validate_port(port: u16) -> Result<(), ShareWaveError> {
    if port == 0 {
        return Err(ShareWaveError::Config("Port cannot be 0".into()));
    }
    Ok(())
}

fn validate_origin(origin: &str) -> Result<(), ShareWaveError> {
    if !(origin.starts_with("http://") || origin.starts_with("https://")) {
        return Err(ShareWaveError::Config(format!(
            "Invalid CORS origin: {origin}"
        )));
    }
    Ok(())
}

/// Read a value from environment variable, with support for _FILE suffix (Docker Secrets)
fn get_env_or_file(env_name: &str) -> Result<String, Box<dyn std::error::Error>> {
    let file_env = format!("{env_name}_FILE");
    if let Ok(file_path) = env::var(&file_env) {
        match fs::read_to_string(&file_path) {
            Ok(content) => return Ok(content.trim().to_string()),
            Err(e) => return Err(format!("Failed to read {file_env}: {e}").into()),
        }
    }

    env::var(env_name).map_err(|_| {
        format!("Missing required environment variable: {env_name} or {file_env}").into()
    })
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| origin.trim_end_matches('/').to_string())
        .collect()
}

pub fn get_configuration() -> Result<Settings, Box<dyn std::error::Error>> {
    let mongodb_uri = get_env_or_file("MONGODB_URI")?;
    let mongodb_database =
        env::var("MONGODB_DATABASE").unwrap_or_else(|_| DEFAULT_DATABASE.to_string());
    let jwt_secret = get_env_or_file("JWT_ACCESS_SECRET")?;

    let http_port = env::var("PORT")
        .unwrap_or_else(|_| DEFAULT_HTTP_PORT.to_string())
        .parse::<u16>()?;

    let allowed_origins = parse_origins(
        &env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGINS.to_string()),
    );

    let production = env::var("APP_ENV").is_ok_and(|v| v.eq_ignore_ascii_case("production"));

    let settings = Settings {
        mongodb_uri,
        mongodb_database,
        jwt_secret,
        http_port,
        allowed_origins,
        production,
    };

    settings.validate()?;

    Ok(settings)
}
