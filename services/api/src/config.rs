use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub ingest: IngestConfig,
    pub cors: CorsConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct IngestConfig {
    pub max_document_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub max_age_seconds: usize,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Session used when a request carries no `X-Session-Id` header.
    pub default_session: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            ingest: IngestConfig {
                max_document_bytes: 10 * 1024 * 1024,
            },
            cors: CorsConfig {
                max_age_seconds: 3600,
            },
            session: SessionConfig {
                default_session: "default".to_string(),
            },
        }
    }
}

impl Config {
    /// Reads `LOOKTHROUGH_*` variables. Missing or unparseable values fall back
    /// to the defaults.
    pub fn from_env() -> Self {
        let defaults = Config::default();
        Config {
            server: ServerConfig {
                host: env::var("LOOKTHROUGH_API_HOST").unwrap_or(defaults.server.host),
                port: env_or("LOOKTHROUGH_API_PORT", defaults.server.port),
            },
            ingest: IngestConfig {
                max_document_bytes: env_or(
                    "LOOKTHROUGH_MAX_DOCUMENT_BYTES",
                    defaults.ingest.max_document_bytes,
                ),
            },
            cors: CorsConfig {
                max_age_seconds: env_or("LOOKTHROUGH_CORS_MAX_AGE", defaults.cors.max_age_seconds),
            },
            session: SessionConfig {
                default_session: env::var("LOOKTHROUGH_DEFAULT_SESSION")
                    .ok()
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or(defaults.session.default_session),
            },
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
