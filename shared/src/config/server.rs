//! Server configuration module

use serde::{Deserialize, Serialize};

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Worker threads (0 = number of CPU cores)
    #[serde(default)]
    pub workers: usize,

    /// Maximum request body size in bytes, bounds multipart image uploads
    #[serde(default = "default_max_payload_size")]
    pub max_payload_size: usize,

    /// Public base URL of this API, used to build OAuth callback URLs
    pub public_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("127.0.0.1"),
            port: 5000,
            workers: 0,
            max_payload_size: default_max_payload_size(),
            public_url: String::from("http://localhost:5000"),
        }
    }
}

impl ServerConfig {
    /// Create a new server configuration
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Load from `SERVER_HOST`, `SERVER_PORT`, `SERVER_WORKERS`,
    /// `MAX_PAYLOAD_SIZE` and `API_BASE_URL`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let host = std::env::var("SERVER_HOST").unwrap_or(defaults.host);
        let port = std::env::var("SERVER_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);
        let workers = std::env::var("SERVER_WORKERS")
            .ok()
            .and_then(|w| w.parse().ok())
            .unwrap_or(defaults.workers);
        let max_payload_size = std::env::var("MAX_PAYLOAD_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.max_payload_size);
        let public_url = std::env::var("API_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}", port));

        Self {
            host,
            port,
            workers,
            max_payload_size,
            public_url: public_url.trim_end_matches('/').to_string(),
        }
    }

    /// Get the bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
    /// Allowed origins; empty means any origin is accepted
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    /// Max age for preflight cache in seconds
    #[serde(default = "default_max_age")]
    pub max_age: usize,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![],
            max_age: default_max_age(),
        }
    }
}

impl CorsConfig {
    /// Load from the comma separated `ALLOWED_ORIGINS` and `CORS_MAX_AGE`
    pub fn from_env() -> Self {
        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();
        let max_age = std::env::var("CORS_MAX_AGE")
            .ok()
            .and_then(|m| m.parse().ok())
            .unwrap_or_else(default_max_age);

        Self {
            allowed_origins,
            max_age,
        }
    }

    /// Whether every origin is accepted
    pub fn is_permissive(&self) -> bool {
        self.allowed_origins.is_empty()
    }
}

fn default_max_payload_size() -> usize {
    10 * 1024 * 1024 // 10 MB
}

fn default_max_age() -> usize {
    3600
}
