use std::net::SocketAddr;

use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Process configuration, read from the environment (and `.env` if present).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the wardrobe backend. `None` runs the in-process demo service.
    pub api_base: Option<String>,
    pub port: u16,
    /// Allowed CORS origins; empty means any.
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_base = lookup("OUTFIT_API_BASE").filter(|v| !v.trim().is_empty());
        let port = lookup("PORT").and_then(|v| v.parse().ok()).unwrap_or(8080);
        let cors_origins = lookup("CORS_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty() && *o != "*")
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        Self { api_base, port, cors_origins }
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    pub fn cors(&self) -> CorsLayer {
        let origin = if self.cors_origins.is_empty() {
            AllowOrigin::from(Any)
        } else {
            AllowOrigin::list(self.cors_origins.iter().filter_map(|o| o.parse().ok()))
        };
        CorsLayer::new().allow_origin(origin).allow_methods(Any).allow_headers(Any)
    }
}
