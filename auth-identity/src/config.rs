use serde::{Deserialize, Serialize};

/// Configuration for the auth flows, injected at construction rather than
/// read from ambient process state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for signing bearer tokens.
    pub jwt_secret: String,
    /// Bearer token validity window, in hours.
    pub token_ttl_hours: i64,
    /// Password reset window, in minutes.
    pub reset_token_ttl_minutes: i64,
    /// Base URL the reset link points at.
    pub frontend_base_url: String,
}

impl AuthConfig {
    /// Load auth configuration from environment variables, falling back to
    /// development defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            jwt_secret: std::env::var("JWT_SECRET").unwrap_or(defaults.jwt_secret),
            token_ttl_hours: std::env::var("JWT_TTL_HOURS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.token_ttl_hours),
            reset_token_ttl_minutes: std::env::var("RESET_TOKEN_TTL_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.reset_token_ttl_minutes),
            frontend_base_url: std::env::var("FRONTEND_URL").unwrap_or(defaults.frontend_base_url),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "medibook-dev-secret".to_string(),
            token_ttl_hours: 5,
            reset_token_ttl_minutes: 10,
            frontend_base_url: "http://localhost:3000".to_string(),
        }
    }
}
