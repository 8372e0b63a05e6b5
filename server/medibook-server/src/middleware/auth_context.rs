//! Bearer-token extraction.
//!
//! Handlers that take an [`AuthContext`] parameter only run for requests
//! carrying a valid signed token; everything else is rejected with a 401
//! before the handler body starts.

use crate::error::ApiError;
use crate::server::MedibookServer;
use auth_identity::models::Role;
use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use uuid::Uuid;

/// Caller identity extracted from the bearer token.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub role: Role,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    MedibookServer: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::authentication("Missing Authorization header"))?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::authentication("Expected a bearer token"))?;

        let server = MedibookServer::from_ref(state);
        let claims = server.token_issuer().verify(token)?;
        Ok(Self {
            user_id: claims.sub,
            role: claims.role,
        })
    }
}
