use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::app::AppState;
use crate::auth::{AuthError, CallerIdentity};
use crate::error::ApiError;

/// Caller identity resolved from the `Authorization` header.
///
/// Runs before any body extractor, so a bad credential is rejected before the
/// payload is parsed or the store is touched.
#[derive(Clone, Debug)]
pub struct Authenticated(pub CallerIdentity);

#[async_trait]
impl FromRequestParts<AppState> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = match parts.headers.get(AUTHORIZATION) {
            Some(value) => Some(value.to_str().map_err(|_| AuthError::MalformedHeader)?),
            None => None,
        };

        let identity = state.resolver.resolve(header)?;
        Ok(Authenticated(identity))
    }
}
