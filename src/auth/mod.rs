use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::config::SecurityConfig;

/// Owner name recorded for trips the service identity creates.
pub const SERVICE_IDENTITY_NAME: &str = "service_role";

/// The principal a request executes as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallerIdentity {
    /// Privileged service credential; skips per-row ownership filters.
    Service,
    User(String),
}

impl CallerIdentity {
    pub fn is_service(&self) -> bool {
        matches!(self, CallerIdentity::Service)
    }

    /// Owner value this identity filters on, `None` for the service identity.
    pub fn owner_filter(&self) -> Option<&str> {
        match self {
            CallerIdentity::Service => None,
            CallerIdentity::User(id) => Some(id),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CallerIdentity::Service => SERVICE_IDENTITY_NAME,
            CallerIdentity::User(id) => id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

impl Claims {
    pub fn new(sub: impl Into<String>, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: sub.into(),
            exp: (now + ttl).timestamp(),
            iat: Some(now.timestamp()),
            aud: None,
        }
    }

    pub fn with_audience(mut self, aud: Option<String>) -> Self {
        self.aud = aud;
        self
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No authorization token provided")]
    MissingHeader,

    #[error("Malformed authorization header")]
    MalformedHeader,

    #[error("Invalid authentication token: {0}")]
    InvalidToken(String),

    #[error("Token generation failed: {0}")]
    TokenGeneration(String),
}

/// Turns an `Authorization` header value into a [`CallerIdentity`].
pub struct IdentityResolver {
    service_key: SecretString,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl IdentityResolver {
    pub fn new(security: &SecurityConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        match &security.jwt_audience {
            // A configured audience also makes the claim mandatory.
            Some(aud) => {
                validation.set_required_spec_claims(&["exp", "sub", "aud"]);
                validation.set_audience(&[aud.as_str()]);
            }
            None => {
                validation.set_required_spec_claims(&["exp", "sub"]);
                validation.validate_aud = false;
            }
        }

        Self {
            service_key: security.service_key.clone(),
            decoding_key: DecodingKey::from_secret(security.jwt_secret.expose_secret().as_bytes()),
            validation,
        }
    }

    pub fn resolve(&self, header: Option<&str>) -> Result<CallerIdentity, AuthError> {
        let result = self.resolve_inner(header);
        if let Err(e) = &result {
            let fingerprint = header
                .and_then(|h| h.split_once(' '))
                .map(|(_, token)| token_fingerprint(token))
                .unwrap_or_else(|| "-".to_string());
            tracing::warn!(reason = %e, token = %fingerprint, "authentication failed");
        }
        result
    }

    fn resolve_inner(&self, header: Option<&str>) -> Result<CallerIdentity, AuthError> {
        let header = header.ok_or(AuthError::MissingHeader)?;
        let token = parse_authorization(header)?;

        let service_key = self.service_key.expose_secret();
        if !service_key.is_empty() && token == service_key {
            tracing::debug!("service credential presented, ownership filters bypassed");
            return Ok(CallerIdentity::Service);
        }

        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        if data.claims.sub.trim().is_empty() {
            return Err(AuthError::InvalidToken("empty subject claim".to_string()));
        }

        Ok(CallerIdentity::User(data.claims.sub))
    }
}

/// Splits `"<scheme> <token>"` and returns the token.
fn parse_authorization(header: &str) -> Result<&str, AuthError> {
    let (scheme, token) = header.trim().split_once(' ').ok_or(AuthError::MalformedHeader)?;
    let token = token.trim();
    if scheme.is_empty() || token.is_empty() || token.contains(' ') {
        return Err(AuthError::MalformedHeader);
    }
    Ok(token)
}

/// Short SHA-256 prefix of a token, safe to put in logs.
pub fn token_fingerprint(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    digest.iter().take(6).map(|b| format!("{:02x}", b)).collect()
}

pub fn issue_token(claims: &Claims, secret: &SecretString) -> Result<String, AuthError> {
    let secret = secret.expose_secret();
    if secret.is_empty() {
        return Err(AuthError::TokenGeneration("signing secret not configured".to_string()));
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::new(Algorithm::HS256), claims, &encoding_key)
        .map_err(|e| AuthError::TokenGeneration(e.to_string()))
}
