use std::collections::HashSet;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use super::claims::Claims;
use crate::config::JwtConfig;

pub const BEARER_PREFIX: &str = "Bearer ";

/// The only algorithm tokens are minted and accepted with.
const ALGORITHM: Algorithm = Algorithm::HS256;

/// Why the auth gate turned a request away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthRejection {
    #[error("authorization header required")]
    MissingHeader,
    #[error("invalid authorization header format")]
    InvalidHeader,
    #[error("invalid or expired token")]
    InvalidToken,
    #[error("invalid token payload")]
    InvalidPayload,
    #[error("token has expired")]
    Expired,
}

/// Holds JWT signing and verification keys built from the server secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtKeys {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            ttl: Duration::seconds(config.ttl_hours.saturating_mul(3600)),
        }
    }

    /// Mints a session token for a user whose password already matched.
    pub fn issue(&self, user_id: Uuid, email: &str) -> anyhow::Result<String> {
        let exp = OffsetDateTime::now_utc()
            .checked_add(self.ttl)
            .ok_or_else(|| anyhow::anyhow!("token expiry out of range"))?;
        let claims = Claims {
            user_id: user_id.to_string(),
            email: email.to_string(),
            exp: exp.unix_timestamp(),
        };
        let token = self.sign(&claims)?;
        debug!(%user_id, "jwt issued");
        Ok(token)
    }

    pub fn sign<T: Serialize>(&self, claims: &T) -> anyhow::Result<String> {
        Ok(encode(&Header::new(ALGORITHM), claims, &self.encoding)?)
    }

    /// Checks algorithm, signature and expiry, then pulls the user id out of
    /// the claim set.
    pub fn verify(&self, token: &str) -> Result<Uuid, AuthRejection> {
        let mut validation = Validation::new(ALGORITHM);
        // exp is checked below only when present
        validation.required_spec_claims = HashSet::new();

        let data = decode::<Value>(token, &self.decoding, &validation)
            .map_err(|_| AuthRejection::InvalidToken)?;

        let Value::Object(claims) = data.claims else {
            return Err(AuthRejection::InvalidPayload);
        };

        let user_id = claims
            .get("user_id")
            .and_then(Value::as_str)
            .and_then(|raw| Uuid::parse_str(raw).ok())
            .ok_or(AuthRejection::InvalidPayload)?;

        // decode() allows a leeway on exp; the token lifetime is exact here.
        if let Some(exp) = claims.get("exp") {
            let exp = exp
                .as_i64()
                .or_else(|| exp.as_f64().map(|secs| secs as i64))
                .ok_or(AuthRejection::InvalidPayload)?;
            if OffsetDateTime::now_utc().unix_timestamp() > exp {
                return Err(AuthRejection::Expired);
            }
        }

        Ok(user_id)
    }

    /// Full gate: raw `Authorization` header value in, user id out.
    pub fn authorize(&self, header: Option<&str>) -> Result<Uuid, AuthRejection> {
        let token = bearer_token(header)?;
        self.verify(token)
    }
}

pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthRejection> {
    let raw = header
        .filter(|h| !h.is_empty())
        .ok_or(AuthRejection::MissingHeader)?;
    match raw.strip_prefix(BEARER_PREFIX) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(AuthRejection::InvalidHeader),
    }
}
