use std::time::Duration;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, warn};

use crate::{config::JwtConfig, error::AppError, state::AppState, users::store::Role};

/// JWT payload used for authentication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,   // user ID
    pub role: Role, // access level copied into the token
    pub iat: usize, // issued at (unix timestamp)
    pub exp: usize, // expires at (unix timestamp)
}

/// Holds the signing and verification keys plus the token lifetime.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig { secret, ttl_hours } = state.config.jwt.clone();
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::from_secs((ttl_hours as u64) * 3600),
        }
    }
}

impl JwtKeys {
    pub fn sign(&self, user_id: i64, role: Role) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            sub: user_id,
            role,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id, "jwt signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        debug!(user_id = data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}

/// Extracts and verifies the bearer token, exposing the decoded claims to
/// the handler. A missing header is unauthenticated; a token that fails
/// verification is forbidden.
pub struct AuthUser(pub Claims);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::MissingToken)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::MissingToken)?;

        match keys.verify(token) {
            Ok(claims) => Ok(AuthUser(claims)),
            Err(e) => {
                warn!(error = %e, "invalid or expired token");
                Err(AppError::InvalidToken)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys(secret: &str) -> JwtKeys {
        JwtKeys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::from_secs(4 * 3600),
        }
    }

    #[test]
    fn sign_and_verify_roundtrip() {
        let keys = make_keys("dev-secret");
        let token = keys.sign(42, Role::Admin).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, Role::Admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn verify_rejects_a_tampered_token() {
        let keys = make_keys("dev-secret");
        let token = keys.sign(42, Role::User).expect("sign");
        let mut tampered = token.clone();
        // flip the last signature character
        let last = tampered.pop().expect("non-empty token");
        tampered.push(if last == 'A' { 'B' } else { 'A' });
        assert!(keys.verify(&tampered).is_err());
    }

    #[test]
    fn verify_rejects_a_token_from_another_secret() {
        let keys = make_keys("dev-secret");
        let other = make_keys("other-secret");
        let token = other.sign(42, Role::User).expect("sign");
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn verify_rejects_an_expired_token() {
        let keys = make_keys("dev-secret");
        let now = OffsetDateTime::now_utc().unix_timestamp();
        // expired an hour ago, well past the default leeway
        let claims = Claims {
            sub: 42,
            role: Role::User,
            iat: (now - 7200) as usize,
            exp: (now - 3600) as usize,
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).expect("encode");
        assert!(keys.verify(&token).is_err());
    }
}
