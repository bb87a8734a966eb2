use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuthError;

/// Claims carried by a nurse session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Nurse id.
    pub sub: String,
    pub iat: u64,
    pub exp: u64,
}

impl SessionClaims {
    pub fn nurse_id(&self) -> Result<Uuid, AuthError> {
        Uuid::parse_str(&self.sub).map_err(|e| AuthError::InvalidToken(format!("bad subject: {e}")))
    }
}

/// HS256 signing keys and session lifetime.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: u64,
}

impl SessionKeys {
    pub fn new(secret: &[u8], ttl_secs: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl_secs,
        }
    }

    /// Issue a token for `nurse_id`, valid for the configured lifetime.
    pub fn issue(&self, nurse_id: Uuid) -> Result<String, AuthError> {
        let now = now_secs();
        self.issue_with_times(nurse_id, now, now + self.ttl_secs)
    }

    fn issue_with_times(&self, nurse_id: Uuid, iat: u64, exp: u64) -> Result<String, AuthError> {
        let claims = SessionClaims {
            sub: nurse_id.to_string(),
            iat,
            exp,
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    /// Validate signature and expiry, returning the claims.
    pub fn validate(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        decode::<SessionClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            })
    }
}

fn now_secs() -> u64 {
    jiff::Timestamp::now().as_second().max(0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret-that-is-long-enough-for-hs256";

    #[test]
    fn issued_token_round_trips_nurse_id() {
        let keys = SessionKeys::new(SECRET, 3600);
        let nurse_id = Uuid::new_v4();
        let token = keys.issue(nurse_id).unwrap();
        let claims = keys.validate(&token).unwrap();
        assert_eq!(claims.nurse_id().unwrap(), nurse_id);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = SessionKeys::new(SECRET, 3600);
        let now = now_secs();
        let token = keys
            .issue_with_times(Uuid::new_v4(), now - 7200, now - 3600)
            .unwrap();
        assert!(matches!(keys.validate(&token), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = SessionKeys::new(b"another-secret-entirely-for-signing", 3600)
            .issue(Uuid::new_v4())
            .unwrap();
        let keys = SessionKeys::new(SECRET, 3600);
        assert!(matches!(keys.validate(&token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn garbage_is_rejected() {
        let keys = SessionKeys::new(SECRET, 3600);
        assert!(matches!(keys.validate("not.a.jwt"), Err(AuthError::InvalidToken(_))));
    }
}
