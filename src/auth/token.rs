//! HS256 session tokens.

use super::{
    AuthError,
    ports::{Claims, TokenIssuer},
};
use chrono::TimeDelta;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use std::fmt;

/// Signs session tokens with a shared secret.
#[derive(Clone)]
pub struct JwtTokenIssuer {
    lifetime: TimeDelta,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtTokenIssuer {
    /// Creates an issuer whose tokens expire after `expiration_hours`.
    #[must_use]
    pub fn new(secret: &str, expiration_hours: u32) -> Self {
        Self {
            lifetime: TimeDelta::hours(i64::from(expiration_hours)),
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

impl fmt::Debug for JwtTokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtTokenIssuer")
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn lifetime(&self) -> TimeDelta {
        self.lifetime
    }

    fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|err| AuthError::Signing(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }
}
