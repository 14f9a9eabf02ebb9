use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed validity window of every issued token.
pub const TOKEN_VALIDITY_HOURS: i64 = 5;

/// Claims carried by an authorization token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(username: impl Into<String>, is_admin: bool, issued_at: DateTime<Utc>) -> Self {
        let exp = (issued_at + Duration::hours(TOKEN_VALIDITY_HOURS)).timestamp();

        Self {
            username: username.into(),
            is_admin,
            iat: issued_at.timestamp(),
            exp,
        }
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("JWT generation error: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("Invalid JWT token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),

    #[error("JWT token expired")]
    Expired,

    #[error("Invalid JWT secret")]
    InvalidSecret,
}

/// HS256 keys derived from the process-wide secret.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenKeys {
    pub fn new(secret: &str) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::InvalidSecret);
        }

        // Expiry is checked against an explicit clock in `verify_at`.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    pub fn issue(&self, username: &str, is_admin: bool) -> Result<String, TokenError> {
        self.issue_at(username, is_admin, Utc::now())
    }

    pub fn issue_at(
        &self,
        username: &str,
        is_admin: bool,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims::new(username, is_admin, now);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(TokenError::Signing)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Check signature and decode claims, then reject tokens whose expiry lies
    /// strictly before `now`. A token is still valid at exactly `exp`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(TokenError::Invalid)?;

        if data.claims.exp < now.timestamp() {
            return Err(TokenError::Expired);
        }

        Ok(data.claims)
    }
}
