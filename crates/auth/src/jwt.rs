//! Bearer tokens for logged-in users.
//!
//! A token names the user and records whether they were an administrator
//! when they logged in. The flag is informational: servers re-read the
//! user's rights on every request.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AuthError, AuthResult, DEFAULT_JWT_EXPIRATION_HOURS, DEFAULT_JWT_ISSUER};

/// Token payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID.
    pub sub: String,
    pub email: String,
    /// Administrator at login time.
    #[serde(default)]
    pub admin: bool,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

impl Claims {
    /// Claims for `user_id`, valid for `expiration_hours` from now.
    pub fn new(
        user_id: Uuid,
        email: String,
        admin: bool,
        issuer: &str,
        expiration_hours: u64,
    ) -> Self {
        let issued_at = Utc::now();
        let expires_at = issued_at + Duration::hours(expiration_hours as i64);

        Self {
            sub: user_id.to_string(),
            email,
            admin,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            iss: issuer.to_string(),
        }
    }

    /// Parses the subject as a user ID.
    pub fn user_id(&self) -> AuthResult<Uuid> {
        self.sub.parse().map_err(|_| AuthError::InvalidToken)
    }
}

/// Signing settings.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: u64,
    pub issuer: String,
}

impl JwtConfig {
    /// HS256 settings with the default lifetime and issuer.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            expiration_hours: DEFAULT_JWT_EXPIRATION_HOURS,
            issuer: DEFAULT_JWT_ISSUER.to_string(),
        }
    }

    pub fn with_expiration_hours(mut self, hours: u64) -> Self {
        self.expiration_hours = hours;
        self
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }
}

/// Issues and checks HS256 tokens.
#[derive(Clone)]
pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtManager")
            .field("issuer", &self.config.issuer)
            .field("expiration_hours", &self.config.expiration_hours)
            .finish_non_exhaustive()
    }
}

impl JwtManager {
    pub fn new(config: JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            config,
        }
    }

    /// Issues a token for a user who just proved their password.
    pub fn generate_token(&self, user_id: Uuid, email: String, admin: bool) -> AuthResult<String> {
        let claims = Claims::new(
            user_id,
            email,
            admin,
            &self.config.issuer,
            self.config.expiration_hours,
        );
        self.sign(&claims)
    }

    fn sign(&self, claims: &Claims) -> AuthResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AuthError::JwtEncoding(e.to_string()))
    }

    /// Checks signature, issuer and expiry, and returns the payload.
    pub fn validate_token(&self, token: &str) -> AuthResult<Claims> {
        Ok(decode::<Claims>(token, &self.decoding_key, &self.validation)?.claims)
    }
}
