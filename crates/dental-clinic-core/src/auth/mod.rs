//! Access gate: credential checks and bearer tokens.
//!
//! Passwords are stored as bcrypt hashes. A successful login issues an HS256
//! JWT carrying the account id, username and role, valid for 24 hours by
//! default. There is no refresh; callers log in again once it expires.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::db::Database;
use crate::models::UserProfile;
use crate::{storage_error, AuthorizationError, ClinicError, ClinicResult};

/// Default token lifetime.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// Token claims.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub id: i64,
    pub username: String,
    pub role: String,
    /// Issued at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}


/// Result of a successful login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user: UserProfile,
}

/// Result of a successful token check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VerifyResponse {
    pub valid: bool,
    pub user: Claims,
}

/// Issues and validates bearer tokens.
#[derive(Clone)]
pub struct AccessGate {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
    bcrypt_cost: u32,
}

impl AccessGate {
    /// Create a gate signing with `secret`, 24h tokens and bcrypt's default cost.
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl: Duration::hours(DEFAULT_TOKEN_TTL_HOURS),
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Override the token lifetime.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Override the bcrypt work factor used for new hashes.
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// Hash a plaintext password.
    pub fn hash_password(&self, password: &str) -> ClinicResult<String> {
        bcrypt::hash(password, self.bcrypt_cost)
            .map_err(|e| storage_error("Failed to hash password", e))
    }

    /// Check credentials and issue a token.
    pub fn login(&self, db: &Database, username: &str, password: &str) -> ClinicResult<LoginResponse> {
        if username.is_empty() || password.is_empty() {
            return Err(ClinicError::Validation(
                "Username and password required".into(),
            ));
        }

        let user = db
            .get_user_by_username(username)
            .map_err(|e| storage_error("Database error", e))?
            .ok_or_else(invalid_credentials)?;

        let matches = bcrypt::verify(password, &user.password_hash).unwrap_or_else(|e| {
            warn!(username = %username, error = %e, "stored password hash is unreadable");
            false
        });
        if !matches {
            debug!(username = %username, "password mismatch");
            return Err(invalid_credentials());
        }

        let profile = user.profile();
        let token = self.issue(&profile)?;
        Ok(LoginResponse {
            message: "Login successful".into(),
            token,
            user: profile,
        })
    }

    /// Sign a token for an account.
    pub fn issue(&self, user: &UserProfile) -> ClinicResult<String> {
        let now = Utc::now();
        let claims = Claims {
            id: user.id,
            username: user.username.clone(),
            role: user.role.clone(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| storage_error("Failed to sign token", e))
    }

    /// Validate a token and return its claims.
    pub fn verify(&self, token: &str) -> ClinicResult<VerifyResponse> {
        if token.trim().is_empty() {
            return Err(ClinicError::Authorization(AuthorizationError::MissingToken));
        }

        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| {
                debug!(error = %e, "token rejected");
                ClinicError::Authorization(AuthorizationError::InvalidToken)
            })?;

        Ok(VerifyResponse {
            valid: true,
            user: data.claims,
        })
    }

    /// Validate an `Authorization` header value of the form `Bearer <token>`.
    pub fn authorize(&self, header: Option<&str>) -> ClinicResult<Claims> {
        let token = header
            .map(str::trim)
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(ClinicError::Authorization(AuthorizationError::MissingToken))?;

        self.verify(token).map(|response| response.user)
    }
}

fn invalid_credentials() -> ClinicError {
    ClinicError::Authentication("Invalid credentials".into())
}
