//! JWT Token handling
//!
//! A token carries the whole session user. Requests that present a valid
//! token are trusted as that user without a store lookup.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::{SessionUser, UserRole};

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token expiration time in hours
    pub expiration_hours: i64,
    /// Issuer claim
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "plant-bio-dev-secret-change-me".to_string(),
            expiration_hours: 24,
            issuer: "plant-bio".to_string(),
        }
    }
}

/// JWT TokenClaims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub sub: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    /// Account creation time of the subject
    pub created_at: DateTime<Utc>,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Issuer
    pub iss: String,
}

impl TokenClaims {
    pub fn new(user: &SessionUser, config: &JwtConfig) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(config.expiration_hours);

        Self {
            sub: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            created_at: user.created_at,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: config.issuer.clone(),
        }
    }

    /// Check if the token is expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    pub fn session_user(&self) -> SessionUser {
        SessionUser {
            id: self.sub.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role,
            created_at: self.created_at,
        }
    }
}

/// Create a JWT token for a user
pub fn create_token(
    user: &SessionUser,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let token_claims = TokenClaims::new(user, config);

    encode(
        &Header::default(),
        &token_claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify and decode a JWT token
pub fn verify_token(
    token: &str,
    config: &JwtConfig,
) -> Result<TokenClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.set_issuer(&[&config.issuer]);

    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> SessionUser {
        SessionUser {
            id: "admin-demo-1".into(),
            email: "admin@kangan.edu.au".into(),
            name: "Admin User".into(),
            role: UserRole::Admin,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn token_round_trips_the_session_user() {
        let config = JwtConfig::default();
        let token = create_token(&admin(), &config).unwrap();
        let claims = verify_token(&token, &config).unwrap();

        assert!(!claims.is_expired());
        let user = claims.session_user();
        assert_eq!(user.id, "admin-demo-1");
        assert!(user.is_admin());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = create_token(&admin(), &JwtConfig::default()).unwrap();
        let other = JwtConfig {
            secret: "another".into(),
            ..Default::default()
        };
        assert!(verify_token(&token, &other).is_err());
    }
}
