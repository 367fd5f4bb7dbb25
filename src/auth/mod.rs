use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::IdentityConfig;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
}

impl Claims {
    pub fn new(email: impl Into<String>, ttl: Duration) -> Result<Self, AuthError> {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(ttl)
            .ok_or_else(|| AuthError::TokenGeneration("token lifetime out of range".to_string()))?;
        Ok(Self {
            email: email.into(),
            sub: None,
            exp: exp.timestamp(),
            iat: now.timestamp(),
        })
    }
}

/// Decoded identity attached to a request once its bearer token verifies
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub email: String,
    pub subject: Option<String>,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            email: claims.email,
            subject: claims.sub,
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingToken,

    #[error("Authorization header must use Bearer token format")]
    MalformedHeader,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Identity provider not configured: {0}")]
    NotConfigured(String),

    #[error("Token generation error: {0}")]
    TokenGeneration(String),
}

/// Verification capability of the external identity provider
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Identity, AuthError>;
}

/// Verifies provider-issued JWTs, HS256 with a shared secret or RS256 with a public key
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
        .with_claims(None, None)
    }

    pub fn from_rsa_pem(pem: &[u8]) -> Result<Self, AuthError> {
        let decoding_key = DecodingKey::from_rsa_pem(pem)
            .map_err(|e| AuthError::NotConfigured(format!("invalid RSA public key: {}", e)))?;
        Ok(Self {
            decoding_key,
            validation: Validation::new(Algorithm::RS256),
        }
        .with_claims(None, None))
    }

    pub fn from_config(config: &IdentityConfig) -> Result<Self, AuthError> {
        let verifier = match (&config.public_key_path, &config.jwt_secret) {
            (Some(path), _) => {
                let pem = std::fs::read(path).map_err(|e| {
                    AuthError::NotConfigured(format!("cannot read {}: {}", path.display(), e))
                })?;
                Self::from_rsa_pem(&pem)?
            }
            (None, Some(secret)) => Self::from_secret(secret),
            (None, None) => {
                return Err(AuthError::NotConfigured(
                    "set IDENTITY_JWT_SECRET or IDENTITY_PUBLIC_KEY_PATH".to_string(),
                ))
            }
        };
        Ok(verifier.with_claims(config.issuer.as_deref(), config.audience.as_deref()))
    }

    fn with_claims(mut self, issuer: Option<&str>, audience: Option<&str>) -> Self {
        self.validation.set_required_spec_claims(&["exp"]);
        match issuer {
            Some(iss) => self.validation.set_issuer(&[iss]),
            None => self.validation.iss = None,
        }
        match audience {
            Some(aud) => self.validation.set_audience(&[aud]),
            None => self.validation.validate_aud = false,
        }
        self
    }
}

#[async_trait]
impl IdentityVerifier for JwtVerifier {
    async fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        Ok(token_data.claims.into())
    }
}

/// Mint an HS256 token carrying `email`; used for development and tests
pub fn issue_token(secret: &str, email: &str, ttl: Duration) -> Result<String, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::NotConfigured("empty signing secret".to_string()));
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), &Claims::new(email, ttl)?, &encoding_key)
        .map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn verifies_tokens_it_issued() {
        let token = issue_token("secret", "reader@example.com", Duration::hours(1)).unwrap();
        let identity = JwtVerifier::from_secret("secret").verify(&token).await.unwrap();
        assert_eq!(identity.email, "reader@example.com");
    }

    #[tokio::test]
    async fn rejects_wrong_secret_and_expired_tokens() {
        let verifier = JwtVerifier::from_secret("secret");

        let forged = issue_token("other", "reader@example.com", Duration::hours(1)).unwrap();
        assert!(matches!(verifier.verify(&forged).await, Err(AuthError::InvalidToken(_))));

        let expired = issue_token("secret", "reader@example.com", Duration::hours(-2)).unwrap();
        assert!(matches!(verifier.verify(&expired).await, Err(AuthError::InvalidToken(_))));

        assert!(verifier.verify("not-a-jwt").await.is_err());
    }

    #[tokio::test]
    async fn enforces_configured_audience() {
        let config = IdentityConfig {
            jwt_secret: Some("secret".into()),
            audience: Some("bookshelf".into()),
            ..Default::default()
        };
        let verifier = JwtVerifier::from_config(&config).unwrap();
        // issue_token sets no aud claim
        let token = issue_token("secret", "reader@example.com", Duration::hours(1)).unwrap();
        assert!(verifier.verify(&token).await.is_err());
    }

    #[test]
    fn unconfigured_provider_is_an_error() {
        assert!(matches!(
            JwtVerifier::from_config(&IdentityConfig::default()),
            Err(AuthError::NotConfigured(_))
        ));
        assert!(issue_token("", "a@x.com", Duration::hours(1)).is_err());
    }

    #[test]
    fn lifetime_past_the_calendar_is_an_error() {
        let err = issue_token("secret", "a@x.com", Duration::weeks(100_000_000));
        assert!(matches!(err, Err(AuthError::TokenGeneration(_))));
    }
}
