use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use std::fmt;
use thiserror::Error;

use crate::errors::ApiError;
use crate::types::internal::TokenClaims;

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("JWT has expired")]
    Expired,

    #[error("Invalid or malformed JWT")]
    Invalid,
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        ApiError::unauthorized(err.to_string())
    }
}

/// Verifies bearer tokens and extracts their claims
///
/// Signature, expiry and (when configured) issuer/audience are all checked
/// here; the authority resolver only ever sees verified claims.
pub struct TokenService {
    jwt_secret: String,
    issuer: Option<String>,
    audience: Option<String>,
}

impl TokenService {
    pub fn new(jwt_secret: String, issuer: Option<String>, audience: Option<String>) -> Self {
        Self {
            jwt_secret,
            issuer,
            audience,
        }
    }

    /// Validate a JWT and return its claims
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);

        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }
        match &self.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        let token_data = decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid,
        })?;

        Ok(token_data.claims)
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("jwt_secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret-key-minimum-32-characters-long";

    fn make_token(claims: &TokenClaims, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("Failed to encode test token")
    }

    fn base_claims() -> TokenClaims {
        let now = Utc::now().timestamp();
        TokenClaims {
            sub: "google-123".to_string(),
            email: Some("a@x.com".to_string()),
            name: Some("Alice".to_string()),
            picture: None,
            exp: now + 600,
            iat: now,
            iss: None,
            aud: None,
        }
    }

    #[test]
    fn verify_accepts_valid_token() {
        let service = TokenService::new(SECRET.to_string(), None, None);
        let token = make_token(&base_claims(), SECRET);

        let claims = service.verify(&token).expect("token should verify");
        assert_eq!(claims.sub, "google-123");
        assert_eq!(claims.email.as_deref(), Some("a@x.com"));
    }

    #[test]
    fn verify_rejects_expired_token() {
        let service = TokenService::new(SECRET.to_string(), None, None);
        let mut claims = base_claims();
        claims.exp = Utc::now().timestamp() - 600;
        let token = make_token(&claims, SECRET);

        match service.verify(&token) {
            Err(TokenError::Expired) => {}
            other => panic!("Expected Expired, got {:?}", other.map(|c| c.sub)),
        }
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let service = TokenService::new(SECRET.to_string(), None, None);
        let token = make_token(&base_claims(), "another-secret-also-32-characters!!");

        assert!(matches!(service.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn verify_rejects_wrong_issuer() {
        let service = TokenService::new(
            SECRET.to_string(),
            Some("https://accounts.example.com".to_string()),
            None,
        );
        let mut claims = base_claims();
        claims.iss = Some("https://evil.example.com".to_string());
        let token = make_token(&claims, SECRET);

        assert!(matches!(service.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn verify_accepts_matching_issuer() {
        let service = TokenService::new(
            SECRET.to_string(),
            Some("https://accounts.example.com".to_string()),
            None,
        );
        let mut claims = base_claims();
        claims.iss = Some("https://accounts.example.com".to_string());
        let token = make_token(&claims, SECRET);

        assert!(service.verify(&token).is_ok());
    }
}
