//! Admin access tokens.
//!
//! Tokens are HS256 JWTs carrying [`Claims`]. A [`TokenSigner`] holds the
//! keys derived from the configured secret and checks signature, expiry and
//! issuer on every decode. There are no refresh tokens: an admin signs in
//! again once the token expires.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use muebles_core::types::DbId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `iss` claim of every token this server signs.
pub const TOKEN_ISSUER: &str = "muebles-api";

/// Default access token lifetime in minutes.
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 60;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Admin account id.
    pub sub: DbId,
    pub email: String,
    pub role: String,
    pub iss: String,
    /// Issued-at, Unix seconds.
    pub iat: i64,
    /// Expiry, Unix seconds.
    pub exp: i64,
    /// Token id, the handle used to revoke the token on sign-out.
    pub jti: String,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_mins: i64,
}

impl JwtConfig {
    /// `JWT_SECRET` (required, non-blank) and `JWT_ACCESS_EXPIRY_MINS`
    /// (default `60`).
    ///
    /// # Panics
    ///
    /// Panics when the secret is missing or blank, or the expiry is not a
    /// positive number of minutes.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .expect("JWT_SECRET must be set to a non-empty value");

        let access_token_expiry_mins = match std::env::var("JWT_ACCESS_EXPIRY_MINS") {
            Ok(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|mins| *mins > 0)
                .unwrap_or_else(|| panic!("JWT_ACCESS_EXPIRY_MINS must be a positive integer, got '{raw}'")),
            Err(_) => DEFAULT_ACCESS_EXPIRY_MINS,
        };

        Self {
            secret,
            access_token_expiry_mins,
        }
    }
}

/// Signs and verifies access tokens with one shared secret.
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    lifetime_secs: i64,
}

impl TokenSigner {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        // `sub` is numeric, so it cannot be a registered required claim.
        validation.set_required_spec_claims(&["exp", "iss"]);

        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            lifetime_secs: config.access_token_expiry_mins * 60,
        }
    }

    /// Build fresh claims for an account and sign them.
    pub fn issue(
        &self,
        user_id: DbId,
        email: &str,
        role: &str,
    ) -> Result<(String, Claims), jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            role: role.to_string(),
            iss: TOKEN_ISSUER.to_string(),
            iat: now,
            exp: now + self.lifetime_secs,
            jti: Uuid::new_v4().to_string(),
        };
        let token = self.sign(&claims)?;
        Ok((token, claims))
    }

    pub fn sign(&self, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
    }

    /// Decode a token, rejecting bad signatures, expired tokens and tokens
    /// from another issuer.
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        decode::<Claims>(token, &self.decoding, &self.validation).map(|data| data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer(secret: &str) -> TokenSigner {
        TokenSigner::new(&JwtConfig {
            secret: secret.to_string(),
            access_token_expiry_mins: 60,
        })
    }

    #[test]
    fn test_issue_and_verify() {
        let signer = signer("test-secret-that-is-long-enough-for-hmac");
        let (token, claims) = signer.issue(42, "taller@example.com", "admin").unwrap();

        let decoded = signer.verify(&token).unwrap();
        assert_eq!(decoded, claims);
        assert_eq!(decoded.iss, TOKEN_ISSUER);
        assert_eq!(decoded.exp - decoded.iat, 3600);
    }

    #[test]
    fn test_numeric_subject_survives_decode() {
        let signer = signer("subject-secret");
        let (token, _) = signer.issue(7, "taller@example.com", "admin").unwrap();
        let decoded = signer.verify(&token).unwrap();
        assert_eq!(decoded.sub, 7);
        assert_eq!(decoded.role, "admin");
    }

    #[test]
    fn test_each_token_gets_its_own_jti() {
        let signer = signer("jti-secret");
        let (_, a) = signer.issue(1, "a@example.com", "admin").unwrap();
        let (_, b) = signer.issue(1, "a@example.com", "admin").unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_expired_token_fails() {
        let signer = signer("expiry-secret");
        let (_, mut claims) = signer.issue(1, "a@example.com", "admin").unwrap();
        // Past the default 60-second leeway.
        claims.iat -= 900;
        claims.exp = claims.iat + 300;

        let token = signer.sign(&claims).unwrap();
        assert!(signer.verify(&token).is_err());
    }

    #[test]
    fn test_foreign_issuer_fails() {
        let signer = signer("issuer-secret");
        let (_, mut claims) = signer.issue(1, "a@example.com", "admin").unwrap();
        claims.iss = "someone-else".to_string();

        let token = signer.sign(&claims).unwrap();
        assert!(signer.verify(&token).is_err());
    }

    #[test]
    fn test_different_secrets_fail() {
        let (token, _) = signer("secret-alpha").issue(1, "a@example.com", "admin").unwrap();
        assert!(signer("secret-bravo").verify(&token).is_err());
    }
}
