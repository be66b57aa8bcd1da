use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use super::{CallerIdentity, ClaimEntry, TokenClaims};
use crate::error::AppError;

/// Verifies bearer tokens issued by the identity provider (HS256, shared
/// secret) and can mint tokens for tooling and tests.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
    expiry_hours: i64,
}

impl JwtService {
    pub fn new(secret: &str, issuer: &str, audience: &str, expiry_hours: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            issuer: issuer.to_string(),
            audience: audience.to_string(),
            expiry_hours,
        }
    }

    /// Issue a token carrying `(resource, "Op1,Op2")` permission entries.
    pub fn generate_token(
        &self,
        user_id: &str,
        email: Option<&str>,
        permissions: &[(&str, &str)],
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: user_id.to_string(),
            email: email.map(str::to_string),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.expiry_hours)).timestamp(),
            claims: permissions
                .iter()
                .map(|(kind, value)| ClaimEntry {
                    kind: kind.to_string(),
                    value: value.to_string(),
                })
                .collect(),
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?)
    }

    /// Decode and verify signature, expiry, issuer and audience.
    pub fn verify(&self, token: &str) -> Result<CallerIdentity, AppError> {
        let data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)?;
        Ok(CallerIdentity::from(data.claims))
    }
}
