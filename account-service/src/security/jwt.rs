/// Session token issuance and validation using HS256.
/// Keys are derived from configuration at construction; there is no
/// process-global key state.
use crate::config::JwtConfig;
use crate::error::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (account ID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Token type, always "access"
    pub token_type: String,
    /// Email address
    pub email: String,
}

/// Signs and validates bearer tokens for one configured secret
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_ttl: i64,
}

impl TokenIssuer {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            access_token_ttl: config.access_token_ttl,
        }
    }

    /// Issue a signed, expiring access token for an account
    pub fn issue(&self, user_id: Uuid, email: &str) -> Result<String> {
        let now = Utc::now();
        let expiry = now + Duration::seconds(self.access_token_ttl);

        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
            token_type: "access".to_string(),
            email: email.to_string(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Validate and decode a token
    pub fn validate(&self, token: &str) -> Result<TokenData<Claims>> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())?;
        Ok(data)
    }

    /// Access token lifetime in seconds
    pub fn expires_in(&self) -> i64 {
        self.access_token_ttl
    }
}
