use chrono::{TimeDelta, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    exp: usize,
    iat: usize,
    sub: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccessToken {
    pub token_type: String,
    pub access_token: String,
    pub expires_in: i64,
}

/// Issues and verifies HS256 access tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expires: TimeDelta,
}

impl TokenIssuer {
    pub fn new(secret_key: &[u8], access_token_expires: TimeDelta) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret_key),
            decoding_key: DecodingKey::from_secret(secret_key),
            access_token_expires,
        }
    }

    pub fn issue(&self, user_id: &Uuid) -> Result<AccessToken, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = Claims {
            exp: (now + self.access_token_expires).timestamp() as usize,
            iat: now.timestamp() as usize,
            sub: user_id.to_string(),
        };
        let access_token = jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)?;
        Ok(AccessToken {
            token_type: "bearer".to_string(),
            access_token,
            expires_in: self.access_token_expires.num_seconds(),
        })
    }

    /// Returns the user id the token was issued for. `None` when the token is
    /// malformed, forged or expired.
    pub fn verify(&self, token: &str) -> Option<Uuid> {
        let token =
            jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &Validation::default())
                .ok()?;
        token.claims.sub.parse::<Uuid>().ok()
    }
}
