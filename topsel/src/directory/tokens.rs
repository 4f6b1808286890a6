//! Session tokens: HS256 JWTs carrying `{sub, role, iat, exp}`.

use std::time::Duration;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::identity::{AccountDirectory, Identity};

/// Default token lifetime.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(3600);

/// The claims embedded in a session token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Subject: the account username.
    sub: String,
    /// The account role, as its lowercase name.
    role: String,
    /// Issued-at, Unix seconds.
    iat: i64,
    /// Expiry, Unix seconds.
    exp: i64,
}

/// Issues and resolves session tokens.
///
/// The codec is the library's [`AccountDirectory`] implementation: the
/// server hands it every bearer token and trusts the identity it
/// returns. Tokens are signed with a shared HS256 secret and expire
/// after a configurable TTL.
///
/// # Examples
///
/// ```
/// use topsel::directory::TokenCodec;
/// use topsel::{AccountDirectory, Identity, Role};
///
/// let codec = TokenCodec::new("secret", std::time::Duration::from_secs(3600));
/// let token = codec.issue(&Identity::new("s1", Role::Student)).unwrap();
/// let identity = codec.resolve(&token).unwrap();
/// assert_eq!(identity, Identity::new("s1", Role::Student));
/// ```
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenCodec {
    /// Creates a codec for the given shared secret and token lifetime.
    #[must_use]
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 30;
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    /// Issues a signed token for the given identity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TokenSigning`] if encoding fails.
    pub fn issue(&self, identity: &Identity) -> Result<String> {
        let now = chrono::Utc::now().timestamp();
        #[allow(clippy::cast_possible_wrap)]
        let claims = Claims {
            sub: identity.username.clone(),
            role: identity.role.as_str().to_string(),
            iat: now,
            exp: now + self.ttl.as_secs() as i64,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|e| {
            Error::TokenSigning {
                details: e.to_string(),
            }
        })
    }
}

impl AccountDirectory for TokenCodec {
    fn resolve(&self, token: &str) -> Result<Identity> {
        let data =
            decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
                Error::Unauthenticated {
                    reason: match e.kind() {
                        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                            "token expired".to_string()
                        }
                        _ => "invalid token".to_string(),
                    },
                }
            })?;
        let role = data
            .claims
            .role
            .parse()
            .map_err(|_| Error::Unauthenticated {
                reason: "token carries an unknown role".to_string(),
            })?;
        Ok(Identity::new(data.claims.sub, role))
    }
}
