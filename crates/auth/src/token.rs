use chrono::{Duration, Utc};
use jsonwebtoken::{decode, decode_header, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::{AuthError, Role, SessionClaims, UserId};

/// The signing secret was empty. The codec refuses to exist without one;
/// there is no warn-and-continue fallback.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("token signing secret must not be empty")]
pub struct EmptySigningSecret;

/// Signing failed inside the JWT library. Surfaces as a server error at the
/// HTTP edge.
#[derive(Debug, Error)]
#[error("failed to sign session token: {0}")]
pub struct TokenSigningError(#[from] jsonwebtoken::errors::Error);

/// Token verification seam used by the HTTP middleware, so tests can
/// substitute a fake without key material.
pub trait TokenValidator: Send + Sync {
    fn parse(&self, token: &str) -> Result<SessionClaims, AuthError>;
}

/// Issues and parses signed session tokens (HS256).
///
/// Holds the immutable symmetric key material for the process lifetime. The
/// secret is injected at construction; nothing in this module reads ambient
/// state.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &[u8]) -> Result<Self, EmptySigningSecret> {
        if secret.is_empty() {
            return Err(EmptySigningSecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        // Expiry is exact; the default 60s leeway would accept stale tokens.
        validation.leeway = 0;

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        })
    }

    /// Issue a session token binding `user_id` and `roles` for `ttl`.
    pub fn issue(
        &self,
        user_id: UserId,
        roles: &[Role],
        ttl: Duration,
    ) -> Result<String, TokenSigningError> {
        let claims = SessionClaims {
            user_id,
            roles: roles.to_vec(),
            exp: (Utc::now() + ttl).timestamp(),
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    /// Verify and decode a session token.
    ///
    /// The header's algorithm must be in the HMAC family before any
    /// cryptographic work happens; a token that names anything else is
    /// rejected outright, not tried against the symmetric key.
    pub fn parse(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let header = decode_header(token).map_err(|_| AuthError::TokenInvalid)?;
        if !matches!(
            header.alg,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(AuthError::TokenInvalid);
        }

        decode::<SessionClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(classify)
    }
}

impl TokenValidator for TokenCodec {
    fn parse(&self, token: &str) -> Result<SessionClaims, AuthError> {
        TokenCodec::parse(self, token)
    }
}

/// Default session validity window.
pub fn default_session_ttl() -> Duration {
    Duration::hours(24)
}

fn classify(err: jsonwebtoken::errors::Error) -> AuthError {
    use jsonwebtoken::errors::ErrorKind;

    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        // The header was already vetted, so a deserialization failure here
        // can only be a mis-shaped claims payload.
        ErrorKind::Json(_) | ErrorKind::MissingRequiredClaim(_) => AuthError::ClaimsMalformed,
        _ => AuthError::TokenInvalid,
    }
}
