use thiserror::Error;

/// Terminal authorization outcome for a request.
///
/// Every variant except [`AuthError::Forbidden`] means the caller never
/// proved who they are; `Forbidden` means the identity checked out but lacks
/// the required grant. The HTTP layer maps the former group to 401 and the
/// latter to 403.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// No token in the session cookie or the bearer header.
    #[error("authentication required")]
    AuthRequired,

    /// Bad signature, unparseable structure, or a non-HMAC signing algorithm.
    #[error("invalid authentication token")]
    TokenInvalid,

    #[error("authentication token expired")]
    TokenExpired,

    /// Signature verified but the payload is not a well-formed claims object.
    #[error("invalid token claims")]
    ClaimsMalformed,

    /// The identity exists but has been disabled.
    #[error("account is disabled")]
    IdentityInactive,

    /// Authenticated, but the required role or permission is not held.
    #[error("access denied: insufficient privileges")]
    Forbidden,
}

impl AuthError {
    /// Stable machine-readable code for error bodies and logs.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::AuthRequired => "auth_required",
            AuthError::TokenInvalid => "token_invalid",
            AuthError::TokenExpired => "token_expired",
            AuthError::ClaimsMalformed => "claims_malformed",
            AuthError::IdentityInactive => "identity_inactive",
            AuthError::Forbidden => "forbidden",
        }
    }
}
