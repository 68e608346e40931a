//! Authentication ports.

use std::fmt;

/// Access tokens authenticate requests; refresh tokens only mint new
/// access tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claims carried by a validated token.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub user_id: i32,
    pub username: String,
    pub kind: TokenKind,
    pub exp: i64,
}

/// Freshly issued token pair.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Token service trait for JWT operations.
pub trait TokenService: Send + Sync {
    /// Issue an access/refresh pair for a user.
    fn issue_pair(&self, user_id: i32, username: &str) -> Result<TokenPair, AuthError>;

    /// Issue a new access token from a valid refresh token.
    fn refresh(&self, refresh_token: &str) -> Result<String, AuthError>;

    /// Validate a token of any kind.
    fn verify(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Validate a token, requiring it to be of `kind`.
    fn validate(&self, token: &str, kind: TokenKind) -> Result<TokenClaims, AuthError> {
        let claims = self.verify(token)?;
        if claims.kind != kind {
            return Err(AuthError::WrongTokenKind {
                expected: kind,
                found: claims.kind,
            });
        }
        Ok(claims)
    }

    /// Access token lifetime in seconds.
    fn access_ttl_seconds(&self) -> i64;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token is expired")]
    TokenExpired,

    #[error("Token is invalid: {0}")]
    InvalidToken(String),

    #[error("Token has wrong type: expected {expected}, found {found}")]
    WrongTokenKind { expected: TokenKind, found: TokenKind },

    #[error("Missing authorization header")]
    MissingAuth,

    #[error("Hashing error: {0}")]
    HashingError(String),
}
