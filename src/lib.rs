#![warn(missing_docs)]
//!
//! This crate issues signed [JSON Web Tokens](https://www.rfc-editor.org/rfc/rfc7519) for use as test credentials against JWT-authenticated services such as [Trino](https://trino.io/docs/current/security/jwt.html). Tokens are signed with an RSA private key using RS256 and default to an expiration 36500 days in the future, so a token minted once keeps working for the lifetime of a test suite.
//!
//! ## Usage
//!
//! The `test-token-issuer` binary reads `private_key.pem` from the working directory and prints a token for subject `test`:
//!
//! ```text
//! $ test-token-issuer > token.txt
//! ```
//!
//! The library exposes the same operation:
//!
//! ```no_run
//! let token = test_token_issuer::issue_token(
//!     "test",
//!     test_token_issuer::DEFAULT_VALIDITY,
//!     "private_key.pem",
//! )?;
//! println!("{}", token);
//! # Ok::<(), test_token_issuer::IssueError>(())
//! ```
//!
use std::path::Path;
use std::time::Duration;

use jsonwebtoken as jwt;
use serde::{Deserialize, Serialize};

mod error;
mod key;

pub use error::IssueError;
pub use key::{KeyFormat, SigningKey};

/// Subject used when none is given.
pub const DEFAULT_SUBJECT: &str = "test";

/// Validity used when none is given: 36500 days, long enough to never expire in practice.
pub const DEFAULT_VALIDITY: Duration = Duration::from_secs(36500 * 24 * 60 * 60);

/// Key file read when none is given, relative to the working directory.
pub const DEFAULT_KEY_PATH: &str = "private_key.pem";

/// The claims carried by an issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject of the token holder
    pub sub: String,

    /// Expiration as a Unix timestamp in seconds
    pub exp: u64,

    /// Issuer, omitted unless configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Issuance as a Unix timestamp in seconds, omitted unless requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
}

/// TokenIssuer builds and signs tokens. Create with [TokenIssuer::new].
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    subject: String,
    validity: Duration,
    issuer: Option<String>,
    include_issued_at: bool,
    key_id: Option<String>,
}

impl TokenIssuer {
    /// Creates a new [TokenIssuer] for `subject` with [DEFAULT_VALIDITY].
    pub fn new(subject: impl Into<String>) -> Self {
        TokenIssuer {
            subject: subject.into(),
            validity: DEFAULT_VALIDITY,
            issuer: None,
            include_issued_at: false,
            key_id: None,
        }
    }

    /// How long the token stays valid after issuance. Only whole seconds count.
    pub fn validity(mut self, validity: Duration) -> Self {
        self.validity = validity;
        self
    }

    /// Adds an `iss` claim.
    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Adds an `iat` claim when `include` is true.
    pub fn include_issued_at(mut self, include: bool) -> Self {
        self.include_issued_at = include;
        self
    }

    /// Sets the `kid` header, overriding any key id found with the signing key.
    pub fn key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self
    }

    /// Builds the claims for a token issued at `issued_at` (Unix seconds).
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use test_token_issuer::TokenIssuer;
    ///
    /// let claims = TokenIssuer::new("alice")
    ///     .validity(Duration::from_secs(60))
    ///     .claims_at(1_700_000_000)
    ///     .unwrap();
    ///
    /// assert_eq!(claims.sub, "alice");
    /// assert_eq!(claims.exp, 1_700_000_060);
    /// ```
    pub fn claims_at(&self, issued_at: u64) -> Result<Claims, IssueError> {
        let validity = self.validity.as_secs();
        if validity == 0 {
            return Err(IssueError::InvalidValidity(
                "validity must be at least one second".to_owned(),
            ));
        }

        let exp = issued_at.checked_add(validity).ok_or_else(|| {
            IssueError::InvalidValidity(format!("{validity}s after {issued_at} overflows"))
        })?;

        Ok(Claims {
            sub: self.subject.clone(),
            exp,
            iss: self.issuer.clone(),
            iat: self.include_issued_at.then_some(issued_at),
        })
    }

    /// Signs a token issued now with `key`.
    pub fn issue(&self, key: &SigningKey) -> Result<String, IssueError> {
        let claims = self.claims_at(jwt::get_current_timestamp())?;

        let mut header = jwt::Header::new(jwt::Algorithm::RS256);
        header.kid = self
            .key_id
            .clone()
            .or_else(|| key.key_id().map(String::from));

        let token = jwt::encode(&header, &claims, key.encoding_key())
            .map_err(IssueError::from_signing)?;

        tracing::info!(sub = %claims.sub, exp = claims.exp, kid = ?header.kid, "issued token");
        Ok(token)
    }

    /// Loads the key at `key_path` as `format`, then signs a token issued now.
    pub fn issue_from_file(
        &self,
        key_path: impl AsRef<Path>,
        format: KeyFormat,
    ) -> Result<String, IssueError> {
        let key = SigningKey::load(key_path, format)?;
        self.issue(&key)
    }
}

/// Issue an RS256 token for `subject`, valid for `validity`, signed with the PEM RSA private key at `key_path`.
///
/// Fails with [IssueError::FileAccess] when the key file cannot be read and [IssueError::KeyFormat] when
/// it does not hold an RSA private key.
pub fn issue_token(
    subject: &str,
    validity: Duration,
    key_path: impl AsRef<Path>,
) -> Result<String, IssueError> {
    TokenIssuer::new(subject)
        .validity(validity)
        .issue_from_file(key_path, KeyFormat::Pem)
}
