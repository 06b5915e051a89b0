use std::path::PathBuf;

use jsonwebtoken as jwt;
use thiserror::Error;

/// The error type for failures while issuing a token.
#[derive(Debug, Error)]
pub enum IssueError {
    /// The key file could not be opened or read.
    #[error("failed to read signing key from {}", path.display())]
    FileAccess {
        /// Path that was attempted
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// The key material is not a usable RSA private key (malformed PEM, wrong key type, public-only JWK, ...)
    #[error("invalid RSA private key: {0}")]
    KeyFormat(String),

    /// The validity window would not put `exp` after the issuance time.
    #[error("invalid validity window: {0}")]
    InvalidValidity(String),

    /// Signing failed for a reason unrelated to the key itself. See associated `jwt::errors::Error` for details.
    #[error("failed to sign token")]
    Signing(#[source] jwt::errors::Error),
}

impl IssueError {
    /// Sorts a signing failure into a key problem or a generic signing problem.
    pub(crate) fn from_signing(err: jwt::errors::Error) -> Self {
        use jwt::errors::ErrorKind;

        match err.kind() {
            ErrorKind::InvalidRsaKey(_) | ErrorKind::InvalidKeyFormat | ErrorKind::RsaFailedSigning => {
                IssueError::KeyFormat(err.to_string())
            }
            _ => IssueError::Signing(err),
        }
    }
}
