//! Loading RSA signing keys from disk.
//!
//! Keys are accepted either as PEM (PKCS#1 `RSA PRIVATE KEY` or PKCS#8 `PRIVATE KEY`) or as a single
//! private RSA JWK, the form most key generators such as <https://mkjwk.org/> hand out.
use std::path::Path;

use jsonwebkey as jwk;
use jsonwebtoken as jwt;

use crate::error::IssueError;

/// How the bytes of a key file should be interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyFormat {
    /// PEM-encoded RSA private key
    #[default]
    Pem,
    /// JSON Web Key holding a private RSA key
    Jwk,
}

/// An RSA private key ready to sign RS256 tokens.
pub struct SigningKey {
    key: jwt::EncodingKey,
    key_id: Option<String>,
}

impl SigningKey {
    /// Parses a PEM-encoded RSA private key.
    pub fn from_pem(pem: &[u8]) -> Result<Self, IssueError> {
        let key =
            jwt::EncodingKey::from_rsa_pem(pem).map_err(|e| IssueError::KeyFormat(e.to_string()))?;

        Ok(SigningKey { key, key_id: None })
    }

    /// Parses a private RSA JWK. The key's `kid`, if any, is carried into the token header.
    pub fn from_jwk(json: &str) -> Result<Self, IssueError> {
        // The parser rejects an `alg` that does not match `kty`, so an RSA key here is RS256.
        let parsed = json
            .parse::<jwk::JsonWebKey>()
            .map_err(|e| IssueError::KeyFormat(e.to_string()))?;

        match *parsed.key {
            jwk::Key::RSA {
                private: Some(_), ..
            } => {}
            jwk::Key::RSA { private: None, .. } => {
                return Err(IssueError::KeyFormat(
                    "JWK holds only the public half of the RSA key".to_owned(),
                ))
            }
            _ => return Err(IssueError::KeyFormat("JWK is not an RSA key".to_owned())),
        }

        let pem = parsed
            .key
            .try_to_pem()
            .map_err(|e| IssueError::KeyFormat(format!("{e:?}")))?;

        Ok(SigningKey {
            key_id: parsed.key_id,
            ..SigningKey::from_pem(pem.as_bytes())?
        })
    }

    /// Reads the whole file at `path` and parses it as `format`.
    pub fn load(path: impl AsRef<Path>, format: KeyFormat) -> Result<Self, IssueError> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), ?format, "loading signing key");

        let bytes = std::fs::read(path).map_err(|source| IssueError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;

        match format {
            KeyFormat::Pem => SigningKey::from_pem(&bytes),
            KeyFormat::Jwk => {
                let json = std::str::from_utf8(&bytes)
                    .map_err(|e| IssueError::KeyFormat(format!("JWK is not UTF-8: {e}")))?;
                SigningKey::from_jwk(json)
            }
        }
    }

    /// The key id found alongside the key material, if any.
    pub fn key_id(&self) -> Option<&str> {
        self.key_id.as_deref()
    }

    pub(crate) fn encoding_key(&self) -> &jwt::EncodingKey {
        &self.key
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}
