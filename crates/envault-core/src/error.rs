// SPDX-FileCopyrightText: 2026 Envault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Envault secret store.

use thiserror::Error;

/// The primary error type used across the sealer, storage engine, and facade.
#[derive(Debug, Error)]
pub enum EnvaultError {
    /// A realm or a key within a realm does not exist.
    #[error("{0}: not found")]
    NotFound(String),

    /// The AEAD tag did not verify: wrong key, tampered ciphertext, or
    /// metadata whose hash no longer matches the ciphertext.
    #[error("authentication failed -- wrong key or tampered record")]
    AuthenticationFailed,

    /// Stored ciphertext could not be decoded or is too short to hold a nonce.
    #[error("corrupt record: {0}")]
    CorruptRecord(String),

    /// Stored metadata blob could not be decoded or parsed.
    #[error("corrupt metadata: {0}")]
    CorruptMetadata(String),

    /// A value could not round-trip through the canonical plaintext encoding.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Cipher construction failed (bad key length, RNG failure).
    #[error("crypto error: {0}")]
    Crypto(String),

    /// Storage backend errors (I/O, transaction, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Realm name contains characters outside `[-:/\w]`.
    #[error("invalid realm `{0}`: non-word characters")]
    InvalidRealm(String),

    /// The OS credential vault refused or failed a request.
    #[error("keyring error: {0}")]
    Keyring(String),

    /// Configuration could not be loaded or is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),

    /// Another error annotated with what was being done when it happened.
    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<EnvaultError>,
    },
}

impl EnvaultError {
    /// Wrap any error as a storage error.
    pub fn storage<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        EnvaultError::Storage { source: err.into() }
    }

    /// Annotate this error with context, e.g. `"fetching top"`.
    pub fn context(self, context: impl Into<String>) -> Self {
        EnvaultError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, looking through any context wrappers.
    pub fn root(&self) -> &EnvaultError {
        let mut err = self;
        while let EnvaultError::Context { source, .. } = err {
            err = source;
        }
        err
    }

    /// True if the root cause is a missing realm or key.
    pub fn is_not_found(&self) -> bool {
        matches!(self.root(), EnvaultError::NotFound(_))
    }

    /// True if the root cause is an AEAD tag mismatch.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self.root(), EnvaultError::AuthenticationFailed)
    }
}

/// Adds lazily-built context to `Result<T, EnvaultError>`.
pub trait ErrorContext<T> {
    /// Wrap the error (if any) with the context produced by `f`.
    fn with_context<F, C>(self, f: F) -> Result<T, EnvaultError>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T> ErrorContext<T> for Result<T, EnvaultError> {
    fn with_context<F, C>(self, f: F) -> Result<T, EnvaultError>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| e.context(f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display_names_the_target() {
        let err = EnvaultError::NotFound("top/key".into());
        assert_eq!(err.to_string(), "top/key: not found");
    }

    #[test]
    fn context_is_prepended_to_message() {
        let err = EnvaultError::NotFound("realm top".into()).context("fetching top");
        assert_eq!(err.to_string(), "fetching top: realm top: not found");
    }

    #[test]
    fn root_looks_through_nested_context() {
        let err = EnvaultError::AuthenticationFailed
            .context("unsealing top/a")
            .context("fetching top");
        assert!(err.is_authentication_failure());
        assert!(!err.is_not_found());
        assert!(matches!(err.root(), EnvaultError::AuthenticationFailed));
    }

    #[test]
    fn with_context_only_touches_errors() {
        let ok: Result<u8, EnvaultError> = Ok(7);
        assert_eq!(ok.with_context(|| "unused").unwrap(), 7);

        let err: Result<u8, EnvaultError> = Err(EnvaultError::NotFound("realm x".into()));
        let wrapped = err.with_context(|| format!("fetching {}", "x")).unwrap_err();
        assert!(wrapped.is_not_found());
        assert_eq!(wrapped.to_string(), "fetching x: realm x: not found");
    }

    #[test]
    fn storage_wraps_foreign_errors() {
        let err = EnvaultError::storage(std::io::Error::other("disk full"));
        assert_eq!(err.to_string(), "storage error: disk full");
    }
}
