// SPDX-FileCopyrightText: 2026 Envault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret Ring backed by the OS credential vault.
//!
//! The master key is filed under `(service, login name)` as base64. When no
//! entry exists yet, a fresh 32-byte key is generated and stored, so the
//! first run for a user bootstraps the ring.

use std::sync::OnceLock;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use envault_config::model::KeyringConfig;
use envault_core::{EnvaultError, SecretRing};
use ring::rand::{SecureRandom, SystemRandom};
use tracing::{debug, warn};
use zeroize::Zeroizing;

/// Length of a freshly generated master key.
pub const MASTER_KEY_LEN: usize = 32;

/// Produces new master key material on first use.
pub trait KeyGenerator: Send + Sync {
    fn generate(&self) -> Result<Zeroizing<Vec<u8>>, EnvaultError>;
}

/// Generates keys from the system CSPRNG.
#[derive(Debug, Default)]
pub struct SystemKeyGenerator;

impl KeyGenerator for SystemKeyGenerator {
    fn generate(&self) -> Result<Zeroizing<Vec<u8>>, EnvaultError> {
        let mut key = Zeroizing::new(vec![0u8; MASTER_KEY_LEN]);
        SystemRandom::new()
            .fill(key.as_mut_slice())
            .map_err(|_| EnvaultError::Crypto("failed to generate random key".to_string()))?;
        Ok(key)
    }
}

/// Login name of the current user.
///
/// `USER` and `USERNAME` win when set. Otherwise the effective uid is looked
/// up in the passwd database, and a uid with no passwd entry is named by its
/// number, so this only fails on platforms with neither source.
pub fn current_username() -> Result<String, EnvaultError> {
    if let Some(name) = ["USER", "USERNAME"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|name| !name.trim().is_empty())
    {
        return Ok(name);
    }
    system_username()
}

#[cfg(unix)]
fn system_username() -> Result<String, EnvaultError> {
    // SAFETY: geteuid has no preconditions and cannot fail.
    let uid = unsafe { libc::geteuid() };
    Ok(passwd_name(uid).unwrap_or_else(|| uid.to_string()))
}

#[cfg(not(unix))]
fn system_username() -> Result<String, EnvaultError> {
    Err(EnvaultError::Keyring(
        "cannot determine the current login name".to_string(),
    ))
}

#[cfg(unix)]
fn passwd_name(uid: libc::uid_t) -> Option<String> {
    use std::ffi::CStr;

    const MAX_BUF: usize = 1 << 20;

    let mut buf: Vec<libc::c_char> = vec![0; 1024];
    loop {
        // SAFETY: passwd is plain old data; all-zero is a valid value that
        // getpwuid_r overwrites before `result` is set.
        let mut pwd: libc::passwd = unsafe { std::mem::zeroed() };
        let mut result: *mut libc::passwd = std::ptr::null_mut();
        // SAFETY: every pointer refers to a live local, and `buf.len()` is
        // the real capacity of `buf`.
        let rc = unsafe {
            libc::getpwuid_r(uid, &mut pwd, buf.as_mut_ptr(), buf.len(), &mut result)
        };
        if rc == libc::ERANGE && buf.len() < MAX_BUF {
            let grown = buf.len() * 2;
            buf.resize(grown, 0);
            continue;
        }
        if rc != 0 || result.is_null() || pwd.pw_name.is_null() {
            return None;
        }
        // SAFETY: pw_name points into `buf` and is NUL-terminated on success.
        let name = unsafe { CStr::from_ptr(pwd.pw_name) }
            .to_string_lossy()
            .into_owned();
        return (!name.is_empty()).then_some(name);
    }
}

/// Master key held in the platform keychain.
pub struct KeychainRing {
    entry: keyring::Entry,
    service: String,
    username: String,
    generator: Box<dyn KeyGenerator>,
    cached: OnceLock<Zeroizing<Vec<u8>>>,
}

impl std::fmt::Debug for KeychainRing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeychainRing")
            .field("service", &self.service)
            .field("username", &self.username)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl KeychainRing {
    /// Ring for `username` under `service`, generating with `generator`.
    pub fn new(
        service: impl Into<String>,
        username: impl Into<String>,
        generator: Box<dyn KeyGenerator>,
    ) -> Result<Self, EnvaultError> {
        let service = service.into();
        let username = username.into();
        let entry = keyring::Entry::new(&service, &username)
            .map_err(|e| EnvaultError::Keyring(e.to_string()))?;

        Ok(Self {
            entry,
            service,
            username,
            generator,
            cached: OnceLock::new(),
        })
    }

    /// Ring configured from `[keyring]`, for the configured or current user.
    pub fn from_config(config: &KeyringConfig) -> Result<Self, EnvaultError> {
        let username = match &config.user {
            Some(user) => user.clone(),
            None => current_username()?,
        };
        Self::new(&config.service, username, Box::new(SystemKeyGenerator))
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    fn load_or_create(&self) -> Result<Zeroizing<Vec<u8>>, EnvaultError> {
        match self.entry.get_password() {
            Ok(encoded) => {
                debug!(service = %self.service, user = %self.username, "master key loaded");
                let bytes = BASE64.decode(encoded.trim()).map_err(|e| {
                    EnvaultError::Keyring(format!("stored master key is not base64: {e}"))
                })?;
                Ok(Zeroizing::new(bytes))
            }
            Err(keyring::Error::NoEntry) => {
                let key = self.generator.generate()?;
                let encoded = Zeroizing::new(BASE64.encode(&*key));
                self.entry
                    .set_password(&encoded)
                    .map_err(|e| EnvaultError::Keyring(e.to_string()))?;
                warn!(
                    service = %self.service,
                    user = %self.username,
                    "no master key in keychain, generated a new one"
                );
                Ok(key)
            }
            Err(e) => Err(EnvaultError::Keyring(e.to_string())),
        }
    }
}

impl SecretRing for KeychainRing {
    fn secret(&self) -> Result<Zeroizing<Vec<u8>>, EnvaultError> {
        if let Some(secret) = self.cached.get() {
            return Ok(secret.clone());
        }
        let secret = self.load_or_create()?;
        Ok(self.cached.get_or_init(|| secret).clone())
    }

    fn username(&self) -> &str {
        &self.username
    }
}
