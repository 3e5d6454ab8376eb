//! Password credential derivation and verification.
//!
//! A stored credential is a single text value of the form
//! `"<hex-salt>:<hex-hash>"`: a random per-credential salt and a
//! PBKDF2-HMAC-SHA512 digest of the password under that salt. Credentials are
//! created once at registration and replaced wholesale on password change.
//!
//! Verification never fails across this boundary: a malformed or empty stored
//! credential simply does not match, so callers treat every `false` as
//! "authentication failed" without distinguishing corruption from a wrong
//! password.

use rand::RngCore;
use rand::rngs::OsRng;

/// Salt length in bytes (32 hex characters once encoded).
pub const SALT_LEN: usize = 16;

/// Derived key length in bytes (128 hex characters once encoded).
pub const KEY_LEN: usize = 64;

/// Separator between the hex salt and hex hash in a stored credential.
const DELIMITER: char = ':';

/// Tunable key-derivation parameters.
///
/// The iteration count must match between derivation and verification; a
/// manager configured with one count will not verify credentials derived
/// under another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// PBKDF2 iteration count.
    pub iterations: u32,
}

impl KdfParams {
    /// Parameters matching the legacy deployment (1000 iterations). Only for
    /// verifying credentials stored before the default was raised.
    pub fn legacy() -> Self {
        Self { iterations: 1000 }
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            iterations: 100_000,
        }
    }
}

/// Derives storable credentials from plaintext passwords and verifies
/// plaintext passwords against stored credentials.
///
/// Stateless apart from its parameters; safe to share across request
/// handlers. Both operations are CPU-bound (the point of the KDF), so
/// concurrent throughput scales with the iteration count.
#[derive(Debug, Clone)]
pub struct CredentialManager {
    params: KdfParams,
}

impl CredentialManager {
    pub fn new(params: KdfParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> KdfParams {
        self.params
    }

    /// Derive a storable credential from a plaintext password.
    ///
    /// Each call generates a fresh random salt, so two derivations of the
    /// same password produce different credential strings. The input password
    /// is never logged.
    pub fn derive(&self, password: &str) -> String {
        let mut salt = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt);
        let salt_hex = hex::encode(salt);

        let hash_hex = self.derive_hash(password, &salt_hex);
        format!("{salt_hex}{DELIMITER}{hash_hex}")
    }

    /// Verify a plaintext password against a stored credential.
    ///
    /// Returns `true` iff the re-derived hash matches the stored one.
    /// Malformed stored credentials (missing delimiter, empty string) are a
    /// verification failure, never a panic.
    pub fn verify(&self, password: &str, stored: &str) -> bool {
        let Some((salt_hex, expected_hex)) = stored.split_once(DELIMITER) else {
            tracing::debug!("stored credential is missing its delimiter");
            return false;
        };

        let recomputed = self.derive_hash(password, salt_hex);
        constant_time_eq(recomputed.as_bytes(), expected_hex.as_bytes())
    }

    fn derive_hash(&self, password: &str, salt_hex: &str) -> String {
        let mut key = [0u8; KEY_LEN];
        pbkdf2::pbkdf2_hmac::<sha2::Sha512>(
            password.as_bytes(),
            salt_hex.as_bytes(),
            self.params.iterations,
            &mut key,
        );
        hex::encode(key)
    }
}

impl Default for CredentialManager {
    fn default() -> Self {
        Self::new(KdfParams::default())
    }
}

/// Compare two byte slices without short-circuiting on the first mismatch.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
