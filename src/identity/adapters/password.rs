//! PBKDF2 adapter for the password-hashing port.
//!
//! Digests are PBKDF2-HMAC-SHA256 with a random per-password salt, encoded
//! as `pbkdf2-sha256$<iterations>$<salt hex>$<digest hex>`.

use crate::identity::{
    domain::PasswordHash,
    ports::{PasswordHasher, PasswordHasherError},
};
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;

const SCHEME: &str = "pbkdf2-sha256";
const SALT_LEN: usize = 16;
const DIGEST_LEN: usize = 32;
const DEFAULT_ITERATIONS: u32 = 100_000;

/// PBKDF2-HMAC-SHA256 password hasher.
#[derive(Debug, Clone)]
pub struct Pbkdf2PasswordHasher {
    iterations: u32,
}

impl Pbkdf2PasswordHasher {
    /// Creates a hasher with the default iteration count.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }

    /// Creates a hasher with an explicit iteration count.
    ///
    /// Iteration counts below one are clamped to one. Intended for tests
    /// that need cheap digests.
    #[must_use]
    pub const fn with_iterations(iterations: u32) -> Self {
        Self {
            iterations: if iterations == 0 { 1 } else { iterations },
        }
    }
}

fn derive(password: &str, salt: &[u8], iterations: u32, out: &mut [u8]) {
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, out);
}

impl Default for Pbkdf2PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for Pbkdf2PasswordHasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHasherError> {
        if password.is_empty() {
            return Err(PasswordHasherError::EmptyPassword);
        }

        let mut salt = [0_u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);

        let mut digest = [0_u8; DIGEST_LEN];
        derive(password, &salt, self.iterations, &mut digest);

        let encoded = format!(
            "{SCHEME}${}${}${}",
            self.iterations,
            hex::encode(salt),
            hex::encode(digest)
        );
        PasswordHash::new(encoded).map_err(|_| PasswordHasherError::MalformedHash)
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHasherError> {
        let parts: Vec<&str> = hash.as_str().split('$').collect();
        let [scheme, iterations, salt_hex, digest_hex] = parts.as_slice() else {
            return Err(PasswordHasherError::MalformedHash);
        };
        if *scheme != SCHEME {
            return Err(PasswordHasherError::MalformedHash);
        }

        let iterations: u32 = iterations
            .parse()
            .map_err(|_| PasswordHasherError::MalformedHash)?;
        let salt = hex::decode(salt_hex).map_err(|_| PasswordHasherError::MalformedHash)?;
        let expected = hex::decode(digest_hex).map_err(|_| PasswordHasherError::MalformedHash)?;
        if iterations == 0 || salt.is_empty() || expected.is_empty() {
            return Err(PasswordHasherError::MalformedHash);
        }

        let mut derived = vec![0_u8; expected.len()];
        derive(password, &salt, iterations, &mut derived);
        Ok(constant_time_eq(&derived, &expected))
    }
}

/// Compares two byte slices without short-circuiting on the first mismatch.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0_u8;
    for (x, y) in a.iter().zip(b) {
        diff |= x ^ y;
    }
    diff == 0
}
