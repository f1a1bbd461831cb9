//! One-way password hashing and verification.
//!
//! Passwords are stored only as the output of [`PasswordHasher::hash`]:
//! a salted, iterated HMAC-SHA-256 digest. The stored string is
//! `"{iterations}${salt-hex}${digest-hex}"`, so the parameters travel
//! with the hash and old hashes keep verifying after the default
//! iteration count changes.
//!
//! Verification goes through the MAC's own `verify_slice`, which compares
//! in constant time — a timing side channel can't leak how much of a
//! guess matched.

use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Default hashing cost. High enough that brute force pays per guess,
/// low enough that a login is imperceptible.
const DEFAULT_ITERATIONS: u32 = 10_000;

const SALT_LEN: usize = 16;

/// Hashes passwords for storage and verifies login attempts.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    iterations: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl PasswordHasher {
    /// Creates a hasher with a custom iteration count (minimum 1).
    ///
    /// Tests use a low count to stay fast; production uses the default.
    pub fn new(iterations: u32) -> Self {
        Self {
            iterations: iterations.max(1),
        }
    }

    /// Hashes a password with a fresh random salt.
    ///
    /// Two calls with the same password produce different strings — the
    /// salt guarantees it — so equal hashes never reveal equal passwords.
    pub fn hash(&self, password: &str) -> String {
        let salt: [u8; SALT_LEN] = rand::rng().random();
        let digest = iterate(&salt, password.as_bytes(), self.iterations);
        format!(
            "{}${}${}",
            self.iterations,
            hex_encode(&salt),
            hex_encode(&digest)
        )
    }

    /// Verifies a password attempt against a stored hash string.
    ///
    /// Malformed stored strings verify as `false` rather than erroring —
    /// from the caller's side that attempt simply failed.
    pub fn verify(&self, password: &str, stored: &str) -> bool {
        let Some((iterations, salt, expected)) = parse_stored(stored) else {
            return false;
        };

        // Recompute all but the final round, then let the MAC itself do
        // the constant-time comparison on the last one.
        let block = iterate(&salt, password.as_bytes(), iterations - 1);
        let mut mac = mac_with_key(&salt);
        mac.update(&block);
        mac.verify_slice(&expected).is_ok()
    }
}

/// Builds the keyed MAC. HMAC accepts keys of any length, so the
/// constructor cannot actually fail for our salts.
fn mac_with_key(salt: &[u8]) -> HmacSha256 {
    HmacSha256::new_from_slice(salt).expect("hmac accepts any key length")
}

/// Runs `rounds` of HMAC(salt, ·) starting from `input`.
///
/// With `rounds == 0` this returns the input unchanged, which is what
/// `verify` needs to stage its final in-MAC comparison.
fn iterate(salt: &[u8], input: &[u8], rounds: u32) -> Vec<u8> {
    let mut block = input.to_vec();
    for _ in 0..rounds {
        let mut mac = mac_with_key(salt);
        mac.update(&block);
        block = mac.finalize().into_bytes().to_vec();
    }
    block
}

/// Splits `"{iterations}${salt}${digest}"` back into its parts.
/// Any malformation yields `None`.
fn parse_stored(stored: &str) -> Option<(u32, Vec<u8>, Vec<u8>)> {
    let mut parts = stored.split('$');
    let iterations: u32 = parts.next()?.parse().ok()?;
    let salt = hex_decode(parts.next()?)?;
    let digest = hex_decode(parts.next()?)?;
    if iterations == 0 || salt.is_empty() || digest.is_empty() || parts.next().is_some() {
        return None;
    }
    Some((iterations, salt, digest))
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn hex_decode(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).ok())
        .collect()
}

// =========================================================================
// Tests
// =========================================================================
