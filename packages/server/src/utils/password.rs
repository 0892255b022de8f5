//! Salted, keyed password hashing.
//!
//! A password is stored as `HMAC-SHA512(key = salt, message = password)`
//! next to the random salt that keyed it. Hash and salt are both
//! [`DIGEST_LEN`] bytes and are only ever produced together.

use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha512;

type HmacSha512 = Hmac<Sha512>;

/// Length in bytes of both the stored hash and the salt.
pub const DIGEST_LEN: usize = 64;

/// A password hash together with the salt that produced it.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest {
    pub hash: Vec<u8>,
    pub salt: Vec<u8>,
}

impl std::fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordDigest").finish_non_exhaustive()
    }
}

fn keyed(salt: &[u8]) -> HmacSha512 {
    // HMAC accepts keys of any length; `new_from_slice` cannot fail here.
    match HmacSha512::new_from_slice(salt) {
        Ok(mac) => mac,
        Err(_) => unreachable!("HMAC keys have no length restriction"),
    }
}

/// Hash `password` under a freshly generated random salt.
pub fn hash_password(password: &str) -> PasswordDigest {
    let mut salt = vec![0u8; DIGEST_LEN];
    rand::rng().fill_bytes(&mut salt);

    let mut mac = keyed(&salt);
    mac.update(password.as_bytes());
    let hash = mac.finalize().into_bytes().to_vec();

    PasswordDigest { hash, salt }
}

/// Check `password` against a stored hash/salt pair.
///
/// The comparison runs in constant time over the full digest. A stored
/// hash of the wrong length never matches.
pub fn verify_password(password: &str, hash: &[u8], salt: &[u8]) -> bool {
    if hash.len() != DIGEST_LEN || salt.len() != DIGEST_LEN {
        return false;
    }
    let mut mac = keyed(salt);
    mac.update(password.as_bytes());
    mac.verify_slice(hash).is_ok()
}
