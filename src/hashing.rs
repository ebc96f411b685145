//! Deterministic hashing.
//!
//! Every grouping hash in this crate is produced by [`hash_from_values`]:
//! lowercase hex of the first 16 bytes of SHA-256 over the ordered token
//! sequence, each token fed as UTF-8 bytes followed by a `0xff` separator
//! (a byte that cannot occur inside UTF-8, so `["ab"]` and `["a", "b"]`
//! hash differently).
//!
//! This formula is a pinned contract: changing it re-buckets every
//! historical event, so treat any edit here as a new grouping configuration
//! rather than a refactor.

use sha2::{Digest, Sha256};

/// Separator fed between tokens; 0xff never appears in valid UTF-8.
const TOKEN_SEPARATOR: [u8; 1] = [0xff];

/// Hash an ordered token sequence to a 32-character lowercase hex string.
pub fn hash_from_values<I, S>(values: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut hasher = Sha256::new();
    for value in values {
        hasher.update(value.as_ref().as_bytes());
        hasher.update(TOKEN_SEPARATOR);
    }
    hex::encode(&hasher.finalize()[..16])
}

/// The constant hash produced by the fallback variant (hash of the empty
/// token sequence).
pub fn fallback_hash() -> String {
    hash_from_values(std::iter::empty::<&str>())
}

/// True if `value` already has the shape of a grouping hash: exactly 32
/// lowercase hexadecimal characters.
pub fn is_hash_like(value: &str) -> bool {
    regex!(r"^[0-9a-f]{32}$").is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_32_lowercase_hex() {
        let h = hash_from_values(["hello", "world"]);
        assert_eq!(h.len(), 32);
        assert!(is_hash_like(&h));
    }

    #[test]
    fn hash_is_order_sensitive() {
        assert_ne!(hash_from_values(["a", "b"]), hash_from_values(["b", "a"]));
    }

    #[test]
    fn token_boundaries_matter() {
        assert_ne!(hash_from_values(["ab"]), hash_from_values(["a", "b"]));
    }

    #[test]
    fn hash_is_stable() {
        // Pinned: a change here silently re-buckets historical events.
        assert_eq!(hash_from_values(["hello"]), hash_from_values(["hello"]));
        assert_eq!(fallback_hash(), hash_from_values(std::iter::empty::<&str>()));
    }

    #[test]
    fn is_hash_like_rejects_near_misses() {
        assert!(is_hash_like("0123456789abcdef0123456789abcdef"));
        assert!(!is_hash_like("0123456789ABCDEF0123456789ABCDEF"));
        assert!(!is_hash_like("0123456789abcdef0123456789abcde"));
        assert!(!is_hash_like("xyz"));
        assert!(!is_hash_like(""));
    }
}
