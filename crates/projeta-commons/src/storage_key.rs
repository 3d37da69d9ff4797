//! Storage key trait for type-safe key serialization with lexicographic ordering
//!
//! This module uses the `storekey` crate to ensure proper lexicographic
//! ordering of serialized keys in RocksDB.
//!
//! RocksDB stores keys in byte-by-byte order. Naive encodings such as
//! `{len:1byte}{string_bytes}` break ordering because the length byte sorts
//! before the content. The `storekey` crate uses escape-sequence encoding
//! that preserves the natural order of strings, integers, and tuples, so
//! composite keys like `(project_id, user_id)` scan correctly by prefix.

use storekey::{Decode, Encode};

/// Encode a value to bytes using storekey's order-preserving format.
///
/// The encoded bytes sort in the same order as the original values when
/// compared lexicographically. Supported types include all Rust primitives,
/// strings, options, and tuples (for composite keys).
pub fn encode_key<T: Encode>(value: &T) -> Vec<u8> {
    storekey::encode_vec(value).expect("storekey encoding should not fail for valid types")
}

/// Encode a value as a prefix for range scans.
///
/// Identical to `encode_key` but makes the intent clear at call sites.
/// For tuple keys like `(project_id, user_id)`, encode just the prefix tuple
/// `(project_id,)` to scan every member of one project.
pub fn encode_prefix<T: Encode>(value: &T) -> Vec<u8> {
    encode_key(value)
}

/// Decode a value from storekey-encoded bytes.
///
/// # Errors
///
/// Returns an error if the bytes cannot be decoded to the expected type.
pub fn decode_key<T: Decode>(bytes: &[u8]) -> Result<T, String> {
    storekey::decode(&mut std::io::Cursor::new(bytes))
        .map_err(|e| format!("storekey decode error: {:?}", e))
}

/// Trait for keys that can be serialized for storage in an entity store.
///
/// All keys used with `EntityStore` must implement this trait to ensure
/// correct serialization to bytes for RocksDB storage.
///
/// # Ordering Guarantees
///
/// Keys are serialized using `storekey` which preserves lexicographic
/// ordering: strings sort alphabetically, numbers sort numerically, and
/// tuples sort element-by-element.
pub trait StorageKey: Clone + Send + Sync + 'static {
    /// Serialize this key to bytes for storage using order-preserving encoding.
    ///
    /// Composite keys MUST return the full composite representation using
    /// `encode_key()` with a tuple.
    fn storage_key(&self) -> Vec<u8>;

    /// Deserialize this key from bytes
    fn from_storage_key(bytes: &[u8]) -> Result<Self, String>
    where
        Self: Sized;
}

// --- Standard Implementations ---

impl StorageKey for String {
    fn storage_key(&self) -> Vec<u8> {
        encode_key(&self.as_str())
    }

    fn from_storage_key(bytes: &[u8]) -> Result<Self, String> {
        decode_key(bytes)
    }
}

impl StorageKey for i64 {
    fn storage_key(&self) -> Vec<u8> {
        encode_key(self)
    }

    fn from_storage_key(bytes: &[u8]) -> Result<Self, String> {
        decode_key(bytes)
    }
}

impl StorageKey for u64 {
    fn storage_key(&self) -> Vec<u8> {
        encode_key(self)
    }

    fn from_storage_key(bytes: &[u8]) -> Result<Self, String> {
        decode_key(bytes)
    }
}

impl StorageKey for Vec<u8> {
    fn storage_key(&self) -> Vec<u8> {
        encode_key(self)
    }

    fn from_storage_key(bytes: &[u8]) -> Result<Self, String> {
        decode_key(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_ordering_preserved() {
        let alice_key = encode_key(&"alice");
        let bob_key = encode_key(&"bob");

        assert!(
            alice_key < bob_key,
            "alice should sort before bob: {:?} vs {:?}",
            alice_key,
            bob_key
        );
    }

    #[test]
    fn test_variable_length_string_ordering() {
        // Different length strings should still sort correctly
        let short = encode_key(&"ab");
        let long = encode_key(&"aaa");

        // "aaa" < "ab" lexicographically (second char 'a' < 'b')
        assert!(
            long < short,
            "aaa should sort before ab: {:?} vs {:?}",
            long,
            short
        );
    }

    #[test]
    fn test_composite_key_ordering() {
        let key1 = encode_key(&(100_i64, 1_i64));
        let key2 = encode_key(&(100_i64, 2_i64));
        let key3 = encode_key(&(200_i64, 1_i64));

        // Same first component: sorts by second
        assert!(key1 < key2, "100:1 should sort before 100:2");

        // Different first component: sorts by first
        assert!(key1 < key3, "100:1 should sort before 200:1");
        assert!(key2 < key3, "100:2 should sort before 200:1");
    }

    #[test]
    fn test_composite_prefix_matches_full_key() {
        let full = encode_key(&(42_i64, 7_i64));
        let prefix = encode_prefix(&(42_i64,));

        assert!(
            full.starts_with(&prefix),
            "prefix of (42,) should prefix-match (42, 7)"
        );
    }

    #[test]
    fn test_round_trip_i64() {
        let val: i64 = 123456789;
        let encoded = val.storage_key();
        let decoded = i64::from_storage_key(&encoded).unwrap();
        assert_eq!(val, decoded);
    }

    #[test]
    fn test_round_trip_composite() {
        let project = 55_i64;
        let user = 77_i64;
        let encoded = encode_key(&(project, user));
        let (dec_project, dec_user): (i64, i64) = decode_key(&encoded).unwrap();
        assert_eq!(project, dec_project);
        assert_eq!(user, dec_user);
    }
}
