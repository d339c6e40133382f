//! Fast hash map type aliases.
//!
//! Registries in this workspace are keyed by short strings (association and
//! class names) and never see untrusted keys, so they use the Fx hash from
//! `rustc-hash` instead of the standard library's SipHash.
//!
//! # Examples
//!
//! ```
//! use rr_core::{FxHashMap, fx_hash_map};
//!
//! let mut classes: FxHashMap<String, u32> = fx_hash_map();
//! classes.insert("Author".to_owned(), 1);
//! assert_eq!(classes.get("Author"), Some(&1));
//! ```

/// A [`HashMap`](std::collections::HashMap) using the Fx hash algorithm.
pub type FxHashMap<K, V> = rustc_hash::FxHashMap<K, V>;

/// Creates a new empty [`FxHashMap`].
#[inline]
#[must_use]
pub fn fx_hash_map<K, V>() -> FxHashMap<K, V> {
    FxHashMap::default()
}

/// Creates a new [`FxHashMap`] able to hold `capacity` entries without
/// reallocating.
#[inline]
#[must_use]
pub fn fx_hash_map_with_capacity<K, V>(capacity: usize) -> FxHashMap<K, V> {
    FxHashMap::with_capacity_and_hasher(capacity, rustc_hash::FxBuildHasher)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fx_hash_map_last_write_wins() {
        let mut map: FxHashMap<&str, i32> = fx_hash_map();
        map.insert("owner", 1);
        map.insert("owner", 2);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("owner"), Some(&2));
    }

    #[test]
    fn test_fx_hash_map_with_capacity() {
        let map: FxHashMap<String, i32> = fx_hash_map_with_capacity(16);
        assert!(map.capacity() >= 16);
    }
}
