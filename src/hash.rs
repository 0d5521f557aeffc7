//! String hash functions used to pick a key's home slot.
//!
//! The default [`AdditiveHasher`] sums character code points. It is cheap and
//! deterministic but collides on every anagram (`"ab"` and `"ba"` land on the same
//! home slot), so collision resolution is left entirely to probing.
//! [`Fnv1aHasher`] spreads keys better for callers that care.

/// Maps a key to a 64-bit hash. The table reduces it modulo its capacity.
pub trait KeyHasher {
    fn hash_key(&self, key: &str) -> u64;
}

/// Sum of the numeric code points of every character in `key`.
///
/// `strhash("A") == 65`, `strhash("z") == 122`, `strhash("ab") == strhash("ba")`.
#[inline]
pub fn strhash(key: &str) -> u64 {
    key.chars()
        .fold(0u64, |acc, c| acc.wrapping_add(c as u32 as u64))
}

/// Additive code-point hash. See [`strhash`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdditiveHasher;

impl KeyHasher for AdditiveHasher {
    #[inline]
    fn hash_key(&self, key: &str) -> u64 {
        strhash(key)
    }
}

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

/// 64-bit FNV-1a over the key's UTF-8 bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Fnv1aHasher;

impl KeyHasher for Fnv1aHasher {
    #[inline]
    fn hash_key(&self, key: &str) -> u64 {
        let mut state = FNV_OFFSET_BASIS;
        for &byte in key.as_bytes() {
            state ^= byte as u64;
            state = state.wrapping_mul(FNV_PRIME);
        }
        state
    }
}

impl<F> KeyHasher for F
where
    F: Fn(&str) -> u64,
{
    #[inline]
    fn hash_key(&self, key: &str) -> u64 {
        self(key)
    }
}
