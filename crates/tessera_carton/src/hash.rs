//! Fast hashing utilities using xxHash3.
//!
//! Provides fingerprints for template identity: two structured renders
//! with different statics fingerprints can never be diff-compatible.

use xxhash_rust::xxh3::Xxh3;

/// Hash an ordered sequence of string segments.
///
/// Each segment is length-prefixed, so `["ab", "c"]` and `["a", "bc"]`
/// hash differently.
pub fn hash_segments<'a, I>(segments: I) -> u64
where
    I: IntoIterator<Item = &'a str>,
{
    let mut hasher = Xxh3::new();
    for segment in segments {
        hasher.update(&(segment.len() as u64).to_le_bytes());
        hasher.update(segment.as_bytes());
    }
    hasher.digest()
}

/// Convert a hash to a hex string (16 characters).
#[inline]
pub fn hash_to_hex(hash: u64) -> std::string::String {
    format!("{:016x}", hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_boundaries_matter() {
        assert_ne!(hash_segments(["ab", "c"]), hash_segments(["a", "bc"]));
        assert_eq!(hash_segments(["a", "b"]), hash_segments(["a", "b"]));
    }

    #[test]
    fn test_hex_format() {
        let hex = hash_to_hex(hash_segments(["test"]));
        assert_eq!(hex.len(), 16);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
