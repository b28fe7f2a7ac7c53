//! Checksum calculation for upload deduplication.

use sha2::{Digest, Sha256};

/// Calculate the SHA-256 checksum of uploaded file content.
///
/// # Returns
/// Lowercase hexadecimal string of the hash.
pub fn calculate_checksum(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_consistency() {
        let content = b"Equipment Name,Type\nP-1,Pump\n";
        assert_eq!(calculate_checksum(content), calculate_checksum(content));
    }

    #[test]
    fn test_different_content_different_checksum() {
        assert_ne!(calculate_checksum(b"a,b\n1,2\n"), calculate_checksum(b"a,b\n1,3\n"));
    }

    #[test]
    fn test_known_digest() {
        assert_eq!(
            calculate_checksum(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
