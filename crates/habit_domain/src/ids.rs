use sha2::{Digest, Sha256};

const SHORT_HASH_LEN: usize = 8;

/// Short hex id derived from a habit name.
pub fn short_hash(name: &str) -> String {
    short_hash_with(name, 0)
}

/// Same as [`short_hash`] but salted so habits sharing a name get distinct ids.
/// A disambiguator of zero yields the unsalted hash.
pub fn short_hash_with(name: &str, disambiguator: u32) -> String {
    let mut hasher = Sha256::new();
    hasher.update(name.as_bytes());
    if disambiguator > 0 {
        hasher.update(b"#");
        hasher.update(disambiguator.to_le_bytes());
    }
    let hash_hex = format!("{:x}", hasher.finalize());
    hash_hex[..SHORT_HASH_LEN].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_stable_and_short() {
        let id = short_hash("Running");
        assert_eq!(id, short_hash("Running"));
        assert_eq!(id.len(), SHORT_HASH_LEN);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn disambiguator_changes_hash() {
        assert_eq!(short_hash_with("Running", 0), short_hash("Running"));
        assert_ne!(short_hash_with("Running", 1), short_hash("Running"));
        assert_ne!(short_hash_with("Running", 1), short_hash_with("Running", 2));
    }
}
