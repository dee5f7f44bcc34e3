//! Deterministic identifiers for decks and card templates.
//!
//! Host applications merge imported decks by numeric id, so the same
//! qualified name must map to the same id on every run and on every
//! machine. Ids are derived from a SHA-256 digest of the input string,
//! reduced into `[2^30, 2^31)` to stay clear of the low range where host
//! apps allocate their own ids.
//!
//! The hash algorithm is part of the on-disk compatibility surface: changing
//! it orphans every previously exported deck, so it must never change
//! without bumping [`TEMPLATE_VERSION`].

use sha2::{Digest, Sha256};

/// Template rendering revision. Bump whenever template fields or render
/// rules change, so host apps replace previously synced copies.
pub const TEMPLATE_VERSION: u32 = 3;

/// Reduce a string into the reserved id range `[2^30, 2^31)`
fn reduced_hash(input: &str) -> i64 {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let digest = hasher.finalize();

    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    let wide = u64::from_be_bytes(bytes);

    ((wide % (1 << 30)) + (1 << 30)) as i64
}

/// Deterministic deck id from a qualified deck name
/// (e.g., "German::Vocabulary::Body Parts")
pub fn deck_id(qualified_name: &str) -> i64 {
    reduced_hash(qualified_name)
}

/// Deterministic template id from language, template kind, and version.
///
/// `kind` names the template, not just the deck type: vocabulary has two
/// directional templates ("Vocabulary" and "Vocabulary::Reverse").
pub fn template_id(language: &str, kind: &str, version: u32) -> i64 {
    reduced_hash(&format!("{}::{}::v{}", language, kind, version))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deck_id_deterministic() {
        let a = deck_id("German::Vocabulary::Body Parts");
        let b = deck_id("German::Vocabulary::Body Parts");
        assert_eq!(a, b);
    }

    #[test]
    fn test_deck_id_distinct_names() {
        assert_ne!(
            deck_id("German::Vocabulary::Food"),
            deck_id("German::Vocabulary::Clothing")
        );
    }

    #[test]
    fn test_deck_id_case_sensitive_storage() {
        // Resolution into a qualified name is case-insensitive, but the id
        // function itself is not: distinct spellings are distinct decks.
        assert_ne!(
            deck_id("German::Vocabulary::body parts"),
            deck_id("German::Vocabulary::Body Parts")
        );
    }

    #[test]
    fn test_id_range() {
        for name in ["German::Grammar", "Chinese::Radicals", "x", ""] {
            let id = deck_id(name);
            assert!(id >= 1 << 30, "id {} below reserved range", id);
            assert!(id < 1 << 31, "id {} above reserved range", id);
        }
    }

    #[test]
    fn test_template_id_version_bump_changes_id() {
        let v3 = template_id("German", "Vocabulary", 3);
        let v4 = template_id("German", "Vocabulary", 4);
        assert_ne!(v3, v4);
    }

    #[test]
    fn test_template_id_per_language() {
        assert_ne!(
            template_id("German", "Grammar", TEMPLATE_VERSION),
            template_id("Chinese", "Grammar", TEMPLATE_VERSION)
        );
    }
}
