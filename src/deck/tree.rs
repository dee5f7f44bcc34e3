//! In-memory hierarchical deck collection.
//!
//! Decks are keyed by qualified name (`Language::Kind` or
//! `Language::Kind::Category`). Creation is idempotent and ids are
//! deterministic, so re-running a pipeline extends the same decks instead
//! of duplicating them in the host application.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::profile::LanguageProfile;

use super::identity::deck_id;
use super::template::CardTemplate;

/// Note fields don't match the owning template's declared field list.
///
/// Unreachable when notes are authored through CardAuthoring; reaching it
/// indicates a caller bug, not bad user input.
#[derive(Debug, Error)]
#[error("Note for template '{template}' has {actual} fields, expected {expected}")]
pub struct FieldMismatchError {
    pub template: String,
    pub expected: usize,
    pub actual: usize,
}

/// A single note: template binding plus ordered field values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    /// Template this note renders with
    pub template_id: i64,

    /// Field values, in the template's declared order
    pub fields: Vec<String>,
}

/// A deck of notes with a stable, name-derived id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    /// Deterministic id (same qualified name ⇒ same id, across runs)
    pub id: i64,

    /// Full `::`-delimited deck path (e.g., "German::Vocabulary::Body Parts")
    pub qualified_name: String,

    /// Notes in insertion order
    pub notes: Vec<Note>,
}

/// Opaque handle to a deck inside a [`DeckTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeckKey(usize);

/// Hierarchical deck collection for one run
#[derive(Debug, Default)]
pub struct DeckTree {
    decks: Vec<Deck>,
    by_name: HashMap<String, usize>,

    // Export ordering: QA decks before nested category decks, creation
    // order within each group.
    qa_order: Vec<usize>,
    category_order: Vec<usize>,
}

impl DeckTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    fn get_or_create(&mut self, qualified_name: String, nested: bool) -> DeckKey {
        if let Some(&idx) = self.by_name.get(&qualified_name) {
            return DeckKey(idx);
        }

        let idx = self.decks.len();
        self.decks.push(Deck {
            id: deck_id(&qualified_name),
            qualified_name: qualified_name.clone(),
            notes: Vec::new(),
        });
        self.by_name.insert(qualified_name, idx);

        if nested {
            self.category_order.push(idx);
        } else {
            self.qa_order.push(idx);
        }

        DeckKey(idx)
    }

    /// Get or create the top-level deck for a kind (`Language::Kind`)
    pub fn get_or_create_qa_deck(&mut self, profile: &LanguageProfile, kind: &str) -> DeckKey {
        self.get_or_create(profile.qa_deck_name(kind), false)
    }

    /// Get or create a category deck (`Language::Kind::Category`).
    ///
    /// `category` must already be the registry-resolved canonical name, never
    /// the raw candidate: this is the seam that keeps near-duplicate category
    /// spellings from producing duplicate decks.
    pub fn get_or_create_category_deck(
        &mut self,
        profile: &LanguageProfile,
        kind: &str,
        category: &str,
    ) -> DeckKey {
        self.get_or_create(format!("{}::{}", profile.qa_deck_name(kind), category), true)
    }

    /// Append a note to a deck, checking field arity against the template
    pub fn add_card(
        &mut self,
        key: DeckKey,
        template: &CardTemplate,
        fields: Vec<String>,
    ) -> Result<(), FieldMismatchError> {
        if fields.len() != template.fields.len() {
            return Err(FieldMismatchError {
                template: template.name.clone(),
                expected: template.fields.len(),
                actual: fields.len(),
            });
        }

        self.decks[key.0].notes.push(Note {
            template_id: template.id,
            fields,
        });

        Ok(())
    }

    /// Borrow a deck by key
    pub fn deck(&self, key: DeckKey) -> &Deck {
        &self.decks[key.0]
    }

    /// All decks in export order: QA decks first, then category decks,
    /// creation order within each group
    pub fn all_decks(&self) -> Vec<&Deck> {
        self.qa_order
            .iter()
            .chain(self.category_order.iter())
            .map(|&idx| &self.decks[idx])
            .collect()
    }

    /// Number of decks in the tree
    pub fn len(&self) -> usize {
        self.decks.len()
    }

    /// Check if the tree has no decks
    pub fn is_empty(&self) -> bool {
        self.decks.is_empty()
    }

    /// Total note count across all decks
    pub fn note_count(&self) -> usize {
        self.decks.iter().map(|d| d.notes.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::template::TemplateCache;

    #[test]
    fn test_get_or_create_qa_deck_idempotent() {
        let profile = LanguageProfile::german();
        let mut tree = DeckTree::new();

        let first = tree.get_or_create_qa_deck(&profile, "Grammar");
        let second = tree.get_or_create_qa_deck(&profile, "Grammar");

        assert_eq!(first, second);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.deck(first).id, tree.deck(second).id);
    }

    #[test]
    fn test_get_or_create_category_deck_idempotent() {
        let profile = LanguageProfile::german();
        let mut tree = DeckTree::new();

        let first = tree.get_or_create_category_deck(&profile, "Vocabulary", "Body Parts");
        let second = tree.get_or_create_category_deck(&profile, "Vocabulary", "Body Parts");

        assert_eq!(first, second);
        assert_eq!(tree.len(), 1);
        assert_eq!(
            tree.deck(first).qualified_name,
            "German::Vocabulary::Body Parts"
        );
    }

    #[test]
    fn test_category_deck_nests_under_kind_deck_name() {
        let profile = LanguageProfile::german();
        let mut tree = DeckTree::new();

        let key = tree.get_or_create_category_deck(&profile, "Vocabulary", "Food");
        let deck = tree.deck(key);

        assert_eq!(deck.qualified_name, "German::Vocabulary::Food");
        assert_eq!(deck.id, deck_id("German::Vocabulary::Food"));
    }

    #[test]
    fn test_add_card_rejects_arity_mismatch() {
        let profile = LanguageProfile::german();
        let mut tree = DeckTree::new();
        let mut templates = TemplateCache::new();

        let key = tree.get_or_create_qa_deck(&profile, "Grammar");
        let template = templates.question_answer(&profile, "Grammar").clone();

        let err = tree
            .add_card(key, &template, vec!["only a question".to_string()])
            .unwrap_err();
        assert_eq!(err.expected, 2);
        assert_eq!(err.actual, 1);

        tree.add_card(
            key,
            &template,
            vec!["question".to_string(), "answer".to_string()],
        )
        .unwrap();
        assert_eq!(tree.deck(key).notes.len(), 1);
    }

    #[test]
    fn test_all_decks_qa_before_categories() {
        let profile = LanguageProfile::german();
        let mut tree = DeckTree::new();

        // Interleave creation; export order must still be QA first.
        tree.get_or_create_category_deck(&profile, "Vocabulary", "Food");
        tree.get_or_create_qa_deck(&profile, "Grammar");
        tree.get_or_create_category_deck(&profile, "Vocabulary", "Clothing");
        tree.get_or_create_qa_deck(&profile, "Vocabulary");

        let names: Vec<_> = tree
            .all_decks()
            .iter()
            .map(|d| d.qualified_name.clone())
            .collect();
        assert_eq!(
            names,
            vec![
                "German::Grammar",
                "German::Vocabulary",
                "German::Vocabulary::Food",
                "German::Vocabulary::Clothing",
            ]
        );
    }
}
