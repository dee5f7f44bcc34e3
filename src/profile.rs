//! Language profiles.
//!
//! A profile describes one target language: its deck-type vocabulary
//! (Vocabulary, Grammar, Radicals, ...) and the locale codes used by the
//! card templates. Profiles are defined in YAML and validated on load;
//! the German and Chinese profiles are built in.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How records of a content kind are shaped and how many notes each produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardStyle {
    /// word/translation/sentence records, authored as two notes
    /// (native→translation and translation→native)
    Vocabulary,

    /// question/answer records, authored as one note
    QuestionAnswer,
}

/// Error for an explicitly requested kind that the profile does not know.
///
/// Silently mapping an unknown kind to a default would misfile cards, so
/// this is fatal and carries the valid kinds for the language.
#[derive(Debug, Error)]
#[error("Unknown content kind '{candidate}' for {language} (valid kinds: {})", known.join(", "))]
pub struct UnknownKindError {
    pub language: String,
    pub candidate: String,
    pub known: Vec<String>,
}

/// Configuration for one target language
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageProfile {
    /// Language being learned (e.g., "German")
    pub name: String,

    /// TTS locale code for the native language (e.g., "de_DE")
    pub native_locale: String,

    /// Language the cards translate into (e.g., "English")
    pub translation_name: String,

    /// TTS locale code for the translation language (e.g., "en_US")
    pub translation_locale: String,

    /// Legal top-level content kinds, in declaration order
    pub deck_types: Vec<String>,
}

impl LanguageProfile {
    /// Built-in German profile
    pub fn german() -> Self {
        Self {
            name: "German".to_string(),
            native_locale: "de_DE".to_string(),
            translation_name: "English".to_string(),
            translation_locale: "en_US".to_string(),
            deck_types: vec!["Vocabulary".to_string(), "Grammar".to_string()],
        }
    }

    /// Built-in Chinese profile
    pub fn chinese() -> Self {
        Self {
            name: "Chinese".to_string(),
            native_locale: "zh_CN".to_string(),
            translation_name: "English".to_string(),
            translation_locale: "en_US".to_string(),
            deck_types: vec![
                "Vocabulary".to_string(),
                "Grammar".to_string(),
                "Radicals".to_string(),
            ],
        }
    }

    /// Load a profile from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read profile file: {}", path.display()))?;

        Self::from_yaml(&content)
    }

    /// Parse a profile from YAML content
    pub fn from_yaml(content: &str) -> Result<Self> {
        let profile: Self =
            serde_yaml::from_str(content).context("Failed to parse profile YAML")?;
        profile.validate()?;
        Ok(profile)
    }

    /// Validate the profile definition
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            anyhow::bail!("Profile name cannot be empty");
        }

        if self.deck_types.is_empty() {
            anyhow::bail!("Profile must declare at least one deck type");
        }

        for (i, kind) in self.deck_types.iter().enumerate() {
            if kind.trim().is_empty() {
                anyhow::bail!("Deck type {} is empty", i);
            }

            let duplicate = self.deck_types[..i]
                .iter()
                .any(|k| k.eq_ignore_ascii_case(kind));
            if duplicate {
                anyhow::bail!("Duplicate deck type '{}' (matching is case-insensitive)", kind);
            }
        }

        Ok(())
    }

    /// Full name of the Q&A deck for a kind (e.g., "German::Grammar")
    pub fn qa_deck_name(&self, kind: &str) -> String {
        format!("{}::{}", self.name, kind)
    }

    /// Resolve a candidate kind case-insensitively against `deck_types`.
    ///
    /// Returns the canonical-cased name, or `None` for an unknown kind.
    /// Never creates a new deck type; callers that intend to add a kind on
    /// the fly must do so explicitly via [`title_case_kind`].
    pub fn resolve_kind(&self, candidate: &str) -> Option<&str> {
        let trimmed = candidate.trim();
        self.deck_types
            .iter()
            .find(|k| k.eq_ignore_ascii_case(trimmed))
            .map(|k| k.as_str())
    }

    /// Resolve a kind the caller named explicitly; unknown kinds are fatal
    pub fn require_kind(&self, candidate: &str) -> Result<&str, UnknownKindError> {
        self.resolve_kind(candidate).ok_or_else(|| UnknownKindError {
            language: self.name.clone(),
            candidate: candidate.trim().to_string(),
            known: self.deck_types.clone(),
        })
    }

    /// Record shape for a (resolved) kind.
    ///
    /// The kind named "Vocabulary" carries word/translation/sentence tuples;
    /// every other kind is Q&A-shaped.
    pub fn kind_style(&self, kind: &str) -> CardStyle {
        if kind.eq_ignore_ascii_case("vocabulary") {
            CardStyle::Vocabulary
        } else {
            CardStyle::QuestionAnswer
        }
    }
}

/// Title-case an unknown kind for callers that explicitly want to add a new
/// deck type on the fly. Escape hatch, not a default.
pub fn title_case_kind(candidate: &str) -> String {
    let trimmed = candidate.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qa_deck_name() {
        let profile = LanguageProfile::german();
        assert_eq!(profile.qa_deck_name("Grammar"), "German::Grammar");
        assert_eq!(profile.qa_deck_name("Vocabulary"), "German::Vocabulary");
    }

    #[test]
    fn test_resolve_kind_case_insensitive() {
        let profile = LanguageProfile::chinese();

        assert_eq!(profile.resolve_kind("radicals"), Some("Radicals"));
        assert_eq!(profile.resolve_kind("  GRAMMAR  "), Some("Grammar"));
        assert_eq!(profile.resolve_kind("Idioms"), None);
    }

    #[test]
    fn test_require_kind_lists_valid_kinds() {
        let profile = LanguageProfile::german();
        let err = profile.require_kind("Idioms").unwrap_err();

        assert_eq!(err.candidate, "Idioms");
        assert_eq!(err.known, vec!["Vocabulary", "Grammar"]);
        assert!(err.to_string().contains("Vocabulary, Grammar"));
    }

    #[test]
    fn test_kind_style() {
        let profile = LanguageProfile::chinese();
        assert_eq!(profile.kind_style("Vocabulary"), CardStyle::Vocabulary);
        assert_eq!(profile.kind_style("Grammar"), CardStyle::QuestionAnswer);
        assert_eq!(profile.kind_style("Radicals"), CardStyle::QuestionAnswer);
    }

    #[test]
    fn test_profile_from_yaml() {
        let yaml = r#"
name: Spanish
native_locale: es_ES
translation_name: English
translation_locale: en_US
deck_types:
  - Vocabulary
  - Grammar
"#;
        let profile = LanguageProfile::from_yaml(yaml).unwrap();
        assert_eq!(profile.name, "Spanish");
        assert_eq!(profile.deck_types.len(), 2);
    }

    #[test]
    fn test_profile_rejects_duplicate_kinds() {
        let yaml = r#"
name: Spanish
native_locale: es_ES
translation_name: English
translation_locale: en_US
deck_types:
  - Vocabulary
  - vocabulary
"#;
        assert!(LanguageProfile::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_title_case_kind() {
        assert_eq!(title_case_kind("idioms"), "Idioms");
        assert_eq!(title_case_kind("  idioms "), "Idioms");
        assert_eq!(title_case_kind(""), "");
    }
}
