//! Card authoring: validation and normalization of raw card records.
//!
//! Records arrive either from the generative pipeline or from a
//! hand-authored JSON batch. Structural problems (root is not an object, no
//! recognized content kind at all) are fatal and abort before any deck
//! mutation. Per-record problems (missing or whitespace-only required
//! fields) skip the record and are collected as 1-indexed diagnostics, so a
//! batch with partial defects still authors the valid remainder.

use serde_json::Value;
use thiserror::Error;

use crate::profile::{CardStyle, LanguageProfile};

/// Fatal structural errors. Nothing has been authored when these are raised.
#[derive(Debug, Error)]
pub enum AuthoringError {
    #[error("Input root must be a JSON object")]
    RootNotObject,

    #[error("No recognized content kinds in input (valid kinds for {language}: {})", known.join(", "))]
    NoRecognizedKinds {
        language: String,
        known: Vec<String>,
    },

    #[error("'{kind}' must be an array")]
    KindNotArray { kind: String },
}

/// A validated vocabulary record. Authored as two notes: native→translation
/// and translation→native.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabularyCard {
    /// Category candidate from the record, if the input carries one
    pub category: Option<String>,
    pub word: String,
    pub word_translation: String,
    pub sentence: String,
    pub sentence_translation: String,
}

/// A validated question/answer record. Authored as one note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QaCard {
    pub question: String,
    pub answer: String,
}

/// Validated cards for one content kind
#[derive(Debug, Clone)]
pub enum AuthoredCards {
    Vocabulary(Vec<VocabularyCard>),
    QuestionAnswer(Vec<QaCard>),
}

impl AuthoredCards {
    /// Number of validated records (not notes)
    pub fn len(&self) -> usize {
        match self {
            AuthoredCards::Vocabulary(cards) => cards.len(),
            AuthoredCards::QuestionAnswer(cards) => cards.len(),
        }
    }

    /// Check if no records were authored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One recognized kind's worth of authored cards
#[derive(Debug, Clone)]
pub struct KindBatch {
    /// Canonical-cased kind name from the profile
    pub kind: String,
    pub cards: AuthoredCards,
}

/// Result of authoring a whole input document
#[derive(Debug, Clone)]
pub struct AuthoringOutcome {
    /// Batches in the profile's deck-type order
    pub batches: Vec<KindBatch>,

    /// Per-record diagnostics for skipped records, 1-indexed
    pub diagnostics: Vec<String>,
}

impl AuthoringOutcome {
    /// Total validated records across all batches
    pub fn authored_count(&self) -> usize {
        self.batches.iter().map(|b| b.cards.len()).sum()
    }
}

/// Pull a required string field out of a record, appending a diagnostic on
/// failure. `label` is the 1-indexed record label ("Vocabulary card 3").
fn required_field(
    record: &Value,
    field: &str,
    label: &str,
    diagnostics: &mut Vec<String>,
) -> Option<String> {
    match record.get(field).and_then(Value::as_str) {
        Some(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        Some(_) => {
            diagnostics.push(format!("{}: field '{}' is empty", label, field));
            None
        }
        None => {
            diagnostics.push(format!("{}: missing required field '{}'", label, field));
            None
        }
    }
}

/// Validate vocabulary records.
///
/// `category_field` names a per-record category key ("chapter" in the JSON
/// import shape) that is then also required; generated batches carry the
/// category at batch level and pass `None`.
pub fn author_vocabulary(
    kind: &str,
    records: &[Value],
    category_field: Option<&str>,
) -> (Vec<VocabularyCard>, Vec<String>) {
    let mut cards = Vec::new();
    let mut diagnostics = Vec::new();

    for (i, record) in records.iter().enumerate() {
        let label = format!("{} card {}", kind, i + 1);

        if !record.is_object() {
            diagnostics.push(format!("{}: record is not an object", label));
            continue;
        }

        let before = diagnostics.len();

        let category = category_field
            .and_then(|field| required_field(record, field, &label, &mut diagnostics));
        let word = required_field(record, "word", &label, &mut diagnostics);
        let word_translation =
            required_field(record, "word_translation", &label, &mut diagnostics);
        let sentence = required_field(record, "sentence", &label, &mut diagnostics);
        let sentence_translation =
            required_field(record, "sentence_translation", &label, &mut diagnostics);

        if diagnostics.len() > before {
            continue;
        }

        if let (Some(word), Some(word_translation), Some(sentence), Some(sentence_translation)) =
            (word, word_translation, sentence, sentence_translation)
        {
            cards.push(VocabularyCard {
                category,
                word,
                word_translation,
                sentence,
                sentence_translation,
            });
        }
    }

    (cards, diagnostics)
}

/// Validate question/answer records
pub fn author_question_answer(kind: &str, records: &[Value]) -> (Vec<QaCard>, Vec<String>) {
    let mut cards = Vec::new();
    let mut diagnostics = Vec::new();

    for (i, record) in records.iter().enumerate() {
        let label = format!("{} card {}", kind, i + 1);

        if !record.is_object() {
            diagnostics.push(format!("{}: record is not an object", label));
            continue;
        }

        let before = diagnostics.len();

        let question = required_field(record, "question", &label, &mut diagnostics);
        let answer = required_field(record, "answer", &label, &mut diagnostics);

        if diagnostics.len() > before {
            continue;
        }

        if let (Some(question), Some(answer)) = (question, answer) {
            cards.push(QaCard { question, answer });
        }
    }

    (cards, diagnostics)
}

/// Author a whole JSON import document.
///
/// The root must be an object whose keys are content-kind names
/// (case-insensitive against the profile's deck types) mapping to record
/// arrays. Unrecognized keys are ignored; zero recognized keys is fatal.
pub fn author_document(
    profile: &LanguageProfile,
    root: &Value,
) -> Result<AuthoringOutcome, AuthoringError> {
    let map = root.as_object().ok_or(AuthoringError::RootNotObject)?;

    // Kinds in profile order, so output and diagnostics are deterministic
    // regardless of JSON key order.
    let mut recognized: Vec<(String, &Vec<Value>)> = Vec::new();
    for kind in &profile.deck_types {
        let entry = map
            .iter()
            .find(|(key, _)| profile.resolve_kind(key).is_some_and(|k| k == kind));
        if let Some((key, value)) = entry {
            let records = value.as_array().ok_or_else(|| AuthoringError::KindNotArray {
                kind: key.clone(),
            })?;
            recognized.push((kind.clone(), records));
        }
    }

    if recognized.is_empty() {
        return Err(AuthoringError::NoRecognizedKinds {
            language: profile.name.clone(),
            known: profile.deck_types.clone(),
        });
    }

    let mut batches = Vec::new();
    let mut diagnostics = Vec::new();

    for (kind, records) in recognized {
        let cards = match profile.kind_style(&kind) {
            CardStyle::Vocabulary => {
                let (cards, diags) = author_vocabulary(&kind, records, Some("chapter"));
                diagnostics.extend(diags);
                AuthoredCards::Vocabulary(cards)
            }
            CardStyle::QuestionAnswer => {
                let (cards, diags) = author_question_answer(&kind, records);
                diagnostics.extend(diags);
                AuthoredCards::QuestionAnswer(cards)
            }
        };

        batches.push(KindBatch { kind, cards });
    }

    Ok(AuthoringOutcome {
        batches,
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_partial_failure_batch() {
        let records = vec![
            json!({"word": "der Kopf", "word_translation": "head",
                   "sentence": "Mein Kopf tut weh.", "sentence_translation": "My head hurts."}),
            json!({"word": "die Hand", "word_translation": "hand",
                   "sentence": "   ", "sentence_translation": "..."}),
            json!({"word": "das Bein", "word_translation": "leg",
                   "sentence": "Das Bein ist lang.", "sentence_translation": "The leg is long."}),
        ];

        let (cards, diagnostics) = author_vocabulary("Vocabulary", &records, None);

        assert_eq!(cards.len(), 2);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0], "Vocabulary card 2: field 'sentence' is empty");
    }

    #[test]
    fn test_missing_field_diagnostic() {
        let records = vec![json!({"question": "What is the accusative of 'der'?"})];
        let (cards, diagnostics) = author_question_answer("Grammar", &records);

        assert!(cards.is_empty());
        assert_eq!(
            diagnostics,
            vec!["Grammar card 1: missing required field 'answer'"]
        );
    }

    #[test]
    fn test_fields_are_trimmed() {
        let records = vec![json!({"question": "  Q  ", "answer": " A "})];
        let (cards, _) = author_question_answer("Grammar", &records);
        assert_eq!(cards[0].question, "Q");
        assert_eq!(cards[0].answer, "A");
    }

    #[test]
    fn test_document_root_must_be_object() {
        let profile = LanguageProfile::german();
        let err = author_document(&profile, &json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, AuthoringError::RootNotObject));
    }

    #[test]
    fn test_document_requires_recognized_kind() {
        let profile = LanguageProfile::german();
        let err = author_document(&profile, &json!({"idioms": []})).unwrap_err();
        match err {
            AuthoringError::NoRecognizedKinds { language, known } => {
                assert_eq!(language, "German");
                assert_eq!(known, vec!["Vocabulary", "Grammar"]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_document_kind_keys_case_insensitive() {
        let profile = LanguageProfile::german();
        let doc = json!({
            "GRAMMAR": [{"question": "Q", "answer": "A"}],
        });

        let outcome = author_document(&profile, &doc).unwrap();
        assert_eq!(outcome.batches.len(), 1);
        assert_eq!(outcome.batches[0].kind, "Grammar");
        assert_eq!(outcome.authored_count(), 1);
    }

    #[test]
    fn test_document_kind_value_must_be_array() {
        let profile = LanguageProfile::german();
        let err = author_document(&profile, &json!({"grammar": {"question": "Q"}})).unwrap_err();
        assert!(matches!(err, AuthoringError::KindNotArray { .. }));
    }

    #[test]
    fn test_json_import_requires_chapter() {
        let profile = LanguageProfile::german();
        let doc = json!({
            "vocabulary": [{"word": "Haus", "word_translation": "house",
                            "sentence": "Das Haus ist groß.",
                            "sentence_translation": "The house is big."}],
        });

        let outcome = author_document(&profile, &doc).unwrap();
        assert_eq!(outcome.authored_count(), 0);
        assert_eq!(
            outcome.diagnostics,
            vec!["Vocabulary card 1: missing required field 'chapter'"]
        );
    }
}
