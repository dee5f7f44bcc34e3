//! Card templates and the per-run template cache.
//!
//! One template exists per (language, template kind) pair. Vocabulary gets
//! two directional templates (native→translation and translation→native);
//! every other deck type gets a single Q&A template. Templates are built
//! lazily on first use and cached for the lifetime of the run.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::profile::LanguageProfile;

use super::identity::{template_id, TEMPLATE_VERSION};

/// Shared styling for all card templates
const CARD_CSS: &str = r#".card {
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif;
    font-size: 20px;
    text-align: center;
    color: #1a1a1a;
    background-color: #ffffff;
    padding: 20px;
}

.word {
    font-size: 32px;
    font-weight: bold;
    margin-bottom: 20px;
}

.sentence {
    font-size: 22px;
    font-style: italic;
    margin: 15px 0;
    padding: 10px;
    border-radius: 8px;
}

.translation {
    font-size: 28px;
    font-weight: bold;
    color: #66bb6a;
    margin-top: 15px;
}

.sentence-translation {
    font-size: 20px;
    color: #81c784;
    margin-top: 10px;
}

hr#answer {
    border: none;
    border-top: 2px solid rgba(0, 0, 0, 0.3);
    margin: 20px 0;
}
"#;

/// A card template: ordered field list plus front/back render rules
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardTemplate {
    /// Deterministic template id (see deck::identity)
    pub id: i64,

    /// Human-readable template name (e.g., "German → English Vocabulary")
    pub name: String,

    /// Declared fields, in order. Note field counts must match exactly.
    pub fields: Vec<String>,

    /// Front (question side) render rule
    pub front: String,

    /// Back (answer side) render rule
    pub back: String,

    /// Card styling
    pub css: String,
}

impl CardTemplate {
    /// Native→translation vocabulary template.
    ///
    /// Front shows the native word and sentence (with a TTS directive for
    /// the native locale); back adds the translated word and sentence.
    pub fn vocabulary_forward(profile: &LanguageProfile) -> Self {
        Self {
            id: template_id(&profile.name, "Vocabulary", TEMPLATE_VERSION),
            name: format!("{} → {} Vocabulary", profile.name, profile.translation_name),
            fields: vec![
                "NativeWord".to_string(),
                "NativeSentence".to_string(),
                "TranslatedWord".to_string(),
                "TranslatedSentence".to_string(),
            ],
            front: format!(
                "<div class=\"word\">{{{{NativeWord}}}}</div>\n\
                 <div class=\"sentence\">{{{{tts {}:NativeSentence}}}}</div>\n\
                 <div class=\"sentence\">{{{{NativeSentence}}}}</div>",
                profile.native_locale
            ),
            back: "{{FrontSide}}\n\
                   <hr id=\"answer\">\n\
                   <div class=\"translation\">{{TranslatedWord}}</div>\n\
                   <div class=\"sentence-translation\">{{TranslatedSentence}}</div>"
                .to_string(),
            css: CARD_CSS.to_string(),
        }
    }

    /// Translation→native vocabulary template (recognition direction)
    pub fn vocabulary_reverse(profile: &LanguageProfile) -> Self {
        Self {
            id: template_id(&profile.name, "Vocabulary::Reverse", TEMPLATE_VERSION),
            name: format!("{} → {} Vocabulary", profile.translation_name, profile.name),
            fields: vec!["TranslatedWord".to_string(), "NativeWord".to_string()],
            front: "<div class=\"word\">{{TranslatedWord}}</div>".to_string(),
            back: "{{FrontSide}}\n\
                   <hr id=\"answer\">\n\
                   <div class=\"translation\">{{NativeWord}}</div>"
                .to_string(),
            css: CARD_CSS.to_string(),
        }
    }

    /// Q&A template for a non-vocabulary kind (Grammar, Radicals, ...)
    pub fn question_answer(profile: &LanguageProfile, kind: &str) -> Self {
        Self {
            id: template_id(&profile.name, kind, TEMPLATE_VERSION),
            name: format!("{} {}", profile.name, kind),
            fields: vec!["Question".to_string(), "Answer".to_string()],
            front: "<div class=\"word\">{{Question}}</div>".to_string(),
            back: "{{FrontSide}}\n\
                   <hr id=\"answer\">\n\
                   <div class=\"translation\">{{Answer}}</div>"
                .to_string(),
            css: CARD_CSS.to_string(),
        }
    }
}

/// Memoizing template lookup for one run.
///
/// Populated on first access, never recomputed afterward. Keys carry the
/// profile's language name, so one cache can serve multiple profiles. The
/// cache also remembers which templates a run actually used, in creation
/// order, for inclusion in the exported package.
#[derive(Debug, Default)]
pub struct TemplateCache {
    templates: HashMap<String, CardTemplate>,
    order: Vec<String>,
}

impl TemplateCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    fn get_or_build(
        &mut self,
        key: String,
        build: impl FnOnce() -> CardTemplate,
    ) -> &CardTemplate {
        if !self.templates.contains_key(&key) {
            self.templates.insert(key.clone(), build());
            self.order.push(key.clone());
        }
        &self.templates[&key]
    }

    /// Native→translation vocabulary template for this profile
    pub fn vocabulary_forward(&mut self, profile: &LanguageProfile) -> &CardTemplate {
        self.get_or_build(format!("{}::Vocabulary", profile.name), || {
            CardTemplate::vocabulary_forward(profile)
        })
    }

    /// Translation→native vocabulary template for this profile
    pub fn vocabulary_reverse(&mut self, profile: &LanguageProfile) -> &CardTemplate {
        self.get_or_build(format!("{}::Vocabulary::Reverse", profile.name), || {
            CardTemplate::vocabulary_reverse(profile)
        })
    }

    /// Q&A template for a (resolved) kind
    pub fn question_answer(&mut self, profile: &LanguageProfile, kind: &str) -> &CardTemplate {
        self.get_or_build(format!("{}::{}", profile.name, kind), || {
            CardTemplate::question_answer(profile, kind)
        })
    }

    /// Templates used so far, in first-use order
    pub fn used(&self) -> Vec<&CardTemplate> {
        self.order.iter().map(|k| &self.templates[k]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_templates_have_distinct_ids() {
        let profile = LanguageProfile::german();
        let forward = CardTemplate::vocabulary_forward(&profile);
        let reverse = CardTemplate::vocabulary_reverse(&profile);

        assert_ne!(forward.id, reverse.id);
        assert_eq!(forward.fields.len(), 4);
        assert_eq!(reverse.fields.len(), 2);
    }

    #[test]
    fn test_forward_template_carries_native_tts_locale() {
        let profile = LanguageProfile::german();
        let forward = CardTemplate::vocabulary_forward(&profile);
        assert!(forward.front.contains("tts de_DE:NativeSentence"));
    }

    #[test]
    fn test_cache_memoizes() {
        let profile = LanguageProfile::german();
        let mut cache = TemplateCache::new();

        let first = cache.question_answer(&profile, "Grammar").id;
        let second = cache.question_answer(&profile, "Grammar").id;

        assert_eq!(first, second);
        assert_eq!(cache.used().len(), 1);
    }

    #[test]
    fn test_cache_keys_are_per_language() {
        let german = LanguageProfile::german();
        let chinese = LanguageProfile::chinese();
        let mut cache = TemplateCache::new();

        let first = cache.question_answer(&german, "Grammar").id;
        let second = cache.question_answer(&chinese, "Grammar").id;

        assert_ne!(first, second);
        assert_eq!(cache.used().len(), 2);
    }

    #[test]
    fn test_cache_used_in_first_use_order() {
        let profile = LanguageProfile::chinese();
        let mut cache = TemplateCache::new();

        cache.question_answer(&profile, "Radicals");
        cache.vocabulary_forward(&profile);
        cache.question_answer(&profile, "Radicals");

        let names: Vec<_> = cache.used().iter().map(|t| t.name.clone()).collect();
        assert_eq!(names, vec!["Chinese Radicals", "Chinese → English Vocabulary"]);
    }
}
