//! Gemini card source.
//!
//! Sends extracted PDF pages inline (base64) to the Gemini generateContent
//! endpoint and parses card records out of the model's JSON reply. Prompts
//! are generalized over the active language so the same source works for
//! any profile.

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Deserialize;
use serde_json::Value;

use crate::profile::LanguageProfile;

use super::{CardSource, CategorizedRecords};

const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini API client
pub struct GeminiSource {
    api_key: String,
    model: String,
    language: String,
    translation: String,
    client: reqwest::Client,
}

/// generateContent response (only the parts we read)
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GeminiSource {
    /// Create a new Gemini source for a language profile
    pub fn new(api_key: String, model: Option<String>, profile: &LanguageProfile) -> Self {
        Self {
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            language: profile.name.clone(),
            translation: profile.translation_name.clone(),
            client: reqwest::Client::new(),
        }
    }

    /// Create from the GEMINI_API_KEY environment variable
    pub fn from_env(model: Option<String>, profile: &LanguageProfile) -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .context("GEMINI_API_KEY environment variable is not set")?;
        Ok(Self::new(api_key, model, profile))
    }

    /// Build the generateContent URL
    fn api_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            API_BASE, self.model, self.api_key
        )
    }

    /// POST the PDF plus a prompt, returning the model's text reply
    async fn generate(&self, pdf: &[u8], prompt: &str) -> Result<String> {
        let body = serde_json::json!({
            "contents": [{
                "parts": [
                    {
                        "inline_data": {
                            "mime_type": "application/pdf",
                            "data": BASE64.encode(pdf),
                        }
                    },
                    { "text": prompt },
                ]
            }]
        });

        let response = self
            .client
            .post(self.api_url())
            .json(&body)
            .send()
            .await
            .context("Failed to call Gemini API")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini API returned {}: {}", status, detail.trim());
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .context("Failed to parse Gemini response")?;

        let text: String = parsed
            .candidates
            .first()
            .map(|c| c.content.parts.iter().map(|p| p.text.as_str()).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            anyhow::bail!("Gemini returned an empty response");
        }

        Ok(text)
    }

    fn classification_prompt(&self) -> String {
        format!(
            "You are analyzing a page from a {lang} language learning textbook.\n\n\
             Analyze the PDF content and determine its primary content kind, \
             for example \"grammar\" (rules, conjugations, sentence structure) or \
             \"vocabulary\" (new words organized by topic or theme).\n\n\
             Respond with ONLY one lowercase word naming the content kind.",
            lang = self.language
        )
    }

    fn qa_prompt(&self, kind: &str) -> String {
        format!(
            "You are creating flashcards from {lang} {kind} content.\n\n\
             Analyze the PDF content and create question-answer flashcard pairs \
             covering the key points, rules, and common exceptions.\n\n\
             Generate flashcards in the following JSON format:\n\
             {{\n    \"cards\": [\n        {{\n            \"question\": \"Clear, specific question\",\n            \"answer\": \"Concise but complete answer\"\n        }}\n    ]\n}}\n\n\
             Create between 5-15 cards depending on content density.\n\
             Respond with ONLY the JSON object, no additional text.",
            lang = self.language,
            kind = kind.to_lowercase()
        )
    }

    fn vocabulary_prompt(&self, existing_categories: &[String]) -> String {
        let categories_section = if existing_categories.is_empty() {
            "Examples of categories: \"Body Parts\", \"Food and Drinks\", \"Clothing\", \
             \"Family Members\", \"Colors\", \"Animals\", \"Weather\", \"Professions\", etc."
                .to_string()
        } else {
            let list: Vec<String> = existing_categories
                .iter()
                .map(|c| format!("\"{}\"", c))
                .collect();
            format!(
                "Existing categories: {}\n\n\
                 If the content matches one of these existing categories, use that \
                 exact category name. Otherwise, create a new appropriate category name.",
                list.join(", ")
            )
        };

        format!(
            "You are creating flashcards from {lang} vocabulary content.\n\n\
             Analyze the PDF and identify all vocabulary categories/topics being taught. \
             Some PDFs contain vocabulary from multiple categories on the same pages.\n\
             {categories}\n\n\
             For each category found, extract all vocabulary words. For each word provide \
             the {lang} word, the {tr} translation, a {lang} example sentence, and the \
             {tr} translation of the sentence.\n\n\
             Generate your response in the following JSON format:\n\
             {{\n    \"categories\": [\n        {{\n            \"category\": \"The vocabulary category (2-4 words, Title Case)\",\n            \"cards\": [\n                {{\n                    \"word\": \"{lang} word\",\n                    \"word_translation\": \"{tr} translation\",\n                    \"sentence\": \"{lang} sentence using the word\",\n                    \"sentence_translation\": \"{tr} translation of the sentence\"\n                }}\n            ]\n        }}\n    ]\n}}\n\n\
             Respond with ONLY the JSON object, no additional text.",
            lang = self.language,
            tr = self.translation,
            categories = categories_section
        )
    }
}

/// Extract a JSON object from model output, which may wrap it in a fenced
/// code block or surround it with prose.
fn extract_json(text: &str) -> Result<Value> {
    let candidate = if let Some(start) = text.find("```") {
        let after_fence = &text[start + 3..];
        // Skip an optional language tag on the fence line
        let body_start = after_fence.find('\n').map(|i| i + 1).unwrap_or(0);
        let body = &after_fence[body_start..];
        match body.find("```") {
            Some(end) => &body[..end],
            None => body,
        }
    } else {
        let start = text.find('{');
        let end = text.rfind('}');
        match (start, end) {
            (Some(s), Some(e)) if e > s => &text[s..=e],
            _ => text,
        }
    };

    serde_json::from_str(candidate.trim())
        .with_context(|| format!("Model output is not valid JSON: {}", candidate.trim()))
}

#[async_trait]
impl CardSource for GeminiSource {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn classify(&self, pdf: &[u8]) -> Result<String> {
        let reply = self.generate(pdf, &self.classification_prompt()).await?;
        Ok(reply.trim().to_lowercase())
    }

    async fn generate_qa(&self, kind: &str, pdf: &[u8]) -> Result<Vec<Value>> {
        let reply = self.generate(pdf, &self.qa_prompt(kind)).await?;
        let data = extract_json(&reply)?;

        let cards = data
            .get("cards")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        Ok(cards)
    }

    async fn generate_vocabulary(
        &self,
        pdf: &[u8],
        existing_categories: &[String],
    ) -> Result<CategorizedRecords> {
        let reply = self
            .generate(pdf, &self.vocabulary_prompt(existing_categories))
            .await?;
        let data = extract_json(&reply)?;

        // Multi-category format
        if let Some(categories) = data.get("categories").and_then(Value::as_array) {
            let mut result = Vec::new();
            for entry in categories {
                let category = entry
                    .get("category")
                    .and_then(Value::as_str)
                    .unwrap_or("Vocabulary")
                    .to_string();
                let cards = entry
                    .get("cards")
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default();
                result.push((category, cards));
            }
            return Ok(result);
        }

        // Legacy single-category format
        let category = data
            .get("category")
            .and_then(Value::as_str)
            .unwrap_or("Vocabulary")
            .to_string();
        let cards = data
            .get("cards")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        Ok(vec![(category, cards)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_fenced() {
        let text = "Here you go:\n```json\n{\"cards\": []}\n```\nDone.";
        let value = extract_json(text).unwrap();
        assert!(value.get("cards").is_some());
    }

    #[test]
    fn test_extract_json_raw_with_prose() {
        let text = "Sure! {\"category\": \"Food\", \"cards\": []} hope that helps";
        let value = extract_json(text).unwrap();
        assert_eq!(value["category"], "Food");
    }

    #[test]
    fn test_extract_json_invalid() {
        assert!(extract_json("not json at all").is_err());
    }

    #[test]
    fn test_api_url_includes_model() {
        let profile = LanguageProfile::german();
        let source = GeminiSource::new("KEY".to_string(), None, &profile);
        assert!(source.api_url().contains("models/gemini-2.0-flash:generateContent"));
    }
}
