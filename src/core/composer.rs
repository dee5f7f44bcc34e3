//! Deck composition pipeline.
//!
//! The composer owns the per-run state (profile, registry, deck tree,
//! template cache) and wires the stages together: authoring validates raw
//! records, the registry resolves category identity, and validated cards
//! land in the deck tree. Constructed explicitly at pipeline start; nothing
//! here is global.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{info, warn};

use crate::adapters::CardSource;
use crate::authoring::{
    self, AuthoredCards, QaCard, VocabularyCard,
};
use crate::deck::{DeckTree, TemplateCache};
use crate::export;
use crate::profile::{CardStyle, LanguageProfile};
use crate::registry::CategoryRegistry;

/// Whether a category deck already existed or was created this run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckAction {
    Created,
    Extended,
}

impl std::fmt::Display for DeckAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeckAction::Created => write!(f, "created"),
            DeckAction::Extended => write!(f, "extended"),
        }
    }
}

/// Summary of one authoring run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Content kinds that contributed cards, in processing order
    pub kinds: Vec<String>,

    /// Validated records (a vocabulary record still counts once)
    pub authored_records: usize,

    /// Notes added to the tree (vocabulary records add two)
    pub notes_added: usize,

    /// Canonical category names touched, in processing order
    pub categories: Vec<String>,

    /// Created-vs-extended per category
    pub deck_actions: Vec<(String, DeckAction)>,

    /// Per-record diagnostics for skipped records
    pub diagnostics: Vec<String>,
}

impl RunSummary {
    fn record_kind(&mut self, kind: &str) {
        if !self.kinds.iter().any(|k| k == kind) {
            self.kinds.push(kind.to_string());
        }
    }
}

/// Per-run deck composition pipeline
pub struct Composer {
    profile: LanguageProfile,
    registry: CategoryRegistry,
    tree: DeckTree,
    templates: TemplateCache,
}

impl Composer {
    /// Create a composer with a loaded registry
    pub fn new(profile: LanguageProfile, registry: CategoryRegistry) -> Self {
        Self {
            profile,
            registry,
            tree: DeckTree::new(),
            templates: TemplateCache::new(),
        }
    }

    /// Active language profile
    pub fn profile(&self) -> &LanguageProfile {
        &self.profile
    }

    /// Category registry
    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    /// Deck tree built so far
    pub fn tree(&self) -> &DeckTree {
        &self.tree
    }

    /// Import a hand-authored JSON document.
    ///
    /// Structural errors abort before any deck mutation; per-record defects
    /// are collected in the summary and the valid remainder is authored.
    pub async fn import_json(&mut self, root: &Value) -> Result<RunSummary> {
        let outcome = authoring::author_document(&self.profile, root)?;

        let mut summary = RunSummary {
            diagnostics: outcome.diagnostics.clone(),
            ..Default::default()
        };

        for batch in outcome.batches {
            match batch.cards {
                AuthoredCards::Vocabulary(cards) => {
                    for card in cards {
                        // The JSON import shape requires a chapter per record
                        let candidate = card
                            .category
                            .clone()
                            .context("Vocabulary record authored without a category")?;
                        self.insert_vocabulary(&batch.kind, &candidate, &card, &mut summary)
                            .await?;
                    }
                }
                AuthoredCards::QuestionAnswer(cards) => {
                    self.insert_qa_batch(&batch.kind, &cards, &mut summary)?;
                }
            }
        }

        info!(
            records = summary.authored_records,
            notes = summary.notes_added,
            skipped = summary.diagnostics.len(),
            "JSON import authored"
        );

        Ok(summary)
    }

    /// Generate cards from extracted PDF pages via a card source.
    ///
    /// `kind_override` skips classification; an unknown override is fatal.
    /// A classifier label that resolves to no known kind falls back to the
    /// first configured deck type, with an explicit warning event.
    pub async fn generate_from_pdf(
        &mut self,
        source: &dyn CardSource,
        pdf: &[u8],
        kind_override: Option<&str>,
    ) -> Result<RunSummary> {
        let kind = match kind_override {
            Some(candidate) => self.profile.require_kind(candidate)?.to_string(),
            None => {
                let label = source.classify(pdf).await?;
                info!(source = source.name(), label = %label, "Classified content");
                self.resolve_classifier_label(&label)
            }
        };

        match self.profile.kind_style(&kind) {
            CardStyle::Vocabulary => self.generate_vocabulary(source, pdf, &kind).await,
            CardStyle::QuestionAnswer => self.generate_qa(source, pdf, &kind).await,
        }
    }

    /// Resolve a free-form classifier label against the profile, falling
    /// back to the first configured deck type when nothing matches.
    fn resolve_classifier_label(&self, label: &str) -> String {
        match self.profile.resolve_kind(label) {
            Some(kind) => kind.to_string(),
            None => {
                let fallback = self.profile.deck_types[0].clone();
                warn!(
                    label = %label,
                    fallback = %fallback,
                    "Classifier label matches no known deck type, using fallback"
                );
                fallback
            }
        }
    }

    async fn generate_vocabulary(
        &mut self,
        source: &dyn CardSource,
        pdf: &[u8],
        kind: &str,
    ) -> Result<RunSummary> {
        let existing = self.registry.categories();
        let batches = source.generate_vocabulary(pdf, &existing).await?;

        let mut summary = RunSummary::default();

        for (candidate, records) in batches {
            let (cards, diagnostics) = authoring::author_vocabulary(kind, &records, None);
            summary.diagnostics.extend(diagnostics);

            for card in cards {
                self.insert_vocabulary(kind, &candidate, &card, &mut summary)
                    .await?;
            }
        }

        info!(
            kind = %kind,
            records = summary.authored_records,
            categories = summary.categories.len(),
            "Vocabulary generation authored"
        );

        Ok(summary)
    }

    async fn generate_qa(
        &mut self,
        source: &dyn CardSource,
        pdf: &[u8],
        kind: &str,
    ) -> Result<RunSummary> {
        let records = source.generate_qa(kind, pdf).await?;
        let (cards, diagnostics) = authoring::author_question_answer(kind, &records);

        let mut summary = RunSummary {
            diagnostics,
            ..Default::default()
        };
        self.insert_qa_batch(kind, &cards, &mut summary)?;

        info!(kind = %kind, records = summary.authored_records, "Q&A generation authored");

        Ok(summary)
    }

    /// Insert one vocabulary record as a forward and a reverse note, under
    /// the registry-resolved category deck. Registers new categories
    /// immediately.
    async fn insert_vocabulary(
        &mut self,
        kind: &str,
        candidate: &str,
        card: &VocabularyCard,
        summary: &mut RunSummary,
    ) -> Result<()> {
        let (canonical, action) = match self.registry.find_match(candidate) {
            Some(existing) => (existing.to_string(), DeckAction::Extended),
            None => (candidate.trim().to_string(), DeckAction::Created),
        };

        if !summary.categories.iter().any(|c| c == &canonical) {
            info!(category = %canonical, action = %action, "Resolved category deck");
            summary.categories.push(canonical.clone());
            summary.deck_actions.push((canonical.clone(), action));
        }

        let key = self
            .tree
            .get_or_create_category_deck(&self.profile, kind, &canonical);

        let forward = self.templates.vocabulary_forward(&self.profile).clone();
        self.tree.add_card(
            key,
            &forward,
            vec![
                card.word.clone(),
                card.sentence.clone(),
                card.word_translation.clone(),
                card.sentence_translation.clone(),
            ],
        )?;

        let reverse = self.templates.vocabulary_reverse(&self.profile).clone();
        self.tree.add_card(
            key,
            &reverse,
            vec![card.word_translation.clone(), card.word.clone()],
        )?;

        self.registry.register(&canonical).await?;

        summary.record_kind(kind);
        summary.authored_records += 1;
        summary.notes_added += 2;

        Ok(())
    }

    /// Insert Q&A records into the kind's top-level deck
    fn insert_qa_batch(
        &mut self,
        kind: &str,
        cards: &[QaCard],
        summary: &mut RunSummary,
    ) -> Result<()> {
        if cards.is_empty() {
            return Ok(());
        }

        let key = self.tree.get_or_create_qa_deck(&self.profile, kind);
        let template = self.templates.question_answer(&self.profile, kind).clone();

        for card in cards {
            self.tree.add_card(
                key,
                &template,
                vec![card.question.clone(), card.answer.clone()],
            )?;
            summary.authored_records += 1;
            summary.notes_added += 1;
        }

        summary.record_kind(kind);
        Ok(())
    }

    /// Export the deck tree as a package, returning where it was written
    pub async fn export(&self, kind: &str, explicit: Option<&Path>) -> Result<PathBuf> {
        let package = export::flatten(&self.tree, &self.templates)?;
        let path = export::resolve_output_path(&self.profile.name, kind, explicit);

        export::write_package(&package, &path).await?;
        info!(path = %path.display(), decks = package.decks.len(), "Exported package");

        Ok(path)
    }
}
