//! kartenwerk - flashcard deck composer for language textbooks
//!
//! Turns source material (PDF textbook excerpts or hand-authored JSON)
//! into flashcards organized in a hierarchical deck namespace, then
//! serializes them into a portable deck package.
//!
//! # Architecture
//!
//! The core is the category-reconciliation and deck-composition engine:
//! - Deck and template ids are deterministic functions of their names, so
//!   re-exports merge into the same decks in the host application
//! - A persistent registry reconciles category names case-insensitively,
//!   so re-runs extend decks instead of duplicating them
//! - Card authoring validates records up front; bad records are skipped
//!   with diagnostics rather than aborting the batch
//!
//! # Modules
//!
//! - `adapters`: External collaborators (Gemini card source, PDF slicing)
//! - `authoring`: Record validation and normalization
//! - `core`: The composition pipeline (Composer)
//! - `deck`: Deterministic identity, templates, deck tree
//! - `export`: Package flattening and output paths
//! - `registry`: Persistent category registry
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Author decks from a JSON card file
//! kartenwerk json cards.json
//!
//! # Author decks from PDF textbook pages
//! kartenwerk pdf textbook.pdf -s 12 -e 15
//!
//! # List registered vocabulary categories
//! kartenwerk categories
//! ```

pub mod adapters;
pub mod authoring;
pub mod cli;
pub mod config;
pub mod core;
pub mod deck;
pub mod export;
pub mod profile;
pub mod registry;

// Re-export main types at crate root for convenience
pub use crate::core::{Composer, DeckAction, RunSummary};
pub use deck::{CardTemplate, Deck, DeckKey, DeckTree, FieldMismatchError, Note, TemplateCache};
pub use export::{DeckPackage, EmptyExportError};
pub use profile::{CardStyle, LanguageProfile, UnknownKindError};
pub use registry::CategoryRegistry;
