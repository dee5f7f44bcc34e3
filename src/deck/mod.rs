//! Deck composition: deterministic identity, card templates, and the
//! in-memory deck tree.

pub mod identity;
pub mod template;
pub mod tree;

pub use identity::{deck_id, template_id, TEMPLATE_VERSION};
pub use template::{CardTemplate, TemplateCache};
pub use tree::{Deck, DeckKey, DeckTree, FieldMismatchError, Note};
