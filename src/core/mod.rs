//! Core pipeline logic.

pub mod composer;

pub use composer::{Composer, DeckAction, RunSummary};
