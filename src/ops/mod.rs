//! Multi-step workflows built on the note registry.

pub mod edit;

pub use edit::{edit_note, EditOutcome};
