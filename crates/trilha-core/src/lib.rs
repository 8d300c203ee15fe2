//! Trilha core: entity-relationship resolution for chat consultations.
//!
//! An upstream recognizer hands us the entity names it spotted in a user's
//! message. This crate decides what those names amount to against the
//! domain's relationship graph:
//!
//! ```text
//! recognized names
//!       │
//!       ▼
//! ┌─────────────┐   ┌──────────────┐   ┌─────────────┐   ┌────────────┐
//! │ GraphIndex   │──▶│ topic walk    │──▶│ validation   │──▶│ path build  │
//! │ (lookup)     │   │ (resolver)    │   │ (validate)   │   │ (path)      │
//! └─────────────┘   └──────────────┘   └─────────────┘   └────────────┘
//!                          │                  │                 │
//!                     Ambiguous        MissingDependency     Resolved
//! ```
//!
//! Every answer is a [`Resolution`] value: a navigation path, a list of
//! missing prerequisites, or a clarification question for the user. Errors
//! are reserved for contract violations between the recognizer and the
//! snapshot ([`ResolveError`]).
//!
//! ## Module Organization
//!
//! - `graph`: snapshot rows folded into an immutable entity index
//! - `translate`: internal names to display words
//! - `validate`: is a recognized set self-sufficient?
//! - `path`: rendering a validated set as a `/`-joined path
//! - `compose`: clarification prompts and the pt-BR phrasebook
//! - `resolver`: the pipeline tying the stages together

pub mod compose;
pub mod graph;
pub mod path;
pub mod resolver;
pub mod translate;
pub mod validate;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

// Re-export key types
pub use compose::{compose_clarification, Phrasebook};
pub use graph::{
    BuildReport, BuildWarning, EntityRecord, GraphIndex, RelationRow, DEFAULT_TOP_WEIGHT,
};
pub use path::build_path;
pub use resolver::{Resolver, WalkOutcome};
pub use translate::{TranslationConflict, TranslationRow, TranslationTable};
pub use validate::{validate, ValidationOutcome};

// ============================================================================
// Outcomes and errors
// ============================================================================

/// What a recognized set resolves to.
///
/// All three variants are answers, not errors: the chat layer forwards a
/// path to navigation and the other two back to the user as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Resolution {
    /// The set names one reachable spot in the domain.
    Resolved { path: String },
    /// The set cannot stand on its own. `entity` is the first one whose
    /// prerequisite is absent (`None` when the set itself was empty) and
    /// `missing` lists the acceptable parents, in name order.
    MissingDependency {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        entity: Option<String>,
        missing: Vec<String>,
    },
    /// The set supports several readings; `prompt` asks the user to pick.
    Ambiguous { prompt: String },
}

/// Contract violations between the recognizer, the snapshot, and the
/// translation table. These are operator problems, never user problems.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("entity `{name}` is not in the relationship graph")]
    UnknownEntity { name: String },
    #[error("entity `{entity}` has no translation")]
    UnknownTranslation { entity: String },
}

// ============================================================================
// Recognized sets
// ============================================================================

/// The entity names recognized in one user message.
///
/// Construction normalizes the recognizer's output: names are trimmed,
/// blanks dropped, repeats collapsed. First-seen order is kept; it is the
/// tiebreak for everything downstream that says "first".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecognizedEntities {
    names: Vec<String>,
    seen: HashSet<String>,
}

impl RecognizedEntities {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        for name in names {
            set.push(name.as_ref());
        }
        set
    }

    /// Add one name; returns false for blanks and repeats.
    pub fn push(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.seen.contains(name) {
            return false;
        }
        self.seen.insert(name.to_string());
        self.names.push(name.to_string());
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.seen.contains(name)
    }

    /// Names in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
