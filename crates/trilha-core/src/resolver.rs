//! The resolution pipeline: recognized entities in, navigation answer out.
//!
//! [`Resolver::resolve`] runs four stages over one recognized set:
//!
//! 1. every recognized name must exist in the graph (hard error otherwise);
//! 2. each topic-root entity (top weight) has its dependency chain walked
//!    downward through the set, surfacing ambiguity or a broken link;
//! 3. the whole set passes dependency validation;
//! 4. the surviving set renders as a navigation path.
//!
//! The walk keeps a visited set, so cyclic relationship data degrades into
//! a diagnostic answer instead of a hang. Stage order matters: a set that
//! raises a clarification question in stage 2 must not be reported as
//! merely incomplete by stage 3.

use std::collections::HashSet;

use crate::compose::{compose_clarification, Phrasebook};
use crate::graph::{GraphIndex, DEFAULT_TOP_WEIGHT};
use crate::path::build_path;
use crate::translate::TranslationTable;
use crate::validate::{validate, ValidationOutcome};
use crate::{RecognizedEntities, Resolution, ResolveError};

// ============================================================================
// Topic walk
// ============================================================================

/// Where a topic-root walk ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkOutcome {
    /// The chain closed at a root entity.
    Confirmed,
    /// `at` has several parent candidates and the set cannot pick one.
    Branch { at: String, candidates: Vec<String> },
    /// `at` has exactly one parent and the set does not contain it.
    Broken { at: String, missing: Vec<String> },
    /// The walk revisited `at`; the relationship data loops.
    Cycle { at: String },
}

// ============================================================================
// Resolver
// ============================================================================

/// Resolution engine over one graph snapshot.
///
/// Borrows the index and translation table; the phrasebook and top weight
/// are per-resolver knobs with product defaults.
pub struct Resolver<'a> {
    index: &'a GraphIndex,
    translations: &'a TranslationTable,
    phrasebook: Phrasebook,
    top_weight: u32,
}

impl<'a> Resolver<'a> {
    pub fn new(index: &'a GraphIndex, translations: &'a TranslationTable) -> Self {
        Self {
            index,
            translations,
            phrasebook: Phrasebook::default(),
            top_weight: DEFAULT_TOP_WEIGHT,
        }
    }

    pub fn phrasebook(mut self, book: Phrasebook) -> Self {
        self.phrasebook = book;
        self
    }

    pub fn top_weight(mut self, weight: u32) -> Self {
        self.top_weight = weight;
        self
    }

    /// Resolve one recognized set into an answer.
    ///
    /// Always terminates, never mutates anything, and returns the same
    /// answer for the same set and snapshot. `Err` is reserved for contract
    /// violations (names the graph or the translation table never heard
    /// of); everything a user can repair comes back as a [`Resolution`].
    pub fn resolve(&self, recognized: &RecognizedEntities) -> Result<Resolution, ResolveError> {
        if recognized.is_empty() {
            return Ok(Resolution::MissingDependency {
                entity: None,
                missing: Vec::new(),
            });
        }

        for name in recognized.iter() {
            self.index.record(name)?;
        }

        // Topic roots first: a question beats an incomplete-set report.
        for name in recognized.iter() {
            if self.index.record(name)?.weight != self.top_weight {
                continue;
            }
            match self.walk_topic(name, recognized)? {
                WalkOutcome::Confirmed => {}
                WalkOutcome::Branch { at, candidates } => {
                    return Ok(Resolution::Ambiguous {
                        prompt: compose_clarification(
                            &at,
                            &candidates,
                            self.translations,
                            &self.phrasebook,
                        ),
                    });
                }
                WalkOutcome::Broken { at, missing } => {
                    return Ok(Resolution::MissingDependency {
                        entity: Some(at),
                        missing,
                    });
                }
                WalkOutcome::Cycle { at } => {
                    tracing::warn!(
                        entity = %at,
                        "dependency walk revisited an entity; relationship snapshot has a cycle"
                    );
                    let word = self.translations.word_for(&at).unwrap_or(at.as_str());
                    return Ok(Resolution::Ambiguous {
                        prompt: self.phrasebook.cycle_diagnostic(word),
                    });
                }
            }
        }

        if let ValidationOutcome::Unsatisfied { entity, missing } =
            validate(recognized, self.index)?
        {
            return Ok(Resolution::MissingDependency {
                entity: Some(entity),
                missing,
            });
        }

        let path = build_path(recognized, self.index, self.translations, self.top_weight)?;
        Ok(Resolution::Resolved { path })
    }

    /// Walk one topic root's dependency chain down through the set.
    ///
    /// At each entity: zero present parents end the walk (missing link for
    /// a single parent, open question for several); exactly one present
    /// parent continues the chain; more than one is a contradiction the
    /// user has to settle. Candidate lists come out in name order.
    pub fn walk_topic(
        &self,
        root: &str,
        recognized: &RecognizedEntities,
    ) -> Result<WalkOutcome, ResolveError> {
        let mut visited: HashSet<String> = HashSet::new();
        visited.insert(root.to_string());
        let mut current = root.to_string();

        loop {
            let record = self.index.record(&current)?;
            if record.is_root() {
                return Ok(WalkOutcome::Confirmed);
            }

            let present: Vec<&String> = record
                .parents
                .iter()
                .filter(|p| recognized.contains(p.as_str()))
                .collect();

            match present.as_slice() {
                [] if record.parents.len() == 1 => {
                    return Ok(WalkOutcome::Broken {
                        at: current,
                        missing: record.parents.iter().cloned().collect(),
                    });
                }
                [] => {
                    return Ok(WalkOutcome::Branch {
                        at: current,
                        candidates: record.parents.iter().cloned().collect(),
                    });
                }
                [next] => {
                    let next = (*next).clone();
                    if !visited.insert(next.clone()) {
                        return Ok(WalkOutcome::Cycle { at: next });
                    }
                    current = next;
                }
                _ => {
                    return Ok(WalkOutcome::Branch {
                        at: current,
                        candidates: present.into_iter().cloned().collect(),
                    });
                }
            }
        }
    }
}
