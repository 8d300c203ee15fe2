//! Translation table: internal entity names to user-facing words.
//!
//! Entities travel through the pipeline under their snapshot names
//! (`historico`, `compra`); everything shown to a person, path segments and
//! clarification prompts alike, goes through this table first.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One translation row as it arrives from the domain snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRow {
    pub entity: String,
    pub word: String,
}

impl TranslationRow {
    pub fn new(entity: impl Into<String>, word: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            word: word.into(),
        }
    }
}

/// A row that repeats an entity with a different word; the first wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationConflict {
    pub entity: String,
    pub kept: String,
    pub ignored: String,
}

/// Entity name to display word, first row wins on repeats.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationTable {
    words: BTreeMap<String, String>,
}

impl TranslationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold rows into a table. Repeated entities keep the first word and
    /// surface the rest as conflicts; blank rows are dropped.
    pub fn from_rows(rows: &[TranslationRow]) -> (TranslationTable, Vec<TranslationConflict>) {
        let mut words = BTreeMap::new();
        let mut conflicts = Vec::new();

        for row in rows {
            let entity = row.entity.trim();
            let word = row.word.trim();
            if entity.is_empty() || word.is_empty() {
                continue;
            }
            match words.get(entity) {
                None => {
                    words.insert(entity.to_string(), word.to_string());
                }
                Some(kept) if kept != word => {
                    conflicts.push(TranslationConflict {
                        entity: entity.to_string(),
                        kept: kept.clone(),
                        ignored: word.to_string(),
                    });
                }
                Some(_) => {}
            }
        }
        (TranslationTable { words }, conflicts)
    }

    pub fn word_for(&self, entity: &str) -> Option<&str> {
        self.words.get(entity).map(String::as_str)
    }

    pub fn contains(&self, entity: &str) -> bool {
        self.words.contains_key(entity)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Pairs in entity-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.words.iter().map(|(e, w)| (e.as_str(), w.as_str()))
    }
}
