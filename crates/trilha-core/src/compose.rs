//! Clarification prompts: turning an ambiguous branch into a question.
//!
//! When a consultation reaches an entity whose parent cannot be decided,
//! the user gets a natural-language question listing the alternatives. The
//! wording lives in a [`Phrasebook`] so deployments can restate it without
//! touching code; the defaults are the pt-BR copy the chat product ships.

use serde::{Deserialize, Serialize};

use crate::translate::TranslationTable;

/// Message templates for user-facing prompts.
///
/// `{topic}` and `{candidates}` are literal slots; `{topic}` may appear
/// more than once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Phrasebook {
    /// Question asked when a branch point has several parent candidates.
    pub clarify_template: String,
    /// Connective between the last two candidates ("ou" in pt-BR).
    pub connective: String,
    /// Fallback when the branch entity itself has no translation.
    pub unknown_topic: String,
    /// Shown when the relationship data loops and the walk cannot finish.
    pub cycle_template: String,
}

impl Default for Phrasebook {
    fn default() -> Self {
        Self {
            clarify_template: "Você está consultando sobre {topic}, mas está se referindo \
                               a que tipo de {topic}: {candidates}."
                .to_string(),
            connective: "ou".to_string(),
            unknown_topic: "Variável não encontrada no dicionário.".to_string(),
            cycle_template: "Não foi possível concluir a consulta sobre {topic}: as relações \
                             cadastradas formam um ciclo."
                .to_string(),
        }
    }
}

impl Phrasebook {
    /// Join candidate words for listing inside a question.
    ///
    /// One candidate stands alone, two are joined by the connective, and
    /// longer lists comma-separate all but the last pair: "A, B ou C".
    pub fn join_candidates(&self, words: &[String]) -> String {
        match words {
            [] => String::new(),
            [only] => only.clone(),
            [first, second] => format!("{first} {} {second}", self.connective),
            [head @ .., last] => {
                format!("{} {} {last}", head.join(", "), self.connective)
            }
        }
    }

    /// Diagnostic for a walk cut short by a relationship cycle.
    pub fn cycle_diagnostic(&self, topic_word: &str) -> String {
        self.cycle_template.replace("{topic}", topic_word)
    }
}

/// Compose the clarification question for a branch at `topic`.
///
/// `candidates` are entity names; each is translated for display, falling
/// back to the raw name when the table has no word for it. A topic without
/// a translation cannot be asked about, so the whole prompt falls back to
/// the phrasebook's unknown-topic line.
pub fn compose_clarification(
    topic: &str,
    candidates: &[String],
    translations: &TranslationTable,
    phrasebook: &Phrasebook,
) -> String {
    let Some(topic_word) = translations.word_for(topic) else {
        return phrasebook.unknown_topic.clone();
    };

    let words: Vec<String> = candidates
        .iter()
        .map(|c| {
            translations
                .word_for(c)
                .map(str::to_string)
                .unwrap_or_else(|| c.clone())
        })
        .collect();

    phrasebook
        .clarify_template
        .replace("{topic}", topic_word)
        .replace("{candidates}", &phrasebook.join_candidates(&words))
}
