pub mod tree;
pub mod predicates;
pub mod classify;
pub mod rules;
pub mod complex;

pub use classify::{classify, SentenceRule};
pub use rules::NOT_SUPPORTED;

use gloss_protocol::{Sentence, StructuralElement};
use log::debug;
use thiserror::Error;

use crate::predicates::{is_complex, is_wh_question};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    /// A rule was applied to a sentence lacking one of its constituents.
    #[error("{rule}: sentence has no {constituent}")]
    MissingConstituent {
        rule: SentenceRule,
        constituent: &'static str,
    },
    /// A relative clause with no token before it to refer back to.
    #[error("relative clause at token {start} has no antecedent")]
    MissingAntecedent { start: usize },
}

impl GrammarError {
    /// A missing antecedent means the annotation and the clause splitter
    /// disagree; the caller should abandon the whole request rather than the
    /// sentence.
    pub fn is_request_fatal(&self) -> bool {
        matches!(self, Self::MissingAntecedent { .. })
    }
}

/// Reorders one sentence into sign-language order.
///
/// Single words, phrases and unsupported sentences map straight through their
/// rule. Full sentences go through the relative clause handler when they may
/// hold more than one clause, and wh-questions get their question word
/// appended as a marker.
pub fn reorder(sentence: &Sentence) -> Result<Vec<StructuralElement>, GrammarError> {
    if sentence.is_empty() {
        return Ok(Vec::new());
    }

    let rule = classify(sentence);
    if matches!(
        rule,
        SentenceRule::SingleWord | SentenceRule::Phrase | SentenceRule::Unsupported
    ) {
        return rules::apply(rule, sentence);
    }

    let mut elements = reorder_clause(sentence)?;
    if is_wh_question(sentence) {
        if let Some(first) = sentence.get(0) {
            debug!("Appending question marker for '{}'", first.text);
            elements.push(StructuralElement::Marker(first.lemma.to_uppercase()));
        }
    }
    Ok(elements)
}

/// Reorders a sentence or a clause cut out of one, without the question marker.
pub(crate) fn reorder_clause(sentence: &Sentence) -> Result<Vec<StructuralElement>, GrammarError> {
    if sentence.is_empty() {
        return Ok(Vec::new());
    }
    if is_complex(sentence) {
        complex::reorder_complex(sentence)
    } else {
        rules::apply(classify(sentence), sentence)
    }
}
