use gloss_protocol::{Sentence, StructuralElement};
use log::debug;

use crate::classify::classify;
use crate::predicates::filter_relative_clause;
use crate::{reorder_clause, rules, GrammarError};

/// Reorders a sentence that may hold a relative clause.
///
/// The clause's wh-word takes on the antecedent's identity, both clauses are
/// reordered on their own, and the clause is spliced in right after the
/// antecedent with its own copy of the antecedent removed. Without a relative
/// clause the sentence goes through the ordinary rules.
pub fn reorder_complex(sentence: &Sentence) -> Result<Vec<StructuralElement>, GrammarError> {
    let Some(clause) = filter_relative_clause(sentence) else {
        debug!("No relative clause found, reordering as a simple sentence");
        return rules::apply(classify(sentence), sentence);
    };

    let antecedent = match clause.start.checked_sub(1).and_then(|i| sentence.get(i)) {
        Some(token) => token,
        None => return Err(GrammarError::MissingAntecedent { start: clause.start }),
    };
    debug!(
        "Relative clause {}..{} refers back to '{}'",
        clause.start, clause.end, antecedent.text
    );

    let clause_sentence = match clause.tokens.get(0) {
        Some(wh) => clause.tokens.with_token_replaced(0, wh.standing_in_for(antecedent)),
        None => return Err(GrammarError::MissingAntecedent { start: clause.start }),
    };

    let clause_elements = reorder_clause(&clause_sentence)?;
    let main_elements = reorder_clause(&sentence.without_span(clause.start, clause.end))?;

    Ok(splice(&main_elements, &clause_elements, &antecedent.lemma))
}

/// True when `element` holds a token for `lemma` anywhere inside it.
fn carries(element: &StructuralElement, lemma: &str) -> bool {
    match element {
        StructuralElement::NounPhrase(np) => {
            np.head.lemma == lemma || np.modifiers.iter().any(|m| m.lemma == lemma)
        }
        StructuralElement::VerbPhrase(vp) => {
            vp.verb.lemma == lemma || vp.related().any(|(_, t)| t.lemma == lemma)
        }
        _ => element.lexical_key() == Some(lemma),
    }
}

/// Inserts `clause` into `main` after the element standing for `key`,
/// dropping the clause's own element for `key`.
///
/// Rules that fold the referent into a phrase (idiomatic objects, datives)
/// leave no element of its own; the clause then follows the phrase carrying
/// it. With no trace of `key` in `main` the clause closes the sentence.
pub fn splice(
    main: &[StructuralElement],
    clause: &[StructuralElement],
    key: &str,
) -> Vec<StructuralElement> {
    let at = main
        .iter()
        .position(|e| e.lexical_key() == Some(key))
        .or_else(|| main.iter().position(|e| carries(e, key)))
        .map_or(main.len(), |i| i + 1);
    if at == main.len() {
        debug!("No element for '{}' in the main clause, appending the clause", key);
    }
    let duplicate = clause.iter().position(|e| e.lexical_key() == Some(key));

    let mut spliced = Vec::with_capacity(main.len() + clause.len());
    spliced.extend_from_slice(&main[..at]);
    spliced.extend(
        clause
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != duplicate)
            .map(|(_, e)| e.clone()),
    );
    spliced.extend_from_slice(&main[at..]);
    spliced
}
