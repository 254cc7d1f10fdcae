//! Structural tests over an annotated sentence.
//!
//! Every predicate is a pure function of the sentence it is given. The
//! classifier in [`crate::classify`] evaluates them in a fixed priority order,
//! so several may hold at once without ambiguity.

use gloss_protocol::{CoarsePos, DependencyRole, EntityLabel, FinePos, Sentence, Token};

use crate::tree::DependencyTree;

/// A preposition paired with the object it governs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrepositionSpan<'a> {
    pub preposition: &'a Token,
    pub object: &'a Token,
    pub preposition_index: usize,
    pub object_index: usize,
}

/// A relative clause cut out of its sentence. `start..end` indexes the
/// original sentence; `tokens` is the clause on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct RelativeClause {
    pub tokens: Sentence,
    pub start: usize,
    pub end: usize,
}

/// A noun head and the contiguous tokens to its left that it governs.
#[derive(Debug, Clone, PartialEq)]
pub struct NounChunk<'a> {
    pub start: usize,
    pub head_index: usize,
    pub tokens: &'a [Token],
}

impl<'a> NounChunk<'a> {
    pub fn head(&self) -> &'a Token {
        &self.tokens[self.tokens.len() - 1]
    }
}

pub(crate) fn is_direct_object(token: &Token) -> bool {
    matches!(token.dependency, DependencyRole::DirectObject | DependencyRole::Object)
}

/// One token, or a determiner followed by one token.
pub fn is_single_word(sentence: &Sentence) -> bool {
    match sentence.tokens() {
        [_] => true,
        [first, _] => first.is_determiner(),
        _ => false,
    }
}

/// Not a clause: lacks a verb, or has one with neither a subject nor an
/// indirect object.
pub fn is_phrase(sentence: &Sentence) -> bool {
    if is_single_word(sentence) {
        return false;
    }
    let has_verb = sentence.iter().any(Token::is_verb);
    let has_subject = sentence.iter().any(|t| t.dependency.is_subject());
    let has_indirect = sentence.iter().any(|t| t.dependency.is_indirect_object());

    !(has_verb && (has_subject || has_indirect))
}

/// Pairs every prepositional object with the closest preposition before it.
pub fn retrieve_preposition_phrases(sentence: &Sentence) -> Vec<PrepositionSpan<'_>> {
    let tokens = sentence.tokens();
    let mut current = None;
    let mut spans = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        if token.dependency == DependencyRole::Preposition
            || token.coarse_pos == CoarsePos::SubordinatingConjunction
        {
            current = Some(i);
        } else if token.dependency == DependencyRole::PrepositionalObject {
            if let Some(p) = current {
                spans.push(PrepositionSpan {
                    preposition: &tokens[p],
                    object: token,
                    preposition_index: p,
                    object_index: i,
                });
            }
        }
    }

    spans
}

/// Drops phrases whose object is a date, a time or a pronoun.
pub fn filter_preposition_of_place(spans: Vec<PrepositionSpan<'_>>) -> Vec<PrepositionSpan<'_>> {
    spans
        .into_iter()
        .filter(|span| {
            !span.object.entity.map_or(false, |e| e.is_temporal()) && !span.object.is_pronoun()
        })
        .collect()
}

/// Preposition phrases that name a place: not temporal, not a pronoun and
/// not a person.
pub fn place_phrases(sentence: &Sentence) -> Vec<PrepositionSpan<'_>> {
    filter_preposition_of_place(retrieve_preposition_phrases(sentence))
        .into_iter()
        .filter(|span| span.object.entity != Some(EntityLabel::Person))
        .collect()
}

pub fn is_locative(sentence: &Sentence) -> bool {
    !is_single_word(sentence) && !place_phrases(sentence).is_empty()
}

/// Has a direct object, or a gerund governed (transitively) by the root.
pub fn is_transitive(sentence: &Sentence) -> bool {
    if is_single_word(sentence) || is_ditransitive(sentence) {
        return false;
    }
    if sentence.iter().any(is_direct_object) {
        return true;
    }

    let Some(root) = sentence.root_index() else {
        return false;
    };
    let tree = DependencyTree::build(sentence);
    sentence.iter().enumerate().any(|(i, token)| {
        i != root && token.fine_pos == FinePos::VerbPresentParticiple && tree.descends_from(i, root)
    })
}

/// Two objects: the root is directly followed by a dative, or the sentence
/// has a dative and a direct object, or more than one direct object.
pub fn is_ditransitive(sentence: &Sentence) -> bool {
    if sentence.len() < 3 {
        return false;
    }

    if let Some(root) = sentence.root_index() {
        if sentence.get(root + 1).map_or(false, |t| t.dependency.is_indirect_object()) {
            return true;
        }
    }

    let root = sentence.root_index();
    let has_dative = sentence
        .iter()
        .enumerate()
        .any(|(i, t)| Some(i) != root && t.dependency.is_indirect_object());
    let direct_objects = sentence.iter().filter(|t| is_direct_object(t)).count();

    (has_dative && direct_objects > 0) || direct_objects > 1
}

pub fn is_intransitive(sentence: &Sentence) -> bool {
    !is_single_word(sentence) && !is_transitive(sentence) && !is_ditransitive(sentence)
}

/// A copula carrying an adjectival complement or an attribute.
pub fn is_stative(sentence: &Sentence) -> bool {
    sentence.iter().any(|copula| {
        copula.coarse_pos == CoarsePos::Auxiliary
            && sentence.iter().any(|t| {
                t.head == copula.position
                    && matches!(
                        t.dependency,
                        DependencyRole::AdjectivalComplement | DependencyRole::Attribute
                    )
            })
    })
}

/// Contains a wh-determiner or a conjunction, i.e. possibly more than one clause.
pub fn is_complex(sentence: &Sentence) -> bool {
    sentence.iter().any(|t| {
        t.fine_pos == FinePos::WhDeterminer
            || matches!(
                t.coarse_pos,
                CoarsePos::CoordinatingConjunction | CoarsePos::SubordinatingConjunction
            )
    })
}

/// A full sentence opening with a wh-adverb or wh-pronoun.
pub fn is_wh_question(sentence: &Sentence) -> bool {
    if is_single_word(sentence) || is_phrase(sentence) {
        return false;
    }
    sentence
        .get(0)
        .map_or(false, |t| matches!(t.fine_pos, FinePos::WhAdverb | FinePos::WhPronoun))
}

/// Locates a relative clause introduced by a wh-word acting as subject or
/// dative. The clause covers the wh-word's verb and the contiguous run of
/// tokens it governs; a wh-word whose verb is not to its right falls back to
/// running up to the next root-labelled token, or to the end.
///
/// A wh-word opening the sentence is interrogative and never starts a clause.
pub fn filter_relative_clause(sentence: &Sentence) -> Option<RelativeClause> {
    let start = sentence.iter().enumerate().skip(1).find_map(|(i, t)| {
        let relative = matches!(t.fine_pos, FinePos::WhDeterminer | FinePos::WhPronoun);
        let role = t.dependency.is_subject() || t.dependency.is_indirect_object();
        (relative && role).then_some(i)
    })?;

    let verb = sentence
        .get(start)
        .and_then(|wh| sentence.index_of(wh.head))
        .filter(|&verb| verb > start);
    let end = match verb {
        Some(verb) => {
            let tree = DependencyTree::build(sentence);
            (start + 1..sentence.len())
                .find(|&i| i != verb && !tree.descends_from(i, verb))
                .unwrap_or(sentence.len())
        }
        None => sentence
            .iter()
            .enumerate()
            .skip(start + 1)
            .find(|(_, t)| t.dependency == DependencyRole::Root)
            .map_or(sentence.len(), |(i, _)| i),
    };

    Some(RelativeClause {
        tokens: sentence.span(start, end),
        start,
        end,
    })
}

/// Nominal heads together with the run of tokens directly to their left that
/// they govern. Nominals that only modify another noun are not heads.
pub fn retrieve_noun_phrases(sentence: &Sentence) -> Vec<NounChunk<'_>> {
    let tokens = sentence.tokens();
    let tree = DependencyTree::build(sentence);
    let mut chunks = Vec::new();

    for (head_index, head) in tokens.iter().enumerate() {
        let modifier_role = matches!(
            head.dependency,
            DependencyRole::Compound | DependencyRole::Possession | DependencyRole::NumericModifier
        );
        if !head.is_nominal() || modifier_role {
            continue;
        }

        let mut start = head_index;
        while start > 0 && tree.descends_from(start - 1, head_index) {
            start -= 1;
        }
        chunks.push(NounChunk {
            start,
            head_index,
            tokens: &tokens[start..=head_index],
        });
    }

    chunks
}

/// The modifiers of a chunk: everything except determiners and the head.
pub fn noun_phrase_to_adjectives(chunk: &NounChunk<'_>) -> Vec<Token> {
    chunk.tokens[..chunk.tokens.len() - 1]
        .iter()
        .filter(|t| !t.is_determiner())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use gloss_annotate::parse_sentence;

    fn sentence(conll: &str) -> Sentence {
        parse_sentence(conll).unwrap()
    }

    #[test]
    fn test_single_word() {
        assert!(is_single_word(&sentence(fixtures::HELLO)));
        assert!(is_single_word(&sentence(fixtures::THE_DOG)));
        assert!(!is_single_word(&sentence(fixtures::BIG_RED_BALL)));
        assert!(!is_single_word(&Sentence::default()));
    }

    #[test]
    fn test_phrase() {
        assert!(is_phrase(&sentence(fixtures::BIG_RED_BALL)));
        assert!(!is_phrase(&sentence(fixtures::THE_DOG)));
        assert!(!is_phrase(&sentence(fixtures::SHE_EATS_AN_APPLE)));
        assert!(!is_phrase(&sentence(fixtures::MOTHER_GIVES_ME_BAHT)));
    }

    #[test]
    fn test_preposition_phrases_and_place_filter() {
        let s = sentence(fixtures::MET_HIM_ON_MONDAY);
        let spans = retrieve_preposition_phrases(&s);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].object.text, "Monday");
        assert!(filter_preposition_of_place(spans).is_empty());
        assert!(!is_locative(&s));

        let s = sentence(fixtures::APPLE_ON_TABLE);
        let spans = place_phrases(&s);
        assert_eq!(spans.len(), 1);
        assert_eq!((spans[0].preposition_index, spans[0].object_index), (3, 5));
        assert!(is_locative(&s));
    }

    #[test]
    fn test_people_are_not_places() {
        let s = sentence(fixtures::LIVE_WITH_JOHN);
        assert_eq!(filter_preposition_of_place(retrieve_preposition_phrases(&s)).len(), 1);
        assert!(!is_locative(&s));
    }

    #[test]
    fn test_transitivity() {
        let s = sentence(fixtures::SHE_EATS_AN_APPLE);
        assert!(is_transitive(&s));
        assert!(!is_ditransitive(&s));
        assert!(!is_intransitive(&s));

        let s = sentence(fixtures::I_LIKE_SWIMMING);
        assert!(is_transitive(&s));

        let s = sentence(fixtures::CHICKENS_WALK);
        assert!(is_intransitive(&s));
        assert!(!is_transitive(&s));
    }

    #[test]
    fn test_ditransitive_variants() {
        // root followed by a dative
        let s = sentence(fixtures::MOTHER_GIVES_ME_BAHT);
        assert!(is_ditransitive(&s));
        assert!(!is_transitive(&s));

        // dative "to" further right plus a direct object
        assert!(is_ditransitive(&sentence(fixtures::GAVE_CHOCOLATES_TO_HIM)));
    }

    #[test]
    fn test_stative() {
        assert!(is_stative(&sentence(fixtures::DOG_IS_BIG)));
        assert!(!is_stative(&sentence(fixtures::MOTHER_IS_AT_HOME)));
        assert!(!is_stative(&sentence(fixtures::SHE_EATS_AN_APPLE)));
    }

    #[test]
    fn test_complex_and_wh_question() {
        assert!(is_complex(&sentence(fixtures::DOG_THAT_BIT_ME)));
        assert!(!is_complex(&sentence(fixtures::SHE_EATS_AN_APPLE)));

        assert!(is_wh_question(&sentence(fixtures::WHERE_DO_YOU_WORK)));
        assert!(!is_wh_question(&sentence(fixtures::DOG_THAT_BIT_ME)));
    }

    #[test]
    fn test_relative_clause_boundaries() {
        let s = sentence(fixtures::DOG_THAT_BIT_ME);
        let clause = filter_relative_clause(&s).unwrap();
        assert_eq!((clause.start, clause.end), (4, 7));
        let lemmas: Vec<&str> = clause.tokens.lemmas().collect();
        assert_eq!(lemmas, vec!["that", "bite", "I"]);

        // Clause ends where the main clause's root resumes.
        let s = sentence(fixtures::DOG_THAT_BIT_ME_RAN);
        let clause = filter_relative_clause(&s).unwrap();
        assert_eq!((clause.start, clause.end), (2, 5));

        // The main clause resumes after the clause verb's subtree, not at a root.
        let s = sentence(fixtures::GAVE_BOY_WHO_HELPED_ME_A_BOOK);
        let clause = filter_relative_clause(&s).unwrap();
        assert_eq!((clause.start, clause.end), (4, 7));
        let lemmas: Vec<&str> = clause.tokens.lemmas().collect();
        assert_eq!(lemmas, vec!["who", "help", "I"]);

        assert_eq!(filter_relative_clause(&sentence(fixtures::WHERE_DO_YOU_WORK)), None);
    }

    #[test]
    fn test_noun_chunks_and_adjectives() {
        let s = sentence(fixtures::BIG_RED_BALL);
        let chunks = retrieve_noun_phrases(&s);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].head().lemma, "ball");
        assert_eq!(chunks[0].start, 0);

        let adjectives: Vec<String> = noun_phrase_to_adjectives(&chunks[0])
            .into_iter()
            .map(|t| t.lemma)
            .collect();
        assert_eq!(adjectives, vec!["big", "red"]);
    }

    #[test]
    fn test_compounds_fold_into_their_head() {
        let s = sentence(fixtures::WORK_AT_KASETSART);
        let heads: Vec<&str> = retrieve_noun_phrases(&s).iter().map(|c| c.head().text.as_str()).collect();
        assert_eq!(heads, vec!["I", "University"]);
    }
}
