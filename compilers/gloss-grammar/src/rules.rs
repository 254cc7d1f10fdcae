//! Reordering rules. Each rule takes a sentence it was classified for and
//! emits the structural elements in sign-language order.

use gloss_protocol::{
    ClassifierRef, CoarsePos, DependencyRole, EntityLabel, FinePos, NounPhrase, PrepositionPhrase,
    Sentence, StructuralElement, Token, VerbPhrase,
};
use log::debug;

use crate::classify::SentenceRule;
use crate::predicates::{
    is_direct_object, noun_phrase_to_adjectives, place_phrases, retrieve_noun_phrases, NounChunk,
};
use crate::tree::DependencyTree;
use crate::GrammarError;

/// Emitted in place of a sentence no rule covers.
pub const NOT_SUPPORTED: &str = "not supported";

/// Prepositions that describe a spatial scene between two referents.
const SCENE_PREPOSITIONS: &[&str] = &["in", "on", "under"];

/// Verb + object pairs signed as one unit.
const IDIOMATIC_OBJECTS: &[(&str, &str)] = &[("have", "meeting")];

const REFLEXIVES: &[(&str, &[&str])] = &[
    ("i", &["myself"]),
    ("you", &["yourself", "yourselves"]),
    ("he", &["himself"]),
    ("she", &["herself"]),
    ("it", &["itself"]),
    ("we", &["ourselves"]),
    ("they", &["themselves", "themself"]),
];

pub fn apply(rule: SentenceRule, sentence: &Sentence) -> Result<Vec<StructuralElement>, GrammarError> {
    debug!("Applying {} to '{}'", rule, sentence.lemmas().collect::<Vec<_>>().join(" "));
    match rule {
        SentenceRule::SingleWord => Ok(single_word(sentence)),
        SentenceRule::Phrase => Ok(phrase(sentence)),
        SentenceRule::Transitive => transitive(sentence),
        SentenceRule::Intransitive => intransitive(sentence),
        SentenceRule::Ditransitive => ditransitive(sentence),
        SentenceRule::Locative => locative(sentence),
        SentenceRule::Stative => stative(sentence),
        SentenceRule::Unsupported => Ok(vec![StructuralElement::Marker(NOT_SUPPORTED.to_string())]),
    }
}

fn missing(rule: SentenceRule, constituent: &'static str) -> GrammarError {
    GrammarError::MissingConstituent { rule, constituent }
}

fn noun_phrase(chunks: &[NounChunk<'_>], token: &Token) -> NounPhrase {
    let modifiers = chunks
        .iter()
        .find(|c| c.head().position == token.position)
        .map(noun_phrase_to_adjectives)
        .unwrap_or_default();
    NounPhrase::new(token.clone()).with_modifiers(modifiers)
}

fn is_reflexive_of(subject: &Token, object: &Token) -> bool {
    let object = object.lemma.to_lowercase();
    if object == "i" {
        return true;
    }
    let subject = subject.lemma.to_lowercase();
    REFLEXIVES
        .iter()
        .find(|(pronoun, _)| *pronoun == subject)
        .map_or(false, |(_, forms)| forms.contains(&object.as_str()))
}

/// br0: every lemma on its own.
pub fn single_word(sentence: &Sentence) -> Vec<StructuralElement> {
    sentence.lemmas().map(StructuralElement::literal).collect()
}

/// br0: the lemmas joined into one literal.
pub fn phrase(sentence: &Sentence) -> Vec<StructuralElement> {
    vec![StructuralElement::literal(sentence.lemmas().collect::<Vec<_>>().join(" "))]
}

/// br1: subject, direct object (or a gerund under the root) and the verb.
///
/// Signed object-subject-verb. A pronoun subject acting on itself keeps only
/// the subject and the verb.
pub fn transitive(sentence: &Sentence) -> Result<Vec<StructuralElement>, GrammarError> {
    const RULE: SentenceRule = SentenceRule::Transitive;
    let root = sentence.root_index();

    let mut subject = None;
    let mut direct_object = None;
    let mut gerund = None;
    let mut last_verb = None;
    for (i, token) in sentence.iter().enumerate() {
        if token.dependency.is_subject() {
            subject = Some(token);
        } else if is_direct_object(token) {
            direct_object = Some(token);
        } else if token.fine_pos == FinePos::VerbPresentParticiple && Some(i) != root {
            gerund = Some(token);
        } else if token.coarse_pos == CoarsePos::Verb {
            last_verb = Some(token);
        }
    }

    let verb = root
        .and_then(|i| sentence.get(i))
        .filter(|t| t.coarse_pos == CoarsePos::Verb)
        .or(last_verb)
        .ok_or_else(|| missing(RULE, "verb"))?;
    let subject = subject.ok_or_else(|| missing(RULE, "subject"))?;
    let object = direct_object.or(gerund).ok_or_else(|| missing(RULE, "direct object"))?;

    let chunks = retrieve_noun_phrases(sentence);
    let verb_phrase = VerbPhrase::new(verb.clone())
        .with_subject(Some(subject.clone()))
        .with_direct_object(Some(object.clone()));
    let subject_np = StructuralElement::NounPhrase(noun_phrase(&chunks, subject));
    let object_np = StructuralElement::NounPhrase(noun_phrase(&chunks, object));

    let verb_lemma = verb.lemma.to_lowercase();
    let object_lemma = object.lemma.to_lowercase();
    if IDIOMATIC_OBJECTS
        .iter()
        .any(|(v, o)| *v == verb_lemma && *o == object_lemma)
    {
        let phrase = format!("{} {}", verb.lemma, object.lemma);
        debug!("Idiomatic object: '{}'", phrase);
        return Ok(vec![
            subject_np,
            StructuralElement::VerbPhrase(verb_phrase.with_direct_object_phrase(phrase)),
        ]);
    }

    let verb_phrase = StructuralElement::VerbPhrase(verb_phrase);
    if subject.is_pronoun() && is_reflexive_of(subject, object) {
        Ok(vec![subject_np, verb_phrase])
    } else {
        Ok(vec![object_np, subject_np, verb_phrase])
    }
}

/// br2: the token before the root is taken as its subject.
pub fn intransitive(sentence: &Sentence) -> Result<Vec<StructuralElement>, GrammarError> {
    const RULE: SentenceRule = SentenceRule::Intransitive;

    let root = sentence.root_index().ok_or_else(|| missing(RULE, "root verb"))?;
    if root == 0 {
        return Err(missing(RULE, "subject before the verb"));
    }
    let subject = &sentence.tokens()[root - 1];
    let verb = &sentence.tokens()[root];

    let chunks = retrieve_noun_phrases(sentence);
    Ok(vec![
        StructuralElement::NounPhrase(noun_phrase(&chunks, subject)),
        StructuralElement::VerbPhrase(VerbPhrase::new(verb.clone()).with_subject(Some(subject.clone()))),
    ])
}

/// br3: quantity, non-pronoun subject, direct object, then the verb phrase
/// carrying both objects.
pub fn ditransitive(sentence: &Sentence) -> Result<Vec<StructuralElement>, GrammarError> {
    const RULE: SentenceRule = SentenceRule::Ditransitive;
    let root_index = sentence.root_index().ok_or_else(|| missing(RULE, "root verb"))?;

    let mut subject = None;
    let mut direct_objects = Vec::new();
    let mut indirect = None;
    let mut quantity = None;
    for (i, token) in sentence.iter().enumerate() {
        if token.dependency.is_subject() {
            subject = Some(token);
        } else if i == root_index {
            continue;
        } else if is_direct_object(token) {
            direct_objects.push(token);
        } else if token.dependency.is_indirect_object() {
            indirect = Some((i, token));
        } else if token.entity == Some(EntityLabel::Cardinal) {
            quantity = Some(token);
        }
    }

    let subject = subject.ok_or_else(|| missing(RULE, "subject"))?;
    let root = &sentence.tokens()[root_index];

    let (indirect, direct) = match (indirect, direct_objects.as_slice()) {
        (Some(found), [.., last]) => (Some(recipient(sentence, found)), *last),
        (None, [first, .., last]) => (Some(*first), *last),
        _ => (None, *direct_objects.last().ok_or_else(|| missing(RULE, "direct object"))?),
    };
    let indirect = indirect.ok_or_else(|| missing(RULE, "indirect object"))?;

    let mut elements = Vec::with_capacity(4);
    if let Some(quantity) = quantity {
        elements.push(StructuralElement::literal(quantity.lemma.clone()));
    }
    if !subject.is_pronoun() {
        elements.push(StructuralElement::literal(subject.lemma.clone()));
    }
    elements.push(StructuralElement::literal(direct.lemma.clone()));
    elements.push(StructuralElement::VerbPhrase(
        VerbPhrase::new(root.clone())
            .with_subject(Some(subject.clone()))
            .with_indirect_object(Some(indirect.clone()))
            .with_direct_object(Some(direct.clone())),
    ));
    Ok(elements)
}

/// A dative preposition ("to him") stands for the object it governs.
fn recipient<'a>(sentence: &'a Sentence, (index, token): (usize, &'a Token)) -> &'a Token {
    if token.coarse_pos != CoarsePos::Adposition {
        return token;
    }
    DependencyTree::build(sentence)
        .children(index)
        .into_iter()
        .find(|(_, role)| *role == DependencyRole::PrepositionalObject)
        .and_then(|(i, _)| sentence.get(i))
        .unwrap_or(token)
}

/// br4: a scene preposition sets two classifiers in relation, any other
/// place is signed first and becomes the direction of the verb.
pub fn locative(sentence: &Sentence) -> Result<Vec<StructuralElement>, GrammarError> {
    const RULE: SentenceRule = SentenceRule::Locative;

    let place = place_phrases(sentence)
        .into_iter()
        .next()
        .ok_or_else(|| missing(RULE, "place phrase"))?;
    let subject = sentence
        .iter()
        .find(|t| t.dependency.is_subject())
        .ok_or_else(|| missing(RULE, "subject"))?;
    let root = sentence.root().ok_or_else(|| missing(RULE, "root verb"))?;
    let location = place.object;

    let preposition = place.preposition.lemma.to_lowercase();
    if SCENE_PREPOSITIONS.contains(&preposition.as_str()) {
        return Ok(vec![
            StructuralElement::literal(location.lemma.clone()),
            StructuralElement::Classifier(ClassifierRef::new(location.clone())),
            StructuralElement::literal(subject.lemma.clone()),
            StructuralElement::Classifier(ClassifierRef::new(subject.clone())),
            StructuralElement::PrepositionPhrase(PrepositionPhrase {
                preposition: place.preposition.clone(),
                subject_classifier: ClassifierRef::new(subject.clone()),
                object_classifier: ClassifierRef::new(location.clone()),
            }),
        ]);
    }

    Ok(vec![
        StructuralElement::literal(location.lemma.clone()),
        StructuralElement::literal(subject.lemma.clone()),
        StructuralElement::VerbPhrase(
            VerbPhrase::new(root.clone())
                .with_subject(Some(subject.clone()))
                .with_direction(Some(location.clone())),
        ),
    ])
}

/// br13: subject then its complement; the copula is not signed.
pub fn stative(sentence: &Sentence) -> Result<Vec<StructuralElement>, GrammarError> {
    const RULE: SentenceRule = SentenceRule::Stative;

    let subject = sentence
        .iter()
        .find(|t| t.dependency.is_subject())
        .ok_or_else(|| missing(RULE, "subject"))?;
    let complement = sentence
        .iter()
        .find(|t| {
            matches!(
                t.dependency,
                DependencyRole::AdjectivalComplement | DependencyRole::Attribute
            )
        })
        .ok_or_else(|| missing(RULE, "complement"))?;

    let chunks = retrieve_noun_phrases(sentence);
    Ok(vec![
        StructuralElement::NounPhrase(noun_phrase(&chunks, subject)),
        StructuralElement::literal(complement.lemma.clone()),
    ])
}
