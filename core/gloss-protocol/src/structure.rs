use core::fmt;

use crate::token::Token;

/// Request for the classifier gloss of a noun's referent.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierRef {
    pub root: Token,
}

impl ClassifierRef {
    pub fn new(root: Token) -> Self {
        Self { root }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NounPhrase {
    pub head: Token,
    pub modifiers: Vec<Token>,
}

impl NounPhrase {
    pub fn new(head: Token) -> Self {
        Self { head, modifiers: Vec::new() }
    }

    pub fn with_modifiers(mut self, modifiers: Vec<Token>) -> Self {
        self.modifiers.extend(modifiers);
        self
    }
}

/// A verb together with the tokens that decide which of its glosses applies.
#[derive(Debug, Clone, PartialEq)]
pub struct VerbPhrase {
    pub verb: Token,
    pub subject: Option<Token>,
    pub direct_object: Option<Token>,
    pub indirect_object: Option<Token>,
    /// Idiomatic verb+object text looked up as a unit before the bare verb.
    pub direct_object_phrase: Option<String>,
    /// Where the action goes or happens (the location of a flat locative).
    pub direction: Option<Token>,
}

impl VerbPhrase {
    pub fn new(verb: Token) -> Self {
        Self {
            verb,
            subject: None,
            direct_object: None,
            indirect_object: None,
            direct_object_phrase: None,
            direction: None,
        }
    }

    pub fn with_subject(mut self, subject: Option<Token>) -> Self {
        self.subject = subject;
        self
    }

    pub fn with_direct_object(mut self, direct_object: Option<Token>) -> Self {
        self.direct_object = direct_object;
        self
    }

    pub fn with_indirect_object(mut self, indirect_object: Option<Token>) -> Self {
        self.indirect_object = indirect_object;
        self
    }

    pub fn with_direct_object_phrase(mut self, phrase: impl Into<String>) -> Self {
        self.direct_object_phrase = Some(phrase.into());
        self
    }

    pub fn with_direction(mut self, direction: Option<Token>) -> Self {
        self.direction = direction;
        self
    }

    /// Related tokens in lookup order: subject, direct object, indirect object, direction.
    pub fn related(&self) -> impl Iterator<Item = (Relation, &Token)> {
        [
            (Relation::Subject, self.subject.as_ref()),
            (Relation::DirectObject, self.direct_object.as_ref()),
            (Relation::IndirectObject, self.indirect_object.as_ref()),
            (Relation::Direction, self.direction.as_ref()),
        ]
        .into_iter()
        .filter_map(|(relation, token)| token.map(|t| (relation, t)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Subject,
    DirectObject,
    IndirectObject,
    Direction,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrepositionPhrase {
    pub preposition: Token,
    pub subject_classifier: ClassifierRef,
    pub object_classifier: ClassifierRef,
}

/// One unit of a reordered sentence, waiting to be resolved to glosses.
#[derive(Debug, Clone, PartialEq)]
pub enum StructuralElement {
    Literal(String),
    NounPhrase(NounPhrase),
    VerbPhrase(VerbPhrase),
    PrepositionPhrase(PrepositionPhrase),
    Classifier(ClassifierRef),
    /// Emitted as is, never looked up.
    Marker(String),
}

impl StructuralElement {
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    /// The dictionary key this element stands for when it names a single
    /// referent. Used to spot the antecedent duplicated by a relative clause.
    pub fn lexical_key(&self) -> Option<&str> {
        match self {
            Self::Literal(text) => Some(text),
            Self::NounPhrase(np) => Some(&np.head.lemma),
            Self::Classifier(_)
            | Self::VerbPhrase(_)
            | Self::PrepositionPhrase(_)
            | Self::Marker(_) => None,
        }
    }
}

impl fmt::Display for ClassifierRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}CL", self.root.lemma)
    }
}

impl fmt::Display for PrepositionPhrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}",
            self.subject_classifier, self.preposition.lemma, self.object_classifier
        )
    }
}

impl fmt::Display for StructuralElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) => f.write_str(text),
            Self::Marker(text) => write!(f, "<{}>", text),
            Self::Classifier(cl) => write!(f, "{}", cl),
            Self::PrepositionPhrase(pp) => write!(f, "{}", pp),
            Self::NounPhrase(np) => {
                f.write_str(&np.head.lemma)?;
                if !np.modifiers.is_empty() {
                    let mods: Vec<&str> = np.modifiers.iter().map(|m| m.lemma.as_str()).collect();
                    write!(f, "({})", mods.join(","))?;
                }
                Ok(())
            }
            Self::VerbPhrase(vp) => {
                let related: Vec<&str> = vp.related().map(|(_, t)| t.lemma.as_str()).collect();
                write!(f, "{}[{}]", vp.verb.lemma, related.join(","))
            }
        }
    }
}
