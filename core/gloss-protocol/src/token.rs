use crate::tags::{CoarsePos, DependencyRole, EntityLabel, FinePos};

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// One annotated word. Produced once at the annotation boundary and never mutated.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
pub struct Token {
    /// 0-based position inside the annotated sentence (punctuation excluded).
    pub position: usize,
    pub text: String,
    pub lemma: String,
    pub coarse_pos: CoarsePos,
    pub fine_pos: FinePos,
    pub dependency: DependencyRole,
    /// Position of the syntactic governor. The root points at itself.
    pub head: usize,
    pub entity: Option<EntityLabel>,
}

impl Token {
    pub fn new(position: usize, text: impl Into<String>, lemma: impl Into<String>) -> Self {
        Self {
            position,
            text: text.into(),
            lemma: lemma.into(),
            coarse_pos: CoarsePos::Other,
            fine_pos: FinePos::Other,
            dependency: DependencyRole::Other,
            head: position,
            entity: None,
        }
    }

    pub fn with_pos(mut self, coarse_pos: CoarsePos, fine_pos: FinePos) -> Self {
        self.coarse_pos = coarse_pos;
        self.fine_pos = fine_pos;
        self
    }

    pub fn with_dependency(mut self, dependency: DependencyRole, head: usize) -> Self {
        self.dependency = dependency;
        self.head = head;
        self
    }

    pub fn with_entity(mut self, entity: Option<EntityLabel>) -> Self {
        self.entity = entity;
        self
    }

    pub fn is_pronoun(&self) -> bool {
        self.coarse_pos == CoarsePos::Pronoun
            || matches!(self.fine_pos, FinePos::PersonalPronoun | FinePos::PossessivePronoun)
    }

    pub fn is_determiner(&self) -> bool {
        self.coarse_pos == CoarsePos::Determiner || self.dependency == DependencyRole::Determiner
    }

    /// Lexical verbs and auxiliaries/copulas alike.
    pub fn is_verb(&self) -> bool {
        matches!(self.coarse_pos, CoarsePos::Verb | CoarsePos::Auxiliary)
    }

    pub fn is_nominal(&self) -> bool {
        matches!(
            self.coarse_pos,
            CoarsePos::Noun | CoarsePos::ProperNoun | CoarsePos::Pronoun
        )
    }

    pub fn is_plural(&self) -> bool {
        self.fine_pos.is_plural_noun()
    }

    /// A copy of this token that reads as `antecedent` (surface form, lemma, POS and
    /// entity) while keeping this token's place in the dependency tree.
    pub fn standing_in_for(&self, antecedent: &Token) -> Token {
        Token {
            position: self.position,
            text: antecedent.text.clone(),
            lemma: antecedent.lemma.clone(),
            coarse_pos: antecedent.coarse_pos,
            fine_pos: antecedent.fine_pos,
            dependency: self.dependency,
            head: self.head,
            entity: antecedent.entity,
        }
    }
}

/// Ordered, punctuation-free tokens of one sentence.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
pub struct Sentence {
    tokens: Vec<Token>,
}

pub type Paragraph = Vec<Sentence>;

impl Sentence {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Slice index of the token sitting at annotation `position`.
    pub fn index_of(&self, position: usize) -> Option<usize> {
        self.tokens.iter().position(|t| t.position == position)
    }

    /// Index of the dependency root: a token governed by itself or by a token
    /// outside this sentence. An explicit `ROOT` label wins when several qualify,
    /// which happens once a clause has been cut out of a sentence.
    pub fn root_index(&self) -> Option<usize> {
        let mut fallback = None;
        for (i, token) in self.tokens.iter().enumerate() {
            let governed_outside = token.head == token.position || self.index_of(token.head).is_none();
            if !governed_outside {
                continue;
            }
            if token.dependency == DependencyRole::Root {
                return Some(i);
            }
            fallback.get_or_insert(i);
        }
        fallback
    }

    pub fn root(&self) -> Option<&Token> {
        self.root_index().and_then(|i| self.tokens.get(i))
    }

    pub fn lemmas(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|t| t.lemma.as_str())
    }

    /// Tokens in `start..end` as a sentence of their own.
    pub fn span(&self, start: usize, end: usize) -> Sentence {
        let end = end.min(self.tokens.len());
        let start = start.min(end);
        Sentence::new(self.tokens[start..end].to_vec())
    }

    /// This sentence with `start..end` removed.
    pub fn without_span(&self, start: usize, end: usize) -> Sentence {
        let end = end.min(self.tokens.len());
        let start = start.min(end);
        let mut tokens = self.tokens[..start].to_vec();
        tokens.extend_from_slice(&self.tokens[end..]);
        Sentence::new(tokens)
    }

    /// This sentence with the token at `index` swapped for `token`.
    pub fn with_token_replaced(&self, index: usize, token: Token) -> Sentence {
        let mut tokens = self.tokens.clone();
        if let Some(slot) = tokens.get_mut(index) {
            *slot = token;
        }
        Sentence::new(tokens)
    }
}

impl FromIterator<Token> for Sentence {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Sentence {
    type Item = &'a Token;
    type IntoIter = core::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // "I like the dog that bit me"
    fn relative_clause_sentence() -> Sentence {
        use CoarsePos as C;
        use DependencyRole as D;
        use FinePos as F;
        Sentence::new(vec![
            Token::new(0, "I", "I").with_pos(C::Pronoun, F::PersonalPronoun).with_dependency(D::NominalSubject, 1),
            Token::new(1, "like", "like").with_pos(C::Verb, F::VerbNon3rdPersonPresent).with_dependency(D::Root, 1),
            Token::new(2, "the", "the").with_pos(C::Determiner, F::Determiner).with_dependency(D::Determiner, 3),
            Token::new(3, "dog", "dog").with_pos(C::Noun, F::SingularNoun).with_dependency(D::DirectObject, 1),
            Token::new(4, "that", "that").with_pos(C::Pronoun, F::WhDeterminer).with_dependency(D::NominalSubject, 5),
            Token::new(5, "bit", "bite").with_pos(C::Verb, F::VerbPast).with_dependency(D::RelativeClause, 3),
            Token::new(6, "me", "I").with_pos(C::Pronoun, F::PersonalPronoun).with_dependency(D::DirectObject, 5),
        ])
    }

    #[test]
    fn test_root_prefers_explicit_label() {
        let sentence = relative_clause_sentence();
        assert_eq!(sentence.root().map(|t| t.lemma.as_str()), Some("like"));
    }

    #[test]
    fn test_clause_span_has_its_own_root() {
        let clause = relative_clause_sentence().span(4, 7);
        assert_eq!(clause.len(), 3);
        // "bit" hangs off "dog", which is outside the span.
        assert_eq!(clause.root().map(|t| t.lemma.as_str()), Some("bite"));
    }

    #[test]
    fn test_without_span_keeps_outer_tokens() {
        let main = relative_clause_sentence().without_span(4, 7);
        let lemmas: Vec<&str> = main.lemmas().collect();
        assert_eq!(lemmas, vec!["I", "like", "the", "dog"]);
        assert_eq!(main.root_index(), Some(1));
    }

    #[test]
    fn test_standing_in_for_keeps_syntactic_slot() {
        let sentence = relative_clause_sentence();
        let wh = &sentence.tokens()[4];
        let dog = &sentence.tokens()[3];
        let replaced = wh.standing_in_for(dog);
        assert_eq!(replaced.lemma, "dog");
        assert_eq!(replaced.coarse_pos, CoarsePos::Noun);
        assert_eq!(replaced.dependency, DependencyRole::NominalSubject);
        assert_eq!(replaced.position, 4);
        assert_eq!(replaced.head, 5);
    }

    #[test]
    fn test_out_of_range_spans_are_clamped() {
        let sentence = relative_clause_sentence();
        assert!(sentence.span(9, 12).is_empty());
        assert_eq!(sentence.without_span(5, 40).len(), 5);
    }
}
