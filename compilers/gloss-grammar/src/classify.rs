use core::fmt;

use gloss_protocol::Sentence;

use crate::predicates::{
    is_ditransitive, is_intransitive, is_locative, is_phrase, is_single_word, is_stative,
    is_transitive,
};

/// The reordering rule a sentence falls under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SentenceRule {
    SingleWord,
    Phrase,
    Locative,
    Stative,
    Transitive,
    Intransitive,
    Ditransitive,
    Unsupported,
}

impl SentenceRule {
    /// Short rule identifier used in logs and error messages.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::SingleWord | Self::Phrase => "br0",
            Self::Transitive => "br1",
            Self::Intransitive => "br2",
            Self::Ditransitive => "br3",
            Self::Locative => "br4",
            Self::Stative => "br13",
            Self::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for SentenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Picks the first rule whose predicate holds. Order matters: a locative
/// sentence with a direct object is still locative.
pub fn classify(sentence: &Sentence) -> SentenceRule {
    let checks: [(SentenceRule, fn(&Sentence) -> bool); 7] = [
        (SentenceRule::SingleWord, is_single_word),
        (SentenceRule::Phrase, is_phrase),
        (SentenceRule::Locative, is_locative),
        (SentenceRule::Stative, is_stative),
        (SentenceRule::Transitive, is_transitive),
        (SentenceRule::Intransitive, is_intransitive),
        (SentenceRule::Ditransitive, is_ditransitive),
    ];

    checks
        .iter()
        .find(|(_, check)| check(sentence))
        .map_or(SentenceRule::Unsupported, |(rule, _)| *rule)
}
