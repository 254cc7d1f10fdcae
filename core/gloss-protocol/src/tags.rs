//! Closed tag sets produced by the annotation boundary.
//!
//! Annotators speak in strings (`"nsubj"`, `"VBG"`, `"DATE"`). These enums are
//! the only place those strings are known; rule code matches on variants.

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

macro_rules! define_tags {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $tag:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
        pub enum $name {
            $($variant,)+
            /// A tag the annotator emitted that the engine does not model.
            Other,
        }

        impl $name {
            /// Maps an annotator tag string. Unknown tags become `Other`.
            pub fn from_tag(tag: &str) -> Self {
                match tag {
                    $($tag => Self::$variant,)+
                    _ => Self::Other,
                }
            }

            pub const fn as_tag(&self) -> &'static str {
                match self {
                    $(Self::$variant => $tag,)+
                    Self::Other => "_",
                }
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(self.as_tag())
            }
        }
    };
}

define_tags!(
    /// Universal POS tags (coarse grained).
    CoarsePos {
        Adjective => "ADJ",
        Adposition => "ADP",
        Adverb => "ADV",
        Auxiliary => "AUX",
        CoordinatingConjunction => "CCONJ",
        Determiner => "DET",
        Interjection => "INTJ",
        Noun => "NOUN",
        Numeral => "NUM",
        Particle => "PART",
        Pronoun => "PRON",
        ProperNoun => "PROPN",
        Punctuation => "PUNCT",
        SubordinatingConjunction => "SCONJ",
        Symbol => "SYM",
        Verb => "VERB",
        Unclassified => "X",
    }
);

define_tags!(
    /// Penn Treebank / OntoNotes tags (fine grained).
    FinePos {
        CoordinatingConjunction => "CC",
        CardinalNumber => "CD",
        Determiner => "DT",
        ExistentialThere => "EX",
        ForeignWord => "FW",
        PrepositionOrSubordinator => "IN",
        Adjective => "JJ",
        ComparativeAdjective => "JJR",
        SuperlativeAdjective => "JJS",
        ListItem => "LS",
        Modal => "MD",
        SingularNoun => "NN",
        PluralNoun => "NNS",
        SingularProperNoun => "NNP",
        PluralProperNoun => "NNPS",
        Predeterminer => "PDT",
        PossessiveEnding => "POS",
        PersonalPronoun => "PRP",
        PossessivePronoun => "PRP$",
        Adverb => "RB",
        ComparativeAdverb => "RBR",
        SuperlativeAdverb => "RBS",
        Particle => "RP",
        Symbol => "SYM",
        To => "TO",
        Interjection => "UH",
        VerbBase => "VB",
        VerbPast => "VBD",
        VerbPresentParticiple => "VBG",
        VerbPastParticiple => "VBN",
        VerbNon3rdPersonPresent => "VBP",
        Verb3rdPersonPresent => "VBZ",
        WhDeterminer => "WDT",
        WhPronoun => "WP",
        PossessiveWhPronoun => "WP$",
        WhAdverb => "WRB",
    }
);

define_tags!(
    /// ClearNLP dependency labels, including the deprecated ones some models still emit.
    DependencyRole {
        AdjectivalClause => "acl",
        AdjectivalComplement => "acomp",
        AdverbialClause => "advcl",
        AdverbialModifier => "advmod",
        Agent => "agent",
        AdjectivalModifier => "amod",
        Appositional => "appos",
        Attribute => "attr",
        Auxiliary => "aux",
        AuxiliaryPassive => "auxpass",
        CaseMarking => "case",
        CoordinatingConjunction => "cc",
        ClausalComplement => "ccomp",
        Classifier => "clf",
        Compound => "compound",
        Conjunct => "conj",
        Copula => "cop",
        ClausalSubject => "csubj",
        ClausalSubjectPassive => "csubjpass",
        Dative => "dative",
        Unclassified => "dep",
        Determiner => "det",
        DirectObject => "dobj",
        Expletive => "expl",
        Interjection => "intj",
        Marker => "mark",
        Meta => "meta",
        Negation => "neg",
        NominalSubject => "nsubj",
        NominalSubjectPassive => "nsubjpass",
        NominalModifier => "nmod",
        NounPhraseAdverbial => "npadvmod",
        NumericModifier => "nummod",
        ObjectPredicate => "oprd",
        Object => "obj",
        Oblique => "obl",
        Parataxis => "parataxis",
        PrepositionalComplement => "pcomp",
        PrepositionalObject => "pobj",
        Possession => "poss",
        PreCorrelative => "preconj",
        Predeterminer => "predet",
        Preposition => "prep",
        Particle => "prt",
        Punctuation => "punct",
        QuantifierModifier => "quantmod",
        RelativeClause => "relcl",
        Root => "ROOT",
        Vocative => "vocative",
        OpenClausalComplement => "xcomp",
        IndirectObject => "iobj",
    }
);

define_tags!(
    /// OntoNotes named-entity labels.
    EntityLabel {
        Person => "PERSON",
        Nationality => "NORP",
        Facility => "FAC",
        Organization => "ORG",
        GeopoliticalEntity => "GPE",
        Location => "LOC",
        Product => "PRODUCT",
        Event => "EVENT",
        WorkOfArt => "WORK_OF_ART",
        Law => "LAW",
        Language => "LANGUAGE",
        Date => "DATE",
        Time => "TIME",
        Percent => "PERCENT",
        Money => "MONEY",
        Quantity => "QUANTITY",
        Ordinal => "ORDINAL",
        Cardinal => "CARDINAL",
    }
);

impl FinePos {
    pub fn is_plural_noun(&self) -> bool {
        matches!(self, Self::PluralNoun | Self::PluralProperNoun)
    }
}

impl DependencyRole {
    /// Dative or (older label sets) indirect object.
    pub fn is_indirect_object(&self) -> bool {
        matches!(self, Self::Dative | Self::IndirectObject)
    }

    pub fn is_subject(&self) -> bool {
        matches!(self, Self::NominalSubject | Self::NominalSubjectPassive)
    }
}

impl EntityLabel {
    pub fn is_temporal(&self) -> bool {
        matches!(self, Self::Date | Self::Time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tags_round_trip_through_strings() {
        assert_eq!(DependencyRole::from_tag("nsubj"), DependencyRole::NominalSubject);
        assert_eq!(DependencyRole::NominalSubject.as_tag(), "nsubj");
        assert_eq!(FinePos::from_tag("PRP$"), FinePos::PossessivePronoun);
        assert_eq!(CoarsePos::from_tag("SCONJ"), CoarsePos::SubordinatingConjunction);
        assert_eq!(EntityLabel::from_tag("CARDINAL"), EntityLabel::Cardinal);
    }

    #[test]
    fn test_unknown_tags_fall_back_to_other() {
        assert_eq!(DependencyRole::from_tag("reparandum"), DependencyRole::Other);
        assert_eq!(FinePos::from_tag("HYPH"), FinePos::Other);
        assert_eq!(DependencyRole::Other.to_string(), "_");
    }

    #[test]
    fn test_tag_helpers() {
        assert!(FinePos::PluralNoun.is_plural_noun());
        assert!(!FinePos::SingularNoun.is_plural_noun());
        assert!(DependencyRole::IndirectObject.is_indirect_object());
        assert!(EntityLabel::Time.is_temporal());
        assert!(!EntityLabel::Person.is_temporal());
    }
}
