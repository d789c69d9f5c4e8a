use rkyv::{Archive, Deserialize, Serialize};

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

use bitflags::bitflags;

/// Grammatical category of a constituent. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
#[repr(u8)]
pub enum GrammarRole {
    Sentence = 0,
    Clause = 1,
    Topic = 2,
    Comment = 3,
    Subject = 4,
    Predicate = 5,
    #[cfg_attr(feature = "serde", serde(rename = "Verb Phrase"))]
    VerbPhrase = 6,
    #[cfg_attr(feature = "serde", serde(rename = "Noun Phrase"))]
    NounPhrase = 7,
    Object = 8,
    #[cfg_attr(feature = "serde", serde(rename = "Indirect Object"))]
    IndirectObject = 9,
    Attributive = 10,
    Adverbial = 11,
    Complement = 12,
    #[cfg_attr(feature = "serde", serde(rename = "Head Noun"))]
    HeadNoun = 13,
    #[cfg_attr(feature = "serde", serde(rename = "Head Verb"))]
    HeadVerb = 14,
    #[cfg_attr(feature = "serde", serde(rename = "Measure Word"))]
    MeasureWord = 15,
    Determiner = 16,
    Numeral = 17,
    #[cfg_attr(feature = "serde", serde(rename = "Verb Morpheme"))]
    VerbMorpheme = 18,
    #[cfg_attr(feature = "serde", serde(rename = "Object Morpheme"))]
    ObjectMorpheme = 19,
    Pivot = 20,
    Copula = 21,
    Coverb = 22,
    #[cfg_attr(feature = "serde", serde(rename = "Aspect Marker"))]
    AspectMarker = 23,
    Particle = 24,
    Punctuation = 25,
}

impl GrammarRole {
    pub const ALL: [GrammarRole; 26] = [
        GrammarRole::Sentence,
        GrammarRole::Clause,
        GrammarRole::Topic,
        GrammarRole::Comment,
        GrammarRole::Subject,
        GrammarRole::Predicate,
        GrammarRole::VerbPhrase,
        GrammarRole::NounPhrase,
        GrammarRole::Object,
        GrammarRole::IndirectObject,
        GrammarRole::Attributive,
        GrammarRole::Adverbial,
        GrammarRole::Complement,
        GrammarRole::HeadNoun,
        GrammarRole::HeadVerb,
        GrammarRole::MeasureWord,
        GrammarRole::Determiner,
        GrammarRole::Numeral,
        GrammarRole::VerbMorpheme,
        GrammarRole::ObjectMorpheme,
        GrammarRole::Pivot,
        GrammarRole::Copula,
        GrammarRole::Coverb,
        GrammarRole::AspectMarker,
        GrammarRole::Particle,
        GrammarRole::Punctuation,
    ];

    /// Inverse of [`GrammarRole::label`].
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.label() == label)
    }

    /// Heading shown on a node box. Matches the JSON spelling.
    pub const fn label(self) -> &'static str {
        match self {
            GrammarRole::Sentence => "Sentence",
            GrammarRole::Clause => "Clause",
            GrammarRole::Topic => "Topic",
            GrammarRole::Comment => "Comment",
            GrammarRole::Subject => "Subject",
            GrammarRole::Predicate => "Predicate",
            GrammarRole::VerbPhrase => "Verb Phrase",
            GrammarRole::NounPhrase => "Noun Phrase",
            GrammarRole::Object => "Object",
            GrammarRole::IndirectObject => "Indirect Object",
            GrammarRole::Attributive => "Attributive",
            GrammarRole::Adverbial => "Adverbial",
            GrammarRole::Complement => "Complement",
            GrammarRole::HeadNoun => "Head Noun",
            GrammarRole::HeadVerb => "Head Verb",
            GrammarRole::MeasureWord => "Measure Word",
            GrammarRole::Determiner => "Determiner",
            GrammarRole::Numeral => "Numeral",
            GrammarRole::VerbMorpheme => "Verb Morpheme",
            GrammarRole::ObjectMorpheme => "Object Morpheme",
            GrammarRole::Pivot => "Pivot",
            GrammarRole::Copula => "Copula",
            GrammarRole::Coverb => "Coverb",
            GrammarRole::AspectMarker => "Aspect Marker",
            GrammarRole::Particle => "Particle",
            GrammarRole::Punctuation => "Punctuation",
        }
    }

    pub const fn tier(self) -> RoleTier {
        match self {
            GrammarRole::Sentence => RoleTier::Root,
            GrammarRole::Topic
            | GrammarRole::Comment
            | GrammarRole::Subject
            | GrammarRole::Predicate => RoleTier::Frame,
            _ => RoleTier::Other,
        }
    }
}

/// Coarse grouping of roles that drives structural edge color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(SerdeSerialize))]
pub enum RoleTier {
    Root,
    Frame,
    Other,
}

impl RoleTier {
    /// Stroke color for edges leaving a parent of this tier.
    pub const fn stroke(self) -> &'static str {
        match self {
            RoleTier::Root => "#7c3aed",
            RoleTier::Frame => "#0ea5e9",
            RoleTier::Other => "#94a3b8",
        }
    }
}

bitflags! {
    /// Boolean part of a laid-out node's display snapshot.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
    pub struct NodeFlags: u8 {
        const IS_ROOT = 1;
        const HAS_CHILDREN = 2;
        const IS_EXPANDED = 4;
        const IS_DROPPED = 8;
    }
}
