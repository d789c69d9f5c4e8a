//! Static lookup tables for tooltips, the legend, and decorative badges.
//! Consumed by the rendering layer only.

use alloc::vec::Vec;

use crate::role::GrammarRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlossaryEntry {
    pub headline: &'static str,
    pub detail: &'static str,
}

pub fn glossary(role: GrammarRole) -> GlossaryEntry {
    let (headline, detail) = match role {
        GrammarRole::Sentence => ("The whole utterance", "Root of the analysis; everything else hangs from it."),
        GrammarRole::Clause => ("A clause", "A subject-predicate unit embedded in a larger sentence."),
        GrammarRole::Topic => ("What the sentence is about", "Mandarin is topic-prominent: the topic sets the frame and need not be the grammatical subject."),
        GrammarRole::Comment => ("What is said about the topic", "The remainder of the sentence; may contain its own subject."),
        GrammarRole::Subject => ("Who or what does the action", "Frequently omitted when recoverable from context (pro-drop)."),
        GrammarRole::Predicate => ("The assertion", "The verbal or adjectival core of a clause."),
        GrammarRole::VerbPhrase => ("Verb and its dependents", "A head verb with objects, complements and modifiers."),
        GrammarRole::NounPhrase => ("Noun and its modifiers", "Modifiers precede the head noun in Mandarin."),
        GrammarRole::Object => ("Receiver of the action", "Usually follows the verb; may be fronted by 把 or topicalized."),
        GrammarRole::IndirectObject => ("Recipient", "The second object of verbs like 给 or 送."),
        GrammarRole::Attributive => ("Noun modifier", "Precedes the head, often linked by 的."),
        GrammarRole::Adverbial => ("Verb modifier", "Time, place, manner; precedes the verb, often linked by 地."),
        GrammarRole::Complement => ("After-verb result or degree", "Resultative, directional, potential and degree complements follow the verb."),
        GrammarRole::HeadNoun => ("Head noun", "The noun a noun phrase is built around."),
        GrammarRole::HeadVerb => ("Head verb", "The verb a verb phrase is built around."),
        GrammarRole::MeasureWord => ("Classifier", "Required between a number or demonstrative and a noun."),
        GrammarRole::Determiner => ("Demonstrative", "这 / 那 and similar pointing words."),
        GrammarRole::Numeral => ("Number", "Combines with a measure word before the noun."),
        GrammarRole::VerbMorpheme => ("Verb part of a separable verb", "The V in a V-O compound such as 睡觉."),
        GrammarRole::ObjectMorpheme => ("Object part of a separable verb", "The O in a V-O compound; other material can intervene."),
        GrammarRole::Pivot => ("Pivot", "Object of the first verb and subject of the second in a pivotal construction."),
        GrammarRole::Copula => ("Linking verb", "是 links a subject to a nominal predicate."),
        GrammarRole::Coverb => ("Coverb", "Preposition-like verb introducing an argument (在, 给, 把)."),
        GrammarRole::AspectMarker => ("Aspect marker", "了, 过, 着 mark completion, experience, or continuation."),
        GrammarRole::Particle => ("Particle", "Sentence-final or structural particles such as 吗, 呢, 的."),
        GrammarRole::Punctuation => ("Punctuation", "Sentence delimiter."),
    };
    GlossaryEntry { headline, detail }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub label: &'static str,
    pub tone: &'static str,
}

/// Sub-role keywords are matched case-insensitively as substrings.
const SUB_ROLE_BADGES: &[(&str, Badge)] = &[
    ("resultative", Badge { label: "result", tone: "amber" }),
    ("directional", Badge { label: "direction", tone: "amber" }),
    ("potential", Badge { label: "potential", tone: "amber" }),
    ("degree", Badge { label: "degree", tone: "amber" }),
    ("bǎ", Badge { label: "把", tone: "rose" }),
    ("ba-construction", Badge { label: "把", tone: "rose" }),
    ("bèi", Badge { label: "被", tone: "rose" }),
    ("passive", Badge { label: "被", tone: "rose" }),
    ("separable", Badge { label: "V-O", tone: "violet" }),
    ("pivotal", Badge { label: "pivot", tone: "violet" }),
    ("serial", Badge { label: "serial", tone: "violet" }),
    ("anaphoric", Badge { label: "anaphora", tone: "slate" }),
    ("discourse", Badge { label: "discourse", tone: "slate" }),
];

pub fn badges(role: GrammarRole, sub_role: Option<&str>) -> Vec<Badge> {
    let mut out = Vec::new();
    if role == GrammarRole::Topic {
        out.push(Badge { label: "topic", tone: "sky" });
    }
    if let Some(sub_role) = sub_role {
        let lowered = sub_role.to_lowercase();
        for (keyword, badge) in SUB_ROLE_BADGES {
            if lowered.contains(keyword) && !out.contains(badge) {
                out.push(*badge);
            }
        }
    }
    out
}
