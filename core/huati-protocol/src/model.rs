use alloc::string::String;
use alloc::vec::Vec;

use rkyv::{Archive, Deserialize, Serialize};

use crate::ids::{NodeId, SentenceId};
use crate::role::GrammarRole;

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// Surface form of a constituent: characters, romanization, gloss.
#[derive(Debug, Clone, Default, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct TextTriple {
    pub hanzi: String,
    pub pinyin: String,
    pub translation: String,
}

impl TextTriple {
    pub fn new(hanzi: impl Into<String>, pinyin: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            hanzi: hanzi.into(),
            pinyin: pinyin.into(),
            translation: translation.into(),
        }
    }
}

/// One syntactic constituent of a pre-authored parse tree.
///
/// Trees are immutable once loaded; the viewer only ever filters them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct GrammarNode {
    pub id: NodeId,
    pub role: GrammarRole,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub sub_role: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub text: Option<TextTriple>,
    /// Reading order, left to right.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub children: Vec<GrammarNode>,
    /// Ghost node: a position with no overt realization (pro-drop).
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "core::ops::Not::not"))]
    pub is_dropped: bool,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub implied_text: Option<String>,
    /// Antecedent within the same tree. Absent for discourse-external referents.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub refers_to_id: Option<NodeId>,
}

impl GrammarNode {
    pub fn new(id: impl Into<NodeId>, role: GrammarRole) -> Self {
        Self {
            id: id.into(),
            role,
            sub_role: None,
            text: None,
            children: Vec::new(),
            is_dropped: false,
            implied_text: None,
            refers_to_id: None,
        }
    }

    pub fn leaf(id: impl Into<NodeId>, role: GrammarRole, text: TextTriple) -> Self {
        Self {
            text: Some(text),
            ..Self::new(id, role)
        }
    }

    /// A pro-dropped position. `refers_to` is the in-tree antecedent, if any.
    pub fn ghost(id: impl Into<NodeId>, role: GrammarRole, implied: Option<&str>, refers_to: Option<&str>) -> Self {
        Self {
            is_dropped: true,
            implied_text: implied.map(String::from),
            refers_to_id: refers_to.map(NodeId::from),
            ..Self::new(id, role)
        }
    }

    pub fn with_sub_role(mut self, sub_role: impl Into<String>) -> Self {
        self.sub_role = Some(sub_role.into());
        self
    }

    pub fn with_children(mut self, children: Vec<GrammarNode>) -> Self {
        self.children = children;
        self
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Implied pronoun as displayed, e.g. `（他）`.
    pub fn bracketed_implied_text(&self) -> Option<String> {
        let implied = self.implied_text.as_deref().filter(|s| !s.is_empty())?;
        let mut out = String::with_capacity(implied.len() + 6);
        out.push('（');
        out.push_str(implied);
        out.push('）');
        Some(out)
    }

    /// Preorder search by id. Iterative so deep trees cannot exhaust the stack.
    pub fn find(&self, id: &str) -> Option<&GrammarNode> {
        let mut stack = alloc::vec![self];
        while let Some(node) = stack.pop() {
            if node.id.as_str() == id {
                return Some(node);
            }
            stack.extend(node.children.iter().rev());
        }
        None
    }

    /// Preorder iterator over the whole subtree, ghosts included.
    pub fn iter(&self) -> Preorder<'_> {
        Preorder { stack: alloc::vec![self] }
    }
}

pub struct Preorder<'a> {
    stack: Vec<&'a GrammarNode>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a GrammarNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// One example sentence and its authored parse tree.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
pub struct Sentence {
    pub id: SentenceId,
    pub hanzi: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub pinyin: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub translation: String,
    pub tree: GrammarNode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
pub struct Corpus {
    pub version: u32,
    pub sentences: Vec<Sentence>,
}

impl Corpus {
    pub fn get(&self, id: &str) -> Option<&Sentence> {
        self.sentences.iter().find(|s| s.id.as_str() == id)
    }
}
