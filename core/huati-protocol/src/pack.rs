//! Compiled corpus format.
//!
//! Trees are flattened to a preorder node table so the archive needs no
//! recursive types. Node 0 of each table is the root.

use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;

use rkyv::{AlignedVec, Archive, Deserialize, Serialize};
use thiserror::Error;

use crate::ids::{NodeId, SentenceId};
use crate::model::{Corpus, GrammarNode, Sentence, TextTriple};
use crate::role::GrammarRole;

pub const PACK_VERSION: u32 = 1;

#[derive(Debug, Clone, Archive, Serialize, Deserialize)]
#[archive(check_bytes)]
pub struct PackedNode {
    pub id: NodeId,
    pub role: GrammarRole,
    pub sub_role: Option<String>,
    pub text: Option<TextTriple>,
    pub is_dropped: bool,
    pub implied_text: Option<String>,
    pub refers_to_id: Option<NodeId>,
    pub children: Vec<u32>,
}

#[derive(Debug, Clone, Archive, Serialize, Deserialize)]
#[archive(check_bytes)]
pub struct PackedSentence {
    pub id: SentenceId,
    pub hanzi: String,
    pub pinyin: String,
    pub translation: String,
    pub nodes: Vec<PackedNode>,
}

#[derive(Debug, Clone, Archive, Serialize, Deserialize)]
#[archive(check_bytes)]
pub struct CorpusPack {
    /// Layout of the pack itself; see [`PACK_VERSION`].
    pub format: u32,
    /// Version of the authored corpus.
    pub version: u32,
    pub sentences: Vec<PackedSentence>,
}

#[derive(Debug, Error)]
pub enum PackError {
    #[error("corpus pack failed validation: {0}")]
    Validation(String),
    #[error("corpus pack could not be serialized: {0}")]
    Serialize(String),
    #[error("unsupported corpus pack format {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("sentence '{0}' has an empty node table")]
    EmptySentence(SentenceId),
}

impl CorpusPack {
    pub fn from_corpus(corpus: &Corpus) -> Self {
        Self {
            format: PACK_VERSION,
            version: corpus.version,
            sentences: corpus.sentences.iter().map(PackedSentence::from_sentence).collect(),
        }
    }

    pub fn to_bytes(&self) -> Result<AlignedVec, PackError> {
        rkyv::to_bytes::<_, 1024>(self).map_err(|e| PackError::Serialize(e.to_string()))
    }

    /// Validates and deserializes a pack. The input is copied into an aligned
    /// buffer first, since fetched bytes carry no alignment guarantee.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PackError> {
        let mut aligned = AlignedVec::with_capacity(bytes.len());
        aligned.extend_from_slice(bytes);

        let archived = rkyv::check_archived_root::<CorpusPack>(&aligned)
            .map_err(|e| PackError::Validation(e.to_string()))?;

        if archived.format != PACK_VERSION {
            return Err(PackError::UnsupportedVersion {
                found: archived.format,
                expected: PACK_VERSION,
            });
        }

        match archived.deserialize(&mut rkyv::Infallible) {
            Ok(pack) => Ok(pack),
            Err(never) => match never {},
        }
    }

    pub fn into_corpus(self) -> Result<Corpus, PackError> {
        let sentences = self
            .sentences
            .into_iter()
            .map(PackedSentence::into_sentence)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Corpus {
            version: self.version,
            sentences,
        })
    }
}

impl PackedSentence {
    pub fn from_sentence(sentence: &Sentence) -> Self {
        let mut nodes: Vec<PackedNode> = Vec::new();
        let mut stack: Vec<(&GrammarNode, Option<usize>)> = vec![(&sentence.tree, None)];

        // Siblings surface in preorder in their authored order, so appending
        // to the parent's child list as we go preserves reading order.
        while let Some((node, parent)) = stack.pop() {
            let idx = nodes.len();
            nodes.push(PackedNode {
                id: node.id.clone(),
                role: node.role,
                sub_role: node.sub_role.clone(),
                text: node.text.clone(),
                is_dropped: node.is_dropped,
                implied_text: node.implied_text.clone(),
                refers_to_id: node.refers_to_id.clone(),
                children: Vec::new(),
            });
            if let Some(parent) = parent {
                nodes[parent].children.push(idx as u32);
            }
            stack.extend(node.children.iter().rev().map(|child| (child, Some(idx))));
        }

        Self {
            id: sentence.id.clone(),
            hanzi: sentence.hanzi.clone(),
            pinyin: sentence.pinyin.clone(),
            translation: sentence.translation.clone(),
            nodes,
        }
    }

    /// Rebuilds the owned tree. Out-of-range or repeated child indices are
    /// skipped, so a corrupt table still yields a finite tree.
    pub fn into_sentence(self) -> Result<Sentence, PackError> {
        if self.nodes.is_empty() {
            return Err(PackError::EmptySentence(self.id));
        }

        let count = self.nodes.len();
        let mut visited = vec![false; count];
        let mut kept: Vec<Vec<usize>> = vec![Vec::new(); count];
        let mut order = Vec::with_capacity(count);

        visited[0] = true;
        let mut stack = vec![0usize];
        while let Some(idx) = stack.pop() {
            order.push(idx);
            for &child in &self.nodes[idx].children {
                let child = child as usize;
                if child < count && !visited[child] {
                    visited[child] = true;
                    kept[idx].push(child);
                }
            }
            stack.extend(kept[idx].iter().rev().copied());
        }

        let mut slots: Vec<Option<GrammarNode>> = vec![None; count];
        let mut packed: Vec<Option<PackedNode>> = self.nodes.into_iter().map(Some).collect();

        // Children follow their parent in preorder, so a reverse sweep always
        // finds them already built.
        for &idx in order.iter().rev() {
            let Some(node) = packed[idx].take() else { continue };
            let children = kept[idx].iter().filter_map(|&c| slots[c].take()).collect();
            slots[idx] = Some(GrammarNode {
                id: node.id,
                role: node.role,
                sub_role: node.sub_role,
                text: node.text,
                children,
                is_dropped: node.is_dropped,
                implied_text: node.implied_text,
                refers_to_id: node.refers_to_id,
            });
        }

        let tree = slots[0].take().ok_or_else(|| PackError::EmptySentence(self.id.clone()))?;
        Ok(Sentence {
            id: self.id,
            hanzi: self.hanzi,
            pinyin: self.pinyin,
            translation: self.translation,
            tree,
        })
    }
}
