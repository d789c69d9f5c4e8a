//! Contract checks for authored trees.
//!
//! Layout never calls these; it degrades silently instead. The corpus
//! compiler and the tests use them to catch bad data before it ships.

use std::collections::HashSet;

use huati_protocol::{GrammarNode, NodeId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    #[error("duplicate node id '{0}'")]
    DuplicateId(NodeId),
    #[error("node '{node}' refers to missing antecedent '{antecedent}'")]
    DanglingReference { node: NodeId, antecedent: NodeId },
    #[error("node '{0}' refers to itself")]
    SelfReference(NodeId),
    #[error("node '{0}' carries refersToId but is not dropped")]
    ReferenceOnOvertNode(NodeId),
    #[error("ghost node '{0}' has children")]
    GhostWithChildren(NodeId),
}

pub fn check_tree(tree: &GrammarNode) -> Vec<ContractError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for node in tree.iter() {
        if !seen.insert(node.id.as_str()) {
            errors.push(ContractError::DuplicateId(node.id.clone()));
        }
        if node.is_dropped && node.has_children() {
            errors.push(ContractError::GhostWithChildren(node.id.clone()));
        }
    }

    for node in tree.iter() {
        let Some(antecedent) = &node.refers_to_id else { continue };

        if !node.is_dropped {
            errors.push(ContractError::ReferenceOnOvertNode(node.id.clone()));
        }
        if antecedent == &node.id {
            errors.push(ContractError::SelfReference(node.id.clone()));
        } else if !seen.contains(antecedent.as_str()) {
            errors.push(ContractError::DanglingReference {
                node: node.id.clone(),
                antecedent: antecedent.clone(),
            });
        }
    }

    errors
}
