use std::collections::{BTreeSet, HashMap, HashSet};

use huati_protocol::{GrammarNode, NodeFlags, NodeId, RoleTier, TextTriple};
use huati_text::{aggregate_text, surface_text};
use petgraph::graph::{Graph, NodeIndex};
use petgraph::{Directed, Direction};
use tracing::{trace, warn};

/// Which interior nodes currently show their children.
pub trait ExpansionState {
    fn is_expanded(&self, id: &NodeId) -> bool;
}

impl ExpansionState for BTreeSet<NodeId> {
    fn is_expanded(&self, id: &NodeId) -> bool {
        self.contains(id)
    }
}

impl ExpansionState for HashSet<NodeId> {
    fn is_expanded(&self, id: &NodeId) -> bool {
        self.contains(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeClass {
    /// Parent to child. Carries the parent's tier for coloring.
    Structural(RoleTier),
    /// Antecedent to ghost.
    CoReference,
}

/// A surviving node with its resolved display snapshot.
#[derive(Debug)]
pub struct NodeRecord<'t> {
    pub node: &'t GrammarNode,
    pub flags: NodeFlags,
    pub text: Option<TextTriple>,
    /// Surviving children in reading order.
    pub children: Vec<NodeIndex>,
}

/// The filtered tree for one layout pass: surviving nodes, structural edges,
/// and resolved co-reference edges.
///
/// Node indices follow preorder; structural edges are added in preorder and
/// co-reference edges after all of them.
pub struct Diagram<'t> {
    graph: Graph<NodeRecord<'t>, EdgeClass, Directed>,
    index_map: HashMap<&'t str, NodeIndex>,
    root: NodeIndex,
}

impl<'t> Diagram<'t> {
    /// Returns `None` when nothing survives the ghost filter or no unique
    /// root can be resolved.
    pub fn build(tree: &'t GrammarNode, expansion: &impl ExpansionState, show_ghosts: bool) -> Option<Self> {
        let mut graph: Graph<NodeRecord<'t>, EdgeClass, Directed> = Graph::new();
        let mut index_map: HashMap<&'t str, NodeIndex> = HashMap::new();
        let mut pending_refs: Vec<(&'t NodeId, NodeIndex)> = Vec::new();

        let mut stack: Vec<(&'t GrammarNode, Option<NodeIndex>)> = vec![(tree, None)];
        while let Some((node, parent)) = stack.pop() {
            if node.is_dropped && !show_ghosts {
                trace!(id = %node.id, "ghost pruned");
                continue;
            }
            if index_map.contains_key(node.id.as_str()) {
                warn!(id = %node.id, "duplicate node id, subtree skipped");
                continue;
            }

            let has_children = node.has_children();
            let is_expanded = expansion.is_expanded(&node.id);

            let mut flags = NodeFlags::empty();
            flags.set(NodeFlags::HAS_CHILDREN, has_children);
            flags.set(NodeFlags::IS_EXPANDED, is_expanded);
            flags.set(NodeFlags::IS_DROPPED, node.is_dropped);

            let text = if has_children && !is_expanded {
                aggregate_text(node)
            } else {
                surface_text(node).map(|t| t.into_owned())
            };

            let idx = graph.add_node(NodeRecord {
                node,
                flags,
                text,
                children: Vec::new(),
            });
            index_map.insert(node.id.as_str(), idx);

            if let Some(parent) = parent {
                let tier = graph[parent].node.role.tier();
                graph.add_edge(parent, idx, EdgeClass::Structural(tier));
                graph[parent].children.push(idx);
            }

            if has_children && is_expanded {
                stack.extend(node.children.iter().rev().map(|child| (child, Some(idx))));
            }

            if node.is_dropped {
                if let Some(antecedent) = &node.refers_to_id {
                    pending_refs.push((antecedent, idx));
                }
            }
        }

        let mut roots = graph.externals(Direction::Incoming);
        let root = match (roots.next(), roots.next()) {
            (Some(root), None) => root,
            _ => return None,
        };
        graph[root].flags.insert(NodeFlags::IS_ROOT);

        for (antecedent, ghost) in pending_refs {
            match index_map.get(antecedent.as_str()) {
                Some(&source) => {
                    graph.add_edge(source, ghost, EdgeClass::CoReference);
                }
                None if tree.find(antecedent.as_str()).is_some() => {
                    trace!(%antecedent, "antecedent hidden, co-reference not drawn");
                }
                None => {
                    warn!(%antecedent, ghost = %graph[ghost].node.id, "dangling co-reference dropped");
                }
            }
        }

        Some(Self { graph, index_map, root })
    }

    pub fn graph(&self) -> &Graph<NodeRecord<'t>, EdgeClass, Directed> {
        &self.graph
    }

    pub fn root(&self) -> NodeIndex {
        self.root
    }

    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.index_map.get(id).copied()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }
}
