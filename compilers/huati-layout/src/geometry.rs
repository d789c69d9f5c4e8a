use huati_protocol::{GrammarRole, TextTriple};
use petgraph::graph::NodeIndex;

use crate::config::LayoutConfig;
use crate::graph::Diagram;

pub const LABEL_SEPARATOR: &str = " · ";

/// Box geometry of one node, indexed like the diagram's nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub center_x: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub depth: u32,
}

/// Estimated rendered width of a node box.
///
/// Pure and monotonic in every content length: the widest of the heading,
/// the characters and the romanization, plus padding, clamped.
pub fn estimate_width(role: GrammarRole, sub_role: Option<&str>, text: Option<&TextTriple>, config: &LayoutConfig) -> f64 {
    let mut label_chars = role.label().chars().count();
    if let Some(sub_role) = sub_role {
        label_chars += LABEL_SEPARATOR.chars().count() + sub_role.chars().count();
    }

    let mut content = label_chars as f64 * config.label_char_width;
    if let Some(text) = text {
        content = content
            .max(text.hanzi.chars().count() as f64 * config.hanzi_char_width)
            .max(text.pinyin.chars().count() as f64 * config.pinyin_char_width);
    }

    // max-then-min rather than clamp: a host-supplied config may invert the bounds.
    (content + config.horizontal_padding)
        .max(config.min_node_width)
        .min(config.max_node_width)
}

pub fn estimate_height(text: Option<&TextTriple>, config: &LayoutConfig) -> f64 {
    match text {
        Some(_) => config.base_node_height + config.text_block_height,
        None => config.base_node_height,
    }
}

/// Positions every node of the diagram.
///
/// Leaves are packed left to right in reading order; each interior node sits
/// at the midpoint of its outermost children's centers; y is depth times the
/// rank separation.
pub fn place(diagram: &Diagram<'_>, config: &LayoutConfig) -> Vec<Placement> {
    let graph = diagram.graph();
    let count = graph.node_count();

    let mut placements: Vec<Placement> = graph
        .node_indices()
        .map(|idx| {
            let record = &graph[idx];
            Placement {
                center_x: 0.0,
                top: 0.0,
                width: estimate_width(
                    record.node.role,
                    record.node.sub_role.as_deref(),
                    record.text.as_ref(),
                    config,
                ),
                height: estimate_height(record.text.as_ref(), config),
                depth: 0,
            }
        })
        .collect();

    let preorder = depth_first(diagram, &mut placements);
    debug_assert_eq!(preorder.len(), count);

    let mut right_edge: Option<f64> = None;
    for &idx in preorder.iter().filter(|&&idx| graph[idx].children.is_empty()) {
        let placement = &mut placements[idx.index()];
        let half = placement.width / 2.0;
        placement.center_x = match right_edge {
            None => half,
            Some(right) => right + config.leaf_gap + half,
        };
        right_edge = Some(placement.center_x + half);
    }

    // Reverse preorder visits every child before its parent.
    for &idx in preorder.iter().rev() {
        let children = &graph[idx].children;
        if children.is_empty() {
            continue;
        }
        let (lo, hi) = children.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), child| {
            let c = placements[child.index()].center_x;
            (lo.min(c), hi.max(c))
        });
        placements[idx.index()].center_x = (lo + hi) / 2.0;
    }

    for placement in &mut placements {
        placement.top = f64::from(placement.depth) * config.rank_separation;
    }

    placements
}

/// Assigns depths and returns the preorder from the root. Each index is
/// visited at most once.
fn depth_first(diagram: &Diagram<'_>, placements: &mut [Placement]) -> Vec<NodeIndex> {
    let graph = diagram.graph();
    let mut seen = vec![false; graph.node_count()];
    let mut preorder = Vec::with_capacity(graph.node_count());
    let mut stack = vec![(diagram.root(), 0u32)];

    while let Some((idx, depth)) = stack.pop() {
        if std::mem::replace(&mut seen[idx.index()], true) {
            continue;
        }
        placements[idx.index()].depth = depth;
        preorder.push(idx);
        stack.extend(graph[idx].children.iter().rev().map(|&child| (child, depth + 1)));
    }

    preorder
}
