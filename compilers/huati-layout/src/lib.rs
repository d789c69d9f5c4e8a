pub mod config;
pub mod coref;
pub mod geometry;
pub mod graph;
pub mod validate;

use huati_protocol::{GrammarNode, GrammarRole, NodeFlags, NodeId, RoleTier, TextTriple};
use petgraph::visit::EdgeRef;
use tracing::debug;

pub use config::LayoutConfig;
pub use coref::{ArcGeometry, Point, COREF_LABEL};
pub use graph::{Diagram, EdgeClass, ExpansionState};
pub use validate::{check_tree, ContractError};

/// Stroke for co-reference arcs, which are always dashed.
pub const COREF_STROKE: &str = "#f43f5e";

/// One positioned box. `x`/`y` is the top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub depth: u32,
    pub role: GrammarRole,
    pub sub_role: Option<String>,
    /// Authored text, the aggregate of a collapsed subtree, or a ghost's
    /// bracketed pronoun. `None` renders an empty content area.
    pub text: Option<TextTriple>,
    pub implied_text: Option<String>,
    pub flags: NodeFlags,
}

impl LayoutNode {
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    /// Where co-reference arcs attach.
    pub fn top_anchor(&self) -> Point {
        Point {
            x: self.center_x(),
            y: self.y,
        }
    }

    pub fn is_root(&self) -> bool {
        self.flags.contains(NodeFlags::IS_ROOT)
    }

    /// Reflects the authored tree, even when every child is filtered out.
    pub fn has_children(&self) -> bool {
        self.flags.contains(NodeFlags::HAS_CHILDREN)
    }

    pub fn is_expanded(&self) -> bool {
        self.flags.contains(NodeFlags::IS_EXPANDED)
    }

    pub fn is_dropped(&self) -> bool {
        self.flags.contains(NodeFlags::IS_DROPPED)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Edge {
    Structural {
        source: NodeId,
        target: NodeId,
        tier: RoleTier,
    },
    CoReference {
        /// The antecedent.
        source: NodeId,
        /// The ghost.
        target: NodeId,
        label: &'static str,
        arc: ArcGeometry,
    },
}

impl Edge {
    pub fn source(&self) -> &NodeId {
        match self {
            Edge::Structural { source, .. } | Edge::CoReference { source, .. } => source,
        }
    }

    pub fn target(&self) -> &NodeId {
        match self {
            Edge::Structural { target, .. } | Edge::CoReference { target, .. } => target,
        }
    }

    pub fn is_coreference(&self) -> bool {
        matches!(self, Edge::CoReference { .. })
    }

    pub fn stroke(&self) -> &'static str {
        match self {
            Edge::Structural { tier, .. } => tier.stroke(),
            Edge::CoReference { .. } => COREF_STROKE,
        }
    }
}

/// Output of one layout pass. Structural edges come first, in preorder;
/// co-reference edges follow so they paint above.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutResult {
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<Edge>,
}

impl LayoutResult {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.id.as_str() == id)
    }

    pub fn coreference_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(|e| e.is_coreference())
    }
}

/// Lays out `tree` with the default geometry.
pub fn layout(tree: &GrammarNode, expansion: &impl ExpansionState, show_ghosts: bool) -> LayoutResult {
    layout_with_config(tree, expansion, show_ghosts, &LayoutConfig::default())
}

/// Filters `tree` by expansion state and ghost visibility, then positions
/// the survivors. Recomputed from scratch on every call; identical inputs
/// give identical output.
pub fn layout_with_config(
    tree: &GrammarNode,
    expansion: &impl ExpansionState,
    show_ghosts: bool,
    config: &LayoutConfig,
) -> LayoutResult {
    let Some(diagram) = Diagram::build(tree, expansion, show_ghosts) else {
        debug!(root = %tree.id, show_ghosts, "nothing to lay out");
        return LayoutResult::default();
    };

    let placements = geometry::place(&diagram, config);
    let graph = diagram.graph();

    let nodes: Vec<LayoutNode> = graph
        .node_indices()
        .map(|idx| {
            let record = &graph[idx];
            let placement = placements[idx.index()];
            LayoutNode {
                id: record.node.id.clone(),
                x: placement.center_x - placement.width / 2.0,
                y: placement.top,
                width: placement.width,
                height: placement.height,
                depth: placement.depth,
                role: record.node.role,
                sub_role: record.node.sub_role.clone(),
                text: record.text.clone(),
                implied_text: record.node.implied_text.clone(),
                flags: record.flags,
            }
        })
        .collect();

    let edges: Vec<Edge> = graph
        .edge_references()
        .map(|edge| {
            let source = &nodes[edge.source().index()];
            let target = &nodes[edge.target().index()];
            match *edge.weight() {
                EdgeClass::Structural(tier) => Edge::Structural {
                    source: source.id.clone(),
                    target: target.id.clone(),
                    tier,
                },
                EdgeClass::CoReference => Edge::CoReference {
                    source: source.id.clone(),
                    target: target.id.clone(),
                    label: COREF_LABEL,
                    arc: ArcGeometry::between(source.top_anchor(), target.top_anchor(), config),
                },
            }
        })
        .collect();

    debug!(
        root = %tree.id,
        nodes = nodes.len(),
        edges = edges.len(),
        show_ghosts,
        "layout pass"
    );

    LayoutResult { nodes, edges }
}

#[cfg(test)]
mod tests {
    use super::*;
    use huati_protocol::Corpus;
    use proptest::prelude::*;
    use std::collections::{BTreeSet, HashSet};

    const CORPUS_JSON: &str = include_str!("../../../data/sentences.json");

    fn corpus() -> Corpus {
        serde_json::from_str(CORPUS_JSON).expect("sample corpus parses")
    }

    fn tree(id: &str) -> GrammarNode {
        corpus().get(id).expect("sentence exists").tree.clone()
    }

    fn expanded(ids: &[&str]) -> BTreeSet<NodeId> {
        ids.iter().map(|&id| NodeId::from(id)).collect()
    }

    fn all_interior(tree: &GrammarNode) -> BTreeSet<NodeId> {
        tree.iter().filter(|n| n.has_children()).map(|n| n.id.clone()).collect()
    }

    fn child_ids<'a>(result: &'a LayoutResult, parent: &str) -> Vec<&'a str> {
        result
            .edges
            .iter()
            .filter(|e| !e.is_coreference() && e.source().as_str() == parent)
            .map(|e| e.target().as_str())
            .collect()
    }

    fn layout_leaves(result: &LayoutResult) -> Vec<&LayoutNode> {
        result
            .nodes
            .iter()
            .filter(|n| child_ids(result, n.id.as_str()).is_empty())
            .collect()
    }

    #[test]
    fn test_corpus_satisfies_contract() {
        for sentence in corpus().sentences {
            let errors = check_tree(&sentence.tree);
            assert!(errors.is_empty(), "{}: {:?}", sentence.id, errors);
        }
    }

    #[test]
    fn test_s1_initial_state() {
        let tree = tree("s1");
        let result = layout(&tree, &expanded(&["s1-root"]), true);

        let ids: Vec<&str> = result.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["s1-root", "s1-topic", "s1-comment"]);
        assert_eq!(child_ids(&result, "s1-root"), ["s1-topic", "s1-comment"]);

        let root = result.node("s1-root").unwrap();
        assert!(root.is_root() && root.is_expanded() && root.has_children());

        let comment = result.node("s1-comment").unwrap();
        assert!(comment.has_children() && !comment.is_expanded());
        let text = comment.text.as_ref().unwrap();
        assert_eq!(text.hanzi, "打碎了那个花瓶");
        assert_eq!(text.pinyin, "dǎ suì le nà ge huāpíng");
        assert_eq!(text.translation, "hit to pieces that vase");

        assert_eq!(result.node("s1-topic").unwrap().text.as_ref().unwrap().hanzi, "他");
        assert!(result.edges.iter().all(|e| e.stroke() == RoleTier::Root.stroke()));
    }

    #[test]
    fn test_s1_expanding_comment_reveals_verb_phrase() {
        let tree = tree("s1");
        let result = layout(&tree, &expanded(&["s1-root", "s1-comment"]), true);

        assert_eq!(child_ids(&result, "s1-comment"), ["s1-vp"]);
        let vp = result.node("s1-vp").unwrap();
        assert_eq!(vp.depth, 2);
        assert_eq!(vp.text.as_ref().unwrap().hanzi, "打碎了那个花瓶");
        assert!(result.node("s1-comment").unwrap().text.is_none());

        let from_comment = result.edges.iter().find(|e| e.source().as_str() == "s1-comment").unwrap();
        assert_eq!(from_comment.stroke(), RoleTier::Frame.stroke());
    }

    #[test]
    fn test_s15_coreference_follows_ghost_visibility() {
        let tree = tree("s15");
        let all = all_interior(&tree);

        let shown = layout(&tree, &all, true);
        let arcs: Vec<&Edge> = shown.coreference_edges().collect();
        assert_eq!(arcs.len(), 1);
        assert_eq!(arcs[0].source().as_str(), "s15-topic");
        assert_eq!(arcs[0].target().as_str(), "s15-subj");
        assert!(shown.edges.last().unwrap().is_coreference());
        assert_eq!(child_ids(&shown, "s15-comment"), ["s15-subj", "s15-pred"]);

        let ghost = shown.node("s15-subj").unwrap();
        assert!(ghost.is_dropped());
        assert_eq!(ghost.text.as_ref().unwrap().hanzi, "（他）");

        let hidden = layout(&tree, &all, false);
        assert!(hidden.node("s15-subj").is_none());
        assert_eq!(hidden.coreference_edges().count(), 0);
        assert_eq!(child_ids(&hidden, "s15-comment"), ["s15-pred"]);
    }

    #[test]
    fn test_s15_arc_departs_from_top_edges() {
        let tree = tree("s15");
        let result = layout(&tree, &all_interior(&tree), true);
        let topic = result.node("s15-topic").unwrap();
        let ghost = result.node("s15-subj").unwrap();

        let Some(Edge::CoReference { arc, label, .. }) = result.coreference_edges().next() else {
            panic!("expected a co-reference edge");
        };
        assert_eq!(*label, COREF_LABEL);
        assert_eq!(arc.source, topic.top_anchor());
        assert_eq!(arc.target, ghost.top_anchor());
        assert!(arc.control1.y < arc.source.y);
    }

    #[test]
    fn test_s17_never_emits_coreference() {
        let tree = tree("s17");
        for expansion in [expanded(&["s17-root"]), all_interior(&tree)] {
            for show in [true, false] {
                assert_eq!(layout(&tree, &expansion, show).coreference_edges().count(), 0);
            }
        }
    }

    #[test]
    fn test_coreference_conditions_are_independent() {
        let base = tree("s15");
        let all = all_interior(&base);
        let reference = layout(&base, &all, true);

        let mut unlinked = base.clone();
        strip_reference(&mut unlinked);
        let result = layout(&unlinked, &all, true);
        assert_eq!(result.coreference_edges().count(), 0);
        assert_eq!(result.nodes, reference.nodes);

        // Antecedent hidden inside the collapsed topic.
        let mut inner = base.clone();
        retarget(&mut inner, "s15-name");
        let collapsed_topic: BTreeSet<NodeId> = all.iter().filter(|id| id.as_str() != "s15-topic").cloned().collect();
        assert_eq!(layout(&inner, &collapsed_topic, true).coreference_edges().count(), 0);
        assert_eq!(layout(&inner, &all, true).coreference_edges().count(), 1);

        // Dangling antecedent is dropped, not an error.
        let mut dangling = base.clone();
        retarget(&mut dangling, "nowhere");
        let result = layout(&dangling, &all, true);
        assert_eq!(result.coreference_edges().count(), 0);
        assert_eq!(result.nodes.len(), reference.nodes.len());
    }

    fn two_ghost_tree(first: Option<&str>, second: Option<&str>) -> GrammarNode {
        GrammarNode::new("r", GrammarRole::Sentence).with_children(vec![
            GrammarNode::new("t", GrammarRole::Topic).with_children(vec![GrammarNode::leaf(
                "name",
                GrammarRole::HeadNoun,
                TextTriple::new("小王", "Xiǎo Wáng", "Xiao Wang"),
            )]),
            GrammarNode::new("c", GrammarRole::Comment).with_children(vec![
                GrammarNode::ghost("g1", GrammarRole::Subject, Some("他"), first),
                GrammarNode::leaf("v1", GrammarRole::HeadVerb, TextTriple::new("来了", "lái le", "came")),
                GrammarNode::new("cl", GrammarRole::Clause).with_children(vec![
                    GrammarNode::ghost("g2", GrammarRole::Subject, Some("他"), second),
                    GrammarNode::leaf("v2", GrammarRole::HeadVerb, TextTriple::new("走了", "zǒu le", "left")),
                ]),
            ]),
        ])
    }

    fn structural(result: &LayoutResult) -> Vec<&Edge> {
        result.edges.iter().filter(|e| !e.is_coreference()).collect()
    }

    fn arc_into<'a>(result: &'a LayoutResult, ghost: &str) -> Option<&'a Edge> {
        result.coreference_edges().find(|e| e.target().as_str() == ghost)
    }

    #[test]
    fn test_each_coreference_condition_removes_only_its_arc() {
        let base = two_ghost_tree(Some("t"), Some("name"));
        let all = all_interior(&base);
        let reference = layout(&base, &all, true);
        assert_eq!(reference.coreference_edges().count(), 2);
        let g1_arc = arc_into(&reference, "g1").unwrap();
        let g2_arc = arc_into(&reference, "g2").unwrap();

        // Ghost without a reference.
        let unlinked = layout(&two_ghost_tree(None, Some("name")), &all, true);
        assert!(arc_into(&unlinked, "g1").is_none());
        assert_eq!(arc_into(&unlinked, "g2"), Some(g2_arc));
        assert_eq!(structural(&unlinked), structural(&reference));
        assert_eq!(unlinked.nodes, reference.nodes);

        // Antecedent id missing from the tree.
        let dangling = layout(&two_ghost_tree(Some("t"), Some("nowhere")), &all, true);
        assert_eq!(arc_into(&dangling, "g1"), Some(g1_arc));
        assert!(arc_into(&dangling, "g2").is_none());
        assert_eq!(structural(&dangling), structural(&reference));
        assert_eq!(dangling.nodes, reference.nodes);

        // Antecedent hidden inside the collapsed topic.
        let without_topic: BTreeSet<NodeId> = all.iter().filter(|id| id.as_str() != "t").cloned().collect();
        let hidden = layout(&base, &without_topic, true);
        assert!(arc_into(&hidden, "g2").is_none());
        let kept = arc_into(&hidden, "g1").unwrap();
        assert_eq!(kept.source().as_str(), "t");
        assert_eq!(hidden.coreference_edges().count(), 1);
        let expected: Vec<&Edge> = structural(&reference)
            .into_iter()
            .filter(|e| e.source().as_str() != "t")
            .collect();
        assert_eq!(structural(&hidden), expected);
    }

    fn ghost_mut(tree: &mut GrammarNode) -> &mut GrammarNode {
        tree.children
            .iter_mut()
            .find(|c| c.id.as_str() == "s15-comment")
            .and_then(|c| c.children.iter_mut().find(|g| g.is_dropped))
            .expect("ghost subject")
    }

    fn strip_reference(tree: &mut GrammarNode) {
        ghost_mut(tree).refers_to_id = None;
    }

    fn retarget(tree: &mut GrammarNode, antecedent: &str) {
        ghost_mut(tree).refers_to_id = Some(NodeId::from(antecedent));
    }

    #[test]
    fn test_collapsed_aggregate_includes_hidden_ghosts() {
        let tree = tree("s15");
        let result = layout(&tree, &expanded(&["s15-root"]), false);
        let comment = result.node("s15-comment").unwrap();
        assert_eq!(comment.text.as_ref().unwrap().hanzi, "（他）昨天来过了");
    }

    #[test]
    fn test_aggregate_matches_expanded_leaves() {
        let tree = tree("s1");
        let collapsed = layout(&tree, &expanded(&["s1-root"]), true);
        let full = layout(&tree, &all_interior(&tree), true);

        let mut leaves = Vec::new();
        let mut stack = vec!["s1-comment"];
        while let Some(id) = stack.pop() {
            let children = child_ids(&full, id);
            if children.is_empty() {
                leaves.push(full.node(id).unwrap().text.as_ref().unwrap().hanzi.clone());
            }
            stack.extend(children.into_iter().rev());
        }

        let aggregate = &collapsed.node("s1-comment").unwrap().text.as_ref().unwrap().hanzi;
        assert_eq!(&leaves.concat(), aggregate);
    }

    #[test]
    fn test_midpoint_of_extremes_not_mean() {
        let tree = GrammarNode::new("r", GrammarRole::Sentence).with_children(vec![
            GrammarNode::leaf("a", GrammarRole::Subject, TextTriple::new("我", "wǒ", "I")),
            GrammarNode::leaf("b", GrammarRole::HeadVerb, TextTriple::new("是", "shì", "am")),
            GrammarNode::leaf("c", GrammarRole::Object, TextTriple::new("一个非常非常非常喜欢学习汉语的人", "", "")),
        ]);
        let result = layout(&tree, &expanded(&["r"]), true);
        let centers: Vec<f64> = ["a", "b", "c"].iter().map(|id| result.node(id).unwrap().center_x()).collect();

        let midpoint = (centers[0] + centers[2]) / 2.0;
        let mean = centers.iter().sum::<f64>() / 3.0;
        assert!((midpoint - mean).abs() > 1.0);
        assert_eq!(result.node("r").unwrap().center_x(), midpoint);
    }

    #[test]
    fn test_depth_alone_decides_y() {
        let tree = tree("s1");
        let config = LayoutConfig::default();
        let result = layout(&tree, &all_interior(&tree), true);

        for node in &result.nodes {
            assert_eq!(node.y, f64::from(node.depth) * config.rank_separation);
        }
        assert_eq!(result.node("s1-subj").unwrap().depth, 2);
        assert_eq!(result.node("s1-det").unwrap().depth, 4);
    }

    #[test]
    fn test_leaves_are_packed_with_fixed_gap() {
        let tree = tree("s3");
        let config = LayoutConfig::default();
        let result = layout(&tree, &all_interior(&tree), true);
        let leaves = layout_leaves(&result);

        assert_eq!(leaves[0].x, 0.0);
        for pair in leaves.windows(2) {
            assert_eq!(pair[1].x, pair[0].x + pair[0].width + config.leaf_gap);
        }
    }

    #[test]
    fn test_empty_when_root_is_pruned() {
        let tree = GrammarNode::ghost("g", GrammarRole::Subject, Some("你"), None);
        assert!(layout(&tree, &expanded(&["g"]), false).is_empty());
        assert_eq!(layout(&tree, &expanded(&["g"]), true).nodes.len(), 1);
    }

    #[test]
    fn test_pruned_children_keep_expand_affordance() {
        let tree = GrammarNode::new("r", GrammarRole::Sentence).with_children(vec![
            GrammarNode::new("c", GrammarRole::Comment)
                .with_children(vec![GrammarNode::ghost("g", GrammarRole::Subject, Some("我"), None)]),
        ]);
        let result = layout(&tree, &expanded(&["r", "c"]), false);

        let comment = result.node("c").unwrap();
        assert!(comment.has_children() && comment.is_expanded());
        assert!(child_ids(&result, "c").is_empty());
        assert_eq!(comment.center_x(), comment.width / 2.0);
        assert_eq!(result.node("r").unwrap().center_x(), comment.center_x());
    }

    #[test]
    fn test_expanded_flag_mirrors_set_membership() {
        let tree = GrammarNode::new("r", GrammarRole::Sentence).with_children(vec![GrammarNode::leaf(
            "t",
            GrammarRole::Topic,
            TextTriple::new("他", "tā", "he"),
        )]);

        let listed = layout(&tree, &expanded(&["r", "t"]), true);
        let leaf = listed.node("t").unwrap();
        assert!(leaf.is_expanded() && !leaf.has_children());
        assert_eq!(leaf.text.as_ref().unwrap().hanzi, "他");

        let unlisted = layout(&tree, &expanded(&["r"]), true);
        assert!(!unlisted.node("t").unwrap().is_expanded());
        assert_eq!(listed.edges, unlisted.edges);
    }

    #[test]
    fn test_duplicate_ids_terminate() {
        let tree = GrammarNode::new("r", GrammarRole::Sentence).with_children(vec![
            GrammarNode::leaf("x", GrammarRole::Topic, TextTriple::new("这", "zhè", "this")),
            GrammarNode::new("x", GrammarRole::Comment)
                .with_children(vec![GrammarNode::leaf("r", GrammarRole::HeadVerb, TextTriple::new("好", "hǎo", "good"))]),
        ]);
        let result = layout(&tree, &expanded(&["r", "x"]), true);
        assert_eq!(result.nodes.len(), 2);
        assert_eq!(check_tree(&tree).len(), 2);
    }

    #[test]
    fn test_expansion_set_kind_does_not_matter() {
        let tree = tree("s9");
        let ordered = all_interior(&tree);
        let hashed: HashSet<NodeId> = ordered.iter().cloned().collect();
        assert_eq!(layout(&tree, &ordered, true), layout(&tree, &hashed, true));
    }

    #[test]
    fn test_width_is_monotonic_and_clamped() {
        let config = LayoutConfig::default();
        let mut last = 0.0;
        for n in 0..40 {
            let hanzi: String = std::iter::repeat('字').take(n).collect();
            let width = geometry::estimate_width(
                GrammarRole::Object,
                None,
                Some(&TextTriple::new(hanzi, "", "")),
                &config,
            );
            assert!(width >= last);
            assert!(width >= config.min_node_width && width <= config.max_node_width);
            last = width;
        }
        assert_eq!(last, config.max_node_width);

        let plain = geometry::estimate_width(GrammarRole::Complement, None, None, &config);
        let refined = geometry::estimate_width(GrammarRole::Complement, Some("resultative complement"), None, &config);
        assert!(refined > plain);
    }

    #[test]
    fn test_contract_violations_are_reported() {
        let tree = GrammarNode::new("r", GrammarRole::Sentence).with_children(vec![
            GrammarNode::ghost("g", GrammarRole::Subject, Some("他"), Some("missing")),
            GrammarNode::leaf("v", GrammarRole::HeadVerb, TextTriple::new("走", "zǒu", "go")),
        ]);
        assert_eq!(
            check_tree(&tree),
            vec![ContractError::DanglingReference {
                node: NodeId::from("g"),
                antecedent: NodeId::from("missing"),
            }]
        );
    }

    // Random trees for the structural properties.

    #[derive(Debug, Clone)]
    struct Shape {
        dropped: bool,
        refers_to_root: bool,
        children: Vec<Shape>,
    }

    fn shape() -> impl Strategy<Value = Shape> {
        let leaf = (prop::bool::weighted(0.25), any::<bool>()).prop_map(|(dropped, refers_to_root)| Shape {
            dropped,
            refers_to_root,
            children: Vec::new(),
        });
        leaf.prop_recursive(4, 40, 4, |inner| {
            (prop::collection::vec(inner, 1..4), prop::bool::weighted(0.1)).prop_map(|(children, dropped)| Shape {
                dropped,
                refers_to_root: false,
                children,
            })
        })
    }

    fn build(shape: &Shape, next: &mut usize) -> GrammarNode {
        let id = format!("n{}", *next);
        *next += 1;
        let mut node = if shape.children.is_empty() {
            let glyph = char::from_u32(0x4e00 + *next as u32).unwrap_or('字');
            GrammarNode::leaf(id, GrammarRole::HeadNoun, TextTriple::new(glyph.to_string(), format!("p{}", next), format!("t{}", next)))
        } else {
            GrammarNode::new(id, GrammarRole::Clause)
        };
        node.is_dropped = shape.dropped;
        if shape.dropped && shape.refers_to_root {
            node.refers_to_id = Some(NodeId::from("n0"));
        }
        node.children = shape.children.iter().map(|c| build(c, next)).collect();
        node
    }

    fn random_tree() -> impl Strategy<Value = GrammarNode> {
        shape().prop_map(|shape| {
            let mut tree = build(&shape, &mut 0);
            tree.is_dropped = false;
            tree.refers_to_id = None;
            tree
        })
    }

    fn hidden_by_ghosts(tree: &GrammarNode) -> HashSet<NodeId> {
        let mut hidden = HashSet::new();
        let mut stack = vec![(tree, false)];
        while let Some((node, under_ghost)) = stack.pop() {
            let hide = under_ghost || node.is_dropped;
            if hide {
                hidden.insert(node.id.clone());
            }
            stack.extend(node.children.iter().map(|c| (c, hide)));
        }
        hidden
    }

    proptest! {
        #[test]
        fn prop_leaf_order_matches_reading_order(tree in random_tree()) {
            let result = layout(&tree, &all_interior(&tree), true);
            let expected: Vec<&str> = tree.iter().filter(|n| !n.has_children()).map(|n| n.id.as_str()).collect();
            let leaves = layout_leaves(&result);
            let actual: Vec<&str> = leaves.iter().map(|n| n.id.as_str()).collect();
            prop_assert_eq!(actual, expected);
            for pair in leaves.windows(2) {
                prop_assert!(pair[0].center_x() < pair[1].center_x());
            }
        }

        #[test]
        fn prop_hidden_ghosts_are_pruned_with_subtrees(tree in random_tree()) {
            let hidden = hidden_by_ghosts(&tree);
            let result = layout(&tree, &all_interior(&tree), false);
            for node in &result.nodes {
                prop_assert!(!node.is_dropped());
                prop_assert!(!hidden.contains(&node.id));
            }
            prop_assert_eq!(result.nodes.len(), tree.iter().count() - hidden.len());
            prop_assert_eq!(result.coreference_edges().count(), 0);
        }

        #[test]
        fn prop_coreference_iff_visible_ghost_with_antecedent(tree in random_tree()) {
            let expected = tree.iter().filter(|n| n.is_dropped && n.refers_to_id.is_some()).count();
            let result = layout(&tree, &all_interior(&tree), true);
            prop_assert_eq!(result.coreference_edges().count(), expected);
            for edge in result.coreference_edges() {
                prop_assert_eq!(edge.source().as_str(), "n0");
            }
        }

        #[test]
        fn prop_interior_center_is_midpoint_of_extremes(tree in random_tree(), show in any::<bool>()) {
            let result = layout(&tree, &all_interior(&tree), show);
            for node in &result.nodes {
                let centers: Vec<f64> = child_ids(&result, node.id.as_str())
                    .into_iter()
                    .map(|id| result.node(id).unwrap().center_x())
                    .collect();
                if centers.is_empty() {
                    continue;
                }
                let lo = centers.iter().cloned().fold(f64::INFINITY, f64::min);
                let hi = centers.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                prop_assert!((node.center_x() - (lo + hi) / 2.0).abs() < 1e-9);
            }
        }

        #[test]
        fn prop_layout_is_deterministic(tree in random_tree(), show in any::<bool>()) {
            let expansion = all_interior(&tree);
            prop_assert_eq!(layout(&tree, &expansion, show), layout(&tree, &expansion, show));
        }
    }
}
