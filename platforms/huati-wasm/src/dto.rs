//! Shapes sent to JavaScript. Field names are camelCase.

use huati_layout::{ArcGeometry, Edge, LayoutNode, LayoutResult, COREF_STROKE};
use huati_protocol::glossary::{self, Badge};
use huati_protocol::TextTriple;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDto {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub depth: u32,
    pub role: &'static str,
    pub sub_role: Option<String>,
    pub text: Option<TextTriple>,
    pub implied_text: Option<String>,
    pub is_root: bool,
    pub has_children: bool,
    pub is_expanded: bool,
    pub is_dropped: bool,
    pub badges: Vec<BadgeDto>,
}

#[derive(Debug, Serialize)]
pub struct BadgeDto {
    pub label: &'static str,
    pub tone: &'static str,
}

impl From<Badge> for BadgeDto {
    fn from(badge: Badge) -> Self {
        Self {
            label: badge.label,
            tone: badge.tone,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EdgeDto {
    #[serde(rename_all = "camelCase")]
    Structural {
        id: String,
        source: String,
        target: String,
        stroke: &'static str,
    },
    #[serde(rename_all = "camelCase")]
    CoReference {
        id: String,
        source: String,
        target: String,
        stroke: &'static str,
        dashed: bool,
        label: &'static str,
        arc: ArcGeometry,
    },
}

#[derive(Debug, Serialize)]
pub struct LayoutDto {
    pub nodes: Vec<NodeDto>,
    pub edges: Vec<EdgeDto>,
}

#[derive(Debug, Serialize)]
pub struct GlossaryDto {
    pub role: &'static str,
    pub headline: &'static str,
    pub detail: &'static str,
}

impl From<&LayoutNode> for NodeDto {
    fn from(node: &LayoutNode) -> Self {
        Self {
            id: node.id.to_string(),
            x: node.x,
            y: node.y,
            width: node.width,
            height: node.height,
            depth: node.depth,
            role: node.role.label(),
            sub_role: node.sub_role.clone(),
            text: node.text.clone(),
            implied_text: node.implied_text.clone(),
            is_root: node.is_root(),
            has_children: node.has_children(),
            is_expanded: node.is_expanded(),
            is_dropped: node.is_dropped(),
            badges: glossary::badges(node.role, node.sub_role.as_deref())
                .into_iter()
                .map(BadgeDto::from)
                .collect(),
        }
    }
}

impl From<&Edge> for EdgeDto {
    fn from(edge: &Edge) -> Self {
        match edge {
            Edge::Structural { source, target, .. } => EdgeDto::Structural {
                id: format!("e-{}-{}", source, target),
                source: source.to_string(),
                target: target.to_string(),
                stroke: edge.stroke(),
            },
            Edge::CoReference { source, target, label, arc } => EdgeDto::CoReference {
                id: format!("coref-{}-{}", source, target),
                source: source.to_string(),
                target: target.to_string(),
                stroke: COREF_STROKE,
                dashed: true,
                label: *label,
                arc: *arc,
            },
        }
    }
}

impl From<&LayoutResult> for LayoutDto {
    fn from(result: &LayoutResult) -> Self {
        Self {
            nodes: result.nodes.iter().map(NodeDto::from).collect(),
            edges: result.edges.iter().map(EdgeDto::from).collect(),
        }
    }
}
