use serde::Serialize;

use crate::config::LayoutConfig;

pub const COREF_LABEL: &str = "refers to";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Cubic curve from the antecedent's top edge to the ghost's top edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcGeometry {
    pub source: Point,
    pub target: Point,
    pub control1: Point,
    pub control2: Point,
    pub label_anchor: Point,
}

impl ArcGeometry {
    /// `source` and `target` are the top-center anchors of the two boxes.
    /// Both control points bow to the left and above their anchor; the
    /// sideways swing grows with the vertical distance, never below the floor.
    pub fn between(source: Point, target: Point, config: &LayoutConfig) -> Self {
        let swing = ((target.y - source.y).abs() * config.coref_swing_factor).max(config.coref_min_swing);
        let control1 = Point {
            x: source.x - swing,
            y: source.y - config.coref_lift,
        };
        let control2 = Point {
            x: target.x - swing,
            y: target.y - config.coref_lift,
        };
        Self {
            source,
            target,
            control1,
            control2,
            label_anchor: Point {
                x: control1.x,
                y: (source.y + target.y) / 2.0,
            },
        }
    }
}
