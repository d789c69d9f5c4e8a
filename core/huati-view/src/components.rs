use huati_layout::Point;
use huati_protocol::NodeId;
use serde::{Deserialize, Serialize};

/// Axis-aligned box in diagram coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Edges are inclusive.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.x + self.width && point.y >= self.y && point.y <= self.y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }
}

/// Screen region of a mounted interactive element.
#[derive(Debug, Clone, Copy)]
pub struct Region(pub Rect);

/// What a region shows a tooltip for.
#[derive(Debug, Clone)]
pub struct HoverTarget {
    pub node: NodeId,
}

/// Monotonic registration stamp; later registrations win area ties.
#[derive(Debug, Clone, Copy)]
pub struct Registration {
    pub order: u64,
}
