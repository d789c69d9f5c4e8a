//! Fitting the diagram into the visible canvas.

use huati_layout::LayoutNode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Union of all node boxes; `None` for an empty diagram.
    pub fn of(nodes: &[LayoutNode]) -> Option<Self> {
        nodes.iter().fold(None, |acc: Option<Bounds>, node| {
            let bounds = Bounds {
                min_x: node.x,
                min_y: node.y,
                max_x: node.x + node.width,
                max_y: node.y + node.height,
            };
            Some(match acc {
                None => bounds,
                Some(acc) => Bounds {
                    min_x: acc.min_x.min(bounds.min_x),
                    min_y: acc.min_y.min(bounds.min_y),
                    max_x: acc.max_x.max(bounds.max_x),
                    max_y: acc.max_y.max(bounds.max_y),
                },
            })
        })
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Pan and zoom applied to the canvas: screen = diagram * zoom + (x, y).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transform {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Transform {
    pub const IDENTITY: Transform = Transform { x: 0.0, y: 0.0, zoom: 1.0 };
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FitOptions {
    /// Margin on each side, as a fraction of the content size.
    pub padding: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// How long the host waits after a layout commit before fitting.
    pub delay_ms: u32,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            padding: 0.15,
            min_zoom: 0.2,
            max_zoom: 1.5,
            delay_ms: 50,
        }
    }
}

/// Centers `bounds` in a `width` x `height` viewport at the largest zoom
/// that keeps the padded content visible.
pub fn fit(bounds: Option<Bounds>, width: f64, height: f64, options: &FitOptions) -> Transform {
    let Some(bounds) = bounds else {
        return Transform::IDENTITY;
    };
    if width <= 0.0 || height <= 0.0 {
        return Transform::IDENTITY;
    }

    let scale = 1.0 + 2.0 * options.padding.max(0.0);
    let content_w = bounds.width().max(1.0) * scale;
    let content_h = bounds.height().max(1.0) * scale;
    let zoom = (width / content_w)
        .min(height / content_h)
        .max(options.min_zoom)
        .min(options.max_zoom);

    let center_x = (bounds.min_x + bounds.max_x) / 2.0;
    let center_y = (bounds.min_y + bounds.max_y) / 2.0;
    Transform {
        x: width / 2.0 - center_x * zoom,
        y: height / 2.0 - center_y * zoom,
        zoom,
    }
}

/// Wraps at `u32::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FitTicket(pub u32);

/// Debounces viewport fits. Each layout or visibility change schedules a
/// new ticket and supersedes the pending one; the host runs the fit after
/// its delay and only the latest ticket is honored.
#[derive(Debug, Default)]
pub struct FitScheduler {
    issued: u32,
    pending: Option<FitTicket>,
}

impl FitScheduler {
    pub fn schedule(&mut self) -> FitTicket {
        self.issued = self.issued.wrapping_add(1);
        let ticket = FitTicket(self.issued);
        self.pending = Some(ticket);
        ticket
    }

    pub fn pending(&self) -> Option<FitTicket> {
        self.pending
    }

    /// Consumes `ticket` if it is still the latest one.
    pub fn take(&mut self, ticket: FitTicket) -> bool {
        if self.pending == Some(ticket) {
            self.pending = None;
            true
        } else {
            false
        }
    }
}
