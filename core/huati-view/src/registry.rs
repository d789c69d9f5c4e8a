use hecs::{Entity, World};
use huati_layout::Point;
use huati_protocol::NodeId;

use crate::components::{HoverTarget, Rect, Region, Registration};

/// Deregistration handle returned by [`HoverRegistry::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionHandle(Entity);

/// Registry of mounted hover regions. When regions overlap, the innermost
/// one (smallest area) owns the pointer.
pub struct HoverRegistry {
    world: World,
    next_order: u64,
}

impl Default for HoverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl HoverRegistry {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            next_order: 0,
        }
    }

    pub fn register(&mut self, rect: Rect, node: NodeId) -> RegionHandle {
        let order = self.next_order;
        self.next_order += 1;
        RegionHandle(self.world.spawn((Region(rect), HoverTarget { node }, Registration { order })))
    }

    /// Returns `false` if the handle was already released.
    pub fn unregister(&mut self, handle: RegionHandle) -> bool {
        self.world.despawn(handle.0).is_ok()
    }

    /// Moves a region after its element was re-laid out.
    pub fn update(&mut self, handle: RegionHandle, rect: Rect) -> bool {
        match self.world.get::<&mut Region>(handle.0) {
            Ok(mut region) => {
                region.0 = rect;
                true
            }
            Err(_) => false,
        }
    }

    pub fn len(&self) -> usize {
        self.world.len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.world.len() == 0
    }

    /// The region that should show its tooltip for a pointer at `point`.
    pub fn innermost_at(&self, point: Point) -> Option<(RegionHandle, NodeId)> {
        let mut query = self.world.query::<(&Region, &Registration)>();
        let regions = query.iter().map(|(entity, (region, registration))| (entity, region.0, registration.order));
        let entity = innermost(regions, point)?;

        let target = self.world.get::<&HoverTarget>(entity).ok()?;
        Some((RegionHandle(entity), target.node.clone()))
    }

    pub fn clear(&mut self) {
        self.world.clear();
    }
}

/// Picks the key of the smallest-area region containing `point`; on equal
/// area the highest registration order wins.
pub fn innermost<K>(regions: impl IntoIterator<Item = (K, Rect, u64)>, point: Point) -> Option<K> {
    let mut hits: Vec<(K, f64, u64)> = regions
        .into_iter()
        .filter(|(_, rect, _)| rect.contains(point))
        .map(|(key, rect, order)| (key, rect.area(), order))
        .collect();

    hits.sort_by(|a, b| a.1.total_cmp(&b.1).then(b.2.cmp(&a.2)));
    hits.into_iter().next().map(|(key, _, _)| key)
}
