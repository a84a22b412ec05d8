//! BSP child encoding and point-side tests.
//!
//! Children of a [`Node`](crate::world::geometry::Node) are `u16` codes:
//! the high bit marks a subsector leaf, the low 15 bits are the index. The
//! all-ones code is the degenerate "map with no nodes" root and resolves to
//! subsector 0.

use crate::world::geometry::{Aabb, Level, Node, SubsectorId};
use glam::Vec2;

pub const SUBSECTOR_BIT: u16 = 0x8000;
pub const CHILD_MASK: u16 = 0x7FFF;

impl Level {
    /// Child code of the BSP root (`nodes.len() - 1`, the last node built).
    pub fn bsp_root(&self) -> u16 {
        if self.nodes.is_empty() {
            // Single-subsector map.
            u16::MAX
        } else {
            (self.nodes.len() - 1) as u16
        }
    }

    /// Walk the tree and return the subsector containing `p`.
    pub fn locate_subsector(&self, p: Vec2) -> SubsectorId {
        let mut child = self.bsp_root();
        while child & SUBSECTOR_BIT == 0 {
            let node = &self.nodes[child as usize];
            child = node.child[node.point_side(p)];
        }
        child & CHILD_MASK
    }
}

impl Node {
    /// 0 = front of the splitting line, 1 = back.
    #[inline]
    pub fn point_side(&self, p: Vec2) -> usize {
        let d = (p.x - self.pos.x) * self.delta.y - (p.y - self.pos.y) * self.delta.x;
        if d >= 0.0 { 0 } else { 1 }
    }
}

impl Aabb {
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}
