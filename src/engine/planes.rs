//! A ready-made [`VisSink`] that collects the frame's visible planes and
//! sprite-bearing sectors. Planes with identical properties share one
//! entry, so the rasterizer gets each distinct flat surface exactly once.

use crate::engine::{PlaneId, PlaneKey, VisSink};
use crate::world::geometry::SectorId;

#[derive(Debug, Default)]
pub struct VisPlanes {
    planes: Vec<PlaneKey>,
    sprite_sectors: Vec<SectorId>,
}

impl VisPlanes {
    pub fn planes(&self) -> &[PlaneKey] {
        &self.planes
    }

    /// Sectors whose sprites need sorting into the scene, in the order
    /// the traversal reached them (nearest subsector first).
    pub fn sprite_sectors(&self) -> &[SectorId] {
        &self.sprite_sectors
    }

    pub fn clear(&mut self) {
        self.planes.clear();
        self.sprite_sectors.clear();
    }
}

impl VisSink for VisPlanes {
    fn visible_plane(&mut self, key: PlaneKey) -> PlaneId {
        // Linear scan; frames see a few dozen distinct planes at most.
        if let Some(id) = self.planes.iter().position(|p| *p == key) {
            return id;
        }
        self.planes.push(key);
        self.planes.len() - 1
    }

    fn add_sprites(&mut self, sector: SectorId) {
        if !self.sprite_sectors.contains(&sector) {
            self.sprite_sectors.push(sector);
        }
    }
}
