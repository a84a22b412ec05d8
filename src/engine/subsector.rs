//! Leaf handling: plane and sprite visibility for the subsector's sector,
//! then its segs through the clipper. Polyobject segs go first so the
//! movable geometry occludes the static walls behind it.

use crate::engine::{Engine, FrameTiming, PlaneKey, RenderError, VisSink};
use crate::world::geometry::Level;
use crate::world::view::Viewpoint;

impl Engine {
    pub(crate) fn draw_subsector<S: VisSink>(
        &mut self,
        level: &Level,
        view: &Viewpoint,
        timing: FrameTiming,
        sink: &mut S,
        idx: usize,
    ) -> Result<(), RenderError> {
        let sub = level
            .subsectors
            .get(idx)
            .ok_or(RenderError::InvalidSubsector {
                index: idx,
                total: level.subsectors.len(),
            })?;
        let front = sub.sector;
        let (floor_h, ceil_h) = self.interp_heights(level, timing, front);
        let sector = &level.sectors[front as usize];

        // A floor at or above the eye shows only its edge-on side, which
        // is nothing; same for a non-sky ceiling at or below it.
        if floor_h < view.pos.z {
            sink.visible_plane(PlaneKey {
                height: floor_h,
                tex: sector.floor_tex,
                light: sector.light,
                special: sector.special,
            });
        }
        if ceil_h > view.pos.z || sector.ceil_tex == level.sky_tex {
            sink.visible_plane(PlaneKey {
                height: ceil_h,
                tex: sector.ceil_tex,
                light: sector.light,
                special: 0,
            });
        }

        sink.add_sprites(front);

        if let Some(poly) = sub.poly {
            for &seg in &level.polyobjs[poly as usize].segs {
                self.add_seg(level, view, timing, seg, front)?;
            }
        }
        for seg in sub.first_seg..sub.first_seg + sub.seg_count {
            self.add_seg(level, view, timing, seg, front)?;
        }
        Ok(())
    }
}
