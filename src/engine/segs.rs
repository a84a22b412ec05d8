//! Segment visibility clipping.
//!
//! [`Engine::add_seg`] takes one wall edge, culls it against the viewing
//! cone, projects it to a column range, classifies it as view-blocking or
//! see-through, and emits a [`WallRange`] for every piece the occlusion
//! map still has open. Solid pieces then close those columns for the rest
//! of the frame.

use crate::angle::{ANG180, Angle};
use crate::engine::{Engine, FrameTiming, RenderError, WallRange};
use crate::world::geometry::{Level, NO_TEXTURE, SectorId, SegmentId};
use crate::world::view::Viewpoint;

impl Engine {
    /// Clip one seg of the subsector owned by `front` and record any
    /// visible pieces.
    pub(crate) fn add_seg(
        &mut self,
        level: &Level,
        view: &Viewpoint,
        timing: FrameTiming,
        seg_id: SegmentId,
        front: SectorId,
    ) -> Result<(), RenderError> {
        let seg = &level.segs[seg_id as usize];
        let v1 = level.vertices[seg.v1 as usize].pos;
        let v2 = level.vertices[seg.v2 as usize].pos;

        let mut angle1 = view.angle_to(v1);
        let mut angle2 = view.angle_to(v2);

        // Endpoints spanning a half turn or more mean we see the back of
        // the wall.
        let span = angle1 - angle2;
        if span >= ANG180 {
            return Ok(());
        }

        let raw_angle = angle1;
        angle1 -= view.angle;
        angle2 -= view.angle;

        // Clip to the viewing cone. A wrapped tspan larger than the full
        // cone means the endpoint is outside it; the seg survives only if
        // the other endpoint still reaches in, truncated to the cone edge.
        let clip = self.projection.clip_angle();
        let mut tspan = angle1 + clip;
        if tspan > clip + clip {
            tspan -= clip + clip;
            if tspan >= span {
                return Ok(());
            }
            angle1 = clip;
        }
        tspan = clip - angle2;
        if tspan > clip + clip {
            tspan -= clip + clip;
            if tspan >= span {
                return Ok(());
            }
            angle2 = -clip;
        }

        let x1 = self.projection.angle_to_column(angle1);
        let x2 = self.projection.angle_to_column(angle2);
        if x1 == x2 {
            // Does not cross a pixel.
            return Ok(());
        }
        let (x1, x2) = (x1, x2 - 1);

        let solid = match seg.back_sector(level) {
            // Single-sided wall.
            None => true,
            Some(back) => {
                let (back_floor, back_ceil) = self.interp_heights(level, timing, back);
                let (front_floor, front_ceil) = self.interp_heights(level, timing, front);

                #[allow(clippy::float_cmp)]
                if back_ceil <= front_floor || back_floor >= front_ceil {
                    // Closed door: the opening has zero or negative height.
                    true
                } else if back_ceil != front_ceil || back_floor != front_floor {
                    // Window: part wall, part visible opening.
                    false
                } else {
                    // Same heights on both sides. If every visual property
                    // matches too, this is a trigger line with nothing to
                    // draw.
                    let fs = &level.sectors[front as usize];
                    let bs = &level.sectors[back as usize];
                    if bs.ceil_tex == fs.ceil_tex
                        && bs.floor_tex == fs.floor_tex
                        && bs.light == fs.light
                        && bs.special == fs.special
                        && seg.mid_tex(level) == NO_TEXTURE
                    {
                        return Ok(());
                    }
                    false
                }
            }
        };

        if solid {
            self.clip_solid(x1, x2, seg_id, raw_angle)
        } else {
            self.clip_pass(x1, x2, seg_id, raw_angle)
        }
    }

    /// Record the open fragments of `[x1, x2]` as drawable, then occlude
    /// the whole range: the wall itself still renders even though it blocks
    /// everything behind it.
    pub(crate) fn clip_solid(
        &mut self,
        x1: i32,
        x2: i32,
        seg: SegmentId,
        raw_angle: Angle,
    ) -> Result<(), RenderError> {
        for r in self.solid.open_ranges(x1, x2) {
            self.push_range(r.first, r.last, seg, raw_angle)?;
        }
        self.solid.mark_solid(x1, x2)
    }

    /// Record the open fragments without occluding anything.
    pub(crate) fn clip_pass(
        &mut self,
        x1: i32,
        x2: i32,
        seg: SegmentId,
        raw_angle: Angle,
    ) -> Result<(), RenderError> {
        for r in self.solid.open_ranges(x1, x2) {
            self.push_range(r.first, r.last, seg, raw_angle)?;
        }
        Ok(())
    }

    fn push_range(
        &mut self,
        x1: i32,
        x2: i32,
        seg: SegmentId,
        raw_angle: Angle,
    ) -> Result<(), RenderError> {
        if self.wall_ranges.len() >= self.wall_cap {
            return Err(RenderError::WallRangeOverflow {
                capacity: self.wall_cap,
            });
        }
        self.wall_ranges.push(WallRange {
            x1,
            x2,
            seg,
            raw_angle,
        });
        Ok(())
    }
}
