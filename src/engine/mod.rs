//! The render-frame engine: front-to-back BSP traversal, segment clipping
//! against the solid-span occlusion map, and plane/sprite visibility
//! requests.
//!
//! [`Engine`] owns every piece of per-frame transient state (occlusion
//! spans, the wall-range buffer, the per-sector interpolation cache) so the
//! whole pass is one writer over explicit state instead of the globals the
//! classic engine used. One call to [`Engine::render_frame`] produces the
//! frame's [`WallRange`] work items and drives a [`VisSink`] for everything
//! the rasterization stage consumes later.

pub mod bsp;
pub mod occlusion;
pub mod planes;
pub mod projection;
pub mod segs;
pub mod subsector;

use crate::angle::Angle;
use crate::world::geometry::{Level, SectorId, SegmentId, TextureId};
use crate::world::view::Viewpoint;
use log::trace;
use occlusion::SolidSpans;
use projection::Projection;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderError {
    /// More distinct solid wall fragments than the screen width allows;
    /// either the map is pathological or the occlusion bound was sized for
    /// a different width.
    #[error("solid span list overflow (capacity {capacity})")]
    SolidSpanOverflow { capacity: usize },

    /// The wall-range work buffer filled up mid-frame.
    #[error("wall range buffer overflow (capacity {capacity})")]
    WallRangeOverflow { capacity: usize },

    /// A BSP leaf pointed outside the subsector table; map data is broken.
    #[error("subsector {index} out of range (map has {total})")]
    InvalidSubsector { index: usize, total: usize },
}

/// Interpolation inputs for one frame, supplied by the game loop.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameTiming {
    /// Current simulation tic.
    pub tic: u32,
    /// Fraction of the way from the previous tic to `tic`, in `[0, 1)`.
    pub frac: f32,
    /// False pins every sector to its current heights (capped framerate).
    pub uncapped: bool,
}

/// Everything that identifies one visible floor or ceiling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaneKey {
    pub height: f32,
    pub tex: TextureId,
    pub light: i16,
    pub special: i16,
}

pub type PlaneId = usize;

/// The seam toward the rasterization stage: plane and sprite visibility
/// requests made while the traversal runs.
pub trait VisSink {
    /// Return a handle for a plane with these properties, reusing an
    /// existing one when the properties match.
    fn visible_plane(&mut self, key: PlaneKey) -> PlaneId;

    /// The traversal reached a subsector of this sector; its transparent
    /// objects need sorting into the scene later.
    fn add_sprites(&mut self, sector: SectorId);
}

/// One emitted unit of wall work: an inclusive column range of `seg` that
/// this frame's nearest-surface pass decided is drawable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallRange {
    pub x1: i32,
    pub x2: i32,
    pub seg: SegmentId,
    /// World angle to the seg's first vertex, wanted by the downstream
    /// wall rasterizer for its scale math.
    pub raw_angle: Angle,
}

/// Per-sector interpolated heights, valid while `stamp` equals the
/// engine's current frame id.
#[derive(Clone, Copy, Default)]
struct InterpSlot {
    floor: f32,
    ceil: f32,
    stamp: u32,
}

pub struct Engine {
    pub(crate) projection: Projection,
    pub(crate) solid: SolidSpans,
    pub(crate) wall_ranges: Vec<WallRange>,
    pub(crate) wall_cap: usize,
    interp: Vec<InterpSlot>,
    frame: u32,
}

impl Engine {
    /// `fov` is the full horizontal field of view in radians.
    pub fn new(width: usize, fov: f32) -> Self {
        Engine {
            projection: Projection::new(width, fov),
            solid: SolidSpans::new(width),
            wall_ranges: Vec::new(),
            wall_cap: width * 2,
            interp: Vec::new(),
            frame: 0,
        }
    }

    /// Determine the visible surfaces for one frame.
    ///
    /// On error the frame is abandoned mid-traversal; wall ranges emitted
    /// before the failure stay readable, so the caller can present a
    /// partial frame or skip it.
    pub fn render_frame<S: VisSink>(
        &mut self,
        level: &Level,
        view: &Viewpoint,
        timing: FrameTiming,
        sink: &mut S,
    ) -> Result<(), RenderError> {
        self.solid.reset();
        self.wall_ranges.clear();
        self.frame = self.frame.wrapping_add(1);
        if self.interp.len() != level.sectors.len() {
            self.interp.clear();
            self.interp
                .resize(level.sectors.len(), InterpSlot::default());
        }

        let mut visited = 0usize;
        self.walk_node(level, view, timing, sink, level.bsp_root(), &mut visited)?;

        trace!(
            "frame {}: {} BSP steps, {} wall ranges, {} solid spans",
            self.frame,
            visited,
            self.wall_ranges.len(),
            self.solid.spans().len(),
        );
        Ok(())
    }

    /// The frame's emitted wall work items, in emission order.
    pub fn wall_ranges(&self) -> &[WallRange] {
        &self.wall_ranges
    }

    /// Interpolated (floor, ceiling) heights for a sector, computed at
    /// most once per frame and cached. Blends the previous and current tic
    /// samples only when interpolation is enabled and an active mover
    /// shifted the sector on the immediately preceding tic.
    pub(crate) fn interp_heights(
        &mut self,
        level: &Level,
        timing: FrameTiming,
        sector_id: SectorId,
    ) -> (f32, f32) {
        let slot = &mut self.interp[sector_id as usize];
        if slot.stamp == self.frame {
            return (slot.floor, slot.ceil);
        }
        let s = &level.sectors[sector_id as usize];
        let moved_last_tic =
            timing.tic > 0 && s.moved_tic == Some(timing.tic - 1);
        let (floor, ceil) = if timing.uncapped && moved_last_tic {
            (
                lerp(s.prev_floor_h, s.floor_h, timing.frac),
                lerp(s.prev_ceil_h, s.ceil_h, timing.frac),
            )
        } else {
            (s.floor_h, s.ceil_h)
        };
        *slot = InterpSlot {
            floor,
            ceil,
            stamp: self.frame,
        };
        (floor, ceil)
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
