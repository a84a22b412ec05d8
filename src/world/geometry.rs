use bitflags::bitflags;
use glam::Vec2;

pub type VertexId = u16;
pub type LinedefId = u16;
pub type SidedefId = u16;
pub type SegmentId = u16;
pub type SubsectorId = u16;
pub type SectorId = u16;
pub type PolyObjId = u16;

/// Opaque handle into whatever texture store the rasterizer uses. This
/// layer only ever compares ids; it never looks at pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TextureId(pub u16);

pub const NO_TEXTURE: TextureId = TextureId(u16::MAX);

/// Runtime snapshot of one map (immutable after load).
#[derive(Debug, Default)]
pub struct Level {
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub linedefs: Vec<Linedef>,
    pub sidedefs: Vec<Sidedef>,
    pub segs: Vec<Seg>,
    pub subsectors: Vec<Subsector>,
    pub nodes: Vec<Node>,
    pub sectors: Vec<Sector>,
    pub polyobjs: Vec<PolyObj>,
    /// Ceiling texture treated as open sky; sky ceilings are always
    /// submitted as visible planes regardless of the eye height.
    pub sky_tex: TextureId,
}

/*--------------------------- linedefs -------------------------------*/

bitflags! {
    #[derive(Debug, Clone, Copy, Default)]
    pub struct LinedefFlags: u16 {
        const IMPASSABLE     = 0x0001;
        const TWO_SIDED      = 0x0004;
        const UPPER_UNPEGGED = 0x0010;
        const LOWER_UNPEGGED = 0x0020;
        const SECRET         = 0x0040;
    }
}

#[derive(Clone, Debug)]
pub struct Linedef {
    pub v1: VertexId,
    pub v2: VertexId,
    pub flags: LinedefFlags,
    pub special: u16,
    pub tag: u16,
    pub right_sidedef: Option<SidedefId>,
    pub left_sidedef: Option<SidedefId>,
}

/*--------------------------- sidedefs -------------------------------*/

#[derive(Clone, Debug)]
pub struct Sidedef {
    pub x_off: f32,
    pub y_off: f32,
    pub upper: TextureId,
    pub lower: TextureId,
    pub middle: TextureId,
    pub sector: SectorId,
}

/*----------------------- simple primitives --------------------------*/

#[derive(Clone, Copy, Debug)]
pub struct Vertex {
    pub pos: Vec2,
}

/// A directed wall edge bounding one or two sectors; the atomic unit of
/// wall visibility. `side` selects which sidedef of the owning linedef the
/// seg runs along (0 = right/front, 1 = left/back).
#[derive(Clone, Debug)]
pub struct Seg {
    pub v1: VertexId,
    pub v2: VertexId,
    pub linedef: LinedefId,
    pub side: u16,
    pub offset: f32,
}

impl Seg {
    pub fn sidedef<'a>(&self, lvl: &'a Level) -> Option<&'a Sidedef> {
        let ld = &lvl.linedefs[self.linedef as usize];
        let id = if self.side == 0 {
            ld.right_sidedef
        } else {
            ld.left_sidedef
        };
        id.map(|i| &lvl.sidedefs[i as usize])
    }

    fn back_sidedef<'a>(&self, lvl: &'a Level) -> Option<&'a Sidedef> {
        let ld = &lvl.linedefs[self.linedef as usize];
        let id = if self.side == 0 {
            ld.left_sidedef
        } else {
            ld.right_sidedef
        };
        id.map(|i| &lvl.sidedefs[i as usize])
    }

    pub fn front_sector(&self, lvl: &Level) -> Option<SectorId> {
        self.sidedef(lvl).map(|sd| sd.sector)
    }

    /// The sector on the far side, if the owning linedef has one.
    pub fn back_sector(&self, lvl: &Level) -> Option<SectorId> {
        self.back_sidedef(lvl).map(|sd| sd.sector)
    }

    pub fn mid_tex(&self, lvl: &Level) -> TextureId {
        self.sidedef(lvl).map_or(NO_TEXTURE, |sd| sd.middle)
    }
}

/// Convex terminal region of the BSP: one sector, a run of boundary segs,
/// and optionally an embedded polyobject whose segs render ahead of the
/// subsector's own.
#[derive(Clone, Debug)]
pub struct Subsector {
    pub first_seg: SegmentId,
    pub seg_count: u16,
    pub sector: SectorId,
    pub poly: Option<PolyObjId>,
}

/// Movable group of segs anchored inside one subsector.
#[derive(Clone, Debug, Default)]
pub struct PolyObj {
    pub segs: Vec<SegmentId>,
}

#[derive(Clone, Copy, Debug)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

#[derive(Clone, Debug)]
pub struct Node {
    /// A point on the splitting line and the line's direction.
    pub pos: Vec2,
    pub delta: Vec2,
    /// Bounding box of each child half-space, same indexing as `child`.
    pub bbox: [Aabb; 2],
    pub child: [u16; 2],
}

/*----------------------------- sectors ------------------------------*/

#[derive(Clone, Debug)]
pub struct Sector {
    pub floor_h: f32,
    pub ceil_h: f32,
    /// Height samples from the previous simulation tic, kept by whatever
    /// moves the sector so the renderer can blend between tics.
    pub prev_floor_h: f32,
    pub prev_ceil_h: f32,
    /// Tic on which an active mover last shifted this sector's heights;
    /// `None` while the sector is at rest.
    pub moved_tic: Option<u32>,
    pub floor_tex: TextureId,
    pub ceil_tex: TextureId,
    pub light: i16,
    pub special: i16,
    pub tag: i16,
}

impl Sector {
    /// A sector at rest: both tic samples equal the current heights.
    pub fn at_rest(floor_h: f32, ceil_h: f32, floor_tex: TextureId, ceil_tex: TextureId) -> Self {
        Sector {
            floor_h,
            ceil_h,
            prev_floor_h: floor_h,
            prev_ceil_h: ceil_h,
            moved_tic: None,
            floor_tex,
            ceil_tex,
            light: 160,
            special: 0,
            tag: 0,
        }
    }
}
