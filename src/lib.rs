//! Visible-surface determination for a sector-based 2.5D world.
//!
//! Walks a level's BSP front to back from the eye, clips each boundary
//! seg against a one-dimensional occlusion map of solid screen columns,
//! and emits the wall ranges, floor/ceiling planes and sprite-bearing
//! sectors that a later rasterization stage draws. No pixels are touched
//! here; the output is work items plus requests through the [`VisSink`]
//! seam.

pub mod angle;
pub mod engine;
pub mod world;

pub use angle::Angle;
pub use engine::planes::VisPlanes;
pub use engine::{Engine, FrameTiming, PlaneId, PlaneKey, RenderError, VisSink, WallRange};
pub use world::geometry::Level;
pub use world::view::Viewpoint;
