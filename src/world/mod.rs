pub mod bsp;
pub mod geometry;
pub mod view;

pub use geometry::Level;
pub use view::Viewpoint;
